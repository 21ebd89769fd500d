use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::Path;
use tokio::fs;

use crate::config::Config;
use crate::models::Chapter;

const SAMPLE_ANSWERS: [&str; 5] = ["A", "B", "C", "D", "A"];
const MOLECULAR_BIOLOGY_QUESTIONS: usize = 300;

/// A chapter and the correct answer code of each of its questions, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChapterSeed {
    pub name: String,
    pub answers: Vec<String>,
}

impl ChapterSeed {
    pub fn sample() -> Self {
        Self {
            name: "Sample Chapter".to_string(),
            answers: SAMPLE_ANSWERS.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Placeholder key: every answer is `A` until the real key is entered.
    pub fn molecular_biology() -> Self {
        Self {
            name: "Molecular Biology".to_string(),
            answers: vec!["A".to_string(); MOLECULAR_BIOLOGY_QUESTIONS],
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("Chapter seed has an empty name");
        }
        if let Some(pos) = self
            .answers
            .iter()
            .position(|answer| answer.chars().count() != 1)
        {
            bail!(
                "Chapter '{}' answer #{} must be a single character, got {:?}",
                self.name,
                pos + 1,
                self.answers[pos]
            );
        }
        Ok(())
    }
}

/// Inserts a chapter and its questions in one transaction. `total_questions`
/// is set to the number of answers.
pub async fn seed_chapter(pool: &SqlitePool, seed: &ChapterSeed) -> Result<Chapter> {
    seed.validate()?;

    let mut tx = pool.begin().await.context("Failed to open seed transaction")?;

    let chapter = sqlx::query_as::<_, Chapter>(
        "INSERT INTO chapter (name, total_questions) VALUES (?, ?) RETURNING id, name, total_questions",
    )
    .bind(seed.name.as_str())
    .bind(seed.answers.len() as i64)
    .fetch_one(&mut *tx)
    .await
    .context("Failed to insert chapter")?;

    for answer in &seed.answers {
        sqlx::query("INSERT INTO question (chapter_id, correct_answer) VALUES (?, ?)")
            .bind(chapter.id)
            .bind(answer.as_str())
            .execute(&mut *tx)
            .await
            .context("Failed to insert question")?;
    }

    tx.commit().await.context("Failed to commit chapter seed")?;

    tracing::info!(
        "Seeded chapter '{}' (id {}) with {} questions",
        chapter.name,
        chapter.id,
        chapter.total_questions
    );

    Ok(chapter)
}

pub fn parse_seed_file(contents: &str) -> Result<Vec<ChapterSeed>> {
    let seeds: Vec<ChapterSeed> =
        serde_json::from_str(contents).context("Failed to deserialize chapter seed payload")?;
    for seed in &seeds {
        seed.validate()?;
    }
    Ok(seeds)
}

pub async fn load_seed_file(path: &Path) -> Result<Vec<ChapterSeed>> {
    let contents = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    parse_seed_file(&contents)
}

async fn chapter_exists(pool: &SqlitePool, name: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapter WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await
        .context("Failed to look up chapter by name")?;
    Ok(count > 0)
}

/// Applies the configured seed file at startup. Chapters already present by
/// name are left untouched, so restarting with the same file is harmless.
pub async fn bootstrap(config: &Config, pool: &SqlitePool) -> Result<usize> {
    let path = match &config.seed_file {
        Some(path) => Path::new(path),
        None => {
            tracing::debug!("No seed file configured, skipping bootstrap");
            return Ok(0);
        }
    };

    if !path.exists() {
        tracing::warn!("Seed file {} not found, skipping bootstrap", path.display());
        return Ok(0);
    }

    let seeds = load_seed_file(path).await?;
    let mut inserted = 0;

    for seed in &seeds {
        if chapter_exists(pool, &seed.name).await? {
            tracing::info!("Chapter '{}' already exists, seed skipped", seed.name);
            continue;
        }
        seed_chapter(pool, seed).await?;
        inserted += 1;
    }

    tracing::info!(
        "Seed bootstrap finished: {} of {} chapters inserted",
        inserted,
        seeds.len()
    );

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_seed_matches_known_key() {
        let seed = ChapterSeed::sample();
        assert_eq!(seed.name, "Sample Chapter");
        assert_eq!(seed.answers, vec!["A", "B", "C", "D", "A"]);
    }

    #[test]
    fn molecular_biology_seed_has_300_questions() {
        let seed = ChapterSeed::molecular_biology();
        assert_eq!(seed.answers.len(), 300);
        assert!(seed.answers.iter().all(|a| a == "A"));
    }

    #[test]
    fn parses_seed_file() {
        let seeds = parse_seed_file(
            r#"[{"name": "Genetics", "answers": ["A", "C"]}, {"name": "Cells", "answers": []}]"#,
        )
        .unwrap();
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].name, "Genetics");
        assert_eq!(seeds[0].answers, vec!["A", "C"]);
        assert!(seeds[1].answers.is_empty());
    }

    #[test]
    fn rejects_multi_character_answers() {
        let err = parse_seed_file(r#"[{"name": "Genetics", "answers": ["A", "AB"]}]"#)
            .unwrap_err();
        assert!(err.to_string().contains("answer #2"));
    }

    #[test]
    fn rejects_blank_names() {
        assert!(parse_seed_file(r#"[{"name": "  ", "answers": ["A"]}]"#).is_err());
    }
}
