use anyhow::{bail, Result};
use std::path::Path;
use tracing_subscriber::fmt::init;

use chapter_quiz::{
    config::Config,
    services::{
        seed_service::{load_seed_file, seed_chapter, ChapterSeed},
        AppState,
    },
};

const USAGE: &str = "usage: seed <sample | molecular-biology | file PATH>";

#[tokio::main]
async fn main() -> Result<()> {
    init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seeds = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["sample"] => vec![ChapterSeed::sample()],
        ["molecular-biology"] => vec![ChapterSeed::molecular_biology()],
        ["file", path] => load_seed_file(Path::new(path)).await?,
        _ => bail!(USAGE),
    };

    let config = Config::load()?;
    let app_state = AppState::new(config).await?;

    for seed in &seeds {
        let chapter = seed_chapter(&app_state.pool, seed).await?;
        println!(
            "Created chapter {} '{}' with {} questions",
            chapter.id, chapter.name, chapter.total_questions
        );
    }

    app_state.close().await;
    Ok(())
}
