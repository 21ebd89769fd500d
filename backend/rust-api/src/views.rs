use lazy_static::lazy_static;
use tera::{Context, Tera};

/// Answer codes offered for every question.
pub const ANSWER_CHOICES: [&str; 4] = ["A", "B", "C", "D"];

lazy_static! {
    pub static ref TEMPLATES: Tera = {
        let mut tera = Tera::default();
        // Embedded so the binary does not depend on its working directory.
        if let Err(e) = tera.add_raw_templates(vec![
            ("base.html", include_str!("../templates/base.html")),
            ("index.html", include_str!("../templates/index.html")),
            ("chapter.html", include_str!("../templates/chapter.html")),
            ("attempt.html", include_str!("../templates/attempt.html")),
            ("results.html", include_str!("../templates/results.html")),
            ("error.html", include_str!("../templates/error.html")),
        ]) {
            tracing::error!("Template parsing error(s): {}", e);
            ::std::process::exit(1);
        }
        tera.autoescape_on(vec![".html"]);
        tera
    };
}

pub fn render(template: &str, context: &Context) -> Result<String, tera::Error> {
    TEMPLATES.render(template, context)
}
