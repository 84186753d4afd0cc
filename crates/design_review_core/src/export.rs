//! crates/design_review_core/src/export.rs
//!
//! Renders a design as the Markdown document users copy out of the detail view.

use crate::domain::{Design, DraftField};

pub fn to_markdown(design: &Design) -> String {
    let (score, feedback) = match &design.evaluation {
        Some(evaluation) => (format!("{:.1}", evaluation.score), evaluation.feedback.as_str()),
        None => ("N/A".to_string(), "No feedback available."),
    };

    let mut out = format!("# System Design: {}\n", design.title);
    for (i, field) in DraftField::ALL.into_iter().enumerate() {
        out.push_str(&format!(
            "\n## {}. {}\n{}\n",
            i + 1,
            field.title(),
            design.draft.field(field)
        ));
    }
    out.push_str(&format!(
        "\n---\n\n# AI Evaluation\n\n**Score:** {score} / 10.0\n\n**Feedback:**\n{feedback}\n"
    ));

    out.trim().to_string()
}
