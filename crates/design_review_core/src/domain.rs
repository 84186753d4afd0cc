//! crates/design_review_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! Storage adapters persist these as JSON, so the types that reach storage
//! carry serde derives; everything else stays free of I/O concerns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a derived design title, in characters.
pub const TITLE_MAX_CHARS: usize = 50;

//=========================================================================================
// Users
//=========================================================================================

/// A registered account as it sits in the credential store.
///
/// The password is kept in plaintext. This mirrors the behavior being reproduced
/// and is a known simplification, not something to copy into a real system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl UserRecord {
    /// Returns a copy of this record with the password stripped.
    pub fn sanitized(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

// Represents a signed-in user - safe to persist as the session identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

//=========================================================================================
// Designs
//=========================================================================================

/// The four answers collected by the wizard, in step order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignDraft {
    pub problem: String,
    pub requirements: String,
    pub architecture: String,
    pub decisions: String,
}

/// Names one of the four draft fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Problem,
    Requirements,
    Architecture,
    Decisions,
}

impl DraftField {
    /// All fields in wizard order.
    pub const ALL: [DraftField; 4] = [
        DraftField::Problem,
        DraftField::Requirements,
        DraftField::Architecture,
        DraftField::Decisions,
    ];

    /// Section heading used by the wizard and the Markdown export.
    pub fn title(self) -> &'static str {
        match self {
            DraftField::Problem => "Problem Definition",
            DraftField::Requirements => "Requirements & Constraints",
            DraftField::Architecture => "Architecture Sketch",
            DraftField::Decisions => "Design Decisions & Trade-offs",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            DraftField::Problem => r#"e.g., "Design a scalable chat application""#,
            DraftField::Requirements => {
                r#"e.g., "Real-time messaging, 1M concurrent users, low latency""#
            }
            DraftField::Architecture => {
                r#"e.g., "Frontend: React; Backend: Node/Express; DB: MongoDB; Cache: Redis; Message Queue: RabbitMQ; Deployment: AWS""#
            }
            DraftField::Decisions => {
                r#"e.g., "Used WebSockets for real-time updates, chose MongoDB for schema flexibility, and Redis for message caching to reduce DB load.""#
            }
        }
    }
}

impl DesignDraft {
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Problem => &self.problem,
            DraftField::Requirements => &self.requirements,
            DraftField::Architecture => &self.architecture,
            DraftField::Decisions => &self.decisions,
        }
    }

    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Problem => &mut self.problem,
            DraftField::Requirements => &mut self.requirements,
            DraftField::Architecture => &mut self.architecture,
            DraftField::Decisions => &mut self.decisions,
        }
    }

    /// True when the field holds something other than whitespace.
    pub fn is_filled(&self, field: DraftField) -> bool {
        !self.field(field).trim().is_empty()
    }
}

/// The AI-generated verdict on a design. Both fields are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: f64,
    pub feedback: String,
}

/// Coarse grouping of a score, used for dashboard badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Pending,
    Low,
    Medium,
    High,
}

impl ScoreBand {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => ScoreBand::Pending,
            Some(s) if s >= 8.0 => ScoreBand::High,
            Some(s) if s >= 5.0 => ScoreBand::Medium,
            Some(_) => ScoreBand::Low,
        }
    }
}

/// A submitted design together with its evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub draft: DesignDraft,
    pub evaluation: Option<Evaluation>,
    pub created_at: DateTime<Utc>,
}

impl Design {
    /// Builds the record for a freshly evaluated draft, taking ownership of it.
    pub fn from_evaluated_draft(draft: DesignDraft, evaluation: Evaluation) -> Self {
        Self {
            id: format!("design_{}", Uuid::new_v4().simple()),
            title: derive_title(&draft.problem),
            draft,
            evaluation: Some(evaluation),
            created_at: Utc::now(),
        }
    }

    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.evaluation.as_ref().map(|e| e.score))
    }
}

/// Derives a title from the problem statement.
///
/// Statements longer than [`TITLE_MAX_CHARS`] are cut to 47 characters and
/// ellipsized, so the title never exceeds the limit.
pub fn derive_title(problem: &str) -> String {
    if problem.chars().count() > TITLE_MAX_CHARS {
        let head: String = problem.chars().take(TITLE_MAX_CHARS - 3).collect();
        format!("{head}...")
    } else {
        problem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_problem_is_used_verbatim_as_title() {
        assert_eq!(derive_title("Design a URL shortener"), "Design a URL shortener");
        let exactly_fifty = "x".repeat(50);
        assert_eq!(derive_title(&exactly_fifty), exactly_fifty);
    }

    #[test]
    fn long_problem_is_truncated_to_47_chars_plus_ellipsis() {
        let problem = "Design a globally distributed, strongly consistent key-value store";
        let title = derive_title(problem);
        assert_eq!(title, format!("{}...", &problem[..47]));
        assert_eq!(title.chars().count(), 50);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let problem = "é".repeat(60);
        let title = derive_title(&problem);
        assert_eq!(title, format!("{}...", "é".repeat(47)));
    }

    #[test]
    fn sanitized_user_has_no_password() {
        let record = UserRecord {
            id: "user_1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "Secret#123".into(),
        };
        let json = serde_json::to_string(&record.sanitized()).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("Secret#123"));
    }

    #[test]
    fn score_bands_follow_thresholds() {
        assert_eq!(ScoreBand::from_score(None), ScoreBand::Pending);
        assert_eq!(ScoreBand::from_score(Some(8.0)), ScoreBand::High);
        assert_eq!(ScoreBand::from_score(Some(7.9)), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(Some(5.0)), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(Some(4.9)), ScoreBand::Low);
    }

    #[test]
    fn evaluated_design_keeps_draft_and_evaluation() {
        let draft = DesignDraft {
            problem: "Design a URL shortener".into(),
            requirements: "r".into(),
            architecture: "a".into(),
            decisions: "d".into(),
        };
        let design = Design::from_evaluated_draft(
            draft.clone(),
            Evaluation { score: 7.5, feedback: "Solid approach".into() },
        );
        assert!(design.id.starts_with("design_"));
        assert_eq!(design.title, "Design a URL shortener");
        assert_eq!(design.draft, draft);
        assert_eq!(design.evaluation.map(|e| e.score), Some(7.5));
    }
}
