//! crates/design_review_core/src/registry.rs
//!
//! The session: who is signed in and which designs they can see.
//! Designs live only as long as the session; every sign-in starts from the
//! demo set again.

use crate::domain::{Design, DesignDraft, Evaluation, User};
use chrono::{Duration, Utc};
use tracing::info;

#[derive(Debug, Default)]
pub struct Session {
    user: Option<User>,
    designs: Vec<Design>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current user and replaces the design list with `designs`.
    ///
    /// Nothing from a previous session survives.
    pub fn start(&mut self, user: User, designs: Vec<Design>) {
        info!("Starting session for user {}", user.id);
        self.user = Some(user);
        self.designs = designs;
    }

    pub fn end(&mut self) {
        if let Some(user) = self.user.take() {
            info!("Ending session for user {}", user.id);
        }
        self.designs.clear();
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.user.is_some()
    }

    /// Newest first.
    pub fn designs(&self) -> &[Design] {
        &self.designs
    }

    pub fn add_design(&mut self, design: Design) {
        self.designs.insert(0, design);
    }

    pub fn find_design(&self, id: &str) -> Option<&Design> {
        self.designs.iter().find(|d| d.id == id)
    }
}

/// The pre-evaluated designs every session starts with.
pub fn demo_designs() -> Vec<Design> {
    let now = Utc::now();
    vec![
        Design {
            id: "design_1".to_string(),
            title: "Scalable Chat Application".to_string(),
            draft: DesignDraft {
                problem: "Design a scalable chat application.".to_string(),
                requirements: "Real-time messaging, 1M concurrent users, low latency, message history.".to_string(),
                architecture: "Frontend: React, Backend: Node.js with Socket.IO, DB: Cassandra for messages, Redis for presence.".to_string(),
                decisions: "Used Cassandra for its write performance and scalability. WebSockets for real-time communication.".to_string(),
            },
            evaluation: Some(Evaluation {
                score: 8.5,
                feedback: "Good scalability approach with Cassandra. Fault tolerance could be improved by adding redundancy to the backend services. Consider a message queue for decoupling services.".to_string(),
            }),
            created_at: now - Duration::days(1),
        },
        Design {
            id: "design_2".to_string(),
            title: "Photo Sharing Service".to_string(),
            draft: DesignDraft {
                problem: "Design a photo sharing service like Instagram.".to_string(),
                requirements: "Users can upload photos, follow other users, see a feed. High availability.".to_string(),
                architecture: "Microservices architecture. Services for user auth, photo upload, feed generation. CDN for images. PostgreSQL for user data. Object storage (S3) for photos.".to_string(),
                decisions: "Microservices for independent scaling. CDN is crucial for low-latency image delivery.".to_string(),
            },
            evaluation: Some(Evaluation {
                score: 9.0,
                feedback: "Excellent choice of microservices and using a CDN. The feed generation logic could be complex; consider a pre-computed feed using a worker service for better performance.".to_string(),
            }),
            created_at: now - Duration::days(2),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        User {
            id: id.into(),
            name: "Ada".into(),
            email: format!("{id}@example.com"),
        }
    }

    fn design(problem: &str) -> Design {
        Design::from_evaluated_draft(
            DesignDraft {
                problem: problem.into(),
                ..DesignDraft::default()
            },
            Evaluation { score: 5.0, feedback: "ok".into() },
        )
    }

    #[test]
    fn add_design_prepends() {
        let mut session = Session::new();
        session.start(user("u1"), demo_designs());
        let d1 = design("first");
        let d2 = design("second");
        session.add_design(d1.clone());
        session.add_design(d2.clone());

        assert_eq!(session.designs()[0], d2);
        assert_eq!(session.designs()[1], d1);
        assert_eq!(session.designs().len(), 4);
        assert_eq!(session.find_design(&d1.id), Some(&d1));
    }

    #[test]
    fn end_then_start_leaves_no_residue() {
        let mut session = Session::new();
        session.start(user("u1"), Vec::new());
        let leftover = design("from u1");
        session.add_design(leftover.clone());

        session.end();
        assert!(!session.is_active());
        assert!(session.designs().is_empty());

        session.start(user("u2"), Vec::new());
        assert_eq!(session.user().map(|u| u.id.as_str()), Some("u2"));
        assert!(session.designs().is_empty());
        assert!(session.find_design(&leftover.id).is_none());
    }

    #[test]
    fn demo_designs_are_newest_first_and_evaluated() {
        let demos = demo_designs();
        assert_eq!(demos.len(), 2);
        assert!(demos[0].created_at > demos[1].created_at);
        assert!(demos.iter().all(|d| d.evaluation.is_some()));
    }
}
