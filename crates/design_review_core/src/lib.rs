pub mod auth;
pub mod credentials;
pub mod domain;
pub mod evaluator;
pub mod export;
pub mod memory;
pub mod ports;
pub mod registry;
pub mod wizard;

pub use auth::{AuthError, AuthForm, AuthMode, FieldErrors};
pub use credentials::CredentialStore;
pub use domain::{Design, DesignDraft, DraftField, Evaluation, ScoreBand, User, UserRecord};
pub use evaluator::{EvaluationError, Evaluator};
pub use memory::MemoryKvStore;
pub use ports::{KeyValueStore, PortError, PortResult, TextGenerationService};
pub use registry::Session;
pub use wizard::{DesignWizard, WizardError, WizardState, WizardStep};
