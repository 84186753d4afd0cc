//! crates/design_review_core/src/auth.rs
//!
//! Login and signup form handling: field validation followed by the identity
//! check against the credential store.

use crate::credentials::CredentialStore;
use crate::domain::UserRecord;
use crate::ports::PortError;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{info, warn};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";
pub const DUPLICATE_ACCOUNT_MESSAGE: &str = "An account with this email already exists.";

/// Characters that satisfy the signup special-character rule.
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*";
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const NAME_MIN_CHARS: usize = 3;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // local@domain.tld with no whitespace in any part
    PATTERN.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

//=========================================================================================
// Errors
//=========================================================================================

/// Per-field validation messages. A `None` field passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.confirm_password.is_none()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("One or more fields are invalid")]
    Validation(FieldErrors),
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("An account with this email already exists.")]
    DuplicateAccount,
    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

//=========================================================================================
// The Form
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

/// The state of the auth form: the active mode, the raw field values, and
/// whatever errors the last submission produced.
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    errors: FieldErrors,
    auth_error: Option<String>,
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The form-level error from the last submission, if any.
    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    /// Switches between login and signup, clearing every value and error.
    pub fn switch_mode(&mut self, mode: AuthMode) {
        *self = Self::new(mode);
    }

    /// Checks every rule for the current mode and reports all violations at once.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let signup = self.mode == AuthMode::Signup;
        let mut errors = FieldErrors::default();

        if signup && self.name.trim().chars().count() < NAME_MIN_CHARS {
            errors.name = Some("Name must be at least 3 characters long.".to_string());
        }

        if self.email.trim().is_empty() {
            errors.email = Some("Email address is required.".to_string());
        } else if !email_pattern().is_match(&self.email) {
            errors.email = Some("Please enter a valid email address.".to_string());
        }

        if self.password.is_empty() {
            errors.password = Some("Password is required.".to_string());
        } else if signup && !is_strong_password(&self.password) {
            errors.password = Some(
                "Must be 8+ chars, with uppercase, lowercase, number, & special character."
                    .to_string(),
            );
        }

        if signup && self.password != self.confirm_password {
            errors.confirm_password = Some("Passwords do not match.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates the form and, if it passes, logs in or signs up.
    ///
    /// Errors are recorded on the form for display as well as returned. The
    /// store is not touched when validation fails.
    pub fn submit(&mut self, store: &CredentialStore) -> Result<UserRecord, AuthError> {
        self.auth_error = None;
        self.errors = FieldErrors::default();

        if let Err(errors) = self.validate() {
            self.errors = errors.clone();
            return Err(AuthError::Validation(errors));
        }

        let result = match self.mode {
            AuthMode::Login => login(store, &self.email, &self.password),
            AuthMode::Signup => signup(store, &self.name, &self.email, &self.password),
        };

        if let Err(e) = &result {
            self.auth_error = Some(e.to_string());
        }
        result
    }
}

/// Length of at least eight plus one each of lowercase, uppercase, digit, and
/// a character from [`PASSWORD_SPECIAL_CHARS`].
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_CHARS
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c))
}

//=========================================================================================
// Identity checks
//=========================================================================================

/// Unknown email and wrong password produce the same error.
pub fn login(store: &CredentialStore, email: &str, password: &str) -> Result<UserRecord, AuthError> {
    match store.find_by_email(email) {
        Some(user) if user.password == password => {
            info!("User {} logged in", user.id);
            Ok(user)
        }
        _ => {
            warn!("Rejected login attempt");
            Err(AuthError::InvalidCredentials)
        }
    }
}

pub fn signup(
    store: &CredentialStore,
    name: &str,
    email: &str,
    password: &str,
) -> Result<UserRecord, AuthError> {
    if store.lookup_email(email)?.is_some() {
        return Err(AuthError::DuplicateAccount);
    }
    let user = store.create(name, email, password)?;
    info!("Created account {}", user.id);
    Ok(user)
}
