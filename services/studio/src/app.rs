//! services/studio/src/app.rs
//!
//! The application controller. Owns the session, the auth form, and the
//! wizard for the current view, and routes user actions between them.

use design_review_core::{
    auth::{AuthError, AuthForm, AuthMode},
    credentials::CredentialStore,
    domain::{Design, UserRecord},
    evaluator::Evaluator,
    export,
    registry::{demo_designs, Session},
    wizard::{DesignWizard, WizardError},
};
use tracing::{info, warn};

/// The top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Auth,
    Dashboard,
    Wizard,
}

pub struct App {
    credentials: CredentialStore,
    evaluator: Evaluator,
    session: Session,
    view: View,
    auth_form: AuthForm,
    wizard: Option<DesignWizard>,
    selected_design: Option<String>,
}

impl App {
    pub fn new(credentials: CredentialStore, evaluator: Evaluator) -> Self {
        Self {
            credentials,
            evaluator,
            session: Session::new(),
            view: View::Auth,
            auth_form: AuthForm::default(),
            wizard: None,
            selected_design: None,
        }
    }

    /// Resumes a persisted session, if one exists. Returns whether it did.
    pub fn restore(&mut self) -> bool {
        match self.credentials.load_session_user() {
            Some(user) => {
                info!("Restored session for user {}", user.id);
                self.session.start(user, demo_designs());
                self.view = View::Dashboard;
                true
            }
            None => false,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    //=====================================================================================
    // Auth
    //=====================================================================================

    pub fn auth_form(&self) -> &AuthForm {
        &self.auth_form
    }

    pub fn auth_form_mut(&mut self) -> &mut AuthForm {
        &mut self.auth_form
    }

    pub fn switch_auth_mode(&mut self, mode: AuthMode) {
        self.auth_form.switch_mode(mode);
    }

    /// Submits the auth form and, on success, signs the user in.
    ///
    /// If a new account was created but the identity could not be persisted,
    /// the form moves to login mode with the email kept, since the account
    /// now exists.
    pub fn submit_auth(&mut self) -> Result<(), AuthError> {
        let record = self.auth_form.submit(&self.credentials)?;
        if let Err(e) = self.sign_in(&record) {
            warn!("Sign-in for user {} failed: {}", record.id, e);
            if self.auth_form.mode() == AuthMode::Signup {
                self.auth_form.switch_mode(AuthMode::Login);
                self.auth_form.email = record.email;
            }
            return Err(e);
        }
        self.auth_form = AuthForm::default();
        Ok(())
    }

    /// Persists the sanitized identity first; the in-memory session only
    /// starts once that write has succeeded.
    fn sign_in(&mut self, record: &UserRecord) -> Result<(), AuthError> {
        let user = record.sanitized();
        self.credentials.save_session_user(&user)?;
        self.session.start(user, demo_designs());
        self.wizard = None;
        self.selected_design = None;
        self.view = View::Dashboard;
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.credentials.clear_session_user() {
            warn!("Failed to clear persisted session: {}", e);
        }
        self.session.end();
        self.wizard = None;
        self.selected_design = None;
        self.auth_form = AuthForm::default();
        self.view = View::Auth;
    }

    //=====================================================================================
    // Wizard
    //=====================================================================================

    /// Opens a fresh wizard. Only meaningful from the dashboard.
    pub fn new_design(&mut self) -> bool {
        if self.view != View::Dashboard {
            return false;
        }
        self.wizard = Some(DesignWizard::new());
        self.selected_design = None;
        self.view = View::Wizard;
        true
    }

    pub fn wizard(&self) -> Option<&DesignWizard> {
        self.wizard.as_ref()
    }

    pub fn wizard_mut(&mut self) -> Option<&mut DesignWizard> {
        self.wizard.as_mut()
    }

    pub fn cancel_wizard(&mut self) -> Result<(), WizardError> {
        let wizard = self.wizard.as_mut().ok_or(WizardError::NotEditing)?;
        wizard.cancel()?;
        self.wizard = None;
        self.view = View::Dashboard;
        Ok(())
    }

    /// Evaluates the wizard's draft. On success the new design is added to
    /// the session and the dashboard is shown; on failure the wizard stays
    /// open on its last step.
    pub async fn submit_wizard(&mut self) -> Result<Design, WizardError> {
        let wizard = self.wizard.as_mut().ok_or(WizardError::NotEditing)?;
        let design = wizard.submit(&self.evaluator).await?;

        self.session.add_design(design.clone());
        self.wizard = None;
        self.view = View::Dashboard;
        Ok(design)
    }

    //=====================================================================================
    // Details
    //=====================================================================================

    pub fn select_design(&mut self, id: &str) -> Option<&Design> {
        let design = self.session.find_design(id)?;
        self.selected_design = Some(design.id.clone());
        Some(design)
    }

    pub fn close_details(&mut self) {
        self.selected_design = None;
    }

    pub fn selected_design(&self) -> Option<&Design> {
        self.selected_design
            .as_deref()
            .and_then(|id| self.session.find_design(id))
    }

    /// The Markdown export of the selected design.
    pub fn export_selected(&self) -> Option<String> {
        self.selected_design().map(export::to_markdown)
    }
}
