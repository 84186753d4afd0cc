//! crates/design_review_core/src/wizard.rs
//!
//! The four-step design wizard as an explicit state machine.
//!
//! One `DesignWizard` value lives for one wizard session. It owns the draft,
//! guards every transition, and hands the draft to the evaluator on submit.
//! Submission is split into [`DesignWizard::begin_submit`] and
//! [`DesignWizard::finish_submit`] so a caller that keeps the wizard around
//! while the evaluation is in flight still cannot start a second one.

use crate::domain::{Design, DesignDraft, DraftField, Evaluation};
use crate::evaluator::{EvaluationError, Evaluator};
use tracing::{info, warn};

//=========================================================================================
// Steps and States
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Problem,
    Requirements,
    Architecture,
    Decisions,
}

impl WizardStep {
    pub const COUNT: usize = 4;

    /// 1-based position, for "Step N of 4".
    pub fn number(self) -> usize {
        match self {
            WizardStep::Problem => 1,
            WizardStep::Requirements => 2,
            WizardStep::Architecture => 3,
            WizardStep::Decisions => 4,
        }
    }

    pub fn field(self) -> DraftField {
        match self {
            WizardStep::Problem => DraftField::Problem,
            WizardStep::Requirements => DraftField::Requirements,
            WizardStep::Architecture => DraftField::Architecture,
            WizardStep::Decisions => DraftField::Decisions,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            WizardStep::Problem => Some(WizardStep::Requirements),
            WizardStep::Requirements => Some(WizardStep::Architecture),
            WizardStep::Architecture => Some(WizardStep::Decisions),
            WizardStep::Decisions => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            WizardStep::Problem => None,
            WizardStep::Requirements => Some(WizardStep::Problem),
            WizardStep::Architecture => Some(WizardStep::Requirements),
            WizardStep::Decisions => Some(WizardStep::Architecture),
        }
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Editing(WizardStep),
    /// Waiting on the evaluator. Only reachable from the last step.
    Submitting,
    Completed,
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("The current step must be filled in before continuing")]
    StepIncomplete,
    #[error("This is the first step")]
    NoPreviousStep,
    #[error("Submission is only possible from the last step")]
    NotOnFinalStep,
    #[error("An evaluation is already in progress")]
    AlreadySubmitting,
    #[error("The wizard is not accepting edits")]
    NotEditing,
    #[error("{0}")]
    Evaluation(#[from] EvaluationError),
}

//=========================================================================================
// The Wizard
//=========================================================================================

#[derive(Debug, Clone)]
pub struct DesignWizard {
    state: WizardState,
    draft: DesignDraft,
    error: Option<String>,
}

impl Default for DesignWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl DesignWizard {
    pub fn new() -> Self {
        Self {
            state: WizardState::Editing(WizardStep::Problem),
            draft: DesignDraft::default(),
            error: None,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    /// The step being edited, or `None` outside of editing.
    pub fn step(&self) -> Option<WizardStep> {
        match self.state {
            WizardState::Editing(step) => Some(step),
            _ => None,
        }
    }

    pub fn draft(&self) -> &DesignDraft {
        &self.draft
    }

    /// The message from the last failed submission, cleared on the next attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.state == WizardState::Submitting
    }

    /// Replaces the value of the active step's field.
    pub fn edit(&mut self, value: impl Into<String>) -> Result<(), WizardError> {
        let step = self.step().ok_or(WizardError::NotEditing)?;
        *self.draft.field_mut(step.field()) = value.into();
        Ok(())
    }

    /// Whether `Next` (or `Submit` on the last step) is enabled.
    pub fn can_advance(&self) -> bool {
        self.step()
            .is_some_and(|step| self.draft.is_filled(step.field()))
    }

    pub fn can_go_back(&self) -> bool {
        self.step().and_then(WizardStep::previous).is_some()
    }

    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.step().ok_or(WizardError::NotEditing)?;
        let next = step.next().ok_or(WizardError::NotOnFinalStep)?;
        if !self.can_advance() {
            return Err(WizardError::StepIncomplete);
        }
        self.state = WizardState::Editing(next);
        Ok(next)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.step().ok_or(WizardError::NotEditing)?;
        let previous = step.previous().ok_or(WizardError::NoPreviousStep)?;
        self.state = WizardState::Editing(previous);
        Ok(previous)
    }

    /// Abandons the wizard and drops the draft. Not allowed while submitting.
    pub fn cancel(&mut self) -> Result<(), WizardError> {
        match self.state {
            WizardState::Editing(_) => {
                self.state = WizardState::Cancelled;
                self.draft = DesignDraft::default();
                self.error = None;
                Ok(())
            }
            WizardState::Submitting => Err(WizardError::AlreadySubmitting),
            WizardState::Completed | WizardState::Cancelled => Err(WizardError::NotEditing),
        }
    }

    /// Moves from the last step into `Submitting` and returns the draft to evaluate.
    pub fn begin_submit(&mut self) -> Result<DesignDraft, WizardError> {
        match self.state {
            WizardState::Submitting => {
                warn!("Ignoring submit while an evaluation is in flight");
                Err(WizardError::AlreadySubmitting)
            }
            WizardState::Editing(step) if step.is_last() => {
                if !self.can_advance() {
                    return Err(WizardError::StepIncomplete);
                }
                self.state = WizardState::Submitting;
                self.error = None;
                Ok(self.draft.clone())
            }
            WizardState::Editing(_) => Err(WizardError::NotOnFinalStep),
            WizardState::Completed | WizardState::Cancelled => Err(WizardError::NotEditing),
        }
    }

    /// Applies the evaluator's outcome.
    ///
    /// Success consumes the draft into a new `Design` and completes the wizard.
    /// Failure returns to the last step with the draft untouched and the
    /// user-facing message recorded.
    pub fn finish_submit(
        &mut self,
        outcome: Result<Evaluation, EvaluationError>,
    ) -> Result<Design, WizardError> {
        if self.state != WizardState::Submitting {
            return Err(WizardError::NotEditing);
        }

        match outcome {
            Ok(evaluation) => {
                let draft = std::mem::take(&mut self.draft);
                self.state = WizardState::Completed;
                let design = Design::from_evaluated_draft(draft, evaluation);
                info!("Wizard completed design {}", design.id);
                Ok(design)
            }
            Err(e) => {
                self.state = WizardState::Editing(WizardStep::Decisions);
                self.error = Some(e.user_message().to_string());
                Err(WizardError::Evaluation(e))
            }
        }
    }

    /// Runs the whole submission against `evaluator`.
    pub async fn submit(&mut self, evaluator: &Evaluator) -> Result<Design, WizardError> {
        let draft = self.begin_submit()?;
        let outcome = evaluator.evaluate(&draft).await;
        self.finish_submit(outcome)
    }
}
