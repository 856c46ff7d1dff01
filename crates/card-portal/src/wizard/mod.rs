//! Three-step credit-card application wizard.
//!
//! Personal details, then employment details, then a review screen that
//! submits both in one call. Steps are validated through [`StepForm`], so the
//! driver below never looks at the concrete step type.

mod review;
mod step;

#[cfg(test)]
mod tests;

pub use review::ReviewSummary;
pub use step::{
    BusinessRuleViolation, CapturedData, EmploymentStep, PersonalStep, StepForm, StepKind,
    MINIMUM_AGE,
};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::api::{ApiError, ApplicationsApi};
use crate::domain::{ApplicationSubmission, SubmissionReceipt};
use crate::error::ErrorSurface;
use crate::session::Route;
use crate::validation::FieldErrors;

pub const SUBMIT_FAILED: &str = "Application submission failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStep {
    PersonalInfo,
    EmploymentInfo,
    Review,
    Submitted(SubmissionReceipt),
}

impl WizardStep {
    pub fn name(&self) -> &'static str {
        match self {
            WizardStep::PersonalInfo => "Personal Information",
            WizardStep::EmploymentInfo => "Employment Details",
            WizardStep::Review => "Review & Submit",
            WizardStep::Submitted(_) => "Submitted",
        }
    }

    /// Position in the progress indicator, 1 through 3.
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::PersonalInfo => 1,
            WizardStep::EmploymentInfo => 2,
            WizardStep::Review | WizardStep::Submitted(_) => 3,
        }
    }

    fn editing(kind: StepKind) -> Self {
        match kind {
            StepKind::Personal => WizardStep::PersonalInfo,
            StepKind::Employment => WizardStep::EmploymentInfo,
        }
    }

    fn after(kind: StepKind) -> Self {
        match kind {
            StepKind::Personal => WizardStep::EmploymentInfo,
            StepKind::Employment => WizardStep::Review,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("cannot {attempted} while on {current}")]
    OutOfOrder {
        attempted: &'static str,
        current: &'static str,
    },
    #[error("please correct the highlighted fields")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Rule(#[from] BusinessRuleViolation),
    #[error("Please accept the terms and conditions")]
    TermsNotAccepted,
    #[error("{0} has not been completed")]
    Incomplete(StepKind),
    #[error("Application submission failed: {0}")]
    Submit(#[source] ApiError),
}

impl WizardError {
    pub fn surface(&self) -> ErrorSurface {
        match self {
            WizardError::Invalid(errors) => ErrorSurface::Inline(errors.clone()),
            WizardError::Submit(ApiError::Unauthorized(_)) => ErrorSurface::Redirect(Route::Login),
            WizardError::Submit(err) => ErrorSurface::Toast(err.user_message(SUBMIT_FAILED)),
            other => ErrorSurface::Toast(other.to_string()),
        }
    }
}

/// State machine for one application attempt. Owned by the screen driving it.
#[derive(Debug, Clone)]
pub struct ApplicationWizard {
    step: WizardStep,
    captured: CapturedData,
    terms_accepted: bool,
}

impl Default for ApplicationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::PersonalInfo,
            captured: CapturedData::default(),
            terms_accepted: false,
        }
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    pub fn captured(&self) -> &CapturedData {
        &self.captured
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.step, WizardStep::Submitted(_))
    }

    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        match &self.step {
            WizardStep::Submitted(receipt) => Some(receipt),
            _ => None,
        }
    }

    /// Draft to prefill the form of step `F`: the captured value if there is one.
    pub fn draft_for<F: StepForm>(&self) -> F::Draft {
        F::lookup(&self.captured)
            .map(F::draft_from)
            .unwrap_or_default()
    }

    /// Validates and captures one step, then advances. Any failure leaves the wizard untouched.
    pub fn submit_step<F: StepForm>(
        &mut self,
        draft: &F::Draft,
        today: NaiveDate,
    ) -> Result<&WizardStep, WizardError> {
        if self.step != WizardStep::editing(F::KIND) {
            return Err(WizardError::OutOfOrder {
                attempted: F::KIND.title(),
                current: self.step.name(),
            });
        }

        let value = F::validate(draft).map_err(|errors| {
            debug!(step = %F::KIND, errors = errors.len(), "step rejected by validation");
            WizardError::Invalid(errors)
        })?;
        F::check_rules(&value, today).map_err(|violation| {
            debug!(step = %F::KIND, rule = %violation, "step rejected by business rule");
            violation
        })?;

        F::capture(&mut self.captured, value);
        self.step = WizardStep::after(F::KIND);
        debug!(step = self.step.name(), "wizard advanced");
        Ok(&self.step)
    }

    /// Steps back one screen. Returns false where there is nowhere to go.
    pub fn back(&mut self) -> bool {
        let previous = match self.step {
            WizardStep::EmploymentInfo => WizardStep::PersonalInfo,
            WizardStep::Review => WizardStep::EmploymentInfo,
            WizardStep::PersonalInfo | WizardStep::Submitted(_) => return false,
        };
        self.step = previous;
        self.terms_accepted = false;
        true
    }

    /// Jumps from the review screen back into one step with its values kept.
    pub fn edit(&mut self, kind: StepKind) -> Result<(), WizardError> {
        if self.step != WizardStep::Review {
            return Err(WizardError::OutOfOrder {
                attempted: "edit a step",
                current: self.step.name(),
            });
        }
        self.step = WizardStep::editing(kind);
        self.terms_accepted = false;
        Ok(())
    }

    /// Acceptance belongs to the current visit of the review screen; leaving it clears the flag.
    pub fn accept_terms(&mut self, accepted: bool) {
        self.terms_accepted = accepted;
    }

    pub fn review(&self) -> Option<ReviewSummary> {
        let personal = self.captured.personal.as_ref()?;
        let employment = self.captured.employment.as_ref()?;
        Some(ReviewSummary::new(personal, employment))
    }

    /// Sends the combined payload exactly once. On failure the wizard stays on
    /// the review screen so the applicant can retry.
    pub async fn submit<A: ApplicationsApi>(
        &mut self,
        api: &A,
    ) -> Result<SubmissionReceipt, WizardError> {
        if self.step != WizardStep::Review {
            return Err(WizardError::OutOfOrder {
                attempted: "submit the application",
                current: self.step.name(),
            });
        }
        if !self.terms_accepted {
            return Err(WizardError::TermsNotAccepted);
        }

        let personal = self
            .captured
            .personal
            .clone()
            .ok_or(WizardError::Incomplete(StepKind::Personal))?;
        let employment = self
            .captured
            .employment
            .clone()
            .ok_or(WizardError::Incomplete(StepKind::Employment))?;
        let submission = ApplicationSubmission::new(personal, employment);

        match api.submit(&submission).await {
            Ok(receipt) => {
                info!(
                    application_number = %receipt.application_number,
                    status = %receipt.status,
                    "application submitted"
                );
                self.step = WizardStep::Submitted(receipt.clone());
                Ok(receipt)
            }
            Err(err) => {
                warn!(error = %err, "application submission failed");
                Err(WizardError::Submit(err))
            }
        }
    }
}
