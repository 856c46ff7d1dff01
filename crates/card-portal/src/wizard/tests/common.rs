use std::sync::Mutex;

use chrono::{NaiveDate, TimeZone, Utc};

use crate::api::{ApiError, ApplicationsApi};
use crate::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationSubmission, EmploymentType,
    StatusUpdate, SubmissionReceipt,
};
use crate::validation::{EmploymentInfoDraft, PersonalInfoDraft};
use crate::wizard::{ApplicationWizard, EmploymentStep, PersonalStep};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn personal_draft() -> PersonalInfoDraft {
    PersonalInfoDraft {
        full_name: "Asha Verma".to_string(),
        date_of_birth: "1990-04-12".to_string(),
        email: "asha@example.com".to_string(),
        phone: "9876543210".to_string(),
        pan_card: "ABCDE1234F".to_string(),
        street: "12 MG Road".to_string(),
        city: "Pune".to_string(),
        state: "Maharashtra".to_string(),
        pincode: "411001".to_string(),
    }
}

pub(super) fn employment_draft() -> EmploymentInfoDraft {
    EmploymentInfoDraft {
        employment_type: Some(EmploymentType::Salaried),
        annual_income: "450000".to_string(),
        company_name: "Acme Tools".to_string(),
        designation: "Engineer".to_string(),
    }
}

/// Wizard parked on the review screen with both steps captured.
pub(super) fn wizard_at_review() -> ApplicationWizard {
    let mut wizard = ApplicationWizard::new();
    wizard
        .submit_step::<PersonalStep>(&personal_draft(), today())
        .expect("personal step accepted");
    wizard
        .submit_step::<EmploymentStep>(&employment_draft(), today())
        .expect("employment step accepted");
    wizard
}

pub(super) fn receipt() -> SubmissionReceipt {
    SubmissionReceipt {
        application_number: "CC2025000123".to_string(),
        status: ApplicationStatus::Pending,
        credit_info: None,
        submitted_at: Utc
            .with_ymd_and_hms(2025, 6, 15, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
    }
}

/// Records submissions; fails the next call when a failure is queued.
#[derive(Default)]
pub(super) struct RecordingApi {
    submissions: Mutex<Vec<ApplicationSubmission>>,
    next_failure: Mutex<Option<ApiError>>,
}

impl RecordingApi {
    pub(super) fn failing_once(err: ApiError) -> Self {
        Self {
            next_failure: Mutex::new(Some(err)),
            ..Self::default()
        }
    }

    pub(super) fn submissions(&self) -> Vec<ApplicationSubmission> {
        self.submissions.lock().expect("submissions mutex").clone()
    }
}

impl ApplicationsApi for RecordingApi {
    async fn my_applications(&self) -> Result<Vec<Application>, ApiError> {
        Ok(Vec::new())
    }

    async fn application(&self, id: &ApplicationId) -> Result<Application, ApiError> {
        Err(ApiError::NotFound(format!("Application {id} not found")))
    }

    async fn track(&self, application_number: &str) -> Result<Application, ApiError> {
        Err(ApiError::NotFound(format!(
            "Application {application_number} not found"
        )))
    }

    async fn submit(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<SubmissionReceipt, ApiError> {
        self.submissions
            .lock()
            .expect("submissions mutex")
            .push(submission.clone());
        match self.next_failure.lock().expect("failure mutex").take() {
            Some(err) => Err(err),
            None => Ok(receipt()),
        }
    }

    async fn all_applications(&self) -> Result<Vec<Application>, ApiError> {
        Err(ApiError::Forbidden)
    }

    async fn update_status(
        &self,
        _id: &ApplicationId,
        _update: &StatusUpdate,
    ) -> Result<(), ApiError> {
        Err(ApiError::Forbidden)
    }
}
