use super::common::*;
use crate::api::ApiError;
use crate::domain::{ApplicationStatus, EmploymentType};
use crate::error::ErrorSurface;
use crate::session::Route;
use crate::wizard::{
    ApplicationWizard, EmploymentStep, PersonalStep, StepKind, WizardError, WizardStep,
};

#[tokio::test]
async fn full_flow_submits_exactly_once() {
    let api = RecordingApi::default();
    let mut wizard = wizard_at_review();
    wizard.accept_terms(true);

    let receipt = wizard.submit(&api).await.expect("submission succeeds");
    assert_eq!(receipt.application_number, "CC2025000123");
    assert_eq!(receipt.status, ApplicationStatus::Pending);
    assert!(wizard.is_submitted());
    assert_eq!(wizard.receipt(), Some(&receipt));

    let submissions = api.submissions();
    assert_eq!(submissions.len(), 1);
    let sent = &submissions[0];
    assert_eq!(sent.personal_info.full_name, "Asha Verma");
    assert_eq!(sent.personal_info.pan_card, "ABCDE1234F");
    assert_eq!(sent.employment_info.employment_type, EmploymentType::Salaried);
    assert_eq!(sent.employment_info.annual_income, 450_000);
}

#[tokio::test]
async fn submitted_wizard_accepts_no_further_transitions() {
    let api = RecordingApi::default();
    let mut wizard = wizard_at_review();
    wizard.accept_terms(true);
    wizard.submit(&api).await.expect("submission succeeds");

    assert!(!wizard.back());
    assert!(wizard.edit(StepKind::Personal).is_err());
    assert!(matches!(
        wizard.submit(&api).await,
        Err(WizardError::OutOfOrder { .. })
    ));
    assert!(matches!(
        wizard.submit_step::<PersonalStep>(&personal_draft(), today()),
        Err(WizardError::OutOfOrder { .. })
    ));
    assert_eq!(api.submissions().len(), 1);
}

#[tokio::test]
async fn terms_must_be_accepted_before_any_call() {
    let api = RecordingApi::default();
    let mut wizard = wizard_at_review();

    let err = wizard.submit(&api).await.expect_err("terms missing");
    assert!(matches!(err, WizardError::TermsNotAccepted));
    assert_eq!(
        err.surface(),
        ErrorSurface::Toast("Please accept the terms and conditions".to_string())
    );
    assert!(api.submissions().is_empty());
    assert_eq!(wizard.step(), &WizardStep::Review);
}

#[tokio::test]
async fn failed_submission_stays_on_review_and_can_be_retried() {
    let api = RecordingApi::failing_once(ApiError::Rejected {
        status: 400,
        code: Some("DUPLICATE_APPLICATION".to_string()),
        message: "You already have a pending application".to_string(),
    });
    let mut wizard = wizard_at_review();
    wizard.accept_terms(true);

    let err = wizard.submit(&api).await.expect_err("first attempt fails");
    assert_eq!(
        err.surface(),
        ErrorSurface::Toast("You already have a pending application".to_string())
    );
    assert_eq!(wizard.step(), &WizardStep::Review);
    assert!(wizard.captured().personal.is_some());

    wizard.submit(&api).await.expect("retry succeeds");
    assert!(wizard.is_submitted());
    assert_eq!(api.submissions().len(), 2);
}

#[tokio::test]
async fn expired_session_during_submit_redirects_to_login() {
    let api = RecordingApi::failing_once(ApiError::Unauthorized(None));
    let mut wizard = wizard_at_review();
    wizard.accept_terms(true);

    let err = wizard.submit(&api).await.expect_err("unauthorized");
    assert_eq!(err.surface(), ErrorSurface::Redirect(Route::Login));
    assert_eq!(wizard.step(), &WizardStep::Review);
}

#[tokio::test]
async fn submit_before_review_is_out_of_order() {
    let api = RecordingApi::default();
    let mut wizard = ApplicationWizard::new();
    wizard.accept_terms(true);
    assert!(matches!(
        wizard.submit(&api).await,
        Err(WizardError::OutOfOrder { .. })
    ));
    assert!(api.submissions().is_empty());
}

#[tokio::test]
async fn leaving_review_withdraws_terms_acceptance() {
    let api = RecordingApi::default();
    let mut wizard = wizard_at_review();
    wizard.accept_terms(true);

    wizard.edit(StepKind::Personal).expect("edit from review");
    assert!(!wizard.terms_accepted());
    wizard
        .submit_step::<PersonalStep>(&personal_draft(), today())
        .expect("personal accepted");
    wizard
        .submit_step::<EmploymentStep>(&employment_draft(), today())
        .expect("employment accepted");
    assert_eq!(wizard.step(), &WizardStep::Review);

    let err = wizard.submit(&api).await.expect_err("terms not accepted again");
    assert!(matches!(err, WizardError::TermsNotAccepted));
    assert!(api.submissions().is_empty());

    wizard.accept_terms(true);
    assert!(wizard.back());
    assert!(!wizard.terms_accepted());
    wizard
        .submit_step::<EmploymentStep>(&employment_draft(), today())
        .expect("employment accepted");
    assert!(matches!(
        wizard.submit(&api).await,
        Err(WizardError::TermsNotAccepted)
    ));

    wizard.accept_terms(true);
    wizard.submit(&api).await.expect("accepted on this visit");
    assert_eq!(api.submissions().len(), 1);
}
