use std::fmt;

use card_portal::error::{AppError, ErrorSurface};
use card_portal::session::Route;
use card_portal::validation::FieldErrors;
use card_portal::wizard::{ApplicationWizard, EmploymentStep, PersonalStep, StepKind, WizardStep};
use chrono::{Local, NaiveDate};
use inquire::{Confirm, Select};
use tracing::debug;

use crate::context::Portal;
use crate::prompt::{prompt_error, PromptStep};
use crate::render;
use crate::screens::auth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReviewAction {
    Submit,
    EditPersonal,
    EditEmployment,
    Back,
    Cancel,
}

impl ReviewAction {
    const ALL: [ReviewAction; 5] = [
        ReviewAction::Submit,
        ReviewAction::EditPersonal,
        ReviewAction::EditEmployment,
        ReviewAction::Back,
        ReviewAction::Cancel,
    ];
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReviewAction::Submit => "Submit application",
            ReviewAction::EditPersonal => "Edit personal information",
            ReviewAction::EditEmployment => "Edit employment details",
            ReviewAction::Back => "Back",
            ReviewAction::Cancel => "Cancel",
        })
    }
}

pub(crate) async fn run(portal: &mut Portal) -> Result<(), AppError> {
    let mut wizard = ApplicationWizard::new();
    let today = Local::now().date_naive();
    println!("{}", portal.config.app_name);

    loop {
        portal.flush();
        println!("\nStep {} of 3: {}", wizard.step().number(), wizard.step().name());
        match wizard.step() {
            WizardStep::PersonalInfo => fill_step::<PersonalStep>(portal, &mut wizard, today)?,
            WizardStep::EmploymentInfo => fill_step::<EmploymentStep>(portal, &mut wizard, today)?,
            WizardStep::Review => {
                if !review(portal, &mut wizard).await? {
                    return Ok(());
                }
            }
            WizardStep::Submitted(receipt) => {
                println!("{}", render::receipt(receipt));
                println!("Keep your application number to track progress: card-portal track <number>");
                return Ok(());
            }
        }
    }
}

/// Prompts until the step is accepted. Field errors are shown next to the
/// inputs on the next pass; business-rule failures come back as messages.
fn fill_step<F: PromptStep>(
    portal: &mut Portal,
    wizard: &mut ApplicationWizard,
    today: NaiveDate,
) -> Result<(), AppError> {
    let mut draft = wizard.draft_for::<F>();
    let mut errors = FieldErrors::new();

    loop {
        draft = F::prompt(&draft, &errors)?;
        let err = match wizard.submit_step::<F>(&draft, today) {
            Ok(_) => return Ok(()),
            Err(err) => err,
        };

        errors = FieldErrors::new();
        match err.surface() {
            ErrorSurface::Inline(field_errors) => {
                for error in field_errors.iter() {
                    println!("  ✕ {}", error.message);
                }
                errors = field_errors;
            }
            ErrorSurface::Toast(message) => {
                portal.notifications.error(message);
                portal.flush();
            }
            ErrorSurface::Redirect(route) => {
                debug!(%route, "step redirected");
                return Err(err.into());
            }
        }
    }
}

/// Returns false once the applicant leaves the wizard.
async fn review(portal: &mut Portal, wizard: &mut ApplicationWizard) -> Result<bool, AppError> {
    if let Some(summary) = wizard.review() {
        println!("{}", render::review(&summary));
    }

    let action = Select::new("What would you like to do?", ReviewAction::ALL.to_vec())
        .prompt()
        .map_err(prompt_error)?;

    match action {
        ReviewAction::Submit => {
            let accepted = Confirm::new(
                "I agree to the terms and conditions and authorize a credit check",
            )
            .with_default(false)
            .prompt()
            .map_err(prompt_error)?;
            wizard.accept_terms(accepted);
            submit(portal, wizard).await
        }
        ReviewAction::EditPersonal => {
            wizard.edit(StepKind::Personal)?;
            Ok(true)
        }
        ReviewAction::EditEmployment => {
            wizard.edit(StepKind::Employment)?;
            Ok(true)
        }
        ReviewAction::Back => {
            wizard.back();
            Ok(true)
        }
        ReviewAction::Cancel => {
            portal.notifications.info("Application discarded");
            Ok(false)
        }
    }
}

async fn submit(portal: &mut Portal, wizard: &mut ApplicationWizard) -> Result<bool, AppError> {
    let err = match wizard.submit(&portal.api).await {
        Ok(receipt) => {
            portal.notifications.success(format!(
                "Application {} submitted successfully",
                receipt.application_number
            ));
            return Ok(true);
        }
        Err(err) => err,
    };

    match err.surface() {
        ErrorSurface::Redirect(Route::Login) => {
            portal
                .notifications
                .error("Please sign in to submit your application");
            portal.flush();
            let sign_in = Confirm::new("Sign in now? Your answers are kept.")
                .with_default(true)
                .prompt()
                .map_err(prompt_error)?;
            if sign_in {
                auth::login(portal, None).await?;
            }
        }
        ErrorSurface::Toast(message) => {
            portal.notifications.error(message);
        }
        ErrorSurface::Inline(_) | ErrorSurface::Redirect(_) => {
            portal.notifications.error(err.to_string());
        }
    }
    Ok(true)
}
