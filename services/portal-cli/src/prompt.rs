use card_portal::domain::EmploymentType;
use card_portal::error::AppError;
use card_portal::validation::{EmploymentInfoDraft, FieldErrors, PersonalInfoDraft};
use card_portal::wizard::{EmploymentStep, PersonalStep, StepForm};
use chrono::{Local, NaiveDate};
use inquire::{DateSelect, InquireError, Select, Text};

const DEFAULT_BIRTH_DATE: (i32, u32, u32) = (1995, 1, 1);

/// Terminal half of a wizard step: asks for a draft, prefilled with `draft`
/// and annotated with the errors of the previous attempt.
pub(crate) trait PromptStep: StepForm {
    fn prompt(draft: &Self::Draft, errors: &FieldErrors) -> Result<Self::Draft, AppError>;
}

pub(crate) fn prompt_error(err: InquireError) -> AppError {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => AppError::Cancelled,
        InquireError::IO(err) => AppError::Io(err),
        other => AppError::Prompt(other.to_string()),
    }
}

fn text(label: &str, current: &str, error: Option<&str>) -> Result<String, AppError> {
    let mut prompt = Text::new(label).with_initial_value(current);
    if let Some(message) = error {
        prompt = prompt.with_help_message(message);
    }
    prompt.prompt().map_err(prompt_error)
}

fn date(label: &str, current: &str, error: Option<&str>) -> Result<String, AppError> {
    let today = Local::now().date_naive();
    let (year, month, day) = DEFAULT_BIRTH_DATE;
    let starting = NaiveDate::parse_from_str(current, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::from_ymd_opt(year, month, day))
        .unwrap_or(today);

    let mut prompt = DateSelect::new(label)
        .with_default(starting)
        .with_max_date(today);
    if let Some(message) = error {
        prompt = prompt.with_help_message(message);
    }
    let picked = prompt.prompt().map_err(prompt_error)?;
    Ok(picked.format("%Y-%m-%d").to_string())
}

impl PromptStep for PersonalStep {
    fn prompt(draft: &PersonalInfoDraft, errors: &FieldErrors) -> Result<PersonalInfoDraft, AppError> {
        Ok(PersonalInfoDraft {
            full_name: text("Full name:", &draft.full_name, errors.get("fullName"))?,
            date_of_birth: date(
                "Date of birth:",
                &draft.date_of_birth,
                errors.get("dateOfBirth"),
            )?,
            email: text("Email:", &draft.email, errors.get("email"))?,
            phone: text(
                "Phone (10 digits, +91 optional):",
                &draft.phone,
                errors.get("phone"),
            )?,
            pan_card: text("PAN card:", &draft.pan_card, errors.get("panCard"))?.to_uppercase(),
            street: text("Street address:", &draft.street, errors.get("street"))?,
            city: text("City:", &draft.city, errors.get("city"))?,
            state: text("State:", &draft.state, errors.get("state"))?,
            pincode: text("Pincode:", &draft.pincode, errors.get("pincode"))?,
        })
    }
}

impl PromptStep for EmploymentStep {
    fn prompt(
        draft: &EmploymentInfoDraft,
        errors: &FieldErrors,
    ) -> Result<EmploymentInfoDraft, AppError> {
        let cursor = draft
            .employment_type
            .and_then(|current| EmploymentType::ALL.iter().position(|kind| *kind == current))
            .unwrap_or(0);
        let mut select = Select::new("Employment type:", EmploymentType::ALL.to_vec())
            .with_starting_cursor(cursor);
        if let Some(message) = errors.get("employmentType") {
            select = select.with_help_message(message);
        }
        let employment_type = select.prompt().map_err(prompt_error)?;

        Ok(EmploymentInfoDraft {
            employment_type: Some(employment_type),
            annual_income: text(
                "Annual income (₹):",
                &draft.annual_income,
                errors.get("annualIncome"),
            )?,
            company_name: text("Company name:", &draft.company_name, errors.get("companyName"))?,
            designation: text("Designation:", &draft.designation, errors.get("designation"))?,
        })
    }
}
