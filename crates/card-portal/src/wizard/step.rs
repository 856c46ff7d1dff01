use std::fmt;

use chrono::NaiveDate;

use crate::domain::{EmploymentInfo, PersonalInfo};
use crate::validation::{
    calculate_age, validate_employment, validate_personal, EmploymentInfoDraft, FieldErrors,
    PersonalInfoDraft,
};

pub const MINIMUM_AGE: i32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Personal,
    Employment,
}

impl StepKind {
    pub const fn title(self) -> &'static str {
        match self {
            StepKind::Personal => "Personal Information",
            StepKind::Employment => "Employment Details",
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            StepKind::Personal => 1,
            StepKind::Employment => 2,
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A rule that holds across fields and is reported as a toast instead of inline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BusinessRuleViolation {
    pub message: String,
}

impl BusinessRuleViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Values accepted so far. Each step owns exactly one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedData {
    pub personal: Option<PersonalInfo>,
    pub employment: Option<EmploymentInfo>,
}

/// Validation half of one wizard step. The wizard only ever talks to steps through this.
pub trait StepForm {
    type Draft: Clone + Default + fmt::Debug;
    type Value: Clone + fmt::Debug;

    const KIND: StepKind;

    fn validate(draft: &Self::Draft) -> Result<Self::Value, FieldErrors>;

    fn check_rules(_value: &Self::Value, _today: NaiveDate) -> Result<(), BusinessRuleViolation> {
        Ok(())
    }

    fn draft_from(value: &Self::Value) -> Self::Draft;

    fn lookup(data: &CapturedData) -> Option<&Self::Value>;

    fn capture(data: &mut CapturedData, value: Self::Value);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PersonalStep;

impl StepForm for PersonalStep {
    type Draft = PersonalInfoDraft;
    type Value = PersonalInfo;

    const KIND: StepKind = StepKind::Personal;

    fn validate(draft: &Self::Draft) -> Result<Self::Value, FieldErrors> {
        validate_personal(draft)
    }

    fn check_rules(value: &Self::Value, today: NaiveDate) -> Result<(), BusinessRuleViolation> {
        if calculate_age(value.date_of_birth, today) < MINIMUM_AGE {
            return Err(BusinessRuleViolation::new(
                "You must be at least 18 years old to apply",
            ));
        }
        Ok(())
    }

    fn draft_from(value: &Self::Value) -> Self::Draft {
        PersonalInfoDraft::from(value)
    }

    fn lookup(data: &CapturedData) -> Option<&Self::Value> {
        data.personal.as_ref()
    }

    fn capture(data: &mut CapturedData, value: Self::Value) {
        data.personal = Some(value);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmploymentStep;

impl StepForm for EmploymentStep {
    type Draft = EmploymentInfoDraft;
    type Value = EmploymentInfo;

    const KIND: StepKind = StepKind::Employment;

    fn validate(draft: &Self::Draft) -> Result<Self::Value, FieldErrors> {
        validate_employment(draft)
    }

    fn draft_from(value: &Self::Value) -> Self::Draft {
        EmploymentInfoDraft::from(value)
    }

    fn lookup(data: &CapturedData) -> Option<&Self::Value> {
        data.employment.as_ref()
    }

    fn capture(data: &mut CapturedData, value: Self::Value) {
        data.employment = Some(value);
    }
}
