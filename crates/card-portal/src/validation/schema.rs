use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::rules::{validate_email, validate_pan, validate_phone, validate_pincode};
use crate::domain::{Address, EmploymentInfo, EmploymentType, PersonalInfo};

pub const MAX_ANNUAL_INCOME: u64 = 100_000_000;

/// Single inline message keyed by the wire name of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every schema failure of one submit attempt, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First message recorded for `field`, used to render it next to the input.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Raw personal-details input as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalInfoDraft {
    pub full_name: String,
    pub date_of_birth: String,
    pub email: String,
    pub phone: String,
    pub pan_card: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl From<&PersonalInfo> for PersonalInfoDraft {
    fn from(info: &PersonalInfo) -> Self {
        Self {
            full_name: info.full_name.clone(),
            date_of_birth: info.date_of_birth.format("%Y-%m-%d").to_string(),
            email: info.email.clone(),
            phone: info.phone.clone(),
            pan_card: info.pan_card.clone(),
            street: info.address.street.clone(),
            city: info.address.city.clone(),
            state: info.address.state.clone(),
            pincode: info.address.pincode.clone(),
        }
    }
}

/// Raw employment input; the income stays text until it parses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmploymentInfoDraft {
    pub employment_type: Option<EmploymentType>,
    pub annual_income: String,
    pub company_name: String,
    pub designation: String,
}

impl From<&EmploymentInfo> for EmploymentInfoDraft {
    fn from(info: &EmploymentInfo) -> Self {
        Self {
            employment_type: Some(info.employment_type),
            annual_income: info.annual_income.to_string(),
            company_name: info.company_name.clone(),
            designation: info.designation.clone(),
        }
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn validate_personal(draft: &PersonalInfoDraft) -> Result<PersonalInfo, FieldErrors> {
    let mut errors = FieldErrors::new();

    let full_name = draft.full_name.trim();
    if char_len(full_name) < 2 {
        errors.push("fullName", "Name must be at least 2 characters");
    } else if char_len(full_name) > 100 {
        errors.push("fullName", "Name must be at most 100 characters");
    }

    let raw_dob = draft.date_of_birth.trim();
    let date_of_birth = if raw_dob.is_empty() {
        errors.push("dateOfBirth", "Date of birth is required");
        None
    } else {
        match NaiveDate::parse_from_str(raw_dob, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push("dateOfBirth", "Enter a valid date (YYYY-MM-DD)");
                None
            }
        }
    };

    let email = draft.email.trim();
    if !validate_email(email) {
        errors.push("email", "Invalid email address");
    }

    let phone = draft.phone.trim();
    if !validate_phone(phone) {
        errors.push("phone", "Invalid phone number");
    }

    let pan_card = draft.pan_card.trim();
    if !validate_pan(pan_card) {
        errors.push("panCard", "Invalid PAN card format (e.g., ABCDE1234F)");
    }

    let street = draft.street.trim();
    if char_len(street) < 5 {
        errors.push("street", "Street address must be at least 5 characters");
    }

    let city = draft.city.trim();
    if char_len(city) < 2 {
        errors.push("city", "City is required");
    }

    let state = draft.state.trim();
    if state.is_empty() {
        errors.push("state", "State is required");
    }

    let pincode = draft.pincode.trim();
    if !validate_pincode(pincode) {
        errors.push("pincode", "Invalid pincode");
    }

    match date_of_birth {
        Some(date_of_birth) if errors.is_empty() => Ok(PersonalInfo {
            full_name: full_name.to_string(),
            date_of_birth,
            email: email.to_string(),
            phone: phone.to_string(),
            pan_card: pan_card.to_string(),
            address: Address {
                street: street.to_string(),
                city: city.to_string(),
                state: state.to_string(),
                pincode: pincode.to_string(),
            },
        }),
        _ => Err(errors),
    }
}

pub fn validate_employment(draft: &EmploymentInfoDraft) -> Result<EmploymentInfo, FieldErrors> {
    let mut errors = FieldErrors::new();

    if draft.employment_type.is_none() {
        errors.push("employmentType", "Select an employment type");
    }

    let raw_income = draft.annual_income.trim().replace(',', "");
    let annual_income = match raw_income.parse::<i64>() {
        Ok(income) if income < 0 => {
            errors.push("annualIncome", "Income must be positive");
            0
        }
        Ok(income) if income as u64 > MAX_ANNUAL_INCOME => {
            errors.push(
                "annualIncome",
                format!("Income must not exceed {MAX_ANNUAL_INCOME}"),
            );
            0
        }
        Ok(income) => income as u64,
        Err(_) => {
            errors.push("annualIncome", "Annual income must be a number");
            0
        }
    };

    let company_name = draft.company_name.trim();
    if char_len(company_name) < 2 {
        errors.push("companyName", "Company name must be at least 2 characters");
    }

    let designation = draft.designation.trim();
    if char_len(designation) < 2 {
        errors.push("designation", "Designation must be at least 2 characters");
    }

    match draft.employment_type {
        Some(employment_type) if errors.is_empty() => Ok(EmploymentInfo {
            employment_type,
            annual_income,
            company_name: company_name.to_string(),
            designation: designation.to_string(),
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personal_draft() -> PersonalInfoDraft {
        PersonalInfoDraft {
            full_name: "Asha Verma".to_string(),
            date_of_birth: "1990-04-12".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+919876543210".to_string(),
            pan_card: "ABCDE1234F".to_string(),
            street: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            pincode: "411001".to_string(),
        }
    }

    fn employment_draft() -> EmploymentInfoDraft {
        EmploymentInfoDraft {
            employment_type: Some(EmploymentType::Salaried),
            annual_income: "450000".to_string(),
            company_name: "Acme Tools".to_string(),
            designation: "Engineer".to_string(),
        }
    }

    #[test]
    fn personal_draft_validates_and_trims() {
        let mut draft = personal_draft();
        draft.full_name = "  Asha Verma ".to_string();
        let info = validate_personal(&draft).expect("valid draft");
        assert_eq!(info.full_name, "Asha Verma");
        assert_eq!(
            info.date_of_birth,
            NaiveDate::from_ymd_opt(1990, 4, 12).expect("valid")
        );
        assert_eq!(info.address.pincode, "411001");
    }

    #[test]
    fn personal_errors_are_reported_per_field() {
        let draft = PersonalInfoDraft {
            full_name: "A".to_string(),
            pan_card: "abcde1234f".to_string(),
            pincode: "012345".to_string(),
            ..personal_draft()
        };

        let errors = validate_personal(&draft).expect_err("invalid draft");
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.get("fullName"),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(
            errors.get("panCard"),
            Some("Invalid PAN card format (e.g., ABCDE1234F)")
        );
        assert_eq!(errors.get("pincode"), Some("Invalid pincode"));
        assert_eq!(errors.get("email"), None);
    }

    #[test]
    fn empty_personal_draft_flags_every_field() {
        let errors = validate_personal(&PersonalInfoDraft::default()).expect_err("empty draft");
        for field in [
            "fullName",
            "dateOfBirth",
            "email",
            "phone",
            "panCard",
            "street",
            "city",
            "state",
            "pincode",
        ] {
            assert!(errors.get(field).is_some(), "missing error for {field}");
        }
        assert_eq!(errors.get("dateOfBirth"), Some("Date of birth is required"));
    }

    #[test]
    fn malformed_date_of_birth_is_rejected() {
        let draft = PersonalInfoDraft {
            date_of_birth: "12/04/1990".to_string(),
            ..personal_draft()
        };
        let errors = validate_personal(&draft).expect_err("bad date");
        assert_eq!(
            errors.get("dateOfBirth"),
            Some("Enter a valid date (YYYY-MM-DD)")
        );
    }

    #[test]
    fn employment_draft_validates() {
        let info = validate_employment(&employment_draft()).expect("valid draft");
        assert_eq!(info.annual_income, 450_000);
        assert_eq!(info.employment_type, EmploymentType::Salaried);
    }

    #[test]
    fn employment_income_bounds_are_enforced() {
        let negative = EmploymentInfoDraft {
            annual_income: "-1".to_string(),
            ..employment_draft()
        };
        assert_eq!(
            validate_employment(&negative)
                .expect_err("negative")
                .get("annualIncome"),
            Some("Income must be positive")
        );

        let too_large = EmploymentInfoDraft {
            annual_income: "100000001".to_string(),
            ..employment_draft()
        };
        assert!(validate_employment(&too_large)
            .expect_err("too large")
            .get("annualIncome")
            .is_some());

        let ceiling = EmploymentInfoDraft {
            annual_income: "10,00,00,000".to_string(),
            ..employment_draft()
        };
        assert_eq!(
            validate_employment(&ceiling)
                .expect("ceiling allowed")
                .annual_income,
            MAX_ANNUAL_INCOME
        );

        let text = EmploymentInfoDraft {
            annual_income: "lots".to_string(),
            ..employment_draft()
        };
        assert_eq!(
            validate_employment(&text)
                .expect_err("not a number")
                .get("annualIncome"),
            Some("Annual income must be a number")
        );
    }

    #[test]
    fn employment_type_is_required() {
        let draft = EmploymentInfoDraft {
            employment_type: None,
            ..employment_draft()
        };
        let errors = validate_employment(&draft).expect_err("missing type");
        assert_eq!(errors.get("employmentType"), Some("Select an employment type"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn drafts_rebuild_from_captured_values() {
        let info = validate_personal(&personal_draft()).expect("valid");
        assert_eq!(PersonalInfoDraft::from(&info), personal_draft());

        let employment = validate_employment(&employment_draft()).expect("valid");
        assert_eq!(EmploymentInfoDraft::from(&employment), employment_draft());
    }
}
