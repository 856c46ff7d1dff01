//! Client-side validation: standalone field rules and the two wizard form schemas.

pub mod rules;
pub mod schema;

pub use rules::{calculate_age, validate_email, validate_pan, validate_phone, validate_pincode};
pub use schema::{
    validate_employment, validate_personal, EmploymentInfoDraft, FieldError, FieldErrors,
    PersonalInfoDraft, MAX_ANNUAL_INCOME,
};
