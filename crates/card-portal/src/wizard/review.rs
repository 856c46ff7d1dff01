use serde::Serialize;

use crate::domain::{EmploymentInfo, PersonalInfo};
use crate::format::{credit_limit_for_income, format_date, format_rupees, mask_pan};

/// Read-only view of the captured values shown before the applicant submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub full_name: String,
    pub date_of_birth: String,
    pub email: String,
    pub phone: String,
    pub pan_card: String,
    pub address: String,
    pub employment_type: String,
    pub company_name: String,
    pub designation: String,
    pub annual_income: String,
    pub indicative_credit_limit: String,
}

impl ReviewSummary {
    pub fn new(personal: &PersonalInfo, employment: &EmploymentInfo) -> Self {
        let address = &personal.address;
        Self {
            full_name: personal.full_name.clone(),
            date_of_birth: format_date(personal.date_of_birth),
            email: personal.email.clone(),
            phone: personal.phone.clone(),
            pan_card: mask_pan(&personal.pan_card),
            address: format!(
                "{}, {}, {} - {}",
                address.street, address.city, address.state, address.pincode
            ),
            employment_type: employment.employment_type.label().to_string(),
            company_name: employment.company_name.clone(),
            designation: employment.designation.clone(),
            annual_income: format_rupees(employment.annual_income),
            indicative_credit_limit: credit_limit_for_income(employment.annual_income).describe(),
        }
    }

    /// Label/value pairs grouped the way the review screen lays them out.
    pub fn sections(&self) -> [(&'static str, Vec<(&'static str, &str)>); 2] {
        [
            (
                "Personal Information",
                vec![
                    ("Full Name", self.full_name.as_str()),
                    ("Date of Birth", self.date_of_birth.as_str()),
                    ("Email", self.email.as_str()),
                    ("Phone", self.phone.as_str()),
                    ("PAN Card", self.pan_card.as_str()),
                    ("Address", self.address.as_str()),
                ],
            ),
            (
                "Employment Details",
                vec![
                    ("Employment Type", self.employment_type.as_str()),
                    ("Company", self.company_name.as_str()),
                    ("Designation", self.designation.as_str()),
                    ("Annual Income", self.annual_income.as_str()),
                    ("Indicative Credit Limit", self.indicative_credit_limit.as_str()),
                ],
            ),
        ]
    }
}
