use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a stored application (`_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Postal address captured with the applicant's personal details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// Applicant identity and contact details collected by the first wizard step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub phone: String,
    pub pan_card: String,
    pub address: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    Salaried,
    SelfEmployed,
    Business,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 3] = [
        EmploymentType::Salaried,
        EmploymentType::SelfEmployed,
        EmploymentType::Business,
    ];

    pub const fn value(self) -> &'static str {
        match self {
            EmploymentType::Salaried => "salaried",
            EmploymentType::SelfEmployed => "self-employed",
            EmploymentType::Business => "business",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EmploymentType::Salaried => "Salaried",
            EmploymentType::SelfEmployed => "Self Employed",
            EmploymentType::Business => "Business",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| {
            kind.value() == normalized || kind.label().eq_ignore_ascii_case(&normalized)
        })
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Employment and income declaration collected by the second wizard step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentInfo {
    pub employment_type: EmploymentType,
    pub annual_income: u64,
    pub company_name: String,
    pub designation: String,
}

/// Bureau details attached by the server once a score has been pulled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditInfo {
    pub credit_score: u16,
    pub credit_limit: u64,
    pub retrieved_at: DateTime<Utc>,
}

/// Lifecycle status owned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ];

    pub const fn value(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "⏳",
            ApplicationStatus::Approved => "✓",
            ApplicationStatus::Rejected => "✕",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.value() == normalized)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Append-only audit entry recorded by the server on each status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub status: ApplicationStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Full application record as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: ApplicationId,
    pub application_number: String,
    pub user_id: String,
    pub personal_info: PersonalInfo,
    pub employment_info: EmploymentInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_info: Option<CreditInfo>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatched_at: Option<DateTime<Utc>>,
}

impl Application {
    /// Most recent remark left on the status history, if any.
    pub fn latest_remarks(&self) -> Option<&str> {
        self.status_history
            .iter()
            .rev()
            .find_map(|entry| entry.remarks.as_deref())
    }
}

/// Payload sent when the applicant submits the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSubmission {
    pub personal_info: PersonalInfo,
    pub employment_info: EmploymentInfo,
}

impl ApplicationSubmission {
    pub fn new(personal_info: PersonalInfo, employment_info: EmploymentInfo) -> Self {
        let mut personal_info = personal_info;
        personal_info.pan_card = personal_info.pan_card.to_uppercase();
        Self {
            personal_info,
            employment_info,
        }
    }
}

/// What the server hands back for a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub application_number: String,
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_info: Option<CreditInfo>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Applicant,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token pair plus the signed-in user, returned by login and register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

impl AuthGrant {
    pub fn tokens(&self) -> AuthTokens {
        AuthTokens {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Admin decision payload; the server appends a status-history entry for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
    pub credit_limit: u64,
    pub remarks: String,
}
