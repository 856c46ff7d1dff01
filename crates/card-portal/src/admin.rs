//! Dashboard figures and the admin review screen: search, filter, decide.

use std::fmt;

use serde::Serialize;

use crate::domain::{Application, ApplicationStatus, StatusUpdate};
use crate::format::{format_date, format_rupees};

/// How many applications the admin dashboard lists.
pub const LATEST_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Some(StatusFilter::All);
        }
        ApplicationStatus::parse(raw).map(StatusFilter::Only)
    }

    pub fn matches(self, application: &Application) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => application.status == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

/// Case-insensitive match on application number, applicant name or email,
/// then the status filter. Order is preserved.
pub fn filter_applications<'a>(
    applications: &'a [Application],
    search: &str,
    filter: StatusFilter,
) -> Vec<&'a Application> {
    let needle = search.trim().to_lowercase();
    applications
        .iter()
        .filter(|application| needle.is_empty() || matches_search(application, &needle))
        .filter(|application| filter.matches(application))
        .collect()
}

fn matches_search(application: &Application, needle: &str) -> bool {
    [
        application.application_number.as_str(),
        application.personal_info.full_name.as_str(),
        application.personal_info.email.as_str(),
    ]
    .iter()
    .any(|haystack| haystack.to_lowercase().contains(needle))
}

pub fn showing_label(shown: usize, total: usize) -> String {
    format!("Showing {shown} of {total} applications")
}

/// Newest first as delivered by the server; the dashboard keeps the head of the list.
pub fn latest(applications: &[Application]) -> &[Application] {
    &applications[..applications.len().min(LATEST_LIMIT)]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationCounts {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
    pub rejected: usize,
}

impl ApplicationCounts {
    pub fn tally(applications: &[Application]) -> Self {
        applications
            .iter()
            .fold(Self::default(), |mut counts, application| {
                counts.total += 1;
                match application.status {
                    ApplicationStatus::Approved => counts.approved += 1,
                    ApplicationStatus::Pending => counts.pending += 1,
                    ApplicationStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }
}

/// Builds the decision payload. Blank remarks get a default sentence and a
/// missing limit falls back to whatever the bureau assigned, or zero.
pub fn status_update(
    application: &Application,
    status: ApplicationStatus,
    credit_limit: Option<u64>,
    remarks: Option<&str>,
) -> StatusUpdate {
    let remarks = remarks
        .map(str::trim)
        .filter(|remarks| !remarks.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Application {status} by admin"));
    let credit_limit = credit_limit.unwrap_or_else(|| {
        application
            .credit_info
            .as_ref()
            .map_or(0, |info| info.credit_limit)
    });

    StatusUpdate {
        status,
        credit_limit,
        remarks,
    }
}

/// Flat row for table, CSV and JSON listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRow {
    pub id: String,
    pub application_number: String,
    pub applicant: String,
    pub email: String,
    pub employment_type: String,
    pub annual_income: String,
    pub credit_score: Option<u16>,
    pub credit_limit: String,
    pub status: String,
    pub submitted: String,
}

impl From<&Application> for ApplicationRow {
    fn from(application: &Application) -> Self {
        let credit = application.credit_info.as_ref();
        Self {
            id: application.id.to_string(),
            application_number: application.application_number.clone(),
            applicant: application.personal_info.full_name.clone(),
            email: application.personal_info.email.clone(),
            employment_type: application.employment_info.employment_type.label().to_string(),
            annual_income: format_rupees(application.employment_info.annual_income),
            credit_score: credit.map(|info| info.credit_score),
            credit_limit: credit.map_or_else(
                || "-".to_string(),
                |info| format_rupees(info.credit_limit),
            ),
            status: application.status.label().to_string(),
            submitted: format_date(application.submitted_at.date_naive()),
        }
    }
}
