use card_portal::admin::{ApplicationCounts, ApplicationRow};
use card_portal::domain::{Application, ApplicationStatus, SubmissionReceipt};
use card_portal::format::{
    format_date, format_datetime_with, format_rupees, mask_email, mask_pan, mask_phone,
    normalize_phone, status_badge, DEFAULT_DATETIME_PATTERN,
};
use card_portal::wizard::ReviewSummary;
use comfy_table::{Attribute, Cell, Color, Table};

fn status_cell(status: ApplicationStatus) -> Cell {
    let cell = Cell::new(status_badge(status));
    match status {
        ApplicationStatus::Approved => cell.fg(Color::Rgb { r: 4, g: 120, b: 87 }),
        ApplicationStatus::Rejected => cell.fg(Color::Rgb { r: 185, g: 28, b: 28 }),
        ApplicationStatus::Pending => cell.fg(Color::Rgb { r: 180, g: 83, b: 9 }),
    }
}

fn label(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

pub(crate) fn counts(counts: &ApplicationCounts, with_rejected: bool) -> Table {
    let mut table = Table::new();
    let mut header = vec![label("Total"), label("Approved"), label("Pending")];
    let mut row = vec![
        Cell::new(counts.total),
        Cell::new(counts.approved),
        Cell::new(counts.pending),
    ];
    if with_rejected {
        header.push(label("Rejected"));
        row.push(Cell::new(counts.rejected));
    }
    table.set_header(header);
    table.add_row(row);
    table
}

pub(crate) fn applications<'a>(
    applications: impl IntoIterator<Item = &'a Application>,
    with_applicant: bool,
) -> Table {
    let mut table = Table::new();
    let mut header = vec![label("ID"), label("Application #")];
    if with_applicant {
        header.extend([label("Applicant"), label("Email")]);
    }
    header.extend([
        label("Submitted"),
        label("Status"),
        label("Credit Limit"),
    ]);
    table.set_header(header);

    for application in applications {
        let row = ApplicationRow::from(application);
        let mut cells = vec![Cell::new(&row.id), Cell::new(&row.application_number)];
        if with_applicant {
            cells.extend([Cell::new(&row.applicant), Cell::new(&row.email)]);
        }
        cells.extend([
            Cell::new(&row.submitted),
            status_cell(application.status),
            Cell::new(&row.credit_limit),
        ]);
        table.add_row(cells);
    }
    table
}

pub(crate) fn review(summary: &ReviewSummary) -> Table {
    let mut table = Table::new();
    for (title, rows) in summary.sections() {
        table.add_row(vec![
            Cell::new(title).add_attribute(Attribute::Bold),
            Cell::new(""),
        ]);
        for (name, value) in rows {
            table.add_row(vec![Cell::new(name), Cell::new(value)]);
        }
    }
    table
}

pub(crate) fn receipt(receipt: &SubmissionReceipt) -> Table {
    let mut table = Table::new();
    table.set_header(vec![label("Application Submitted"), Cell::new("")]);
    table.add_row(vec![Cell::new("Application Number"), Cell::new(&receipt.application_number)]);
    table.add_row(vec![Cell::new("Status"), status_cell(receipt.status)]);
    if let Some(credit) = &receipt.credit_info {
        table.add_row(vec![Cell::new("Credit Score"), Cell::new(credit.credit_score)]);
        table.add_row(vec![
            Cell::new("Credit Limit"),
            Cell::new(format_rupees(credit.credit_limit)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Submitted"),
        Cell::new(format_date(receipt.submitted_at.date_naive())),
    ]);
    table
}

/// Full record with sensitive fields masked, followed by the status timeline.
pub(crate) fn details(application: &Application) -> (Table, Table) {
    let personal = &application.personal_info;
    let employment = &application.employment_info;
    let address = &personal.address;

    let mut record = Table::new();
    record.set_header(vec![
        label(&format!("Application {}", application.application_number)),
        status_cell(application.status),
    ]);
    let mut rows = vec![
        ("Full Name", personal.full_name.clone()),
        ("Date of Birth", format_date(personal.date_of_birth)),
        ("Email", mask_email(&personal.email)),
        ("Phone", mask_phone(&normalize_phone(&personal.phone))),
        ("PAN Card", mask_pan(&personal.pan_card)),
        (
            "Address",
            format!(
                "{}, {}, {} - {}",
                address.street, address.city, address.state, address.pincode
            ),
        ),
        ("Employment Type", employment.employment_type.label().to_string()),
        ("Company", employment.company_name.clone()),
        ("Designation", employment.designation.clone()),
        ("Annual Income", format_rupees(employment.annual_income)),
    ];
    if let Some(credit) = &application.credit_info {
        rows.push(("Credit Score", credit.credit_score.to_string()));
        rows.push(("Credit Limit", format_rupees(credit.credit_limit)));
    }
    rows.push(("Submitted", format_date(application.submitted_at.date_naive())));
    if let Some(processed) = application.processed_at {
        rows.push(("Processed", format_date(processed.date_naive())));
    }
    if let Some(dispatched) = application.dispatched_at {
        rows.push(("Card Dispatched", format_date(dispatched.date_naive())));
    }
    for (name, value) in rows {
        record.add_row(vec![Cell::new(name), Cell::new(value)]);
    }

    let mut timeline = Table::new();
    timeline.set_header(vec![label("When"), label("Status"), label("Remarks")]);
    for entry in &application.status_history {
        timeline.add_row(vec![
            Cell::new(format_datetime_with(
                entry.timestamp.naive_utc(),
                DEFAULT_DATETIME_PATTERN,
            )),
            status_cell(entry.status),
            Cell::new(entry.remarks.as_deref().unwrap_or("-")),
        ]);
    }

    (record, timeline)
}
