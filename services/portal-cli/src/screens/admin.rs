use std::io;

use card_portal::admin::{
    filter_applications, latest, showing_label, status_update, ApplicationCounts, ApplicationRow,
};
use card_portal::api::ApplicationsApi;
use card_portal::domain::ApplicationId;
use card_portal::error::AppError;
use card_portal::session::Route;
use tracing::info;

use crate::cli::{ListArgs, OutputFormat, UpdateArgs};
use crate::context::Portal;
use crate::render;

pub(crate) async fn dashboard(portal: &mut Portal) -> Result<(), AppError> {
    let applications = match portal.api.all_applications().await {
        Ok(applications) => applications,
        Err(err) => {
            portal.api_failure(&err, "Failed to load applications", Route::Dashboard);
            return Ok(());
        }
    };

    println!("Admin Dashboard");
    println!("{}", render::counts(&ApplicationCounts::tally(&applications), true));
    println!("Recent Applications");
    println!("{}", render::applications(latest(&applications), true));
    Ok(())
}

pub(crate) async fn list(portal: &mut Portal, args: &ListArgs) -> Result<(), AppError> {
    let applications = match portal.api.all_applications().await {
        Ok(applications) => applications,
        Err(err) => {
            portal.api_failure(&err, "Failed to load applications", Route::AdminDashboard);
            return Ok(());
        }
    };

    let shown = filter_applications(&applications, &args.search, args.status);
    info!(
        search = %args.search,
        status = %args.status,
        shown = shown.len(),
        total = applications.len(),
        "admin list filtered"
    );

    match args.format {
        OutputFormat::Table => {
            println!("{}", render::applications(shown.iter().copied(), true));
            println!("{}", showing_label(shown.len(), applications.len()));
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            for application in &shown {
                writer
                    .serialize(ApplicationRow::from(*application))
                    .map_err(io::Error::from)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            let rows: Vec<ApplicationRow> =
                shown.iter().map(|application| ApplicationRow::from(*application)).collect();
            serde_json::to_writer_pretty(io::stdout(), &rows).map_err(io::Error::from)?;
            println!();
        }
    }
    Ok(())
}

pub(crate) async fn update(portal: &mut Portal, args: &UpdateArgs) -> Result<(), AppError> {
    let id = ApplicationId(args.id.clone());
    let application = match portal.api.application(&id).await {
        Ok(application) => application,
        Err(err) => {
            portal.api_failure(&err, "Application not found", Route::AdminApplications);
            return Ok(());
        }
    };

    let update = status_update(
        &application,
        args.status,
        args.credit_limit,
        args.remarks.as_deref(),
    );
    match portal.api.update_status(&id, &update).await {
        Ok(()) => {
            info!(
                application_number = %application.application_number,
                status = %update.status,
                credit_limit = update.credit_limit,
                "application status updated"
            );
            portal
                .notifications
                .success(format!("Application {} successfully", update.status));
        }
        Err(err) => {
            portal.api_failure(&err, "Failed to update application", Route::AdminApplications);
        }
    }
    Ok(())
}
