use card_portal::admin::ApplicationCounts;
use card_portal::api::ApplicationsApi;
use card_portal::domain::{Application, ApplicationId};
use card_portal::error::{AppError, ErrorSurface};
use card_portal::format::display_name_from_email;
use card_portal::session::Route;

use crate::context::Portal;
use crate::render;

pub(crate) async fn dashboard(portal: &mut Portal) -> Result<(), AppError> {
    let applications = match portal.api.my_applications().await {
        Ok(applications) => applications,
        Err(err) => {
            portal.api_failure(&err, "Failed to load applications", Route::Home);
            return Ok(());
        }
    };

    let name = portal
        .session
        .user()
        .map(|user| display_name_from_email(&user.email))
        .unwrap_or_else(|| "User".to_string());
    println!("Welcome, {name}");
    println!("{}", render::counts(&ApplicationCounts::tally(&applications), false));

    if applications.is_empty() {
        println!("You have not applied yet. Start with: card-portal apply");
    } else {
        println!("{}", render::applications(&applications, false));
    }
    Ok(())
}

fn print_details(application: &Application) {
    let (record, timeline) = render::details(application);
    println!("{record}");
    println!("Status History");
    println!("{timeline}");
}

pub(crate) async fn show(portal: &mut Portal, id: &ApplicationId) -> Result<(), AppError> {
    match portal.api.application(id).await {
        Ok(application) => {
            print_details(&application);
            Ok(())
        }
        Err(err) => {
            let surface =
                portal.api_failure(&err, "Failed to load application details", Route::Dashboard);
            if surface == ErrorSurface::Redirect(Route::Dashboard) {
                portal.flush();
                dashboard(portal).await?;
            }
            Ok(())
        }
    }
}

pub(crate) async fn track(portal: &mut Portal, number: &str) -> Result<(), AppError> {
    if number.trim().is_empty() {
        portal
            .notifications
            .error("Please enter an application number");
        return Ok(());
    }

    match portal.api.track(number).await {
        Ok(application) => print_details(&application),
        Err(err) => {
            portal.api_failure(&err, "Application not found", Route::ApplicationTrack);
        }
    }
    Ok(())
}
