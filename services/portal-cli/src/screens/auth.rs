use card_portal::domain::Credentials;
use card_portal::error::AppError;
use card_portal::format::display_name_from_email;
use card_portal::session::{Route, SessionError};
use card_portal::validation::validate_email;
use inquire::validator::Validation;
use inquire::{Password, Text};
use tracing::info;

use crate::context::Portal;
use crate::prompt::prompt_error;

const MIN_PASSWORD_LEN: usize = 6;

fn ask_email(preset: Option<String>) -> Result<String, AppError> {
    if let Some(email) = preset {
        let email = email.trim().to_string();
        if validate_email(&email) {
            return Ok(email);
        }
        return Err(AppError::Prompt("Invalid email address".to_string()));
    }

    Text::new("Email:")
        .with_validator(|input: &str| {
            Ok(if validate_email(input.trim()) {
                Validation::Valid
            } else {
                Validation::Invalid("Invalid email address".into())
            })
        })
        .prompt()
        .map(|email| email.trim().to_string())
        .map_err(prompt_error)
}

fn ask_password(confirm: bool) -> Result<String, AppError> {
    let prompt = Password::new("Password:").with_validator(|input: &str| {
        Ok(if input.chars().count() >= MIN_PASSWORD_LEN {
            Validation::Valid
        } else {
            Validation::Invalid("Password must be at least 6 characters".into())
        })
    });
    let prompt = if confirm {
        prompt.with_custom_confirmation_message("Confirm password:")
    } else {
        prompt.without_confirmation()
    };
    prompt.prompt().map_err(prompt_error)
}

fn hint_for_landing(portal: &mut Portal) {
    let hint = if portal.session.landing_route() == Route::AdminDashboard {
        "Next: card-portal admin dashboard"
    } else {
        "Next: card-portal dashboard"
    };
    portal.notifications.info(hint);
}

pub(crate) async fn login(portal: &mut Portal, email: Option<String>) -> Result<(), AppError> {
    let credentials = Credentials {
        email: ask_email(email)?,
        password: ask_password(false)?,
    };

    match portal.session.login(&portal.api, &credentials).await {
        Ok(user) => {
            let greeting = format!("Welcome back, {}", display_name_from_email(&user.email));
            portal.notifications.success(greeting);
        }
        Err(SessionError::Api(err)) => {
            portal.notifications.error(err.user_message("Login failed"));
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }
    portal.sync_token();
    hint_for_landing(portal);
    Ok(())
}

pub(crate) async fn register(portal: &mut Portal, email: Option<String>) -> Result<(), AppError> {
    let credentials = Credentials {
        email: ask_email(email)?,
        password: ask_password(true)?,
    };

    match portal.session.register(&portal.api, &credentials).await {
        Ok(user) => {
            let greeting = format!(
                "Account created. Welcome, {}",
                display_name_from_email(&user.email)
            );
            portal.notifications.success(greeting);
        }
        Err(SessionError::Api(err)) => {
            portal.notifications.error(err.user_message("Registration failed"));
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }
    portal.sync_token();
    hint_for_landing(portal);
    Ok(())
}

pub(crate) fn logout(portal: &mut Portal) -> Result<(), AppError> {
    portal.session.logout()?;
    portal.sync_token();
    portal.notifications.info("Signed out");
    Ok(())
}

pub(crate) fn whoami(portal: &Portal) -> Result<(), AppError> {
    match portal.session.user() {
        Some(user) => {
            let role = if user.is_admin() { "admin" } else { "applicant" };
            println!(
                "{} <{}> ({role})",
                display_name_from_email(&user.email),
                user.email
            );
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

pub(crate) async fn refresh(portal: &mut Portal) -> Result<(), AppError> {
    match portal.session.refresh(&portal.api).await {
        Ok(()) => {
            info!("access token refreshed from the command line");
            portal.notifications.success("Session refreshed");
        }
        Err(SessionError::NotSignedIn) => {
            portal
                .notifications
                .info("Please sign in to continue: card-portal login");
        }
        Err(SessionError::Api(err)) => {
            portal
                .notifications
                .error(err.user_message("Could not refresh the session"));
        }
        Err(err) => return Err(err.into()),
    }
    portal.sync_token();
    Ok(())
}
