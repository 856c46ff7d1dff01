use card_portal::admin::StatusFilter;
use card_portal::domain::{ApplicationId, ApplicationStatus};
use card_portal::error::AppError;
use card_portal::session::{Route, RouteDecision};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

use crate::context::Portal;
use crate::screens::{admin, applications, apply, auth};

#[derive(Parser, Debug)]
#[command(
    name = "card-portal",
    about = "Apply for, track and review credit-card applications from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with an existing account
    Login(CredentialArgs),
    /// Create an applicant account and sign in
    Register(CredentialArgs),
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Manage the stored session
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Fill in and submit a new credit-card application
    Apply,
    /// List your applications
    Dashboard,
    /// Show one of your applications in full
    Show {
        /// Application id as listed on the dashboard
        id: String,
    },
    /// Look up an application by its number
    Track {
        /// Application number, e.g. CC2025000123
        number: String,
    },
    /// Review applications (admin accounts only)
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Exchange the refresh token for a new token pair
    Refresh,
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Totals by status and the most recent applications
    Dashboard,
    /// Search and filter every application
    List(ListArgs),
    /// Approve or reject an application
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
pub(crate) struct CredentialArgs {
    /// Account email; prompted for when omitted
    #[arg(long)]
    pub(crate) email: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Match against application number, applicant name or email
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    /// `all`, `pending`, `approved` or `rejected`
    #[arg(long, default_value = "all", value_parser = parse_filter)]
    pub(crate) status: StatusFilter,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct UpdateArgs {
    /// Application id
    pub(crate) id: String,
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: ApplicationStatus,
    /// Credit limit in rupees; defaults to the bureau-assigned limit
    #[arg(long)]
    pub(crate) credit_limit: Option<u64>,
    #[arg(long)]
    pub(crate) remarks: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Csv,
    Json,
}

fn parse_filter(raw: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(raw)
        .ok_or_else(|| format!("unknown status '{raw}'; expected all, pending, approved or rejected"))
}

fn parse_status(raw: &str) -> Result<ApplicationStatus, String> {
    ApplicationStatus::parse(raw)
        .ok_or_else(|| format!("unknown status '{raw}'; expected pending, approved or rejected"))
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut portal = Portal::load()?;

    let result = dispatch(&mut portal, cli.command).await;
    portal.flush();
    match result {
        Err(AppError::Cancelled) => Ok(()),
        other => other,
    }
}

async fn dispatch(portal: &mut Portal, command: Command) -> Result<(), AppError> {
    match command {
        Command::Login(args) => auth::login(portal, args.email).await,
        Command::Register(args) => auth::register(portal, args.email).await,
        Command::Logout => auth::logout(portal),
        Command::Whoami => auth::whoami(portal),
        Command::Session {
            command: SessionCommand::Refresh,
        } => auth::refresh(portal).await,
        Command::Apply => {
            if enter(portal, Route::ApplicationNew).await? {
                apply::run(portal).await?;
            }
            Ok(())
        }
        Command::Dashboard => {
            if enter(portal, Route::Dashboard).await? {
                applications::dashboard(portal).await?;
            }
            Ok(())
        }
        Command::Show { id } => {
            let id = ApplicationId(id);
            if enter(portal, Route::ApplicationDetails(id.clone())).await? {
                applications::show(portal, &id).await?;
            }
            Ok(())
        }
        Command::Track { number } => {
            if enter(portal, Route::ApplicationTrack).await? {
                applications::track(portal, &number).await?;
            }
            Ok(())
        }
        Command::Admin { command } => {
            let route = match command {
                AdminCommand::Dashboard => Route::AdminDashboard,
                AdminCommand::List(_) | AdminCommand::Update(_) => Route::AdminApplications,
            };
            if !enter(portal, route).await? {
                return Ok(());
            }
            match command {
                AdminCommand::Dashboard => admin::dashboard(portal).await,
                AdminCommand::List(args) => admin::list(portal, &args).await,
                AdminCommand::Update(args) => admin::update(portal, &args).await,
            }
        }
    }
}

/// Runs the route guard for a command. Redirects are followed here, so the
/// caller only renders its own screen when this returns true.
async fn enter(portal: &mut Portal, route: Route) -> Result<bool, AppError> {
    match portal.session.authorize(&route) {
        RouteDecision::Allow => {
            debug!(%route, "route allowed");
            Ok(true)
        }
        RouteDecision::Redirect(Route::Login) => {
            portal
                .notifications
                .info("Please sign in to continue: card-portal login");
            Ok(false)
        }
        RouteDecision::Redirect(target) => {
            debug!(%route, %target, "route redirected");
            portal
                .notifications
                .error("You do not have permission to open that page");
            if target == Route::Dashboard {
                applications::dashboard(portal).await?;
            }
            Ok(false)
        }
    }
}
