use std::fs;

use card_portal::api::{ApiError, HttpApi};
use card_portal::config::AppConfig;
use card_portal::error::{AppError, ErrorSurface};
use card_portal::notify::NotificationQueue;
use card_portal::session::{AuthSession, FileSessionStore, Route, StoreError};
use card_portal::telemetry;
use tracing::{debug, info, warn};

/// Everything a command needs: configuration, the API client, the stored
/// session and the queue of messages shown when the command finishes.
pub(crate) struct Portal {
    pub(crate) config: AppConfig,
    pub(crate) api: HttpApi,
    pub(crate) session: AuthSession<FileSessionStore>,
    pub(crate) notifications: NotificationQueue,
}

impl Portal {
    pub(crate) fn load() -> Result<Self, AppError> {
        let config = AppConfig::load()?;
        telemetry::init(&config.telemetry)?;

        let path = config.storage.session_file();
        let store = match FileSessionStore::open(&path) {
            Ok(store) => store,
            Err(StoreError::Corrupt(err)) => {
                warn!(error = %err, path = %path.display(), "discarding unreadable session file");
                fs::remove_file(&path)?;
                FileSessionStore::open(&path)?
            }
            Err(err) => return Err(err.into()),
        };
        let session = AuthSession::restore(store);
        let api = HttpApi::new(&config.api)?
            .with_access_token(session.access_token().map(str::to_string));

        info!(
            environment = ?config.environment,
            api = %config.api.base_url,
            signed_in = session.is_authenticated(),
            "{} ready",
            config.app_name
        );

        Ok(Self {
            config,
            api,
            session,
            notifications: NotificationQueue::default(),
        })
    }

    /// Copies the session's current access token onto the API client.
    pub(crate) fn sync_token(&mut self) {
        self.api
            .set_access_token(self.session.access_token().map(str::to_string));
    }

    /// Queues the message for a failed call and returns where it should be shown.
    pub(crate) fn api_failure(
        &mut self,
        err: &ApiError,
        fallback: &str,
        not_found: Route,
    ) -> ErrorSurface {
        debug!(error = %err, "api call failed");
        let surface = ErrorSurface::for_api(err, fallback, not_found);
        match &surface {
            ErrorSurface::Toast(message) => {
                self.notifications.error(message.clone());
            }
            ErrorSurface::Redirect(Route::Login) => {
                self.notifications
                    .error("Your session has expired. Please sign in again: card-portal login");
            }
            ErrorSurface::Redirect(_) | ErrorSurface::Inline(_) => {
                self.notifications.error(fallback);
            }
        }
        surface
    }

    /// Prints queued messages to stderr, oldest first.
    pub(crate) fn flush(&mut self) {
        for notification in self.notifications.drain() {
            eprintln!("{notification}");
        }
    }
}
