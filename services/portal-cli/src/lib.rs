mod cli;
mod context;
mod prompt;
mod render;
mod screens;

use card_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
