//! Command-line and HTTP surfaces around the screening engine.

mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use crate::error::AppError;

pub use routes::screening_router;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
