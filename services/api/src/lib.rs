mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use brokerage_listings::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
