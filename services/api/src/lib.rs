mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use care_dispatch::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
