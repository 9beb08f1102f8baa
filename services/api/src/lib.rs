mod analyze;
mod cli;
mod infra;
mod roles;
mod routes;
mod server;

use hireflow::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
