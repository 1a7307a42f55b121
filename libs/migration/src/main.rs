use migration::Migrator;
use sea_orm_migration::cli;

/// Runs the sea-orm migration CLI against `DATABASE_URL`
/// (`up`, `down`, `status`, `fresh`, `refresh`, `reset`).
#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
