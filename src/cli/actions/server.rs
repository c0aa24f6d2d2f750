use crate::api;
use crate::cli::actions::Action;
use anyhow::{Context, Result};
use url::Url;

/// Handle the server action
///
/// # Errors
/// Returns an error if the DSN is invalid or the server fails to start.
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server { port, dsn, config } => {
            // Fail early on malformed connection strings.
            Url::parse(&dsn).context("invalid database connection string")?;

            api::new(port, dsn, config).await?;
        }
    }

    Ok(())
}
