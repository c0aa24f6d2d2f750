use crate::api::GatewayConfig;
use crate::cli::actions::Action;
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let config = GatewayConfig {
        otp_ttl_seconds: matches.get_one::<i64>("otp-ttl").copied().unwrap_or(300),
        session_ttl_seconds: matches
            .get_one::<i64>("session-ttl")
            .copied()
            .unwrap_or(86_400),
    };

    Ok(Action::Server { port, dsn, config })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_builds_server_action() -> Result<()> {
        temp_env::with_vars([("VARCO_DSN", None::<&str>)], || {
            let command = crate::cli::commands::new();
            let matches = command.get_matches_from(vec![
                "varco",
                "--dsn",
                "postgres://user@localhost:5432/varco",
                "--otp-ttl",
                "60",
            ]);
            let action = handler(&matches)?;
            let Action::Server { port, dsn, config } = action;
            assert_eq!(port, 8080);
            assert_eq!(dsn, "postgres://user@localhost:5432/varco");
            assert_eq!(config.otp_ttl_seconds, 60);
            assert_eq!(config.session_ttl_seconds, 86_400);
            Ok(())
        })
    }
}
