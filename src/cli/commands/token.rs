use anyhow::anyhow;
use chrono::{Duration, Utc};
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{Claims, TokenVerifier};
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a signed token with the configured JWT secret")]
    Issue {
        #[arg(long, help = "Subject (user id); random when omitted")]
        sub: Option<Uuid>,
        #[arg(long, default_value = "dev@example.com")]
        email: String,
        #[arg(long, default_value = "authenticated")]
        role: String,
        #[arg(long, help = "Lifetime in hours (defaults to JWT_EXPIRATION_HOURS)")]
        hours: Option<u64>,
    },

    #[command(about = "Verify a token and print its claims")]
    Verify {
        #[arg(help = "Token to verify")]
        token: String,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config().security;
    let verifier = TokenVerifier::new(&security.jwt_secret)?
        .with_expiry_enforcement(security.enforce_token_expiry);

    match cmd {
        TokenCommands::Issue { sub, email, role, hours } => {
            let hours = hours.unwrap_or(security.jwt_expiry_hours);
            let ttl = token_ttl(hours)?;
            let claims = Claims::new(sub.unwrap_or_else(Uuid::new_v4), email, role, ttl);
            let token = verifier.issue(&claims)?;

            output_success(
                &output_format,
                "Token issued",
                Some(json!({
                    "token": token,
                    "sub": claims.sub,
                    "exp": claims.exp,
                })),
            )
        }
        TokenCommands::Verify { token } => match verifier.verify(&token) {
            Ok(claims) => output_success(
                &output_format,
                "Token is valid",
                Some(json!({
                    "sub": claims.sub,
                    "email": claims.email,
                    "role": claims.role,
                    "exp": claims.exp,
                })),
            ),
            Err(e) => {
                output_error(&output_format, &e.to_string(), Some("TOKEN_INVALID"))?;
                std::process::exit(1);
            }
        },
    }
}

/// Lifetime for `hours`, provided the resulting expiry is representable.
fn token_ttl(hours: u64) -> anyhow::Result<Duration> {
    i64::try_from(hours)
        .ok()
        .and_then(Duration::try_hours)
        .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
        .ok_or_else(|| anyhow!("--hours {} is out of range", hours))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_accepts_ordinary_lifetimes() {
        assert_eq!(token_ttl(24).unwrap(), Duration::hours(24));
        assert_eq!(token_ttl(0).unwrap(), Duration::zero());
    }

    #[test]
    fn ttl_rejects_lifetimes_past_the_calendar() {
        for hours in [u64::MAX, i64::MAX as u64, (i64::MAX / 3600) as u64 + 1, 24 * 365 * 300_000] {
            let err = token_ttl(hours).unwrap_err();
            assert!(err.to_string().contains("out of range"), "hours: {}", hours);
        }
    }
}
