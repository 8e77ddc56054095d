use serde_json::{json, Value};
use std::time::Duration;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

pub async fn handle(url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let url = format!("{}/health", url.trim_end_matches('/'));

    let response = match client.get(&url).timeout(Duration::from_secs(5)).send().await {
        Ok(response) => response,
        Err(e) => {
            output_error(&output_format, &format!("{} unreachable: {}", url, e), Some("SERVER_DOWN"))?;
            std::process::exit(1);
        }
    };

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(
            &output_format,
            "Server is up",
            Some(json!({ "status": status.as_u16(), "health": body })),
        )
    } else {
        output_error(&output_format, &format!("{} returned {}", url, status), Some("SERVER_DEGRADED"))?;
        std::process::exit(1);
    }
}
