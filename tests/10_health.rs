mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn root_reports_service_banner() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.client.get(app.url("/")).send().await?;
    let body = common::expect_json(res, 200).await?;

    assert_eq!(body["message"], "FinTrack API");
    assert_eq!(body["status"], "running");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[tokio::test]
async fn health_is_degraded_without_database() -> Result<()> {
    let app = common::spawn_app_without_db().await?;

    let res = app.client.get(app.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "unavailable");
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn health_is_ok_with_database() -> Result<()> {
    let Some(app) = common::spawn_app_with_db().await? else {
        return Ok(());
    };

    let res = app.client.get(app.url("/health")).send().await?;
    let body = common::expect_json(res, 200).await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn responses_carry_security_headers() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.client.get(app.url("/")).send().await?;
    let headers = res.headers();

    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("referrer-policy"));
    Ok(())
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .request(reqwest::Method::OPTIONS, app.api("/categories"))
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "authorization,content-type")
        .send()
        .await?;

    assert!(res.status().is_success(), "preflight failed: {}", res.status());
    assert_eq!(res.headers()["access-control-allow-origin"], "http://localhost:3000");
    assert_eq!(res.headers()["access-control-allow-credentials"], "true");
    Ok(())
}
