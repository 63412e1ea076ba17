mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = reqwest::get(server.url("/health")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");

    Ok(())
}

#[tokio::test]
async fn root_lists_message_endpoints() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = reqwest::get(server.url("/")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["name"], "Message API");
    assert_eq!(body["endpoints"]["list"], "GET /messages");

    Ok(())
}
