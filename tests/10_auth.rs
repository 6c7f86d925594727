mod common;

use anyhow::Result;
use serde_json::json;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    assert!(res.status().is_success());
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn garbage_assertion_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;

    let body = common::rpc(server, "verifyAuth", json!({}), "not-a-jwt", None).await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_ASSERTION");
    Ok(())
}

#[tokio::test]
async fn expired_assertion_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::mint_expired_assertion("someone@example.test");

    let body = common::rpc(server, "verifyAuth", json!({}), &token, None).await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_ASSERTION");
    Ok(())
}

#[tokio::test]
async fn unknown_email_resolves_to_guest() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::mint_assertion("stranger@example.test", "Stranger");

    let body = common::rpc(server, "verifyAuth", json!({}), &token, None).await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["role"], "GUEST");
    assert!(body["data"]["tenantId"].is_null());
    Ok(())
}

#[tokio::test]
async fn guest_cannot_reach_tenant_actions() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::mint_assertion("stranger@example.test", "Stranger");

    for action in ["getTeachers", "getAllTenants", "markAttendance"] {
        let body = common::rpc(server, action, json!({}), &token, None).await?;
        assert_eq!(body["success"], false, "{} should fail for a guest", action);
        assert_eq!(body["code"], "FORBIDDEN");
    }
    Ok(())
}

#[tokio::test]
async fn unknown_action_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::mint_assertion("stranger@example.test", "Stranger");

    let body = common::rpc(server, "dropAllTables", json!({}), &token, None).await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNKNOWN_ACTION");
    Ok(())
}
