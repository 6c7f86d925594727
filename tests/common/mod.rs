use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

use attendance_api::auth::AssertionClaims;

pub const ASSERTION_SECRET: &str = "integration-test-secret";
pub const SUPER_ADMIN_EMAIL: &str = "root@platform.test";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/attendance-api");
        cmd.env("ATTEND_API_PORT", port.to_string())
            .env("AUTH_ASSERTION_SECRET", ASSERTION_SECRET)
            .env("SUPER_ADMIN_EMAIL", SUPER_ADMIN_EMAIL)
            .env("SESSION_UNLOCK_TTL_SECS", "900")
            .env("BCRYPT_COST", "4")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Mint an identity assertion signed with the server's configured secret.
pub fn mint_assertion(email: &str, name: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = AssertionClaims {
        email: email.to_string(),
        name: name.to_string(),
        picture: String::new(),
        exp: now + 3600,
        iat: now,
        iss: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(ASSERTION_SECRET.as_bytes()),
    )
    .expect("assertion encoding")
}

/// Mint an assertion that expired an hour ago.
pub fn mint_expired_assertion(email: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = AssertionClaims {
        email: email.to_string(),
        name: String::new(),
        picture: String::new(),
        exp: now - 3600,
        iat: now - 7200,
        iss: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(ASSERTION_SECRET.as_bytes()),
    )
    .expect("assertion encoding")
}

/// Post one RPC envelope and return the response body.
pub async fn rpc(
    server: &TestServer,
    action: &str,
    payload: Value,
    auth_token: &str,
    pin: Option<&str>,
) -> Result<Value> {
    let client = reqwest::Client::new();
    let mut body = json!({
        "action": action,
        "payload": payload,
        "authToken": auth_token,
    });
    if let Some(pin) = pin {
        body["pin"] = json!(pin);
    }

    let res = client
        .post(format!("{}/api/rpc", server.base_url))
        .json(&body)
        .send()
        .await?;
    Ok(res.json::<Value>().await?)
}
