#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/roboarchive");
        cmd.env("PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL from .env
        // (loaded by the server itself)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/api/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
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

/// Nanosecond suffix so repeated runs never collide on unique columns.
pub fn unique_suffix() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
        .to_string()
}

/// Register a fresh member with a unique email and log them in.
/// Returns (token, member_id, email).
pub async fn register_and_login(
    server: &TestServer,
    client: &reqwest::Client,
    name: &str,
    role: &str,
) -> Result<(String, i64, String)> {
    let email = format!("{}-{}@club.example", name.to_lowercase(), unique_suffix());

    let res = client
        .post(format!("{}/api/members/register", server.base_url))
        .json(&serde_json::json!({
            "name": name,
            "email": email,
            "password": "test-password",
            "role": role,
            "join_year": 2024,
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "register failed: {}",
        res.status()
    );
    let body = res.json::<serde_json::Value>().await?;
    let member_id = body["member"]["member_id"]
        .as_i64()
        .context("register response missing member_id")?;

    let res = client
        .post(format!("{}/api/members/login", server.base_url))
        .json(&serde_json::json!({ "email": email, "password": "test-password" }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "login failed: {}",
        res.status()
    );
    let body = res.json::<serde_json::Value>().await?;
    let token = body["token"]
        .as_str()
        .context("login response missing token")?
        .to_string();

    Ok((token, member_id, email))
}
