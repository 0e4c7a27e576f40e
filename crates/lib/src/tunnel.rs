//! ngrok tunnel lifecycle: kill stale processes, launch `ngrok http`, and
//! discover the public URL via the local management API.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:4040";

/// Wait after pkill so stale processes release the management port.
const CLEANUP_WAIT: Duration = Duration::from_secs(2);

/// Wait after spawn before the one discovery attempt.
const SETTLE_WAIT: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
struct TunnelsResponse {
    #[serde(default)]
    tunnels: Vec<TunnelDescriptor>,
}

#[derive(Debug, Deserialize)]
struct TunnelDescriptor {
    public_url: String,
}

/// Handle to a running ngrok process and its discovered public URL.
/// Killed on `stop` or drop; never restarted or monitored while running.
pub struct NgrokTunnel {
    child: Child,
    public_url: String,
}

/// Best-effort termination of already-running ngrok processes. Absence of a
/// running process is not an error.
fn kill_existing() {
    match Command::new("pkill")
        .arg("ngrok")
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => log::info!("cleaned up existing ngrok processes"),
        Err(e) => log::debug!("pkill ngrok unavailable: {}", e),
    }
}

/// Single GET against the management API's tunnel list. Zero tunnels listed
/// is `Ok(None)`; the caller decides what to do with "not found". No retry.
pub async fn discover_public_url(api_base: Option<&str>) -> Result<Option<String>> {
    let base = api_base.unwrap_or(DEFAULT_API_BASE).trim_end_matches('/');
    let url = format!("{}/api/tunnels", base);
    let res = reqwest::get(&url)
        .await
        .with_context(|| format!("querying {}", url))?;
    if !res.status().is_success() {
        anyhow::bail!("tunnel list request returned {}", res.status());
    }
    let data: TunnelsResponse = res.json().await.context("parsing tunnel list")?;
    Ok(data.tunnels.into_iter().next().map(|t| t.public_url))
}

impl NgrokTunnel {
    /// Kill stale processes, launch `ngrok http <port>` detached from the
    /// terminal, wait for the tunnel to settle, then discover the public URL.
    pub async fn start(port: u16, api_base: Option<&str>) -> Result<Self> {
        kill_existing();
        tokio::time::sleep(CLEANUP_WAIT).await;

        let child = Command::new("ngrok")
            .arg("http")
            .arg(port.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("launching ngrok (is it installed?)")?;
        log::info!("ngrok launched for local port {}", port);
        tokio::time::sleep(SETTLE_WAIT).await;

        let mut tunnel = NgrokTunnel {
            child,
            public_url: String::new(),
        };
        match discover_public_url(api_base).await? {
            Some(url) => {
                log::info!("ngrok tunnel established at {}", url);
                tunnel.public_url = url;
                Ok(tunnel)
            }
            None => {
                tunnel.stop();
                anyhow::bail!("no active tunnel reported by the ngrok management api")
            }
        }
    }

    /// Externally reachable URL discovered at startup; not refreshed.
    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    /// Kill the tunnel process and reap it. Safe to call more than once.
    pub fn stop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Drop for NgrokTunnel {
    fn drop(&mut self) {
        self.stop();
    }
}
