//! Read-only status of the community game server, shown in the status bar.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::mpsc;
use std::time::Duration;

use crate::config::StatusConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatus {
    pub status: String,
    pub online: bool,
    pub description: Option<String>,
    /// Server software name, e.g. "Paper 1.20.4"
    pub version: Option<String>,
    pub players_max: u32,
    pub players_now: u32,
}

impl Default for ServerStatus {
    fn default() -> Self {
        Self {
            status: "unknown".to_string(),
            online: false,
            description: None,
            version: None,
            players_max: 0,
            players_now: 0,
        }
    }
}

impl ServerStatus {
    pub fn summary(&self) -> String {
        if self.online {
            format!("online {}/{}", self.players_now, self.players_max)
        } else {
            format!("{} {}/{}", self.status, self.players_now, self.players_max)
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatusAnswer {
    status: String,
    #[serde(default)]
    online: bool,
    #[serde(default)]
    motd: Option<String>,
    #[serde(default)]
    server: Option<ServerInfo>,
    #[serde(default)]
    players: Option<Players>,
}

#[derive(Debug, Deserialize)]
struct ServerInfo {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Players {
    #[serde(default)]
    max: u32,
    #[serde(default)]
    now: u32,
}

impl From<StatusAnswer> for ServerStatus {
    fn from(answer: StatusAnswer) -> Self {
        let players = answer.players.unwrap_or_default();
        Self {
            status: answer.status,
            online: answer.online,
            description: answer.motd.filter(|m| !m.is_empty()),
            version: answer.server.and_then(|s| s.name),
            players_max: players.max,
            players_now: players.now,
        }
    }
}

pub struct StatusClient {
    agent: ureq::Agent,
    endpoint: String,
    host: String,
}

impl StatusClient {
    pub fn new(config: &StatusConfig, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            endpoint: config.endpoint.clone(),
            host: config.host.clone(),
        }
    }

    pub fn fetch(&self) -> Result<ServerStatus> {
        tracing::debug!(endpoint = %self.endpoint, host = %self.host, "query server status");
        let answer: StatusAnswer = self
            .agent
            .get(&self.endpoint)
            .query("ip", &self.host)
            .call()
            .context("server status request failed")?
            .into_json()
            .context("server status answer is not valid JSON")?;
        Ok(answer.into())
    }

    /// Fetch once on a worker thread; the answer arrives on the returned channel.
    pub fn spawn_fetch(self) -> mpsc::Receiver<Result<ServerStatus>> {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let result = self.fetch();
            if let Err(e) = &result {
                tracing::warn!(error = %e, "server status unavailable");
            }
            let _ = tx.send(result);
        });
        rx
    }
}
