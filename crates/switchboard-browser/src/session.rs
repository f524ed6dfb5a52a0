// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted login session and the launcher that restores it.
//!
//! The artifact is written by an external interactive login flow and only
//! ever read here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use switchboard_config::model::{BrowserConfig, PlatformConfig};
use switchboard_core::SwitchboardError;
use tracing::debug;
use url::Url;

use crate::chromium::{ChromiumSession, LaunchOptions};
use crate::driver::{BrowserSession, SessionLauncher};

/// DevTools command timeout is the navigation timeout plus this margin.
const COMMAND_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Contents of the session artifact file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionArtifact {
    #[serde(default)]
    pub cookies: Vec<StoredCookie>,
    #[serde(default)]
    pub origins: Vec<StoredOrigin>,
}

/// A cookie captured by the login flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
    /// Seconds since the epoch; negative for session cookies.
    #[serde(default = "default_expires")]
    pub expires: f64,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub same_site: Option<String>,
}

/// Local storage captured for one origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredOrigin {
    pub origin: String,
    #[serde(default, rename = "localStorage")]
    pub local_storage: Vec<StorageEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    pub value: String,
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_expires() -> f64 {
    -1.0
}

impl SessionArtifact {
    /// Parses artifact JSON. Malformed content is a session error.
    pub fn from_json(content: &str) -> Result<Self, SwitchboardError> {
        serde_json::from_str(content).map_err(|e| SwitchboardError::Session {
            message: format!("session artifact is not valid JSON: {e}"),
            source: Some(Box::new(e)),
        })
    }

    pub fn cookie_count(&self) -> usize {
        self.cookies.len()
    }

    pub fn origin_count(&self) -> usize {
        self.origins.len()
    }

    /// Total local-storage entries across all origins.
    pub fn storage_entry_count(&self) -> usize {
        self.origins.iter().map(|o| o.local_storage.len()).sum()
    }
}

/// Locates the session artifact and opens Chromium sessions from it.
#[derive(Debug, Clone)]
pub struct SessionStore {
    session_file: PathBuf,
    web_origin: String,
    launch: LaunchOptions,
}

impl SessionStore {
    pub fn from_config(
        platform: &PlatformConfig,
        browser: &BrowserConfig,
    ) -> Result<Self, SwitchboardError> {
        let web_url = Url::parse(&platform.web_url).map_err(|e| {
            SwitchboardError::Config(format!("platform.web_url '{}': {e}", platform.web_url))
        })?;
        Ok(Self {
            session_file: PathBuf::from(&browser.session_file),
            web_origin: web_url.origin().ascii_serialization(),
            launch: LaunchOptions {
                headless: browser.headless,
                executable: browser.executable.as_ref().map(PathBuf::from),
                no_sandbox: browser.no_sandbox,
                request_timeout: browser.navigation_timeout() + COMMAND_TIMEOUT_MARGIN,
            },
        })
    }

    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    /// Origin the notifications permission is granted for.
    pub fn web_origin(&self) -> &str {
        &self.web_origin
    }

    pub fn exists(&self) -> bool {
        self.session_file.is_file()
    }

    /// Reads and parses the artifact.
    ///
    /// Returns [`SwitchboardError::SessionMissing`] when the file is absent.
    pub async fn load_artifact(&self) -> Result<SessionArtifact, SwitchboardError> {
        let content = match tokio::fs::read_to_string(&self.session_file).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SwitchboardError::SessionMissing {
                    path: self.session_file.display().to_string(),
                });
            }
            Err(e) => {
                return Err(SwitchboardError::Session {
                    message: format!(
                        "cannot read session artifact {}: {e}",
                        self.session_file.display()
                    ),
                    source: Some(Box::new(e)),
                });
            }
        };
        let artifact = SessionArtifact::from_json(&content)?;
        debug!(
            path = %self.session_file.display(),
            cookies = artifact.cookie_count(),
            origins = artifact.origin_count(),
            "loaded session artifact"
        );
        Ok(artifact)
    }
}

#[async_trait]
impl SessionLauncher for SessionStore {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SwitchboardError> {
        let artifact = self.load_artifact().await?;
        let session = ChromiumSession::launch(&self.launch, &self.web_origin, &artifact).await?;
        Ok(Box::new(session))
    }
}
