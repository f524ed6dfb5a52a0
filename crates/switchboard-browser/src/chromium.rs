// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chromium-backed implementation of the driver seam, via the DevTools
//! protocol.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::cdp::browser_protocol::browser::{GrantPermissionsParams, PermissionType};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType,
};
use chromiumoxide::cdp::browser_protocol::network::{
    CookieParam, CookieSameSite, SetCookiesParams, TimeSinceEpoch,
};
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, NavigateParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::{json, Map, Value};
use switchboard_core::SwitchboardError;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::driver::{BrowserSession, PageDriver};
use crate::session::{SessionArtifact, StoredCookie};

/// How Chromium is started.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub executable: Option<PathBuf>,
    pub no_sandbox: bool,
    /// Timeout for individual DevTools commands.
    pub request_timeout: Duration,
}

const CHROME_ARGS: &[&str] = &[
    "--disable-background-networking",
    "--disable-breakpad",
    "--disable-component-update",
    "--disable-default-apps",
    "--disable-dev-shm-usage",
    "--disable-extensions",
    "--disable-popup-blocking",
    "--disable-sync",
    "--no-first-run",
    "--no-default-browser-check",
    "--password-store=basic",
    "--use-mock-keychain",
];

fn cdp_error(context: &str, err: CdpError) -> SwitchboardError {
    SwitchboardError::Browser {
        message: format!("{context}: {err}"),
        source: Some(Box::new(err)),
    }
}

fn launch_config(options: &LaunchOptions, profile: &TempDir) -> Result<LaunchConfig, SwitchboardError> {
    let mut builder = LaunchConfig::builder()
        .request_timeout(options.request_timeout)
        .launch_timeout(Duration::from_secs(20))
        .user_data_dir(profile.path());

    if !options.headless {
        builder = builder.with_head();
    }
    if options.no_sandbox {
        builder = builder.no_sandbox();
    }
    let mut args = CHROME_ARGS.to_vec();
    if options.headless {
        args.push("--hide-scrollbars");
        args.push("--mute-audio");
    }
    builder = builder.args(args);
    if let Some(executable) = &options.executable {
        builder = builder.chrome_executable(executable.clone());
    }

    builder
        .build()
        .map_err(|e| SwitchboardError::browser(format!("invalid browser launch config: {e}")))
}

/// One Chromium process with a throwaway profile and a single seeded page.
pub struct ChromiumSession {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    page: ChromiumPage,
    profile: TempDir,
}

impl ChromiumSession {
    /// Launches Chromium and restores the saved session into a fresh page.
    pub async fn launch(
        options: &LaunchOptions,
        web_origin: &str,
        artifact: &SessionArtifact,
    ) -> Result<Self, SwitchboardError> {
        let profile = tempfile::Builder::new()
            .prefix("switchboard-profile-")
            .tempdir()
            .map_err(|e| SwitchboardError::Browser {
                message: format!("cannot create browser profile directory: {e}"),
                source: Some(Box::new(e)),
            })?;
        let config = launch_config(options, &profile)?;

        let (mut browser, mut events) = Browser::launch(config)
            .await
            .map_err(|e| cdp_error("failed to launch chromium", e))?;
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "devtools handler event error");
                }
            }
        });

        match prepare_page(&browser, web_origin, artifact).await {
            Ok(page) => {
                info!(profile = %profile.path().display(), "browser session opened");
                Ok(Self {
                    browser: Mutex::new(browser),
                    handler,
                    page: ChromiumPage { page },
                    profile,
                })
            }
            Err(err) => {
                if let Err(close_err) = browser.close().await {
                    warn!(error = %close_err, "failed to close browser after setup error");
                }
                let _ = browser.wait().await;
                handler.abort();
                Err(err)
            }
        }
    }
}

async fn prepare_page(
    browser: &Browser,
    web_origin: &str,
    artifact: &SessionArtifact,
) -> Result<Page, SwitchboardError> {
    let grant = GrantPermissionsParams::builder()
        .permission(PermissionType::Notifications)
        .origin(web_origin)
        .build()
        .map_err(SwitchboardError::browser)?;
    browser
        .execute(grant)
        .await
        .map_err(|e| cdp_error("failed to grant notifications permission", e))?;

    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| cdp_error("failed to open page", e))?;

    if !artifact.cookies.is_empty() {
        let cookies = artifact
            .cookies
            .iter()
            .map(cookie_param)
            .collect::<Result<Vec<_>, _>>()?;
        page.execute(SetCookiesParams::new(cookies))
            .await
            .map_err(|e| cdp_error("failed to seed cookies", e))?;
    }

    if let Some(script) = local_storage_script(artifact) {
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(script))
            .await
            .map_err(|e| cdp_error("failed to seed local storage", e))?;
    }

    debug!(
        cookies = artifact.cookie_count(),
        storage_entries = artifact.storage_entry_count(),
        "session seeded"
    );
    Ok(page)
}

fn cookie_param(cookie: &StoredCookie) -> Result<CookieParam, SwitchboardError> {
    let mut builder = CookieParam::builder()
        .name(cookie.name.clone())
        .value(cookie.value.clone())
        .domain(cookie.domain.clone())
        .path(cookie.path.clone())
        .secure(cookie.secure)
        .http_only(cookie.http_only);
    if cookie.expires > 0.0 {
        builder = builder.expires(TimeSinceEpoch::new(cookie.expires));
    }
    if let Some(same_site) = same_site(cookie.same_site.as_deref()) {
        builder = builder.same_site(same_site);
    }
    builder
        .build()
        .map_err(|e| SwitchboardError::Session {
            message: format!("cookie '{}' cannot be restored: {e}", cookie.name),
            source: None,
        })
}

fn same_site(value: Option<&str>) -> Option<CookieSameSite> {
    match value?.to_ascii_lowercase().as_str() {
        "strict" => Some(CookieSameSite::Strict),
        "lax" => Some(CookieSameSite::Lax),
        "none" => Some(CookieSameSite::None),
        _ => None,
    }
}

/// Builds the script that writes saved local storage on every new document
/// of a matching origin, before the web app's own scripts run.
pub(crate) fn local_storage_script(artifact: &SessionArtifact) -> Option<String> {
    let mut by_origin = Map::new();
    for origin in &artifact.origins {
        if origin.local_storage.is_empty() {
            continue;
        }
        let entries: Vec<Value> = origin
            .local_storage
            .iter()
            .map(|entry| json!([entry.name, entry.value]))
            .collect();
        by_origin.insert(origin.origin.trim_end_matches('/').to_string(), Value::Array(entries));
    }
    if by_origin.is_empty() {
        return None;
    }
    Some(format!(
        "(() => {{ const saved = {}; const entries = saved[window.location.origin]; \
         if (!entries) return; for (const [name, value] of entries) {{ \
         try {{ window.localStorage.setItem(name, value); }} catch (e) {{}} }} }})()",
        Value::Object(by_origin)
    ))
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    fn page(&self) -> &dyn PageDriver {
        &self.page
    }

    async fn close(self: Box<Self>) -> Result<(), SwitchboardError> {
        let Self {
            browser,
            handler,
            profile,
            ..
        } = *self;
        let mut browser = browser.into_inner();
        let closed = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| cdp_error("failed to close browser", e));
        if let Err(e) = browser.wait().await {
            debug!(error = %e, "browser process did not exit cleanly");
        }
        handler.abort();
        if let Err(e) = profile.close() {
            debug!(error = %e, "failed to remove browser profile directory");
        }
        debug!("browser session closed");
        closed
    }
}

/// A Chromium page.
#[derive(Clone)]
pub struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl PageDriver for ChromiumPage {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), SwitchboardError> {
        let response = tokio::time::timeout(timeout, self.page.execute(NavigateParams::new(url)))
            .await
            .map_err(|_| SwitchboardError::Timeout { duration: timeout })?
            .map_err(|e| cdp_error(&format!("navigation to {url} failed"), e))?;
        if let Some(error_text) = &response.result.error_text {
            return Err(SwitchboardError::browser(format!(
                "navigation to {url} failed: {error_text}"
            )));
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String, SwitchboardError> {
        let value = self.evaluate("window.location.href").await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SwitchboardError::browser("page did not report its location"))
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, SwitchboardError> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .return_by_value(true)
            .await_promise(true)
            .build()
            .map_err(SwitchboardError::browser)?;
        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(|e| cdp_error("script evaluation failed", e))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn mouse_wheel(&self, x: f64, y: f64, delta_y: f64) -> Result<(), SwitchboardError> {
        let params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseWheel)
            .x(x)
            .y(y)
            .delta_x(0.0)
            .delta_y(delta_y)
            .build()
            .map_err(SwitchboardError::browser)?;
        self.page
            .execute(params)
            .await
            .map_err(|e| cdp_error("mouse wheel dispatch failed", e))?;
        Ok(())
    }
}
