use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::error::{ApiError, ApiResult};
use crate::core::http::{build_http_client, APP_USER_AGENT};
use crate::core::java::JAVA_RUNTIME_INDEX_URL;
use crate::core::loaders::fabric::FABRIC_META;
use crate::core::loaders::forge::FORGE_MAVEN;
use crate::core::loaders::Loader;
use crate::core::platforms::curseforge::CURSEFORGE_API;
use crate::core::platforms::modrinth::MODRINTH_API;
use crate::core::platforms::{CurseForgeClient, ModrinthClient, PlatformClient, UniversalClient};
use crate::core::server::status::DEFAULT_CONNECT_TIMEOUT;
use crate::core::server::ServerStatusClient;
use crate::core::version::manifest::VERSION_MANIFEST_URL;

const APP_DIR_NAME: &str = "minecraft-api";
const SETTINGS_FILE: &str = "settings.json";
pub const CURSEFORGE_KEY_ENV: &str = "CURSEFORGE_API_KEY";

/// Upstream endpoints, credentials and timeouts. Every field has a default,
/// so a partial settings file is fine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiSettings {
    pub modrinth_base_url: String,
    pub curseforge_base_url: String,
    pub curseforge_api_key: String,
    pub fabric_meta_url: String,
    pub forge_maven_url: String,
    pub version_manifest_url: String,
    pub java_runtime_url: String,
    pub user_agent: String,
    /// Timeouts below are in seconds; 0 disables that deadline, except for
    /// the status connect which is always bounded and falls back to 5s.
    pub http_timeout_secs: u64,
    pub platform_timeout_secs: u64,
    pub status_connect_timeout_secs: u64,
    pub status_read_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            modrinth_base_url: MODRINTH_API.to_string(),
            curseforge_base_url: CURSEFORGE_API.to_string(),
            curseforge_api_key: String::new(),
            fabric_meta_url: FABRIC_META.to_string(),
            forge_maven_url: FORGE_MAVEN.to_string(),
            version_manifest_url: VERSION_MANIFEST_URL.to_string(),
            java_runtime_url: JAVA_RUNTIME_INDEX_URL.to_string(),
            user_agent: APP_USER_AGENT.to_string(),
            http_timeout_secs: 30,
            platform_timeout_secs: 20,
            status_connect_timeout_secs: 5,
            status_read_timeout_secs: 10,
        }
    }
}

impl ApiSettings {
    /// Settings file location plus the environment override.
    pub fn load() -> Self {
        Self::load_from(&settings_path()).with_api_key(std::env::var(CURSEFORGE_KEY_ENV).ok())
    }

    /// Missing or unreadable files give the defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring unreadable settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> ApiResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ApiError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// A non-blank key replaces the configured one.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
            self.curseforge_api_key = key;
        }
        self
    }

    pub fn has_curseforge_key(&self) -> bool {
        !self.curseforge_api_key.trim().is_empty()
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        seconds(self.http_timeout_secs)
    }

    pub fn platform_timeout(&self) -> Option<Duration> {
        seconds(self.platform_timeout_secs)
    }

    pub fn status_connect_timeout(&self) -> Duration {
        seconds(self.status_connect_timeout_secs).unwrap_or(DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn status_read_timeout(&self) -> Option<Duration> {
        seconds(self.status_read_timeout_secs)
    }
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(SETTINGS_FILE)
}

/// Shared, read-only state for every operation.
pub struct AppState {
    pub settings: ApiSettings,
    pub http_client: Client,
    pub platforms: UniversalClient,
    pub status_client: ServerStatusClient,
}

impl AppState {
    pub fn new(settings: ApiSettings) -> ApiResult<Self> {
        let http_client = build_http_client(&settings.user_agent, settings.http_timeout())?;

        let mut clients: Vec<Arc<dyn PlatformClient>> = vec![Arc::new(ModrinthClient::new(
            http_client.clone(),
            &settings.modrinth_base_url,
        ))];
        if settings.has_curseforge_key() {
            clients.push(Arc::new(CurseForgeClient::new(
                http_client.clone(),
                &settings.curseforge_base_url,
                &settings.curseforge_api_key,
            )));
        } else {
            warn!("No CurseForge API key configured; CurseForge is disabled");
        }
        let platforms = UniversalClient::new(clients, settings.platform_timeout());
        info!("Platforms registered: {:?}", platforms.platforms());

        let status_client = ServerStatusClient::new()
            .with_connect_timeout(settings.status_connect_timeout())
            .with_read_timeout(settings.status_read_timeout());

        Ok(Self {
            settings,
            http_client,
            platforms,
            status_client,
        })
    }

    pub fn loader(&self, name: &str) -> Option<Loader> {
        Loader::from_name(
            name,
            self.http_client.clone(),
            &self.settings.fabric_meta_url,
            &self.settings.forge_maven_url,
        )
    }
}
