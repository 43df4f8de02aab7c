// ─── Version File ───
// Per-version Mojang JSON, reduced to the jar and mapping downloads.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::manifest::VersionManifest;
use crate::core::error::{ApiError, ApiResult};
use crate::core::http::fetch_json;

#[derive(Debug, Deserialize)]
pub struct VersionJson {
    pub id: String,
    #[serde(default)]
    pub downloads: VersionDownloads,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionDownloads {
    #[serde(default)]
    pub client: Option<DownloadArtifact>,
    #[serde(default)]
    pub server: Option<DownloadArtifact>,
    #[serde(default)]
    pub client_mappings: Option<DownloadArtifact>,
    #[serde(default)]
    pub server_mappings: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub sha1: String,
    pub size: u64,
    pub url: String,
}

/// Jar and mapping downloads of one game version.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VersionJars {
    pub id: String,
    #[serde(flatten)]
    pub downloads: VersionDownloads,
}

impl VersionJson {
    pub async fn fetch(client: &reqwest::Client, url: &str) -> ApiResult<Self> {
        debug!("Fetching version JSON {url}");
        fetch_json(client.get(url), "Mojang")
            .await?
            .ok_or_else(|| ApiError::upstream("Mojang", format!("{url} not found")))
    }
}

impl VersionManifest {
    /// Resolve `id` through the manifest and read its downloads. `None` when
    /// the manifest has no such version.
    pub async fn jars(&self, client: &reqwest::Client, id: &str) -> ApiResult<Option<VersionJars>> {
        let Some(entry) = self.find_version(id) else {
            return Ok(None);
        };
        let json = VersionJson::fetch(client, &entry.url).await?;
        Ok(Some(VersionJars {
            id: json.id,
            downloads: json.downloads,
        }))
    }
}
