// ─── Version Manifest ───
// Mojang launcher manifest: version index, history split, jar lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::error::{ApiError, ApiResult};
use crate::core::http::fetch_json;

pub const VERSION_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// The `version_manifest_v2.json` document.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub latest: LatestVersions,
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestVersions {
    pub release: String,
    pub snapshot: String,
}

/// One published version, pointing at its version JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    pub url: String,
    pub time: DateTime<Utc>,
    pub release_time: DateTime<Utc>,
    #[serde(default)]
    pub sha1: Option<String>,
}

/// Manifest entry as served to callers.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MinecraftVersion {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    pub time: DateTime<Utc>,
    pub release_time: DateTime<Utc>,
    pub latest: bool,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct VersionHistory {
    pub releases: Vec<MinecraftVersion>,
    pub snapshots: Vec<MinecraftVersion>,
}

/// Dotted numeric version with two to four parts; absent parts sort first.
fn numeric_version(id: &str) -> Option<[i64; 4]> {
    let parts: Vec<&str> = id.trim().split('.').collect();
    if !(2..=4).contains(&parts.len()) {
        return None;
    }
    let mut out = [-1i64; 4];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part.parse::<u32>().ok()? as i64;
    }
    Some(out)
}

impl VersionManifest {
    /// Downloads and parses the manifest at `url`.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> ApiResult<Self> {
        debug!(url, "fetching version manifest");

        let manifest: VersionManifest = fetch_json(client.get(url), "Mojang")
            .await?
            .ok_or_else(|| ApiError::upstream("Mojang", "version manifest not found"))?;

        info!(count = manifest.versions.len(), "version manifest loaded");
        Ok(manifest)
    }

    /// Looks up an entry by its exact id.
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Split the manifest into releases and snapshots.
    ///
    /// `major` (e.g. `1.20`) keeps releases in `[1.20, 1.21)` and suppresses
    /// snapshots. Snapshots are only listed when `snapshots` is set.
    pub fn history(&self, major: Option<&str>, snapshots: bool) -> ApiResult<VersionHistory> {
        let range = match major.map(str::trim).filter(|m| !m.is_empty()) {
            Some(major) => {
                let lower = numeric_version(major).ok_or_else(|| {
                    ApiError::InvalidArgument(format!("Not a version filter: {major}"))
                })?;
                let upper = [lower[0], lower[1] + 1, -1, -1];
                Some((lower, upper))
            }
            None => None,
        };

        let mut history = VersionHistory::default();
        for entry in &self.versions {
            if entry.version_type == "snapshot" {
                if snapshots && range.is_none() {
                    history
                        .snapshots
                        .push(self.describe(entry, &self.latest.snapshot));
                }
                continue;
            }

            let in_range = match range {
                Some((lower, upper)) => {
                    numeric_version(&entry.id).is_some_and(|v| v >= lower && v < upper)
                }
                None => true,
            };
            if in_range {
                history
                    .releases
                    .push(self.describe(entry, &self.latest.release));
            }
        }
        Ok(history)
    }

    fn describe(&self, entry: &VersionEntry, latest_id: &str) -> MinecraftVersion {
        MinecraftVersion {
            id: entry.id.clone(),
            version_type: entry.version_type.clone(),
            time: entry.time,
            release_time: entry.release_time,
            latest: entry.id == latest_id,
        }
    }
}
