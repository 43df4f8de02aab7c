// ─── Java Runtimes ───
// Mojang's java-runtime index: for each platform and runtime component, the
// newest published build plus the files listed in its manifest.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::error::{ApiError, ApiResult};
use crate::core::http::fetch_json;
use crate::core::json::lenient;
use crate::core::version::DownloadArtifact;

pub const JAVA_RUNTIME_INDEX_URL: &str = "https://piston-meta.mojang.com/v1/products/java-runtime/2ec0cc96c44e5a76b9c8b7c39df7210883d12871/all.json";

const SOURCE: &str = "Mojang";
/// Console entry of the index; it never carries desktop builds.
const CONSOLE_PLATFORM: &str = "gamecore";

/// Components listed for a platform, in output order.
pub const RUNTIME_COMPONENTS: [&str; 6] = [
    "java-runtime-alpha",
    "java-runtime-beta",
    "java-runtime-delta",
    "java-runtime-gamma",
    "java-runtime-gamma-snapshot",
    "jre-legacy",
];

// ── Wire format ─────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
struct ReleaseManifestRef {
    #[serde(default, deserialize_with = "lenient")]
    url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ReleaseVersion {
    #[serde(default, deserialize_with = "lenient")]
    name: String,
    #[serde(default, deserialize_with = "lenient")]
    released: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RuntimeRelease {
    #[serde(default, deserialize_with = "lenient")]
    manifest: ReleaseManifestRef,
    #[serde(default, deserialize_with = "lenient")]
    version: ReleaseVersion,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RuntimeManifest {
    #[serde(default, deserialize_with = "lenient")]
    files: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestEntry {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    kind: String,
    #[serde(default, deserialize_with = "lenient")]
    executable: bool,
    #[serde(default, deserialize_with = "lenient")]
    downloads: FileDownloads,
}

#[derive(Debug, Default, Deserialize)]
struct FileDownloads {
    #[serde(default, deserialize_with = "lenient")]
    raw: Option<DownloadArtifact>,
    #[serde(default, deserialize_with = "lenient")]
    lzma: Option<DownloadArtifact>,
}

// ── Output ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JavaRuntimeFile {
    pub path: String,
    pub executable: bool,
    pub raw: Option<DownloadArtifact>,
    pub lzma: Option<DownloadArtifact>,
}

/// One runtime build for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JavaRuntime {
    pub platform: String,
    pub component: String,
    pub version: String,
    pub released: Option<DateTime<Utc>>,
    pub files: Vec<JavaRuntimeFile>,
}

/// Regular files of a runtime manifest; directories and links are skipped.
pub(crate) fn files_from(manifest: RuntimeManifest) -> Vec<JavaRuntimeFile> {
    manifest
        .files
        .into_iter()
        .filter_map(|(path, value)| {
            let entry = ManifestEntry::deserialize(value).unwrap_or_default();
            (entry.kind == "file").then(|| JavaRuntimeFile {
                path,
                executable: entry.executable,
                raw: entry.downloads.raw,
                lzma: entry.downloads.lzma,
            })
        })
        .collect()
}

// ── Index ───────────────────────────────────────────────

/// The `all.json` document: platform -> component -> builds, newest first.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct JavaRuntimeIndex {
    platforms: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

impl JavaRuntimeIndex {
    pub async fn fetch(client: &reqwest::Client, url: &str) -> ApiResult<Self> {
        debug!(url, "fetching java runtime index");
        fetch_json(client.get(url), SOURCE)
            .await?
            .ok_or_else(|| ApiError::upstream(SOURCE, "java runtime index not found"))
    }

    /// Desktop platforms the index has builds for.
    pub fn platforms(&self) -> Vec<&str> {
        self.platforms
            .keys()
            .map(String::as_str)
            .filter(|p| *p != CONSOLE_PLATFORM)
            .collect()
    }

    /// `(platform, component, newest build)` for every usable entry,
    /// optionally narrowed to one platform.
    fn releases(&self, platform: Option<&str>) -> Vec<(&str, &'static str, RuntimeRelease)> {
        let mut out = Vec::new();
        for name in self.platforms() {
            if platform.is_some_and(|p| p != name) {
                continue;
            }
            let Some(components) = self.platforms.get(name) else {
                continue;
            };
            for component in RUNTIME_COMPONENTS {
                let newest = components
                    .get(component)
                    .and_then(|builds| builds.as_array())
                    .and_then(|builds| builds.first())
                    .and_then(|build| RuntimeRelease::deserialize(build).ok())
                    .filter(|release| !release.manifest.url.is_empty());
                if let Some(release) = newest {
                    out.push((name, component, release));
                }
            }
        }
        out
    }

    /// Resolve every runtime for `platform` (all platforms when `None`).
    ///
    /// A manifest that cannot be fetched drops that one runtime from the
    /// listing. An unknown platform is an `InvalidArgument`.
    pub async fn runtimes(
        &self,
        client: &reqwest::Client,
        platform: Option<&str>,
    ) -> ApiResult<Vec<JavaRuntime>> {
        let platform = platform.map(str::trim).filter(|p| !p.is_empty());
        if let Some(requested) = platform {
            if !self.platforms().contains(&requested) {
                return Err(ApiError::InvalidArgument(format!(
                    "Invalid operating system: '{}'",
                    requested
                )));
            }
        }

        let calls = self
            .releases(platform)
            .into_iter()
            .map(|(name, component, release)| async move {
                let manifest =
                    fetch_json::<RuntimeManifest>(client.get(&release.manifest.url), SOURCE).await;
                match manifest {
                    Ok(Some(manifest)) => Some(JavaRuntime {
                        platform: name.to_string(),
                        component: component.to_string(),
                        version: release.version.name,
                        released: release.version.released,
                        files: files_from(manifest),
                    }),
                    Ok(None) => {
                        warn!("{name}/{component}: runtime manifest not found");
                        None
                    }
                    Err(e) => {
                        warn!("{name}/{component}: runtime manifest skipped: {e}");
                        None
                    }
                }
            });
        let runtimes: Vec<JavaRuntime> = join_all(calls).await.into_iter().flatten().collect();

        info!(count = runtimes.len(), "java runtimes resolved");
        Ok(runtimes)
    }
}
