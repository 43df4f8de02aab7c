// ─── Fabric Meta ───
// https://meta.fabricmc.net/v2/versions

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::client::{LoaderClient, LoaderFile, LoaderVersion};
use crate::core::error::ApiResult;
use crate::core::http::fetch_json;

pub const FABRIC_META: &str = "https://meta.fabricmc.net/v2";
const SOURCE: &str = "Fabric Meta";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FabricVersions {
    #[serde(default)]
    installer: Vec<FabricInstaller>,
    #[serde(default)]
    loader: Vec<FabricLoader>,
}

#[derive(Debug, Default, Deserialize)]
struct FabricInstaller {
    #[serde(default)]
    url: String,
    #[serde(default)]
    version: String,
}

#[derive(Debug, Default, Deserialize)]
struct FabricLoader {
    #[serde(default)]
    version: String,
}

/// Entry of `/versions/loader/{game_version}`.
#[derive(Debug, Deserialize)]
struct LoaderForGame {
    loader: FabricLoader,
}

/// Installers are game-version independent; entries without an absolute
/// download URL are skipped.
pub(crate) fn installers_from(versions: FabricVersions) -> Vec<LoaderVersion> {
    versions
        .installer
        .into_iter()
        .filter(|i| reqwest::Url::parse(&i.url).is_ok())
        .map(|i| LoaderVersion {
            files: vec![LoaderFile::installer(&i.url)],
            version: i.version,
            minecraft_version: None,
        })
        .collect()
}

pub struct FabricClient {
    client: reqwest::Client,
    base_url: String,
}

impl FabricClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_versions(&self) -> ApiResult<FabricVersions> {
        let url = format!("{}/versions", self.base_url);
        Ok(fetch_json(self.client.get(&url), SOURCE)
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl LoaderClient for FabricClient {
    async fn installers(&self, _game_version: Option<&str>) -> ApiResult<Vec<LoaderVersion>> {
        let installers = installers_from(self.fetch_versions().await?);
        info!("Fabric installers: {}", installers.len());
        Ok(installers)
    }

    async fn versions(&self, game_version: Option<&str>) -> ApiResult<Vec<String>> {
        let versions: Vec<String> = match game_version {
            Some(game_version) => {
                let url = format!("{}/versions/loader/{}", self.base_url, game_version);
                let entries: Vec<LoaderForGame> = fetch_json(self.client.get(&url), SOURCE)
                    .await?
                    .unwrap_or_default();
                entries.into_iter().map(|e| e.loader.version).collect()
            }
            None => self
                .fetch_versions()
                .await?
                .loader
                .into_iter()
                .map(|l| l.version)
                .collect(),
        };
        Ok(versions.into_iter().filter(|v| !v.is_empty()).collect())
    }
}
