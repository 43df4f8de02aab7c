use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::ApiResult;

use super::{fabric::FabricClient, forge::ForgeClient};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoaderFileKind {
    Server,
    Client,
    Installer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoaderFile {
    pub file_name: String,
    pub url: String,
    pub kind: LoaderFileKind,
}

impl LoaderFile {
    /// Installer download named after the last URL segment.
    pub fn installer(url: &str) -> Self {
        let file_name = url.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            file_name,
            url: url.to_string(),
            kind: LoaderFileKind::Installer,
        }
    }
}

/// One release of a loader, optionally bound to a Minecraft version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoaderVersion {
    pub version: String,
    pub minecraft_version: Option<String>,
    pub files: Vec<LoaderFile>,
}

#[async_trait]
pub trait LoaderClient: Send + Sync {
    /// Installer downloads, narrowed to `game_version` where the loader
    /// ships per-version installers.
    async fn installers(&self, game_version: Option<&str>) -> ApiResult<Vec<LoaderVersion>>;

    async fn installer(
        &self,
        version_id: &str,
        game_version: Option<&str>,
    ) -> ApiResult<Vec<LoaderVersion>> {
        Ok(self
            .installers(game_version)
            .await?
            .into_iter()
            .filter(|v| v.version == version_id)
            .collect())
    }

    /// Loader version strings, newest first as published upstream.
    async fn versions(&self, game_version: Option<&str>) -> ApiResult<Vec<String>>;
}

/// Static dispatch over the supported loader clients.
pub enum Loader {
    Fabric(FabricClient),
    Forge(ForgeClient),
}

impl Loader {
    /// Look a loader up by name; unknown loaders are `None`.
    pub fn from_name(
        name: &str,
        client: reqwest::Client,
        fabric_meta_url: &str,
        forge_maven_url: &str,
    ) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "fabric" => Some(Self::Fabric(FabricClient::new(client, fabric_meta_url))),
            "forge" => Some(Self::Forge(ForgeClient::new(client, forge_maven_url))),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Loader::Fabric(_) => "fabric",
            Loader::Forge(_) => "forge",
        }
    }

    pub async fn installers(&self, game_version: Option<&str>) -> ApiResult<Vec<LoaderVersion>> {
        match self {
            Loader::Fabric(c) => c.installers(game_version).await,
            Loader::Forge(c) => c.installers(game_version).await,
        }
    }

    pub async fn installer(
        &self,
        version_id: &str,
        game_version: Option<&str>,
    ) -> ApiResult<Vec<LoaderVersion>> {
        match self {
            Loader::Fabric(c) => c.installer(version_id, game_version).await,
            Loader::Forge(c) => c.installer(version_id, game_version).await,
        }
    }

    pub async fn versions(&self, game_version: Option<&str>) -> ApiResult<Vec<String>> {
        match self {
            Loader::Fabric(c) => c.versions(game_version).await,
            Loader::Forge(c) => c.versions(game_version).await,
        }
    }
}
