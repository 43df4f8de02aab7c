// ─── Forge ───
// Versions come from the Forge maven's maven-metadata.xml, where each entry
// is `<minecraft>-<forge>[-<branch>]`.

use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::info;

use super::client::{LoaderClient, LoaderFile, LoaderVersion};
use crate::core::error::ApiResult;
use crate::core::http::fetch_text;

pub const FORGE_MAVEN: &str = "https://maven.minecraftforge.net";
const FORGE_PATH: &str = "net/minecraftforge/forge";
const SOURCE: &str = "Forge maven";

/// Minimal maven-metadata.xml model.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MavenMetadata {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub artifact_id: Option<String>,
    #[serde(default)]
    pub versioning: Versioning,
}

#[derive(Debug, Deserialize, Default)]
pub struct Versioning {
    #[serde(default)]
    pub latest: Option<String>,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub versions: VersionList,
}

#[derive(Debug, Deserialize, Default)]
pub struct VersionList {
    #[serde(default, rename = "version")]
    pub items: Vec<String>,
}

impl MavenMetadata {
    pub fn parse(xml: &str) -> ApiResult<Self> {
        Ok(from_str(xml)?)
    }
}

/// Split `1.20.1-47.2.0` into `("1.20.1", "47.2.0")`.
pub fn split_version(full: &str) -> Option<(&str, &str)> {
    let (minecraft, forge) = full.split_once('-')?;
    if minecraft.is_empty() || forge.is_empty() {
        return None;
    }
    Some((minecraft, forge))
}

pub fn installer_url(maven_url: &str, full_version: &str) -> String {
    format!(
        "{}/{FORGE_PATH}/{full_version}/forge-{full_version}-installer.jar",
        maven_url.trim_end_matches('/')
    )
}

pub(crate) fn installers_from(
    metadata: &MavenMetadata,
    maven_url: &str,
    game_version: Option<&str>,
) -> Vec<LoaderVersion> {
    metadata
        .versioning
        .versions
        .items
        .iter()
        .filter_map(|full| {
            let (minecraft, forge) = split_version(full.trim())?;
            if game_version.is_some_and(|gv| gv != minecraft) {
                return None;
            }
            Some(LoaderVersion {
                version: forge.to_string(),
                minecraft_version: Some(minecraft.to_string()),
                files: vec![LoaderFile::installer(&installer_url(maven_url, full.trim()))],
            })
        })
        .collect()
}

pub struct ForgeClient {
    client: reqwest::Client,
    maven_url: String,
}

impl ForgeClient {
    pub fn new(client: reqwest::Client, maven_url: &str) -> Self {
        Self {
            client,
            maven_url: maven_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_metadata(&self) -> ApiResult<MavenMetadata> {
        let url = format!("{}/{FORGE_PATH}/maven-metadata.xml", self.maven_url);
        match fetch_text(self.client.get(&url), SOURCE).await? {
            Some(xml) => MavenMetadata::parse(&xml),
            None => Ok(MavenMetadata::default()),
        }
    }
}

#[async_trait]
impl LoaderClient for ForgeClient {
    async fn installers(&self, game_version: Option<&str>) -> ApiResult<Vec<LoaderVersion>> {
        let metadata = self.fetch_metadata().await?;
        let installers = installers_from(&metadata, &self.maven_url, game_version);
        info!(
            "Forge installers{}: {}",
            game_version.map(|gv| format!(" for {gv}")).unwrap_or_default(),
            installers.len()
        );
        Ok(installers)
    }

    async fn versions(&self, game_version: Option<&str>) -> ApiResult<Vec<String>> {
        let installers = self.installers(game_version).await?;
        let mut versions: Vec<String> = Vec::with_capacity(installers.len());
        for installer in installers {
            if !versions.contains(&installer.version) {
                versions.push(installer.version);
            }
        }
        Ok(versions)
    }
}
