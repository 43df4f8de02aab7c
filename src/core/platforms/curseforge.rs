// ─── CurseForge adapter ───
// https://docs.curseforge.com/rest-api/ (v1, Minecraft game id 432)

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{info, warn};

use super::client::PlatformClient;
use crate::core::json::{lenient, timestamp};
use super::model::*;
use crate::core::error::ApiResult;
use crate::core::http::{fetch_json, fetch_text};

pub const CURSEFORGE_API: &str = "https://api.curseforge.com/v1";
pub const PLATFORM_NAME: &str = "CurseForge";
const MINECRAFT_GAME_ID: u32 = 432;
const MAX_PAGE_SIZE: u32 = 50;
const SORT_BY_POPULARITY: u32 = 2;
const MEMBERS_URL: &str = "https://www.curseforge.com/members";

// ── Code tables ─────────────────────────────────────────

/// Content class id for a project type, `None` when CurseForge has no such class.
pub fn class_id(project_type: &str) -> Option<u32> {
    match project_type.trim().to_ascii_lowercase().as_str() {
        "mod" => Some(6),
        "modpack" => Some(4471),
        "resourcepack" => Some(12),
        "shader" => Some(6552),
        "datapack" => Some(6945),
        _ => None,
    }
}

pub fn project_type_name(class_id: u32) -> &'static str {
    match class_id {
        6 => "mod",
        4471 => "modpack",
        12 => "resourcepack",
        6552 => "shader",
        6945 => "datapack",
        _ => "",
    }
}

/// `ModLoaderType` search code for a loader name.
pub fn loader_code(loader: &str) -> Option<u32> {
    match loader.trim().to_ascii_lowercase().as_str() {
        "any" => Some(0),
        "forge" => Some(1),
        "cauldron" => Some(2),
        "liteloader" => Some(3),
        "fabric" => Some(4),
        "quilt" => Some(5),
        "neoforge" => Some(6),
        _ => None,
    }
}

pub fn loader_name(code: i64) -> &'static str {
    match code {
        1 => "Forge",
        4 => "Fabric",
        5 => "Quilt",
        6 => "NeoForge",
        _ => "Unknown",
    }
}

pub fn release_type(code: i64) -> ReleaseType {
    match code {
        1 => ReleaseType::Release,
        2 => ReleaseType::Beta,
        3 => ReleaseType::Alpha,
        _ => ReleaseType::Unknown,
    }
}

pub fn dependency_type(relation: i64) -> DependencyType {
    match relation {
        1 | 6 => DependencyType::Embedded,
        2 => DependencyType::Optional,
        3 => DependencyType::Required,
        _ => DependencyType::Unknown,
    }
}

const HASH_ALGO_SHA1: i64 = 1;

// ── Wire types ──────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default, bound(deserialize = "T: serde::de::DeserializeOwned + Default"))]
pub(crate) struct Envelope<T: Default> {
    #[serde(deserialize_with = "lenient")]
    data: T,
    #[serde(deserialize_with = "lenient")]
    pagination: Pagination,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Pagination {
    #[serde(deserialize_with = "lenient")]
    index: u32,
    #[serde(deserialize_with = "lenient")]
    page_size: u32,
    #[serde(deserialize_with = "lenient")]
    total_count: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Mod {
    #[serde(deserialize_with = "lenient")]
    id: u64,
    #[serde(deserialize_with = "lenient")]
    class_id: u32,
    #[serde(deserialize_with = "lenient")]
    name: String,
    #[serde(deserialize_with = "lenient")]
    slug: String,
    #[serde(deserialize_with = "lenient")]
    summary: String,
    // Reported as a float.
    #[serde(deserialize_with = "lenient")]
    download_count: f64,
    #[serde(deserialize_with = "lenient")]
    categories: Vec<Category>,
    #[serde(deserialize_with = "lenient")]
    authors: Vec<ModAuthor>,
    #[serde(deserialize_with = "lenient")]
    screenshots: Vec<Screenshot>,
    #[serde(deserialize_with = "lenient")]
    logo: Logo,
    #[serde(deserialize_with = "lenient")]
    links: Links,
    #[serde(deserialize_with = "lenient")]
    date_created: String,
    #[serde(deserialize_with = "lenient")]
    date_modified: String,
    #[serde(deserialize_with = "lenient")]
    latest_files_indexes: Vec<FileIndex>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Category {
    #[serde(deserialize_with = "lenient")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModAuthor {
    #[serde(deserialize_with = "lenient")]
    id: u64,
    #[serde(deserialize_with = "lenient")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Screenshot {
    #[serde(deserialize_with = "lenient")]
    title: String,
    #[serde(deserialize_with = "lenient")]
    description: String,
    #[serde(deserialize_with = "lenient")]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Logo {
    #[serde(deserialize_with = "lenient")]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Links {
    #[serde(deserialize_with = "lenient")]
    website_url: String,
    #[serde(deserialize_with = "lenient")]
    wiki_url: String,
    #[serde(deserialize_with = "lenient")]
    issues_url: String,
    #[serde(deserialize_with = "lenient")]
    source_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FileIndex {
    #[serde(deserialize_with = "lenient")]
    game_version: String,
    #[serde(deserialize_with = "lenient")]
    mod_loader: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct File {
    #[serde(deserialize_with = "lenient")]
    id: u64,
    #[serde(deserialize_with = "lenient")]
    mod_id: u64,
    #[serde(deserialize_with = "lenient")]
    display_name: String,
    #[serde(deserialize_with = "lenient")]
    file_name: String,
    #[serde(deserialize_with = "lenient")]
    release_type: i64,
    #[serde(deserialize_with = "lenient")]
    file_date: String,
    #[serde(deserialize_with = "lenient")]
    file_length: u64,
    #[serde(deserialize_with = "lenient")]
    download_count: u64,
    #[serde(deserialize_with = "lenient")]
    download_url: String,
    #[serde(deserialize_with = "lenient")]
    hashes: Vec<FileHash>,
    #[serde(deserialize_with = "lenient")]
    game_versions: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    dependencies: Vec<FileDependency>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileHash {
    #[serde(deserialize_with = "lenient")]
    value: String,
    #[serde(deserialize_with = "lenient")]
    algo: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FileDependency {
    #[serde(deserialize_with = "lenient")]
    mod_id: u64,
    #[serde(deserialize_with = "lenient")]
    relation_type: i64,
}

// ── Normalization ───────────────────────────────────────

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// `body` is the HTML description, fetched separately and possibly empty.
pub(crate) fn normalize_mod(m: Mod, body: String) -> PlatformProject {
    let mut game_versions = Vec::new();
    let mut loaders = Vec::new();
    for index in &m.latest_files_indexes {
        if index.game_version.is_empty() {
            continue;
        }
        push_unique(&mut game_versions, &index.game_version);
        if let Some(code) = index.mod_loader {
            push_unique(&mut loaders, loader_name(code));
        }
    }

    let mut categories = Vec::new();
    for category in &m.categories {
        push_unique(&mut categories, &category.name);
    }

    let authors = m
        .authors
        .into_iter()
        .map(|a| Author {
            id: a.id.to_string(),
            url: format!("{MEMBERS_URL}/{}/projects", a.name),
            name: a.name,
        })
        .collect();

    let gallery = m
        .screenshots
        .into_iter()
        .map(|s| GalleryImage {
            url: s.url,
            title: s.title,
            description: s.description,
            ..Default::default()
        })
        .collect();

    let links = [
        ("Website", m.links.website_url),
        ("Wiki", m.links.wiki_url),
        ("Issues", m.links.issues_url),
        ("Source", m.links.source_url),
    ]
    .into_iter()
    .filter(|(_, url)| !url.trim().is_empty())
    .map(|(name, url)| PlatformLink {
        name: name.to_string(),
        url,
    })
    .collect();

    let id = if m.id == 0 { String::new() } else { m.id.to_string() };

    PlatformProject {
        platforms: vec![PlatformSource {
            id: id.clone(),
            name: PLATFORM_NAME.to_string(),
        }],
        id,
        slug: m.slug,
        name: m.name,
        description: m.summary,
        body,
        downloads: m.download_count.max(0.0) as u64,
        authors,
        categories,
        loaders,
        game_versions,
        gallery,
        links,
        created: timestamp(&m.date_created),
        updated: timestamp(&m.date_modified),
        sides: SupportedSides::default(),
        project_type: project_type_name(m.class_id).to_string(),
        icon_url: m.logo.url,
    }
}

/// `gameVersions` on a file mixes game versions, loader names and
/// environment markers ("Client", "Server").
pub(crate) fn normalize_file(file: File, changelog: String) -> PlatformVersion {
    let mut game_versions = Vec::new();
    let mut loaders = Vec::new();
    for tag in &file.game_versions {
        if is_loader_tag(tag) {
            push_unique(&mut loaders, tag);
        } else if tag.starts_with(|c: char| c.is_ascii_digit()) {
            push_unique(&mut game_versions, tag);
        }
    }

    let hash = file
        .hashes
        .iter()
        .find(|h| h.algo == HASH_ALGO_SHA1 && !h.value.is_empty())
        .map(|h| h.value.clone());

    let files = vec![VersionFile {
        url: file.download_url,
        file_name: file.file_name.clone(),
        size: file.file_length,
        hash,
        primary: true,
    }];

    let dependencies = file
        .dependencies
        .into_iter()
        .filter(|d| d.mod_id != 0)
        .map(|d| VersionDependency {
            project_id: d.mod_id.to_string(),
            version_id: None,
            dependency_type: dependency_type(d.relation_type),
        })
        .collect();

    PlatformVersion {
        id: if file.id == 0 { String::new() } else { file.id.to_string() },
        project_id: file.mod_id.to_string(),
        name: file.display_name,
        version_number: file.file_name,
        release_type: release_type(file.release_type),
        published: timestamp(&file.file_date),
        downloads: file.download_count,
        changelog,
        files,
        game_versions,
        loaders,
        dependencies,
        platform: PLATFORM_NAME.to_string(),
    }
}

pub(crate) fn normalize_search(envelope: Envelope<Vec<Mod>>, query: &str) -> SearchResults {
    SearchResults {
        results: envelope
            .data
            .into_iter()
            .map(|m| normalize_mod(m, String::new()))
            .filter(|p| !p.is_empty())
            .collect(),
        total_results: envelope.pagination.total_count,
        limit: envelope.pagination.page_size,
        offset: envelope.pagination.index,
        query: query.to_string(),
    }
}

/// CurseForge ids are numeric; anything else belongs to another platform.
fn numeric_id(id: &str) -> Option<u64> {
    id.trim().parse().ok().filter(|id| *id != 0)
}

// ── Client ──────────────────────────────────────────────

pub struct CurseForgeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

struct SearchParams<'a> {
    query: &'a str,
    class_id: Option<u32>,
    loader: Option<u32>,
    game_version: Option<&'a str>,
    limit: u32,
    offset: u32,
}

impl CurseForgeClient {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header("x-api-key", &self.api_key)
    }

    async fn run_search(&self, params: SearchParams<'_>) -> ApiResult<SearchResults> {
        let mut query: Vec<(&str, String)> = vec![
            ("gameId", MINECRAFT_GAME_ID.to_string()),
            ("searchFilter", params.query.to_string()),
            ("pageSize", params.limit.clamp(1, MAX_PAGE_SIZE).to_string()),
            ("index", params.offset.to_string()),
            ("sortField", SORT_BY_POPULARITY.to_string()),
            ("sortOrder", "desc".to_string()),
        ];
        if let Some(class_id) = params.class_id {
            query.push(("classId", class_id.to_string()));
        }
        if let Some(loader) = params.loader {
            query.push(("modLoaderType", loader.to_string()));
        }
        if let Some(game_version) = params.game_version {
            query.push(("gameVersion", game_version.to_string()));
        }

        let envelope: Option<Envelope<Vec<Mod>>> =
            fetch_json(self.get("/mods/search").query(&query), PLATFORM_NAME).await?;
        let results = normalize_search(envelope.unwrap_or_default(), params.query);

        info!(
            "CurseForge search '{}': {} of {} hits",
            params.query,
            results.results.len(),
            results.total_results
        );
        Ok(results)
    }

    async fn fetch_mod(&self, id: u64) -> ApiResult<Option<Mod>> {
        let envelope: Option<Envelope<Mod>> =
            fetch_json(self.get(&format!("/mods/{id}")), PLATFORM_NAME).await?;
        Ok(envelope.map(|e| e.data).filter(|m| m.id != 0))
    }

    /// HTML description; failures degrade to an empty body.
    async fn fetch_description(&self, id: u64) -> String {
        let path = format!("/mods/{id}/description");
        match fetch_json::<Envelope<String>>(self.get(&path), PLATFORM_NAME).await {
            Ok(envelope) => envelope.map(|e| e.data).unwrap_or_default(),
            Err(e) => {
                warn!("CurseForge description for {id} unavailable: {e}");
                String::new()
            }
        }
    }

    /// Changelog HTML; failures degrade to an empty string.
    async fn fetch_changelog(&self, mod_id: u64, file_id: u64) -> String {
        let path = format!("/mods/{mod_id}/files/{file_id}/changelog");
        match fetch_text(self.get(&path), PLATFORM_NAME).await {
            Ok(Some(text)) => serde_json::from_str::<Envelope<String>>(&text)
                .map(|e| e.data)
                .unwrap_or_default(),
            Ok(None) => String::new(),
            Err(e) => {
                warn!("CurseForge changelog for {mod_id}/{file_id} unavailable: {e}");
                String::new()
            }
        }
    }
}

#[async_trait]
impl PlatformClient for CurseForgeClient {
    fn name(&self) -> &str {
        "curseforge"
    }

    async fn search(&self, query: &SearchQuery) -> ApiResult<SearchResults> {
        let class_id = if query.project_type.trim().is_empty() {
            None
        } else {
            match class_id(&query.project_type) {
                Some(id) => Some(id),
                None => return Ok(SearchResults::empty()),
            }
        };
        let loader = match &query.loader {
            Some(name) => match loader_code(name) {
                Some(code) => Some(code),
                None => return Ok(SearchResults::empty()),
            },
            None => None,
        };

        self.run_search(SearchParams {
            query: &query.query,
            class_id,
            loader,
            game_version: query.game_version.as_deref(),
            limit: query.limit,
            offset: query.offset,
        })
        .await
    }

    /// Only single-valued filters exist upstream, so the first mappable
    /// project type and loader and the first game version are used.
    async fn advanced_search(
        &self,
        query: &str,
        options: &AdvancedSearchOptions,
        limit: u32,
        offset: u32,
    ) -> ApiResult<SearchResults> {
        let class_id = options.project_types.iter().find_map(|t| class_id(t));
        if !options.project_types.is_empty() && class_id.is_none() {
            return Ok(SearchResults::empty());
        }
        let loader = options.loaders.iter().find_map(|l| loader_code(l));
        if !options.loaders.is_empty() && loader.is_none() {
            return Ok(SearchResults::empty());
        }

        self.run_search(SearchParams {
            query,
            class_id,
            loader,
            game_version: options.game_versions.first().map(String::as_str),
            limit,
            offset,
        })
        .await
    }

    async fn get_project(&self, id: &str) -> ApiResult<Option<PlatformProject>> {
        let Some(id) = numeric_id(id) else {
            return Ok(None);
        };
        let Some(m) = self.fetch_mod(id).await? else {
            return Ok(None);
        };
        let body = self.fetch_description(id).await;
        Ok(Some(normalize_mod(m, body)))
    }

    async fn get_project_versions(
        &self,
        project_id: &str,
        filter: &VersionFilter,
    ) -> ApiResult<Vec<PlatformVersion>> {
        let Some(id) = numeric_id(project_id) else {
            return Ok(Vec::new());
        };
        let mut query: Vec<(&str, String)> = vec![("pageSize", MAX_PAGE_SIZE.to_string())];
        // Upstream takes one of each; the rest is filtered locally.
        if let [game_version] = filter.game_versions.as_slice() {
            query.push(("gameVersion", game_version.clone()));
        }
        if let [loader] = filter.loaders.as_slice() {
            if let Some(code) = loader_code(loader) {
                query.push(("modLoaderType", code.to_string()));
            }
        }

        let envelope: Option<Envelope<Vec<File>>> = fetch_json(
            self.get(&format!("/mods/{id}/files")).query(&query),
            PLATFORM_NAME,
        )
        .await?;
        let files = envelope.map(|e| e.data).unwrap_or_default();
        let versions = filter.apply(
            files
                .into_iter()
                .map(|f| normalize_file(f, String::new()))
                .filter(|v| !v.is_empty())
                .collect(),
        );

        info!("CurseForge files for {id}: {}", versions.len());
        Ok(versions)
    }

    async fn get_project_version(
        &self,
        project_id: &str,
        version_id: &str,
    ) -> ApiResult<Option<PlatformVersion>> {
        let (Some(mod_id), Some(file_id)) = (numeric_id(project_id), numeric_id(version_id)) else {
            return Ok(None);
        };
        let envelope: Option<Envelope<File>> = fetch_json(
            self.get(&format!("/mods/{mod_id}/files/{file_id}")),
            PLATFORM_NAME,
        )
        .await?;
        let Some(file) = envelope.map(|e| e.data).filter(|f| f.id != 0) else {
            return Ok(None);
        };
        let changelog = self.fetch_changelog(mod_id, file_id).await;
        Ok(Some(normalize_file(file, changelog)))
    }

    async fn get_project_icon(&self, id: &str) -> ApiResult<Option<String>> {
        let Some(id) = numeric_id(id) else {
            return Ok(None);
        };
        Ok(self
            .fetch_mod(id)
            .await?
            .map(|m| m.logo.url)
            .filter(|url| !url.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn code_tables() {
        assert_eq!(loader_name(1), "Forge");
        assert_eq!(loader_name(4), "Fabric");
        assert_eq!(loader_name(5), "Quilt");
        assert_eq!(loader_name(6), "NeoForge");
        assert_eq!(loader_name(2), "Unknown");
        assert_eq!(loader_name(-7), "Unknown");

        assert_eq!(loader_code("NeoForge"), Some(6));
        assert_eq!(loader_code("paper"), None);

        assert_eq!(class_id("modpack"), Some(4471));
        assert_eq!(class_id("plugin"), None);
        assert_eq!(project_type_name(6), "mod");

        assert_eq!(release_type(1), ReleaseType::Release);
        assert_eq!(release_type(3), ReleaseType::Alpha);
        assert_eq!(release_type(9), ReleaseType::Unknown);

        assert_eq!(dependency_type(3), DependencyType::Required);
        assert_eq!(dependency_type(2), DependencyType::Optional);
        assert_eq!(dependency_type(6), DependencyType::Embedded);
        assert_eq!(dependency_type(5), DependencyType::Unknown);
    }

    #[test]
    fn mods_are_normalized() {
        let envelope: Envelope<Vec<Mod>> = serde_json::from_value(json!({
            "data": [{
                "id": 238222,
                "classId": 6,
                "name": "Just Enough Items (JEI)",
                "slug": "jei",
                "summary": "View items and recipes",
                "downloadCount": 312345678.0,
                "categories": [{ "name": "API and Library" }, { "name": "Utility & QoL" }],
                "authors": [{ "id": 17072262, "name": "mezz", "url": "https://www.curseforge.com/members/17072262-mezz" }],
                "screenshots": [{ "title": "Recipes", "description": "", "url": "https://media/1.png" }],
                "logo": { "url": "https://media/logo.png" },
                "links": { "websiteUrl": "https://www.curseforge.com/minecraft/mc-mods/jei", "wikiUrl": "", "issuesUrl": "https://github.com/mezz/JustEnoughItems/issues", "sourceUrl": null },
                "dateCreated": "2015-11-23T20:41:42.263Z",
                "dateModified": "2024-03-01T00:00:00Z",
                "latestFilesIndexes": [
                    { "gameVersion": "1.20.1", "modLoader": 1 },
                    { "gameVersion": "1.20.1", "modLoader": 4 },
                    { "gameVersion": "1.12.2", "modLoader": null },
                    { "gameVersion": "1.19.2", "modLoader": 9 }
                ]
            }],
            "pagination": { "index": 0, "pageSize": 10, "resultCount": 1, "totalCount": 1337 }
        }))
        .unwrap();

        let results = normalize_search(envelope, "jei");
        assert_eq!(results.total_results, 1337);
        assert_eq!(results.limit, 10);

        let jei = &results.results[0];
        assert_eq!(jei.id, "238222");
        assert_eq!(jei.downloads, 312_345_678);
        assert_eq!(jei.project_type, "mod");
        assert_eq!(jei.loaders, vec!["Forge", "Fabric", "Unknown"]);
        assert_eq!(jei.game_versions, vec!["1.20.1", "1.12.2", "1.19.2"]);
        assert_eq!(jei.categories.len(), 2);
        assert_eq!(jei.authors[0].id, "17072262");
        assert_eq!(jei.authors[0].url, "https://www.curseforge.com/members/mezz/projects");
        assert_eq!(jei.gallery[0].created.timestamp(), 0);
        let link_names: Vec<&str> = jei.links.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(link_names, vec!["Website", "Issues"]);
        assert_eq!(jei.icon_url, "https://media/logo.png");
        assert_eq!(jei.platforms[0].name, "CurseForge");
    }

    #[test]
    fn malformed_mod_fields_degrade() {
        let envelope: Envelope<Vec<Mod>> = serde_json::from_value(json!({
            "data": [
                { "id": 1, "name": "Broken", "downloadCount": "many", "authors": null, "logo": 5 },
                { "name": "no id" }
            ]
        }))
        .unwrap();

        let results = normalize_search(envelope, "broken");
        assert_eq!(results.results.len(), 1);
        assert_eq!(results.results[0].downloads, 0);
        assert!(results.results[0].authors.is_empty());
        assert_eq!(results.results[0].icon_url, "");
        assert_eq!(results.total_results, 0);
    }

    #[test]
    fn files_are_normalized() {
        let file: File = serde_json::from_value(json!({
            "id": 4712866,
            "modId": 238222,
            "displayName": "jei-1.20.1-forge-15.2.0.27.jar",
            "fileName": "jei-1.20.1-forge-15.2.0.27.jar",
            "releaseType": 2,
            "fileDate": "2023-09-10T10:00:00Z",
            "fileLength": 1_234_567,
            "downloadCount": 500,
            "downloadUrl": "https://edge.forgecdn.net/files/4712/866/jei.jar",
            "hashes": [{ "value": "md5hash", "algo": 2 }, { "value": "sha1hash", "algo": 1 }],
            "gameVersions": ["Forge", "NeoForge", "1.20.1", "Client", "Server"],
            "dependencies": [{ "modId": 306612, "relationType": 3 }, { "modId": 0, "relationType": 2 }]
        }))
        .unwrap();

        let v = normalize_file(file, "<p>fixes</p>".into());
        assert_eq!(v.id, "4712866");
        assert_eq!(v.project_id, "238222");
        assert_eq!(v.release_type, ReleaseType::Beta);
        assert_eq!(v.loaders, vec!["Forge", "NeoForge"]);
        assert_eq!(v.game_versions, vec!["1.20.1"]);
        assert_eq!(v.files[0].hash.as_deref(), Some("sha1hash"));
        assert_eq!(v.files[0].size, 1_234_567);
        assert_eq!(v.dependencies.len(), 1);
        assert_eq!(v.dependencies[0].dependency_type, DependencyType::Required);
        assert_eq!(v.changelog, "<p>fixes</p>");

        let filter = VersionFilter {
            loaders: vec!["forge".into()],
            game_versions: vec!["1.20.1".into()],
            ..Default::default()
        };
        assert!(filter.matches(&v));
    }

    #[test]
    fn non_numeric_ids_are_not_curseforge_ids() {
        assert_eq!(numeric_id("238222"), Some(238222));
        assert_eq!(numeric_id("AANobbMI"), None);
        assert_eq!(numeric_id("0"), None);
        assert_eq!(numeric_id(""), None);
    }
}
