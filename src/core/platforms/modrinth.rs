// ─── Modrinth adapter ───
// https://docs.modrinth.com/api/ (v2)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::client::PlatformClient;
use super::facets::FacetBuilder;
use crate::core::json::{lenient, timestamp};
use super::model::*;
use crate::core::error::ApiResult;
use crate::core::http::fetch_json;

pub const MODRINTH_API: &str = "https://api.modrinth.com/v2";
pub const PLATFORM_NAME: &str = "Modrinth";
const USER_URL: &str = "https://modrinth.com/user";

// ── Wire types ──────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default, deserialize_with = "lenient")]
    hits: Vec<SearchHit>,
    #[serde(default, deserialize_with = "lenient")]
    offset: u32,
    #[serde(default, deserialize_with = "lenient")]
    limit: u32,
    #[serde(default, deserialize_with = "lenient")]
    total_hits: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SearchHit {
    #[serde(deserialize_with = "lenient")]
    project_id: String,
    #[serde(deserialize_with = "lenient")]
    slug: String,
    #[serde(deserialize_with = "lenient")]
    title: String,
    #[serde(deserialize_with = "lenient")]
    description: String,
    #[serde(deserialize_with = "lenient")]
    categories: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    versions: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    downloads: u64,
    #[serde(deserialize_with = "lenient")]
    icon_url: String,
    #[serde(deserialize_with = "lenient")]
    author: String,
    #[serde(deserialize_with = "lenient")]
    project_type: String,
    #[serde(deserialize_with = "lenient")]
    date_created: String,
    #[serde(deserialize_with = "lenient")]
    date_modified: String,
    #[serde(deserialize_with = "lenient")]
    client_side: String,
    #[serde(deserialize_with = "lenient")]
    server_side: String,
    #[serde(deserialize_with = "lenient")]
    gallery: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Project {
    #[serde(deserialize_with = "lenient")]
    id: String,
    #[serde(deserialize_with = "lenient")]
    slug: String,
    #[serde(deserialize_with = "lenient")]
    title: String,
    #[serde(deserialize_with = "lenient")]
    description: String,
    #[serde(deserialize_with = "lenient")]
    body: String,
    #[serde(deserialize_with = "lenient")]
    downloads: u64,
    #[serde(deserialize_with = "lenient")]
    categories: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    additional_categories: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    loaders: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    game_versions: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    gallery: Vec<GalleryEntry>,
    #[serde(deserialize_with = "lenient")]
    donation_urls: Vec<DonationUrl>,
    #[serde(deserialize_with = "lenient")]
    issues_url: String,
    #[serde(deserialize_with = "lenient")]
    source_url: String,
    #[serde(deserialize_with = "lenient")]
    wiki_url: String,
    #[serde(deserialize_with = "lenient")]
    discord_url: String,
    #[serde(deserialize_with = "lenient")]
    published: String,
    #[serde(deserialize_with = "lenient")]
    updated: String,
    #[serde(deserialize_with = "lenient")]
    client_side: String,
    #[serde(deserialize_with = "lenient")]
    server_side: String,
    #[serde(deserialize_with = "lenient")]
    project_type: String,
    #[serde(deserialize_with = "lenient")]
    icon_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GalleryEntry {
    #[serde(deserialize_with = "lenient")]
    url: String,
    #[serde(deserialize_with = "lenient")]
    title: String,
    #[serde(deserialize_with = "lenient")]
    description: String,
    #[serde(deserialize_with = "lenient")]
    created: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DonationUrl {
    #[serde(deserialize_with = "lenient")]
    platform: String,
    #[serde(deserialize_with = "lenient")]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Member {
    #[serde(deserialize_with = "lenient")]
    user: User,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct User {
    #[serde(deserialize_with = "lenient")]
    id: String,
    #[serde(deserialize_with = "lenient")]
    username: String,
    #[serde(deserialize_with = "lenient")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Version {
    #[serde(deserialize_with = "lenient")]
    id: String,
    #[serde(deserialize_with = "lenient")]
    project_id: String,
    #[serde(deserialize_with = "lenient")]
    name: String,
    #[serde(deserialize_with = "lenient")]
    version_number: String,
    #[serde(deserialize_with = "lenient")]
    changelog: String,
    #[serde(deserialize_with = "lenient")]
    version_type: String,
    #[serde(deserialize_with = "lenient")]
    date_published: String,
    #[serde(deserialize_with = "lenient")]
    downloads: u64,
    #[serde(deserialize_with = "lenient")]
    files: Vec<VersionFileEntry>,
    #[serde(deserialize_with = "lenient")]
    game_versions: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    loaders: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    dependencies: Vec<DependencyEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VersionFileEntry {
    #[serde(deserialize_with = "lenient")]
    url: String,
    #[serde(deserialize_with = "lenient")]
    filename: String,
    #[serde(deserialize_with = "lenient")]
    size: u64,
    #[serde(deserialize_with = "lenient")]
    primary: bool,
    #[serde(deserialize_with = "lenient")]
    hashes: FileHashes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileHashes {
    #[serde(deserialize_with = "lenient")]
    sha1: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DependencyEntry {
    #[serde(deserialize_with = "lenient")]
    project_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    version_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    dependency_type: String,
}

// ── Normalization ───────────────────────────────────────

fn sides(client: &str, server: &str) -> SupportedSides {
    SupportedSides {
        client: SideSupport::parse(client),
        server: SideSupport::parse(server),
    }
}

fn source(id: &str) -> Vec<PlatformSource> {
    vec![PlatformSource {
        id: id.to_string(),
        name: PLATFORM_NAME.to_string(),
    }]
}

fn user_url(username: &str) -> String {
    format!("{USER_URL}/{username}")
}

/// Search hits carry enough to build a project without another round trip.
/// Loaders come mixed into `categories` and are split out here.
pub(crate) fn normalize_hit(hit: SearchHit) -> PlatformProject {
    let (loaders, categories) = split_loader_tags(&hit.categories);

    let authors = if hit.author.is_empty() {
        Vec::new()
    } else {
        vec![Author {
            id: String::new(),
            url: user_url(&hit.author),
            name: hit.author,
        }]
    };

    let gallery = hit
        .gallery
        .into_iter()
        .filter(|url| !url.is_empty())
        .map(|url| GalleryImage {
            url,
            ..Default::default()
        })
        .collect();

    PlatformProject {
        platforms: source(&hit.project_id),
        sides: sides(&hit.client_side, &hit.server_side),
        created: timestamp(&hit.date_created),
        updated: timestamp(&hit.date_modified),
        id: hit.project_id,
        slug: hit.slug,
        name: hit.title,
        description: hit.description,
        body: String::new(),
        downloads: hit.downloads,
        authors,
        categories,
        loaders,
        game_versions: hit.versions,
        gallery,
        links: Vec::new(),
        project_type: hit.project_type,
        icon_url: hit.icon_url,
    }
}

pub(crate) fn normalize_search(resp: SearchResponse, query: &str) -> SearchResults {
    SearchResults {
        results: resp.hits.into_iter().map(normalize_hit).collect(),
        total_results: resp.total_hits,
        limit: resp.limit,
        offset: resp.offset,
        query: query.to_string(),
    }
}

pub(crate) fn normalize_project(project: Project, members: Vec<Member>) -> PlatformProject {
    let mut categories = project.categories;
    for extra in project.additional_categories {
        if !categories.contains(&extra) {
            categories.push(extra);
        }
    }

    let gallery = project
        .gallery
        .into_iter()
        .map(|g| GalleryImage {
            created: timestamp(&g.created),
            url: g.url,
            title: g.title,
            description: g.description,
        })
        .collect();

    let mut links: Vec<PlatformLink> = project
        .donation_urls
        .into_iter()
        .map(|d| PlatformLink {
            name: d.platform,
            url: d.url,
        })
        .collect();
    for (name, url) in [
        ("Issues", project.issues_url),
        ("Source", project.source_url),
        ("Wiki", project.wiki_url),
        ("Discord", project.discord_url),
    ] {
        links.push(PlatformLink {
            name: name.to_string(),
            url,
        });
    }
    links.retain(|l| !l.url.trim().is_empty());

    let authors = members
        .into_iter()
        .filter(|m| !m.user.username.is_empty() || !m.user.id.is_empty())
        .map(|m| Author {
            url: user_url(&m.user.username),
            name: if m.user.name.is_empty() {
                m.user.username
            } else {
                m.user.name
            },
            id: m.user.id,
        })
        .collect();

    PlatformProject {
        platforms: source(&project.id),
        sides: sides(&project.client_side, &project.server_side),
        created: timestamp(&project.published),
        updated: timestamp(&project.updated),
        id: project.id,
        slug: project.slug,
        name: project.title,
        description: project.description,
        body: project.body,
        downloads: project.downloads,
        authors,
        categories,
        loaders: project.loaders,
        game_versions: project.game_versions,
        gallery,
        links,
        project_type: project.project_type,
        icon_url: project.icon_url,
    }
}

pub(crate) fn normalize_version(version: Version) -> PlatformVersion {
    let files = version
        .files
        .into_iter()
        .map(|f| VersionFile {
            url: f.url,
            file_name: f.filename,
            size: f.size,
            hash: f.hashes.sha1,
            primary: f.primary,
        })
        .collect();

    let dependencies = version
        .dependencies
        .into_iter()
        // Dependencies pinned only by version id have no project to point at.
        .filter_map(|d| {
            let project_id = d.project_id.filter(|id| !id.is_empty())?;
            Some(VersionDependency {
                project_id,
                version_id: d.version_id.filter(|id| !id.is_empty()),
                dependency_type: DependencyType::parse(&d.dependency_type),
            })
        })
        .collect();

    PlatformVersion {
        id: version.id,
        project_id: version.project_id,
        name: version.name,
        version_number: version.version_number,
        release_type: ReleaseType::parse(&version.version_type),
        published: timestamp(&version.date_published),
        downloads: version.downloads,
        changelog: version.changelog,
        files,
        game_versions: version.game_versions,
        loaders: version.loaders,
        dependencies,
        platform: PLATFORM_NAME.to_string(),
    }
}

fn json_list(values: &[String]) -> String {
    serde_json::Value::from(values.to_vec()).to_string()
}

// ── Client ──────────────────────────────────────────────

pub struct ModrinthClient {
    client: Client,
    base_url: String,
}

impl ModrinthClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn run_search(
        &self,
        query: &str,
        facets: FacetBuilder,
        limit: u32,
        offset: u32,
    ) -> ApiResult<SearchResults> {
        let url = format!("{}/search", self.base_url);
        let mut params = vec![
            ("query", query.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
            ("index", "relevance".to_string()),
        ];
        if let Some(facets) = facets.build() {
            debug!("Modrinth facets: {facets}");
            params.push(("facets", facets));
        }

        let resp: Option<SearchResponse> =
            fetch_json(self.client.get(&url).query(&params), PLATFORM_NAME).await?;
        let results = normalize_search(resp.unwrap_or_default(), query);

        info!(
            "Modrinth search '{}': {} of {} hits",
            query,
            results.results.len(),
            results.total_results
        );
        Ok(results)
    }

    async fn fetch_project(&self, id: &str) -> ApiResult<Option<Project>> {
        let url = format!("{}/project/{}", self.base_url, id);
        fetch_json(self.client.get(&url), PLATFORM_NAME).await
    }

    /// Team members; failures degrade to an empty author list.
    async fn fetch_members(&self, id: &str) -> Vec<Member> {
        let url = format!("{}/project/{}/members", self.base_url, id);
        match fetch_json::<Vec<Member>>(self.client.get(&url), PLATFORM_NAME).await {
            Ok(members) => members.unwrap_or_default(),
            Err(e) => {
                warn!("Modrinth members for {id} unavailable: {e}");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl PlatformClient for ModrinthClient {
    fn name(&self) -> &str {
        "modrinth"
    }

    async fn search(&self, query: &SearchQuery) -> ApiResult<SearchResults> {
        let mut facets = FacetBuilder::new();
        if !query.project_type.trim().is_empty() {
            facets = facets.project_types([query.project_type.as_str()]);
        }
        if let Some(loader) = &query.loader {
            facets = facets.loaders([loader.as_str()]);
        }
        if let Some(game_version) = &query.game_version {
            facets = facets.game_versions([game_version.as_str()]);
        }
        self.run_search(&query.query, facets, query.limit, query.offset)
            .await
    }

    async fn advanced_search(
        &self,
        query: &str,
        options: &AdvancedSearchOptions,
        limit: u32,
        offset: u32,
    ) -> ApiResult<SearchResults> {
        self.run_search(query, FacetBuilder::from_options(options), limit, offset)
            .await
    }

    async fn get_project(&self, id: &str) -> ApiResult<Option<PlatformProject>> {
        if id.trim().is_empty() {
            return Ok(None);
        }
        let Some(project) = self.fetch_project(id).await? else {
            return Ok(None);
        };
        let members = self.fetch_members(id).await;
        Ok(Some(normalize_project(project, members)).filter(|p| !p.is_empty()))
    }

    async fn get_project_versions(
        &self,
        project_id: &str,
        filter: &VersionFilter,
    ) -> ApiResult<Vec<PlatformVersion>> {
        if project_id.trim().is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/project/{}/version", self.base_url, project_id);
        let mut params: Vec<(&str, String)> = Vec::new();
        if !filter.loaders.is_empty() {
            let lowered: Vec<String> = filter.loaders.iter().map(|l| l.to_ascii_lowercase()).collect();
            params.push(("loaders", json_list(&lowered)));
        }
        if !filter.game_versions.is_empty() {
            params.push(("game_versions", json_list(&filter.game_versions)));
        }

        let versions: Vec<Version> =
            fetch_json(self.client.get(&url).query(&params), PLATFORM_NAME)
                .await?
                .unwrap_or_default();
        let versions = filter.apply(versions.into_iter().map(normalize_version).collect());

        info!("Modrinth versions for {project_id}: {}", versions.len());
        Ok(versions)
    }

    async fn get_project_version(
        &self,
        project_id: &str,
        version_id: &str,
    ) -> ApiResult<Option<PlatformVersion>> {
        if version_id.trim().is_empty() {
            return Ok(None);
        }
        let url = format!("{}/version/{}", self.base_url, version_id);
        let version: Option<Version> = fetch_json(self.client.get(&url), PLATFORM_NAME).await?;

        Ok(version
            .map(normalize_version)
            .filter(|v| !v.is_empty())
            // A version id from another project is a miss, not a hit.
            .filter(|v| project_id.is_empty() || v.project_id == project_id))
    }

    async fn get_project_icon(&self, id: &str) -> ApiResult<Option<String>> {
        if id.trim().is_empty() {
            return Ok(None);
        }
        Ok(self
            .fetch_project(id)
            .await?
            .map(|p| p.icon_url)
            .filter(|url| !url.trim().is_empty()))
    }
}
