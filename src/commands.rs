// Operations exposed to the HTTP layer. Each takes the shared state and
// returns a serializable value or an `ApiError`.

use tracing::info;

use crate::core::error::{ApiError, ApiResult};
use crate::core::java::{JavaRuntime, JavaRuntimeIndex};
use crate::core::loaders::{Loader, LoaderVersion};
use crate::core::platforms::{
    AdvancedSearchOptions, PlatformProject, PlatformVersion, ReleaseType, SearchQuery,
    SearchResults, VersionFilter,
};
use crate::core::server::{ServerAddress, ServerStatusResult};
use crate::core::state::AppState;
use crate::core::version::{VersionHistory, VersionJars, VersionManifest};

// ── Server status ───────────────────────────────────────

/// Ping a server. The port is checked before any connection is attempted.
pub async fn probe_server_status(
    state: &AppState,
    host: &str,
    port: i64,
) -> ApiResult<ServerStatusResult> {
    let address = ServerAddress::new(host, port)?;
    state.status_client.probe(&address).await
}

// ── Platforms ───────────────────────────────────────────

pub async fn search_projects(
    state: &AppState,
    query: &str,
    project_type: &str,
    loader: Option<&str>,
    game_version: Option<&str>,
    limit: u32,
    offset: u32,
) -> ApiResult<SearchResults> {
    let query = SearchQuery::new(query, project_type)
        .with_loader(loader.unwrap_or_default())
        .with_game_version(game_version.unwrap_or_default())
        .page(limit, offset);
    Ok(state.platforms.search(&query).await)
}

pub async fn advanced_search_projects(
    state: &AppState,
    query: &str,
    options: &AdvancedSearchOptions,
    limit: u32,
    offset: u32,
) -> ApiResult<SearchResults> {
    Ok(state
        .platforms
        .advanced_search(query, options, limit, offset)
        .await)
}

/// `project_type` fills in the type when the platform didn't report one.
pub async fn get_project(
    state: &AppState,
    id: &str,
    project_type: &str,
) -> ApiResult<Option<PlatformProject>> {
    let project = state.platforms.get_project(id).await.map(|mut p| {
        if p.project_type.is_empty() {
            p.project_type = project_type.to_string();
        }
        p
    });
    Ok(project)
}

pub async fn get_project_icon(state: &AppState, id: &str) -> ApiResult<Option<String>> {
    Ok(state.platforms.get_project_icon(id).await)
}

pub async fn get_project_versions(
    state: &AppState,
    id: &str,
    game_versions: &[String],
    loaders: &[String],
    release_types: &[ReleaseType],
    limit: u32,
    offset: u32,
) -> ApiResult<Vec<PlatformVersion>> {
    let filter = VersionFilter {
        game_versions: game_versions.to_vec(),
        loaders: loaders.to_vec(),
        release_types: release_types.to_vec(),
    };
    Ok(state
        .platforms
        .get_project_versions(id, &filter, limit, offset)
        .await)
}

pub async fn get_project_version(
    state: &AppState,
    id: &str,
    version_id: &str,
) -> ApiResult<Option<PlatformVersion>> {
    Ok(state.platforms.get_project_version(id, version_id).await)
}

// ── Loaders ─────────────────────────────────────────────

fn loader(state: &AppState, name: &str) -> ApiResult<Loader> {
    state
        .loader(name)
        .ok_or_else(|| ApiError::InvalidArgument(format!("Unknown loader: {name}")))
}

pub async fn get_loader_installers(
    state: &AppState,
    loader_name: &str,
    game_version: Option<&str>,
) -> ApiResult<Vec<LoaderVersion>> {
    loader(state, loader_name)?.installers(game_version).await
}

pub async fn get_loader_installer(
    state: &AppState,
    loader_name: &str,
    version_id: &str,
    game_version: Option<&str>,
) -> ApiResult<Vec<LoaderVersion>> {
    loader(state, loader_name)?
        .installer(version_id, game_version)
        .await
}

pub async fn get_loader_versions(
    state: &AppState,
    loader_name: &str,
    game_version: Option<&str>,
) -> ApiResult<Vec<String>> {
    loader(state, loader_name)?.versions(game_version).await
}

// ── Vanilla ─────────────────────────────────────────────

pub async fn get_minecraft_versions(
    state: &AppState,
    major: Option<&str>,
    snapshots: bool,
) -> ApiResult<VersionHistory> {
    let manifest =
        VersionManifest::fetch(&state.http_client, &state.settings.version_manifest_url).await?;
    let history = manifest.history(major, snapshots)?;
    info!(
        "Minecraft versions: {} releases, {} snapshots",
        history.releases.len(),
        history.snapshots.len()
    );
    Ok(history)
}

pub async fn get_version_jars(state: &AppState, id: &str) -> ApiResult<Option<VersionJars>> {
    let manifest =
        VersionManifest::fetch(&state.http_client, &state.settings.version_manifest_url).await?;
    manifest.jars(&state.http_client, id).await
}

// ── Java runtimes ───────────────────────────────────────

/// Runtimes for one platform, or for all of them when `platform` is blank.
pub async fn get_java_runtimes(state: &AppState, platform: &str) -> ApiResult<Vec<JavaRuntime>> {
    let index = JavaRuntimeIndex::fetch(&state.http_client, &state.settings.java_runtime_url).await?;
    index.runtimes(&state.http_client, Some(platform)).await
}

pub async fn get_java_platforms(state: &AppState) -> ApiResult<Vec<String>> {
    let index = JavaRuntimeIndex::fetch(&state.http_client, &state.settings.java_runtime_url).await?;
    Ok(index.platforms().into_iter().map(str::to_string).collect())
}
