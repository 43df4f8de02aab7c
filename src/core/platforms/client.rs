use async_trait::async_trait;

use crate::core::error::ApiResult;

use super::model::{
    AdvancedSearchOptions, PlatformProject, PlatformVersion, SearchQuery, SearchResults,
    VersionFilter,
};

/// One upstream mod platform. Implementations hold only read-only
/// configuration and are safe to call concurrently.
///
/// Lookups return `Ok(None)` when the platform simply doesn't know the id;
/// `Err` is reserved for transport and upstream failures.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Short lower-case adapter name, e.g. `modrinth`.
    fn name(&self) -> &str;

    async fn search(&self, query: &SearchQuery) -> ApiResult<SearchResults>;

    async fn advanced_search(
        &self,
        query: &str,
        options: &AdvancedSearchOptions,
        limit: u32,
        offset: u32,
    ) -> ApiResult<SearchResults>;

    async fn get_project(&self, id: &str) -> ApiResult<Option<PlatformProject>>;

    async fn get_project_versions(
        &self,
        project_id: &str,
        filter: &VersionFilter,
    ) -> ApiResult<Vec<PlatformVersion>>;

    async fn get_project_version(
        &self,
        project_id: &str,
        version_id: &str,
    ) -> ApiResult<Option<PlatformVersion>>;

    /// Icon URL of a project. The default goes through [`get_project`].
    ///
    /// [`get_project`]: PlatformClient::get_project
    async fn get_project_icon(&self, id: &str) -> ApiResult<Option<String>> {
        Ok(self
            .get_project(id)
            .await?
            .map(|p| p.icon_url)
            .filter(|url| !url.trim().is_empty()))
    }
}
