// ─── Multi-platform aggregator ───
// Fans a query out to every registered platform, merges and re-ranks the
// results. A failing or slow platform contributes nothing; it never fails
// the aggregate call.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use super::client::PlatformClient;
use super::model::{
    AdvancedSearchOptions, PlatformProject, PlatformVersion, SearchQuery, SearchResults,
    VersionFilter,
};
use super::ranking::rank_by_name;
use crate::core::error::{ApiError, ApiResult};

pub const DEFAULT_PLATFORM_TIMEOUT: Duration = Duration::from_secs(20);

pub struct UniversalClient {
    clients: Vec<Arc<dyn PlatformClient>>,
    platform_timeout: Option<Duration>,
}

impl UniversalClient {
    /// `clients` are in lookup priority order. `None` leaves adapter calls
    /// unbounded.
    pub fn new(clients: Vec<Arc<dyn PlatformClient>>, platform_timeout: Option<Duration>) -> Self {
        Self {
            clients,
            platform_timeout,
        }
    }

    pub fn platforms(&self) -> Vec<&str> {
        self.clients.iter().map(|c| c.name()).collect()
    }

    async fn bounded<T, F>(&self, platform: &str, call: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        let Some(limit) = self.platform_timeout else {
            return call.await;
        };
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::upstream(
                platform,
                format!("no answer within {:?}", limit),
            )),
        }
    }

    // ── Search ──────────────────────────────────────────

    pub async fn search(&self, query: &SearchQuery) -> SearchResults {
        let calls = self.clients.iter().map(|client| async move {
            let result = self.bounded(client.name(), client.search(query)).await;
            (client.name(), result)
        });
        let pages = join_all(calls).await;

        merge(pages, &query.query, query.limit, query.offset, |_| true)
    }

    pub async fn advanced_search(
        &self,
        query: &str,
        options: &AdvancedSearchOptions,
        limit: u32,
        offset: u32,
    ) -> SearchResults {
        let calls = self
            .clients
            .iter()
            .filter(|client| options.includes_platform(client.name()))
            .map(|client| async move {
                let result = self
                    .bounded(
                        client.name(),
                        client.advanced_search(query, options, limit, offset),
                    )
                    .await;
                (client.name(), result)
            });
        let pages = join_all(calls).await;

        merge(pages, query, limit, offset, |p| options.accepts_dates(p))
    }

    // ── Single lookups ──────────────────────────────────
    // First platform with a hit wins; errors count as a miss.

    pub async fn get_project(&self, id: &str) -> Option<PlatformProject> {
        for client in &self.clients {
            match self.bounded(client.name(), client.get_project(id)).await {
                Ok(Some(project)) if !project.is_empty() => return Some(project),
                Ok(_) => debug!("{}: no project {id}", client.name()),
                Err(e) => warn!("{}: project lookup for {id} failed: {e}", client.name()),
            }
        }
        None
    }

    pub async fn get_project_icon(&self, id: &str) -> Option<String> {
        for client in &self.clients {
            match self.bounded(client.name(), client.get_project_icon(id)).await {
                Ok(Some(url)) if !url.trim().is_empty() => return Some(url),
                Ok(_) => {}
                Err(e) => warn!("{}: icon lookup for {id} failed: {e}", client.name()),
            }
        }
        None
    }

    /// Filtered versions from the first platform that has any, then paged.
    /// A `limit` of 0 means no limit.
    pub async fn get_project_versions(
        &self,
        project_id: &str,
        filter: &VersionFilter,
        limit: u32,
        offset: u32,
    ) -> Vec<PlatformVersion> {
        for client in &self.clients {
            let versions = match self
                .bounded(client.name(), client.get_project_versions(project_id, filter))
                .await
            {
                Ok(versions) => versions,
                Err(e) => {
                    warn!("{}: versions for {project_id} failed: {e}", client.name());
                    continue;
                }
            };
            if versions.is_empty() {
                continue;
            }
            return page(versions, limit, offset);
        }
        Vec::new()
    }

    pub async fn get_project_version(
        &self,
        project_id: &str,
        version_id: &str,
    ) -> Option<PlatformVersion> {
        for client in &self.clients {
            match self
                .bounded(
                    client.name(),
                    client.get_project_version(project_id, version_id),
                )
                .await
            {
                Ok(Some(version)) if !version.is_empty() => return Some(version),
                Ok(_) => {}
                Err(e) => warn!(
                    "{}: version {version_id} of {project_id} failed: {e}",
                    client.name()
                ),
            }
        }
        None
    }
}

fn page<T>(items: Vec<T>, limit: u32, offset: u32) -> Vec<T> {
    let iter = items.into_iter().skip(offset as usize);
    if limit == 0 {
        iter.collect()
    } else {
        iter.take(limit as usize).collect()
    }
}

/// Merge per-platform pages: sum totals, sort by downloads, re-rank by name
/// distance to `query` (stable, so downloads break ties), cut to `limit`.
fn merge<F>(
    pages: Vec<(&str, ApiResult<SearchResults>)>,
    query: &str,
    limit: u32,
    offset: u32,
    keep: F,
) -> SearchResults
where
    F: Fn(&PlatformProject) -> bool,
{
    let mut results: Vec<PlatformProject> = Vec::new();
    let mut total_results: u64 = 0;

    for (platform, page) in pages {
        match page {
            Ok(page) if page.is_empty() => debug!("{platform}: no results for '{query}'"),
            Ok(page) => {
                total_results += page.total_results;
                results.extend(page.results.into_iter().filter(|p| keep(p)));
            }
            Err(e) => warn!("{platform}: search for '{query}' dropped: {e}"),
        }
    }

    results.sort_by(|a, b| b.downloads.cmp(&a.downloads));
    // An empty query would just favour short names.
    if !query.trim().is_empty() {
        rank_by_name(&mut results, query, |p| p.name.as_str());
    }
    if limit > 0 {
        results.truncate(limit as usize);
    }

    info!(
        "Aggregated search '{}': returning {} of {} total",
        query,
        results.len(),
        total_results
    );

    SearchResults {
        results,
        total_results,
        limit,
        offset,
        query: query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use crate::core::platforms::model::ReleaseType;

    fn project(id: &str, name: &str, downloads: u64) -> PlatformProject {
        PlatformProject {
            id: id.into(),
            name: name.into(),
            downloads,
            ..Default::default()
        }
    }

    fn version(id: &str) -> PlatformVersion {
        PlatformVersion {
            id: id.into(),
            release_type: ReleaseType::Release,
            loaders: vec!["fabric".into()],
            ..Default::default()
        }
    }

    /// Canned platform. `fail` makes every call error, `delay` stalls it.
    #[derive(Default)]
    struct FakePlatform {
        name: &'static str,
        projects: Vec<PlatformProject>,
        total: u64,
        versions: Vec<PlatformVersion>,
        fail: bool,
        delay: Option<Duration>,
    }

    impl FakePlatform {
        async fn gate(&self) -> ApiResult<()> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ApiError::upstream(self.name, "HTTP 503"));
            }
            Ok(())
        }

        fn page(&self, query: &str) -> SearchResults {
            SearchResults {
                results: self.projects.clone(),
                total_results: self.total,
                limit: 10,
                offset: 0,
                query: query.into(),
            }
        }
    }

    #[async_trait]
    impl PlatformClient for FakePlatform {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(&self, query: &SearchQuery) -> ApiResult<SearchResults> {
            self.gate().await?;
            Ok(self.page(&query.query))
        }

        async fn advanced_search(
            &self,
            query: &str,
            _options: &AdvancedSearchOptions,
            _limit: u32,
            _offset: u32,
        ) -> ApiResult<SearchResults> {
            self.gate().await?;
            Ok(self.page(query))
        }

        async fn get_project(&self, id: &str) -> ApiResult<Option<PlatformProject>> {
            self.gate().await?;
            Ok(self.projects.iter().find(|p| p.id == id).cloned())
        }

        async fn get_project_versions(
            &self,
            _project_id: &str,
            filter: &VersionFilter,
        ) -> ApiResult<Vec<PlatformVersion>> {
            self.gate().await?;
            Ok(filter.apply(self.versions.clone()))
        }

        async fn get_project_version(
            &self,
            _project_id: &str,
            version_id: &str,
        ) -> ApiResult<Option<PlatformVersion>> {
            self.gate().await?;
            Ok(self.versions.iter().find(|v| v.id == version_id).cloned())
        }
    }

    fn universal(platforms: Vec<FakePlatform>) -> UniversalClient {
        UniversalClient::new(
            platforms
                .into_iter()
                .map(|p| Arc::new(p) as Arc<dyn PlatformClient>)
                .collect(),
            Some(DEFAULT_PLATFORM_TIMEOUT),
        )
    }

    #[tokio::test]
    async fn failing_platform_contributes_nothing() {
        let client = universal(vec![
            FakePlatform {
                name: "modrinth",
                fail: true,
                total: 999,
                projects: vec![project("m1", "Sodium", 10)],
                ..Default::default()
            },
            FakePlatform {
                name: "curseforge",
                total: 3,
                projects: vec![project("1", "Sodium Extra", 5)],
                ..Default::default()
            },
        ]);

        let results = client.search(&SearchQuery::new("sodium", "mod")).await;
        assert_eq!(results.results.len(), 1);
        assert_eq!(results.results[0].id, "1");
        assert_eq!(results.total_results, 3);
    }

    #[tokio::test]
    async fn results_are_ranked_by_name_distance() {
        let client = universal(vec![
            FakePlatform {
                name: "modrinth",
                total: 2,
                projects: vec![
                    project("q", "Quilt", 1_000_000),
                    project("fe", "ForgeEssentials", 500),
                ],
                ..Default::default()
            },
            FakePlatform {
                name: "curseforge",
                total: 1,
                projects: vec![project("f", "Forge", 10)],
                ..Default::default()
            },
        ]);

        let results = client.search(&SearchQuery::new("forge", "mod")).await;
        let names: Vec<&str> = results.results.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names[0], "Forge");
        let quilt = names.iter().position(|n| *n == "Quilt").unwrap();
        assert!(quilt > 0);
        assert_eq!(results.total_results, 3);
    }

    #[tokio::test]
    async fn downloads_break_distance_ties() {
        let client = universal(vec![FakePlatform {
            name: "modrinth",
            total: 2,
            projects: vec![project("a", "Iris", 10), project("b", "Iron", 5_000)],
            ..Default::default()
        }]);

        let results = client.search(&SearchQuery::new("Irxx", "mod")).await;
        assert_eq!(results.results[0].id, "b");
        assert_eq!(results.results[1].id, "a");
    }

    #[tokio::test]
    async fn results_are_cut_to_limit() {
        let projects = (0..8)
            .map(|i| project(&format!("p{i}"), &format!("Mod {i}"), i))
            .collect();
        let client = universal(vec![FakePlatform {
            name: "modrinth",
            total: 120,
            projects,
            ..Default::default()
        }]);

        let query = SearchQuery::new("mod", "mod").page(5, 0);
        let results = client.search(&query).await;
        assert_eq!(results.results.len(), 5);
        assert_eq!(results.limit, 5);
        assert_eq!(results.total_results, 120);
        assert!(results.total_results > results.results.len() as u64);
    }

    #[tokio::test]
    async fn requested_offset_is_reported() {
        let client = universal(vec![FakePlatform {
            name: "modrinth",
            total: 1,
            projects: vec![project("a", "A", 1)],
            ..Default::default()
        }]);

        let results = client
            .search(&SearchQuery::new("a", "mod").page(10, 30))
            .await;
        assert_eq!(results.offset, 30);
        assert_eq!(results.query, "a");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_platform_is_cut_off() {
        let client = UniversalClient::new(
            vec![
                Arc::new(FakePlatform {
                    name: "modrinth",
                    delay: Some(Duration::from_secs(3600)),
                    total: 1,
                    projects: vec![project("slow", "Slow", 1)],
                    ..Default::default()
                }) as Arc<dyn PlatformClient>,
                Arc::new(FakePlatform {
                    name: "curseforge",
                    total: 1,
                    projects: vec![project("fast", "Fast", 1)],
                    ..Default::default()
                }) as Arc<dyn PlatformClient>,
            ],
            Some(Duration::from_secs(2)),
        );

        let results = client.search(&SearchQuery::new("fast", "mod")).await;
        assert_eq!(results.results.len(), 1);
        assert_eq!(results.results[0].id, "fast");
    }

    #[tokio::test(start_paused = true)]
    async fn without_a_timeout_slow_platforms_are_awaited() {
        let client = UniversalClient::new(
            vec![Arc::new(FakePlatform {
                name: "modrinth",
                delay: Some(Duration::from_secs(60)),
                total: 1,
                projects: vec![project("slow", "Slow", 1)],
                ..Default::default()
            }) as Arc<dyn PlatformClient>],
            None,
        );

        let results = client.search(&SearchQuery::new("slow", "mod")).await;
        assert_eq!(results.results.len(), 1);
        assert_eq!(results.results[0].id, "slow");
    }

    #[tokio::test]
    async fn advanced_search_honours_platform_and_date_filters() {
        let old = DateTime::parse_from_rfc3339("2015-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut ancient = project("old", "Old Mod", 1);
        ancient.created = old;
        let mut fresh = project("new", "New Mod", 1);
        fresh.created = Utc::now();

        let client = universal(vec![
            FakePlatform {
                name: "modrinth",
                total: 2,
                projects: vec![ancient, fresh],
                ..Default::default()
            },
            FakePlatform {
                name: "curseforge",
                total: 1,
                projects: vec![project("cf", "CF Mod", 1)],
                ..Default::default()
            },
        ]);

        let options = AdvancedSearchOptions {
            platforms: vec!["Modrinth".into()],
            created_after: Some(old + chrono::Duration::days(1)),
            ..Default::default()
        };
        let results = client.advanced_search("mod", &options, 10, 0).await;
        let ids: Vec<&str> = results.results.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new"]);
    }

    #[tokio::test]
    async fn project_lookup_falls_through_misses_and_errors() {
        let client = universal(vec![
            FakePlatform {
                name: "broken",
                fail: true,
                ..Default::default()
            },
            FakePlatform {
                name: "modrinth",
                projects: vec![project("other", "Other", 1)],
                ..Default::default()
            },
            FakePlatform {
                name: "curseforge",
                projects: vec![project("238222", "JEI", 1)],
                ..Default::default()
            },
        ]);

        assert_eq!(client.get_project("238222").await.unwrap().name, "JEI");
        assert!(client.get_project("missing").await.is_none());
        assert_eq!(client.platforms(), vec!["broken", "modrinth", "curseforge"]);
    }

    #[tokio::test]
    async fn icon_lookup_skips_blank_icons() {
        let mut blank = project("p", "P", 1);
        blank.icon_url = " ".into();
        let mut with_icon = project("p", "P", 1);
        with_icon.icon_url = "https://cdn/icon.png".into();

        let client = universal(vec![
            FakePlatform {
                name: "modrinth",
                projects: vec![blank],
                ..Default::default()
            },
            FakePlatform {
                name: "curseforge",
                projects: vec![with_icon],
                ..Default::default()
            },
        ]);

        assert_eq!(
            client.get_project_icon("p").await.as_deref(),
            Some("https://cdn/icon.png")
        );
    }

    #[tokio::test]
    async fn versions_come_from_first_platform_with_any() {
        let client = universal(vec![
            FakePlatform {
                name: "modrinth",
                ..Default::default()
            },
            FakePlatform {
                name: "curseforge",
                versions: (0..6).map(|i| version(&format!("v{i}"))).collect(),
                ..Default::default()
            },
        ]);

        let all = client
            .get_project_versions("p", &VersionFilter::default(), 0, 0)
            .await;
        assert_eq!(all.len(), 6);

        let paged = client
            .get_project_versions("p", &VersionFilter::default(), 2, 3)
            .await;
        let ids: Vec<&str> = paged.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["v3", "v4"]);

        let quilt = VersionFilter {
            loaders: vec!["quilt".into()],
            ..Default::default()
        };
        assert!(client.get_project_versions("p", &quilt, 0, 0).await.is_empty());

        assert_eq!(
            client.get_project_version("p", "v5").await.unwrap().id,
            "v5"
        );
        assert!(client.get_project_version("p", "nope").await.is_none());
    }
}
