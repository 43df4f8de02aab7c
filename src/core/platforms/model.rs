// ─── Platform Model ───
// Common shape every platform adapter normalizes into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tags that name a loader or server platform rather than a content category.
pub const SUPPORTED_LOADERS: [&str; 22] = [
    "bukkit",
    "bungeecord",
    "canvas",
    "datapack",
    "fabric",
    "folia",
    "forge",
    "iris",
    "liteloader",
    "minecraft",
    "modloader",
    "neoforge",
    "optifine",
    "paper",
    "purpur",
    "quilt",
    "rift",
    "spigot",
    "sponge",
    "vanilla",
    "velocity",
    "waterfall",
];

pub fn is_loader_tag(tag: &str) -> bool {
    SUPPORTED_LOADERS
        .iter()
        .any(|loader| loader.eq_ignore_ascii_case(tag.trim()))
}

/// Split a mixed tag list into `(loaders, categories)`, keeping order and
/// dropping duplicates.
pub fn split_loader_tags<I, S>(tags: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut loaders: Vec<String> = Vec::new();
    let mut categories: Vec<String> = Vec::new();

    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() {
            continue;
        }
        let bucket = if is_loader_tag(tag) {
            &mut loaders
        } else {
            &mut categories
        };
        if !bucket.iter().any(|t| t == tag) {
            bucket.push(tag.to_string());
        }
    }

    (loaders, categories)
}

// ─── Enumerations ───

/// Stability channel of a version.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Release,
    Beta,
    Alpha,
    #[default]
    Unknown,
}

impl ReleaseType {
    /// Lenient parse; anything unrecognized is `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "release" => ReleaseType::Release,
            "beta" => ReleaseType::Beta,
            "alpha" => ReleaseType::Alpha,
            _ => ReleaseType::Unknown,
        }
    }
}

impl std::fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseType::Release => write!(f, "release"),
            ReleaseType::Beta => write!(f, "beta"),
            ReleaseType::Alpha => write!(f, "alpha"),
            ReleaseType::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Required,
    Optional,
    Embedded,
    #[default]
    Unknown,
}

impl DependencyType {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "required" => DependencyType::Required,
            "optional" => DependencyType::Optional,
            "embedded" => DependencyType::Embedded,
            _ => DependencyType::Unknown,
        }
    }
}

/// Whether a project must, may or must not be installed on one side.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SideSupport {
    Required,
    Optional,
    Unsupported,
    #[default]
    Unknown,
}

impl SideSupport {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "required" => SideSupport::Required,
            "optional" => SideSupport::Optional,
            "unsupported" => SideSupport::Unsupported,
            _ => SideSupport::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupportedSides {
    pub client: SideSupport,
    pub server: SideSupport,
}

// ─── Projects ───

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GalleryImage {
    pub url: String,
    pub title: String,
    pub description: String,
    pub created: DateTime<Utc>,
}

/// External link such as a website, wiki, issue tracker, source or donation page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformLink {
    pub name: String,
    pub url: String,
}

/// Where a project was found and its id there.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformSource {
    pub id: String,
    pub name: String,
}

/// A mod, modpack, resourcepack or other project, normalized across platforms.
///
/// `Default` is the "not found" value: an empty id, empty collections and
/// epoch timestamps. Lookups return `Option<PlatformProject>` instead of the
/// empty value; [`PlatformProject::is_empty`] keeps the old predicate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformProject {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub body: String,
    pub downloads: u64,
    pub authors: Vec<Author>,
    pub categories: Vec<String>,
    pub loaders: Vec<String>,
    pub game_versions: Vec<String>,
    pub gallery: Vec<GalleryImage>,
    pub links: Vec<PlatformLink>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub sides: SupportedSides,
    pub platforms: Vec<PlatformSource>,
    #[serde(rename = "type")]
    pub project_type: String,
    pub icon_url: String,
}

impl PlatformProject {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

// ─── Versions ───

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionFile {
    pub url: String,
    pub file_name: String,
    pub size: u64,
    /// SHA-1 when the platform provides one.
    pub hash: Option<String>,
    pub primary: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionDependency {
    pub project_id: String,
    pub version_id: Option<String>,
    #[serde(rename = "type")]
    pub dependency_type: DependencyType,
}

/// One downloadable release of a project. Same empty convention as
/// [`PlatformProject`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformVersion {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub version_number: String,
    pub release_type: ReleaseType,
    pub published: DateTime<Utc>,
    pub downloads: u64,
    pub changelog: String,
    pub files: Vec<VersionFile>,
    pub game_versions: Vec<String>,
    pub loaders: Vec<String>,
    pub dependencies: Vec<VersionDependency>,
    pub platform: String,
}

impl PlatformVersion {
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    pub fn primary_file(&self) -> Option<&VersionFile> {
        self.files
            .iter()
            .find(|f| f.primary)
            .or_else(|| self.files.first())
    }
}

// ─── Search ───

/// One page of search results.
///
/// `total_results` is what the upstream(s) reported and can exceed
/// `results.len()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResults {
    pub results: Vec<PlatformProject>,
    pub total_results: u64,
    pub limit: u32,
    pub offset: u32,
    pub query: String,
}

impl SearchResults {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Basic search request shared by every adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub project_type: String,
    #[serde(default)]
    pub loader: Option<String>,
    #[serde(default)]
    pub game_version: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl SearchQuery {
    pub fn new(query: &str, project_type: &str) -> Self {
        Self {
            query: query.to_string(),
            project_type: project_type.to_string(),
            loader: None,
            game_version: None,
            limit: 10,
            offset: 0,
        }
    }

    pub fn with_loader(mut self, loader: &str) -> Self {
        self.loader = non_blank(loader);
        self
    }

    pub fn with_game_version(mut self, game_version: &str) -> Self {
        self.game_version = non_blank(game_version);
        self
    }

    pub fn page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Filters for the advanced search. Within one list entries are OR'd; the
/// lists themselves are AND'd.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct AdvancedSearchOptions {
    #[serde(default)]
    pub project_types: Vec<String>,
    /// Restrict the fan-out to these platforms (by adapter name).
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, rename = "minecraft-versions")]
    pub game_versions: Vec<String>,
    #[serde(default)]
    pub loaders: Vec<String>,
    #[serde(default)]
    pub client_side: bool,
    #[serde(default)]
    pub server_side: bool,
    #[serde(default)]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_before: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_after: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_before: Option<DateTime<Utc>>,
}

impl AdvancedSearchOptions {
    /// Date-range check; platforms can't filter on these upstream so it runs
    /// after the merge.
    pub fn accepts_dates(&self, project: &PlatformProject) -> bool {
        self.created_after.map_or(true, |t| project.created >= t)
            && self.created_before.map_or(true, |t| project.created <= t)
            && self.updated_after.map_or(true, |t| project.updated >= t)
            && self.updated_before.map_or(true, |t| project.updated <= t)
    }

    /// Whether the adapter called `platform` takes part in this search.
    pub fn includes_platform(&self, platform: &str) -> bool {
        self.platforms.is_empty()
            || self
                .platforms
                .iter()
                .any(|p| p.trim().eq_ignore_ascii_case(platform))
    }
}

// ─── Version filtering ───

/// Client-side version filter: any-of within a field, all fields must pass,
/// an empty field matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionFilter {
    #[serde(default)]
    pub game_versions: Vec<String>,
    #[serde(default)]
    pub loaders: Vec<String>,
    #[serde(default)]
    pub release_types: Vec<ReleaseType>,
}

impl VersionFilter {
    pub fn is_unrestricted(&self) -> bool {
        self.game_versions.is_empty() && self.loaders.is_empty() && self.release_types.is_empty()
    }

    pub fn matches(&self, version: &PlatformVersion) -> bool {
        let game_version_ok = self.game_versions.is_empty()
            || self
                .game_versions
                .iter()
                .any(|wanted| version.game_versions.iter().any(|gv| gv == wanted));

        // Platforms disagree on loader casing ("Forge" vs "forge").
        let loader_ok = self.loaders.is_empty()
            || self.loaders.iter().any(|wanted| {
                version
                    .loaders
                    .iter()
                    .any(|loader| loader.eq_ignore_ascii_case(wanted))
            });

        let release_ok =
            self.release_types.is_empty() || self.release_types.contains(&version.release_type);

        game_version_ok && loader_ok && release_ok
    }

    pub fn apply(&self, versions: Vec<PlatformVersion>) -> Vec<PlatformVersion> {
        if self.is_unrestricted() {
            return versions;
        }
        versions.into_iter().filter(|v| self.matches(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(loaders: &[&str], game_versions: &[&str], release_type: ReleaseType) -> PlatformVersion {
        PlatformVersion {
            id: "v1".into(),
            loaders: loaders.iter().map(|s| s.to_string()).collect(),
            game_versions: game_versions.iter().map(|s| s.to_string()).collect(),
            release_type,
            ..Default::default()
        }
    }

    #[test]
    fn empty_project_is_empty() {
        assert!(PlatformProject::empty().is_empty());
        assert!(PlatformProject::default().is_empty());
        assert_eq!(PlatformProject::empty().created.timestamp(), 0);

        let project = PlatformProject {
            id: "AANobbMI".into(),
            ..Default::default()
        };
        assert!(!project.is_empty());
    }

    #[test]
    fn empty_search_results() {
        let empty = SearchResults::empty();
        assert!(empty.is_empty());
        assert!(empty.query.is_empty());
        assert_eq!(empty.total_results, 0);
    }

    #[test]
    fn loader_tags_are_separated_from_categories() {
        let (loaders, categories) =
            split_loader_tags(["fabric", "optimization", "Forge", "utility", "fabric", ""]);
        assert_eq!(loaders, vec!["fabric", "Forge"]);
        assert_eq!(categories, vec!["optimization", "utility"]);
    }

    #[test]
    fn release_type_parse_is_lenient() {
        assert_eq!(ReleaseType::parse("release"), ReleaseType::Release);
        assert_eq!(ReleaseType::parse("BETA"), ReleaseType::Beta);
        assert_eq!(ReleaseType::parse("snapshot"), ReleaseType::Unknown);
        assert_eq!(DependencyType::parse("incompatible"), DependencyType::Unknown);
        assert_eq!(SideSupport::parse("optional"), SideSupport::Optional);
    }

    #[test]
    fn loader_filter_is_any_of() {
        let v = version(&["fabric", "forge"], &["1.20.1"], ReleaseType::Release);

        let forge_only = VersionFilter {
            loaders: vec!["forge".into()],
            ..Default::default()
        };
        let quilt_only = VersionFilter {
            loaders: vec!["quilt".into()],
            ..Default::default()
        };

        assert!(forge_only.matches(&v));
        assert!(!quilt_only.matches(&v));
    }

    #[test]
    fn filter_fields_are_combined_with_and() {
        let v = version(&["Forge"], &["1.20.1", "1.20.2"], ReleaseType::Beta);

        let passing = VersionFilter {
            game_versions: vec!["1.19.4".into(), "1.20.2".into()],
            loaders: vec!["forge".into()],
            release_types: vec![ReleaseType::Release, ReleaseType::Beta],
        };
        let wrong_channel = VersionFilter {
            release_types: vec![ReleaseType::Release],
            ..passing.clone()
        };

        assert!(passing.matches(&v));
        assert!(!wrong_channel.matches(&v));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = VersionFilter::default();
        assert!(filter.is_unrestricted());
        assert!(filter.matches(&version(&[], &[], ReleaseType::Unknown)));

        let kept = filter.apply(vec![
            version(&["fabric"], &["1.20.1"], ReleaseType::Alpha),
            version(&["quilt"], &["1.21"], ReleaseType::Release),
        ]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn advanced_options_date_ranges() {
        let created = DateTime::parse_from_rfc3339("2022-06-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let project = PlatformProject {
            id: "p".into(),
            created,
            updated: created,
            ..Default::default()
        };

        let after: AdvancedSearchOptions =
            serde_json::from_str(r#"{"created-after": "2022-01-01T00:00:00Z"}"#).unwrap();
        let before: AdvancedSearchOptions =
            serde_json::from_str(r#"{"updated-before": "2021-01-01T00:00:00Z"}"#).unwrap();

        assert!(AdvancedSearchOptions::default().accepts_dates(&project));
        assert!(after.accepts_dates(&project));
        assert!(!before.accepts_dates(&project));
    }

    #[test]
    fn advanced_options_use_kebab_case_keys() {
        let options: AdvancedSearchOptions = serde_json::from_str(
            r#"{"project-types": ["mod"], "minecraft-versions": ["1.20.1"], "platforms": ["Modrinth"], "client-side": true}"#,
        )
        .unwrap();
        assert_eq!(options.project_types, vec!["mod"]);
        assert_eq!(options.game_versions, vec!["1.20.1"]);
        assert!(options.client_side);
        assert!(options.includes_platform("modrinth"));
        assert!(!options.includes_platform("curseforge"));
    }

    #[test]
    fn search_query_ignores_blank_filters() {
        let query = SearchQuery::new("sodium", "mod")
            .with_loader("  ")
            .with_game_version("1.20.1")
            .page(5, 10);
        assert_eq!(query.loader, None);
        assert_eq!(query.game_version.as_deref(), Some("1.20.1"));
        assert_eq!((query.limit, query.offset), (5, 10));
    }
}
