pub mod client;
pub mod curseforge;
pub mod facets;
pub mod model;
pub mod modrinth;
pub mod ranking;
pub mod universal;

pub use client::PlatformClient;
pub use curseforge::CurseForgeClient;
pub use facets::FacetBuilder;
pub use model::{
    AdvancedSearchOptions, Author, DependencyType, GalleryImage, PlatformLink, PlatformProject,
    PlatformSource, PlatformVersion, ReleaseType, SearchQuery, SearchResults, SideSupport,
    SupportedSides, VersionDependency, VersionFile, VersionFilter, SUPPORTED_LOADERS,
};
pub use modrinth::ModrinthClient;
pub use ranking::levenshtein;
pub use universal::UniversalClient;
