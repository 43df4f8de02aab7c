pub mod manifest;
pub mod version_file;

pub use manifest::{MinecraftVersion, VersionEntry, VersionHistory, VersionManifest};
pub use version_file::{DownloadArtifact, VersionDownloads, VersionJars, VersionJson};
