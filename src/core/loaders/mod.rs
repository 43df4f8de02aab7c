pub mod client;
pub mod fabric;
pub mod forge;

pub use client::{Loader, LoaderClient, LoaderFile, LoaderFileKind, LoaderVersion};
pub use fabric::FabricClient;
pub use forge::ForgeClient;
