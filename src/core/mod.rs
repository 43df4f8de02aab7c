// ─── Minecraft API Core ───
// Service core behind the command facade and CLI.
//
// Architecture:
//   core/
//     server/     VarInt codec + server list ping status prober
//     platforms/  Common project model, Modrinth/CurseForge adapters, aggregator
//     loaders/    Fabric and Forge loader metadata
//     version/    Mojang manifest + per-version jar downloads
//     java/       Mojang Java runtime index and manifests
//     state/      Settings and shared clients
//     http.rs     Shared reqwest client + JSON fetch helpers
//     json.rs     Lenient decoding of upstream documents
//     error.rs    Crate-wide error type

pub mod error;
pub mod http;
pub mod java;
pub(crate) mod json;
pub mod loaders;
pub mod platforms;
pub mod server;
pub mod state;
pub mod version;
