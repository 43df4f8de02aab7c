pub mod runtime;

pub use runtime::{JavaRuntime, JavaRuntimeFile, JavaRuntimeIndex, JAVA_RUNTIME_INDEX_URL};
