//! Fixed metadata stamped into every generated Dockerfile unless overridden

/// Prefix for the `LABEL` keys in generated Dockerfiles
pub const BASE_DOCKER_LABEL: &str = "org.hyperledger.fabric";

/// Subsystem version, compared by peers against the chaincode build level
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the base images chaincode containers build on
pub const BASE_VERSION: &str = "0.4.14";

/// Name of the environment variable that carries the build level in images
pub const BUILD_LEVEL_ENV: &str = "CORE_CHAINCODE_BUILDLEVEL";

/// Channel capacity, in chunks, between a build-context producer and its reader
pub const CONTEXT_BUFFER_CHUNKS: usize = 16;

/// gzip level for build contexts
pub const COMPRESSION_LEVEL: u32 = 6;
