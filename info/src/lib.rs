//! Build metadata shared by the server, the helpers and the logger.

/// The crate version the binaries were built from.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The source revision, if the build environment provided one.
pub const REVISION: Option<&str> = option_env!("SLEEP_SOUNDS_REVISION");

/// When the binaries were built, if the build environment recorded it.
pub const BUILD_TIMESTAMP: Option<&str> = option_env!("BUILD_TIMESTAMP");
