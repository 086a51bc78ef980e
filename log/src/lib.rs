use std::sync::Mutex;

use slog::Drain;
use slog::Fuse;
use slog_async::Async;
use slog_json::Json;

pub use slog::{debug, error, info, o, trace, warn, Discard, Logger};

macro_rules! build_info {
    () => {
        o!(
            "version" => info::VERSION,
            "revision" => info::REVISION,
            "build_timestamp" => info::BUILD_TIMESTAMP
        )
    };
}

/// Builds the root logger: JSON lines on stderr, written from a
/// background thread, tagged with the build metadata.
pub fn initialize_logger() -> Logger {
    let drain = Mutex::new(Json::default(std::io::stderr())).map(Fuse);
    let drain = Async::new(drain).build().fuse();

    Logger::root(drain, build_info!())
}

/// A logger that drops everything, for tests and tools that don't
/// want output.
pub fn discard_logger() -> Logger {
    Logger::root(Discard, o!())
}

/// Installs a `RUST_LOG`-filtered global logger that also captures
/// records emitted through the `log` facade (warp's own request
/// logging, for instance). Logging stops when the guard is dropped.
#[cfg(feature = "env_logging")]
pub fn initialize_env_logger() -> Option<slog_scope::GlobalLoggerGuard> {
    slog_envlogger::init().ok()
}

/// Returns the logger installed by [`initialize_env_logger`], tagged
/// like the root logger.
#[cfg(feature = "env_logging")]
pub fn scoped_logger() -> Logger {
    slog_scope::logger().new(build_info!())
}

#[cfg(all(test, feature = "env_logging"))]
mod test {
    use std::sync::{Arc, Mutex};

    use slog::{Drain, Never, OwnedKVList, Record};

    use super::{info, o, scoped_logger, Logger};

    #[derive(Clone, Default)]
    struct Messages(Arc<Mutex<Vec<String>>>);

    impl Drain for Messages {
        type Ok = ();
        type Err = Never;

        fn log(&self, record: &Record, _: &OwnedKVList) -> Result<(), Never> {
            self.0.lock().unwrap().push(record.msg().to_string());
            Ok(())
        }
    }

    #[test]
    fn scoped_logger_writes_to_the_global_logger() {
        let messages = Messages::default();
        let guard = slog_scope::set_global_logger(Logger::root(messages.clone(), o!()));

        info!(scoped_logger(), "Starting...");
        drop(guard);

        assert_eq!(*messages.0.lock().unwrap(), vec!["Starting...".to_owned()]);
    }
}
