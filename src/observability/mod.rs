//! Tracing setup with OTLP/JSON file export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK provider → FileSpanExporter → hangar-otlp.json
//! ```
//!
//! Spans land in `<data dir>/hangar-otlp.json`, one OTLP document per line.
//! The file rotates at 10 MB and keeps three timestamped backups. The data
//! directory is resolved by [`crate::infrastructure::paths::data_dir`].
//!
//! The filter comes from `trace_level` in [`Config`]. [`crate::initialize`]
//! only calls [`init_tracing`] when it is set; a direct call without one
//! falls back to `RUST_LOG` and then `info`.
//!
//! ```rust
//! use hangar_coordinator::observability::init_tracing;
//! use hangar_coordinator::Config;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = Config {
//!     trace_level: Some("debug".to_string()),
//!     data_dir: Some(dir.path().to_path_buf()),
//!     ..Default::default()
//! };
//! let trace_file = init_tracing(&config);
//! assert!(trace_file.is_some());
//! ```

mod exporter;
mod rotating;

pub use exporter::{FileSpanExporter, SCOPE_NAME};
pub use rotating::{RotatingFile, KEEP_BACKUPS, MAX_BYTES};

use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const TRACE_FILE: &str = "hangar-otlp.json";

/// Installs the global subscriber and returns the trace file path.
///
/// Returns `None` when the data directory cannot be created; tracing is then
/// left uninstalled and the coordinator runs without it. Only the first call
/// in a process installs anything.
pub fn init_tracing(config: &Config) -> Option<PathBuf> {
    let filter = config.trace_level.as_deref().map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        EnvFilter::new,
    );

    let dir = crate::infrastructure::paths::data_dir(config);
    if std::fs::create_dir_all(&dir).is_err() {
        return None;
    }
    let trace_file = dir.join(TRACE_FILE);

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SCOPE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = exporter::provider(RotatingFile::new(trace_file.clone()), resource);
    let tracer = provider.tracer(SCOPE_NAME);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(OpenTelemetryLayer::new(tracer))
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(trace_file = %trace_file.display(), "tracing initialized");
    }

    Some(trace_file)
}
