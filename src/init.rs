use crate::env::AppConfig;
use crate::error::{InitError, SinkError};
use crate::layer::{AppLoggerLayer, DEFAULT_IGNORED_TARGETS};
use crate::logger::LogPipeline;
use crate::sink::LogSink;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the `tracing` bridge.
///
/// **Fields**
/// - `max_level`: most verbose `tracing` level that is forwarded.
///   Defaults to `TRACE`, i.e. everything, matching the logger which
///   emits every level.
/// - `ignored_targets`: target prefixes that are never forwarded. The
///   defaults cover the HTTP stack used by the remote sink.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    pub max_level: Level,
    pub ignored_targets: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_level: Level::TRACE,
            ignored_targets: DEFAULT_IGNORED_TARGETS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Remote sink matching the enabled features: the Loggly HTTP sink when
/// the `loggly` feature is on, otherwise a sink that drops everything.
pub fn sink_from_config(config: &AppConfig) -> Result<Arc<dyn LogSink>, SinkError> {
    #[cfg(feature = "loggly")]
    {
        let sink = crate::loggly::LogglySink::from_app_config(config)?;
        Ok(Arc::new(sink) as Arc<dyn LogSink>)
    }

    #[cfg(not(feature = "loggly"))]
    {
        let _ = config;
        Ok(Arc::new(crate::noop_sink::NoopSink) as Arc<dyn LogSink>)
    }
}

/// Build the process-wide pipeline and report once whether the
/// deployment configuration was loaded.
///
/// **Parameters**
/// - `config`: configuration read at startup, shared read-only.
/// - `sink`: destination of remote copies, usually from
///   [`sink_from_config`].
pub fn init_logging(config: AppConfig, sink: Arc<dyn LogSink>) -> LogPipeline {
    let pipeline = LogPipeline::new(Arc::new(config), sink);
    report_config(&pipeline);
    pipeline
}

pub(crate) fn report_config(pipeline: &LogPipeline) {
    pipeline
        .logger("Config")
        .debug(format!("Config is loaded: {}", pipeline.config().config_loaded));
}

/// Install a global `tracing` subscriber that forwards events to the
/// pipeline through [`AppLoggerLayer`].
///
/// **Errors**
///
/// Fails if another global subscriber was installed before.
pub fn init_tracing_with_config(pipeline: &LogPipeline, config: BridgeConfig) -> Result<(), InitError> {
    let layer = AppLoggerLayer::new(pipeline.clone(), config.max_level, config.ignored_targets);
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Equivalent to [`init_tracing_with_config`] with
/// [`BridgeConfig::default`].
pub fn init_tracing(pipeline: &LogPipeline) -> Result<(), InitError> {
    init_tracing_with_config(pipeline, BridgeConfig::default())
}
