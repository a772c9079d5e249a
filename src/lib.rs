pub mod record;
pub mod error;
pub mod env;
pub mod console;
pub mod sink;
pub mod remote;
pub mod logger;
pub mod interceptor;
pub mod layer;

#[cfg(feature = "loggly")]
pub mod loggly;

pub mod init;
pub mod noop_sink;

pub use console::Console;
pub use env::AppConfig;
pub use interceptor::{CallInfo, InboundCall, LoggingInterceptor};
pub use logger::{AppLogger, LogPipeline};
pub use record::{LogLevel, LogMessage};
pub use sink::LogSink;
