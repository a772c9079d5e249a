use crate::console::Console;
use crate::env::AppConfig;
use crate::interceptor::CallInfo;
use crate::record::{LogData, LogLevel, LogMessage, LogRecord};
use crate::remote::RemoteSinkClient;
use crate::sink::LogSink;
use std::sync::Arc;

/// Collaborators shared by every [`AppLogger`] of a process: the console
/// and the remote client. Cheap to clone.
#[derive(Clone)]
pub struct LogPipeline {
    config: Arc<AppConfig>,
    console: Console,
    remote: RemoteSinkClient,
}

impl LogPipeline {
    /// Pipeline writing to stdout.
    pub fn new(config: Arc<AppConfig>, sink: Arc<dyn LogSink>) -> Self {
        Self::with_console(config, sink, Console::stdout())
    }

    pub fn with_console(config: Arc<AppConfig>, sink: Arc<dyn LogSink>, console: Console) -> Self {
        let remote = RemoteSinkClient::new(sink, Arc::clone(&config), console.clone());
        LogPipeline {
            config,
            console,
            remote,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn remote(&self) -> &RemoteSinkClient {
        &self.remote
    }

    /// Logger tagged with `context`.
    pub fn logger(&self, context: impl Into<String>) -> AppLogger {
        AppLogger::new(context, self)
    }
}

/// Leveled logger bound to one context, usually the name of the
/// component that owns it.
///
/// Every call writes to the console before returning and dispatches a
/// remote copy in the background. Remote failures never surface here.
#[derive(Clone)]
pub struct AppLogger {
    context: Arc<str>,
    pipeline: LogPipeline,
}

impl AppLogger {
    pub fn new(context: impl Into<String>, pipeline: &LogPipeline) -> Self {
        AppLogger {
            context: Arc::from(context.into()),
            pipeline: pipeline.clone(),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn debug(&self, message: impl Into<LogMessage>) {
        self.emit(LogLevel::Debug, message.into(), None);
    }

    pub fn info(&self, message: impl Into<LogMessage>) {
        self.emit(LogLevel::Info, message.into(), None);
    }

    /// Same as [`info`](Self::info).
    pub fn log(&self, message: impl Into<LogMessage>) {
        self.info(message);
    }

    pub fn warn(&self, message: impl Into<LogMessage>) {
        self.emit(LogLevel::Warn, message.into(), None);
    }

    pub fn verbose(&self, message: impl Into<LogMessage>) {
        self.emit(LogLevel::Verbose, message.into(), None);
    }

    pub fn error(&self, message: impl Into<LogMessage>, trace: Option<&str>) {
        self.emit(LogLevel::Error, message.into(), trace.map(str::to_string));
    }

    /// Visual separator. Console only.
    pub fn print_line(&self) {
        self.pipeline.console.print_line();
    }

    /// `<method> <path> | <handler> | start`
    pub fn log_request(&self, call: &CallInfo) {
        if let Some(http) = &call.http {
            self.info(format!("{} {} | {} | start", http.method, http.path, call.handler));
        }
    }

    /// `<method> <path> | <handler> | done in <runtime>ms`, followed by a
    /// completion record carrying handler and runtime for the collector.
    pub fn trace_request(&self, call: &CallInfo, runtime_ms: u64) {
        let message = match &call.http {
            Some(http) => format!(
                "{} {} | {} | done in {}ms",
                http.method, http.path, call.handler, runtime_ms
            ),
            None => format!("{} | done in {}ms", call.handler, runtime_ms),
        };
        let message = LogMessage::Text(message);
        self.emit(LogLevel::Info, message.clone(), None);

        let data = LogData {
            context: Some(self.context.to_string()),
            handler: Some(call.handler.clone()),
            runtime: Some(runtime_ms),
            trace: None,
        };
        let _ = self.pipeline.remote.send(LogLevel::Info, &message, Some(data));
    }

    fn emit(&self, level: LogLevel, message: LogMessage, trace: Option<String>) {
        let record = LogRecord {
            level,
            context: self.context.to_string(),
            message,
            trace,
        };

        self.pipeline.console.emit(
            record.level,
            &record.context,
            &record.message,
            record.trace.as_deref(),
        );

        let data = LogData {
            trace: record.trace,
            ..LogData::with_context(record.context)
        };
        // Detached: the handle is dropped and the attempt runs on its own.
        let _ = self.pipeline.remote.send(record.level, &record.message, Some(data));
    }
}

impl std::fmt::Debug for AppLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppLogger")
            .field("context", &self.context)
            .finish()
    }
}
