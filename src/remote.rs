use crate::console::Console;
use crate::env::AppConfig;
use crate::record::{LogData, LogLevel, LogMessage, RemotePayload};
use crate::sink::LogSink;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

const DELIVERY_FAILED: &str = "[INFO] Log could not be sent to loggly.";

/// Name of the local host, looked up on every call.
pub fn local_hostname() -> String {
    gethostname::gethostname().to_string_lossy().into_owned()
}

/// Best-effort forwarding of log records to a [`LogSink`].
///
/// Every [`send`](Self::send) enriches the record with the process-wide
/// configuration and the host name, then hands it to a detached Tokio
/// task. One attempt per call: failures are written once to the console
/// and dropped, never returned to the caller.
#[derive(Clone)]
pub struct RemoteSinkClient {
    sink: Arc<dyn LogSink>,
    config: Arc<AppConfig>,
    console: Console,
}

impl RemoteSinkClient {
    pub fn new(sink: Arc<dyn LogSink>, config: Arc<AppConfig>, console: Console) -> Self {
        RemoteSinkClient {
            sink,
            config,
            console,
        }
    }

    /// Build the JSON document for one call. The host name and config
    /// fields are read here, not cached on the client.
    pub fn build_payload(
        &self,
        level: LogLevel,
        message: &LogMessage,
        data: Option<LogData>,
    ) -> RemotePayload {
        RemotePayload {
            app_name: self.config.app_name.clone(),
            env: self.config.env.clone(),
            hostname: local_hostname(),
            level,
            message: message.to_value(),
            data: data.unwrap_or_default(),
        }
    }

    /// Dispatch one delivery attempt in the background.
    ///
    /// Returns the handle of the detached task so tests can wait for it;
    /// the logger drops it. Outside a Tokio runtime nothing is sent and a
    /// diagnostic line is written instead.
    pub fn send(
        &self,
        level: LogLevel,
        message: &LogMessage,
        data: Option<LogData>,
    ) -> Option<JoinHandle<()>> {
        let payload = self.build_payload(level, message, data);

        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                self.console
                    .write_block(&format!("{} Message: {}", DELIVERY_FAILED, e));
                return None;
            }
        };

        let sink = Arc::clone(&self.sink);
        let console = self.console.clone();
        Some(runtime.spawn(async move {
            deliver(&*sink, &payload, &console).await;
        }))
    }
}

/// Run one delivery attempt and report its failure, if any, as a single
/// console line. A panicking sink counts as a failure.
pub async fn deliver(sink: &dyn LogSink, payload: &RemotePayload, console: &Console) {
    match AssertUnwindSafe(sink.send(payload)).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            let reason = e.to_string().replace('\n', " ");
            console.write_block(&format!("{} Message: {}", DELIVERY_FAILED, reason));
        }
        Err(panic) => {
            console.write_block(&format!("{} {:?}", DELIVERY_FAILED, panic_text(&*panic)));
        }
    }
}

fn panic_text(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown error"
    }
}
