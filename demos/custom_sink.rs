use std::sync::Arc;

use async_trait::async_trait;
use request_log_sink::{
    env::AppConfig,
    error::SinkError,
    interceptor::{CallInfo, LoggingInterceptor},
    logger::LogPipeline,
    record::RemotePayload,
    sink::LogSink,
};
use serde_json::json;

/// Example of shipping remote copies somewhere else by implementing
/// `LogSink` directly. This one just prints the JSON it would post.
struct StdoutJsonSink;

#[async_trait]
impl LogSink for StdoutJsonSink {
    async fn send(&self, payload: &RemotePayload) -> Result<(), SinkError> {
        println!("[remote] {}", serde_json::to_string(payload)?);
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let config = AppConfig {
        app_name: Some("custom-sink-demo".to_string()),
        env: None,
        token: "unused".to_string(),
        endpoint: "http://127.0.0.1:9".to_string(),
        config_loaded: false,
    };
    let pipeline = LogPipeline::new(Arc::new(config), Arc::new(StdoutJsonSink));
    let interceptor = LoggingInterceptor::new(&pipeline);

    let list_items = interceptor.wrap(|_call: CallInfo| async move {
        Ok::<_, String>(json!(["apple", "pear"]))
    });
    let items = list_items(CallInfo::http("ItemsController", "listItems", "GET", "/items")).await;

    pipeline.logger("ItemsController").verbose(items.unwrap_or_default());

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
}
