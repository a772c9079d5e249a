use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

use request_log_sink::env::AppConfig;
use request_log_sink::init::{init_logging, init_tracing};
use request_log_sink::noop_sink::NoopSink;

#[tokio::main]
async fn main() {
    let config = AppConfig {
        app_name: Some("bridge-demo".to_string()),
        env: Some("local".to_string()),
        token: "unused".to_string(),
        endpoint: "http://127.0.0.1:9".to_string(),
        config_loaded: true,
    };
    let pipeline = init_logging(config, Arc::new(NoopSink));
    if let Err(e) = init_tracing(&pipeline) {
        eprintln!("{}", e);
        return;
    }

    info!(target: "checkout", "starting service");
    warn!(target: "checkout", retries = 3, "payment provider slow");
    error!(
        target: "auth",
        user_id = 42,
        trace = "auth::verify at src/auth.rs:88",
        "authentication failed"
    );

    sleep(Duration::from_millis(200)).await;
}
