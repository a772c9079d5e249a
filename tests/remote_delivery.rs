#![cfg(feature = "loggly")]

mod common;

use common::MemoryWriter;
use request_log_sink::console::Console;
use request_log_sink::env::AppConfig;
use request_log_sink::interceptor::{CallInfo, LoggingInterceptor};
use request_log_sink::logger::LogPipeline;
use request_log_sink::loggly::LogglySink;
use request_log_sink::remote::local_hostname;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DIAGNOSTIC: &str = "[INFO] Log could not be sent to loggly.";

fn config(endpoint: &str) -> AppConfig {
    AppConfig {
        app_name: Some("shop".into()),
        env: Some("test".into()),
        token: "secret-token".into(),
        endpoint: endpoint.into(),
        config_loaded: true,
    }
}

fn pipeline(endpoint: &str) -> (LogPipeline, MemoryWriter) {
    let config = config(endpoint);
    let sink = LogglySink::from_app_config(&config).unwrap();
    let mem = MemoryWriter::new();
    let pipeline = LogPipeline::with_console(Arc::new(config), Arc::new(sink), Console::with_writer(mem.clone()));
    (pipeline, mem)
}

async fn wait_for_requests(server: &MockServer, n: usize) -> Vec<wiremock::Request> {
    for _ in 0..200 {
        let received = server.received_requests().await.unwrap_or_default();
        if received.len() >= n {
            return received;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    server.received_requests().await.unwrap_or_default()
}

async fn wait_for_diagnostics(mem: &MemoryWriter, n: usize) -> Vec<String> {
    for _ in 0..300 {
        let found: Vec<String> = mem.lines().into_iter().filter(|l| l.starts_with(DIAGNOSTIC)).collect();
        if found.len() >= n {
            return found;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    mem.lines().into_iter().filter(|l| l.starts_with(DIAGNOSTIC)).collect()
}

#[tokio::test]
async fn posts_enriched_json_to_collector() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inputs/secret-token/tag/http/"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "appName": "shop",
            "env": "test",
            "hostname": local_hostname(),
            "level": "warn",
            "message": "stock low",
            "context": "Inventory"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (pipeline, mem) = pipeline(&server.uri());
    pipeline.logger("Inventory").warn("stock low");

    assert_eq!(wait_for_requests(&server, 1).await.len(), 1);
    assert_eq!(mem.lines().len(), 1);
}

#[tokio::test]
async fn interceptor_sends_completion_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let (pipeline, _mem) = pipeline(&server.uri());
    let interceptor = LoggingInterceptor::new(&pipeline);
    let call = CallInfo::http("ItemsController", "listItems", "GET", "/items");

    let out: Result<&str, ()> = interceptor.intercept(&call, || async { Ok("items") }).await;
    assert_eq!(out, Ok("items"));

    // start, done, completion record
    let received = wait_for_requests(&server, 3).await;
    assert_eq!(received.len(), 3);

    let completion = received
        .iter()
        .map(|r| serde_json::from_slice::<serde_json::Value>(&r.body).unwrap())
        .find(|body| body.get("handler").is_some())
        .expect("completion record");
    assert_eq!(completion["handler"], json!("listItems"));
    assert_eq!(completion["context"], json!("ItemsController"));
    assert!(completion["runtime"].is_u64());
    assert!(completion["message"]
        .as_str()
        .unwrap()
        .starts_with("GET /items | listItems | done in "));
}

#[tokio::test]
async fn collector_error_is_reported_once_per_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let (pipeline, mem) = pipeline(&server.uri());
    pipeline.logger("Billing").error("charge failed", Some("at stripe.rs:3"));

    let diagnostics = wait_for_diagnostics(&mem, 1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0],
        "[INFO] Log could not be sent to loggly. Message: collector responded with status 503: busy"
    );
    assert_eq!(
        mem.lines().iter().filter(|l| l.starts_with(DIAGNOSTIC)).count(),
        1
    );
}

#[tokio::test]
async fn unreachable_collector_does_not_touch_request_outcome() {
    // Nothing listens on port 1.
    let (pipeline, mem) = pipeline("http://127.0.0.1:1");
    let interceptor = LoggingInterceptor::new(&pipeline);
    let call = CallInfo::http("ItemsController", "getItem", "GET", "/items/7");

    let out: Result<(), String> = interceptor
        .intercept(&call, || async { Err("item 7 missing".to_string()) })
        .await;
    assert_eq!(out, Err("item 7 missing".to_string()));

    let diagnostics = wait_for_diagnostics(&mem, 3).await;
    assert_eq!(diagnostics.len(), 3);

    let lines = mem.lines();
    let start = lines.iter().position(|l| l.ends_with("GET /items/7 | getItem | start")).unwrap();
    let done = lines
        .iter()
        .position(|l| l.contains("GET /items/7 | getItem | done in "))
        .unwrap();
    assert!(start < done);
}

#[tokio::test]
async fn transport_errors_never_print_the_token() {
    // Nothing listens on port 1.
    let (pipeline, mem) = pipeline("http://127.0.0.1:1");
    pipeline.logger("Auth").info("hi");

    let diagnostics = wait_for_diagnostics(&mem, 1).await;
    assert_eq!(diagnostics.len(), 1);
    for line in mem.lines() {
        assert!(!line.contains("secret-token"), "token in console output: {line}");
    }
}

#[tokio::test]
async fn long_error_pages_are_truncated_in_the_diagnostic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<p>bad gateway</p>".repeat(200)))
        .mount(&server)
        .await;

    let (pipeline, mem) = pipeline(&server.uri());
    pipeline.logger("Billing").warn("slow");

    let diagnostics = wait_for_diagnostics(&mem, 1).await;
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].ends_with("..."));
    assert!(diagnostics[0].len() < 400, "{}", diagnostics[0]);
}
