use std::process::ExitCode;

use request_log_sink::env::AppConfig;
use request_log_sink::init::{init_logging, sink_from_config};
use request_log_sink::interceptor::{CallInfo, LoggingInterceptor};
use request_log_sink::logger::{AppLogger, LogPipeline};

/// A controller owning its own logger, wired through the interceptor
/// the way a web framework would wire a route.
struct AppController {
    logger: AppLogger,
    config_loaded: bool,
}

impl AppController {
    fn new(pipeline: &LogPipeline) -> Self {
        AppController {
            logger: pipeline.logger("AppController"),
            config_loaded: pipeline.config().config_loaded,
        }
    }

    async fn get_hello(&self) -> Result<String, String> {
        self.logger.debug("Call hello World!");
        self.logger
            .debug(format!("Config is loaded: {}", self.config_loaded));
        Ok("Hello World!".to_string())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Needs LOGGLY_TOKEN (and optionally APP_NAME, ENV, LOGGLY_URL) in the
    // environment or a .env file.
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let sink = match sink_from_config(&config) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = init_logging(config, sink);
    let controller = AppController::new(&pipeline);
    let interceptor = LoggingInterceptor::new(&pipeline);

    let call = CallInfo::http("AppController", "getHello", "GET", "/");
    let body = interceptor
        .intercept(&call, || controller.get_hello())
        .await;
    pipeline.logger("main").print_line();
    pipeline.logger("main").info(format!("response: {:?}", body));

    // Remote copies are detached; give them a moment before exiting.
    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    ExitCode::SUCCESS
}
