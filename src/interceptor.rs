use crate::logger::LogPipeline;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::time::Instant;

/// Method and path of an HTTP-style call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTarget {
    pub method: String,
    pub path: String,
}

/// What the interceptor needs to know about one inbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallInfo {
    /// Name of the component owning the handler; used as log context.
    pub component: String,
    pub handler: String,
    /// `None` for calls that are not HTTP-style (queue consumers, RPC).
    pub http: Option<HttpTarget>,
}

impl CallInfo {
    pub fn new(component: impl Into<String>, handler: impl Into<String>) -> Self {
        CallInfo {
            component: component.into(),
            handler: handler.into(),
            http: None,
        }
    }

    pub fn http(
        component: impl Into<String>,
        handler: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        CallInfo {
            http: Some(HttpTarget {
                method: method.into(),
                path: path.into(),
            }),
            ..CallInfo::new(component, handler)
        }
    }
}

/// Anything the interceptor can wrap: a request type only has to say
/// which component and handler it targets.
pub trait InboundCall {
    fn call_info(&self) -> CallInfo;
}

impl InboundCall for CallInfo {
    fn call_info(&self) -> CallInfo {
        self.clone()
    }
}

/// Wraps handler execution in start/completion logging.
///
/// The wrapped outcome is returned untouched; success and failure produce
/// the same completion line. A call dropped before it finishes logs no
/// completion.
#[derive(Clone)]
pub struct LoggingInterceptor {
    pipeline: LogPipeline,
}

impl LoggingInterceptor {
    pub fn new(pipeline: &LogPipeline) -> Self {
        LoggingInterceptor {
            pipeline: pipeline.clone(),
        }
    }

    /// Run `next` for `call`, logging `start` before and `done in <N>ms`
    /// after.
    pub async fn intercept<F, Fut, T, E>(&self, call: &CallInfo, next: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let started = Instant::now();
        let logger = self.pipeline.logger(call.component.as_str());

        logger.log_request(call);
        let outcome = next().await;
        logger.trace_request(call, started.elapsed().as_millis() as u64);

        outcome
    }

    /// Turn a handler into an intercepted handler with the same signature.
    pub fn wrap<C, F, Fut, T, E>(
        &self,
        next: F,
    ) -> impl Fn(C) -> BoxFuture<'static, Result<T, E>> + Clone + Send + Sync
    where
        C: InboundCall + Send + 'static,
        F: Fn(C) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let interceptor = self.clone();
        move |call: C| {
            let interceptor = interceptor.clone();
            let next = next.clone();
            async move {
                let info = call.call_info();
                interceptor.intercept(&info, move || next(call)).await
            }
            .boxed()
        }
    }
}
