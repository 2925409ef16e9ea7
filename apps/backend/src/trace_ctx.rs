//! Task-local trace context for gateway requests.
//!
//! `RequestTrace` opens the scope; error rendering and outbound backend calls
//! read the id from here so they can be correlated with the request log.

use std::cell::RefCell;

use tokio::task_local;

task_local! {
    static TRACE_ID: RefCell<Option<String>>;
}

/// Trace id of the current request, if the task runs inside a trace scope.
pub fn current() -> Option<String> {
    TRACE_ID
        .try_with(|cell| cell.borrow().clone())
        .ok()
        .flatten()
}

/// Trace id of the current request, or `"unknown"` outside a request.
pub fn trace_id() -> String {
    current().unwrap_or_else(|| "unknown".to_string())
}

/// Run a future within a trace scope.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(RefCell::new(Some(trace_id)), future).await
}
