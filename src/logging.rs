//! Logging utilities for doyline.
//!
//! Structured `tracing` helpers. Logs go to stderr so that stdout stays free
//! for day offsets and SVG output.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::util::SubscriberInitExt;
use uuid::Uuid;

/// Initialize the tracing subscriber with the given log level
pub fn init_tracing(log_level: &str) {
    build_subscriber(log_level).init();
}

/// RUST_LOG wins over the configured level
fn env_filter(log_level: &str) -> String {
    match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    }
}

fn build_subscriber(log_level: &str) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish()
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed with errors"
        );
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let run_id = generate_run_id();

    debug!(
        operation = operation,
        run_id = %run_id,
        "Starting operation"
    );

    let result = f();

    info!(
        operation = operation,
        run_id = %run_id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log the dates loaded from one date file
pub fn log_datefile_stats(file_path: &str, date_count: usize, min_doy: i64, max_doy: i64) {
    info!(
        operation = "read_datefile",
        file_path = file_path,
        date_count = date_count,
        min_doy = min_doy,
        max_doy = max_doy,
        "Date file loaded"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::DoylineError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}

/// Generate a unique id for one run of an operation
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}
