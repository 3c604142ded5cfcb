//! Terminal formatting of probe outcomes with configurable verbosity.
//!
//! Supports three verbosity levels:
//! - Minimal: One-liner status, pair and duration
//! - Compact: `WORKING:` / `FAILED:` report-style line
//! - Verbose: Multi-line block with every field

use crate::config::LogVerbosity;
use crate::model::ProbeResult;
use tracing_subscriber::EnvFilter;

const SEPARATOR: &str = "────────────────────────────────────────";

/// Level used when `RUST_LOG` is unset, empty or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Build the log filter from `RUST_LOG`-style directives.
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Format duration in human-readable form.
fn format_duration(ms: u128) -> String {
    if ms >= 1000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{}ms", ms)
    }
}

/// A failed probe without error text got a 200 with no `choices`.
fn error_text(result: &ProbeResult) -> &str {
    match (&result.error, result.working) {
        (Some(error), _) => error.as_str(),
        (None, false) => "no choices",
        (None, true) => "-",
    }
}

/// Format a probe result for terminal output.
pub fn format_probe_result(result: &ProbeResult, verbosity: &LogVerbosity) -> String {
    match verbosity {
        LogVerbosity::Minimal => format_minimal(result),
        LogVerbosity::Compact => format_compact(result),
        LogVerbosity::Verbose => format_verbose(result),
    }
}

fn format_minimal(result: &ProbeResult) -> String {
    let status = if result.working { "OK" } else { "FAIL" };
    format!(
        "{} {}|{} {}",
        status,
        result.provider,
        result.model,
        format_duration(result.response_time.as_millis())
    )
}

fn format_compact(result: &ProbeResult) -> String {
    if result.working {
        format!("   WORKING: {}", result.report_line())
    } else {
        format!(
            "   FAILED: {}|{} - {}",
            result.provider,
            result.model,
            error_text(result)
        )
    }
}

fn format_verbose(result: &ProbeResult) -> String {
    let status = if result.working { "WORKING" } else { "FAILED" };

    format!(
        "{separator}\n\
         Provider: {provider}\n\
         Model: {model}\n\
         Media: {media}\n\
         Status: {status}\n\
         Time: {duration}\n\
         Error: {error}\n\
         {separator}",
        separator = SEPARATOR,
        provider = result.provider,
        model = result.model,
        media = result.media_type,
        status = status,
        duration = format_duration(result.response_time.as_millis()),
        error = error_text(result),
    )
}
