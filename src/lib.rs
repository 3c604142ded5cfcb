//! modelprobe - finds which models behind an LLM gateway actually answer.
//!
//! Pipeline:
//! - Discovery: `GET /v1/providers`, then `GET /api/{provider}/models`
//! - Probe: one minimal chat completion per model, strictly sequential
//! - Report: `working_results.txt` with `provider|model|media_type` lines

pub mod config;
pub mod discovery;
pub mod error;
pub mod http;
pub mod logger;
pub mod media;
pub mod model;
pub mod probe;
pub mod report;
pub mod tester;

#[cfg(test)]
pub(crate) mod test_support;
