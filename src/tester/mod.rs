//! GatewayTester - runs the discover, probe, report pipeline end to end.
//!
//! Discovery runs to completion before any probe is sent, each phase on its
//! own connection pool. An empty provider or model list ends the run early
//! with no results.


use crate::config::Config;
use crate::discovery::{Discovery, EXCLUDED_PROVIDER};
use crate::error::ProbeError;
use crate::model::{ProbeResult, ProbeTarget};
use crate::probe::Prober;
use crate::report::{filter_and_sort, write_last_run, write_report};
use chrono::NaiveDateTime;
use std::path::PathBuf;
use tracing::{error, info};

const RULE: &str = "============================================================";

/// Files written by [`GatewayTester::save_results`].
#[derive(Debug, Clone, PartialEq)]
pub struct SavedReport {
    pub report_path: PathBuf,
    pub last_run_path: PathBuf,
    pub working_count: usize,
}

pub struct GatewayTester {
    config: Config,
}

impl GatewayTester {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn api_url(&self) -> &str {
        self.config.api_url()
    }

    /// Discover every (provider, model) pair and probe each one.
    ///
    /// Only a failure to build an HTTP client is returned as an error;
    /// gateway failures end up as empty lists or failed results.
    pub async fn run(&self) -> Result<Vec<ProbeResult>, ProbeError> {
        info!("{}", RULE);
        info!("TESTING CUSTOM API: {}", self.api_url());
        info!("{}", RULE);

        let targets = self.discover().await?;
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        info!("{}", RULE);
        info!("TESTING MODELS WITH CHAT COMPLETIONS");
        info!("{}", RULE);

        let prober = Prober::new(self.api_url())?
            .with_timeout(self.config.probe_timeout())
            .with_delay(self.config.probe_delay())
            .with_max_tokens(self.config.probe.max_tokens)
            .with_verbosity(self.config.app.log_verbosity.clone());

        Ok(prober.probe_all(&targets).await)
    }

    async fn discover(&self) -> Result<Vec<ProbeTarget>, ProbeError> {
        let discovery = Discovery::with_timeout(self.api_url(), self.config.discovery_timeout())?;

        let provider_ids = discovery.fetch_providers().await;
        if provider_ids.is_empty() {
            error!("No providers found (or all were excluded)");
            return Ok(Vec::new());
        }

        info!(
            "Provider IDs from /v1/providers (excluding '{}'): {:?}",
            EXCLUDED_PROVIDER, provider_ids
        );

        let targets = discovery.discover(&provider_ids).await;
        info!(
            "TOTAL: {} models to test across {} providers",
            targets.len(),
            provider_ids.len()
        );

        if targets.is_empty() {
            error!("No models found for any provider!");
        }

        Ok(targets)
    }

    /// Write the working-model report and the last-run marker.
    pub fn save_results(&self, results: &[ProbeResult], timestamp: NaiveDateTime) -> Result<SavedReport, ProbeError> {
        let dir = &self.config.output.working_dir;
        let working = filter_and_sort(results);

        let report_path = write_report(dir, &working)?;
        let last_run_path = write_last_run(dir, working.len(), timestamp)?;

        Ok(SavedReport {
            report_path,
            last_run_path,
            working_count: working.len(),
        })
    }
}
