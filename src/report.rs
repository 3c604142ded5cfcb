//! Aggregation and reporting of probe results.
//!
//! Produces `working_results.txt` (one `provider|model|media_type` line per
//! working model), the `last_run.txt` marker and the final summary block.

use crate::discovery::EXCLUDED_PROVIDER;
use crate::error::ProbeError;
use crate::media::MediaType;
use crate::model::ProbeResult;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const REPORT_FILE: &str = "working_results.txt";
pub const LAST_RUN_FILE: &str = "last_run.txt";

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Keep working results only, ordered by (provider, model).
pub fn filter_and_sort(results: &[ProbeResult]) -> Vec<&ProbeResult> {
    let mut working: Vec<&ProbeResult> = results.iter().filter(|r| r.working).collect();
    working.sort_by(|a, b| (&a.provider, &a.model).cmp(&(&b.provider, &b.model)));
    working
}

/// Report file contents for already filtered and sorted results.
pub fn render_report(working: &[&ProbeResult]) -> String {
    working.iter().fold(String::new(), |mut out, result| {
        out.push_str(&result.report_line());
        out.push('\n');
        out
    })
}

/// Write the report into `dir`, replacing any previous one.
pub fn write_report(dir: &Path, working: &[&ProbeResult]) -> Result<PathBuf, ProbeError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(REPORT_FILE);
    fs::write(&path, render_report(working))?;

    info!("{}", RULE);
    info!("RESULTS SAVED");
    info!("{}", RULE);
    info!("File: {}", path.display());
    info!("Total working models: {}", working.len());

    if !working.is_empty() {
        info!("Contents of {}:", REPORT_FILE);
        info!("{}", THIN_RULE);
        for result in working {
            info!("   {}", result.report_line());
        }
    }

    Ok(path)
}

/// Write the last-run marker into `dir`, replacing any previous one.
pub fn write_last_run(dir: &Path, working_count: usize, timestamp: NaiveDateTime) -> Result<PathBuf, ProbeError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LAST_RUN_FILE);
    let content = format!(
        "Last successful run: {}\nWorking models: {}\n",
        timestamp.format("%Y-%m-%d %H:%M:%S"),
        working_count
    );
    fs::write(&path, content)?;
    Ok(path)
}

/// Totals and breakdowns over one run's results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub working: usize,
    pub by_provider: BTreeMap<String, usize>,
    pub by_media: BTreeMap<MediaType, usize>,
}

impl Summary {
    pub fn from_results(results: &[ProbeResult]) -> Self {
        results.iter().fold(
            Self {
                total: results.len(),
                ..Self::default()
            },
            |mut summary, result| {
                if result.working {
                    summary.working += 1;
                    *summary.by_provider.entry(result.provider.clone()).or_default() += 1;
                    *summary.by_media.entry(result.media_type).or_default() += 1;
                }
                summary
            },
        )
    }

    pub fn failed(&self) -> usize {
        self.total - self.working
    }

    /// Percentage of working models; `None` when nothing was probed.
    pub fn success_rate(&self) -> Option<f64> {
        (self.total > 0).then(|| self.working as f64 / self.total as f64 * 100.0)
    }

    /// Human-readable summary block.
    pub fn render(&self, api_url: &str) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "FINAL SUMMARY");
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "API URL: {}", api_url);
        let _ = writeln!(out, "Total Models Tested: {}", self.total);
        let _ = writeln!(out, "Working Models: {}", self.working);
        let _ = writeln!(out, "Failed Models: {}", self.failed());

        if let Some(rate) = self.success_rate() {
            let _ = writeln!(out, "Success Rate: {:.1}%", rate);
        }

        if self.working > 0 {
            let _ = writeln!(out, "\nWorking Models by Provider (excluded '{}'):", EXCLUDED_PROVIDER);
            let _ = writeln!(out, "{}", THIN_RULE);
            for (provider, count) in &self.by_provider {
                let _ = writeln!(out, "   • {}: {} models", provider, count);
            }

            let _ = writeln!(out, "\nMedia Type Breakdown:");
            let _ = writeln!(out, "{}", THIN_RULE);
            for (media, count) in &self.by_media {
                let _ = writeln!(out, "   • {}: {} models", media, count);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn result(provider: &str, model: &str, working: bool, media_type: MediaType) -> ProbeResult {
        ProbeResult {
            provider: provider.to_string(),
            model: model.to_string(),
            working,
            response_time: Duration::from_millis(250),
            error: (!working).then(|| "HTTP 500".to_string()),
            media_type,
        }
    }

    fn sample_results() -> Vec<ProbeResult> {
        vec![
            result("B", "zeta", true, MediaType::Image),
            result("A", "m2", false, MediaType::Video),
            result("A", "m1", true, MediaType::Text),
            result("B", "alpha", true, MediaType::Text),
            result("C", "c1", false, MediaType::Text),
        ]
    }

    #[test]
    fn filter_and_sort_keeps_only_working_sorted_by_provider_then_model() {
        let results = sample_results();
        let working = filter_and_sort(&results);

        let keys: Vec<(&str, &str)> = working
            .iter()
            .map(|r| (r.provider.as_str(), r.model.as_str()))
            .collect();
        assert_eq!(keys, vec![("A", "m1"), ("B", "alpha"), ("B", "zeta")]);
        assert!(working.iter().all(|r| r.working));
    }

    #[test]
    fn report_lines_match_working_results_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let results = sample_results();
        let working = filter_and_sort(&results);

        let path = write_report(dir.path(), &working).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert_eq!(path, dir.path().join(REPORT_FILE));
        assert_eq!(content, "A|m1|text\nB|alpha|text\nB|zeta|image\n");
        for line in content.lines() {
            assert_eq!(line.split('|').count(), 3, "bad line: {}", line);
        }
    }

    #[test]
    fn writing_twice_overwrites_with_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        let results = sample_results();
        let working = filter_and_sort(&results);

        let path = write_report(dir.path(), &working).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        write_report(dir.path(), &working).unwrap();
        let second = fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn report_replaces_stale_content() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(REPORT_FILE), "Old|stale|video\nOld|gone|text\n").unwrap();

        let results = vec![result("A", "m1", true, MediaType::Text)];
        write_report(dir.path(), &filter_and_sort(&results)).unwrap();

        let content = fs::read_to_string(dir.path().join(REPORT_FILE)).unwrap();
        assert_eq!(content, "A|m1|text\n");
    }

    #[test]
    fn write_report_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("working").join("nested");

        let path = write_report(&nested, &[]).unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn last_run_marker_has_timestamp_and_count() {
        let dir = tempfile::tempdir().unwrap();
        let timestamp = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(8, 5, 3)
            .unwrap();

        fs::write(dir.path().join(LAST_RUN_FILE), "previous run\n").unwrap();
        let path = write_last_run(dir.path(), 7, timestamp).unwrap();

        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "Last successful run: 2026-10-19 08:05:03\nWorking models: 7\n"
        );
    }

    #[test]
    fn summary_counts_totals_and_breakdowns() {
        let summary = Summary::from_results(&sample_results());

        assert_eq!(summary.total, 5);
        assert_eq!(summary.working, 3);
        assert_eq!(summary.failed(), 2);
        assert_eq!(summary.by_provider.get("A"), Some(&1));
        assert_eq!(summary.by_provider.get("B"), Some(&2));
        assert_eq!(summary.by_provider.get("C"), None);
        assert_eq!(summary.by_media.get(&MediaType::Text), Some(&2));
        assert_eq!(summary.by_media.get(&MediaType::Image), Some(&1));
        assert_eq!(summary.by_media.get(&MediaType::Video), None);
    }

    #[test]
    fn success_rate_is_skipped_without_results() {
        let summary = Summary::from_results(&[]);

        assert_eq!(summary.success_rate(), None);
        let rendered = summary.render("http://gw");
        assert!(!rendered.contains("Success Rate"));
        assert!(!rendered.contains("Media Type Breakdown"));
    }

    #[test]
    fn renders_full_summary_block() {
        let summary = Summary::from_results(&sample_results());
        let rendered = summary.render("http://gw:1337");

        let expected = format!(
            "{rule}\nFINAL SUMMARY\n{rule}\n\
             API URL: http://gw:1337\n\
             Total Models Tested: 5\n\
             Working Models: 3\n\
             Failed Models: 2\n\
             Success Rate: 60.0%\n\
             \nWorking Models by Provider (excluded 'Custom'):\n{thin}\n\
             \u{20}  • A: 1 models\n\
             \u{20}  • B: 2 models\n\
             \nMedia Type Breakdown:\n{thin}\n\
             \u{20}  • image: 1 models\n\
             \u{20}  • text: 2 models\n",
            rule = RULE,
            thin = THIN_RULE,
        );
        assert_eq!(rendered, expected);
    }
}
