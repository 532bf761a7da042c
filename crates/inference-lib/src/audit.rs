//! Append-only audit logging of served predictions
//!
//! Positive predictions (label other than the benign one) are always
//! recorded; negative predictions only when explicitly enabled. Records
//! are written as whole lines with a single append-mode write, so
//! concurrent writers may interleave records but never the bytes of one.

use crate::models::PredictionRecord;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Log target for non-benign predictions
pub const POSITIVE_LOG: &str = "positive_predictions.log";

/// Log target for benign predictions, used only when enabled
pub const NEGATIVE_LOG: &str = "negative_predictions.log";

/// Audit logging configuration
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Directory holding both log targets, created on first use
    pub log_dir: PathBuf,
    /// Whether benign predictions are recorded at all
    pub log_negative_predictions: bool,
    /// The label treated as "nothing detected"
    pub benign_label: i64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("/var/log/inference-server"),
            log_negative_predictions: false,
            benign_label: 0,
        }
    }
}

/// Appends prediction records to flat log files
#[derive(Debug, Clone)]
pub struct AuditLogger {
    config: AuditConfig,
}

impl AuditLogger {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Whether a label counts as a positive (non-benign) prediction
    pub fn is_positive(&self, label: i64) -> bool {
        label != self.config.benign_label
    }

    /// Append one record to the appropriate target, or skip it when
    /// negative logging is disabled. Callers must not let a returned error
    /// reach the prediction response path.
    pub fn record(&self, record: &PredictionRecord) -> Result<()> {
        let positive = self.is_positive(record.label);
        if !positive && !self.config.log_negative_predictions {
            return Ok(());
        }

        let target = self
            .config
            .log_dir
            .join(if positive { POSITIVE_LOG } else { NEGATIVE_LOG });
        self.append(&target, record)
    }

    fn append(&self, path: &Path, record: &PredictionRecord) -> Result<()> {
        fs::create_dir_all(&self.config.log_dir)
            .with_context(|| format!("Failed to create log directory {:?}", self.config.log_dir))?;

        let line = format!(
            "timestamp={} prediction={} features={}\n",
            record.timestamp.to_rfc3339(),
            record.label,
            record.features
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open audit log {:?}", path))?;

        // One write for the whole line keeps the record intact under
        // concurrent appends.
        file.write_all(line.as_bytes())
            .with_context(|| format!("Failed to append to audit log {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn logger(dir: &TempDir, log_negative: bool) -> AuditLogger {
        AuditLogger::new(AuditConfig {
            log_dir: dir.path().to_path_buf(),
            log_negative_predictions: log_negative,
            benign_label: 0,
        })
    }

    fn line_count(path: &Path) -> usize {
        match fs::read_to_string(path) {
            Ok(content) => content.lines().count(),
            Err(_) => 0,
        }
    }

    #[test]
    fn test_positive_record_always_appended() {
        let dir = TempDir::new().unwrap();
        let logger = logger(&dir, false);

        let record = PredictionRecord::new(1, json!({"flow_duration": 1000}));
        logger.record(&record).unwrap();

        assert_eq!(line_count(&dir.path().join(POSITIVE_LOG)), 1);
        assert_eq!(line_count(&dir.path().join(NEGATIVE_LOG)), 0);
    }

    #[test]
    fn test_negative_record_skipped_when_disabled() {
        let dir = TempDir::new().unwrap();
        let logger = logger(&dir, false);

        let record = PredictionRecord::new(0, json!({"flow_duration": 1000}));
        logger.record(&record).unwrap();

        assert_eq!(line_count(&dir.path().join(POSITIVE_LOG)), 0);
        assert_eq!(line_count(&dir.path().join(NEGATIVE_LOG)), 0);
    }

    #[test]
    fn test_negative_record_appended_when_enabled() {
        let dir = TempDir::new().unwrap();
        let logger = logger(&dir, true);

        let record = PredictionRecord::new(0, json!({"flow_duration": 1000}));
        logger.record(&record).unwrap();

        assert_eq!(line_count(&dir.path().join(POSITIVE_LOG)), 0);
        assert_eq!(line_count(&dir.path().join(NEGATIVE_LOG)), 1);
    }

    #[test]
    fn test_log_directory_created_on_first_use() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("logs");
        let logger = AuditLogger::new(AuditConfig {
            log_dir: nested.clone(),
            log_negative_predictions: false,
            benign_label: 0,
        });

        let record = PredictionRecord::new(2, json!({}));
        logger.record(&record).unwrap();

        assert!(nested.join(POSITIVE_LOG).exists());
    }

    #[test]
    fn test_record_line_format() {
        let dir = TempDir::new().unwrap();
        let logger = logger(&dir, false);

        let record = PredictionRecord::new(3, json!({"tot_fwd_pkts": 2}));
        logger.record(&record).unwrap();

        let content = fs::read_to_string(dir.path().join(POSITIVE_LOG)).unwrap();
        assert!(content.starts_with("timestamp="));
        assert!(content.contains("prediction=3"));
        assert!(content.contains(r#"features={"tot_fwd_pkts":2}"#));
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_records_appended_in_insertion_order() {
        let dir = TempDir::new().unwrap();
        let logger = logger(&dir, false);

        for label in [1, 2, 3] {
            logger
                .record(&PredictionRecord::new(label, json!({})))
                .unwrap();
        }

        let content = fs::read_to_string(dir.path().join(POSITIVE_LOG)).unwrap();
        let labels: Vec<&str> = content
            .lines()
            .map(|l| l.split("prediction=").nth(1).unwrap())
            .map(|rest| rest.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(labels, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_custom_benign_label() {
        let dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(AuditConfig {
            log_dir: dir.path().to_path_buf(),
            log_negative_predictions: false,
            benign_label: -1,
        });

        assert!(logger.is_positive(0));
        assert!(!logger.is_positive(-1));
    }
}
