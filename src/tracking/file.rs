//! File-backed run store.
//!
//! Layout:
//!
//! ```text
//! <root>/<experiment>/<run_id>/
//!     run.json        # name, timestamps, params, metrics, artifact names
//!     artifacts/      # copies of logged files
//! ```
//!
//! `run.json` is written on `finish`; until then everything is held in memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::{ENV_TRACKING_URI, TrackingConfig};
use crate::error::{AppError, ErrorKind};
use crate::tracking::Tracker;

const RUN_FILE: &str = "run.json";
const ARTIFACT_DIR: &str = "artifacts";

#[derive(Debug, Clone, Serialize)]
struct RunRecord {
    run_id: String,
    run_name: String,
    experiment: String,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    params: BTreeMap<String, String>,
    metrics: BTreeMap<String, f64>,
    artifacts: Vec<String>,
}

#[derive(Debug)]
pub struct FileTracker {
    run_dir: PathBuf,
    record: RunRecord,
}

impl FileTracker {
    /// Create the run directory and start recording.
    pub fn start(config: &TrackingConfig, run_name: &str) -> Result<Self, AppError> {
        if config.uri.starts_with("http://") || config.uri.starts_with("https://") {
            return Err(AppError::new(
                ErrorKind::Config,
                format!(
                    "{ENV_TRACKING_URI}='{}' points at a tracking server; only a local directory is supported.",
                    config.uri
                ),
            ));
        }

        let start_time = Utc::now();
        let run_id = start_time.format("%Y%m%dT%H%M%S%6f").to_string();
        let experiment_dir = config.root().join(&config.experiment);
        let run_dir = experiment_dir.join(&run_id);

        fs::create_dir_all(&experiment_dir).map_err(|e| tracking_io("create experiment directory", &experiment_dir, e))?;
        fs::create_dir(&run_dir).map_err(|e| tracking_io("create run directory", &run_dir, e))?;
        let artifact_dir = run_dir.join(ARTIFACT_DIR);
        fs::create_dir(&artifact_dir).map_err(|e| tracking_io("create artifact directory", &artifact_dir, e))?;

        info!(run_id = %run_id, run_name, dir = %run_dir.display(), "started tracking run");

        Ok(Self {
            run_dir,
            record: RunRecord {
                run_id,
                run_name: run_name.to_string(),
                experiment: config.experiment.clone(),
                start_time,
                end_time: None,
                params: BTreeMap::new(),
                metrics: BTreeMap::new(),
                artifacts: Vec::new(),
            },
        })
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn run_id(&self) -> &str {
        &self.record.run_id
    }
}

impl Tracker for FileTracker {
    fn log_param(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        self.record.params.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn log_metric(&mut self, key: &str, value: f64) -> Result<(), AppError> {
        if !value.is_finite() {
            return Err(AppError::new(
                ErrorKind::Tracking,
                format!("Metric `{key}` is not finite ({value})."),
            ));
        }
        self.record.metrics.insert(key.to_string(), value);
        Ok(())
    }

    fn log_artifact(&mut self, path: &Path) -> Result<(), AppError> {
        let name = path
            .file_name()
            .ok_or_else(|| {
                AppError::new(
                    ErrorKind::Tracking,
                    format!("Artifact path '{}' has no file name.", path.display()),
                )
            })?
            .to_string_lossy()
            .to_string();
        let dest = self.run_dir.join(ARTIFACT_DIR).join(&name);
        fs::copy(path, &dest).map_err(|e| tracking_io("copy artifact", path, e))?;
        self.record.artifacts.push(name);
        Ok(())
    }

    fn log_text(&mut self, name: &str, contents: &str) -> Result<(), AppError> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(AppError::new(
                ErrorKind::Tracking,
                format!("Invalid artifact name '{name}'."),
            ));
        }
        let dest = self.run_dir.join(ARTIFACT_DIR).join(name);
        fs::write(&dest, contents).map_err(|e| tracking_io("write artifact", &dest, e))?;
        self.record.artifacts.push(name.to_string());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AppError> {
        self.record.end_time = Some(Utc::now());
        let path = self.run_dir.join(RUN_FILE);
        let file = fs::File::create(&path).map_err(|e| tracking_io("create run record", &path, e))?;
        serde_json::to_writer_pretty(file, &self.record)
            .map_err(|e| AppError::new(ErrorKind::Tracking, format!("Failed to write run record: {e}")))?;
        info!(
            run_id = %self.record.run_id,
            params = self.record.params.len(),
            metrics = self.record.metrics.len(),
            artifacts = self.record.artifacts.len(),
            "finished tracking run"
        );
        Ok(())
    }
}

fn tracking_io(action: &str, path: &Path, e: std::io::Error) -> AppError {
    AppError::new(
        ErrorKind::Tracking,
        format!("Failed to {action} '{}': {e}", path.display()),
    )
}
