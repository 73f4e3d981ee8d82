//! Export engine
//!
//! Turns records into a `base/<region>/<organization>/<person>/` tree. Each
//! record is independent: its directory is created, then its whole
//! [`DerivedFileSet`] is written concurrently and joined before the record's
//! report is produced. Records sharing a person directory are written one
//! after another in input order, so the later record's files win; distinct
//! directories are exported with bounded parallelism.

use super::files::DerivedFileSet;
use super::summary::{ExportError, ExportErrorType, ExportSummary};
use crate::adapters::filesystem::FileSink;
use crate::core::normalize::{extract_org_name, sanitize_name, sanitize_opt};
use crate::domain::record::fields;
use crate::domain::Record;
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Records between progress log lines
const PROGRESS_INTERVAL: usize = 50;

/// Sanitized directory segments of one record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportTarget {
    pub region: String,
    pub organization: String,
    pub person: String,
}

impl ExportTarget {
    /// Compute the segments for `record`
    ///
    /// The person segment is `fio`, falling back to `username`.
    pub fn for_record(record: &Record) -> Self {
        let region = sanitize_opt(record.profile_field(fields::REGION).as_deref());
        let organization = sanitize_name(&extract_org_name(
            record.profile_field(fields::ORGANIZATION_NAME).as_deref(),
        ));
        let person = sanitize_opt(
            record
                .profile_field(fields::FIO)
                .or_else(|| record.username())
                .as_deref(),
        );

        Self {
            region,
            organization,
            person,
        }
    }

    /// `base/region/organization/person`
    pub fn path_under(&self, base: &Path) -> PathBuf {
        base.join(&self.region)
            .join(&self.organization)
            .join(&self.person)
    }
}

/// Outcome of exporting one record
#[derive(Debug, Clone)]
pub struct RecordReport {
    /// Position of the record in the input
    pub index: usize,

    /// Directory the record was written to
    pub target: PathBuf,

    /// Files in the record's derived set
    pub files_planned: usize,

    /// Files successfully written
    pub files_written: usize,

    /// Everything that went wrong for this record
    pub errors: Vec<ExportError>,
}

impl RecordReport {
    fn new(index: usize, target: PathBuf) -> Self {
        Self {
            index,
            target,
            files_planned: 0,
            files_written: 0,
            errors: Vec::new(),
        }
    }

    /// True when the directory and every file were written
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Writes records into the export tree through a [`FileSink`]
pub struct ExportEngine {
    sink: Arc<dyn FileSink>,
    base_dir: PathBuf,
    max_concurrency: usize,
}

impl ExportEngine {
    /// Create an engine writing under `base_dir`
    pub fn new(sink: Arc<dyn FileSink>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            sink,
            base_dir: base_dir.into(),
            max_concurrency: 1,
        }
    }

    /// Export up to `max_concurrency` records at once (minimum 1)
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Root of the export tree
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Export one record
    ///
    /// Never fails as a whole; every problem lands in the report.
    pub async fn export_record(&self, index: usize, record: &Record) -> RecordReport {
        let target = ExportTarget::for_record(record);
        let dir = target.path_under(&self.base_dir);
        let mut report = RecordReport::new(index, dir.clone());
        let context = record_context(index, record);

        let files = match DerivedFileSet::for_record(record) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(index, error = %e, "Could not derive files for record");
                report.errors.push(
                    ExportError::new(ExportErrorType::Record, e.to_string()).with_context(context),
                );
                return report;
            }
        };
        report.files_planned = files.len();

        if let Err(e) = self.sink.create_dir_all(&dir).await {
            tracing::warn!(index, path = %dir.display(), error = %e, "Failed to create directory");
            report.errors.push(
                ExportError::new(ExportErrorType::Directory, e.to_string()).with_context(context),
            );
            return report;
        }

        let writes = files.iter().map(|file| {
            let path = dir.join(&file.name);
            async move { self.sink.write_file(&path, &file.contents).await }
        });

        for result in futures::future::join_all(writes).await {
            match result {
                Ok(()) => report.files_written += 1,
                Err(e) => {
                    tracing::warn!(index, error = %e, "Failed to write file");
                    report.errors.push(
                        ExportError::new(ExportErrorType::File, e.to_string())
                            .with_context(context.clone()),
                    );
                }
            }
        }

        tracing::debug!(
            index,
            path = %dir.display(),
            files_written = report.files_written,
            "Record exported"
        );
        report
    }

    /// Export every record and summarize
    ///
    /// Once `shutdown` turns `true`, records not yet started are skipped.
    pub async fn export_all(
        &self,
        records: &[Record],
        shutdown: Option<watch::Receiver<bool>>,
    ) -> ExportSummary {
        let started = Instant::now();
        let total = records.len();
        let processed = AtomicUsize::new(0);

        tracing::info!(
            total_records = total,
            base_dir = %self.base_dir.display(),
            max_concurrency = self.max_concurrency,
            "Starting export"
        );

        let groups = self.group_by_target(records);
        let reports: Vec<Vec<Option<RecordReport>>> = stream::iter(groups)
            .map(|group| {
                let shutdown = shutdown.clone();
                let processed = &processed;
                async move {
                    let mut reports = Vec::with_capacity(group.len());
                    for (index, record) in group {
                        if shutdown.as_ref().is_some_and(|rx| *rx.borrow()) {
                            reports.push(None);
                            continue;
                        }
                        reports.push(Some(self.export_record(index, record).await));
                        let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                        if done % PROGRESS_INTERVAL == 0 || done == total {
                            tracing::info!(processed = done, total, "Export progress");
                        }
                    }
                    reports
                }
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let mut summary = ExportSummary::new();
        summary.total_records = total;
        let mut directories = HashSet::new();

        for report in reports.into_iter().flatten() {
            let Some(report) = report else {
                summary.skipped_records += 1;
                continue;
            };
            summary.files_written += report.files_written;
            summary.file_failures += report
                .errors
                .iter()
                .filter(|e| e.error_type == ExportErrorType::File)
                .count();
            if report.is_success() {
                summary.exported_records += 1;
            } else {
                summary.failed_records += 1;
            }
            directories.insert(report.target);
            summary.errors.extend(report.errors);
        }
        summary.person_directories = directories.len();

        if summary.skipped_records > 0 {
            tracing::warn!(
                skipped = summary.skipped_records,
                "Export interrupted before all records were written"
            );
        }

        summary.with_duration(started.elapsed())
    }

    /// Bucket records by person directory, keeping input order inside each
    /// bucket and ordering buckets by first appearance
    fn group_by_target<'r>(&self, records: &'r [Record]) -> Vec<Vec<(usize, &'r Record)>> {
        let mut slots: HashMap<PathBuf, usize> = HashMap::new();
        let mut groups: Vec<Vec<(usize, &Record)>> = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let dir = ExportTarget::for_record(record).path_under(&self.base_dir);
            let slot = *slots.entry(dir).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push((index, record));
        }
        groups
    }
}

fn record_context(index: usize, record: &Record) -> String {
    match record.identity() {
        Ok(identity) => format!("record={index} identity={identity}"),
        Err(_) => format!("record={index}"),
    }
}
