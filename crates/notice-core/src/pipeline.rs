//! Pipeline orchestration
//!
//! Drives extract -> (map, fill, flatten) per row -> archive, accumulating
//! everything inside a scoped temp directory so artifacts are removed on
//! every exit path, including failures partway through a run.

use crate::archive::archive_notices;
use crate::error::NoticeError;
use crate::fields::{build_field_map, NoticeContext};
use crate::fill::{artifact_file_name, fill_template};
use crate::flatten::flatten_notice;
use crate::records::extract_records;
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Runs the per-row document generation pipeline against a fixed template.
pub struct NoticePipeline {
    template: PathBuf,
}

/// One completed run: the per-tenant PDFs plus the ZIP bundling them.
///
/// The batch owns the directory all of them live in. Dropping the batch
/// deletes every artifact and the archive best-effort; [`NoticeBatch::close`]
/// does the same but surfaces the error.
#[derive(Debug)]
pub struct NoticeBatch {
    artifacts: Vec<PathBuf>,
    archive: PathBuf,
    workdir: TempDir,
}

impl NoticeBatch {
    /// Generated notices, one per input row, in row order.
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    /// The ZIP containing every artifact under its base name.
    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// Delete all generated files now.
    pub fn close(self) -> std::io::Result<()> {
        self.workdir.close()
    }
}

impl NoticePipeline {
    pub fn new(template: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Generate one flattened notice per CSV row and archive them.
    ///
    /// Returns exactly as many artifacts as the table has rows; filenames
    /// embed the row index so they never collide within a run.
    pub fn run<R: Read>(&self, csv: R, ctx: &NoticeContext) -> Result<NoticeBatch, NoticeError> {
        let records = extract_records(csv)?;
        let workdir = TempDir::new()?;

        let mut artifacts = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let field_map = build_field_map(record, ctx);
            let path = workdir
                .path()
                .join(artifact_file_name(index, &record.address_1));

            fill_template(&self.template, &field_map, &path)?;
            flatten_notice(&path)?;

            tracing::debug!("Generated notice for {}: {}", record.tenant, path.display());
            artifacts.push(path);
        }

        let archive = archive_notices(&artifacts, workdir.path())?;
        tracing::info!(
            "Generated {} notices, archived at {}",
            artifacts.len(),
            archive.display()
        );

        Ok(NoticeBatch {
            artifacts,
            archive,
            workdir,
        })
    }
}
