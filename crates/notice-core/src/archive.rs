//! ZIP packaging of generated notices

use crate::error::NoticeError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Bundle the given files into a randomly named `.zip` under `dir`.
///
/// Each input is stored under its base name, in input order, with no
/// directory structure. The random name avoids collisions across runs even
/// though requests are processed one at a time.
pub fn archive_notices(paths: &[PathBuf], dir: &Path) -> Result<PathBuf, NoticeError> {
    let tmp = tempfile::Builder::new()
        .prefix("notices-")
        .suffix(".zip")
        .tempfile_in(dir)
        .map_err(|e| NoticeError::Archive(format!("failed to create archive: {}", e)))?;
    let (file, archive_path) = tmp
        .keep()
        .map_err(|e| NoticeError::Archive(format!("failed to keep archive: {}", e)))?;

    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for path in paths {
        let bytes = fs::read(path).map_err(|e| {
            NoticeError::Archive(format!("unreadable artifact {}: {}", path.display(), e))
        })?;
        let base_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                NoticeError::Archive(format!("artifact has no file name: {}", path.display()))
            })?;

        writer
            .start_file(base_name, options)
            .map_err(|e| NoticeError::Archive(e.to_string()))?;
        writer
            .write_all(&bytes)
            .map_err(|e| NoticeError::Archive(e.to_string()))?;
    }

    writer
        .finish()
        .map_err(|e| NoticeError::Archive(e.to_string()))?;

    Ok(archive_path)
}
