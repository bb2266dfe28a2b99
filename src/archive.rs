use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::FileOptions;

use crate::errors::TransferError;

/// Temporary zip file that lives for the duration of one upload attempt.
///
/// `remove` is the normal release path so the caller can surface a deletion
/// failure; `Drop` covers early exits and only logs.
pub struct TempArchive {
    path: PathBuf,
    removed: bool,
}

impl TempArchive {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the archive, consuming the guard.
    pub fn remove(mut self) -> Result<(), TransferError> {
        self.removed = true;
        std::fs::remove_file(&self.path).map_err(|source| TransferError::Cleanup {
            path: self.path.clone(),
            source,
        })
    }
}

impl Drop for TempArchive {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to remove temp zip archive");
            }
        }
    }
}

/// Compresses `dir` into `{name}_{uuid}.zip` under the system temp dir.
pub fn create_temp_zip_archive(dir: &Path) -> Result<TempArchive, TransferError> {
    let name = dir
        .file_name()
        .and_then(|x| x.to_str())
        .unwrap_or("dir")
        .to_string();

    let archive_path = std::env::temp_dir().join(format!("{}_{}.zip", name, Uuid::new_v4()));
    // Guard exists before the write so a failed write still removes the partial file.
    let archive = TempArchive {
        path: archive_path,
        removed: false,
    };

    let mut entries = Vec::<(PathBuf, PathBuf)>::new();
    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
    {
        let file_path = entry.path().to_path_buf();
        let rel = file_path
            .strip_prefix(dir)
            .unwrap_or(file_path.as_path())
            .to_path_buf();
        let entry_name = Path::new(&name).join(rel);
        entries.push((file_path, entry_name));
    }

    write_zip_archive(archive.path(), &entries).map_err(|source| TransferError::Archive {
        path: dir.to_path_buf(),
        source,
    })?;

    Ok(archive)
}

fn write_zip_archive(archive_path: &Path, entries: &[(PathBuf, PathBuf)]) -> Result<(), ZipError> {
    let file = File::create(archive_path)?;
    let mut writer = zip::ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (source_path, entry_path) in entries {
        let mut source = File::open(source_path)?;
        let entry_name = entry_path.to_string_lossy().replace('\\', "/");
        writer.start_file(entry_name, options)?;
        io::copy(&mut source, &mut writer)?;
    }

    writer.finish()?;
    Ok(())
}
