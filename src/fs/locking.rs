//! Advisory file locks around lead files
//!
//! Every reader and writer of a lead file goes through these functions, so
//! concurrent `leadengine` processes see either the old or the new content and
//! stage changes to one lead are applied one at a time.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Read file contents under a shared lock.
pub fn locked_read(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    file.lock_shared()
        .with_context(|| format!("Failed to acquire shared lock: {}", path.display()))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(content)
}

/// Replace file contents under an exclusive lock, creating the file if needed.
///
/// The file is truncated only after the lock is held, so a concurrent reader
/// never observes an empty file.
pub fn locked_write(path: &Path, content: &str) -> Result<()> {
    #[allow(clippy::suspicious_open_options)]
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .with_context(|| format!("Failed to open file for writing: {}", path.display()))?;
    file.lock_exclusive()
        .with_context(|| format!("Failed to acquire exclusive lock: {}", path.display()))?;
    overwrite(&mut file, path, content)
}

/// Create a new file with `content`. Fails if the file already exists.
///
/// The content is written to a staging file in the same directory and then
/// hard-linked into place, so `path` never exists with partial content.
pub fn atomic_create(path: &Path, content: &str) -> Result<()> {
    let staging = staging_path(path)?;

    let result = write_staging(&staging, content).and_then(|()| {
        fs::hard_link(&staging, path)
            .with_context(|| format!("Failed to create file: {}", path.display()))
    });

    if let Err(e) = fs::remove_file(&staging) {
        tracing::warn!(path = %staging.display(), error = %e, "failed to remove staging file");
    }
    result
}

fn staging_path(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid file path: {}", path.display()))?;
    let token = uuid::Uuid::new_v4().simple().to_string();
    Ok(path.with_file_name(format!(".{file_name}.{}.tmp", &token[..8])))
}

fn write_staging(staging: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(staging)
        .with_context(|| format!("Failed to create staging file: {}", staging.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", staging.display()))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync file: {}", staging.display()))?;
    Ok(())
}

/// Read, transform and rewrite an existing file while holding one exclusive
/// lock for the whole sequence.
///
/// `update` returns the new content, or `None` to leave the file as it is.
/// If `update` fails the file is left as it was and the error is returned.
pub fn locked_update<T, F>(path: &Path, update: F) -> Result<T>
where
    F: FnOnce(&str) -> Result<(Option<String>, T)>,
{
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .with_context(|| format!("Failed to open file for update: {}", path.display()))?;
    file.lock_exclusive()
        .with_context(|| format!("Failed to acquire exclusive lock: {}", path.display()))?;

    let mut current = String::new();
    file.read_to_string(&mut current)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let (new_content, output) = update(&current)?;
    if let Some(new_content) = new_content {
        overwrite(&mut file, path, &new_content)?;
    }
    Ok(output)
}

fn overwrite(file: &mut File, path: &Path, content: &str) -> Result<()> {
    file.set_len(0)
        .with_context(|| format!("Failed to truncate file: {}", path.display()))?;
    file.seek(SeekFrom::Start(0))
        .with_context(|| format!("Failed to rewind file: {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    file.flush()
        .with_context(|| format!("Failed to flush file: {}", path.display()))?;
    Ok(())
}
