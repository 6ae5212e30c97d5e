use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use chrono::Local;

use crate::{
    constants::{BACKUP_SETTINGS, FILE_NAMES},
    error::{Error, Result},
};

pub fn file_exists(path: &Path) -> bool {
    path.exists()
}

pub fn delete_file_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| Error::io(path, e))?;
    }
    Ok(())
}

pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    atomic_write(path, content)
}

/// Copies `path` into a sibling `backups/` directory, keeping only the most
/// recent copies.
pub fn create_backup(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let backup_dir = path
        .parent()
        .unwrap_or(Path::new("."))
        .join(FILE_NAMES.backups_dir);
    fs::create_dir_all(&backup_dir).map_err(|e| Error::io(&backup_dir, e))?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!(
        "{}.{}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        timestamp
    );
    let backup_path = backup_dir.join(&filename);
    fs::copy(path, &backup_path).map_err(|e| Error::io(&backup_path, e))?;
    tracing::debug!(backup = %backup_path.display(), "backup written");

    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    if let Ok(entries) = fs::read_dir(&backup_dir) {
        let mut backups: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(&*stem))
            .collect();
        backups.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

        let excess = backups.len().saturating_sub(BACKUP_SETTINGS.keep);
        for oldest in backups.iter().take(excess) {
            let _ = fs::remove_file(oldest.path());
        }
    }

    Ok(())
}

/// Writes through a temp file and a rename so readers never observe a
/// partially written file.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    let mut tmp_file = File::create(&tmp_path).map_err(|e| Error::io(&tmp_path, e))?;
    tmp_file
        .write_all(content.as_bytes())
        .map_err(|e| Error::io(&tmp_path, e))?;
    tmp_file.sync_all().map_err(|e| Error::io(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| Error::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        atomic_write(&path, "first").unwrap();
        atomic_write(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_write_text_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join("report.html");

        write_text_file(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
    }

    #[test]
    fn test_create_backup_copies_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "{}").unwrap();

        create_backup(&path).unwrap();

        let backups: Vec<_> = fs::read_dir(dir.path().join(FILE_NAMES.backups_dir))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(backups.len(), 1);
        assert!(
            backups[0]
                .file_name()
                .to_string_lossy()
                .starts_with("progress.json.")
        );
    }

    #[test]
    fn test_delete_file_if_exists_is_quiet_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        delete_file_if_exists(&path).unwrap();
        fs::write(&path, "{}").unwrap();
        delete_file_if_exists(&path).unwrap();
        assert!(!path.exists());
    }
}
