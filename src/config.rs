use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;

use crate::constants::{APP_NAME, FILE_NAMES};

/// Filesystem locations resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub state_dir: PathBuf,
    pub roadmap_file: Option<PathBuf>,
}

impl Config {
    /// Explicit directory first, then a progress file in the working
    /// directory, then the platform data directory.
    pub fn resolve(data_dir: Option<PathBuf>, roadmap_file: Option<PathBuf>) -> Self {
        let project_dirs = ProjectDirs::from("com", APP_NAME, APP_NAME);

        let data_dir = data_dir.unwrap_or_else(|| {
            if Path::new(".").join(FILE_NAMES.progress).exists() {
                return PathBuf::from(".");
            }
            project_dirs
                .as_ref()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        });

        let state_dir = project_dirs
            .as_ref()
            .and_then(|dirs| dirs.state_dir())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| data_dir.clone());

        let roadmap_file = roadmap_file.or_else(|| {
            let candidate = data_dir.join(FILE_NAMES.roadmap);
            candidate.exists().then_some(candidate)
        });

        Config {
            data_dir,
            state_dir,
            roadmap_file,
        }
    }

    pub fn progress_path(&self) -> PathBuf {
        self.data_dir.join(FILE_NAMES.progress)
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join(FILE_NAMES.log)
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir.join(FILE_NAMES.exports_dir)
    }

    pub fn ensure_dirs(&self) {
        for dir in [&self.data_dir, &self.state_dir] {
            if let Err(e) = fs::create_dir_all(dir) {
                tracing::warn!(dir = %dir.display(), "could not create directory: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_dir_wins() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::resolve(Some(dir.path().to_path_buf()), None);

        assert_eq!(config.data_dir, dir.path());
        assert_eq!(config.progress_path(), dir.path().join("progress.json"));
        assert_eq!(config.roadmap_file, None);
    }

    #[test]
    fn test_roadmap_file_picked_up_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("roadmap.json"), "{}").unwrap();

        let config = Config::resolve(Some(dir.path().to_path_buf()), None);
        assert_eq!(config.roadmap_file, Some(dir.path().join("roadmap.json")));

        let explicit = PathBuf::from("/elsewhere/plan.json");
        let config = Config::resolve(Some(dir.path().to_path_buf()), Some(explicit.clone()));
        assert_eq!(config.roadmap_file, Some(explicit));
    }
}
