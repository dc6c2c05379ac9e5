use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::{error, info, warn};

/// Loads and saves the whole collection at once.
pub trait Persistence<T>: Send {
    /// Reads every stored record.
    ///
    /// Recoverable problems (a missing file, malformed contents) are logged and produce an empty
    /// collection. An `Err` means the backing store is in a state the process cannot continue
    /// from.
    fn load(&self) -> Result<Vec<T>, PersistenceError>;

    /// Replaces the stored collection with `records`.
    fn save(&self, records: &[T]) -> Result<(), PersistenceError>;

    /// Human readable location of the backing store, for logs and `info`.
    fn location(&self) -> String;
}

#[derive(Debug, ThisError)]
pub enum PersistenceError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode collection: {0}")]
    Json(#[from] serde_json::Error),
}

/// A pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> JsonFile {
        JsonFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // The temporary file lives next to the target so the final rename stays on one filesystem.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl<T> Persistence<T> for JsonFile
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Vec<T>, PersistenceError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                error!(path = %self.path.display(), "Collection file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                error!(path = %self.path.display(), "Collection file is not valid UTF-8, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if contents.trim().is_empty() {
            warn!(path = %self.path.display(), "Collection file is empty");
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<T>>(&contents) {
            Ok(records) => {
                info!(path = %self.path.display(), count = records.len(), "Collection loaded");
                Ok(records)
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Collection file does not hold a collection, starting empty");
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, records: &[T]) -> Result<(), PersistenceError> {
        let mut json = serde_json::to_vec_pretty(records)?;
        json.push(b'\n');

        let temp_path = self.temp_path();
        let result = File::create(&temp_path)
            .and_then(|mut file| {
                file.write_all(&json)?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&temp_path, &self.path));

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(self.io_error(e));
        }

        info!(path = %self.path.display(), count = records.len(), "Collection saved");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
