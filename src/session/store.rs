use crate::error::StoreError;
use crate::session::Session;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const STORE_FILE_NAME: &str = "all_chats.json";

/// Durable home of the whole session list. Every call reads or writes the
/// complete store; there are no partial updates.
pub trait SessionStorage {
    /// `Ok(vec![])` when nothing has been saved yet.
    fn load(&self) -> Result<Vec<Session>, StoreError>;
    fn save(&self, sessions: &[Session]) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("policy-chat")
        .join(STORE_FILE_NAME)
}

/// JSON array of sessions kept in a single file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| STORE_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Vec<Session>, StoreError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_slice(&data)?)
    }

    fn save(&self, sessions: &[Session]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let bytes = serde_json::to_vec_pretty(sessions)?;
        let tmp_path = self.tmp_path();

        fs::write(&tmp_path, bytes)?;
        match fs::rename(&tmp_path, &self.path) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                if self.path.exists() {
                    fs::remove_file(&self.path)?;
                    fs::rename(&tmp_path, &self.path)?;
                    Ok(())
                } else {
                    Err(rename_err.into())
                }
            }
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Keeps the serialized blob in memory, byte-for-byte what `FileStorage`
/// would write.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blob: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.lock().ok().and_then(|guard| guard.clone())
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Session>, StoreError> {
        match self.blob() {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, sessions: &[Session]) -> Result<(), StoreError> {
        let blob = serde_json::to_string(sessions)?;
        if let Ok(mut guard) = self.blob.lock() {
            *guard = Some(blob);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if let Ok(mut guard) = self.blob.lock() {
            *guard = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Message;
    use std::fs;

    fn sample_sessions() -> Vec<Session> {
        let mut older = Session::new("1700000000000".to_string());
        older.title = "How many sick days...".to_string();
        older.messages.push(Message::user("How many sick days do I get?"));
        older.messages.push(Message::bot("Ten per year."));
        vec![Session::new("1700000000500".to_string()), older]
    }

    #[test]
    fn file_storage_round_trips_sessions() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let storage = FileStorage::new(dir.path().join("nested").join(STORE_FILE_NAME));

        storage.save(&sample_sessions()).expect("store should save");
        let loaded = storage.load().expect("store should load");

        assert_eq!(loaded, sample_sessions());
        assert!(!storage.tmp_path().exists());
    }

    #[test]
    fn file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let storage = FileStorage::new(dir.path().join(STORE_FILE_NAME));

        assert!(storage.load().expect("missing store should load").is_empty());
    }

    #[test]
    fn file_storage_rejects_malformed_json() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join(STORE_FILE_NAME);
        fs::write(&path, "{not json").expect("fixture should write");

        let error = FileStorage::new(&path).load().expect_err("garbage should not parse");
        assert!(matches!(error, StoreError::Malformed(_)));
    }

    #[test]
    fn file_storage_reads_browser_format() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join(STORE_FILE_NAME);
        let data = r#"[{"id":"1712345678901","title":"New Chat","messages":[
            {"sender":"bot","text":"Hello! How can I help you with the HR policies today?"}]}]"#;
        fs::write(&path, data).expect("fixture should write");

        let sessions = FileStorage::new(&path).load().expect("fixture should load");
        assert_eq!(sessions, vec![Session::new("1712345678901".to_string())]);
    }

    #[test]
    fn file_storage_clear_removes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let storage = FileStorage::new(dir.path().join(STORE_FILE_NAME));
        storage.save(&sample_sessions()).expect("store should save");

        storage.clear().expect("clear should succeed");
        assert!(!storage.path().exists());
        storage.clear().expect("second clear should succeed");
    }

    #[test]
    fn memory_storage_round_trips_and_clears() {
        let storage = MemoryStorage::default();
        storage.save(&sample_sessions()).expect("store should save");
        assert_eq!(storage.load().expect("store should load"), sample_sessions());

        storage.clear().expect("clear should succeed");
        assert!(storage.blob().is_none());
        assert!(storage.load().expect("cleared store should load").is_empty());
    }
}
