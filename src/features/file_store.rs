use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::store::{KeyValueStore, StoreError, StoreResult};

/// Key-value store persisted as a single JSON object of `key -> value`.
///
/// Values must be UTF-8. Every put rewrites the whole file through a
/// temporary sibling followed by a rename, so a crash mid-write leaves the
/// previous contents intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`, starting empty if the file does not exist yet
    pub(crate) fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("opened file store {} with {} keys", path.display(), entries.len());

        Ok(Self { path, entries })
    }

    fn flush(&self) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        let tmp = staging_path(&self.path);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// `ledger.json` stages through `ledger.json.tmp`
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|v| v.clone().into_bytes()))
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let value = String::from_utf8(value)
            .map_err(|_| StoreError::Backend(format!("value for key {key} is not UTF-8")))?;

        let previous = self.entries.insert(key.to_owned(), value);
        if let Err(e) = self.flush() {
            // Keep memory in step with what is on disk
            match previous {
                Some(v) => self.entries.insert(key.to_owned(), v),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}
