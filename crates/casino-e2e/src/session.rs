// Stored browser sessions
//
// One JSON storage-state file per role/device pair, written once by the
// auth setup and loaded by every later run that starts authenticated.

use crate::fixtures::{Device, Role};
use casino_test_utils::{Error, Result};
use playwright_rs::StorageState;
use std::path::{Path, PathBuf};

/// Storage-state files under one directory: `<dir>/<role>-<device>.json`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, role: Role, device: Device) -> PathBuf {
        self.dir
            .join(format!("{}-{}.json", role.as_str(), device.as_str()))
    }

    /// Loads the stored state, or `None` when nothing was stored yet.
    pub async fn load(&self, role: Role, device: Device) -> Result<Option<StorageState>> {
        let path = self.path(role, device);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Error::from(err).context(format!("reading {}", path.display()))),
        };
        let state = serde_json::from_str(&json)
            .map_err(|err| Error::from(err).context(format!("parsing {}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded session state");
        Ok(Some(state))
    }

    /// Writes `state`, creating the directory if needed.
    pub async fn save(&self, role: Role, device: Device, state: &StorageState) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path(role, device);
        let json = serde_json::to_string_pretty(state)?;
        tokio::fs::write(&path, json).await?;
        tracing::info!(path = %path.display(), "saved session state");
        Ok(path)
    }

    /// Removes the stored state; missing files are fine.
    pub async fn clear(&self, role: Role, device: Device) -> Result<()> {
        match tokio::fs::remove_file(self.path(role, device)).await {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// A storage state with no cookies and no local storage
pub fn empty_state() -> StorageState {
    StorageState {
        cookies: Vec::new(),
        origins: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playwright_rs::{LocalStorageItem, Origin};

    #[test]
    fn test_path_layout() {
        let store = SessionStore::new(".auth");
        assert_eq!(
            store.path(Role::Member, Device::Mobile),
            PathBuf::from(".auth/member-mobile.json")
        );
        assert_eq!(
            store.path(Role::Guest, Device::Desktop),
            PathBuf::from(".auth/guest-desktop.json")
        );
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested"));
        assert!(store.load(Role::Member, Device::Desktop).await.unwrap().is_none());

        let state = StorageState {
            cookies: Vec::new(),
            origins: vec![Origin {
                origin: "http://127.0.0.1:3000".into(),
                local_storage: vec![LocalStorageItem {
                    name: "casino.session".into(),
                    value: "player".into(),
                }],
            }],
        };
        let path = store.save(Role::Member, Device::Desktop, &state).await.unwrap();
        assert!(path.ends_with("member-desktop.json"));

        let loaded = store.load(Role::Member, Device::Desktop).await.unwrap().unwrap();
        assert_eq!(loaded.origins[0].local_storage[0].value, "player");
        assert!(store.load(Role::Member, Device::Mobile).await.unwrap().is_none());

        store.clear(Role::Member, Device::Desktop).await.unwrap();
        store.clear(Role::Member, Device::Desktop).await.unwrap();
        assert!(store.load(Role::Member, Device::Desktop).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        tokio::fs::write(store.path(Role::Guest, Device::Mobile), "{not json")
            .await
            .unwrap();
        let err = store.load(Role::Guest, Device::Mobile).await.unwrap_err();
        assert!(err.to_string().contains("guest-mobile.json"));
    }
}
