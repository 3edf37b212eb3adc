use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Storage key holding the raw bearer token.
pub const CREDENTIAL_KEY: &str = "token";

/// Key-value storage capability injected by the host.
///
/// Reads never fail: a value that cannot be read is reported as absent so
/// that callers without durable storage keep working unauthenticated.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Durable store: one file per key under a base directory.
pub struct FileStore {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(base_dir: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(base_dir).to_string();
        Ok(Self {
            base_dir: PathBuf::from(expanded),
            write_lock: Mutex::new(()),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            bail!("Invalid storage key: {key:?}");
        }
        Ok(self.base_dir.join(key))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key).ok()?;
        match fs::read_to_string(&path).await {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read stored value");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.base_dir)
            .await
            .context("Failed to create storage directory")?;

        // Readers only ever observe a complete value.
        let staging = self.base_dir.join(format!(".{key}.tmp"));
        let _guard = self.write_lock.lock().await;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options
            .open(&staging)
            .await
            .context("Failed to open stored value for writing")?;
        file.write_all(value.as_bytes())
            .await
            .context("Failed to write stored value")?;
        file.sync_all().await.context("Failed to flush stored value")?;
        drop(file);

        // A stale staging file keeps its old mode on truncate.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&staging, std::fs::Permissions::from_mode(0o600))
                .await
                .context("Failed to restrict stored value permissions")?;
        }

        fs::rename(&staging, &path)
            .await
            .context("Failed to commit stored value")?;
        Ok(())
    }
}

/// Store used where no durable storage exists. Reads as empty, drops writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStore;

#[async_trait]
impl KeyValueStore for NoopStore {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
        tracing::debug!(key, "No durable storage, value discarded");
        Ok(())
    }
}

/// Read the stored credential. Empty values count as absent.
pub async fn load_credential(store: &dyn KeyValueStore) -> Option<String> {
    store
        .get(CREDENTIAL_KEY)
        .await
        .filter(|token| !token.is_empty())
}

/// Persist a credential returned by a successful sign-in.
pub async fn save_credential(store: &dyn KeyValueStore, token: &str) -> Result<()> {
    store.set(CREDENTIAL_KEY, token).await
}
