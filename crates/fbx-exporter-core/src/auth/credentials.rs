use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::AppIdentity;

/// Application registration, persisted once the router hands out a token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationCredential {
    pub app_id: String,
    pub app_name: String,
    pub app_version: String,
    pub device_name: String,
    pub app_token: String,
    pub track_id: i64,
}

impl ApplicationCredential {
    pub fn new(identity: AppIdentity, app_token: String, track_id: i64) -> Self {
        Self {
            app_id: identity.app_id,
            app_name: identity.app_name,
            app_version: identity.app_version,
            device_name: identity.device_name,
            app_token,
            track_id,
        }
    }
}

impl std::fmt::Debug for ApplicationCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationCredential")
            .field("app_id", &self.app_id)
            .field("app_name", &self.app_name)
            .field("app_version", &self.app_version)
            .field("device_name", &self.device_name)
            .field("app_token", &"<redacted>")
            .field("track_id", &self.track_id)
            .finish()
    }
}

/// JSON file holding the application credential.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the credential, `None` if it was never saved
    pub fn load(&self) -> Result<Option<ApplicationCredential>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token file {}", self.path.display()))?;
        let credential = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse token file {}", self.path.display()))?;
        Ok(Some(credential))
    }

    /// Save the credential, readable by the owner only
    pub fn save(&self, credential: &ApplicationCredential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(credential)?;

        let mut file = open_private(&self.path)
            .with_context(|| format!("Failed to create token file {}", self.path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write token file {}", self.path.display()))?;
        Ok(())
    }

    /// Remove the token file, if any
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove token file {}", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
