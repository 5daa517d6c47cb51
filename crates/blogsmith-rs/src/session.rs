//! Signed-in identity persisted between CLI invocations.

use anyhow::Context;
use blogsmith_rs_protocol::UserIdentity;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session file contents. Only the identity is stored; there is no secret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub email: UserIdentity,
}

impl Session {
    pub fn new(email: UserIdentity) -> Self {
        Self { email }
    }

    /// Read the session at `path`, returning `None` when nobody is signed in.
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            debug!("no session file (path={})", path.display());
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session file {}", path.display()))?;
        let session = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse session file {}", path.display()))?;
        Ok(Some(session))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self).context("failed to encode session")?;
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write session file {}", path.display()))?;
        info!("session saved (user={}, path={})", self.email, path.display());
        Ok(())
    }

    /// Remove the session file. Returns whether one existed.
    pub fn clear(path: &Path) -> anyhow::Result<bool> {
        match std::fs::remove_file(path) {
            Ok(()) => {
                info!("session cleared (path={})", path.display());
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err)
                .with_context(|| format!("failed to remove session file {}", path.display())),
        }
    }
}
