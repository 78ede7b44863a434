//! Saved sign-in for the Firebase gate: uid, email and the current refresh token.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct StoredSession {
    pub uid: String,
    pub email: String,
    pub refresh_token: String,
}

pub(super) struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub(super) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file means nobody was signed in.
    pub(super) async fn load(&self) -> Result<Option<StoredSession>, AuthError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub(super) async fn save(&self, session: &StoredSession) -> Result<(), AuthError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(session)?).await?;
        restrict_to_owner(&self.path).await?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    pub(super) async fn clear(&self) -> Result<(), AuthError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "session removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(unix)]
async fn restrict_to_owner(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_to_owner(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> SessionFile {
        let dir = std::env::temp_dir().join(format!("reflect-unit-{}-{name}", std::process::id()));
        SessionFile::new(dir.join("session.json"))
    }

    fn stored() -> StoredSession {
        StoredSession {
            uid: "u1".to_string(),
            email: "me@example.com".to_string(),
            refresh_token: "r1".to_string(),
        }
    }

    #[tokio::test]
    async fn save_creates_the_directory_and_load_reads_it_back() {
        let file = temp_file("save-load");
        file.save(&stored()).await.unwrap();
        assert_eq!(file.load().await.unwrap(), Some(stored()));

        file.clear().await.unwrap();
        assert_eq!(file.load().await.unwrap(), None);
        file.clear().await.unwrap();
    }

    #[tokio::test]
    async fn garbage_is_a_decode_error() {
        let file = temp_file("garbage");
        tokio::fs::create_dir_all(file.path().parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(file.path(), b"not json").await.unwrap();

        let err = file.load().await.unwrap_err();
        assert!(matches!(err, AuthError::SessionDecode(_)));
        file.clear().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let file = temp_file("private");
        file.save(&stored()).await.unwrap();
        let mode = tokio::fs::metadata(file.path())
            .await
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
        file.clear().await.unwrap();
    }
}
