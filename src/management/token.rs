use std::path::{Path, PathBuf};

use crate::{SpotifyError, config, types::TokenState};

pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenStore { path: path.into() }
    }

    pub fn default_location() -> Self {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<TokenState, SpotifyError> {
        let content = async_fs::read_to_string(&self.path).await?;
        let token: TokenState = serde_json::from_str(&content)?;
        Ok(token)
    }

    pub async fn persist(&self, token: &TokenState) -> Result<(), SpotifyError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(token)?;
        #[cfg(unix)]
        self.restrict_permissions().await?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Creates the token file readable by its owner only, and tightens an
    /// existing one, before any secret is written into it.
    #[cfg(unix)]
    async fn restrict_permissions(&self) -> Result<(), SpotifyError> {
        use std::os::unix::fs::PermissionsExt;

        use async_fs::unix::OpenOptionsExt;

        async_fs::OpenOptions::new()
            .write(true)
            .create(true)
            .mode(0o600)
            .open(&self.path)
            .await?;
        async_fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).await?;
        Ok(())
    }

    /// Removes the stored token. Succeeds if there was none.
    pub async fn clear(&self) -> Result<(), SpotifyError> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn default_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }
}
