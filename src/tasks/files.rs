use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::LibraryError;

/// The folder uploaded images live in.
#[derive(Debug, Clone)]
pub struct ImageLibrary {
    root: PathBuf,
    protected: String,
}

impl ImageLibrary {
    /// `protected` names the sentinel image, which can never be deleted.
    pub fn new(root: impl Into<PathBuf>, protected: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            protected: protected.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_exists(&self) -> Result<(), LibraryError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// File names directly inside the folder, sorted.
    pub async fn list(&self) -> Result<Vec<String>, LibraryError> {
        let root = self.root.clone();
        let names = tokio::task::spawn_blocking(move || -> std::io::Result<Vec<String>> {
            let mut names = Vec::new();
            for entry in WalkDir::new(&root).min_depth(1).max_depth(1) {
                let entry = entry.map_err(std::io::Error::from)?;
                if entry.file_type().is_file() {
                    names.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
            names.sort();
            Ok(names)
        })
        .await
        .map_err(std::io::Error::other)??;
        Ok(names)
    }

    pub async fn save(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, LibraryError> {
        let path = self.resolve(name)?;
        tokio::fs::write(&path, bytes).await?;
        info!(path = %path.display(), len = bytes.len(), "image saved");
        Ok(path)
    }

    pub async fn delete(&self, name: &str) -> Result<(), LibraryError> {
        if name == self.protected {
            return Err(LibraryError::Protected(name.to_string()));
        }
        let path = self.resolve(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "image deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "delete: no such image");
                Err(LibraryError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, LibraryError> {
        if !is_plain_file_name(name) {
            return Err(LibraryError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

/// A single normal path component: no separators, `..`, or roots.
pub fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}
