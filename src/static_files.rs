//! Serves files from a fixed set of roots under a base directory.
//!
//! Request paths are normalised lexically and must stay inside their root.
//! Symlinks inside a root are followed as-is; only the lexical prefix is
//! checked.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StaticFileError {
    #[error("path '{0}' escapes its root")]
    Escapes(String),
    #[error("no file at {0}")]
    Missing(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The whitelisted roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticMount {
    /// The base directory itself; only `index.html` is routed here.
    Site,
    Doc,
    Js,
    Sdk,
}

impl StaticMount {
    #[must_use]
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Site => "",
            Self::Doc => "doc",
            Self::Js => "js",
            Self::Sdk => "sdk",
        }
    }
}

/// A file ready to be written to the response.
#[derive(Debug)]
pub struct StaticFile {
    pub path: PathBuf,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Resolve `.` and `..` without touching the filesystem. Returns `None` for
/// absolute paths or when `..` climbs above the start.
#[must_use]
pub fn normalize(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(normalized)
}

#[derive(Debug, Clone)]
pub struct StaticFiles {
    base_dir: PathBuf,
}

impl StaticFiles {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Map a request path under `mount` to a location on disk.
    pub fn resolve(&self, mount: StaticMount, requested: &str) -> Result<PathBuf, StaticFileError> {
        let relative = Path::new(mount.dir()).join(requested);
        let normalized = normalize(&relative)
            .filter(|path| path.starts_with(mount.dir()) && path.as_os_str() != mount.dir())
            .ok_or_else(|| StaticFileError::Escapes(requested.to_string()))?;
        Ok(self.base_dir.join(normalized))
    }

    /// Resolve and read a file, guessing its content type from the extension.
    pub async fn load(
        &self,
        mount: StaticMount,
        requested: &str,
    ) -> Result<StaticFile, StaticFileError> {
        let path = self.resolve(mount, requested)?;

        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(StaticFileError::Missing(path));
        }

        let body = tokio::fs::read(&path)
            .await
            .map_err(|source| StaticFileError::Read {
                path: path.clone(),
                source,
            })?;
        let content_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(StaticFile {
            path,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn site() -> (tempfile::TempDir, StaticFiles) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("doc/api")).unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        std::fs::write(dir.path().join("doc/index.html"), "<h1>docs</h1>").unwrap();
        std::fs::write(dir.path().join("doc/api/style.css"), "body{}").unwrap();
        std::fs::write(dir.path().join("secret.json"), "{}").unwrap();
        let files = StaticFiles::new(dir.path());
        (dir, files)
    }

    #[test]
    fn normalize_handles_dots() {
        assert_eq!(
            normalize(Path::new("doc/./a/../b.html")),
            Some(PathBuf::from("doc/b.html"))
        );
        assert_eq!(normalize(Path::new("doc/../../etc/passwd")), None);
        assert_eq!(normalize(Path::new("/etc/passwd")), None);
    }

    #[test]
    fn escaping_paths_are_rejected() {
        let files = StaticFiles::new("/srv/www");
        for requested in ["../secret.json", "../../etc/passwd", "a/../../x", "/etc/passwd", ".."] {
            assert!(
                matches!(
                    files.resolve(StaticMount::Doc, requested),
                    Err(StaticFileError::Escapes(_))
                ),
                "{requested} should be rejected"
            );
        }
    }

    #[test]
    fn sibling_prefix_is_not_inside_root() {
        let files = StaticFiles::new("/srv/www");
        assert!(files.resolve(StaticMount::Doc, "../docs/index.html").is_err());
    }

    #[test]
    fn paths_inside_root_resolve_under_base() {
        let files = StaticFiles::new("/srv/www");
        assert_eq!(
            files.resolve(StaticMount::Js, "lib/../app.js").unwrap(),
            PathBuf::from("/srv/www/js/app.js")
        );
        assert_eq!(
            files.resolve(StaticMount::Site, "index.html").unwrap(),
            PathBuf::from("/srv/www/index.html")
        );
    }

    #[tokio::test]
    async fn load_reads_file_with_guessed_type() {
        let (_dir, files) = site();
        let file = files.load(StaticMount::Doc, "api/style.css").await.unwrap();
        assert_eq!(file.body, b"body{}");
        assert_eq!(file.content_type, "text/css");

        let index = files.load(StaticMount::Site, "index.html").await.unwrap();
        assert_eq!(index.content_type, "text/html");
    }

    #[tokio::test]
    async fn directories_and_missing_files_are_missing() {
        let (_dir, files) = site();
        assert!(matches!(
            files.load(StaticMount::Doc, "api").await,
            Err(StaticFileError::Missing(_))
        ));
        assert!(matches!(
            files.load(StaticMount::Doc, "nope.html").await,
            Err(StaticFileError::Missing(_))
        ));
    }

    proptest! {
        #[test]
        fn resolved_paths_never_leave_the_root(
            segments in prop::collection::vec(
                prop_oneof![Just("..".to_string()), Just(".".to_string()), "[a-z]{1,6}"],
                0..8,
            )
        ) {
            let requested = segments.join("/");
            let files = StaticFiles::new("/srv/www");
            if let Ok(path) = files.resolve(StaticMount::Doc, &requested) {
                prop_assert!(path.starts_with("/srv/www/doc"));
            }
        }
    }
}
