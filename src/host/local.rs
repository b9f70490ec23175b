//! Local host: serves the catalog from the file system and opens folders
//! with the platform file browser.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use walkdir::{DirEntry, WalkDir};

use super::protocol::{CatalogResponse, HostCommand};
use crate::error::{HostError, ProviderError};
use crate::state::data::RawImageRecord;

#[derive(Debug, Clone)]
pub struct LocalHost {
    root: PathBuf,
    /// Lowercase extensions that count as images
    extensions: Vec<String>,
    timeout: Duration,
}

impl LocalHost {
    /// A relative root is resolved against the working directory, so the
    /// reported project root matches absolute focus paths from the host.
    pub fn new(root: PathBuf, extensions: Vec<String>, timeout: Duration) -> Self {
        let root = match std::env::current_dir() {
            Ok(cwd) => absolute_root(&root, &cwd),
            Err(e) => {
                log::warn!("⚠️  No working directory to resolve {}: {e}", root.display());
                root
            }
        };
        let extensions = extensions.into_iter().map(|e| e.to_lowercase()).collect();
        Self {
            root,
            extensions,
            timeout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `GetAllImages`: scan the project root for images.
    ///
    /// Runs in a blocking task and is bounded by the configured timeout.
    pub async fn get_all_images(self) -> Result<CatalogResponse, ProviderError> {
        let timeout = self.timeout;
        log::info!("🔍 Scanning {} for images", self.root.display());

        // Walk the file system off the async executor
        let scan = tokio::task::spawn_blocking(move || scan_catalog(&self.root, &self.extensions));

        // Give up once the timeout elapses; the blocking task is left to finish
        match tokio::time::timeout(timeout, scan).await {
            Err(_) => Err(ProviderError::Timeout(timeout)),
            Ok(Err(join)) => Err(ProviderError::Join(join.to_string())),
            Ok(Ok(result)) => result,
        }
    }

    /// Fire-and-forget command to the host. `GetAllImages` goes through
    /// [`LocalHost::get_all_images`] instead.
    pub fn send(&self, command: &HostCommand) -> Result<(), HostError> {
        if let Ok(json) = command.to_json() {
            log::info!("→ host: {json}");
        }
        match command {
            HostCommand::GetAllImages => Ok(()),
            HostCommand::OpenContainingFolder { path } => {
                let folder = self.resolve(path);
                open_in_file_browser(&folder).map_err(|source| HostError::OpenFolder {
                    path: folder.display().to_string(),
                    source,
                })
            }
        }
    }

    /// Catalog directory ("/src/") to an absolute path under the root
    pub fn resolve(&self, catalog_path: &str) -> PathBuf {
        let relative = catalog_path.trim_matches('/');
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }
}

/// `root` joined onto `cwd` when relative, with `.` segments dropped
fn absolute_root(root: &Path, cwd: &Path) -> PathBuf {
    let joined = if root.is_absolute() {
        root.to_path_buf()
    } else {
        cwd.join(root)
    };
    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn scan_catalog(root: &Path, extensions: &[String]) -> Result<CatalogResponse, ProviderError> {
    // Check the root up front; a missing root is its own error
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(ProviderError::MissingRoot(root.display().to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ProviderError::MissingRoot(root.display().to_string()))
        }
        Err(e) => return Err(ProviderError::Io(e)),
    }

    let mut images = Vec::new();
    let mut skipped = 0usize;

    // Walk the tree in name order, never descending into hidden entries
    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            // The root itself must be readable
            Err(e) if e.depth() == 0 => return Err(ProviderError::Io(e.into())),
            Err(e) => {
                log::warn!("⚠️  Skipping unreadable entry: {e}");
                skipped += 1;
                continue;
            }
        };

        // Only image files count
        if !entry.file_type().is_file() || !has_image_extension(entry.path(), extensions) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };

        // Catalog paths are root-relative with a leading slash
        let path = format!("/{}", to_slash(relative));
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        images.push(RawImageRecord {
            path,
            size,
            host_display_path: entry.path().display().to_string(),
        });
    }

    if skipped > 0 {
        log::warn!("⚠️  Scan skipped {skipped} unreadable entries");
    }
    log::info!("✅ Scan complete: {} images", images.len());

    Ok(CatalogResponse {
        images,
        project_root: to_slash(root),
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .map(|e| extensions.iter().any(|x| *x == e))
        .unwrap_or(false)
}

/// Forward-slash form of a path, whatever the platform
fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn open_in_file_browser(folder: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let program = "open";
    #[cfg(target_os = "windows")]
    let program = "explorer";
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let program = "xdg-open";

    Command::new(program).arg(folder).spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;
    use crate::state::PanelState;
    use std::fs;

    fn host(root: &Path) -> LocalHost {
        LocalHost::new(
            root.to_path_buf(),
            vec!["png".into(), "JPG".into()],
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_scan_collects_images_with_catalog_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/icons")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("src/icons/a.png"), b"1234").unwrap();
        fs::write(dir.path().join("src/photo.JPG"), b"1").unwrap();
        fs::write(dir.path().join("src/notes.txt"), b"1").unwrap();
        fs::write(dir.path().join(".git/hidden.png"), b"1").unwrap();
        fs::write(dir.path().join("top.png"), b"1").unwrap();

        let response = host(dir.path()).get_all_images().await.unwrap();
        let mut paths: Vec<_> = response.images.iter().map(|i| i.path.as_str()).collect();
        paths.sort();
        assert_eq!(paths, ["/src/icons/a.png", "/src/photo.JPG", "/top.png"]);

        let icon = response.images.iter().find(|i| i.path.ends_with("a.png")).unwrap();
        assert_eq!(icon.size, 4);
        assert_eq!(response.project_root, to_slash(dir.path()));
    }

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let result = host(&missing).get_all_images().await;
        assert!(matches!(result, Err(ProviderError::MissingRoot(_))));
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let cwd = Path::new("/work");
        assert_eq!(absolute_root(Path::new("proj"), cwd), PathBuf::from("/work/proj"));
        assert_eq!(absolute_root(Path::new("./proj/"), cwd), PathBuf::from("/work/proj"));
        assert_eq!(absolute_root(Path::new("/abs/proj"), cwd), PathBuf::from("/abs/proj"));

        let host = host(Path::new("proj"));
        assert!(host.root().is_absolute());
        assert!(host.root().ends_with("proj"));
    }

    #[tokio::test]
    async fn test_relative_root_scopes_absolute_focus() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("proj/a")).unwrap();
        fs::write(dir.path().join("proj/a/x.png"), b"1").unwrap();
        fs::write(dir.path().join("proj/y.png"), b"1").unwrap();

        let root = absolute_root(Path::new("proj"), dir.path());
        let response = host(&root).get_all_images().await.unwrap();
        assert_eq!(response.project_root, to_slash(&dir.path().join("proj")));

        let focus = format!("{}/a/x.png", response.project_root);
        let mut panel = PanelState::new(PanelConfig::default(), Some(focus.clone()));
        panel.apply_catalog(response.images, &response.project_root);
        assert_eq!(panel.scope(), "/a/");
        assert_eq!(panel.take_auto_preview(), Some(focus));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_root_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        // A symlink loop cannot be resolved
        std::os::unix::fs::symlink(&b, &a).unwrap();
        std::os::unix::fs::symlink(&a, &b).unwrap();

        let result = host(&a).get_all_images().await;
        assert!(matches!(result, Err(ProviderError::Io(_))));
    }

    #[test]
    fn test_resolve_catalog_directory() {
        let host = host(Path::new("/work/project"));
        assert_eq!(host.resolve("/src/icons/"), PathBuf::from("/work/project/src/icons"));
        assert_eq!(host.resolve("/"), PathBuf::from("/work/project"));
        assert_eq!(host.resolve(""), PathBuf::from("/work/project"));
    }

    #[test]
    fn test_get_all_images_command_is_not_sent_directly() {
        let host = host(Path::new("/work/project"));
        assert!(host.send(&HostCommand::GetAllImages).is_ok());
    }
}
