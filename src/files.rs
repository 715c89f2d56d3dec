// Filesystem primitive

use crate::error::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the user who invoked the tool, looking through `sudo`
pub fn invoking_user() -> String {
    std::env::var("SUDO_USER")
        .or_else(|_| std::env::var("USER"))
        .unwrap_or_else(|_| "root".to_string())
}

/// uid/gid of the user behind `sudo`, if there is one
fn invoking_ids() -> Option<(u32, u32)> {
    let uid = std::env::var("SUDO_UID").ok()?.parse().ok()?;
    let gid = std::env::var("SUDO_GID").ok()?.parse().ok()?;
    Some((uid, gid))
}

pub trait Filesystem: Send + Sync {
    fn get(&self, path: &Path) -> Result<String>;

    fn put(&self, path: &Path, contents: &str) -> Result<()>;

    /// Write a file and hand it to the invoking (non-root) user
    fn put_as_user(&self, path: &Path, contents: &str) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_link(&self, path: &Path) -> bool;

    /// Final target of a symlink, following every intermediate link
    /// (`/usr/bin/php -> /etc/alternatives/php -> /usr/bin/php7.0`)
    fn read_link(&self, path: &Path) -> Result<PathBuf>;

    fn ensure_dir_exists(&self, path: &Path, as_user: bool) -> Result<()>;

    fn touch_as_user(&self, path: &Path) -> Result<()>;

    fn unlink(&self, path: &Path) -> Result<()>;
}

/// Same limit as the kernel's `ELOOP`
const MAX_LINK_HOPS: usize = 40;

/// `Filesystem` operating on the real host
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    fn chown_to_user(&self, path: &Path) -> Result<()> {
        if let Some((uid, gid)) = invoking_ids() {
            std::os::unix::fs::chown(path, Some(uid), Some(gid))?;
        }

        Ok(())
    }
}

impl Filesystem for LocalFilesystem {
    fn get(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }

    fn put(&self, path: &Path, contents: &str) -> Result<()> {
        debug!(path = %path.display(), "Writing file");
        fs::write(path, contents)?;
        Ok(())
    }

    fn put_as_user(&self, path: &Path, contents: &str) -> Result<()> {
        self.put(path, contents)?;
        self.chown_to_user(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_link(&self, path: &Path) -> bool {
        path.symlink_metadata()
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false)
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        let mut current = path.to_path_buf();

        for _ in 0..MAX_LINK_HOPS {
            let target = fs::read_link(&current)?;
            // Relative targets are relative to the link's own directory
            let target = match current.parent() {
                Some(parent) if target.is_relative() => parent.join(target),
                _ => target,
            };

            if !self.is_link(&target) {
                return Ok(target);
            }
            current = target;
        }

        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("Too many levels of symbolic links: {}", path.display()),
        )
        .into())
    }

    fn ensure_dir_exists(&self, path: &Path, as_user: bool) -> Result<()> {
        if !path.is_dir() {
            debug!(path = %path.display(), "Creating directory");
            fs::create_dir_all(path)?;

            if as_user {
                self.chown_to_user(path)?;
            }
        }

        Ok(())
    }

    fn touch_as_user(&self, path: &Path) -> Result<()> {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        self.chown_to_user(path)
    }

    fn unlink(&self, path: &Path) -> Result<()> {
        if self.exists(path) || self.is_link(path) {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_put_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("www.conf");

        LocalFilesystem.put(&path, "user = nobody\n").unwrap();
        assert_eq!(LocalFilesystem.get(&path).unwrap(), "user = nobody\n");
    }

    #[test]
    fn test_get_missing_file_is_io_error() {
        let result = LocalFilesystem.get(Path::new("/nonexistent/www.conf"));
        assert!(matches!(result, Err(crate::error::ValetError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_detection_and_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("php7.0");
        let link = temp_dir.path().join("php");
        fs::write(&target, "#!/bin/sh").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(LocalFilesystem.is_link(&link));
        assert!(!LocalFilesystem.is_link(&target));
        assert!(!LocalFilesystem.is_link(&temp_dir.path().join("missing")));
        assert_eq!(LocalFilesystem.read_link(&link).unwrap(), target);
    }

    #[cfg(unix)]
    #[test]
    fn test_read_link_follows_alternatives_chain() {
        let temp_dir = TempDir::new().unwrap();
        let alternatives = temp_dir.path().join("etc/alternatives");
        let bin = temp_dir.path().join("usr/bin");
        fs::create_dir_all(&alternatives).unwrap();
        fs::create_dir_all(&bin).unwrap();

        let real = bin.join("php7.0");
        fs::write(&real, "#!/bin/sh").unwrap();
        std::os::unix::fs::symlink(&real, alternatives.join("php")).unwrap();
        std::os::unix::fs::symlink(alternatives.join("php"), bin.join("php")).unwrap();

        let resolved = LocalFilesystem.read_link(&bin.join("php")).unwrap();
        assert_eq!(resolved, real);
        assert_eq!(
            crate::version::LinkedPhp::from_link_target(
                &resolved.to_string_lossy(),
                crate::capability::DistroKind::Debian
            ),
            Some(crate::version::LinkedPhp::Latest)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_read_link_resolves_relative_targets() {
        let temp_dir = TempDir::new().unwrap();
        let bin = temp_dir.path().join("usr/bin");
        let alternatives = temp_dir.path().join("etc/alternatives");
        fs::create_dir_all(&bin).unwrap();
        fs::create_dir_all(&alternatives).unwrap();
        fs::write(bin.join("php5.6"), "#!/bin/sh").unwrap();

        // php -> ../../etc/alternatives/php -> ../../usr/bin/php5.6
        std::os::unix::fs::symlink("../../usr/bin/php5.6", alternatives.join("php")).unwrap();
        std::os::unix::fs::symlink("../../etc/alternatives/php", bin.join("php")).unwrap();

        let resolved = LocalFilesystem.read_link(&bin.join("php")).unwrap();
        assert!(resolved.ends_with("usr/bin/php5.6"));
        assert_eq!(
            fs::canonicalize(&resolved).unwrap(),
            fs::canonicalize(bin.join("php5.6")).unwrap()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_read_link_gives_up_on_cycles() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        std::os::unix::fs::symlink(&b, &a).unwrap();
        std::os::unix::fs::symlink(&a, &b).unwrap();

        assert!(matches!(
            LocalFilesystem.read_link(&a),
            Err(crate::error::ValetError::Io(_))
        ));
    }

    #[test]
    fn test_ensure_dir_exists_creates_nested_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("a/b/c");

        LocalFilesystem.ensure_dir_exists(&dir, false).unwrap();
        assert!(LocalFilesystem.is_dir(&dir));

        // Second call is a no-op
        LocalFilesystem.ensure_dir_exists(&dir, false).unwrap();
    }

    #[test]
    fn test_touch_keeps_existing_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".keep");

        LocalFilesystem.touch_as_user(&path).unwrap();
        assert!(LocalFilesystem.exists(&path));

        fs::write(&path, "data").unwrap();
        LocalFilesystem.touch_as_user(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "data");
    }

    #[test]
    fn test_unlink_missing_file_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("caddy.service");

        LocalFilesystem.unlink(&path).unwrap();

        fs::write(&path, "[Unit]").unwrap();
        LocalFilesystem.unlink(&path).unwrap();
        assert!(!path.exists());
    }
}
