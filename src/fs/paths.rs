//! path helpers shared by the materializers

use std::fs;
use std::io;
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

use crate::context::Context;
use crate::error::IoResultExt;
use crate::fs::DEFAULT_DIR_MODE;
use crate::types::Node;
use crate::{Error, Result};

/// create every directory needed to contain `path`, idempotently
pub fn mkdir_for_file(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    fs::DirBuilder::new()
        .recursive(true)
        .mode(DEFAULT_DIR_MODE)
        .create(parent)
        .with_path(parent)
}

/// true if a declared path exists under the destination root
///
/// uses a non-following stat; only "does not exist" is non-fatal.
pub fn path_exists(ctx: &Context<'_>, path: &Path) -> Result<bool> {
    let resolved = ctx.join(path);
    match fs::symlink_metadata(&resolved) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Io {
            path: resolved,
            source: e,
        }),
    }
}

/// remove whatever sits at the node's path when its overwrite flag is set
///
/// removal is unconditional on type: directories go recursively, files and
/// links directly. a clear flag or an absent path is a no-op.
pub fn purge_on_overwrite(ctx: &Context<'_>, node: &Node) -> Result<()> {
    if !node.overwrite {
        return Ok(());
    }

    let resolved = ctx.join(&node.path);
    let meta = match fs::symlink_metadata(&resolved) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(Error::Io {
                path: resolved,
                source: e,
            })
        }
    };

    if meta.is_dir() {
        fs::remove_dir_all(&resolved).with_path(&resolved)
    } else {
        fs::remove_file(&resolved).with_path(&resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::LocalFetcher;
    use crate::owner::SystemLookup;
    use std::os::unix::fs::MetadataExt;
    use tempfile::tempdir;

    fn ctx_at(root: &Path) -> Context<'_> {
        static FETCHER: LocalFetcher = LocalFetcher;
        static LOOKUP: SystemLookup = SystemLookup;
        Context::new(root, &FETCHER, &LOOKUP)
    }

    #[test]
    fn test_mkdir_for_file_creates_chain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/c/file.txt");

        mkdir_for_file(&path).unwrap();

        let parent = dir.path().join("a/b/c");
        assert!(parent.is_dir());
        let meta = fs::metadata(&parent).unwrap();
        assert_eq!(meta.mode() & 0o777, 0o755);
    }

    #[test]
    fn test_mkdir_for_file_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/file.txt");
        mkdir_for_file(&path).unwrap();
        mkdir_for_file(&path).unwrap();
        assert!(dir.path().join("a").is_dir());
    }

    #[test]
    fn test_path_exists() {
        let dir = tempdir().unwrap();
        let ctx = ctx_at(dir.path());

        assert!(!path_exists(&ctx, Path::new("/missing")).unwrap());

        fs::write(dir.path().join("present"), "x").unwrap();
        assert!(path_exists(&ctx, Path::new("/present")).unwrap());
    }

    #[test]
    fn test_path_exists_sees_dangling_symlink() {
        let dir = tempdir().unwrap();
        let ctx = ctx_at(dir.path());

        std::os::unix::fs::symlink("/nowhere", dir.path().join("dangling")).unwrap();
        // lstat reports the link itself, not its missing target
        assert!(path_exists(&ctx, Path::new("/dangling")).unwrap());
    }

    #[test]
    fn test_purge_removes_directory_tree() {
        let dir = tempdir().unwrap();
        let ctx = ctx_at(dir.path());

        fs::create_dir_all(dir.path().join("victim/nested")).unwrap();
        fs::write(dir.path().join("victim/nested/file"), "x").unwrap();

        let mut node = Node::new("/victim");
        node.overwrite = true;
        purge_on_overwrite(&ctx, &node).unwrap();

        assert!(!dir.path().join("victim").exists());
    }

    #[test]
    fn test_purge_removes_file_and_symlink() {
        let dir = tempdir().unwrap();
        let ctx = ctx_at(dir.path());

        fs::write(dir.path().join("plain"), "x").unwrap();
        std::os::unix::fs::symlink("/nowhere", dir.path().join("sym")).unwrap();

        for name in ["/plain", "/sym"] {
            let mut node = Node::new(name);
            node.overwrite = true;
            purge_on_overwrite(&ctx, &node).unwrap();
        }

        assert!(!dir.path().join("plain").exists());
        assert!(fs::symlink_metadata(dir.path().join("sym")).is_err());
    }

    #[test]
    fn test_purge_noop_without_flag() {
        let dir = tempdir().unwrap();
        let ctx = ctx_at(dir.path());

        fs::write(dir.path().join("keep"), "x").unwrap();
        let node = Node::new("/keep");
        purge_on_overwrite(&ctx, &node).unwrap();
        assert!(dir.path().join("keep").exists());
    }

    #[test]
    fn test_purge_noop_when_absent() {
        let dir = tempdir().unwrap();
        let ctx = ctx_at(dir.path());

        let mut node = Node::new("/missing");
        node.overwrite = true;
        purge_on_overwrite(&ctx, &node).unwrap();
    }
}
