use std::path::{Component, Path, PathBuf};

use crate::fetch::Fetcher;
use crate::owner::IdLookup;

/// immutable per-run dependencies handed to every materialization call
///
/// there is deliberately no mutable state here: the destination root, the
/// byte transport, and the name lookup are fixed for the duration of one
/// provisioning pass.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    /// destination root all declared paths resolve under
    pub root: &'a Path,
    /// byte transport for content sources
    pub fetcher: &'a dyn Fetcher,
    /// user/group name resolution
    pub lookup: &'a dyn IdLookup,
}

impl<'a> Context<'a> {
    pub fn new(root: &'a Path, fetcher: &'a dyn Fetcher, lookup: &'a dyn IdLookup) -> Self {
        Self {
            root,
            fetcher,
            lookup,
        }
    }

    /// resolve a declared absolute path beneath the destination root
    ///
    /// `.` and `..` components are normalized lexically; `..` never climbs
    /// above the root, so a declared path cannot escape it.
    pub fn join(&self, path: &Path) -> PathBuf {
        let mut resolved = self.root.to_path_buf();
        let mut depth = 0usize;
        for component in path.components() {
            match component {
                Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
                Component::ParentDir => {
                    if depth > 0 {
                        resolved.pop();
                        depth -= 1;
                    }
                }
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::LocalFetcher;
    use crate::owner::SystemLookup;

    fn ctx_at(root: &Path) -> Context<'_> {
        static FETCHER: LocalFetcher = LocalFetcher;
        static LOOKUP: SystemLookup = SystemLookup;
        Context::new(root, &FETCHER, &LOOKUP)
    }

    #[test]
    fn test_join_absolute() {
        let root = Path::new("/dest");
        let ctx = ctx_at(root);
        assert_eq!(
            ctx.join(Path::new("/etc/app.conf")),
            PathBuf::from("/dest/etc/app.conf")
        );
    }

    #[test]
    fn test_join_relative() {
        let ctx = ctx_at(Path::new("/dest"));
        assert_eq!(ctx.join(Path::new("etc/motd")), PathBuf::from("/dest/etc/motd"));
    }

    #[test]
    fn test_join_normalizes_dots() {
        let ctx = ctx_at(Path::new("/dest"));
        assert_eq!(
            ctx.join(Path::new("/etc/./app/../app.conf")),
            PathBuf::from("/dest/etc/app.conf")
        );
    }

    #[test]
    fn test_join_cannot_escape_root() {
        let ctx = ctx_at(Path::new("/dest"));
        assert_eq!(
            ctx.join(Path::new("/../../etc/passwd")),
            PathBuf::from("/dest/etc/passwd")
        );
    }
}
