//! declarative manifest loading and sequential application

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::Context;
use crate::error::IoResultExt;
use crate::fs::{materialize_file, purge_on_overwrite, write_link};
use crate::types::{FileEntry, LinkEntry};
use crate::Result;

/// the set of declared entries to materialize in one pass
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkEntry>,
}

impl Manifest {
    /// load a manifest from a toml file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_path(path)?;
        let manifest: Manifest = toml::from_str(&content)?;
        Ok(manifest)
    }
}

/// apply every entry in declaration order, files then links
///
/// each entry gets its overwrite purge before creation; the first failure
/// aborts the pass. there are no retries and no partial-success result:
/// the caller decides what a half-applied manifest means.
pub fn apply(ctx: &Context<'_>, manifest: &Manifest) -> Result<()> {
    for file in &manifest.files {
        debug!(path = %file.node.path.display(), "materializing file");
        purge_on_overwrite(ctx, &file.node)?;
        materialize_file(ctx, file)?;
    }

    for link in &manifest.links {
        debug!(path = %link.node.path.display(), "materializing link");
        purge_on_overwrite(ctx, &link.node)?;
        write_link(ctx, link)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::LocalFetcher;
    use crate::owner::SystemLookup;
    use sha2::{Digest, Sha256};
    use std::fs;
    use std::os::unix::fs::MetadataExt;
    use tempfile::tempdir;

    fn ctx_at(root: &Path) -> Context<'_> {
        static FETCHER: LocalFetcher = LocalFetcher;
        static LOOKUP: SystemLookup = SystemLookup;
        Context::new(root, &FETCHER, &LOOKUP)
    }

    #[test]
    fn test_apply_end_to_end() {
        let dir = tempdir().unwrap();
        let ctx = ctx_at(dir.path());

        let digest = hex::encode(Sha256::digest(b"A=1\n"));
        let uid = nix::unistd::getuid().as_raw();
        let gid = nix::unistd::getgid().as_raw();
        let toml_str = format!(
            r#"
[[files]]
path = "/etc/app.conf"
mode = 0o644

[files.contents]
source = "data:,A%3D1%0A"
verification = "sha256-{digest}"

[[links]]
path = "/etc/app.link"
target = "/etc/app.conf"
hard = true

[links.user]
id = {uid}

[links.group]
id = {gid}
"#
        );
        let manifest: Manifest = toml::from_str(&toml_str).unwrap();
        apply(&ctx, &manifest).unwrap();

        let conf = dir.path().join("etc/app.conf");
        assert_eq!(fs::read(&conf).unwrap(), b"A=1\n");
        assert_eq!(fs::metadata(&conf).unwrap().mode() & 0o7777, 0o644);

        let link = dir.path().join("etc/app.link");
        assert_eq!(
            fs::metadata(&link).unwrap().ino(),
            fs::metadata(&conf).unwrap().ino()
        );
    }

    #[test]
    fn test_apply_overwrite_replaces_directory_with_file() {
        let dir = tempdir().unwrap();
        let ctx = ctx_at(dir.path());

        // an existing directory at the declared file path
        fs::create_dir_all(dir.path().join("etc/app.conf/stale")).unwrap();

        let manifest: Manifest = toml::from_str(
            r#"
[[files]]
path = "/etc/app.conf"
overwrite = true

[files.contents]
source = "data:,fresh"
"#,
        )
        .unwrap();
        apply(&ctx, &manifest).unwrap();

        let conf = dir.path().join("etc/app.conf");
        assert!(conf.is_file());
        assert_eq!(fs::read(&conf).unwrap(), b"fresh");
    }

    #[test]
    fn test_apply_aborts_on_first_failure() {
        let dir = tempdir().unwrap();
        let ctx = ctx_at(dir.path());

        let manifest: Manifest = toml::from_str(
            r#"
[[files]]
path = "/first"

[files.contents]
source = "gopher://nope"

[[files]]
path = "/second"

[files.contents]
source = "data:,ok"
"#,
        )
        .unwrap();

        assert!(apply(&ctx, &manifest).is_err());
        assert!(!dir.path().join("second").exists());
    }

    #[test]
    fn test_load_manifest_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.toml");
        fs::write(
            &path,
            r#"
[[files]]
path = "/etc/empty"
"#,
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.files.len(), 1);
        assert!(manifest.links.is_empty());
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.toml");
        fs::write(&path, "not [ valid").unwrap();
        assert!(Manifest::load(&path).is_err());
    }
}
