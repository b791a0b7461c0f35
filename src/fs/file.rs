//! content materialization: stage, verify, install

use std::fs::{self, OpenOptions, Permissions};
use std::io::{self, Seek};
use std::os::unix::fs::{MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;

use nix::unistd::{chown, Gid, Uid};
use tempfile::NamedTempFile;
use tracing::{debug, error};

use crate::context::Context;
use crate::error::IoResultExt;
use crate::fetch::FetchOptions;
use crate::fs::paths::{mkdir_for_file, path_exists};
use crate::fs::DEFAULT_FILE_MODE;
use crate::owner::resolve_node_ids;
use crate::plan::{build_fetch_plan, FetchOp};
use crate::types::FileEntry;
use crate::{Error, Result};

/// execute one fetch operation against the filesystem
///
/// the content is staged into a temporary file created in the destination's
/// own directory; same-directory placement keeps the staging file on the
/// destination's filesystem, which is what makes the final rename atomic.
/// the staging file is removed on every exit path (it drops with the guard),
/// so a failed fetch leaves the destination exactly as it was.
pub fn perform_fetch(ctx: &Context<'_>, op: &FetchOp<'_>) -> Result<()> {
    let request = op.request();
    let dest = ctx.join(&request.node.path);
    mkdir_for_file(&dest)?;

    let dir = dest.parent().unwrap_or(Path::new("/"));
    let mut tmp = NamedTempFile::new_in(dir).with_path(dir)?;
    let tmp_path = tmp.path().to_path_buf();

    // temp files are created 0600; installed content gets the default bits
    tmp.as_file()
        .set_permissions(Permissions::from_mode(DEFAULT_FILE_MODE))
        .with_path(&tmp_path)?;

    let options = FetchOptions {
        verify: request.verify.as_ref(),
        compression: request.compression.as_deref(),
    };
    if let Err(e) = ctx.fetcher.fetch(&request.url, tmp.as_file_mut(), &options) {
        error!(url = %request.url, path = %dest.display(), "fetch failed: {e}");
        return Err(e);
    }

    match op {
        FetchOp::Replace(_) => {
            // rename within one directory: the destination is observed either
            // complete or in its prior state, never partial
            tmp.persist(&dest).map_err(|e| Error::Io {
                path: dest.clone(),
                source: e.error,
            })?;
        }
        FetchOp::Append(_) => {
            match fs::symlink_metadata(&dest) {
                Ok(meta) if !meta.is_file() => return Err(Error::AppendTypeConflict(dest)),
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(Error::Io { path: dest, source: e }),
            }

            let mut target = OpenOptions::new()
                .append(true)
                .create(true)
                .mode(DEFAULT_FILE_MODE)
                .open(&dest)
                .with_path(&dest)?;

            let staged = tmp.as_file_mut();
            staged.rewind().with_path(&tmp_path)?;
            io::copy(staged, &mut target).with_path(&dest)?;
            // the staging file itself is never installed in append mode;
            // it is removed when the guard drops
        }
    }

    Ok(())
}

/// apply declared mode and ownership to an installed file
///
/// the ownership default is the file's current owner, read immediately
/// before resolution: a node that names no owner keeps whatever owner the
/// install produced.
pub fn apply_file_metadata(ctx: &Context<'_>, file: &FileEntry) -> Result<()> {
    let dest = ctx.join(&file.node.path);

    if let Some(mode) = file.mode {
        fs::set_permissions(&dest, Permissions::from_mode(mode & 0o7777)).with_path(&dest)?;
    }

    let meta = fs::metadata(&dest).with_path(&dest)?;
    let (uid, gid) = resolve_node_ids(&file.node, ctx.lookup, meta.uid(), meta.gid())?;
    if uid != meta.uid() || gid != meta.gid() {
        chown(&dest, Some(Uid::from_raw(uid)), Some(Gid::from_raw(gid))).map_err(|e| {
            Error::Io {
                path: dest.clone(),
                source: io::Error::from_raw_os_error(e as i32),
            }
        })?;
    }

    Ok(())
}

/// materialize one declared file end to end: run its fetch plan, then apply
/// declared mode and ownership
///
/// a file with no content sources and no existing destination still
/// materializes, as an empty file with the default bits.
pub fn materialize_file(ctx: &Context<'_>, file: &FileEntry) -> Result<()> {
    let ops = build_fetch_plan(file)?;

    if ops.is_empty() && !path_exists(ctx, &file.node.path)? {
        let dest = ctx.join(&file.node.path);
        mkdir_for_file(&dest)?;
        OpenOptions::new()
            .write(true)
            .create(true)
            .mode(DEFAULT_FILE_MODE)
            .open(&dest)
            .with_path(&dest)?;
    }

    for op in &ops {
        debug!(path = %file.node.path.display(), url = %op.request().url, "installing content");
        perform_fetch(ctx, op)?;
    }

    apply_file_metadata(ctx, file)
}
