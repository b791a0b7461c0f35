//! link materialization

use std::ffi::CString;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;

use nix::libc;

use crate::context::Context;
use crate::error::IoResultExt;
use crate::fs::paths::mkdir_for_file;
use crate::owner::resolve_node_ids;
use crate::types::LinkEntry;
use crate::{Error, Result};

/// create one declared link and apply its ownership
///
/// hard links resolve their target under the destination root and cannot
/// cross filesystems; symlinks point at the literal target string, which is
/// neither resolved nor required to exist. ownership defaults to (0, 0) and
/// is applied without following the link. links carry no mode bits.
pub fn write_link(ctx: &Context<'_>, link: &LinkEntry) -> Result<()> {
    let path = ctx.join(&link.node.path);
    mkdir_for_file(&path)?;

    if link.hard {
        let target = ctx.join(Path::new(&link.target));
        fs::hard_link(&target, &path).with_path(&path)?;
    } else {
        symlink(&link.target, &path).with_path(&path)?;
    }

    let (uid, gid) = resolve_node_ids(&link.node, ctx.lookup, 0, 0)?;
    lchown(&path, uid, gid)
}

/// change ownership without following a final symlink
///
/// skipped when the link already carries the resolved owner, so runs that
/// request no actual change need no privilege.
fn lchown(path: &Path, uid: u32, gid: u32) -> Result<()> {
    let meta = fs::symlink_metadata(path).with_path(path)?;
    {
        use std::os::unix::fs::MetadataExt;
        if meta.uid() == uid && meta.gid() == gid {
            return Ok(());
        }
    }

    let c_path = CString::new(path.as_os_str().as_encoded_bytes()).map_err(|_| Error::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid path"),
    })?;
    let ret = unsafe { libc::lchown(c_path.as_ptr(), uid, gid) };
    if ret != 0 {
        return Err(Error::Io {
            path: path.to_path_buf(),
            source: std::io::Error::last_os_error(),
        });
    }
    Ok(())
}
