//! symbolic ownership resolution
//!
//! a node declares its owner per axis as a numeric id, a name, or nothing.
//! resolution is pure with respect to the filesystem; only the name lookup
//! touches the system user database.

use nix::unistd::{Group, User};

use crate::types::Node;
use crate::{Error, Result};

/// name -> id resolution for users and groups
pub trait IdLookup {
    /// returns None when the name does not exist
    fn user_id(&self, name: &str) -> Result<Option<u32>>;
    fn group_id(&self, name: &str) -> Result<Option<u32>>;
}

/// lookup against the running system's user database
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemLookup;

impl IdLookup for SystemLookup {
    fn user_id(&self, name: &str) -> Result<Option<u32>> {
        let user = User::from_name(name).map_err(|e| Error::Lookup {
            name: name.to_string(),
            source: std::io::Error::from_raw_os_error(e as i32),
        })?;
        Ok(user.map(|u| u.uid.as_raw()))
    }

    fn group_id(&self, name: &str) -> Result<Option<u32>> {
        let group = Group::from_name(name).map_err(|e| Error::Lookup {
            name: name.to_string(),
            source: std::io::Error::from_raw_os_error(e as i32),
        })?;
        Ok(group.map(|g| g.gid.as_raw()))
    }
}

/// resolve a node's declared user/group into concrete ids
///
/// precedence per axis, independently: numeric id if set, else a non-empty
/// name via lookup (error when the name does not resolve), else the
/// caller-supplied default.
pub fn resolve_node_ids(
    node: &Node,
    lookup: &dyn IdLookup,
    default_uid: u32,
    default_gid: u32,
) -> Result<(u32, u32)> {
    let mut uid = default_uid;
    if let Some(id) = node.user.id {
        uid = id;
    } else if let Some(name) = node.user.name.as_deref().filter(|n| !n.is_empty()) {
        uid = lookup
            .user_id(name)?
            .ok_or_else(|| Error::NoSuchUser(name.to_string()))?;
    }

    let mut gid = default_gid;
    if let Some(id) = node.group.id {
        gid = id;
    } else if let Some(name) = node.group.name.as_deref().filter(|n| !n.is_empty()) {
        gid = lookup
            .group_id(name)?
            .ok_or_else(|| Error::NoSuchGroup(name.to_string()))?;
    }

    Ok((uid, gid))
}
