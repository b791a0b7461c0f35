use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// symbolic owner of one axis (user or group)
///
/// a numeric id takes precedence over a name; with neither set the
/// resolver falls back to a caller-supplied default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeOwner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NodeOwner {
    pub fn by_id(id: u32) -> Self {
        Self {
            id: Some(id),
            name: None,
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }
}

/// identity and shared metadata for one declared filesystem entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// absolute destination path, resolved beneath the destination root
    pub path: PathBuf,
    #[serde(default)]
    pub user: NodeOwner,
    #[serde(default)]
    pub group: NodeOwner,
    /// remove whatever already exists at the path before creation
    #[serde(default)]
    pub overwrite: bool,
}

impl Node {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            user: NodeOwner::default(),
            group: NodeOwner::default(),
            overwrite: false,
        }
    }
}
