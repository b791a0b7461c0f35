use serde::{Deserialize, Serialize};

use crate::types::Node;

/// one content source for a file: where to fetch from and how to check it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSpec {
    /// source uri (file://, data:, or whatever the configured fetcher speaks)
    pub source: String,
    /// compression tag, passed to the fetcher unevaluated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
    /// verification spec string, `<algorithm>-<hex-digest>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
}

impl ContentSpec {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compression: None,
            verification: None,
        }
    }
}

/// a declared regular file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(flatten)]
    pub node: Node,
    /// permission bits; installed files keep the default 0644 when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
    /// primary content, installed by atomic replace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<ContentSpec>,
    /// append fragments, installed in declaration order after the primary
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub append: Vec<ContentSpec>,
}

impl FileEntry {
    pub fn new(node: Node) -> Self {
        Self {
            node,
            mode: None,
            contents: None,
            append: vec![],
        }
    }
}

/// a declared hard or symbolic link
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    #[serde(flatten)]
    pub node: Node,
    /// link target; literal for symlinks, resolved under the root for hard links
    pub target: String,
    #[serde(default)]
    pub hard: bool,
}
