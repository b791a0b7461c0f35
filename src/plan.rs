//! fetch plan construction: turn a declared file's content sources into the
//! ordered sequence of fetch operations

use tracing::error;
use url::Url;

use crate::digest::Verification;
use crate::types::{ContentSpec, FileEntry, Node};
use crate::{Error, Result};

/// payload shared by both install modes of a fetch operation
#[derive(Debug)]
pub struct FetchRequest<'a> {
    pub url: Url,
    /// parsed verification; absent when no verification was requested
    pub verify: Option<Verification>,
    /// compression tag, passed through to the fetcher unevaluated
    pub compression: Option<String>,
    /// the declared node this operation installs into
    pub node: &'a Node,
}

/// one unit of retrieve-verify-install work
///
/// the two install modes are distinct variants over a shared payload so the
/// install site matches exhaustively instead of checking a flag.
#[derive(Debug)]
pub enum FetchOp<'a> {
    /// atomically replace the destination with the fetched content
    Replace(FetchRequest<'a>),
    /// concatenate the fetched content onto the destination
    Append(FetchRequest<'a>),
}

impl<'a> FetchOp<'a> {
    pub fn request(&self) -> &FetchRequest<'a> {
        match self {
            FetchOp::Replace(request) | FetchOp::Append(request) => request,
        }
    }
}

fn new_request<'a>(node: &'a Node, contents: &ContentSpec) -> Result<FetchRequest<'a>> {
    let url = Url::parse(&contents.source).map_err(|source| {
        error!(
            path = %node.path.display(),
            source_url = %contents.source,
            "invalid content source url: {source}"
        );
        Error::InvalidUrl {
            url: contents.source.clone(),
            source,
        }
    })?;

    let verify = Verification::parse_opt(contents.verification.as_deref()).map_err(|e| {
        error!(path = %node.path.display(), "invalid verification spec: {e}");
        e
    })?;

    Ok(FetchRequest {
        url,
        verify,
        compression: contents.compression.clone(),
        node,
    })
}

/// build the ordered fetch plan for a declared file
///
/// the primary content (when present) comes first and installs by replace;
/// append fragments follow in declaration order.
pub fn build_fetch_plan(file: &FileEntry) -> Result<Vec<FetchOp<'_>>> {
    let mut ops = Vec::new();

    if let Some(contents) = &file.contents {
        ops.push(FetchOp::Replace(new_request(&file.node, contents)?));
    }

    for appendee in &file.append {
        ops.push(FetchOp::Append(new_request(&file.node, appendee)?));
    }

    Ok(ops)
}
