mod entry;
mod node;

pub use entry::{ContentSpec, FileEntry, LinkEntry};
pub use node::{Node, NodeOwner};
