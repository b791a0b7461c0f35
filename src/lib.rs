//! seedfs - declarative filesystem materializer
//!
//! turns a declarative description of filesystem entries into concrete,
//! durable disk state: regular files (optionally populated from a content
//! source, with integrity verification and append semantics) and hard or
//! symbolic links. built for an early-boot provisioning pass: installs are
//! atomic (stage into a same-directory temp file, rename), verification is
//! byte-exact, and every failure propagates immediately with no retries.
//!
//! # Core flow
//!
//! - **plan**: a [`FileEntry`]'s content sources become an ordered sequence
//!   of [`FetchOp`]s, primary first, append fragments after.
//! - **fetch**: each op is handed to the configured [`Fetcher`], which
//!   retrieves, verifies the digest against the spec's
//!   `<algorithm>-<hex-digest>` string, and decompresses into the staging
//!   file.
//! - **install**: replace by atomic rename, or append onto an existing
//!   regular file; then mode and ownership are applied, with symbolic
//!   user/group names resolved through an [`IdLookup`].
//!
//! # Example usage
//!
//! ```no_run
//! use std::path::Path;
//! use seedfs::{apply, Context, LocalFetcher, Manifest, SystemLookup};
//!
//! let manifest = Manifest::load(Path::new("/etc/seedfs/manifest.toml")).unwrap();
//! let fetcher = LocalFetcher;
//! let lookup = SystemLookup;
//! let ctx = Context::new(Path::new("/sysroot"), &fetcher, &lookup);
//! apply(&ctx, &manifest).unwrap();
//! ```

mod context;
mod digest;
mod error;
mod owner;
mod plan;

pub mod fetch;
pub mod fs;
pub mod manifest;
pub mod types;

pub use context::Context;
pub use digest::{Algorithm, Hasher, Verification};
pub use error::{Error, Result};
pub use fetch::{FetchOptions, Fetcher, LocalFetcher};
pub use fs::{
    apply_file_metadata, materialize_file, mkdir_for_file, path_exists, perform_fetch,
    purge_on_overwrite, write_link, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE,
};
pub use manifest::{apply, Manifest};
pub use owner::{resolve_node_ids, IdLookup, SystemLookup};
pub use plan::{build_fetch_plan, FetchOp, FetchRequest};
pub use types::{ContentSpec, FileEntry, LinkEntry, Node, NodeOwner};
