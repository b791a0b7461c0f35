pub mod file;
pub mod link;
pub mod paths;

pub use file::{apply_file_metadata, materialize_file, perform_fetch};
pub use link::write_link;
pub use paths::{mkdir_for_file, path_exists, purge_on_overwrite};

/// permission bits for directories created on the way to a destination
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// permission bits for installed files when the entry declares none
pub const DEFAULT_FILE_MODE: u32 = 0o644;
