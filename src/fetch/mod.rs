//! content transport: the fetcher capability and its local implementation

pub mod local;

pub use local::LocalFetcher;

use std::io::Write;

use url::Url;

use crate::digest::Verification;
use crate::Result;

/// options for one fetch call
#[derive(Default)]
pub struct FetchOptions<'a> {
    /// when present the fetcher digests the retrieved bytes and compares
    /// against the expected value, failing the call on mismatch
    pub verify: Option<&'a Verification>,
    /// compression tag from the content spec, decoded by the fetcher
    pub compression: Option<&'a str>,
}

/// byte transport capability
///
/// contract: the full decompressed content is written to `sink` or an error
/// is returned; a fetcher never stops part-way without reporting failure.
/// verification happens here and nowhere else: the digest is computed over
/// the bytes as retrieved, before decompression.
pub trait Fetcher {
    fn fetch(&self, url: &Url, sink: &mut dyn Write, options: &FetchOptions<'_>) -> Result<()>;
}
