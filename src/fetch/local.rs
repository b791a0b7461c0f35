use std::fs::File;
use std::io::{self, Read, Write};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use url::Url;

use crate::digest::Hasher;
use crate::error::IoResultExt;
use crate::fetch::{FetchOptions, Fetcher};
use crate::{Error, Result};

/// fetcher for sources that need no network stack
///
/// speaks `file://` (local file read) and `data:` urls (base64 or
/// percent-encoded payloads). network schemes belong to an external
/// fetcher implementing the same trait.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFetcher;

impl Fetcher for LocalFetcher {
    fn fetch(&self, url: &Url, sink: &mut dyn Write, options: &FetchOptions<'_>) -> Result<()> {
        match url.scheme() {
            "file" => {
                let path = url.to_file_path().map_err(|_| Error::Fetch {
                    url: url.to_string(),
                    message: "not a local file path".to_string(),
                })?;
                let source = File::open(&path).with_path(&path)?;
                stream_into(source, sink, options, url)
            }
            "data" => {
                // data payloads are already in memory, stream from the buffer
                let raw = decode_data_url(url)?;
                stream_into(&raw[..], sink, options, url)
            }
            other => Err(Error::UnsupportedScheme(other.to_string())),
        }
    }
}

/// reader adapter feeding every retrieved byte into a digest accumulator
struct HashingReader<R> {
    inner: R,
    hasher: Hasher,
}

impl<R: Read> HashingReader<R> {
    fn new(inner: R, hasher: Hasher) -> Self {
        Self { inner, hasher }
    }

    fn finalize(self) -> Vec<u8> {
        self.hasher.finalize()
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

/// copy `source` to `sink` in chunks, decoding the declared compression on
/// the way and verifying the digest when requested
///
/// the digest covers the bytes as retrieved, before decompression, so the
/// source is teed through the accumulator rather than hashed in one shot;
/// memory stays bounded regardless of source size.
fn stream_into<R: Read>(
    source: R,
    sink: &mut dyn Write,
    options: &FetchOptions<'_>,
    url: &Url,
) -> Result<()> {
    let Some(verify) = options.verify else {
        return decompress_into(source, options.compression, sink, url);
    };

    let mut reader = HashingReader::new(source, verify.algorithm.hasher());
    decompress_into(&mut reader, options.compression, sink, url)?;

    // a decoder may stop at the end of its frame; drain the rest so the
    // digest covers every retrieved byte
    io::copy(&mut reader, &mut io::sink()).map_err(|e| fetch_err(url, e))?;

    let actual = reader.finalize();
    if actual != verify.expected {
        return Err(Error::DigestMismatch {
            url: url.to_string(),
            expected: verify.expected_hex(),
            actual: hex::encode(&actual),
        });
    }
    Ok(())
}

/// decode the payload of a `data:` url
///
/// supported forms: `data:[mediatype];base64,<payload>` and
/// `data:[mediatype],<percent-encoded>`. mediatype parameters other than
/// `;base64` are ignored.
fn decode_data_url(url: &Url) -> Result<Vec<u8>> {
    let opaque = url.path();
    let (header, payload) = opaque
        .split_once(',')
        .ok_or_else(|| Error::InvalidDataUrl(url.to_string()))?;

    if header.ends_with(";base64") {
        BASE64
            .decode(payload)
            .map_err(|_| Error::InvalidDataUrl(url.to_string()))
    } else {
        Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

fn fetch_err(url: &Url, e: io::Error) -> Error {
    Error::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    }
}

/// copy `source` to `sink`, decoding the declared compression on the way
fn decompress_into<R: Read>(
    mut source: R,
    compression: Option<&str>,
    sink: &mut dyn Write,
    url: &Url,
) -> Result<()> {
    match compression {
        None | Some("") => io::copy(&mut source, sink)
            .map(|_| ())
            .map_err(|e| fetch_err(url, e)),
        Some("gzip") => {
            let mut decoder = flate2::read::GzDecoder::new(source);
            io::copy(&mut decoder, sink)
                .map(|_| ())
                .map_err(|e| fetch_err(url, e))
        }
        Some("zstd") => zstd::stream::copy_decode(source, sink).map_err(|e| fetch_err(url, e)),
        Some(other) => Err(Error::UnsupportedCompression(other.to_string())),
    }
}
