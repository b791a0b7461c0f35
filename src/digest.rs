use sha2::{Digest, Sha256, Sha512};

use crate::{Error, Result};

/// digest algorithm selected by a verification spec
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Sha256,
    Sha512,
}

impl Algorithm {
    /// parse an algorithm name as it appears in a verification spec
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "sha256" => Ok(Algorithm::Sha256),
            "sha512" => Ok(Algorithm::Sha512),
            other => Err(Error::UnknownAlgorithm(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha512 => "sha512",
        }
    }

    /// output size in bytes
    pub fn digest_len(&self) -> usize {
        match self {
            Algorithm::Sha256 => 32,
            Algorithm::Sha512 => 64,
        }
    }

    /// fresh streaming accumulator bound to this algorithm
    pub fn hasher(&self) -> Hasher {
        match self {
            Algorithm::Sha256 => Hasher::Sha256(Sha256::new()),
            Algorithm::Sha512 => Hasher::Sha512(Sha512::new()),
        }
    }
}

/// streaming digest accumulator
pub enum Hasher {
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Hasher {
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Sha256(h) => h.update(data),
            Hasher::Sha512(h) => h.update(data),
        }
    }

    pub fn finalize(self) -> Vec<u8> {
        match self {
            Hasher::Sha256(h) => h.finalize().to_vec(),
            Hasher::Sha512(h) => h.finalize().to_vec(),
        }
    }
}

/// parsed verification spec: algorithm plus the expected raw digest
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verification {
    pub algorithm: Algorithm,
    pub expected: Vec<u8>,
}

impl Verification {
    /// parse a `<algorithm>-<hex-digest>` spec string
    ///
    /// the decoded digest must be exactly the algorithm's output size;
    /// a wrong length is an error, never truncated or padded.
    pub fn parse(spec: &str) -> Result<Self> {
        let (name, hex_digest) = spec
            .split_once('-')
            .ok_or_else(|| Error::InvalidVerification(spec.to_string()))?;
        let algorithm = Algorithm::from_name(name)?;
        let expected =
            hex::decode(hex_digest).map_err(|_| Error::InvalidVerification(spec.to_string()))?;
        if expected.len() != algorithm.digest_len() {
            return Err(Error::DigestLength {
                algorithm: algorithm.name(),
                expected: algorithm.digest_len(),
                actual: expected.len(),
            });
        }
        Ok(Self {
            algorithm,
            expected,
        })
    }

    /// parse an optional spec; absence means no verification requested
    pub fn parse_opt(spec: Option<&str>) -> Result<Option<Self>> {
        spec.map(Self::parse).transpose()
    }

    pub fn expected_hex(&self) -> String {
        hex::encode(&self.expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::Digest;

    #[test]
    fn test_parse_sha256() {
        let digest = hex::encode(Sha256::digest(b"hello"));
        let v = Verification::parse(&format!("sha256-{}", digest)).unwrap();
        assert_eq!(v.algorithm, Algorithm::Sha256);
        assert_eq!(v.expected, Sha256::digest(b"hello").to_vec());
    }

    #[test]
    fn test_parse_sha512() {
        let digest = hex::encode(Sha512::digest(b"hello"));
        let v = Verification::parse(&format!("sha512-{}", digest)).unwrap();
        assert_eq!(v.algorithm, Algorithm::Sha512);
        assert_eq!(v.expected.len(), 64);
    }

    #[test]
    fn test_parse_unknown_algorithm() {
        let digest = hex::encode(Sha256::digest(b"hello"));
        assert!(matches!(
            Verification::parse(&format!("md5-{}", digest)),
            Err(Error::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_parse_bad_hex() {
        assert!(matches!(
            Verification::parse("sha256-not hex at all"),
            Err(Error::InvalidVerification(_))
        ));
    }

    #[test]
    fn test_parse_missing_separator() {
        assert!(matches!(
            Verification::parse("sha256"),
            Err(Error::InvalidVerification(_))
        ));
    }

    #[test]
    fn test_parse_wrong_length() {
        // valid hex, wrong digest size for sha256
        assert!(matches!(
            Verification::parse("sha256-abcdef"),
            Err(Error::DigestLength { .. })
        ));

        // sha256-sized digest declared as sha512
        let digest = hex::encode(Sha256::digest(b"hello"));
        assert!(matches!(
            Verification::parse(&format!("sha512-{}", digest)),
            Err(Error::DigestLength { .. })
        ));
    }

    #[test]
    fn test_parse_opt_absent() {
        assert!(Verification::parse_opt(None).unwrap().is_none());
    }

    #[test]
    fn test_hasher_streaming_matches_oneshot() {
        let mut h = Algorithm::Sha256.hasher();
        h.update(b"hello");
        h.update(b"world");
        assert_eq!(h.finalize(), Sha256::digest(b"helloworld").to_vec());
    }
}
