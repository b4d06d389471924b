//! Content hashing
//!
//! Streams file bytes through the selected digest in fixed-size chunks, so
//! memory use does not grow with file size.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::{FileIdentity, HashAlgorithm};

/// Read size for each digest update
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Content hasher producing a [`FileIdentity`]
#[derive(Debug, Clone, Copy)]
pub struct ContentHasher {
    algorithm: HashAlgorithm,
}

impl ContentHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash a file. Fails with `FileUnreadable` when it cannot be read.
    pub fn hash_file(&self, path: &Path) -> Result<FileIdentity, DomainError> {
        let file = File::open(path).map_err(|e| {
            DomainError::FileUnreadable(format!("{}: {}", path.display(), e))
        })?;
        let digest = self.hash_reader(file).map_err(|e| {
            DomainError::FileUnreadable(format!("{}: {}", path.display(), e))
        })?;

        debug!(algorithm = %self.algorithm, "Hashed {}", path.display());
        Ok(FileIdentity {
            algorithm: self.algorithm,
            digest,
        })
    }

    /// Hex digest of everything the reader yields
    pub fn hash_reader<R: Read>(&self, reader: R) -> std::io::Result<String> {
        match self.algorithm {
            HashAlgorithm::Md5 => digest_reader::<Md5, _>(reader),
            HashAlgorithm::Sha1 => digest_reader::<Sha1, _>(reader),
            HashAlgorithm::Sha256 => digest_reader::<Sha256, _>(reader),
            HashAlgorithm::Sha512 => digest_reader::<Sha512, _>(reader),
        }
    }
}

fn digest_reader<D: Digest, R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
