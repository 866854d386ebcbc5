//! BIN container loading and byte-range reads
//!
//! A section's BIN container is a monolithic blob holding its sub-files
//! back-to-back, optionally gzip-compressed. Compression is detected by
//! magic bytes, never by file extension. The whole container is
//! materialized in memory once; reads are bounds-checked copies out of
//! that buffer.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::error::{Error, Result};

/// Gzip stream magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// A fully-materialized, read-only view of one BIN container.
#[derive(Debug)]
pub struct BinaryCache {
    data: Vec<u8>,
}

impl BinaryCache {
    /// Load a container into memory, decompressing it if it is gzipped.
    ///
    /// # Errors
    /// Returns [`Error::ContainerLoad`] if the path cannot be read or the
    /// gzip stream cannot be decompressed in full.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read(path).map_err(|e| load_error(path, &e))?;

        let data = if raw.starts_with(&GZIP_MAGIC) {
            let mut decoder = GzDecoder::new(raw.as_slice());
            let mut decompressed = Vec::new();
            decoder
                .read_to_end(&mut decompressed)
                .map_err(|e| load_error(path, &e))?;
            tracing::debug!(
                "loaded container {} ({} compressed, {} decompressed)",
                path.display(),
                raw.len(),
                decompressed.len()
            );
            decompressed
        } else {
            tracing::debug!("loaded container {} ({} bytes)", path.display(), raw.len());
            raw
        };

        Ok(Self { data })
    }

    /// Size of the decoded container in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the decoded container is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy exactly `length` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRange`] if `offset < 0` or `length <= 0`,
    /// and [`Error::OutOfRange`] if the range extends past the end of the
    /// container.
    pub fn read(&self, offset: i64, length: i64) -> Result<Vec<u8>> {
        if offset < 0 || length <= 0 {
            return Err(Error::InvalidRange { offset, length });
        }

        let end = offset
            .checked_add(length)
            .ok_or(Error::InvalidRange { offset, length })?;
        if end as u64 > self.data.len() as u64 {
            return Err(Error::OutOfRange {
                offset,
                length,
                size: self.data.len(),
            });
        }

        Ok(self.data[offset as usize..end as usize].to_vec())
    }
}

fn load_error(path: &Path, err: &dyn std::fmt::Display) -> Error {
    Error::ContainerLoad {
        path: PathBuf::from(path),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn payload() -> Vec<u8> {
        (0..=199).collect()
    }

    fn write_temp(bytes: &[u8]) -> tempfile::TempPath {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.into_temp_path()
    }

    #[test]
    fn raw_container_loads_verbatim() {
        let path = write_temp(&payload());
        let cache = BinaryCache::open(&path).unwrap();
        assert_eq!(cache.len(), 200);
        assert_eq!(cache.read(0, 200).unwrap(), payload());
    }

    #[test]
    fn gzip_container_is_detected_by_magic_and_decompressed() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&payload()).unwrap();
        let path = write_temp(&encoder.finish().unwrap());

        let cache = BinaryCache::open(&path).unwrap();
        assert_eq!(cache.len(), 200);
        assert_eq!(cache.read(100, 50).unwrap(), payload()[100..150].to_vec());
    }

    #[test]
    fn read_returns_the_exact_slice() {
        let path = write_temp(&payload());
        let cache = BinaryCache::open(&path).unwrap();
        assert_eq!(cache.read(100, 50).unwrap(), payload()[100..150].to_vec());
        // Reads are repeatable.
        assert_eq!(cache.read(100, 50).unwrap(), payload()[100..150].to_vec());
        assert_eq!(cache.read(199, 1).unwrap(), vec![199]);
    }

    #[test]
    fn negative_offset_and_non_positive_length_are_invalid() {
        let path = write_temp(&payload());
        let cache = BinaryCache::open(&path).unwrap();
        assert!(matches!(
            cache.read(-1, 10),
            Err(Error::InvalidRange { .. })
        ));
        assert!(matches!(cache.read(0, 0), Err(Error::InvalidRange { .. })));
        assert!(matches!(
            cache.read(0, -5),
            Err(Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn range_past_the_end_is_out_of_range() {
        let path = write_temp(&payload());
        let cache = BinaryCache::open(&path).unwrap();
        let err = cache.read(100, 101).unwrap_err();
        match err {
            Error::OutOfRange {
                offset,
                length,
                size,
            } => {
                assert_eq!((offset, length, size), (100, 101, 200));
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn missing_container_is_a_load_error() {
        let err = BinaryCache::open("/no/such/container.bin").unwrap_err();
        assert!(matches!(err, Error::ContainerLoad { .. }), "got {err:?}");
    }
}
