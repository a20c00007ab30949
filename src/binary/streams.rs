//! Bounded byte access to payload files.

use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

#[cfg(feature = "mmap")]
use memmap2::Mmap;
use parking_lot::Mutex;

use crate::util::{Error, Result};

/// Read-only handle on one payload file.
///
/// Supports both memory-mapped and buffered I/O modes. Every access is
/// checked against the file size; a range past the end is
/// [`Error::TruncatedData`], never a short read.
pub struct BinarySource {
    inner: SourceInner,
    path: PathBuf,
    size: u64,
}

enum SourceInner {
    /// Memory-mapped file (preferred, zero-copy)
    #[cfg(feature = "mmap")]
    Mmap(Mmap),
    /// Buffered file access (fallback, copies the requested range)
    File(Mutex<File>),
}

impl BinarySource {
    /// Open a payload file with optional memory mapping.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = file.metadata()?.len();

        // Zero-length files cannot be mapped.
        let inner = if use_mmap && size > 0 {
            Self::map(file)?
        } else {
            SourceInner::File(Mutex::new(file))
        };

        Ok(Self { inner, path: path.to_path_buf(), size })
    }

    #[cfg(feature = "mmap")]
    fn map(file: File) -> Result<SourceInner> {
        // Safety: the file is opened read-only and the mapping never
        // outlives this import.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::MmapFailed(e.to_string()))?;
        Ok(SourceInner::Mmap(mmap))
    }

    #[cfg(not(feature = "mmap"))]
    fn map(file: File) -> Result<SourceInner> {
        Ok(SourceInner::File(Mutex::new(file)))
    }

    /// Path this source was opened from.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total file size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether reads are served from a memory mapping.
    #[inline]
    pub fn is_mapped(&self) -> bool {
        match &self.inner {
            #[cfg(feature = "mmap")]
            SourceInner::Mmap(_) => true,
            SourceInner::File(_) => false,
        }
    }

    /// Check that `[pos, pos + len)` lies within the file.
    pub fn check_range(&self, pos: u64, len: u64) -> Result<()> {
        match pos.checked_add(len) {
            Some(end) if end <= self.size => Ok(()),
            end => Err(Error::TruncatedData {
                path: self.path.clone(),
                required: end.unwrap_or(u64::MAX),
                available: self.size,
            }),
        }
    }

    /// Bytes in `[pos, pos + len)`: borrowed from the mapping when
    /// mapped, otherwise read into a buffer.
    pub fn bytes(&self, pos: u64, len: usize) -> Result<Cow<'_, [u8]>> {
        self.check_range(pos, len as u64)?;

        match &self.inner {
            #[cfg(feature = "mmap")]
            SourceInner::Mmap(mmap) => {
                let start = pos as usize;
                Ok(Cow::Borrowed(&mmap[start..start + len]))
            }
            SourceInner::File(file) => {
                let mut f = file.lock();
                f.seek(SeekFrom::Start(pos))?;
                let mut buf = vec![0u8; len];
                f.read_exact(&mut buf)?;
                Ok(Cow::Owned(buf))
            }
        }
    }
}

impl std::fmt::Debug for BinarySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinarySource")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("mapped", &self.is_mapped())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn payload(bytes: &[u8]) -> NamedTempFile {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), bytes).unwrap();
        temp
    }

    #[test]
    fn test_bytes_in_range() -> Result<()> {
        let temp = payload(&[1, 2, 3, 4, 5, 6, 7, 8]);
        for use_mmap in [true, false] {
            let src = BinarySource::open_opts(temp.path(), use_mmap)?;
            assert_eq!(src.size(), 8);
            assert_eq!(&*src.bytes(2, 4)?, &[3, 4, 5, 6]);
            assert_eq!(&*src.bytes(8, 0)?, &[] as &[u8]);
        }
        Ok(())
    }

    #[test]
    fn test_out_of_range_is_truncated() -> Result<()> {
        let temp = payload(&[0; 10]);
        for use_mmap in [true, false] {
            let src = BinarySource::open_opts(temp.path(), use_mmap)?;
            match src.bytes(4, 8) {
                Err(Error::TruncatedData { required, available, .. }) => {
                    assert_eq!(required, 12);
                    assert_eq!(available, 10);
                }
                other => panic!("expected truncation, got {:?}", other.map(|b| b.len())),
            }
            assert!(src.check_range(u64::MAX, 2).is_err());
        }
        Ok(())
    }

    #[test]
    fn test_empty_file_not_mapped() -> Result<()> {
        let temp = payload(&[]);
        let src = BinarySource::open_opts(temp.path(), true)?;
        assert!(!src.is_mapped());
        assert!(src.bytes(0, 0)?.is_empty());
        assert!(src.bytes(0, 1).is_err());
        Ok(())
    }
}
