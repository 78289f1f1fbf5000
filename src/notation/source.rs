//! Notation sources
//!
//! Notation text lives either in ordinary memory or in read-only program
//! storage. Both are copied into a bounded working buffer before parsing;
//! text past the buffer limit is dropped.

/// Bytes requested from a [`FlashReader`] per call
const FLASH_CHUNK: usize = 64;

/// Byte-wise reader for strings kept in read-only program storage
pub trait FlashReader {
    /// Copy bytes starting at `address` into `buf`.
    ///
    /// Copies at most `buf.len()` bytes and stops after a NUL terminator.
    /// Returns the number of bytes written (terminator included).
    fn read(&self, address: usize, buf: &mut [u8]) -> usize;
}

/// In-memory image of program storage, addressed by byte offset
#[derive(Debug, Clone, Copy)]
pub struct FlashImage<'a> {
    bytes: &'a [u8],
}

impl<'a> FlashImage<'a> {
    /// Wrap a storage image
    pub fn new(bytes: &'a [u8]) -> Self {
        FlashImage { bytes }
    }
}

impl FlashReader for FlashImage<'_> {
    fn read(&self, address: usize, buf: &mut [u8]) -> usize {
        let Some(src) = self.bytes.get(address..) else {
            return 0;
        };
        let mut copied = 0;
        for (dst, &byte) in buf.iter_mut().zip(src) {
            *dst = byte;
            copied += 1;
            if byte == 0 {
                break;
            }
        }
        copied
    }
}

/// Where a notation string is stored
#[derive(Clone, Copy)]
pub enum NotationSource<'a> {
    /// Ordinary memory
    Ram(&'a str),
    /// Read-only program storage at `address`
    Flash {
        /// Storage reader
        reader: &'a dyn FlashReader,
        /// Start address of the NUL-terminated string
        address: usize,
    },
}

impl<'a> From<&'a str> for NotationSource<'a> {
    fn from(text: &'a str) -> Self {
        NotationSource::Ram(text)
    }
}

impl std::fmt::Debug for NotationSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotationSource::Ram(text) => f.debug_tuple("Ram").field(text).finish(),
            NotationSource::Flash { address, .. } => f
                .debug_struct("Flash")
                .field("address", &format_args!("0x{:04x}", address))
                .finish(),
        }
    }
}

impl NotationSource<'_> {
    /// Copy the notation into a buffer of at most `max_len` bytes.
    ///
    /// Returns the copied bytes (terminator excluded) and whether anything was
    /// cut off.
    pub(crate) fn working_copy(&self, max_len: usize) -> (Vec<u8>, bool) {
        // One byte past the limit tells a cut string from an exact fit
        let limit = max_len.saturating_add(1);
        let mut buf = match self {
            NotationSource::Ram(text) => {
                let bytes = text.as_bytes();
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                bytes[..end.min(limit)].to_vec()
            }
            NotationSource::Flash { reader, address } => read_flash(*reader, *address, limit),
        };

        let truncated = buf.len() > max_len;
        buf.truncate(max_len);
        (buf, truncated)
    }
}

/// Read a NUL-terminated string of at most `limit` bytes in small chunks
fn read_flash(reader: &dyn FlashReader, address: usize, limit: usize) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; FLASH_CHUNK];
    while buf.len() < limit {
        let want = (limit - buf.len()).min(FLASH_CHUNK);
        let copied = reader.read(address.saturating_add(buf.len()), &mut chunk[..want]);
        let data = &chunk[..copied.min(want)];
        if let Some(end) = data.iter().position(|&b| b == 0) {
            buf.extend_from_slice(&data[..end]);
            break;
        }
        buf.extend_from_slice(data);
        if copied < want {
            break;
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ram_copy_fits() {
        let (buf, truncated) = NotationSource::Ram("abc").working_copy(8);
        assert_eq!(buf, b"abc");
        assert!(!truncated);
    }

    #[test]
    fn test_ram_copy_truncates() {
        let (buf, truncated) = NotationSource::Ram("abcdef").working_copy(4);
        assert_eq!(buf, b"abcd");
        assert!(truncated);

        let (buf, truncated) = NotationSource::Ram("abcd").working_copy(4);
        assert_eq!(buf, b"abcd");
        assert!(!truncated);
    }

    #[test]
    fn test_ram_copy_stops_at_nul() {
        let (buf, truncated) = NotationSource::Ram("ab\0cdef").working_copy(4);
        assert_eq!(buf, b"ab");
        assert!(!truncated);
    }

    #[test]
    fn test_flash_copy() {
        let image = FlashImage::new(b"xxNokia:d=4:c\0tail");
        let source = NotationSource::Flash {
            reader: &image,
            address: 2,
        };
        let (buf, truncated) = source.working_copy(32);
        assert_eq!(buf, b"Nokia:d=4:c");
        assert!(!truncated);

        let (buf, truncated) = source.working_copy(5);
        assert_eq!(buf, b"Nokia");
        assert!(truncated);
    }

    #[test]
    fn test_unbounded_limit_copies_only_the_string() {
        let (buf, truncated) = NotationSource::Ram("x::c").working_copy(usize::MAX);
        assert_eq!(buf, b"x::c");
        assert!(!truncated);

        let image = FlashImage::new(b"x::c\0");
        let source = NotationSource::Flash {
            reader: &image,
            address: 0,
        };
        let (buf, truncated) = source.working_copy(usize::MAX);
        assert_eq!(buf, b"x::c");
        assert!(!truncated);
    }

    #[test]
    fn test_flash_copy_spans_chunks() {
        let mut bytes = vec![b'a'; FLASH_CHUNK * 2 + 10];
        bytes.push(0);
        let image = FlashImage::new(&bytes);
        let source = NotationSource::Flash {
            reader: &image,
            address: 0,
        };
        let (buf, truncated) = source.working_copy(FLASH_CHUNK * 3);
        assert_eq!(buf.len(), FLASH_CHUNK * 2 + 10);
        assert!(!truncated);

        let (buf, truncated) = source.working_copy(FLASH_CHUNK + 1);
        assert_eq!(buf.len(), FLASH_CHUNK + 1);
        assert!(truncated);
    }

    #[test]
    fn test_flash_address_out_of_range() {
        let image = FlashImage::new(b"abc\0");
        let source = NotationSource::Flash {
            reader: &image,
            address: 99,
        };
        assert!(source.working_copy(16).0.is_empty());
    }
}
