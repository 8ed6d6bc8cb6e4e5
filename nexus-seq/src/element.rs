//! Owned, NUL-terminated byte strings held by queue nodes.

use core::cmp::Ordering;
use core::fmt;

use crate::error::Error;

/// An independent copy of a caller's byte string.
///
/// The copy holds the content followed by a single NUL terminator, so it
/// occupies `content.len() + 1` bytes. Ordering compares content only,
/// byte by byte: a proper prefix sorts first, otherwise the first differing
/// byte decides.
///
/// # Example
///
/// ```
/// use nexus_seq::Element;
///
/// let e = Element::try_copy_from(b"cherry").unwrap();
/// assert_eq!(e.as_bytes(), b"cherry");
/// assert_eq!(e.as_bytes_with_nul(), b"cherry\0");
///
/// let mut buf = [0xffu8; 4];
/// assert_eq!(e.copy_truncated(&mut buf), 3);
/// assert_eq!(&buf, b"che\0");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Element {
    /// Content plus trailing NUL; never empty.
    bytes: Box<[u8]>,
}

impl Element {
    /// Copies `content` into a freshly allocated, terminated buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueAlloc`] if the buffer cannot be allocated.
    pub fn try_copy_from(content: &[u8]) -> Result<Self, Error> {
        let stored = Self::stored_len(content.len());

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(stored)
            .map_err(|_| Error::ValueAlloc { len: stored })?;
        bytes.extend_from_slice(content);
        bytes.push(0);

        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Bytes needed to store `content_len` bytes of content.
    #[inline]
    pub const fn stored_len(content_len: usize) -> usize {
        content_len + 1
    }

    /// Returns the content, without the terminator.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    /// Returns the content followed by the terminator.
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the content length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    /// Returns `true` if the content is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of bytes this copy occupies, terminator included.
    #[inline]
    pub fn stored_size(&self) -> usize {
        self.bytes.len()
    }

    /// Copies the terminated content into `out`, truncating to fit.
    ///
    /// Copies `min(len + 1, out.len())` bytes and then writes the terminator
    /// at `out.len() - 1` regardless of what was copied. The result always
    /// ends in NUL and never holds more than `out.len() - 1` content bytes.
    /// An empty `out` is left untouched.
    ///
    /// Returns the number of content bytes that fit.
    pub fn copy_truncated(&self, out: &mut [u8]) -> usize {
        let Some(last) = out.len().checked_sub(1) else {
            return 0;
        };

        let n = self.bytes.len().min(out.len());
        out[..n].copy_from_slice(&self.bytes[..n]);
        out[last] = 0;

        self.len().min(last)
    }
}

impl Ord for Element {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl PartialOrd for Element {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl AsRef<[u8]> for Element {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}
