//! Key trait for node links.
//!
//! A [`Key`] names a node slot in storage. Successor links are keys, with a
//! reserved sentinel (`NONE`) standing in for "no successor", so a link is
//! a bare integer rather than an `Option<K>`.

/// Trait for key types used as node links.
///
/// Provides a sentinel value (`NONE`) and conversion to/from `usize`.
///
/// # Example
///
/// ```
/// use nexus_seq::Key;
///
/// let key: u32 = 42;
/// assert!(key.is_some());
/// assert!(u32::NONE.is_none());
/// ```
pub trait Key: Copy + Eq + core::fmt::Debug {
    /// Sentinel value meaning "no node".
    ///
    /// For integer types this is `MAX`, so the usable key range is
    /// `0..MAX`.
    const NONE: Self;

    /// Creates a key from a slot position.
    fn from_usize(val: usize) -> Self;

    /// Returns the slot position this key names.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this is NOT the sentinel value.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as Self
                }

                #[inline]
                fn as_usize(&self) -> usize {
                    *self as usize
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u8, u16, u32, u64, usize);
