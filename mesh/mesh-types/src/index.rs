//! Triangle index conventions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Numbering convention of incoming triangle indices.
///
/// Meshes exported from MATLAB or Fortran tools number vertices from 1.
/// The convention is always stated by the caller, never guessed from the
/// data, and every mesh built by this crate stores zero-based indices.
///
/// # Example
///
/// ```
/// use mesh_types::IndexBase;
///
/// assert_eq!(IndexBase::OneBased.normalize(3), Some(2));
/// assert_eq!(IndexBase::OneBased.normalize(0), None);
/// assert_eq!(IndexBase::ZeroBased.normalize(0), Some(0));
/// assert_eq!(IndexBase::from(true), IndexBase::OneBased);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IndexBase {
    /// Indices start at 0.
    #[default]
    ZeroBased,
    /// Indices start at 1.
    OneBased,
}

impl IndexBase {
    /// The value of the first index under this convention.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> u32 {
        match self {
            Self::ZeroBased => 0,
            Self::OneBased => 1,
        }
    }

    /// Convert a raw index to zero-based, or `None` if it lies below the base.
    #[inline]
    #[must_use]
    pub const fn normalize(self, index: u32) -> Option<u32> {
        index.checked_sub(self.offset())
    }

    /// Whether this is the one-based convention.
    #[inline]
    #[must_use]
    pub const fn is_one_based(self) -> bool {
        matches!(self, Self::OneBased)
    }
}

impl From<bool> for IndexBase {
    /// Interpret an `is_one_indexed` flag.
    fn from(one_indexed: bool) -> Self {
        if one_indexed {
            Self::OneBased
        } else {
            Self::ZeroBased
        }
    }
}
