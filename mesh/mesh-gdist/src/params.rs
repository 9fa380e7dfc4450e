//! Parameters for distance queries.

use mesh_types::IndexBase;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GdistError, GdistResult};

/// How a source-to-target query drives the propagation engine.
///
/// Both modes bound propagation by [`GdistParams::max_distance`] and give
/// the same distances; they differ in when the engine may stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PropagationMode {
    /// Hand the targets to the engine as stop points so it can finish as
    /// soon as all of them are reached. Usually fastest for few targets.
    #[default]
    StopAtTargets,

    /// Expand freely until the radius `max_distance` is exhausted, then
    /// read the targets off the finished field.
    BoundedRadius,
}

impl PropagationMode {
    /// Mode for a `truncate_propagation` flag: `true` selects
    /// [`PropagationMode::BoundedRadius`].
    #[must_use]
    pub const fn truncated(truncate: bool) -> Self {
        if truncate {
            Self::BoundedRadius
        } else {
            Self::StopAtTargets
        }
    }
}

/// Parameters shared by all distance queries.
///
/// # Example
///
/// ```
/// use mesh_gdist::{GdistParams, PropagationMode};
/// use mesh_types::IndexBase;
///
/// // No distance limit, zero-based triangles
/// let params = GdistParams::default();
/// assert!(params.max_distance.is_infinite());
///
/// // Local matrix limited to 0.3 units, one-based triangles
/// let params = GdistParams::bounded(0.3)
///     .with_index_base(IndexBase::OneBased)
///     .with_propagation(PropagationMode::BoundedRadius);
/// assert!(params.validate().is_ok());
///
/// assert!(GdistParams::bounded(f64::NAN).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GdistParams {
    /// Distances beyond this are reported as unreachable and never enter a
    /// sparse matrix. `f64::INFINITY` means no limit.
    pub max_distance: f64,

    /// Propagation strategy for source-to-target queries.
    pub propagation: PropagationMode,

    /// Numbering of triangle indices in flat input arrays.
    pub index_base: IndexBase,

    /// Whether sparse matrix builders fan out over rayon's thread pool.
    pub parallel: bool,
}

impl Default for GdistParams {
    fn default() -> Self {
        Self {
            max_distance: f64::INFINITY,
            propagation: PropagationMode::StopAtTargets,
            index_base: IndexBase::ZeroBased,
            parallel: true,
        }
    }
}

impl GdistParams {
    /// Parameters with a distance limit and otherwise default settings.
    #[must_use]
    pub const fn bounded(max_distance: f64) -> Self {
        Self {
            max_distance,
            propagation: PropagationMode::StopAtTargets,
            index_base: IndexBase::ZeroBased,
            parallel: true,
        }
    }

    /// Default parameters for one-based triangle indices.
    #[must_use]
    pub const fn one_indexed() -> Self {
        Self {
            max_distance: f64::INFINITY,
            propagation: PropagationMode::StopAtTargets,
            index_base: IndexBase::OneBased,
            parallel: true,
        }
    }

    /// Set the distance limit.
    #[must_use]
    pub const fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Set the propagation mode.
    #[must_use]
    pub const fn with_propagation(mut self, propagation: PropagationMode) -> Self {
        self.propagation = propagation;
        self
    }

    /// Set the triangle index convention.
    #[must_use]
    pub const fn with_index_base(mut self, index_base: IndexBase) -> Self {
        self.index_base = index_base;
        self
    }

    /// Enable or disable parallel matrix assembly.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether a finite distance limit is set.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.max_distance.is_finite()
    }

    /// Check the parameters once, before any work starts.
    ///
    /// # Errors
    ///
    /// Returns [`GdistError::InvalidParams`] if `max_distance` is NaN or
    /// negative.
    pub fn validate(&self) -> GdistResult<()> {
        if self.max_distance.is_nan() {
            return Err(GdistError::invalid_params("max_distance is NaN"));
        }
        if self.max_distance < 0.0 {
            return Err(GdistError::invalid_params(format!(
                "max_distance must be non-negative, got {}",
                self.max_distance
            )));
        }
        Ok(())
    }

    /// Whether a measured distance belongs in a sparse matrix.
    ///
    /// Entries must be finite, strictly positive (self-distances are not
    /// data) and within the limit.
    #[inline]
    #[must_use]
    pub fn keeps(&self, distance: f64) -> bool {
        distance.is_finite() && distance > 0.0 && distance <= self.max_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = GdistParams::default();
        assert!(params.max_distance.is_infinite());
        assert!(!params.is_bounded());
        assert_eq!(params.propagation, PropagationMode::StopAtTargets);
        assert_eq!(params.index_base, IndexBase::ZeroBased);
        assert!(params.parallel);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let params = GdistParams::bounded(0.3);
        assert!((params.max_distance - 0.3).abs() < f64::EPSILON);
        assert!(params.is_bounded());

        let params = GdistParams::one_indexed();
        assert_eq!(params.index_base, IndexBase::OneBased);
        assert!(params.max_distance.is_infinite());
    }

    #[test]
    fn test_builder_pattern() {
        let params = GdistParams::default()
            .with_max_distance(2.0)
            .with_propagation(PropagationMode::BoundedRadius)
            .with_index_base(IndexBase::OneBased)
            .with_parallel(false);

        assert!((params.max_distance - 2.0).abs() < f64::EPSILON);
        assert_eq!(params.propagation, PropagationMode::BoundedRadius);
        assert_eq!(params.index_base, IndexBase::OneBased);
        assert!(!params.parallel);
    }

    #[test]
    fn test_validate() {
        assert!(GdistParams::bounded(0.0).validate().is_ok());
        assert!(matches!(
            GdistParams::bounded(f64::NAN).validate(),
            Err(GdistError::InvalidParams(_))
        ));
        assert!(matches!(
            GdistParams::bounded(-1.0).validate(),
            Err(GdistError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_truncated_mode() {
        assert_eq!(
            PropagationMode::truncated(true),
            PropagationMode::BoundedRadius
        );
        assert_eq!(
            PropagationMode::truncated(false),
            PropagationMode::StopAtTargets
        );
    }

    #[test]
    fn test_keeps() {
        let params = GdistParams::bounded(1.0);
        assert!(params.keeps(0.5));
        assert!(params.keeps(1.0));
        assert!(!params.keeps(0.0));
        assert!(!params.keeps(1.5));
        assert!(!params.keeps(f64::INFINITY));
        assert!(!params.keeps(f64::NAN));

        assert!(GdistParams::default().keeps(1e300));
    }
}
