//! Sparse distance matrix in coordinate form.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GdistError, GdistResult};

/// One stored entry of a [`SparseMatrix`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SparseEntry {
    /// Source vertex.
    pub row: usize,
    /// Target vertex.
    pub column: usize,
    /// Geodesic distance from `row` to `column`.
    pub value: f64,
}

/// Square sparse matrix of geodesic distances in coordinate (COO) form.
///
/// Rows, columns and values are parallel arrays of equal length. Each
/// `(row, column)` pair appears at most once and never on the diagonal.
/// No ordering across rows is guaranteed: matrices assembled in parallel
/// concatenate rows in whatever order workers finish. Within one row,
/// columns keep the order the builder enumerated them in. Use
/// [`SparseMatrix::sorted`] when a deterministic layout is needed.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SparseMatrix {
    /// Number of rows and columns (the mesh vertex count).
    shape: usize,
    rows: Vec<usize>,
    columns: Vec<usize>,
    values: Vec<f64>,
}

impl SparseMatrix {
    /// Create an empty `shape × shape` matrix.
    #[must_use]
    pub const fn new(shape: usize) -> Self {
        Self {
            shape,
            rows: Vec::new(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Concatenate per-row buffers into one matrix.
    ///
    /// The result arrays are reserved to exactly the total entry count.
    ///
    /// # Errors
    ///
    /// Returns [`GdistError::AllocationFailure`] if the arrays cannot be
    /// reserved.
    pub fn from_row_buffers(shape: usize, buffers: Vec<Vec<SparseEntry>>) -> GdistResult<Self> {
        let entries: usize = buffers.iter().map(Vec::len).sum();
        let mut matrix = Self::new(shape);
        matrix.reserve_exact(entries)?;

        for entry in buffers.into_iter().flatten() {
            matrix.rows.push(entry.row);
            matrix.columns.push(entry.column);
            matrix.values.push(entry.value);
        }

        Ok(matrix)
    }

    fn reserve_exact(&mut self, entries: usize) -> GdistResult<()> {
        let failed = |_| GdistError::AllocationFailure { entries };
        self.rows.try_reserve_exact(entries).map_err(failed)?;
        self.columns.try_reserve_exact(entries).map_err(failed)?;
        self.values.try_reserve_exact(entries).map_err(failed)?;
        Ok(())
    }

    /// Number of rows (and columns).
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> usize {
        self.shape
    }

    /// Number of stored entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the matrix stores no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Row index of every entry.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Column index of every entry.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// Value of every entry.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over stored entries.
    pub fn iter(&self) -> impl Iterator<Item = SparseEntry> + '_ {
        self.rows
            .iter()
            .zip(&self.columns)
            .zip(&self.values)
            .map(|((&row, &column), &value)| SparseEntry { row, column, value })
    }

    /// Look up a stored entry.
    ///
    /// This is a linear scan; entries are not kept in any searchable order.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.iter()
            .find(|e| e.row == row && e.column == column)
            .map(|e| e.value)
    }

    /// Largest stored value, or `None` for an empty matrix.
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.values.iter().copied().max_by(f64::total_cmp)
    }

    /// Copy with entries in row-major order.
    #[must_use]
    pub fn sorted(&self) -> Self {
        let mut entries: Vec<SparseEntry> = self.iter().collect();
        entries.sort_by_key(|e| (e.row, e.column));
        self.rebuild(entries)
    }

    /// Copy with rows and columns swapped.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self {
            shape: self.shape,
            rows: self.columns.clone(),
            columns: self.rows.clone(),
            values: self.values.clone(),
        }
    }

    fn rebuild(&self, entries: Vec<SparseEntry>) -> Self {
        let mut matrix = Self::new(self.shape);
        for e in entries {
            matrix.rows.push(e.row);
            matrix.columns.push(e.column);
            matrix.values.push(e.value);
        }
        matrix
    }

    /// Expand to a dense row-major matrix, with `0.0` where nothing is stored.
    ///
    /// Entries outside `shape × shape` are left out.
    #[must_use]
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        let mut dense = vec![vec![0.0; self.shape]; self.shape];
        for e in self.iter() {
            if let Some(slot) = dense.get_mut(e.row).and_then(|row| row.get_mut(e.column)) {
                *slot = e.value;
            }
        }
        dense
    }

    /// Pack into one flat array `[rows…, columns…, values…]` of length `3·len`.
    ///
    /// Indices are stored as `f64`, which is exact for any realistic mesh.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_packed(&self) -> Vec<f64> {
        let mut packed = Vec::with_capacity(3 * self.len());
        packed.extend(self.rows.iter().map(|&r| r as f64));
        packed.extend(self.columns.iter().map(|&c| c as f64));
        packed.extend_from_slice(&self.values);
        packed
    }

    /// Split into `(rows, columns, values)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<usize>, Vec<usize>, Vec<f64>) {
        (self.rows, self.columns, self.values)
    }
}
