//! Square grid of sampled field values

use serde::Serialize;

/// gridSize × gridSize samples. Row index is the transverse coordinate,
/// column index the longitudinal one.
///
/// Cells may be non-finite: below cutoff every sample is NaN, and that is
/// kept as-is so viewers can show the evanescent state. JSON encodes such
/// cells as `null`.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct FieldGrid {
    rows: Vec<Vec<f64>>,
}

impl FieldGrid {
    /// Build an `n` × `n` grid from a sampling function of (row, column)
    pub fn from_fn(n: usize, mut sample: impl FnMut(usize, usize) -> f64) -> Self {
        let rows = (0..n)
            .map(|i| (0..n).map(|j| sample(i, j)).collect::<Vec<f64>>())
            .collect();
        Self { rows }
    }

    /// Samples per side
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flat_map(|r| r.iter().copied())
    }

    /// True when no sample is finite (mode below cutoff)
    pub fn is_evanescent(&self) -> bool {
        self.values().all(|v| !v.is_finite())
    }

    /// Position of the first non-finite sample in row-major order
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(i, row)| {
            row.iter().position(|v| !v.is_finite()).map(|j| (i, j))
        })
    }

    /// (min, max) over finite samples, `None` if there are none
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Largest finite |sample|, 0 when there are none
    pub fn max_abs(&self) -> f64 {
        self.values()
            .filter(|v| v.is_finite())
            .fold(0.0, |acc, v| acc.max(v.abs()))
    }

    /// Bitwise equality, so that NaN cells compare equal to themselves
    pub fn bit_eq(&self, other: &FieldGrid) -> bool {
        self.size() == other.size()
            && self
                .values()
                .zip(other.values())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }

    /// Binary frame for viewers: 8-byte marker, u32 size, then row-major
    /// little-endian f32 samples. Non-finite cells stay NaN/inf.
    pub fn to_binary(&self) -> Vec<u8> {
        let n = self.size();
        let mut data = Vec::with_capacity(12 + n * n * 4);

        data.extend_from_slice(b"WGFIELD\0");
        data.extend_from_slice(&(n as u32).to_le_bytes());

        for v in self.values() {
            data.extend_from_slice(&(v as f32).to_le_bytes());
        }

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_layout() {
        let grid = FieldGrid::from_fn(3, |i, j| (i * 10 + j) as f64);
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.rows()[1], vec![10.0, 11.0, 12.0]);
        assert_eq!(grid.get(2, 1), Some(21.0));
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn test_nan_cells_serialize_as_null() {
        let grid = FieldGrid::from_fn(2, |i, _| if i == 0 { f64::NAN } else { 1.5 });
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[null,null],[1.5,1.5]]");
    }

    #[test]
    fn test_finite_statistics_skip_nan() {
        let grid = FieldGrid::from_fn(2, |i, j| match (i, j) {
            (0, 0) => f64::NAN,
            (0, 1) => -3.0,
            _ => 2.0,
        });
        assert_eq!(grid.finite_range(), Some((-3.0, 2.0)));
        assert_eq!(grid.max_abs(), 3.0);
        assert_eq!(grid.first_non_finite(), Some((0, 0)));
        assert!(!grid.is_evanescent());
    }

    #[test]
    fn test_all_nan_is_evanescent() {
        let grid = FieldGrid::from_fn(4, |_, _| f64::NAN);
        assert!(grid.is_evanescent());
        assert_eq!(grid.finite_range(), None);
        assert!(grid.bit_eq(&grid.clone()));
    }

    #[test]
    fn test_binary_frame() {
        let grid = FieldGrid::from_fn(2, |i, j| (i + j) as f64);
        let bin = grid.to_binary();
        assert_eq!(&bin[0..8], b"WGFIELD\0");
        assert_eq!(u32::from_le_bytes([bin[8], bin[9], bin[10], bin[11]]), 2);
        assert_eq!(bin.len(), 12 + 4 * 4);
        let last = f32::from_le_bytes([bin[24], bin[25], bin[26], bin[27]]);
        assert_eq!(last, 2.0);
    }
}
