//! Cube-coordinate helpers for D-dimensional grids of side N.
//!
//! A cube coordinate is the linear index `Σ coords[axis] * N^axis`, so axis 0
//! varies fastest. Grids passed to these helpers are in cube order (see
//! [`crate::topology::Topology::to_cube_order`]).

/// Cell value. Sums of a full line stay far below `i64::MAX` for every grid
/// that passes topology validation.
pub type Value = i64;

/// Returns `N^axis` for every axis.
pub fn dimension_scales(side_length: usize, dimensionality: usize) -> Vec<usize> {
    (0..dimensionality)
        .map(|axis| side_length.pow(axis as u32))
        .collect()
}

/// The sum every full line of a magic hypercube must reach:
/// `(N^(D+1) + N) / 2`. Returns `None` on overflow.
pub fn magic_constant(side_length: usize, dimensionality: usize) -> Option<Value> {
    let n = Value::try_from(side_length).ok()?;
    let exponent = u32::try_from(dimensionality + 1).ok()?;
    n.checked_pow(exponent)?.checked_add(n).map(|sum| sum / 2)
}

/// Converts per-axis coordinates to a cube coordinate.
#[cfg(test)]
fn coords_to_index(coords: &[usize], side_length: usize) -> usize {
    let mut index = 0;
    let mut scale = 1;
    for &coord in coords {
        index += coord * scale;
        scale *= side_length;
    }
    index
}

/// Converts a cube coordinate to per-axis coordinates.
#[inline]
pub fn index_to_coords(mut index: usize, dimensionality: usize, side_length: usize) -> Vec<usize> {
    let mut coords = Vec::with_capacity(dimensionality);
    for _ in 0..dimensionality {
        coords.push(index % side_length);
        index /= side_length;
    }
    coords
}

/// Every axis-parallel line of the grid, as lists of cube coordinates.
pub fn axis_lines(side_length: usize, dimensionality: usize) -> Vec<Vec<usize>> {
    let scales = dimension_scales(side_length, dimensionality);
    let cell_count = side_length.pow(dimensionality as u32);
    let mut lines = Vec::with_capacity(dimensionality * cell_count / side_length.max(1));

    for (axis, &scale) in scales.iter().enumerate() {
        for start in 0..cell_count {
            if index_to_coords(start, dimensionality, side_length)[axis] != 0 {
                continue;
            }
            lines.push((0..side_length).map(|k| start + k * scale).collect());
        }
    }

    lines
}

/// Checks that `grid` holds `1..=N^D` exactly once and that every
/// axis-parallel line sums to the magic constant.
pub fn is_magic(grid: &[Value], side_length: usize, dimensionality: usize) -> bool {
    let Some(target) = magic_constant(side_length, dimensionality) else {
        return false;
    };
    let cell_count = side_length.pow(dimensionality as u32);
    if grid.len() != cell_count {
        return false;
    }

    let mut seen = vec![false; cell_count];
    for &value in grid {
        match usize::try_from(value) {
            Ok(v) if (1..=cell_count).contains(&v) && !seen[v - 1] => seen[v - 1] = true,
            _ => return false,
        }
    }

    axis_lines(side_length, dimensionality)
        .iter()
        .all(|line| line.iter().map(|&cell| grid[cell]).sum::<Value>() == target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_constant() {
        assert_eq!(magic_constant(3, 2), Some(15));
        assert_eq!(magic_constant(3, 3), Some(42));
        assert_eq!(magic_constant(4, 2), Some(34));
        assert_eq!(magic_constant(1, 2), Some(1));
        assert_eq!(magic_constant(1000, 10), None);
    }

    #[test]
    fn test_coordinate_conversion_roundtrip_3x3x3() {
        for idx in 0..27 {
            let coords = index_to_coords(idx, 3, 3);
            assert!(coords.iter().all(|&c| c < 3));
            assert_eq!(coords_to_index(&coords, 3), idx, "Roundtrip failed for index {idx}");
        }
    }

    #[test]
    fn test_axis_zero_varies_fastest() {
        assert_eq!(index_to_coords(1, 2, 4), vec![1, 0]);
        assert_eq!(index_to_coords(4, 2, 4), vec![0, 1]);
        assert_eq!(dimension_scales(4, 3), vec![1, 4, 16]);
    }

    #[test]
    fn test_axis_lines_cover_each_cell_once_per_axis() {
        let lines = axis_lines(3, 3);
        assert_eq!(lines.len(), 27);
        let mut hits = [0usize; 27];
        for line in &lines {
            assert_eq!(line.len(), 3);
            for &cell in line {
                hits[cell] += 1;
            }
        }
        assert!(hits.iter().all(|&h| h == 3));
    }

    #[test]
    fn test_is_magic_accepts_semi_magic_square() {
        // rows and columns sum to 15, diagonals are not constrained
        let grid = [1, 9, 5, 8, 4, 3, 6, 2, 7];
        assert!(is_magic(&grid, 3, 2));
    }

    #[test]
    fn test_is_magic_rejects_bad_grids() {
        assert!(!is_magic(&[1, 2, 3, 4, 5, 6, 7, 8, 9], 3, 2));
        // right sums, repeated value
        assert!(!is_magic(&[5, 5, 5, 5, 5, 5, 5, 5, 5], 3, 2));
        assert!(!is_magic(&[1, 9, 5], 3, 2));
    }
}
