//! Shared helpers for erosion bookkeeping

use crate::tilemap::Heightmap;

/// Per-run height accounting between two snapshots of the same grid.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeightDelta {
    /// Sum of height lost over all cells that went down
    pub eroded: f64,
    /// Sum of height gained over all cells that went up
    pub deposited: f64,
    pub max_erosion: f32,
    pub max_deposition: f32,
    pub cells_changed: usize,
}

/// Compare `after` against `before` cell by cell.
///
/// Both grids must share dimensions; callers snapshot `before` from the
/// same map they then mutate.
pub fn height_delta(before: &Heightmap, after: &Heightmap) -> HeightDelta {
    debug_assert_eq!(before.dims(), after.dims());

    let mut delta = HeightDelta::default();
    for (&b, &a) in before.as_slice().iter().zip(after.as_slice()) {
        let change = a - b;
        if change < 0.0 {
            delta.eroded += -change as f64;
            delta.max_erosion = delta.max_erosion.max(-change);
        } else if change > 0.0 {
            delta.deposited += change as f64;
            delta.max_deposition = delta.max_deposition.max(change);
        } else {
            continue;
        }
        delta.cells_changed += 1;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_delta() {
        let before = Heightmap::new_with(3, 3, 0.5);
        let mut after = before.clone();
        after.set(0, 0, 0.25);
        after.set(1, 1, 0.75);
        after.set(2, 2, 0.625);

        let delta = height_delta(&before, &after);
        assert_eq!(delta.cells_changed, 3);
        assert!((delta.eroded - 0.25).abs() < 1e-9);
        assert!((delta.deposited - 0.375).abs() < 1e-9);
        assert_eq!(delta.max_erosion, 0.25);
        assert_eq!(delta.max_deposition, 0.25);
    }

    #[test]
    fn test_height_delta_unchanged() {
        let map = Heightmap::new_with(4, 4, 1.0);
        assert_eq!(height_delta(&map, &map), HeightDelta::default());
    }
}
