//! Water feature detection and lake removal
//!
//! Groups connected underwater cells into features, classifies them as
//! ocean (touching the map border) or lake, and fills in all but the largest
//! few so that an island keeps its sea without scattered inland ponds.

use std::collections::BTreeSet;

use crate::hull::{convex_hull, Point2};
use crate::tilemap::{Heightmap, Tilemap};

/// How far above the water line removed lakes are raised.
pub const LAKE_FILL_MARGIN: f32 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureKind {
    /// Connected to the map border
    Ocean,
    /// Enclosed by land
    Lake,
}

impl FeatureKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            FeatureKind::Ocean => "Ocean",
            FeatureKind::Lake => "Lake",
        }
    }
}

/// A connected group of cells sharing a property (here: below water).
///
/// The feature owns its member cells; the border is recomputed from them on
/// demand.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainFeature {
    pub kind: FeatureKind,
    cells: BTreeSet<(usize, usize)>,
}

impl TerrainFeature {
    fn new(cells: BTreeSet<(usize, usize)>) -> Self {
        Self {
            kind: FeatureKind::Lake,
            cells,
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = &(usize, usize)> {
        self.cells.iter()
    }

    pub fn contains(&self, x: usize, z: usize) -> bool {
        self.cells.contains(&(x, z))
    }

    fn overlaps(&self, cells: &BTreeSet<(usize, usize)>) -> bool {
        cells.iter().any(|c| self.cells.contains(c))
    }

    fn absorb(&mut self, other: TerrainFeature) {
        self.cells.extend(other.cells);
    }

    /// Convex outline of the member cells, counter-clockwise.
    pub fn border(&self) -> Vec<Point2> {
        let points: Vec<Point2> = self.cells.iter().map(|&c| Point2::from(c)).collect();
        convex_hull(&points)
    }

    /// Bounding box (min_x, min_z, max_x, max_z).
    pub fn bounds(&self) -> (usize, usize, usize, usize) {
        self.cells.iter().fold(
            (usize::MAX, usize::MAX, 0, 0),
            |(min_x, min_z, max_x, max_z), &(x, z)| (min_x.min(x), min_z.min(z), max_x.max(x), max_z.max(z)),
        )
    }

    fn touches_edge(&self, width: usize, height: usize) -> bool {
        self.cells
            .iter()
            .any(|&(x, z)| x == 0 || z == 0 || x == width - 1 || z == height - 1)
    }
}

/// Find every connected region of cells below `water_height`.
///
/// Each unvisited underwater cell forms a candidate together with its
/// underwater neighbours; the candidate is merged into every feature it
/// shares a cell with. The scan over existing features makes this
/// O(features x cells), which is fine at heightmap resolutions.
pub fn find_water_features(heightmap: &Heightmap, water_height: f32) -> Vec<TerrainFeature> {
    let width = heightmap.width;
    let height = heightmap.height;
    let mut visited = Tilemap::new_with(width, height, false);
    let mut features: Vec<TerrainFeature> = Vec::new();

    for z in 0..height {
        for x in 0..width {
            if *visited.get(x, z) {
                continue;
            }
            visited.set(x, z, true);
            if *heightmap.get(x, z) >= water_height {
                continue;
            }

            let mut candidate = BTreeSet::new();
            candidate.insert((x, z));
            for (nx, nz) in heightmap.distinct_neighbors_8(x, z) {
                if *heightmap.get(nx, nz) < water_height {
                    candidate.insert((nx, nz));
                }
            }

            let (touching, rest): (Vec<_>, Vec<_>) =
                features.into_iter().partition(|f| f.overlaps(&candidate));
            features = rest;

            let mut merged = TerrainFeature::new(candidate);
            for feature in touching {
                merged.absorb(feature);
            }
            features.push(merged);
        }
    }

    for feature in &mut features {
        if feature.touches_edge(width, height) {
            feature.kind = FeatureKind::Ocean;
        }
    }
    features
}

/// Keep the `keep` largest features and fill in the rest by raising their
/// cells just above `water_height`. Returns the kept features, largest first.
pub fn keep_largest(
    heightmap: &mut Heightmap,
    mut features: Vec<TerrainFeature>,
    keep: usize,
    water_height: f32,
) -> Vec<TerrainFeature> {
    features.sort_by(|a, b| b.size().cmp(&a.size()));
    let removed = features.split_off(keep.min(features.len()));

    for feature in &removed {
        for &(x, z) in feature.cells() {
            heightmap.set(x, z, water_height + LAKE_FILL_MARGIN);
        }
    }

    tracing::debug!(
        kept = features.len(),
        removed = removed.len(),
        "filtered water features"
    );
    features
}

/// Detect water features below `water_height` and keep only the largest
/// `keep` of them.
pub fn remove_inland_lakes(heightmap: &mut Heightmap, water_height: f32, keep: usize) -> Vec<TerrainFeature> {
    let features = find_water_features(heightmap, water_height);
    let found = features.len();
    let kept = keep_largest(heightmap, features, keep, water_height);
    for feature in &kept {
        tracing::debug!(kind = feature.kind.display_name(), cells = feature.size(), "kept water feature");
    }
    tracing::info!(found, kept = kept.len(), "removed inland lakes");
    kept
}
