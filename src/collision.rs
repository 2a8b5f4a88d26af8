//! Static collision geometry: solid tiles of a layer compacted into rectangles.
//!
//! The compactor is a greedy, single pass over the grid in row-major order. At
//! each solid cell not yet covered it locks in the widest run to the right, then
//! grows that run downward while every cell below it is still free. Width is
//! chosen before height, so wide rectangles are favoured over tall ones.

use crate::error::MapError;
use crate::map::{TileType, Tilemap};
use macroquad::math::{vec2, IVec2, Rect, Vec2};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_SOLID_TYPES: [TileType; 4] = [
    TileType::Wall,
    TileType::Border,
    TileType::Collision,
    TileType::Table,
];

/// Which tiles of a layer block movement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolidRule {
    /// Every non-empty tile is solid.
    AnyTile,
    /// Non-empty tiles whose resolved type is listed.
    Types(Vec<TileType>),
}

impl Default for SolidRule {
    fn default() -> Self {
        SolidRule::Types(DEFAULT_SOLID_TYPES.to_vec())
    }
}

impl SolidRule {
    pub fn is_solid(&self, map: &Tilemap, layer: usize, x: i32, y: i32) -> bool {
        let Some(gid) = map.layer(layer).and_then(|l| l.get(x, y)) else {
            return false;
        };
        if gid.is_empty() {
            return false;
        }
        match self {
            SolidRule::AnyTile => true,
            SolidRule::Types(types) => types.contains(&map.tile_type(layer, x, y)),
        }
    }
}

/// Greedy scan shared by the counting and filling passes. Calls `emit(x, y, w, h)`
/// once per rectangle, in row-major order of the top-left corner.
fn scan<S, E>(width: usize, height: usize, is_solid: S, mut emit: E)
where
    S: Fn(usize, usize) -> bool,
    E: FnMut(usize, usize, usize, usize),
{
    let mut visited = vec![false; width * height];
    let free = |visited: &[bool], x: usize, y: usize| !visited[y * width + x] && is_solid(x, y);

    for y in 0..height {
        for x in 0..width {
            if !free(&visited, x, y) {
                continue;
            }

            let mut w = 1;
            while x + w < width && free(&visited, x + w, y) {
                w += 1;
            }

            let mut h = 1;
            while y + h < height && (x..x + w).all(|cx| free(&visited, cx, y + h)) {
                h += 1;
            }

            for row in y..y + h {
                visited[row * width + x..row * width + x + w].fill(true);
            }
            emit(x, y, w, h);
        }
    }
}

/// Dry run of [`compact`]: the number of rectangles it would produce.
pub fn count_rects(width: usize, height: usize, is_solid: impl Fn(usize, usize) -> bool) -> usize {
    let mut count = 0;
    scan(width, height, is_solid, |_, _, _, _| count += 1);
    count
}

/// Covers every solid cell of a `width x height` grid with non-overlapping
/// rectangles in pixel space.
pub fn compact(
    width: usize,
    height: usize,
    tile: Vec2,
    is_solid: impl Fn(usize, usize) -> bool,
) -> Vec<Rect> {
    let mut rects = Vec::new();
    scan(width, height, is_solid, |x, y, w, h| {
        rects.push(Rect::new(
            x as f32 * tile.x,
            y as f32 * tile.y,
            w as f32 * tile.x,
            h as f32 * tile.y,
        ));
    });
    rects
}

/// Collision rectangles derived from one tile layer.
#[derive(Debug, Clone, Default)]
pub struct CollisionSet {
    pub layer: usize,
    pub rects: Vec<Rect>,
}

impl CollisionSet {
    pub fn from_layer(map: &Tilemap, layer: usize, rule: &SolidRule) -> Result<Self, MapError> {
        let tiles = map.layer(layer).ok_or(MapError::LayerOutOfRange {
            index: layer,
            count: map.layer_count(),
        })?;
        let (w, h) = (tiles.width, tiles.height);
        let solid = |x: usize, y: usize| rule.is_solid(map, layer, x as i32, y as i32);

        let count = count_rects(w, h, solid);
        let mut rects = Vec::with_capacity(count);
        rects.extend(compact(w, h, vec2(map.tile_w as f32, map.tile_h as f32), solid));
        debug_assert_eq!(rects.len(), count);

        debug!(layer, rects = rects.len(), "built collision set");
        Ok(Self { layer, rects })
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.rects.iter().any(|r| r.contains(point))
    }
}

/// Whether the centre of `tile` lies inside any rectangle of any set.
pub fn is_tile_blocked(sets: &[CollisionSet], tile: IVec2, tile_size: Vec2) -> bool {
    let centre = tile.as_vec2() * tile_size + tile_size * 0.5;
    sets.iter().any(|s| s.contains_point(centre))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{TileLayer, Tileset};
    use macroquad::math::ivec2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TILE: Vec2 = Vec2::new(32.0, 32.0);

    fn grid_from(rows: &[&str]) -> (usize, usize, Vec<bool>) {
        let h = rows.len();
        let w = rows[0].len();
        let cells = rows
            .iter()
            .flat_map(|r| r.bytes().map(|b| b == b'#'))
            .collect();
        (w, h, cells)
    }

    /// Asserts every solid cell is covered exactly once and no empty cell is covered.
    fn assert_exact_cover(w: usize, h: usize, cells: &[bool], rects: &[Rect]) {
        let mut hits = vec![0u32; w * h];
        for r in rects {
            let x0 = (r.x / TILE.x) as usize;
            let y0 = (r.y / TILE.y) as usize;
            let x1 = ((r.x + r.w) / TILE.x) as usize;
            let y1 = ((r.y + r.h) / TILE.y) as usize;
            for y in y0..y1 {
                for x in x0..x1 {
                    hits[y * w + x] += 1;
                }
            }
        }
        for i in 0..w * h {
            let expected = u32::from(cells[i]);
            assert_eq!(hits[i], expected, "cell ({}, {})", i % w, i / w);
        }
    }

    #[test]
    fn full_grid_with_one_hole_excludes_the_hole() {
        let mut cells = vec![true; 100];
        cells[5 * 10 + 5] = false;
        let rects = compact(10, 10, TILE, |x, y| cells[y * 10 + x]);

        assert_exact_cover(10, 10, &cells, &rects);
        let hole = vec2(5.5 * 32.0, 5.5 * 32.0);
        assert!(rects.iter().all(|r| !r.contains(hole)));
        let area: f32 = rects.iter().map(|r| r.w * r.h).sum();
        assert_eq!(area, 99.0 * 32.0 * 32.0);
    }

    #[test]
    fn width_is_locked_before_height() {
        let (w, h, cells) = grid_from(&[
            "###", //
            "#..",
            "#..",
        ]);
        let rects = compact(w, h, TILE, |x, y| cells[y * w + x]);
        assert_eq!(
            rects,
            vec![
                Rect::new(0.0, 0.0, 96.0, 32.0),
                Rect::new(0.0, 32.0, 32.0, 64.0),
            ]
        );
    }

    #[test]
    fn grows_down_then_fills_leftovers() {
        let (w, h, cells) = grid_from(&[
            ".##.", //
            ".##.",
            "####",
        ]);
        let rects = compact(w, h, TILE, |x, y| cells[y * w + x]);
        assert_eq!(
            rects,
            vec![
                Rect::new(32.0, 0.0, 64.0, 96.0),
                Rect::new(0.0, 64.0, 32.0, 32.0),
                Rect::new(96.0, 64.0, 32.0, 32.0),
            ]
        );
    }

    #[test]
    fn empty_grid_yields_no_rects() {
        assert!(compact(4, 4, TILE, |_, _| false).is_empty());
        assert_eq!(count_rects(4, 4, |_, _| false), 0);
        assert!(compact(0, 0, TILE, |_, _| true).is_empty());
    }

    #[test]
    fn random_grids_are_covered_exactly_and_deterministically() {
        let mut rng = StdRng::seed_from_u64(0x7115);
        for _ in 0..50 {
            let w = rng.gen_range(1..20);
            let h = rng.gen_range(1..20);
            let density = rng.gen_range(0.1..0.9);
            let cells: Vec<bool> = (0..w * h).map(|_| rng.gen_bool(density)).collect();
            let solid = |x: usize, y: usize| cells[y * w + x];

            let rects = compact(w, h, TILE, solid);
            assert_exact_cover(w, h, &cells, &rects);
            assert_eq!(count_rects(w, h, solid), rects.len());
            assert_eq!(compact(w, h, TILE, solid), rects);
        }
    }

    fn map_with_layers(layers: Vec<Vec<u32>>) -> Tilemap {
        let tiles = Tileset {
            first_gid: 1,
            image: "tiles.png".into(),
            tile_types: [(0, TileType::Ground), (1, TileType::Wall), (2, TileType::Table)]
                .into_iter()
                .collect(),
            columns: Some(4),
        };
        let layers = layers
            .into_iter()
            .enumerate()
            .map(|(i, data)| TileLayer {
                name: format!("layer{i}"),
                width: 3,
                height: 2,
                visible: true,
                data,
            })
            .collect();
        Tilemap::new(3, 2, 32, 32, vec![tiles], layers)
    }

    #[test]
    fn from_layer_applies_the_solid_rule() {
        // ground, wall, table / ground, wall, empty
        let map = map_with_layers(vec![vec![1, 2, 3, 1, 2, 0]]);

        let typed = CollisionSet::from_layer(&map, 0, &SolidRule::default()).unwrap();
        assert_eq!(
            typed.rects,
            vec![
                Rect::new(32.0, 0.0, 64.0, 32.0),
                Rect::new(32.0, 32.0, 32.0, 32.0),
            ]
        );

        let walls_only =
            CollisionSet::from_layer(&map, 0, &SolidRule::Types(vec![TileType::Wall])).unwrap();
        assert_eq!(walls_only.rects, vec![Rect::new(32.0, 0.0, 32.0, 64.0)]);

        let any = CollisionSet::from_layer(&map, 0, &SolidRule::AnyTile).unwrap();
        assert_eq!(
            any.rects,
            vec![
                Rect::new(0.0, 0.0, 96.0, 32.0),
                Rect::new(0.0, 32.0, 64.0, 32.0),
            ]
        );
    }

    #[test]
    fn from_layer_rejects_missing_layer() {
        let map = map_with_layers(vec![vec![0; 6]]);
        let err = CollisionSet::from_layer(&map, 3, &SolidRule::AnyTile).unwrap_err();
        assert!(matches!(err, MapError::LayerOutOfRange { index: 3, count: 1 }));
    }

    #[test]
    fn blocked_tiles_are_tested_at_their_centre() {
        let map = map_with_layers(vec![vec![0, 2, 0, 0, 0, 0], vec![0, 0, 0, 0, 0, 2]]);
        let sets = [
            CollisionSet::from_layer(&map, 0, &SolidRule::AnyTile).unwrap(),
            CollisionSet::from_layer(&map, 1, &SolidRule::AnyTile).unwrap(),
        ];
        assert!(is_tile_blocked(&sets, ivec2(1, 0), TILE));
        assert!(is_tile_blocked(&sets, ivec2(2, 1), TILE));
        assert!(!is_tile_blocked(&sets, ivec2(0, 0), TILE));
        assert!(!is_tile_blocked(&sets, ivec2(-1, 0), TILE));
        assert!(!is_tile_blocked(&[], ivec2(1, 0), TILE));
    }
}
