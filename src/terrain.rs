//! Island terrain synthesis
//!
//! Combines fractal noise with radial shape distance fields:
//! 1. A large island shape masks multi-octave noise into a bounded landmass.
//! 2. Two smaller shapes, pushed to opposite sides of the island center along
//!    one shared random axis, mark where an elongated mountain range rises.
//! 3. Near the mountain shapes, a ridge pattern oriented by the island
//!    field's gradient replaces plain noise, aligning crests with the coast.
//!
//! Generation is done once per configuration and cached; per-cell evaluation
//! is independent of neighboring cells, so rows are computed in parallel.

use std::f32::consts::TAU;

use rand::Rng;
use rayon::prelude::*;

use crate::grid::Grid;
use crate::noise::{NoiseSource, PerlinSource};
use crate::shape::{RadialShape, Vec2};

// =============================================================================
// PARAMETERS
// =============================================================================

/// Noise and compositing parameters.
///
/// Changing these does not invalidate an existing cached heightmap; call
/// [`TerrainGenerator::setup`] to rebuild.
#[derive(Clone, Debug)]
pub struct TerrainParams {
    /// Base frequency for noise sampling (lower = larger features).
    pub base_noise_scale: f32,
    /// Base noise amplitude before per-layer scaling.
    pub base_amplitude: f32,
    /// Exponent on the island field; higher values cut terrain off more
    /// sharply toward the coast.
    pub bias_strength: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            base_noise_scale: 0.01,
            base_amplitude: 0.5,
            bias_strength: 3.0,
        }
    }
}

/// Role a shape plays in terrain compositing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeRole {
    /// Masks the overall landmass; exactly one per configuration.
    Island,
    /// Contributes to the mountain influence field; any number.
    MountainRange,
}

// Island/mountain proportions relative to the configured base radius and
// distortion. The two ranges sit on opposite sides of the island center
// along one shared axis, forming a single elongated range.
const ISLAND_RADIUS_FACTOR: f32 = 0.45;
const ISLAND_DISTORTION_FACTOR: f32 = 1.2;
const RANGE1_VERTICES: usize = 12;
const RANGE1_RADIUS_FACTOR: f32 = 0.2083;
const RANGE1_DISTORTION_FACTOR: f32 = 0.25;
const RANGE1_DISTANCE: (f32, f32) = (0.01, 0.1);
const RANGE2_VERTICES: usize = 6;
const RANGE2_RADIUS_FACTOR: f32 = 0.15;
const RANGE2_DISTORTION_FACTOR: f32 = 0.1333;
const RANGE2_DISTANCE: (f32, f32) = (0.05, 0.15);

// =============================================================================
// GENERATOR
// =============================================================================

/// Generates and caches an island heightmap from radial shapes plus noise.
///
/// Lifecycle: unconfigured until [`setup`](Self::setup) is called, then dirty
/// until [`heightmap`](Self::heightmap) fills the cache. Every `setup` call
/// rebuilds all shapes and marks the cache dirty; nothing else invalidates it.
pub struct TerrainGenerator<N: NoiseSource = PerlinSource> {
    pub params: TerrainParams,
    noise: N,
    shapes: Vec<(ShapeRole, RadialShape)>,
    /// Noise-space translation, re-rolled on every setup so regenerations
    /// sample a different region of the same noise field.
    offset_x: f32,
    offset_y: f32,
    cache: Option<Grid<f32>>,
    needs_update: bool,
}

impl TerrainGenerator<PerlinSource> {
    pub fn new(seed: u32) -> Self {
        Self::with_noise(PerlinSource::new(seed))
    }
}

impl<N: NoiseSource> TerrainGenerator<N> {
    /// Create an unconfigured generator over an explicit noise source.
    pub fn with_noise(noise: N) -> Self {
        Self {
            params: TerrainParams::default(),
            noise,
            shapes: Vec::new(),
            offset_x: 0.0,
            offset_y: 0.0,
            cache: None,
            needs_update: true,
        }
    }

    /// Configure the island and its default two mountain ranges.
    ///
    /// The island gets `num_vertices` vertices at 0.45× the base radius with
    /// 1.2× the distortion, centered at the origin. Both mountain ranges are
    /// placed along a single random axis at independent random distances, one
    /// on each side of center. Marks the cached heightmap dirty.
    pub fn setup(
        &mut self,
        num_vertices: usize,
        base_radius: f32,
        max_distortion: f32,
        rng: &mut impl Rng,
    ) {
        self.shapes.clear();

        self.shapes.push((
            ShapeRole::Island,
            RadialShape::build(
                num_vertices,
                base_radius * ISLAND_RADIUS_FACTOR,
                max_distortion * ISLAND_DISTORTION_FACTOR,
                Vec2::ZERO,
                rng,
            ),
        ));

        let range_angle = rng.gen_range(0.0..TAU);
        let direction = Vec2::new(range_angle.cos(), range_angle.sin());
        let distance1 =
            rng.gen_range(base_radius * RANGE1_DISTANCE.0..base_radius * RANGE1_DISTANCE.1);
        let distance2 =
            rng.gen_range(base_radius * RANGE2_DISTANCE.0..base_radius * RANGE2_DISTANCE.1);

        self.shapes.push((
            ShapeRole::MountainRange,
            RadialShape::build(
                RANGE1_VERTICES,
                base_radius * RANGE1_RADIUS_FACTOR,
                max_distortion * RANGE1_DISTORTION_FACTOR,
                Vec2::new(direction.x * distance1, direction.y * distance1),
                rng,
            ),
        ));
        self.shapes.push((
            ShapeRole::MountainRange,
            RadialShape::build(
                RANGE2_VERTICES,
                base_radius * RANGE2_RADIUS_FACTOR,
                max_distortion * RANGE2_DISTORTION_FACTOR,
                Vec2::new(-direction.x * distance2, -direction.y * distance2),
                rng,
            ),
        ));

        self.offset_x = rng.gen_range(0.0..1000.0);
        self.offset_y = rng.gen_range(0.0..1000.0);
        self.needs_update = true;
    }

    /// All configured shapes with their roles, for debug/overlay rendering.
    pub fn shapes(&self) -> &[(ShapeRole, RadialShape)] {
        &self.shapes
    }

    /// The island shape, if configured.
    pub fn island(&self) -> Option<&RadialShape> {
        self.shapes
            .iter()
            .find(|(role, _)| *role == ShapeRole::Island)
            .map(|(_, shape)| shape)
    }

    /// True when the next [`heightmap`](Self::heightmap) call will regenerate.
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Generate a fresh `height × width` heightmap. Does not touch the cache.
    ///
    /// Values are nominally in `[0, 1]`; the `pow` bias curve can push peaks
    /// slightly above 1 at the extremes, clamping is the consumer's call.
    /// An unconfigured generator yields an all-zero grid.
    pub fn generate(&self, width: usize, height: usize) -> Grid<f32> {
        let Some(island) = self.island() else {
            return Grid::new_with(width, height, 0.0);
        };

        let center_x = width as f32 / 2.0;
        let center_y = height as f32 / 2.0;

        // Cells only read shared shape/noise state, so rows are independent.
        let rows: Vec<Vec<f32>> = (0..height)
            .into_par_iter()
            .map(|y| {
                (0..width)
                    .map(|x| self.height_at(x as f32, y as f32, center_x, center_y, island))
                    .collect()
            })
            .collect();

        Grid::from_rows(rows)
    }

    /// Cached heightmap access: regenerates only when dirty.
    pub fn heightmap(&mut self, width: usize, height: usize) -> &Grid<f32> {
        if self.needs_update || self.cache.is_none() {
            let map = self.generate(width, height);
            self.cache = Some(map);
            self.needs_update = false;
        }
        self.cache.as_ref().expect("heightmap cache populated above")
    }

    // =========================================================================
    // PER-CELL COMPOSITING
    // =========================================================================

    fn height_at(&self, x: f32, y: f32, center_x: f32, center_y: f32, island: &RadialShape) -> f32 {
        let shape_x = x - center_x;
        let shape_y = y - center_y;

        // Base terrain: fractal noise masked by the island field.
        let noise_value = self.fractal_noise(x, y, center_x, center_y);
        let bias = island.distance_field(shape_x, shape_y);
        let adjusted_bias = bias * 1.2 - 0.1;
        let base_height =
            noise_value * adjusted_bias.clamp(0.0, 1.0).powf(self.params.bias_strength);

        // Mountains: ridge-oriented noise masked by the nearest range field.
        let mountain_bias = self.mountain_influence(shape_x, shape_y);
        let adjusted_mountain_bias = (mountain_bias * 1.5).clamp(0.0, 1.0);
        let mountain_height = self.ridge_noise(x, y, island, mountain_bias)
            * adjusted_mountain_bias
            * adjusted_mountain_bias;

        // Force cells outside the slightly shrunk island boundary flat so
        // numeric noise can never raise land beyond the silhouette.
        if adjusted_bias > -0.1 {
            base_height + mountain_height * 0.8
        } else {
            0.0
        }
    }

    /// Strongest mountain field at a point (in island-local coordinates).
    fn mountain_influence(&self, x: f32, y: f32) -> f32 {
        self.shapes
            .iter()
            .filter(|(role, _)| *role == ShapeRole::MountainRange)
            .map(|(_, shape)| shape.distance_field(x, y))
            .fold(0.0, f32::max)
    }

    /// Six octaves of offset noise plus a lift toward the grid center.
    ///
    /// Note the lift couples to the grid frame, not the island placement.
    fn fractal_noise(&self, x: f32, y: f32, center_x: f32, center_y: f32) -> f32 {
        let mut total = 0.0f32;
        let mut amplitude = self.params.base_amplitude * 0.3;
        let mut scale = self.params.base_noise_scale;

        for _ in 0..6 {
            total += self.noise.sample(
                ((x + self.offset_x) * scale) as f64,
                ((y + self.offset_y) * scale) as f64,
            ) * amplitude;
            scale *= 2.0;
            amplitude *= 0.5;
        }

        let noise_value = total * 0.45 + 0.35;

        let dx = (x - center_x) / center_x;
        let dy = (y - center_y) / center_y;
        let dist_from_center = (dx * dx + dy * dy).sqrt();
        let center_boost = 0.15 * (1.0 - dist_from_center.clamp(0.0, 1.0));

        noise_value + center_boost
    }

    /// Eight octaves of un-offset noise blended with a ridge pattern aligned
    /// to the island contour, weighted by mountain proximity.
    fn ridge_noise(
        &self,
        x: f32,
        y: f32,
        island: &RadialShape,
        mountain_influence: f32,
    ) -> f32 {
        // Ridge direction: the island field gradient rotated 90°, so crests
        // run parallel to the coastline. A zero gradient collapses the ridge
        // term to zero rather than producing NaN.
        let dfdx = island.distance_field(x + 1.0, y) - island.distance_field(x - 1.0, y);
        let dfdy = island.distance_field(x, y + 1.0) - island.distance_field(x, y - 1.0);
        let perp = Vec2::new(-dfdy, dfdx).normalized();

        let projection = Vec2::new(x, y).dot(&perp) * 0.5;
        let ridge = projection.sin().abs();

        let mut total = 0.0f32;
        let mut amplitude = self.params.base_amplitude * 0.9;
        let mut scale = self.params.base_noise_scale;

        for _ in 0..8 {
            total += self
                .noise
                .sample((x * scale) as f64, (y * scale) as f64)
                * amplitude;
            scale *= 2.0;
            amplitude *= 0.5;
        }

        total * (1.0 - mountain_influence) + ridge * mountain_influence * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Flat noise field, for isolating the shape-compositing math.
    struct ConstNoise(f32);

    impl NoiseSource for ConstNoise {
        fn sample(&self, _x: f64, _y: f64) -> f32 {
            self.0
        }
    }

    fn configured(noise_value: f32, seed: u64) -> TerrainGenerator<ConstNoise> {
        let mut generator = TerrainGenerator::with_noise(ConstNoise(noise_value));
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generator.setup(8, 400.0, 0.0, &mut rng);
        generator
    }

    #[test]
    fn test_default_shape_placement() {
        let generator = configured(0.5, 1);
        let shapes = generator.shapes();

        assert_eq!(shapes.len(), 3);
        assert_eq!(shapes[0].0, ShapeRole::Island);
        assert_eq!(shapes[1].0, ShapeRole::MountainRange);
        assert_eq!(shapes[2].0, ShapeRole::MountainRange);

        // Island: 8 vertices at exactly 0.45 × 400 (zero distortion), origin.
        let island = &shapes[0].1;
        assert_eq!(island.vertex_count(), 8);
        assert_eq!(island.min_radius(), 180.0);
        assert_eq!(island.max_radius(), 180.0);
        assert_eq!(island.center(), Vec2::ZERO);

        // Ranges: 12 and 6 vertices at the fixed radius fractions.
        let range1 = &shapes[1].1;
        let range2 = &shapes[2].1;
        assert_eq!(range1.vertex_count(), 12);
        assert!((range1.min_radius() - 400.0 * 0.2083).abs() < 1e-3);
        assert_eq!(range2.vertex_count(), 6);
        assert!((range2.min_radius() - 400.0 * 0.15).abs() < 1e-3);

        // Placed on opposite sides of center along one shared axis.
        let c1 = range1.center();
        let c2 = range2.center();
        let cross = c1.x * c2.y - c1.y * c2.x;
        assert!(cross.abs() < 1e-3, "range centers not collinear: {}", cross);
        assert!(c1.dot(&c2) < 0.0, "range centers on the same side");

        let d1 = c1.length();
        let d2 = c2.length();
        assert!((4.0..40.0).contains(&d1), "range 1 distance {}", d1);
        assert!((20.0..60.0).contains(&d2), "range 2 distance {}", d2);
    }

    #[test]
    fn test_outside_island_is_flat_zero() {
        let generator = configured(1.0, 2);
        let map = generator.generate(800, 800);

        // Zero distortion: the island boundary is exactly 180 units from the
        // grid center. Everything beyond must be exactly 0.
        for (x, y, &value) in map.iter() {
            let dx = x as f32 - 400.0;
            let dy = y as f32 - 400.0;
            if (dx * dx + dy * dy).sqrt() > 181.0 {
                assert_eq!(value, 0.0, "land outside the island at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_center_height_with_flat_zero_noise() {
        // With a zero noise field the center cell reduces to the rescale
        // constant plus the full center boost: 0.35 + 0.15, times a fully
        // saturated island bias. Ridge and octave terms all vanish.
        let generator = configured(0.0, 3);
        let map = generator.generate(800, 800);

        let center = *map.get(400, 400);
        assert!(
            (center - 0.5).abs() < 1e-5,
            "center height {} != 0.5",
            center
        );
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = configured(0.7, 5).generate(64, 48);
        let b = configured(0.7, 5).generate(64, 48);
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_deterministic_with_perlin() {
        let build = || {
            let mut generator = TerrainGenerator::new(11);
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            generator.setup(8, 400.0, 100.0, &mut rng);
            generator.generate(120, 80)
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_cache_dirty_flag_lifecycle() {
        let mut generator = configured(0.4, 8);
        assert!(generator.needs_update());

        let first = generator.heightmap(32, 32).clone();
        assert!(!generator.needs_update());

        // Clean cache is reused as-is.
        let second = generator.heightmap(32, 32).clone();
        assert_eq!(first, second);

        // Reconfiguring dirties the cache again.
        let mut rng = ChaCha8Rng::seed_from_u64(999);
        generator.setup(8, 400.0, 50.0, &mut rng);
        assert!(generator.needs_update());
    }

    #[test]
    fn test_unconfigured_generator_yields_flat_grid() {
        let generator = TerrainGenerator::with_noise(ConstNoise(1.0));
        let map = generator.generate(16, 16);
        assert_eq!(map.min_max(), (0.0, 0.0));
    }

    #[test]
    fn test_island_interior_rises_above_water() {
        let generator = configured(0.5, 13);
        let map = generator.generate(800, 800);

        // The island core should be solid land well above zero.
        let mut interior_min = f32::MAX;
        for y in 380..=420 {
            for x in 380..=420 {
                interior_min = interior_min.min(*map.get(x, y));
            }
        }
        assert!(interior_min > 0.1, "island core too low: {}", interior_min);
    }

    #[test]
    fn test_heights_within_nominal_range() {
        let mut generator = TerrainGenerator::new(21);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        generator.setup(8, 400.0, 100.0, &mut rng);
        let map = generator.generate(400, 400);

        let (min, max) = map.min_max();
        assert!(min >= 0.0);
        // Mountain stacking can exceed 1, but never past the analytic bound
        // of base (≤ ~0.63) plus 0.8 × doubled ridge (≤ 1.6).
        assert!(max < 2.3, "implausible peak height {}", max);
    }
}
