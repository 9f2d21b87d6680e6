//! Radial shape primitive
//!
//! A closed polygon sampled at uniform angular steps with randomly distorted
//! per-vertex radii. The shape answers distance-field queries: how far inside
//! the shape a point lies, as a normalized radius ratio. Terrain generation
//! uses these fields as spatial masks for the island silhouette and for
//! mountain range placement.

use std::f32::consts::{PI, TAU};

use rand::Rng;

/// A 2D vector / point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 1e-6 {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::ZERO
        }
    }
}

/// A closed polygon with vertices at uniform angular spacing and randomized
/// radii, usable as a continuous radial distance field.
///
/// Vertex `i` (of `n`) sits at angle `2π·i/n` from the shape center at radius
/// `base_radius + U(-max_distortion, max_distortion)`. A duplicate of vertex 0
/// is appended to close the loop. Only radii are perturbed, never angles, so
/// the bracketing segment for any query angle is found by integer division.
///
/// The shape is immutable once built; regeneration replaces it wholesale.
pub struct RadialShape {
    /// Vertex positions relative to `center`, length `n + 1` (closed loop).
    vertices: Vec<Vec2>,
    /// Shape center in world space.
    center: Vec2,
    min_radius: f32,
    max_radius: f32,
}

impl RadialShape {
    /// Build a shape from `num_vertices` randomly distorted radii.
    ///
    /// Panics if `num_vertices < 3`.
    pub fn build(
        num_vertices: usize,
        base_radius: f32,
        max_distortion: f32,
        center: Vec2,
        rng: &mut impl Rng,
    ) -> Self {
        assert!(num_vertices >= 3, "a radial shape needs at least 3 vertices");

        let mut vertices = Vec::with_capacity(num_vertices + 1);
        let mut min_radius = base_radius;
        let mut max_radius = base_radius;

        for i in 0..num_vertices {
            let angle = (TAU * i as f32) / num_vertices as f32;
            let distortion = if max_distortion > 0.0 {
                rng.gen_range(-max_distortion..max_distortion)
            } else {
                0.0
            };
            let radius = base_radius + distortion;

            vertices.push(Vec2::new(angle.cos() * radius, angle.sin() * radius));

            min_radius = min_radius.min(radius);
            max_radius = max_radius.max(radius);
        }

        // Close the loop so the last segment has an explicit end vertex.
        vertices.push(vertices[0]);

        Self {
            vertices,
            center,
            min_radius,
            max_radius,
        }
    }

    /// Number of distinct vertices (the closing duplicate is not counted).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Vertex position relative to the shape center, or `None` when the index
    /// is out of range. Debug/overlay code probes indices opportunistically.
    pub fn vertex(&self, index: usize) -> Option<Vec2> {
        if index < self.vertices.len() - 1 {
            Some(self.vertices[index])
        } else {
            None
        }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn min_radius(&self) -> f32 {
        self.min_radius
    }

    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    /// Normalized field value at a world-space point.
    ///
    /// Returns 1.0 at the shape center, 0.0 at or beyond the interpolated
    /// boundary, and a smooth falloff in between. This is a radius ratio, not
    /// a Euclidean distance: equal-value contours are not equally spaced in
    /// world units when the boundary is strongly distorted.
    pub fn distance_field(&self, x: f32, y: f32) -> f32 {
        let lx = x - self.center.x;
        let ly = y - self.center.y;

        let mut angle = ly.atan2(lx);
        if angle < 0.0 {
            angle += TAU;
        }
        // atan2 rounding can land exactly on 2π; fold it back so the
        // bracket index stays in range.
        if angle >= TAU {
            angle -= TAU;
        }

        let expected_radius = self.interpolated_radius(angle);
        if expected_radius <= f32::EPSILON {
            return 0.0;
        }

        let actual_radius = (lx * lx + ly * ly).sqrt();
        (1.0 - actual_radius / expected_radius).clamp(0.0, 1.0)
    }

    /// Boundary radius at an angle in `[0, 2π)`, smoothly interpolated
    /// between the two bracketing vertices.
    fn interpolated_radius(&self, angle: f32) -> f32 {
        let (v1, v2) = self.bracketing_vertices(angle);

        let r1 = v1.length();
        let r2 = v2.length();

        let mut a1 = v1.y.atan2(v1.x);
        if a1 < 0.0 {
            a1 += TAU;
        }
        let mut a2 = v2.y.atan2(v2.x);
        if a2 < 0.0 {
            a2 += TAU;
        }
        // The last segment wraps past 2π; unwrap its end angle forward.
        if a2 < a1 {
            a2 += TAU;
        }

        let span = a2 - a1;
        if span <= f32::EPSILON {
            return r1;
        }

        // Raised-cosine ease keeps the radius C1-continuous across vertex
        // boundaries even though vertex radii are independently random.
        let t = (angle - a1) / span;
        let t = 0.5 - (t * PI).cos() * 0.5;

        r1 + (r2 - r1) * t
    }

    /// The two adjacent vertices whose angular range contains `angle`.
    fn bracketing_vertices(&self, angle: f32) -> (Vec2, Vec2) {
        let n = self.vertices.len() - 1;
        let segment_angle = TAU / n as f32;
        let index = ((angle / segment_angle) as usize).min(n - 1);
        (self.vertices[index], self.vertices[index + 1])
    }
}
