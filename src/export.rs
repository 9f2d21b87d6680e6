//! PNG export of heightmaps and shape debug views.

use image::{ImageBuffer, Rgb, RgbImage};

use crate::grid::Grid;
use crate::noise::NoiseSource;
use crate::shape::{RadialShape, Vec2};
use crate::terrain::{ShapeRole, TerrainGenerator};

/// Export a heightmap as a grayscale PNG.
/// Values at or above 1.0 saturate to white.
pub fn export_heightmap_gray(
    heightmap: &Grid<f32>,
    path: &str,
) -> Result<(), image::ImageError> {
    let mut img: RgbImage =
        ImageBuffer::new(heightmap.width as u32, heightmap.height as u32);

    for (x, y, &value) in heightmap.iter() {
        let level = (value * 255.0).clamp(0.0, 255.0) as u8;
        img.put_pixel(x as u32, y as u32, Rgb([level, level, level]));
    }

    img.save(path)
}

/// Export a heightmap with an island color ramp (water, sand, vegetation,
/// rock, snow). Values are expected to be nominally in 0.0-1.0.
pub fn export_heightmap_colored(
    heightmap: &Grid<f32>,
    path: &str,
) -> Result<(), image::ImageError> {
    let mut img: RgbImage =
        ImageBuffer::new(heightmap.width as u32, heightmap.height as u32);

    for (x, y, &value) in heightmap.iter() {
        let color = island_colormap(value.clamp(0.0, 1.0));
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }

    img.save(path)
}

/// Island colormap: deep water -> shallows -> sand -> grass -> forest -> rock -> snow
fn island_colormap(t: f32) -> [u8; 3] {
    let stops: [(f32, [f32; 3]); 7] = [
        (0.00, [0.09, 0.22, 0.42]), // Deep water
        (0.02, [0.18, 0.42, 0.62]), // Shallows
        (0.06, [0.93, 0.87, 0.69]), // Sand
        (0.18, [0.42, 0.60, 0.33]), // Grass
        (0.42, [0.24, 0.39, 0.21]), // Forest
        (0.68, [0.49, 0.46, 0.43]), // Bare rock
        (1.00, [0.95, 0.95, 0.97]), // Snow
    ];

    let mut lower = stops[0];
    let mut upper = stops[stops.len() - 1];
    for window in stops.windows(2) {
        if t >= window[0].0 && t <= window[1].0 {
            lower = window[0];
            upper = window[1];
            break;
        }
    }

    let span = (upper.0 - lower.0).max(1e-6);
    let frac = ((t - lower.0) / span).clamp(0.0, 1.0);

    [
        ((lower.1[0] + (upper.1[0] - lower.1[0]) * frac) * 255.0) as u8,
        ((lower.1[1] + (upper.1[1] - lower.1[1]) * frac) * 255.0) as u8,
        ((lower.1[2] + (upper.1[2] - lower.1[2]) * frac) * 255.0) as u8,
    ]
}

/// Export one shape's distance field as grayscale, sampled over a grid with
/// the same centered coordinate frame terrain generation uses.
pub fn export_distance_field(
    shape: &RadialShape,
    width: usize,
    height: usize,
    path: &str,
) -> Result<(), image::ImageError> {
    let mut img: RgbImage = ImageBuffer::new(width as u32, height as u32);
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    for y in 0..height {
        for x in 0..width {
            let value = shape.distance_field(x as f32 - center_x, y as f32 - center_y);
            let level = (value * 255.0) as u8;
            img.put_pixel(x as u32, y as u32, Rgb([level, level, level]));
        }
    }

    img.save(path)
}

/// Export all shape outlines over a black background: the island in white,
/// mountain ranges in red.
pub fn export_shape_overlay<N: NoiseSource>(
    generator: &TerrainGenerator<N>,
    width: usize,
    height: usize,
    path: &str,
) -> Result<(), image::ImageError> {
    let mut img: RgbImage = ImageBuffer::new(width as u32, height as u32);
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    for (role, shape) in generator.shapes() {
        let color = match role {
            ShapeRole::Island => [255, 255, 255],
            ShapeRole::MountainRange => [255, 64, 64],
        };
        draw_shape_outline(&mut img, shape, center_x, center_y, color);
    }

    img.save(path)
}

/// Draw a shape's polygon outline onto an image. Shape vertices are local to
/// the shape center, which itself is local to the grid center.
fn draw_shape_outline(
    img: &mut RgbImage,
    shape: &RadialShape,
    center_x: f32,
    center_y: f32,
    color: [u8; 3],
) {
    let vertices: Vec<Vec2> = (0..shape.vertex_count())
        .filter_map(|i| shape.vertex(i))
        .collect();
    if vertices.is_empty() {
        return;
    }

    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        draw_line(
            img,
            a.x + shape.center().x + center_x,
            a.y + shape.center().y + center_y,
            b.x + shape.center().x + center_x,
            b.y + shape.center().y + center_y,
            color,
        );
    }
}

fn draw_line(img: &mut RgbImage, x0: f32, y0: f32, x1: f32, y1: f32, color: [u8; 3]) {
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let x = x0 + (x1 - x0) * t;
        let y = y0 + (y1 - y0) * t;
        if x >= 0.0 && y >= 0.0 && (x as u32) < img.width() && (y as u32) < img.height() {
            img.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }
}
