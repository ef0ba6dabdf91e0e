//! PNG rasterization of scatter results for the example binaries.
use std::path::Path;

use glam::Vec2;
use image::{Rgb, RgbImage};
use terrain_scatter::prelude::{FnSink, ScatterEvent, ScatterPoint, ScatterZone};

/// How one layer of points is drawn.
#[derive(Debug, Clone, Copy)]
pub struct PointStyle {
    pub color: [u8; 3],
    /// Disk radius in pixels.
    pub radius: u32,
    /// Scale the radius by each point's `scale`.
    pub scale_with_point: bool,
}

impl PointStyle {
    pub fn new(color: [u8; 3], radius: u32) -> Self {
        Self {
            color,
            radius,
            scale_with_point: false,
        }
    }

    pub fn scaled(mut self) -> Self {
        self.scale_with_point = true;
        self
    }
}

/// A set of points drawn with one style.
pub struct PointLayer<'a> {
    pub points: &'a [ScatterPoint],
    pub style: PointStyle,
}

impl<'a> PointLayer<'a> {
    pub fn new(points: &'a [ScatterPoint], style: PointStyle) -> Self {
        Self { points, style }
    }
}

/// Maps a zone's horizontal bounds onto an image.
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub min: Vec2,
    pub max: Vec2,
    pub background: [u8; 3],
    /// Optional background shading from a height function and its value range.
    pub shading: Option<(Box<dyn Fn(f32, f32) -> f32>, f32, f32)>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), zone: &ScatterZone) -> Self {
        let (min, max) = zone.bounds();
        Self {
            image_size,
            min,
            max,
            background: [230, 230, 230],
            shading: None,
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    /// Darkens the background where `height(x, z)` is low within `[low, high]`.
    pub fn with_height_shading(
        mut self,
        height: impl Fn(f32, f32) -> f32 + 'static,
        low: f32,
        high: f32,
    ) -> Self {
        self.shading = Some((Box::new(height), low, high));
        self
    }

    fn to_pixel(&self, xz: Vec2) -> (i64, i64) {
        let (w, h) = self.image_size;
        let t = (xz - self.min) / (self.max - self.min).max(Vec2::splat(f32::EPSILON));
        ((t.x * w as f32) as i64, (t.y * h as f32) as i64)
    }

    fn to_world(&self, px: u32, py: u32) -> Vec2 {
        let (w, h) = self.image_size;
        let t = Vec2::new(
            (px as f32 + 0.5) / w as f32,
            (py as f32 + 0.5) / h as f32,
        );
        self.min + t * (self.max - self.min)
    }
}

/// Renders several layers in order onto one image.
pub fn render_layers_to_png(
    layers: &[PointLayer<'_>],
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = config.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(config.background));

    if let Some((height, low, high)) = &config.shading {
        let span = (high - low).max(f32::EPSILON);
        for py in 0..h {
            for px in 0..w {
                let p = config.to_world(px, py);
                let t = ((height(p.x, p.y) - low) / span).clamp(0.0, 1.0);
                let shade = 0.55 + 0.45 * t;
                let [r, g, b] = config.background;
                img.put_pixel(
                    px,
                    py,
                    Rgb([
                        (r as f32 * shade) as u8,
                        (g as f32 * shade) as u8,
                        (b as f32 * shade) as u8,
                    ]),
                );
            }
        }
    }

    for layer in layers {
        for point in layer.points {
            let radius = if layer.style.scale_with_point {
                (layer.style.radius as f32 * point.scale).round().max(1.0) as i64
            } else {
                layer.style.radius as i64
            };
            let (cx, cy) = config.to_pixel(point.xz());
            draw_disk(&mut img, cx, cy, radius, layer.style.color);
        }
    }

    img.save(path.as_ref())?;
    println!("Wrote {}", path.as_ref().display());
    Ok(())
}

/// Renders one point set with one style.
pub fn render_points_to_png(
    points: &[ScatterPoint],
    style: PointStyle,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    render_layers_to_png(&[PointLayer::new(points, style)], config, path)
}

/// Sink printing every event on stderr.
pub fn event_printer() -> FnSink<impl FnMut(ScatterEvent)> {
    FnSink::new(|event| eprintln!("[scatter] {event:?}"))
}

fn draw_disk(img: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: [u8; 3]) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x >= 0 && y >= 0 && x < w && y < h {
                img.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
    }
}
