//! CPU compositor: the reference renderer.
//!
//! Evaluates the full per-pixel color function on the CPU: procedural pattern
//! base, Gaussian particle splats, then gamma correction. Rows render in
//! parallel through rayon. The GPU pipeline in [`crate::gpu`] produces the
//! same picture through a fragment shader; this path exists for headless runs
//! and for tests that need to assert on actual pixels.
//!
//! Brute-force per pixel over all live particles, so keep resolutions and
//! particle counts modest when calling it every frame.

use std::path::Path;

use glam::{Vec2, Vec3};
use rayon::prelude::*;

use crate::color::gamma_encode;
use crate::error::RenderError;
use crate::params::FrameParams;
use crate::particle::Particle;
use crate::pattern;

/// A composited RGBA frame in linear-ish display space, one `[f32; 4]` per
/// pixel, rows top to bottom.
#[derive(Clone, Debug)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Frame {
    fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 1.0]; (width * height) as usize],
        }
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All pixels, row-major from the top-left.
    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// One pixel. Panics if out of bounds, like slice indexing.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Convert to tightly packed 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            for channel in pixel {
                bytes.push((channel.clamp(0.0, 1.0) * 255.0 + 0.5) as u8);
            }
        }
        bytes
    }

    /// Write the frame as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba8())
            .ok_or_else(|| RenderError::BufferMapping("frame byte length mismatch".into()))?;
        img.save(path)?;
        Ok(())
    }
}

/// Flattened view of one live particle, precomputed once per frame so the
/// per-pixel loop touches only what it needs.
#[derive(Clone, Copy)]
struct Splat {
    position: Vec2,
    rgb: Vec3,
    size: f32,
    life: f32,
}

/// Per-pixel combiner of the pattern field and the particle field.
#[derive(Clone, Copy, Debug)]
pub struct Compositor {
    /// Gaussian width factor `k` in `exp(-d^2 / (2 size^2 k))`.
    sharpness: f32,
    /// Splats are skipped beyond this many sizes from the pixel.
    cutoff: f32,
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            sharpness: 0.5,
            cutoff: 3.0,
        }
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composite one frame at the resolution carried by `params`.
    ///
    /// Dead particles (alpha at or below zero) contribute nothing. The caller
    /// hands over the particle slice only after integration has finished, so
    /// every splat reflects this frame's completed state.
    pub fn render(&self, particles: &[Particle], params: &FrameParams) -> Frame {
        let mut frame = Frame::new(params.resolution.x as u32, params.resolution.y as u32);
        let (width, height) = (frame.width, frame.height);

        let splats: Vec<Splat> = particles
            .iter()
            .filter(|p| p.is_alive() && p.size > f32::EPSILON)
            .map(|p| Splat {
                position: p.position,
                rgb: Vec3::new(p.color.x, p.color.y, p.color.z),
                size: p.size,
                life: p.life,
            })
            .collect();

        frame
            .pixels
            .par_chunks_exact_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    let coord = pixel_coord(x as u32, y as u32, width, height, params);
                    *pixel = self.shade(coord, params, &splats);
                }
            });

        frame
    }

    fn shade(&self, coord: Vec2, params: &FrameParams, splats: &[Splat]) -> [f32; 4] {
        let mut color = pattern::pattern_color(coord, params.time, params);

        for splat in splats {
            let offset = coord - splat.position;
            let reach = splat.size * self.cutoff;
            let dist_sq = offset.length_squared();
            if dist_sq > reach * reach {
                continue;
            }
            let influence =
                (-dist_sq / (2.0 * splat.size * splat.size * self.sharpness)).exp();
            color += splat.rgb * influence * splat.life;
        }

        let out = gamma_encode(color);
        [
            out.x.clamp(0.0, 1.0),
            out.y.clamp(0.0, 1.0),
            out.z.clamp(0.0, 1.0),
            1.0,
        ]
    }
}

/// Map a pixel to the centered, y-up, aspect-corrected coordinate frame the
/// pattern functions and the simulation share. X spans `[-aspect, aspect]`,
/// y spans `[-1, 1]`.
fn pixel_coord(x: u32, y: u32, width: u32, height: u32, params: &FrameParams) -> Vec2 {
    let u = (x as f32 + 0.5) / width as f32;
    let v = (y as f32 + 0.5) / height as f32;
    Vec2::new((u * 2.0 - 1.0) * params.aspect_ratio, 1.0 - v * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn small_params() -> FrameParams {
        let mut params = FrameParams::new(32, 32);
        params.time = 1.25;
        params
    }

    fn bright_particle_at(position: Vec2) -> Particle {
        Particle {
            position,
            velocity: Vec2::ZERO,
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            life: 2.0,
            max_life: 2.0,
            size: 0.2,
            mass: 1.0,
        }
    }

    #[test]
    fn test_frame_dimensions_follow_params() {
        let frame = Compositor::new().render(&[], &small_params());
        assert_eq!(frame.width(), 32);
        assert_eq!(frame.height(), 32);
        assert_eq!(frame.pixels().len(), 32 * 32);
    }

    #[test]
    fn test_pixels_are_clamped_rgba() {
        let particles = vec![bright_particle_at(Vec2::ZERO)];
        let frame = Compositor::new().render(&particles, &small_params());
        for pixel in frame.pixels() {
            for channel in pixel {
                assert!((0.0..=1.0).contains(channel));
            }
            assert_eq!(pixel[3], 1.0);
        }
    }

    #[test]
    fn test_live_splat_brightens_its_pixel() {
        let params = small_params();
        let particle = bright_particle_at(Vec2::ZERO);

        let base = Compositor::new().render(&[], &params);
        let lit = Compositor::new().render(&[particle], &params);

        // Center pixel sits on the splat
        let (cx, cy) = (16, 16);
        let sum = |p: [f32; 4]| p[0] + p[1] + p[2];
        assert!(sum(lit.pixel(cx, cy)) > sum(base.pixel(cx, cy)));
    }

    #[test]
    fn test_dead_particles_contribute_nothing() {
        let params = small_params();
        let mut dead = bright_particle_at(Vec2::ZERO);
        dead.color.w = 0.0;

        let base = Compositor::new().render(&[], &params);
        let with_dead = Compositor::new().render(&[dead], &params);
        assert_eq!(base.pixels(), with_dead.pixels());
    }

    #[test]
    fn test_splat_falloff_is_local() {
        let params = small_params();
        let particle = bright_particle_at(Vec2::new(-0.8, 0.8));

        let base = Compositor::new().render(&[], &params);
        let lit = Compositor::new().render(&[particle], &params);

        // Far corner is beyond the cutoff radius and must be untouched
        assert_eq!(base.pixel(31, 31), lit.pixel(31, 31));
    }

    #[test]
    fn test_to_rgba8_length_and_range() {
        let frame = Compositor::new().render(&[], &small_params());
        let bytes = frame.to_rgba8();
        assert_eq!(bytes.len(), 32 * 32 * 4);
        // Alpha bytes are opaque
        assert!(bytes.chunks_exact(4).all(|px| px[3] == 255));
    }
}
