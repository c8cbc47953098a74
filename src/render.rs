//! Frame driver
//!
//! Walks the pixel grid row by row, casts one primary ray per pixel and hands each color
//! to a [`PixelSink`].

use std::path::Path;

use image::RgbImage;
use indicatif::ProgressBar;

use crate::cameras::Camera;
use crate::config::RenderSettings;
use crate::tracer::{TraceStats, Tracer};
use crate::utils::get_pixel;
use crate::{Color, Ray};

/// Receives every pixel of a frame
///
/// Colors arrive unclamped; the sink decides how to bring them into display range.
pub trait PixelSink {
    fn put(&mut self, x: u32, y: u32, color: Color);
}
impl<F: FnMut(u32, u32, Color)> PixelSink for F {
    fn put(&mut self, x: u32, y: u32, color: Color) {
        self(x, y, color)
    }
}

/// Collects a frame into an 8-bit RGB image
pub struct ImageBuffer(pub RgbImage);
impl ImageBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self(RgbImage::new(width, height))
    }

    /// Buffer sized for frames rendered with `settings`
    pub fn for_settings(settings: &RenderSettings) -> Self {
        Self::new(settings.width, settings.height)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.0.save(path)
    }

    pub fn into_inner(self) -> RgbImage {
        self.0
    }
}
impl PixelSink for ImageBuffer {
    fn put(&mut self, x: u32, y: u32, color: Color) {
        self.0.put_pixel(x, y, get_pixel(&color))
    }
}

/// Render one frame, returning the rays it cost
///
/// The sink receives every pixel of a `settings.width` x `settings.height` grid; a fixed
/// size sink such as [`ImageBuffer`] must be at least that large or it panics.
pub fn render_frame(
    tracer: &Tracer<'_>,
    camera: &Camera,
    settings: &RenderSettings,
    sink: &mut impl PixelSink,
) -> TraceStats {
    drive(tracer, camera, settings, sink, None)
}

/// Same as [`render_frame`], ticking `bar` once per row
pub fn render_frame_with_progress(
    tracer: &Tracer<'_>,
    camera: &Camera,
    settings: &RenderSettings,
    sink: &mut impl PixelSink,
    bar: &ProgressBar,
) -> TraceStats {
    drive(tracer, camera, settings, sink, Some(bar))
}

fn drive(
    tracer: &Tracer<'_>,
    camera: &Camera,
    settings: &RenderSettings,
    sink: &mut impl PixelSink,
    bar: Option<&ProgressBar>,
) -> TraceStats {
    let before = tracer.stats();
    let fov = settings.fov();

    for y in 0..settings.height {
        for x in 0..settings.width {
            let dir = camera.ray_direction(x, y, settings.width, settings.height, fov);
            let color = tracer.trace(&Ray::new(camera.position, dir));
            sink.put(x, y, color);
        }
        if let Some(bar) = bar {
            bar.inc(1);
        }
    }

    let after = tracer.stats();
    let stats = TraceStats {
        primary_rays: after.primary_rays - before.primary_rays,
        secondary_rays: after.secondary_rays - before.secondary_rays,
        shadow_rays: after.shadow_rays - before.shadow_rays,
    };
    log::debug!(
        "frame {}x{}: {} primary, {} secondary, {} shadow rays",
        settings.width,
        settings.height,
        stats.primary_rays,
        stats.secondary_rays,
        stats.shadow_rays
    );
    stats
}
