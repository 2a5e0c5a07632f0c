//! Viewport parameters shared by every controller.

use crate::config::ViewportConfig;

/// Coarse viewport classification taken once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Small,
    Large,
}

impl SizeClass {
    pub fn classify(window_width: f32, config: &ViewportConfig) -> Self {
        if window_width <= config.small_width {
            SizeClass::Small
        } else {
            SizeClass::Large
        }
    }

    pub fn is_small(self) -> bool {
        self == SizeClass::Small
    }
}

/// How a surface derives its size from the browser window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceSizing {
    /// Covers the whole window.
    FullWindow,
    /// Full window width, fixed height chosen by size class.
    FixedHeight { small: f32, large: f32 },
}

impl SurfaceSizing {
    /// Surface size in CSS pixels for a window of the given size.
    pub fn surface_size(&self, window_width: f32, window_height: f32, class: SizeClass) -> (f32, f32) {
        match *self {
            SurfaceSizing::FullWindow => (window_width, window_height),
            SurfaceSizing::FixedHeight { small, large } => {
                let height = if class.is_small() { small } else { large };
                (window_width, height)
            }
        }
    }
}

/// Width, height and pixel ratio of one rendering surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Device pixel ratio after the ceiling has been applied.
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Build the viewport of a surface from raw window metrics.
    pub fn measure(
        window_width: f32,
        window_height: f32,
        device_pixel_ratio: f32,
        sizing: SurfaceSizing,
        class: SizeClass,
        config: &ViewportConfig,
    ) -> Self {
        let (width, height) = sizing.surface_size(window_width, window_height, class);
        Self {
            width,
            height,
            pixel_ratio: config.effective_pixel_ratio(device_pixel_ratio, class),
        }
    }

    /// Width over height; a degenerate height yields 1.0 so cameras stay finite.
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Backing-store size in device pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round().max(0.0) as u32,
            (self.height * self.pixel_ratio).round().max(0.0) as u32,
        )
    }
}
