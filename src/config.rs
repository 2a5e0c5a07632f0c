//! Tunables for the controllers and their simulations.
//!
//! Every struct carries the site's values as `Default` and exposes `with_*`
//! builders for the few knobs the page overrides through `data-*` attributes.

use std::ops::Range;
use std::time::Duration;

use crate::error::{BackdropError, Result};
use crate::viewport::SizeClass;

fn check_range(name: &str, range: &Range<f32>) -> Result<()> {
    if range.start > range.end || !range.start.is_finite() || !range.end.is_finite() {
        return Err(BackdropError::InvalidConfig(format!(
            "{name} range {}..{} is inverted or not finite",
            range.start, range.end
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportConfig {
    /// Windows at or below this width are classified as small.
    pub small_width: f32,
    pub pixel_ratio_ceiling: f32,
    /// Pixel ratio forced on small viewports.
    pub small_pixel_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            small_width: 768.0,
            pixel_ratio_ceiling: 1.5,
            small_pixel_ratio: 1.0,
        }
    }
}

impl ViewportConfig {
    pub fn effective_pixel_ratio(&self, device_pixel_ratio: f32, class: SizeClass) -> f32 {
        if class.is_small() {
            self.small_pixel_ratio
        } else {
            device_pixel_ratio.min(self.pixel_ratio_ceiling).max(f32::MIN_POSITIVE)
        }
    }
}

/// Resize coalescing.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    pub resize_quiet_window: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            resize_quiet_window: Duration::from_millis(100),
        }
    }
}

impl LoopConfig {
    pub fn with_quiet_window(mut self, window: Duration) -> Self {
        self.resize_quiet_window = window;
        self
    }

    /// Quiet window in whole milliseconds, as browser timers take it.
    pub fn quiet_window_ms(&self) -> i32 {
        i32::try_from(self.resize_quiet_window.as_millis()).unwrap_or(i32::MAX)
    }

    pub fn validate(&self) -> Result<()> {
        if self.resize_quiet_window.is_zero() {
            return Err(BackdropError::InvalidConfig(
                "resize quiet window must be non-zero".into(),
            ));
        }
        if self.resize_quiet_window.as_millis() > i32::MAX as u128 {
            return Err(BackdropError::InvalidConfig(format!(
                "resize quiet window of {}ms does not fit a timer",
                self.resize_quiet_window.as_millis()
            )));
        }
        Ok(())
    }
}

/// Connected-particle network parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleConfig {
    /// Windows strictly narrower than this get `count_small` particles.
    pub small_width: f32,
    pub count_small: usize,
    pub count_large: usize,
    /// Distance under which the pointer attracts and pairs are connected.
    pub interaction_radius: f32,
    /// Velocity impulse toward the pointer is `gain / distance`.
    pub pointer_gain: f32,
    /// Per-axis velocity range.
    pub velocity: Range<f32>,
    pub size: Range<f32>,
    pub opacity: Range<f32>,
    pub hue: Range<f32>,
    pub saturation: f32,
    pub lightness: f32,
    /// Opacity of a connector between two coincident particles.
    pub edge_opacity: f32,
    pub edge_width: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            small_width: 768.0,
            count_small: 30,
            count_large: 60,
            interaction_radius: 100.0,
            pointer_gain: 0.25,
            velocity: -0.25..0.25,
            size: 1.0..3.0,
            opacity: 0.2..0.7,
            hue: 200.0..260.0,
            saturation: 0.7,
            lightness: 0.6,
            edge_opacity: 0.2,
            edge_width: 0.5,
        }
    }
}

impl ParticleConfig {
    pub fn with_counts(mut self, small: usize, large: usize) -> Self {
        self.count_small = small;
        self.count_large = large;
        self
    }

    pub fn with_interaction_radius(mut self, radius: f32) -> Self {
        self.interaction_radius = radius;
        self
    }

    /// Particle density class for a window width. Unlike
    /// [`SizeClass::classify`], a window exactly `small_width` wide is large.
    pub fn size_class(&self, window_width: f32) -> SizeClass {
        if window_width < self.small_width {
            SizeClass::Small
        } else {
            SizeClass::Large
        }
    }

    pub fn count_for(&self, class: SizeClass) -> usize {
        match class {
            SizeClass::Small => self.count_small,
            SizeClass::Large => self.count_large,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.interaction_radius > 0.0) {
            return Err(BackdropError::InvalidConfig(format!(
                "interaction radius must be positive, got {}",
                self.interaction_radius
            )));
        }
        check_range("velocity", &self.velocity)?;
        check_range("size", &self.size)?;
        check_range("opacity", &self.opacity)?;
        check_range("hue", &self.hue)?;
        Ok(())
    }
}

/// Perspective camera and pointer-influence parameters shared by the 3D scenes.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Scene clock advance per frame.
    pub time_step: f32,
    /// World units per NDC unit when projecting the pointer into the scene.
    pub pointer_scale: f32,
    pub pointer_radius: f32,
    /// Influence multiplier applied every `influence_decay_interval`.
    pub influence_decay: f32,
    pub influence_decay_interval: Duration,
    /// Influence below this no longer moves objects.
    pub influence_floor: f32,
    /// Assumed display refresh used to express the decay per frame.
    pub frame_interval: Duration,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            time_step: 0.01,
            pointer_scale: 10.0,
            pointer_radius: 5.0,
            influence_decay: 0.95,
            influence_decay_interval: Duration::from_millis(50),
            influence_floor: 0.1,
            frame_interval: Duration::from_micros(16_667),
        }
    }
}

impl SceneConfig {
    /// Influence multiplier for one frame.
    pub fn influence_decay_per_frame(&self) -> f32 {
        let ratio = self.frame_interval.as_secs_f32() / self.influence_decay_interval.as_secs_f32();
        self.influence_decay.powf(ratio)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(BackdropError::InvalidConfig(format!(
                "clip planes must satisfy 0 < near < far, got {}..{}",
                self.near, self.far
            )));
        }
        if self.influence_decay_interval.is_zero() {
            return Err(BackdropError::InvalidConfig(
                "influence decay interval must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
