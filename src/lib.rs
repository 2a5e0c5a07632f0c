#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Visibility-gated animation loops for decorative page backgrounds.
//!
//! The simulations and the loop controller are plain Rust and run anywhere;
//! the browser bindings are compiled only for `wasm32`.

pub mod color;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod particles;
pub mod scene;
pub mod scheduler;
pub mod surface;
pub mod viewport;

pub use config::{LoopConfig, ParticleConfig, SceneConfig, ViewportConfig};
pub use controller::{AnimationController, ControllerState, FrameStats, Simulation};
pub use error::{BackdropError, RenderError, Result};
pub use particles::{Particle, ParticleField};
pub use scene::{FloatingScene, HeroScene};
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
pub use viewport::{SizeClass, SurfaceSizing, Viewport};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement};

    use crate::config::{LoopConfig, ParticleConfig, SceneConfig, ViewportConfig};
    use crate::error::BackdropError;
    use crate::particles::ParticleField;
    use crate::scene::{FloatingScene, HeroScene};
    use crate::viewport::{SizeClass, SurfaceSizing};

    pub mod canvas;
    pub mod frame;
    pub mod mount;
    pub mod render;

    use canvas::Canvas2dSurface;
    use mount::{mount, window_metrics, MountOptions};
    use render::WebGlScene;

    const PARTICLE_CANVAS_ID: &str = "particle-canvas";
    const BACKGROUND_CANVAS_ID: &str = "webgl-background";
    const HERO_CANVAS_SELECTOR: &str = ".hero-canvas";

    fn to_js(err: BackdropError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    fn data_attr<T: std::str::FromStr>(element: &HtmlElement, key: &str) -> Option<T> {
        element.dataset().get(key).and_then(|value| value.trim().parse().ok())
    }

    /// Overrides from `data-particles-small`, `data-particles-large` and
    /// `data-interaction-radius`.
    pub fn particle_config(element: &HtmlElement) -> ParticleConfig {
        let defaults = ParticleConfig::default();
        let small = data_attr(element, "particlesSmall").unwrap_or(defaults.count_small);
        let large = data_attr(element, "particlesLarge").unwrap_or(defaults.count_large);
        let radius = data_attr(element, "interactionRadius").unwrap_or(defaults.interaction_radius);
        defaults.with_counts(small, large).with_interaction_radius(radius)
    }

    /// Override from `data-debounce-ms`.
    pub fn loop_config(element: &HtmlElement) -> LoopConfig {
        match data_attr::<u64>(element, "debounceMs") {
            Some(ms) => LoopConfig::default().with_quiet_window(Duration::from_millis(ms)),
            None => LoopConfig::default(),
        }
    }

    /// The particle canvas is owned by this crate; create it when the page
    /// does not provide one.
    fn particle_canvas(document: &Document) -> Result<HtmlCanvasElement, JsValue> {
        if let Some(existing) = document.get_element_by_id(PARTICLE_CANVAS_ID) {
            return Ok(existing.dyn_into::<HtmlCanvasElement>()?);
        }
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_id(PARTICLE_CANVAS_ID);
        canvas.style().set_css_text(
            "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
             z-index: -2; pointer-events: none; opacity: 0.6;",
        );
        document.body().ok_or("no body")?.append_child(&canvas)?;
        Ok(canvas)
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let (width, _, _) = window_metrics(&window).map_err(to_js)?;
        let viewport_config = ViewportConfig::default();
        let class = SizeClass::classify(width, &viewport_config);
        let mut rng = StdRng::from_entropy();

        let canvas = particle_canvas(&document)?;
        let config = particle_config(&canvas);
        let particle_class = config.size_class(width);
        let options = MountOptions {
            sizing: SurfaceSizing::FullWindow,
            class: particle_class,
            // drawn at CSS pixel size
            viewport: ViewportConfig {
                pixel_ratio_ceiling: 1.0,
                ..viewport_config.clone()
            },
            loop_config: loop_config(&canvas),
        };
        let mounted = mount(&window, &canvas, options, |viewport| {
            let field = ParticleField::new(viewport, particle_class, config, &mut rng)?;
            Ok((field, Canvas2dSurface::new(canvas.clone())?))
        });
        if let Err(err) = mounted {
            log::error!("particle field disabled: {err}");
        }

        match document.get_element_by_id(BACKGROUND_CANVAS_ID) {
            Some(element) => {
                let canvas = element.dyn_into::<HtmlCanvasElement>()?;
                let options = MountOptions {
                    sizing: SurfaceSizing::FullWindow,
                    class,
                    viewport: viewport_config.clone(),
                    loop_config: loop_config(&canvas),
                };
                let mounted = mount(&window, &canvas, options, |viewport| {
                    let scene = FloatingScene::new(viewport, SceneConfig::default(), &mut rng)?;
                    Ok((scene, WebGlScene::new(canvas.clone())?))
                });
                if let Err(err) = mounted {
                    log::error!("background scene disabled: {err}");
                }
            }
            None => log::info!("no #{BACKGROUND_CANVAS_ID}; background scene skipped"),
        }

        match document.query_selector(HERO_CANVAS_SELECTOR)? {
            Some(element) => {
                let canvas = element.dyn_into::<HtmlCanvasElement>()?;
                let options = MountOptions {
                    sizing: SurfaceSizing::FixedHeight {
                        small: 150.0,
                        large: 250.0,
                    },
                    class,
                    viewport: viewport_config.clone(),
                    loop_config: loop_config(&canvas),
                };
                let mounted = mount(&window, &canvas, options, |viewport| {
                    let scene = HeroScene::new(viewport, SceneConfig::default())?;
                    Ok((scene, WebGlScene::new(canvas.clone())?))
                });
                if let Err(err) = mounted {
                    log::error!("hero scene disabled: {err}");
                }
            }
            None => log::info!("no {HERO_CANVAS_SELECTOR}; hero scene skipped"),
        }

        Ok(())
    }
}
