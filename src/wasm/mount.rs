//! Attaches a controller to the page: frame callback, intersection-based
//! visibility, debounced resize and raw pointer tracking.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use glam::Vec2;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{HtmlCanvasElement, IntersectionObserver, IntersectionObserverEntry, MouseEvent, Window};

use super::frame::RafScheduler;
use crate::config::{LoopConfig, ViewportConfig};
use crate::controller::{AnimationController, Simulation};
use crate::error::{BackdropError, Result};
use crate::surface::Surface;
use crate::viewport::{SizeClass, SurfaceSizing, Viewport};

type Shared<S, C> = Rc<RefCell<AnimationController<S, C, RafScheduler>>>;

fn js_err(context: &str, e: JsValue) -> BackdropError {
    BackdropError::MissingDependency(format!("{context}: {e:?}"))
}

/// Fails if `window[name]` is not defined.
pub fn require_global(window: &Window, name: &str) -> Result<()> {
    match js_sys::Reflect::has(window, &JsValue::from_str(name)) {
        Ok(true) => Ok(()),
        _ => Err(BackdropError::MissingDependency(name.to_string())),
    }
}

/// `performance.now()` as a duration since page load.
fn now(window: &Window) -> Duration {
    let ms = window.performance().map(|p| p.now()).unwrap_or(0.0);
    Duration::from_secs_f64(ms.max(0.0) / 1000.0)
}

pub fn window_metrics(window: &Window) -> Result<(f32, f32, f32)> {
    let width = window
        .inner_width()
        .map_err(|e| js_err("innerWidth", e))?
        .as_f64()
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .map_err(|e| js_err("innerHeight", e))?
        .as_f64()
        .unwrap_or(0.0);
    Ok((width as f32, height as f32, window.device_pixel_ratio() as f32))
}

/// How a canvas is sized and paced.
#[derive(Debug, Clone)]
pub struct MountOptions {
    pub sizing: SurfaceSizing,
    /// Startup classification; not re-evaluated on resize.
    pub class: SizeClass,
    pub viewport: ViewportConfig,
    pub loop_config: LoopConfig,
}

impl MountOptions {
    fn measure(&self, window: &Window) -> Result<Viewport> {
        let (width, height, ratio) = window_metrics(window)?;
        Ok(Viewport::measure(width, height, ratio, self.sizing, self.class, &self.viewport))
    }
}

/// Build a controller for `canvas` and wire it to the browser. The controller
/// lives for the rest of the page.
///
/// Nothing is left registered with the page when this returns an error.
pub fn mount<S, C, B>(window: &Window, canvas: &HtmlCanvasElement, options: MountOptions, build: B) -> Result<()>
where
    S: Simulation<C> + 'static,
    C: Surface + 'static,
    B: FnOnce(&Viewport) -> Result<(S, C)>,
{
    require_global(window, "IntersectionObserver")?;

    let viewport = options.measure(window)?;
    let (simulation, surface) = build(&viewport)?;
    let scheduler = RafScheduler::new(window.clone());
    let slot = scheduler.callback_slot();
    let controller: Shared<S, C> = Rc::new(RefCell::new(AnimationController::new(
        simulation,
        surface,
        scheduler,
        viewport,
        &options.loop_config,
    )?));

    bind_frames(&controller, &slot);
    let (observer, on_visibility) = visibility_observer(&controller)?;
    let on_resize = resize_listener(window, &controller, options);
    let on_move = pointer_listener(canvas, &controller);

    controller.borrow_mut().start()?;
    let wired = add_listener(window, "resize", on_resize.as_ref())
        .and_then(|()| add_listener(window, "mousemove", on_move.as_ref()));
    if let Err(err) = wired {
        window
            .remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            .ok();
        controller.borrow_mut().suspend();
        return Err(err);
    }
    observer.observe(canvas);

    on_visibility.forget();
    on_resize.forget();
    on_move.forget();
    Ok(())
}

fn add_listener(window: &Window, event: &str, callback: &JsValue) -> Result<()> {
    window
        .add_event_listener_with_callback(event, callback.unchecked_ref())
        .map_err(|e| js_err(event, e))
}

fn bind_frames<S, C>(controller: &Shared<S, C>, slot: &super::frame::FrameCallback)
where
    S: Simulation<C> + 'static,
    C: Surface + 'static,
{
    let weak: Weak<_> = Rc::downgrade(controller);
    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Ok(mut ctrl) = shared.try_borrow_mut() else {
            log::warn!("frame callback re-entered; skipping");
            return;
        };
        if let Err(err) = ctrl.run_pending_frame() {
            log::error!("animation loop stopped: {err}");
        }
    }) as Box<dyn FnMut()>));
}

type VisibilityCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Observer routing intersection changes to the controller. The caller starts
/// observing once the rest of the wiring is in place.
fn visibility_observer<S, C>(controller: &Shared<S, C>) -> Result<(IntersectionObserver, VisibilityCallback)>
where
    S: Simulation<C> + 'static,
    C: Surface + 'static,
{
    let shared = controller.clone();
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _observer: IntersectionObserver| {
        for entry in entries.iter() {
            let entry: IntersectionObserverEntry = entry.unchecked_into();
            let visible = entry.is_intersecting();
            match shared.try_borrow_mut() {
                Ok(mut ctrl) => {
                    if let Err(err) = ctrl.set_visible(visible) {
                        log::error!("visibility change failed: {err}");
                    }
                }
                Err(_) => log::warn!("controller busy; visibility change dropped"),
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref())
        .map_err(|e| js_err("IntersectionObserver", e))?;
    Ok((observer, callback))
}

fn resize_listener<S, C>(window: &Window, controller: &Shared<S, C>, options: MountOptions) -> Closure<dyn FnMut()>
where
    S: Simulation<C> + 'static,
    C: Surface + 'static,
{
    let timeout: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let flush: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

    // Fires after the quiet window. Timers can land a hair before the
    // deadline as measured by performance.now(), so re-arm when not yet due.
    {
        let shared = controller.clone();
        let window = window.clone();
        let timeout = timeout.clone();
        let rearm = Rc::downgrade(&flush);
        *flush.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            timeout.set(None);
            let Ok(mut ctrl) = shared.try_borrow_mut() else {
                return;
            };
            let at = now(&window);
            match ctrl.flush_resize(at) {
                Ok(true) => log::debug!("resized to {:?}", ctrl.viewport()),
                Ok(false) => {
                    if let (Some(deadline), Some(flush)) = (ctrl.resize_deadline(), rearm.upgrade()) {
                        let wait = i32::try_from(deadline.saturating_sub(at).as_millis())
                            .unwrap_or(i32::MAX)
                            .max(1);
                        if let Some(cb) = flush.borrow().as_ref() {
                            match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                                cb.as_ref().unchecked_ref(),
                                wait,
                            ) {
                                Ok(id) => timeout.set(Some(id)),
                                Err(e) => log::warn!("setTimeout failed: {e:?}"),
                            }
                        }
                    }
                }
                Err(err) => log::warn!("resize failed: {err}"),
            }
        }) as Box<dyn FnMut()>));
    }

    let shared = controller.clone();
    let target = window.clone();
    let quiet_ms = options.loop_config.quiet_window_ms();
    Closure::wrap(Box::new(move || {
        let viewport = match options.measure(&target) {
            Ok(viewport) => viewport,
            Err(err) => {
                log::warn!("could not measure window: {err}");
                return;
            }
        };
        match shared.try_borrow_mut() {
            Ok(mut ctrl) => ctrl.notify_resize(viewport, now(&target)),
            Err(_) => return,
        }
        if let Some(id) = timeout.take() {
            target.clear_timeout_with_handle(id);
        }
        if let Some(cb) = flush.borrow().as_ref() {
            match target.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), quiet_ms) {
                Ok(id) => timeout.set(Some(id)),
                Err(e) => log::warn!("setTimeout failed: {e:?}"),
            }
        }
    }) as Box<dyn FnMut()>)
}

fn pointer_listener<S, C>(canvas: &HtmlCanvasElement, controller: &Shared<S, C>) -> Closure<dyn FnMut(MouseEvent)>
where
    S: Simulation<C> + 'static,
    C: Surface + 'static,
{
    let shared = controller.clone();
    let canvas = canvas.clone();
    Closure::wrap(Box::new(move |event: MouseEvent| {
        let rect = canvas.get_bounding_client_rect();
        let position = Vec2::new(
            (event.client_x() as f64 - rect.left()) as f32,
            (event.client_y() as f64 - rect.top()) as f32,
        );
        if let Ok(mut ctrl) = shared.try_borrow_mut() {
            ctrl.pointer_moved(position);
        }
    }) as Box<dyn FnMut(MouseEvent)>)
}
