#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use backdrop::config::{LoopConfig, ViewportConfig};
use backdrop::scheduler::FrameScheduler;
use backdrop::surface::{Canvas2d, Surface};
use backdrop::wasm::canvas::Canvas2dSurface;
use backdrop::wasm::frame::RafScheduler;
use backdrop::wasm::mount::{mount, require_global, MountOptions};
use backdrop::{BackdropError, RenderError, SizeClass, Simulation, SurfaceSizing, Viewport};
use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{HtmlCanvasElement, MouseEvent};

wasm_bindgen_test_configure!(run_in_browser);

fn canvas() -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn canvas_backing_store_follows_pixel_ratio() {
    let element = canvas();
    let mut surface = Canvas2dSurface::new(element.clone()).unwrap();
    surface
        .resize(&Viewport::new(120.0, 80.0).with_pixel_ratio(2.0))
        .unwrap();
    assert_eq!(element.width(), 240);
    assert_eq!(element.height(), 160);

    surface.clear().unwrap();
    surface
        .stroke_line(Vec2::ZERO, Vec2::new(50.0, 50.0), 0.5, backdrop::color::Hsl::new(220.0, 0.7, 0.6), 0.1)
        .unwrap();
}

#[wasm_bindgen_test]
fn raf_scheduler_needs_a_bound_callback() {
    let window = web_sys::window().unwrap();
    let mut scheduler = RafScheduler::new(window);
    assert!(matches!(scheduler.request_frame(), Err(BackdropError::Schedule(_))));

    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    *scheduler.callback_slot().borrow_mut() =
        Some(Closure::wrap(Box::new(move || flag.set(true)) as Box<dyn FnMut()>));

    let handle = scheduler.request_frame().unwrap();
    assert!(handle.0 > 0);
    scheduler.cancel_frame(handle);
    assert!(!fired.get());
}

#[wasm_bindgen_test]
fn globals_are_detected() {
    let window = web_sys::window().unwrap();
    assert!(require_global(&window, "requestAnimationFrame").is_ok());
    assert!(matches!(
        require_global(&window, "definitelyNotAGlobal"),
        Err(BackdropError::MissingDependency(_))
    ));
}

/// Counts pointer moves routed to it.
struct PointerCount(Rc<Cell<u32>>);

impl Simulation<SizedSurface> for PointerCount {
    fn step(&mut self) {}

    fn render(&self, _surface: &mut SizedSurface) -> Result<(), RenderError> {
        Ok(())
    }

    fn resize(&mut self, _viewport: &Viewport) {}

    fn pointer_moved(&mut self, _position: Vec2, _viewport: &Viewport) {
        self.0.set(self.0.get() + 1);
    }

    fn element_count(&self) -> usize {
        0
    }
}

struct SizedSurface {
    reject: bool,
}

impl Surface for SizedSurface {
    fn resize(&mut self, _viewport: &Viewport) -> Result<(), RenderError> {
        if self.reject {
            Err(RenderError::SurfaceLost("rejected".into()))
        } else {
            Ok(())
        }
    }
}

fn options() -> MountOptions {
    MountOptions {
        sizing: SurfaceSizing::FullWindow,
        class: SizeClass::Large,
        viewport: ViewportConfig::default(),
        loop_config: LoopConfig::default(),
    }
}

fn move_pointer() {
    let window = web_sys::window().unwrap();
    let event = MouseEvent::new("mousemove").unwrap();
    window.dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
fn failed_mount_leaves_no_listeners_behind() {
    let window = web_sys::window().unwrap();
    let moves = Rc::new(Cell::new(0));
    let counter = moves.clone();
    let result = mount(&window, &canvas(), options(), move |_| {
        Ok((PointerCount(counter), SizedSurface { reject: true }))
    });
    assert!(matches!(result, Err(BackdropError::Render(_))));

    move_pointer();
    assert_eq!(moves.get(), 0);
}

#[wasm_bindgen_test]
fn mounted_controller_receives_pointer_moves() {
    let window = web_sys::window().unwrap();
    let moves = Rc::new(Cell::new(0));
    let counter = moves.clone();
    mount(&window, &canvas(), options(), move |_| {
        Ok((PointerCount(counter), SizedSurface { reject: false }))
    })
    .unwrap();

    move_pointer();
    assert_eq!(moves.get(), 1);
}
