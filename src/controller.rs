//! Visibility-gated animation loop.
//!
//! An [`AnimationController`] owns one simulation, the surface it draws to and
//! the scheduler that delivers frames. It advances the simulation once per
//! delivered frame while `Running`, keeps at most one frame registration
//! outstanding, and cancels that registration the moment it is suspended.

use std::time::Duration;

use glam::Vec2;

use crate::config::LoopConfig;
use crate::debounce::Debouncer;
use crate::error::{RenderError, Result};
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::surface::Surface;
use crate::viewport::Viewport;

/// Per-frame behaviour driven by a controller.
pub trait Simulation<C: Surface> {
    /// Advance the simulation by one frame.
    fn step(&mut self);

    /// Draw the current state.
    fn render(&self, surface: &mut C) -> Result<(), RenderError>;

    /// Adopt new viewport parameters without resetting element state.
    fn resize(&mut self, viewport: &Viewport);

    /// Raw pointer position in surface coordinates.
    fn pointer_moved(&mut self, _position: Vec2, _viewport: &Viewport) {}

    /// Number of simulated elements; fixed for the simulation's lifetime.
    fn element_count(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Constructed, never started.
    Idle,
    /// One frame registration is outstanding.
    Running,
    /// Not visible; no registration, state retained.
    Suspended,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub rendered: u64,
    /// Frames whose render call failed.
    pub dropped: u64,
    /// Callbacks that arrived for a registration that is no longer current.
    pub ignored: u64,
    pub resizes: u64,
}

pub struct AnimationController<S, C, F>
where
    S: Simulation<C>,
    C: Surface,
    F: FrameScheduler,
{
    simulation: S,
    surface: C,
    scheduler: F,
    state: ControllerState,
    pending: Option<FrameHandle>,
    viewport: Viewport,
    resize_debounce: Debouncer<Viewport>,
    stats: FrameStats,
}

impl<S, C, F> AnimationController<S, C, F>
where
    S: Simulation<C>,
    C: Surface,
    F: FrameScheduler,
{
    /// Size the surface for `viewport` and return an `Idle` controller.
    ///
    /// Fails without creating a controller if the surface rejects its size.
    pub fn new(
        mut simulation: S,
        mut surface: C,
        scheduler: F,
        viewport: Viewport,
        config: &LoopConfig,
    ) -> Result<Self> {
        config.validate()?;
        surface.resize(&viewport)?;
        simulation.resize(&viewport);
        log::debug!(
            "controller ready: {} elements, {}x{} @{}",
            simulation.element_count(),
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );
        Ok(Self {
            simulation,
            surface,
            scheduler,
            state: ControllerState::Idle,
            pending: None,
            viewport,
            resize_debounce: Debouncer::new(config.resize_quiet_window),
            stats: FrameStats::default(),
        })
    }

    /// `Idle | Suspended -> Running`. A no-op while already running.
    pub fn start(&mut self) -> Result<()> {
        if self.state == ControllerState::Running {
            return Ok(());
        }
        let handle = self.scheduler.request_frame()?;
        self.pending = Some(handle);
        log::debug!("controller {:?} -> Running", self.state);
        self.state = ControllerState::Running;
        Ok(())
    }

    /// `Running -> Suspended`, cancelling the outstanding registration.
    pub fn suspend(&mut self) {
        if self.state != ControllerState::Running {
            return;
        }
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        log::debug!("controller Running -> Suspended");
        self.state = ControllerState::Suspended;
    }

    /// Route an intersection change.
    pub fn set_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            self.start()
        } else {
            self.suspend();
            Ok(())
        }
    }

    /// Run the frame registered as `handle`.
    ///
    /// Returns `Ok(false)` without touching the simulation when the handle is
    /// stale or the controller is not running.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Result<bool> {
        if self.state != ControllerState::Running || self.pending != Some(handle) {
            self.stats.ignored += 1;
            return Ok(false);
        }
        self.pending = None;

        self.simulation.step();
        match self.simulation.render(&mut self.surface) {
            Ok(()) => self.stats.rendered += 1,
            Err(err) => {
                self.stats.dropped += 1;
                log::warn!("dropping frame: {err}");
            }
        }

        match self.scheduler.request_frame() {
            Ok(next) => {
                self.pending = Some(next);
                Ok(true)
            }
            Err(err) => {
                self.state = ControllerState::Suspended;
                Err(err)
            }
        }
    }

    /// Run whatever frame is currently registered, for schedulers whose
    /// callbacks do not carry the handle.
    pub fn run_pending_frame(&mut self) -> Result<bool> {
        match self.pending {
            Some(handle) => self.on_frame(handle),
            None => {
                self.stats.ignored += 1;
                Ok(false)
            }
        }
    }

    /// Apply viewport parameters immediately.
    pub fn resize(&mut self, viewport: Viewport) -> Result<()> {
        self.surface.resize(&viewport)?;
        self.simulation.resize(&viewport);
        self.viewport = viewport;
        self.stats.resizes += 1;
        Ok(())
    }

    /// Record a raw resize notification; it is applied by [`flush_resize`]
    /// once the quiet window has passed.
    ///
    /// [`flush_resize`]: AnimationController::flush_resize
    pub fn notify_resize(&mut self, viewport: Viewport, now: Duration) {
        self.resize_debounce.signal(viewport, now);
    }

    /// Apply the coalesced resize if it is due. Returns whether one was applied.
    pub fn flush_resize(&mut self, now: Duration) -> Result<bool> {
        match self.resize_debounce.poll(now) {
            Some(viewport) => {
                self.resize(viewport)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn resize_deadline(&self) -> Option<Duration> {
        self.resize_debounce.deadline()
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.simulation.pointer_moved(position, &self.viewport);
    }

    /// Cancel any outstanding registration and hand back the simulation.
    pub fn dispose(mut self) -> S {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        log::debug!("controller disposed after {} frames", self.stats.rendered);
        self.simulation
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.simulation
    }

    pub fn surface(&self) -> &C {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut C {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}
