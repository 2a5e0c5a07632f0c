//! Rendering capabilities consumed by the simulations.
//!
//! The browser backends live in the wasm module; the recording surfaces here
//! capture draw calls so frames can be inspected without a canvas.

use glam::{Mat4, Vec2};

use crate::color::Hsl;
use crate::error::RenderError;
use crate::scene::mesh::{Mesh, MeshId};
use crate::viewport::Viewport;

/// Anything with pixel dimensions that follow the viewport.
pub trait Surface {
    fn resize(&mut self, viewport: &Viewport) -> Result<(), RenderError>;
}

/// 2D immediate-mode drawing.
pub trait Canvas2d: Surface {
    fn clear(&mut self) -> Result<(), RenderError>;

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Hsl, alpha: f32) -> Result<(), RenderError>;

    fn stroke_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Hsl,
        alpha: f32,
    ) -> Result<(), RenderError>;
}

/// 3D mesh rendering with a single camera.
pub trait SceneRenderer: Surface {
    /// Clear the frame and set the camera for the draws that follow.
    fn begin_frame(&mut self, view_projection: Mat4) -> Result<(), RenderError>;

    fn draw_mesh(&mut self, mesh: &Mesh, model: Mat4) -> Result<(), RenderError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize(Viewport),
    Clear,
    Circle {
        center: Vec2,
        radius: f32,
        color: Hsl,
        alpha: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Hsl,
        alpha: f32,
    },
}

/// Canvas that records every call.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    viewport: Option<Viewport>,
    failing: bool,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent draw call fail until reset.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn clears(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Clear)).count()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    fn record(&mut self, command: DrawCommand) -> Result<(), RenderError> {
        if self.failing {
            return Err(RenderError::Draw("recording canvas set to fail".into()));
        }
        self.commands.push(command);
        Ok(())
    }
}

impl Surface for RecordingCanvas {
    fn resize(&mut self, viewport: &Viewport) -> Result<(), RenderError> {
        self.viewport = Some(*viewport);
        self.commands.push(DrawCommand::Resize(*viewport));
        Ok(())
    }
}

impl Canvas2d for RecordingCanvas {
    fn clear(&mut self) -> Result<(), RenderError> {
        self.record(DrawCommand::Clear)
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Hsl, alpha: f32) -> Result<(), RenderError> {
        self.record(DrawCommand::Circle {
            center,
            radius,
            color,
            alpha,
        })
    }

    fn stroke_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Hsl,
        alpha: f32,
    ) -> Result<(), RenderError> {
        self.record(DrawCommand::Line {
            from,
            to,
            width,
            color,
            alpha,
        })
    }
}

/// One recorded 3D frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub view_projection: Mat4,
    pub draws: Vec<(MeshId, Mat4)>,
}

/// Scene renderer that records frames and mesh draws.
#[derive(Debug, Default)]
pub struct RecordingScene {
    frames: Vec<RecordedFrame>,
    viewport: Option<Viewport>,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}

impl Surface for RecordingScene {
    fn resize(&mut self, viewport: &Viewport) -> Result<(), RenderError> {
        self.viewport = Some(*viewport);
        Ok(())
    }
}

impl SceneRenderer for RecordingScene {
    fn begin_frame(&mut self, view_projection: Mat4) -> Result<(), RenderError> {
        self.frames.push(RecordedFrame {
            view_projection,
            draws: Vec::new(),
        });
        Ok(())
    }

    fn draw_mesh(&mut self, mesh: &Mesh, model: Mat4) -> Result<(), RenderError> {
        let frame = self
            .frames
            .last_mut()
            .ok_or_else(|| RenderError::Draw("draw_mesh outside a frame".into()))?;
        frame.draws.push((mesh.id, model));
        Ok(())
    }
}
