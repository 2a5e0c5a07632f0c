use thiserror::Error;

/// Failure while drawing a single frame. The controller drops the frame and
/// keeps scheduling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("draw call failed: {0}")]
    Draw(String),
    #[error("surface lost: {0}")]
    SurfaceLost(String),
    #[error("shader program error: {0}")]
    Program(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackdropError {
    /// The drawing context (2D or WebGL2) could not be acquired.
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),
    /// A browser capability or page element the controller needs is absent.
    #[error("missing dependency: {0}")]
    MissingDependency(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("frame scheduling failed: {0}")]
    Schedule(String),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T, E = BackdropError> = std::result::Result<T, E>;
