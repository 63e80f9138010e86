/// Errors that can occur constructing a pixel surface.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// A surface dimension was zero.
    #[error("invalid surface dimensions {width}x{height} (both must be at least 1)")]
    InvalidDimensions { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, SurfaceError>;
