use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// A plotters drawing call failed. The backend error type is generic over
    /// the drawing area's lifetime, so it is carried here as its display form.
    #[error("Chart drawing failed: {0}")]
    Draw(String),

    #[error("Rendered buffer did not match the requested {width}x{height} raster")]
    BufferSize { width: u32, height: u32 },
}

pub(crate) fn draw_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}
