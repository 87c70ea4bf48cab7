use crate::animate::AnimateError;
use crate::compose::ComposeError;
use crate::data::DataError;
use crate::render::error::RenderError;
use crate::style::StyleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GageTrendsError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Animate(#[from] AnimateError),

    #[error(transparent)]
    Style(#[from] StyleError),
}
