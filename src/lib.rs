mod animate;
mod compose;
mod data;
mod error;
mod render;
mod style;
mod types;
mod utils;

pub use error::GageTrendsError;

pub use animate::{assemble_gif, resize_frames, AnimateError, PALETTE_COLORS};
pub use compose::{compose_frame, frame_path, ComposeError, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use data::{load_gage_records, load_site_locations, yearly_site_counts, DataError};

pub use render::bar_chart::{
    render_bar_chart, AXIS_YEAR_MAX, AXIS_YEAR_MIN, BAR_FILL, COUNT_TICK, HIGHLIGHT_FILL,
};
pub use render::error::RenderError;
pub use render::site_map::{render_site_map, POINT_FILL, STATE_FILL};

pub use style::{basemap_style, write_style, MapStyle, StyleError, StyleLayer, TileSource};
pub use types::{GageRecord, SiteLocation, StatePolygon, YearlyCount};
