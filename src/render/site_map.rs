//! Point map of the gages active in one year, drawn over a base layer of
//! state/territory polygons in a plain longitude/latitude projection.

use crate::render::error::{draw_error, RenderError};
use crate::types::{GageRecord, SiteLocation, StatePolygon};
use image::RgbImage;
use plotters::prelude::*;
use std::collections::HashSet;

/// Fill for the base polygon layer.
pub const STATE_FILL: RGBColor = RGBColor(237, 237, 237);
/// Fill for an active gage point.
pub const POINT_FILL: RGBColor = RGBColor(0, 114, 178);

const STATE_BORDER: RGBColor = RGBColor(158, 158, 158);
const POINT_RADIUS: i32 = 3;
const MARGIN: i32 = 8;

/// Conterminous-US bounds, used when no base polygons are supplied:
/// (lon_min, lon_max, lat_min, lat_max).
const CONUS_BOUNDS: (f64, f64, f64, f64) = (-125.0, -66.5, 24.0, 50.0);

/// Padding around the polygon extent, in degrees.
const BOUNDS_PAD: f64 = 1.0;

/// Renders the active-site map for `selected_year` as an owned RGB raster.
///
/// Site geometries are joined to `records` by site identifier and filtered to
/// those with a record in the selected year. A year with zero active sites
/// renders the base layer with an empty point layer; it is not an error.
pub fn render_site_map(
    states: &[StatePolygon],
    sites: &[SiteLocation],
    records: &[GageRecord],
    selected_year: i32,
    width: u32,
    height: u32,
) -> Result<RgbImage, RenderError> {
    let active: HashSet<&str> = records
        .iter()
        .filter(|r| r.year == selected_year)
        .map(|r| r.site_id.as_str())
        .collect();

    let (lon_min, lon_max, lat_min, lat_max) = map_bounds(states);

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(MARGIN)
            .build_cartesian_2d(lon_min..lon_max, lat_min..lat_max)
            .map_err(draw_error)?;

        for state in states {
            for ring in &state.rings {
                chart
                    .draw_series(std::iter::once(Polygon::new(
                        ring.clone(),
                        STATE_FILL.filled(),
                    )))
                    .map_err(draw_error)?;
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        closed_ring(ring),
                        STATE_BORDER,
                    )))
                    .map_err(draw_error)?;
            }
        }

        chart
            .draw_series(
                sites
                    .iter()
                    .filter(|s| active.contains(s.site_id.as_str()))
                    .map(|s| {
                        Circle::new((s.longitude, s.latitude), POINT_RADIUS, POINT_FILL.filled())
                    }),
            )
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
    }
    RgbImage::from_raw(width, height, buffer).ok_or(RenderError::BufferSize { width, height })
}

/// Extent of the base layer, padded, falling back to conterminous-US bounds
/// when no polygons are supplied or the extent is degenerate.
fn map_bounds(states: &[StatePolygon]) -> (f64, f64, f64, f64) {
    let mut lon_min = f64::INFINITY;
    let mut lon_max = f64::NEG_INFINITY;
    let mut lat_min = f64::INFINITY;
    let mut lat_max = f64::NEG_INFINITY;

    for (lon, lat) in states.iter().flat_map(|s| s.rings.iter().flatten()) {
        lon_min = lon_min.min(*lon);
        lon_max = lon_max.max(*lon);
        lat_min = lat_min.min(*lat);
        lat_max = lat_max.max(*lat);
    }

    if lon_min >= lon_max || lat_min >= lat_max {
        return CONUS_BOUNDS;
    }
    (
        lon_min - BOUNDS_PAD,
        lon_max + BOUNDS_PAD,
        lat_min - BOUNDS_PAD,
        lat_max + BOUNDS_PAD,
    )
}

fn closed_ring(ring: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut closed = ring.to_vec();
    if closed.first() != closed.last() {
        if let Some(first) = closed.first().copied() {
            closed.push(first);
        }
    }
    closed
}
