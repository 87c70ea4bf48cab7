//! Compositing the map and bar-chart rasters onto one canvas and exporting a
//! dated PNG per year.

use crate::utils::ensure_dir;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Canvas width in pixels: 5 inches at 300 DPI.
pub const CANVAS_WIDTH: u32 = 1500;
/// Canvas height in pixels: 4 inches at 300 DPI.
pub const CANVAS_HEIGHT: u32 = 1200;

/// Fractional (x, y, width, height) placement of the map on the canvas.
const MAP_RECT: (f64, f64, f64, f64) = (0.0, 0.0, 1.0, 0.75);
/// Fractional placement of the bar-chart strip along the bottom.
const BAR_RECT: (f64, f64, f64, f64) = (0.0, 0.73, 1.0, 0.27);

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Failed to create output directory '{0}'")]
    OutputDir(PathBuf, #[source] io::Error),

    #[error("Failed to write frame '{0}'")]
    FrameWrite(PathBuf, #[source] image::ImageError),
}

/// The deterministic frame path for a year: `<out_dir>/gage_time_<year>.png`.
pub fn frame_path(out_dir: &Path, year: i32) -> PathBuf {
    out_dir.join(format!("gage_time_{year}.png"))
}

/// Overlays the map raster on the upper area of the canvas and the bar chart
/// on a lower strip, then writes `<out_dir>/gage_time_<year>.png`.
///
/// Both layers are rescaled to their fixed fractional rectangles. Writes
/// exactly one file per invocation and overwrites any existing file at that
/// path; the output directory is created if absent.
pub fn compose_frame(
    map: &RgbImage,
    bar_chart: &RgbImage,
    year: i32,
    out_dir: &Path,
) -> Result<PathBuf, ComposeError> {
    let mut canvas = RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgb([255, 255, 255]));
    paste(&mut canvas, map, MAP_RECT);
    paste(&mut canvas, bar_chart, BAR_RECT);

    ensure_dir(out_dir).map_err(|e| ComposeError::OutputDir(out_dir.to_path_buf(), e))?;
    let path = frame_path(out_dir, year);
    canvas
        .save(&path)
        .map_err(|e| ComposeError::FrameWrite(path.clone(), e))?;
    info!("Wrote frame for {year} to {}", path.display());
    Ok(path)
}

fn paste(canvas: &mut RgbImage, layer: &RgbImage, (fx, fy, fw, fh): (f64, f64, f64, f64)) {
    let w = (f64::from(CANVAS_WIDTH) * fw).round() as u32;
    let h = (f64::from(CANVAS_HEIGHT) * fh).round() as u32;
    let x = (f64::from(CANVAS_WIDTH) * fx).round() as i64;
    let y = (f64::from(CANVAS_HEIGHT) * fy).round() as i64;
    let scaled = imageops::resize(layer, w, h, FilterType::Lanczos3);
    imageops::overlay(canvas, &scaled, x, y);
}
