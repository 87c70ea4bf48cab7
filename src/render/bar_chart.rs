//! Bar chart of active-site counts per year, with the selected year drawn in
//! a distinct fill. Axis ranges are fixed so every frame of an animation
//! shares the same scale.

use crate::render::error::{draw_error, RenderError};
use crate::types::YearlyCount;
use image::RgbImage;
use plotters::prelude::*;

/// First year shown on the x-axis.
pub const AXIS_YEAR_MIN: i32 = 1890;
/// Hardcoded upper year bound of the x-axis.
pub const AXIS_YEAR_MAX: i32 = 2020;
/// Interval between the horizontal count guide lines.
pub const COUNT_TICK: u32 = 2000;

/// Fill for bars of non-selected years.
pub const BAR_FILL: RGBColor = RGBColor(189, 189, 189);
/// Fill for the selected year's bar.
pub const HIGHLIGHT_FILL: RGBColor = RGBColor(0, 114, 178);

const GUIDE_LINE: RGBColor = RGBColor(224, 224, 224);
const AXIS_LINE: RGBColor = RGBColor(97, 97, 97);

const MARGIN: i32 = 8;

/// Renders the yearly-count bar chart as an owned RGB raster.
///
/// All years in `counts` are drawn as bars between [`AXIS_YEAR_MIN`] and
/// [`AXIS_YEAR_MAX`]; the bar for `selected_year` uses [`HIGHLIGHT_FILL`].
/// A `selected_year` with no bar (zero active sites that year) simply renders
/// no highlight; it is not an error.
pub fn render_bar_chart(
    counts: &[YearlyCount],
    selected_year: i32,
    width: u32,
    height: u32,
) -> Result<RgbImage, RenderError> {
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let y_max = axis_count_max(counts);
        let mut chart = ChartBuilder::on(&root)
            .margin(MARGIN)
            .build_cartesian_2d(AXIS_YEAR_MIN..AXIS_YEAR_MAX + 1, 0u32..y_max)
            .map_err(draw_error)?;

        // Horizontal guides at every count tick, drawn under the bars.
        chart
            .draw_series((1..=y_max / COUNT_TICK).map(|i| {
                PathElement::new(
                    vec![
                        (AXIS_YEAR_MIN, i * COUNT_TICK),
                        (AXIS_YEAR_MAX + 1, i * COUNT_TICK),
                    ],
                    GUIDE_LINE,
                )
            }))
            .map_err(draw_error)?;

        chart
            .draw_series(counts.iter().map(|c| {
                let fill = if c.year == selected_year {
                    HIGHLIGHT_FILL
                } else {
                    BAR_FILL
                };
                Rectangle::new([(c.year, 0), (c.year + 1, c.count)], fill.filled())
            }))
            .map_err(draw_error)?;

        // Baseline on top of the bars so it stays visible.
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(AXIS_YEAR_MIN, 0), (AXIS_YEAR_MAX + 1, 0)],
                AXIS_LINE,
            )))
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
    }
    RgbImage::from_raw(width, height, buffer).ok_or(RenderError::BufferSize { width, height })
}

/// Upper y-axis bound: the tallest bar rounded up to the next count tick, so
/// the topmost guide line always clears the data.
fn axis_count_max(counts: &[YearlyCount]) -> u32 {
    let tallest = counts.iter().map(|c| c.count).max().unwrap_or(0);
    (tallest / COUNT_TICK + 1) * COUNT_TICK
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(year: i32, count: u32) -> YearlyCount {
        YearlyCount { year, count }
    }

    fn has_pixel(img: &RgbImage, color: RGBColor) -> bool {
        img.pixels()
            .any(|p| p.0 == [color.0, color.1, color.2])
    }

    #[test]
    fn renders_at_requested_size() {
        let counts = vec![count(1900, 1200), count(1950, 4800)];
        let img = render_bar_chart(&counts, 1950, 640, 200).unwrap();
        assert_eq!((img.width(), img.height()), (640, 200));
    }

    #[test]
    fn selected_year_uses_highlight_fill() {
        let counts = vec![count(1900, 3000), count(1950, 6000)];
        let img = render_bar_chart(&counts, 1950, 640, 240).unwrap();
        assert!(has_pixel(&img, HIGHLIGHT_FILL));
        assert!(has_pixel(&img, BAR_FILL));
    }

    #[test]
    fn selected_year_without_bar_renders_no_highlight() {
        let counts = vec![count(1900, 3000)];
        let img = render_bar_chart(&counts, 1975, 640, 240).unwrap();
        assert!(!has_pixel(&img, HIGHLIGHT_FILL));
        assert!(has_pixel(&img, BAR_FILL));
    }

    #[test]
    fn empty_counts_render_blank_chart() {
        let img = render_bar_chart(&[], 1950, 320, 120).unwrap();
        assert_eq!((img.width(), img.height()), (320, 120));
        assert!(!has_pixel(&img, BAR_FILL));
    }

    #[test]
    fn axis_max_rounds_up_to_tick() {
        assert_eq!(axis_count_max(&[count(1900, 1)]), COUNT_TICK);
        assert_eq!(axis_count_max(&[count(1900, COUNT_TICK)]), 2 * COUNT_TICK);
        assert_eq!(axis_count_max(&[]), COUNT_TICK);
    }
}
