//! Stitching composited frames into an animated GIF: proportional frame
//! resizing, GIF assembly with a per-frame delay, and an optional pass
//! through the external `gifsicle` compressor.

use crate::utils::ensure_dir;
use bon::builder;
use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::FilterType;
use image::{Delay, Frame};
use log::{info, warn};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Palette cap handed to the external compressor.
pub const PALETTE_COLORS: u32 = 20;

/// Per-frame delay used when neither a delay nor a frame rate is supplied.
const DEFAULT_DELAY_CS: u32 = 10;

#[derive(Debug, Error)]
pub enum AnimateError {
    #[error("No resize target given, set either a width or a percentage")]
    NoResizeTarget,

    #[error("Failed to create output directory '{0}'")]
    OutputDir(PathBuf, #[source] io::Error),

    #[error("Failed to decode frame '{0}'")]
    FrameDecode(PathBuf, #[source] image::ImageError),

    #[error("Failed to write frame '{0}'")]
    FrameWrite(PathBuf, #[source] image::ImageError),

    #[error("Failed to create GIF '{0}'")]
    GifCreate(PathBuf, #[source] io::Error),

    #[error("Failed to encode GIF '{0}'")]
    GifEncode(PathBuf, #[source] image::ImageError),

    #[error("Failed to invoke the GIF compressor on '{0}'")]
    Compressor(PathBuf, #[source] io::Error),
}

/// Proportionally rescales each frame and writes it under `output_dir`,
/// returning the new paths in input order.
///
/// # Arguments
///
/// * `.frames(&[PathBuf])`: **Required.** Frame files to rescale.
/// * `.output_dir(&Path)`: **Required.** Directory for the rescaled frames,
///   created if absent. Output filenames are the input paths with a leading
///   `out/` component stripped.
/// * `.width(u32)`: Optional. Exact target width; height keeps the aspect.
/// * `.percent(f64)`: Optional. Scale percentage. Takes precedence over
///   `width` when both are supplied.
///
/// # Errors
///
/// Returns [`AnimateError::NoResizeTarget`] when neither `width` nor
/// `percent` is set. Frame decode/write failures propagate untouched beyond
/// a single wrapping; there is no validation of frame existence up front.
#[builder]
pub fn resize_frames(
    frames: &[PathBuf],
    output_dir: &Path,
    width: Option<u32>,
    percent: Option<f64>,
) -> Result<Vec<PathBuf>, AnimateError> {
    if width.is_none() && percent.is_none() {
        return Err(AnimateError::NoResizeTarget);
    }
    ensure_dir(output_dir).map_err(|e| AnimateError::OutputDir(output_dir.to_path_buf(), e))?;

    let mut resized = Vec::with_capacity(frames.len());
    for frame in frames {
        let img =
            image::open(frame).map_err(|e| AnimateError::FrameDecode(frame.clone(), e))?;
        // Percentage is authoritative when both targets are supplied.
        let new_width = match percent {
            Some(pct) => (f64::from(img.width()) * pct / 100.0).round() as u32,
            None => width.unwrap_or(img.width()),
        };
        let new_height = (f64::from(img.height()) * f64::from(new_width)
            / f64::from(img.width()))
        .round() as u32;

        let scaled = img.resize_exact(new_width, new_height, FilterType::Lanczos3);
        let target = output_dir.join(stripped_name(frame));
        scaled
            .save(&target)
            .map_err(|e| AnimateError::FrameWrite(target.clone(), e))?;
        resized.push(target);
    }
    info!(
        "Resized {} frames into {}",
        resized.len(),
        output_dir.display()
    );
    Ok(resized)
}

/// Decodes the frames and encodes them as one looping GIF at `output`.
///
/// # Arguments
///
/// * `.frames(&[PathBuf])`: **Required.** Frames in playback order.
/// * `.output(&Path)`: **Required.** Path of the GIF to write.
/// * `.delay_cs(u32)`: Optional. Per-frame delay in centiseconds. Wins over
///   `frame_rate` when both are supplied.
/// * `.frame_rate(u32)`: Optional. Playback rate; used to derive the delay
///   (`100 / fps` centiseconds) when no explicit delay is given. Defaults to
///   a 10 cs delay when neither is set.
/// * `.compress(bool)`: Optional. When `true`, runs `gifsicle` against the
///   written file in place with the same delay, optimization level 3 and a
///   [`PALETTE_COLORS`]-color palette cap.
///
/// # Errors
///
/// Frame decode and GIF encode failures propagate as [`AnimateError`]. The
/// compressor's exit status is *not* turned into an error; a failure to
/// spawn it is.
#[builder]
pub fn assemble_gif(
    frames: &[PathBuf],
    output: &Path,
    delay_cs: Option<u32>,
    frame_rate: Option<u32>,
    compress: Option<bool>,
) -> Result<PathBuf, AnimateError> {
    let delay_cs = delay_cs.unwrap_or_else(|| {
        frame_rate
            .map(|fps| (100 / fps.max(1)).max(1))
            .unwrap_or(DEFAULT_DELAY_CS)
    });

    let file =
        File::create(output).map_err(|e| AnimateError::GifCreate(output.to_path_buf(), e))?;
    let mut encoder = GifEncoder::new(file);
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| AnimateError::GifEncode(output.to_path_buf(), e))?;

    for path in frames {
        let img = image::open(path)
            .map_err(|e| AnimateError::FrameDecode(path.clone(), e))?
            .into_rgba8();
        let frame = Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(delay_cs * 10, 1));
        encoder
            .encode_frame(frame)
            .map_err(|e| AnimateError::GifEncode(output.to_path_buf(), e))?;
    }
    drop(encoder);
    info!(
        "Encoded {} frames into {} at {delay_cs} cs per frame",
        frames.len(),
        output.display()
    );

    if compress.unwrap_or(false) {
        compress_gif(output, delay_cs)?;
    }
    Ok(output.to_path_buf())
}

/// Runs `gifsicle` in place on the written GIF. The exit status is logged
/// but deliberately not checked; the uncompressed file is already on disk.
fn compress_gif(gif: &Path, delay_cs: u32) -> Result<(), AnimateError> {
    let status = Command::new("gifsicle")
        .arg("--batch")
        .arg("-O3")
        .arg(format!("--delay={delay_cs}"))
        .arg("--colors")
        .arg(PALETTE_COLORS.to_string())
        .arg(gif)
        .status()
        .map_err(|e| AnimateError::Compressor(gif.to_path_buf(), e))?;
    if status.success() {
        info!("Compressed {} in place", gif.display());
    } else {
        warn!(
            "gifsicle exited with {:?} for {}, keeping the uncompressed file",
            status.code(),
            gif.display()
        );
    }
    Ok(())
}

/// Output filename for a resized frame: the input path with a leading `out/`
/// component stripped, falling back to the bare filename for paths rooted
/// elsewhere.
fn stripped_name(frame: &Path) -> PathBuf {
    if let Ok(rest) = frame.strip_prefix("out") {
        return rest.to_path_buf();
    }
    frame
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| frame.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgb, RgbImage};
    use std::fs::File;
    use std::io::BufReader;

    fn write_frame(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(width, height, Rgb(color))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn percentage_resize_rounds_each_width() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![
            write_frame(dir.path(), "a.png", 100, 80, [10, 20, 30]),
            write_frame(dir.path(), "b.png", 201, 100, [30, 20, 10]),
        ];
        let out = dir.path().join("small");

        let resized = resize_frames()
            .frames(&frames)
            .output_dir(&out)
            .percent(50.0)
            .call()
            .unwrap();

        let first = image::open(&resized[0]).unwrap();
        let second = image::open(&resized[1]).unwrap();
        assert_eq!((first.width(), first.height()), (50, 40));
        // round(201 * 0.5) = 101, aspect preserved.
        assert_eq!(second.width(), 101);
        assert_eq!(second.height(), 50);
    }

    #[test]
    fn explicit_width_resize_is_exact_and_aspect_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![write_frame(dir.path(), "a.png", 100, 80, [1, 2, 3])];
        let out = dir.path().join("small");

        let resized = resize_frames()
            .frames(&frames)
            .output_dir(&out)
            .width(30)
            .call()
            .unwrap();

        let img = image::open(&resized[0]).unwrap();
        assert_eq!((img.width(), img.height()), (30, 24));
    }

    #[test]
    fn percentage_takes_precedence_over_width() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![write_frame(dir.path(), "a.png", 100, 100, [5, 5, 5])];
        let out = dir.path().join("small");

        let resized = resize_frames()
            .frames(&frames)
            .output_dir(&out)
            .width(30)
            .percent(50.0)
            .call()
            .unwrap();

        let img = image::open(&resized[0]).unwrap();
        assert_eq!(img.width(), 50);
    }

    #[test]
    fn missing_resize_target_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![write_frame(dir.path(), "a.png", 10, 10, [0, 0, 0])];

        let err = resize_frames()
            .frames(&frames)
            .output_dir(dir.path())
            .call()
            .unwrap_err();
        assert!(matches!(err, AnimateError::NoResizeTarget));
    }

    #[test]
    fn resized_paths_keep_input_order_and_names() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![
            write_frame(dir.path(), "gage_time_1900.png", 20, 20, [1, 1, 1]),
            write_frame(dir.path(), "gage_time_1901.png", 20, 20, [2, 2, 2]),
        ];
        let out = dir.path().join("small");

        let resized = resize_frames()
            .frames(&frames)
            .output_dir(&out)
            .percent(100.0)
            .call()
            .unwrap();

        assert_eq!(resized[0], out.join("gage_time_1900.png"));
        assert_eq!(resized[1], out.join("gage_time_1901.png"));
    }

    #[test]
    fn strips_out_prefix_from_relative_frame_paths() {
        assert_eq!(
            stripped_name(Path::new("out/gage_time_1900.png")),
            PathBuf::from("gage_time_1900.png")
        );
        assert_eq!(
            stripped_name(Path::new("elsewhere/gage_time_1900.png")),
            PathBuf::from("gage_time_1900.png")
        );
    }

    #[test]
    fn gif_has_all_frames_in_order_with_the_given_delay() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![
            write_frame(dir.path(), "a.png", 40, 30, [255, 0, 0]),
            write_frame(dir.path(), "b.png", 40, 30, [0, 255, 0]),
            write_frame(dir.path(), "c.png", 40, 30, [0, 0, 255]),
        ];
        let gif_path = dir.path().join("anim.gif");

        let written = assemble_gif()
            .frames(&frames)
            .output(&gif_path)
            .delay_cs(35)
            .call()
            .unwrap();
        assert_eq!(written, gif_path);

        let decoder = GifDecoder::new(BufReader::new(File::open(&gif_path).unwrap())).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 3);
        for frame in &decoded {
            let (numer, denom) = frame.delay().numer_denom_ms();
            assert_eq!(f64::from(numer) / f64::from(denom), 350.0);
        }
        // Frame order follows input order.
        let first = decoded[0].buffer().get_pixel(20, 15).0;
        let last = decoded[2].buffer().get_pixel(20, 15).0;
        assert_eq!(&first[..3], &[255, 0, 0]);
        assert_eq!(&last[..3], &[0, 0, 255]);
    }

    #[test]
    fn frame_rate_derives_the_delay_when_none_is_given() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![write_frame(dir.path(), "a.png", 20, 20, [9, 9, 9])];
        let gif_path = dir.path().join("anim.gif");

        assemble_gif()
            .frames(&frames)
            .output(&gif_path)
            .frame_rate(4)
            .call()
            .unwrap();

        let decoder = GifDecoder::new(BufReader::new(File::open(&gif_path).unwrap())).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        let (numer, denom) = decoded[0].delay().numer_denom_ms();
        // 100 / 4 fps = 25 cs = 250 ms per frame.
        assert_eq!(f64::from(numer) / f64::from(denom), 250.0);
    }
}
