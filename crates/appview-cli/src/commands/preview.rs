//! Preview command implementation
//!
//! Builds the preview sequence of an appearance and writes its frames as PNG
//! files, optionally with an animated GIF. Appearances without an animated
//! frame group get their static frame instead.

use anyhow::{bail, Context, Result};
use appview_model::Category;
use appview_sprite::png::{write_rgba_to_vec_with_hash, PngConfig};
use appview_sprite::{compose_layers, RgbaImage};
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{FrameOutput, PreviewOutput};
use super::{runtime, Workspace};

/// Options of the preview command.
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    /// Output directory (created when missing)
    pub out_dir: String,
    /// Also write an animated GIF
    pub gif: bool,
    /// Nearest-neighbor scale factor
    pub scale: u32,
}

/// Run the preview command
///
/// # Returns
/// Exit code: 0 success, 1 when nothing could be drawn
pub fn run(
    workspace: &Workspace,
    category: Category,
    id: u32,
    options: &PreviewOptions,
    json_output: bool,
) -> Result<ExitCode> {
    let service = workspace.service()?;
    let rt = runtime()?;

    let (sequence, static_frame) = rt.block_on(async {
        let sequence = service.preview_sequence(category, id).await?;
        let static_frame = match sequence {
            Some(_) => None,
            None => service.static_frame(category, id).await?,
        };
        service.shutdown();
        anyhow::Ok((sequence, static_frame))
    })?;

    let out_dir = Path::new(&options.out_dir);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;
    let stem = format!("{}_{}", category.as_str().to_lowercase(), id);

    let output = match (sequence, static_frame) {
        (Some(sequence), _) => {
            let frames: Vec<RgbaImage> = sequence
                .frames
                .iter()
                .map(|frame| frame.scale_nearest(options.scale))
                .collect();
            let written = write_frames(out_dir, &stem, &frames)?;
            let gif = if options.gif {
                let path = out_dir.join(format!("{}.gif", stem));
                write_gif(&path, &frames, sequence.interval_ms)?;
                Some(path.display().to_string())
            } else {
                None
            };
            PreviewOutput {
                category,
                id,
                animated: true,
                group_index: Some(sequence.group_index),
                interval_ms: Some(sequence.interval_ms),
                frames: written,
                gif,
            }
        }
        (None, Some(frame)) => {
            let frame = frame.scale_nearest(options.scale);
            let path = out_dir.join(format!("{}_static.png", stem));
            PreviewOutput {
                category,
                id,
                animated: false,
                group_index: None,
                interval_ms: None,
                frames: vec![write_frame(&path, &frame)?],
                gif: None,
            }
        }
        (None, None) => {
            if json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&PreviewOutput {
                        category,
                        id,
                        animated: false,
                        group_index: None,
                        interval_ms: None,
                        frames: Vec::new(),
                        gif: None,
                    })?
                );
            } else {
                println!(
                    "{} {} #{} has nothing to draw",
                    "WARN".yellow().bold(),
                    category,
                    id
                );
            }
            return Ok(ExitCode::from(1));
        }
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_output(&output);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_output(output: &PreviewOutput) {
    println!(
        "{} {} #{}",
        "Preview:".cyan().bold(),
        output.category,
        output.id
    );
    match (output.group_index, output.interval_ms) {
        (Some(group), Some(interval)) => println!(
            "  group {}, {} frame(s) at {}ms",
            group,
            output.frames.len(),
            interval
        ),
        _ => println!("  {}", "no animation, static frame only".dimmed()),
    }
    for frame in &output.frames {
        println!(
            "  {} {} ({}x{}) {}",
            "->".green(),
            frame.path,
            frame.width,
            frame.height,
            frame.hash[..16].dimmed()
        );
    }
    if let Some(gif) = &output.gif {
        println!("  {} {}", "->".green(), gif);
    }
}

fn write_frames(out_dir: &Path, stem: &str, frames: &[RgbaImage]) -> Result<Vec<FrameOutput>> {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| write_frame(&out_dir.join(format!("{}_{:03}.png", stem, i)), frame))
        .collect()
}

fn write_frame(path: &Path, frame: &RgbaImage) -> Result<FrameOutput> {
    let (data, hash) = write_rgba_to_vec_with_hash(frame, &PngConfig::default())
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(FrameOutput {
        path: path.display().to_string(),
        width: frame.width,
        height: frame.height,
        hash,
    })
}

/// Writes `frames` as a looping GIF, padding every frame to the largest size.
pub fn write_gif(path: &Path, frames: &[RgbaImage], interval_ms: u64) -> Result<()> {
    let data = encode_gif(frames, interval_ms)?;
    fs::write(path, data).with_context(|| format!("Failed to write GIF: {}", path.display()))
}

/// Encodes `frames` as a looping GIF.
pub fn encode_gif(frames: &[RgbaImage], interval_ms: u64) -> Result<Vec<u8>> {
    if frames.is_empty() {
        bail!("No frames to write GIF");
    }
    let width = frames.iter().map(|f| f.width).max().unwrap_or(0);
    let height = frames.iter().map(|f| f.height).max().unwrap_or(0);
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        bail!("frames too large for GIF: {}x{}", width, height);
    };
    // GIF delays are in hundredths of a second
    let delay = u16::try_from(interval_ms.div_ceil(10)).unwrap_or(u16::MAX);

    let mut data = Vec::new();
    {
        let mut encoder =
            gif::Encoder::new(&mut data, w, h, &[]).context("Failed to start GIF encoder")?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .context("Failed to set GIF repeat")?;

        let blank = RgbaImage::new(width, height);
        for frame in frames {
            let Some(canvas) = compose_layers(&[&blank, frame]) else {
                continue;
            };
            let mut pixels = canvas.into_raw();
            let mut gif_frame = gif::Frame::from_rgba_speed(w, h, &mut pixels, 10);
            gif_frame.delay = delay;
            gif_frame.dispose = gif::DisposalMethod::Background;
            encoder
                .write_frame(&gif_frame)
                .context("Failed to write GIF frame")?;
        }
    }
    Ok(data)
}
