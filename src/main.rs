//! # Moon Phase Application Entry Point
//!
//! This binary renders the moon for the current (or a requested) phase and
//! either previews it in the terminal or writes a PNG. It also reports moon
//! information for the configured location.
//!
//! ```text
//! moon-phase [--stdout] [--info] [--json] [--phase <f>] [--shadow <f>]
//!            [--size <n>] [--icon] [--stroke] [--out <file.png>] [--config <file>]
//! ```

// Test modules
#[cfg(test)]
mod tests;

use anyhow::{anyhow, Context};
use chrono::Utc;
use image::RgbaImage;
use log::info;
use std::env;
use std::path::PathBuf;

use moon_phase_lib::{
    compositor::{draw, fill_icon, stroke_icon},
    config::Config,
    lunar::{information, Information, SchaeferEphemeris},
    preview::draw_ascii,
    texture::{TextureCatalog, DEFAULT_SIZES},
};

/// What to produce, gathered from the command line.
#[derive(Debug, Default)]
struct Options {
    stdout: bool,
    info: bool,
    json: bool,
    icon: bool,
    stroke: bool,
    phase: Option<f64>,
    shadow: Option<f64>,
    size: Option<u32>,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
}

/// Parse command line arguments (program name excluded).
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Options> {
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |name: &str| args.next().ok_or_else(|| anyhow!("{} needs a value", name));
        match arg.as_str() {
            "--stdout" => options.stdout = true,
            "--info" => options.info = true,
            "--json" => options.json = true,
            "--icon" => options.icon = true,
            "--stroke" => options.stroke = true,
            "--phase" => {
                let v = value("--phase")?;
                options.phase = Some(v.parse().with_context(|| format!("bad phase '{}'", v))?);
            }
            "--shadow" => {
                let v = value("--shadow")?;
                options.shadow = Some(v.parse().with_context(|| format!("bad shadow '{}'", v))?);
            }
            "--size" => {
                let v = value("--size")?;
                options.size = Some(v.parse().with_context(|| format!("bad size '{}'", v))?);
            }
            "--out" => options.out = Some(PathBuf::from(value("--out")?)),
            "--config" => options.config = Some(PathBuf::from(value("--config")?)),
            other => return Err(anyhow!("unknown argument '{}'", other)),
        }
    }
    Ok(options)
}

/// Print moon information in human-readable form.
fn print_information(info: &Information) {
    let fmt_time = |t: Option<chrono::DateTime<Utc>>| {
        t.map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "none today".to_string())
    };
    println!("Phase:        {:?}", info.phase);
    println!("Illumination: {:+.3}", info.illumination);
    println!("Elevation:    {:.1}°", info.elevation);
    println!("Direction:    {:.1}°", info.direction);
    println!("Moonrise:     {}", fmt_time(info.moonrise));
    println!("Moonset:      {}", fmt_time(info.moonset));
}

/// Whether anything beyond `--info` asks for an image.
fn wants_image(options: &Options) -> bool {
    options.phase.is_some()
        || options.out.is_some()
        || options.stdout
        || options.icon
        || options.stroke
        || options.size.is_some()
        || options.shadow.is_some()
}

/// Render the requested image.
fn render_image(options: &Options, config: &Config, phase: f64) -> anyhow::Result<RgbaImage> {
    let size = options.size.unwrap_or(config.render.size);
    let render = &config.render;
    let stroke = options.stroke || render.stroke;

    if options.icon || stroke {
        let mut canvas = RgbaImage::new(size, size);
        if stroke {
            stroke_icon(&mut canvas, render.light(), render.shadow(), phase)?;
        } else {
            fill_icon(&mut canvas, render.light(), render.shadow(), phase)?;
        }
        return Ok(canvas);
    }

    // A corrupt texture asset is fatal: it means the install is broken
    let catalog = match &config.textures.directory {
        Some(dir) => TextureCatalog::load_dir(dir)
            .with_context(|| format!("loading textures from {}", dir.display()))?,
        None => TextureCatalog::procedural(&DEFAULT_SIZES),
    };
    let shadow = options.shadow.unwrap_or(render.shadow);
    draw(&catalog, size, phase, shadow)?.ok_or_else(|| anyhow!("no base texture registered"))
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args(env::args().skip(1))?;
    let config = match &options.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    // Only consult the ephemeris when it is needed
    let moon = if options.info || options.phase.is_none() {
        Some(
            information(&SchaeferEphemeris, Utc::now(), &config.location)
                .context("querying moon information")?,
        )
    } else {
        None
    };

    if let (true, Some(moon)) = (options.info, &moon) {
        if options.json {
            println!("{}", serde_json::to_string_pretty(moon)?);
        } else {
            print_information(moon);
        }
        if !wants_image(&options) {
            return Ok(());
        }
    }

    let phase = match (options.phase, &moon) {
        (Some(phase), _) => phase,
        (None, Some(moon)) => moon.illumination,
        (None, None) => 0.0,
    };
    info!("rendering phase {:+.3}", phase);

    let image = render_image(&options, &config, phase)?;

    match &options.out {
        Some(path) => {
            image
                .save(path)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
            if options.stdout {
                draw_ascii(&image);
            }
        }
        // Development mode: ASCII output for testing
        None => draw_ascii(&image),
    }

    Ok(())
}
