//! Wavefield CLI: headless driver for the wave engine.
//!
//! Ticks an engine with a simulated frame clock, so presets can be replayed,
//! printed and plotted without a renderer attached.

mod error;
mod plot;
mod preset;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use wavefield_engine::{Rect, Scene};

use crate::error::{CliError, Result};
use crate::preset::{Player, Preset};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { preset, fps, duration, every } => run(preset.as_deref(), fps, duration, every),
        Commands::Plot { preset, at, width, height, fps } => run_plot(preset.as_deref(), at, width, height, fps),
        Commands::Preset { output } => write_preset(output.as_deref()),
        Commands::Scene { seed, fps, duration, every } => run_scene(seed, fps, duration, every),
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Smoothed wave signals for procedural animation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a preset and print the composite every few frames.
    Run {
        /// Preset JSON file; the built-in drift preset when omitted.
        #[arg(short, long)]
        preset: Option<PathBuf>,
        /// Simulated frame rate.
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Seconds to simulate.
        #[arg(short, long, default_value_t = 6.0)]
        duration: f64,
        /// Print one line per this many frames.
        #[arg(long, default_value_t = 15)]
        every: usize,
    },
    /// Advance a preset to a point in time and draw the composition across the terminal.
    Plot {
        #[arg(short, long)]
        preset: Option<PathBuf>,
        /// Seconds to advance before sampling.
        #[arg(long, default_value_t = 0.0)]
        at: f64,
        #[arg(long, default_value_t = 72)]
        width: usize,
        #[arg(long, default_value_t = 15)]
        height: usize,
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
    },
    /// Print the built-in preset as JSON, or write it to a file.
    Preset {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the built-in drift scene and print its effect parameters.
    Scene {
        /// Noise seed; OS entropy when omitted.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        #[arg(short, long, default_value_t = 6.0)]
        duration: f64,
        #[arg(long, default_value_t = 15)]
        every: usize,
    },
}

fn load_player(path: Option<&Path>) -> Result<Player> {
    let preset = match path {
        Some(p) => Preset::load(p)?,
        None => Preset::drift(),
    };
    preset.build()
}

/// Frame timestamps `0, 1/fps, 2/fps, ...` up to and including `duration`.
fn frame_times(fps: f64, duration: f64) -> Result<impl Iterator<Item = f64>> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(CliError::argument(format!("fps must be positive, got {fps}")));
    }
    if !duration.is_finite() || duration < 0.0 {
        return Err(CliError::argument(format!("duration must be non-negative, got {duration}")));
    }
    let frames = (duration * fps).floor() as u64;
    Ok((0..=frames).map(move |i| i as f64 / fps))
}

fn check_every(every: usize) -> Result<usize> {
    if every == 0 {
        return Err(CliError::argument("--every must be at least 1"));
    }
    Ok(every)
}

fn run(preset: Option<&Path>, fps: f64, duration: f64, every: usize) -> Result<()> {
    let every = check_every(every)?;
    let mut player = load_player(preset)?;
    log::info!(
        "running {} waves at {fps} fps for {duration}s (smoothing {:.3}s)",
        player.engine().waves().len(),
        player.engine().smoothing_time_constant()
    );

    let labels: Vec<String> = player.engine().waves().iter().map(|w| w.label.clone()).collect();
    println!("{:>8} {:>8} {:>10}  {}", "t", "phase", "composite", labels.join(" "));

    for (frame, t) in frame_times(fps, duration)?.enumerate() {
        player.advance(t);
        if frame % every != 0 {
            continue;
        }
        let composite = player.composite();
        let per_wave: Vec<String> = player.wave_values().iter().map(|v| format!("{v:+.4}")).collect();
        println!(
            "{t:>8.3} {:>8.4} {composite:>+10.4}  {}",
            player.engine().phase(),
            per_wave.join(" ")
        );
    }
    if player.pending_changes() > 0 {
        log::warn!("{} changes were scheduled past the end of the run", player.pending_changes());
    }
    Ok(())
}

fn run_plot(preset: Option<&Path>, at: f64, width: usize, height: usize, fps: f64) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(CliError::argument("plot needs a non-empty width and height"));
    }
    let mut player = load_player(preset)?;
    for t in frame_times(fps, at)? {
        player.advance(t);
    }
    // land exactly on `at` even when it falls between frames
    player.advance(at);

    let rect = Rect::sized(width as f64, height as f64);
    let composition = player.composition().clone();
    let points = player.engine_mut().sample_composition(&composition, &rect, width);
    println!("t = {:.3}s  blend = {}", player.engine().elapsed(), composition.blend_mode().name());
    print!("{}", plot::render(&points, width, height));
    Ok(())
}

fn write_preset(output: Option<&Path>) -> Result<()> {
    let json = Preset::drift().to_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_scene(seed: Option<u64>, fps: f64, duration: f64, every: usize) -> Result<()> {
    let every = check_every(every)?;
    let mut scene = match seed {
        Some(s) => Scene::drift_seeded(s),
        None => Scene::drift(),
    };
    println!("{:>8} {:>10} {:>9} {:>8} {:>7}", "t", "composite", "offset_y", "rot_deg", "blur");
    for (frame, t) in frame_times(fps, duration)?.enumerate() {
        let f = scene.frame(t);
        if frame % every == 0 {
            println!(
                "{t:>8.3} {:>+10.4} {:>+9.3} {:>+8.3} {:>7.3}",
                f.composite,
                f.offset.y,
                f.rotation.degrees(),
                f.blur
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_times_include_both_ends() {
        let ts: Vec<f64> = frame_times(4.0, 1.0).expect("valid").collect();
        assert_eq!(ts, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn bad_clock_arguments_are_rejected() {
        assert!(matches!(frame_times(0.0, 1.0), Err(CliError::InvalidArgument(_))));
        assert!(matches!(frame_times(60.0, f64::NAN), Err(CliError::InvalidArgument(_))));
        assert!(matches!(check_every(0), Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["wavefield", "run", "--fps", "30", "-d", "2"]).expect("parse");
        assert!(matches!(cli.command, Commands::Run { fps, duration, .. } if fps == 30.0 && duration == 2.0));

        let cli = Cli::try_parse_from(["wavefield", "scene", "--seed", "9"]).expect("parse");
        assert!(matches!(cli.command, Commands::Scene { seed: Some(9), .. }));
    }
}
