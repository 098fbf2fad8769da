// SPDX-License-Identifier: MIT
//
// boxfield — an animated character-grid backdrop for the terminal.
//
// Wires the crates together:
//
//   bf-anim   the box-field animator, settings and landing panel
//   bf-term   terminal control, differential rendering and the frame loop
//
// `run` takes over the terminal and animates until a quit key. `frame`
// renders a single instant as plain text, which is handy for checking a
// config without a terminal. `config` prints the effective settings.

mod app;
mod config;
mod logging;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context as _;
use bf_anim::clock::FixedClock;
use bf_anim::{Animator, TextSurface};
use bf_term::event_loop::{EventLoop, LoopConfig};
use bf_term::terminal;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::FieldApp;
use crate::config::{CliOverrides, Config};
use crate::logging::LogTarget;

#[derive(Parser, Debug)]
#[command(name = "boxfield", version, about = "Think inside of the box")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate the box field in the terminal.
    Run(RunArgs),
    /// Render one frame as text on stdout.
    Frame(FrameArgs),
    /// Print the effective configuration as TOML.
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Config file (default: ./boxfield.toml, then the XDG config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames per second.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: Option<u32>,

    /// Start with the landing panel shown.
    #[arg(long)]
    overlay: bool,

    /// Start with the checkerboard only.
    #[arg(long = "static")]
    static_mode: bool,

    /// Quit after this many frames.
    #[arg(long)]
    frames: Option<u64>,

    /// Do not stamp boxes with their position.
    #[arg(long)]
    no_positions: bool,

    /// Write logs here instead of discarding them.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Surface width in units.
    #[arg(long)]
    width: u32,

    /// Surface height in units.
    #[arg(long)]
    height: u32,

    /// Instant to render, in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    time_ms: f64,

    /// Draw the landing panel on top.
    #[arg(long)]
    overlay: bool,

    /// Checkerboard only.
    #[arg(long = "static")]
    static_mode: bool,

    /// Do not stamp boxes with their position.
    #[arg(long)]
    no_positions: bool,

    /// Config file (default: ./boxfield.toml, then the XDG config dir).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Config file (default: ./boxfield.toml, then the XDG config dir).
    #[arg(long)]
    config: Option<PathBuf>,
}

impl RunArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            fps: self.fps,
            overlay: self.overlay.then_some(true),
            static_mode: self.static_mode.then_some(true),
            show_positions: self.no_positions.then_some(false),
        }
    }
}

impl FrameArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            fps: None,
            overlay: self.overlay.then_some(true),
            static_mode: self.static_mode.then_some(true),
            show_positions: self.no_positions.then_some(false),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.cmd {
        Command::Run(args) => cmd_run(&args, cli.verbose),
        Command::Frame(args) => cmd_frame(&args, cli.verbose),
        Command::Config(args) => cmd_config(&args, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("boxfield: {e:#}");
        process::exit(1);
    }
}

/// File (or defaults) with the command-line overrides applied.
fn effective_config(path: Option<&Path>, overrides: &CliOverrides) -> anyhow::Result<Config> {
    let (mut config, source) = match path {
        Some(p) => config::load_config(Some(p))
            .with_context(|| format!("cannot load config {}", p.display()))?,
        None => config::load_config(None)?,
    };
    if let Some(source) = &source {
        tracing::info!(path = %source.display(), "using config file");
    }
    overrides.apply(&mut config);
    Ok(config)
}

fn cmd_run(args: &RunArgs, verbosity: u8) -> anyhow::Result<()> {
    let target = args
        .log_file
        .clone()
        .map_or(LogTarget::Discard, LogTarget::File);
    logging::init(verbosity, &target)?;

    let config = effective_config(args.config.as_deref(), &args.overrides())?;
    let settings = config.animator.resolve()?;

    if !terminal::is_tty() {
        anyhow::bail!("`run` needs an interactive terminal; try `boxfield frame`");
    }

    let loop_config = LoopConfig::from_fps(config.run.fps).with_max_frames(args.frames);
    let mut event_loop =
        EventLoop::with_config(loop_config).context("failed to initialize terminal")?;
    let mut app = FieldApp::new(settings, config.overlay, &config.run, event_loop.size());

    let summary = event_loop.run(&mut app)?;
    tracing::info!(
        frames = summary.frames,
        cols = app.animator().cols(),
        rows = app.animator().rows(),
        paused = app.is_paused(),
        overlay = app.shows_overlay(),
        static_mode = app.is_static(),
        "run finished"
    );
    Ok(())
}

fn cmd_frame(args: &FrameArgs, verbosity: u8) -> anyhow::Result<()> {
    logging::init(verbosity, &LogTarget::Stderr)?;
    let config = effective_config(args.config.as_deref(), &args.overrides())?;
    println!("{}", render_frame(&config, args.width, args.height, args.time_ms)?);
    Ok(())
}

fn cmd_config(args: &ConfigArgs, verbosity: u8) -> anyhow::Result<()> {
    logging::init(verbosity, &LogTarget::Stderr)?;
    let config = effective_config(args.config.as_deref(), &CliOverrides::default())?;
    print!("{}", config.to_toml().context("cannot serialize config")?);
    Ok(())
}

/// One frame of `config` on a `width × height` unit surface at `time_ms`.
fn render_frame(config: &Config, width: u32, height: u32, time_ms: f64) -> anyhow::Result<TextSurface> {
    let settings = config.animator.resolve()?;
    let (cell_w, cell_h) = (settings.cell_width, settings.cell_height);
    let ink = settings.palette.ink;

    let mut animator = Animator::with_clock(settings, width, height, FixedClock(time_ms));
    animator.set_muted(config.run.overlay);

    let mut surface = TextSurface::new(width, height, cell_w, cell_h);
    if config.run.static_mode {
        animator.render_static(&mut surface);
    } else {
        animator.render(&mut surface);
    }
    if config.run.overlay {
        config.overlay.draw(&mut surface, cell_w, cell_h, ink);
    }
    Ok(surface)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "boxfield", "-vv", "run", "--fps", "30", "--overlay", "--no-positions", "--frames", "5",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Run(args) = cli.cmd else {
            panic!("expected run");
        };
        assert_eq!(args.frames, Some(5));
        assert_eq!(
            args.overrides(),
            CliOverrides {
                fps: Some(30),
                overlay: Some(true),
                static_mode: None,
                show_positions: Some(false),
            }
        );
    }

    #[test]
    fn fps_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["boxfield", "run", "--fps", "0"]).is_err());
        assert!(Cli::try_parse_from(["boxfield", "run", "--fps", "241"]).is_err());
    }

    #[test]
    fn frame_requires_size() {
        assert!(Cli::try_parse_from(["boxfield", "frame"]).is_err());
        let cli =
            Cli::try_parse_from(["boxfield", "frame", "--width", "1000", "--height", "600"]).unwrap();
        let Command::Frame(args) = cli.cmd else {
            panic!("expected frame");
        };
        assert_eq!(args.time_ms, 0.0);
        assert_eq!(args.overrides(), CliOverrides::default());
    }

    #[test]
    fn rendered_frame_has_message_in_first_box() {
        let surface = render_frame(&Config::default(), 1000, 600, 0.0).unwrap();
        let lines: Vec<String> = surface.lines().collect();
        assert_eq!(lines.len(), 30);
        assert!(lines.iter().all(|l| l.chars().count() == 100));
        let row: Vec<char> = lines[8].chars().collect();
        assert_eq!(row[16], '*');
        assert_eq!(row[17], 'T');
    }

    #[test]
    fn static_frame_is_plain_checkerboard() {
        let mut config = Config::default();
        config.run.static_mode = true;
        let surface = render_frame(&config, 40, 40, 1234.0).unwrap();
        let lines: Vec<String> = surface.lines().collect();
        assert_eq!(lines, vec![" · ·", "· · "]);
    }

    #[test]
    fn overlay_frame_shows_panel() {
        let mut config = Config::default();
        config.run.overlay = true;
        let text = render_frame(&config, 1000, 600, 0.0).unwrap().to_string();
        assert!(text.contains("investigating the edge"));
        assert!(text.contains("/about  /simulation"));
    }
}
