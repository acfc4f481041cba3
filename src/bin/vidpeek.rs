use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use vidpeek::{GifOptions, OperationType, PreviewOptions, ProgressCallback, ProgressInfo};

const CLI_AFTER_HELP: &str = "Examples:\n  vidpeek preview input.mp4 --out preview.gif --frames 8 --width 480\n  vidpeek select input.mp4 --json\n  vidpeek completions zsh > _vidpeek";

#[derive(Debug, Parser)]
#[command(
    name = "vidpeek",
    version,
    about = "Pick the key frames of a video and loop them as an animated preview",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long, global = true)]
    verbose: bool,
}

/// Key-frame selection settings shared by every analysing command.
#[derive(Debug, Args, Clone)]
struct SelectionArgs {
    /// Number of key frames to select.
    #[arg(long, default_value_t = vidpeek::DEFAULT_NUM_FRAMES)]
    frames: usize,

    /// Normalized change (0.0 - 1.0) a peak must reach.
    #[arg(long, default_value_t = vidpeek::DEFAULT_PEAK_THRESHOLD)]
    threshold: f64,

    /// Minimum distance between peaks in frames (defaults to the frame rate).
    #[arg(long)]
    spacing: Option<usize>,
}

impl SelectionArgs {
    fn to_options(&self) -> PreviewOptions {
        let mut options = PreviewOptions::new()
            .with_num_frames(self.frames)
            .with_peak_threshold(self.threshold);
        if let Some(spacing) = self.spacing {
            options = options.with_min_peak_spacing(spacing);
        }
        options
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write an animated GIF preview of a video.
    #[command(
        about = "Write an animated preview",
        after_help = "Examples:\n  vidpeek preview input.mp4 --out preview.gif\n  vidpeek preview input.mp4 --out preview.gif --frames 6 --delay 50 --progress"
    )]
    Preview {
        /// Input video path.
        input: PathBuf,
        /// Output GIF path.
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output width in pixels; height keeps the aspect ratio.
        #[arg(long)]
        width: Option<u32>,
        /// Display time of each frame in hundredths of a second.
        #[arg(long, default_value_t = vidpeek::DEFAULT_FRAME_DELAY)]
        delay: u16,
        /// Allow overwriting an existing output file.
        #[arg(long)]
        overwrite: bool,
        /// Show a progress bar.
        #[arg(long)]
        progress: bool,
    },

    /// Print the selected key frames without writing a preview.
    #[command(
        about = "Print the selected key frames",
        visible_alias = "keyframes",
        after_help = "Examples:\n  vidpeek select input.mp4\n  vidpeek select input.mp4 --frames 5 --json"
    )]
    Select {
        /// Input video path.
        input: PathBuf,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output the selection as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn operation_label(operation: OperationType) -> &'static str {
    match operation {
        OperationType::ChangeScoring => "scoring",
        OperationType::FrameExtraction => "extracting",
        OperationType::GifEncoding => "encoding",
        _ => "working",
    }
}

/// Drives one progress bar, restarting it whenever the pipeline moves on to
/// the next stage.
struct TerminalProgress {
    bar: ProgressBar,
    stage: Mutex<Option<OperationType>>,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.green} {msg:>10} {bar:40.cyan/blue} {pos}/{len}",
        )?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self {
            bar,
            stage: Mutex::new(None),
        })
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Ok(mut stage) = self.stage.lock() {
            if *stage != Some(info.operation) {
                *stage = Some(info.operation);
                self.bar.reset();
                self.bar.set_message(operation_label(info.operation));
            }
        }
        if let Some(total) = info.total {
            self.bar.set_length(total.max(info.current));
        }
        self.bar.set_position(info.current);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if cli.global.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .parse_default_env()
            .init();
    }

    match cli.command {
        Commands::Preview {
            input,
            out,
            selection,
            width,
            delay,
            overwrite,
            progress,
        } => {
            ensure_writable_path(&out, overwrite)?;

            let mut options = selection.to_options();
            let terminal = if progress {
                let terminal = Arc::new(TerminalProgress::new()?);
                options = options.with_progress(terminal.clone());
                Some(terminal)
            } else {
                None
            };

            let mut gif_options = GifOptions::new().frame_delay(delay);
            if let Some(width) = width {
                gif_options = gif_options.width(width);
            }

            let written = vidpeek::save_preview(&input, &out, &options, &gif_options)?;
            if let Some(terminal) = terminal {
                terminal.finish();
            }

            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Wrote {written} frame(s) to {}", out.display()).green()
            );
        }
        Commands::Select {
            input,
            selection,
            json,
        } => {
            let options = selection.to_options();
            let result = vidpeek::select_key_frames_from_path(&input, &options)?;
            if json {
                let payload = json!({
                    "input": input.display().to_string(),
                    "frame_count": result.frame_count,
                    "fps": result.frames_per_second,
                    "peak_spacing": result.peak_spacing,
                    "detected_peaks": result.detected_peaks,
                    "key_frames": result
                        .key_frames
                        .iter()
                        .map(|index| json!({
                            "frame": index,
                            "magnitude": result.magnitude(index),
                        }))
                        .collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "Frames: {} @ {} fps (spacing {}, {} peak(s) detected)",
                    result.frame_count,
                    result.frames_per_second,
                    result.peak_spacing,
                    result.detected_peaks
                );
                for index in result.key_frames.iter() {
                    println!("{index:>8}  {:.3}", result.magnitude(index));
                }
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "vidpeek", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
