use clap::{Parser, ValueEnum};
use codeshot_core::PngStrip;
use std::path::PathBuf;

/// Style options left unset are picked at random and listed in the summary.
#[derive(Parser, Debug, Default)]
#[command(
    name = "codeshot",
    about = "Generate styled screenshots of source code.",
    version
)]
pub(crate) struct Args {
    /// Input file path. Use "-" to read from stdin.
    pub(crate) input: Option<String>,

    /// Fetch the code from a URL instead of a file.
    #[arg(long, conflicts_with = "input")]
    pub(crate) url: Option<String>,

    /// Output PNG path. If omitted, writes to stdout (or codeshot.png when
    /// stdout is a TTY).
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// JSON settings file (font dirs, fetch limits, PNG options).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Print the tool-call response as JSON instead of writing the image.
    #[arg(long)]
    pub(crate) json: bool,

    /// List the available themes and exit.
    #[arg(long = "list-themes")]
    pub(crate) list_themes: bool,

    /// List the available backgrounds and exit.
    #[arg(long = "list-backgrounds")]
    pub(crate) list_backgrounds: bool,

    /// Language of the code. Detected when omitted.
    #[arg(short, long)]
    pub(crate) language: Option<String>,

    /// Color theme (see --list-themes).
    #[arg(short, long)]
    pub(crate) theme: Option<String>,

    /// Frame style (macos, windows, floating, minimal, none).
    #[arg(short, long)]
    pub(crate) frame: Option<String>,

    /// Background name or hex color (e.g. purple, #1a1a2e, transparent).
    #[arg(short, long)]
    pub(crate) background: Option<String>,

    /// Font family (fira-code, jetbrains-mono, source-code-pro, system).
    #[arg(long)]
    pub(crate) font: Option<String>,

    /// Font size in pixels (8-32).
    #[arg(long = "font-size")]
    pub(crate) font_size: Option<i64>,

    /// Show line numbers.
    #[arg(
        long = "line-numbers",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub(crate) line_numbers: Option<bool>,

    /// Window title. Defaults to "<Language> Code".
    #[arg(long)]
    pub(crate) title: Option<String>,

    /// Drop shadow under the code.
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub(crate) shadow: Option<bool>,

    /// Faded reflection below the code.
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub(crate) reflection: Option<bool>,

    /// Round the corners of the code image.
    #[arg(
        long = "rounded-corners",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub(crate) rounded_corners: Option<bool>,

    /// Neon outline around the frame.
    #[arg(
        long = "border-glow",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub(crate) border_glow: Option<bool>,

    /// Watermark text in the bottom-right corner.
    #[arg(long)]
    pub(crate) watermark: Option<String>,

    /// Lines to highlight, 1-based (e.g. "3,5-7").
    #[arg(long = "highlight-lines")]
    pub(crate) highlight_lines: Option<String>,

    /// Fetch timeout for --url (e.g. 500ms, 10s).
    #[arg(long = "fetch-timeout")]
    pub(crate) fetch_timeout: Option<String>,

    /// Comma-separated directories holding bundled font families.
    #[arg(long = "font-dirs")]
    pub(crate) font_dirs: Option<String>,

    /// Load system fonts for fallback families.
    #[arg(
        long = "system-fonts",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub(crate) system_fonts: Option<bool>,

    /// Upper bound on the supersampled render buffer, in pixels.
    #[arg(long = "max-pixels")]
    pub(crate) max_pixels: Option<u64>,

    /// Optimize PNG output (lossless).
    #[arg(
        long = "png-opt",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub(crate) png_opt: Option<bool>,

    /// PNG optimization preset (0-6).
    #[arg(long = "png-opt-level")]
    pub(crate) png_opt_level: Option<u8>,

    /// PNG metadata strip mode (none, safe, all).
    #[arg(long = "png-strip", value_enum)]
    pub(crate) png_strip: Option<PngStripArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum PngStripArg {
    None,
    Safe,
    All,
}

impl From<PngStripArg> for PngStrip {
    fn from(value: PngStripArg) -> Self {
        match value {
            PngStripArg::None => PngStrip::None,
            PngStripArg::Safe => PngStrip::Safe,
            PngStripArg::All => PngStrip::All,
        }
    }
}
