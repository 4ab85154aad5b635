//! CLI argument definitions using Clap v4

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use typeset_core::{HorizontalAlignment, PixelFormat, TextDirection, VerticalAlignment};

/// typeset - styled text rendering from the command line
#[derive(Parser, Debug)]
#[command(name = "typeset")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display render behaviours, output formats and effects
    #[command(alias = "i")]
    Info(InfoArgs),

    /// Render markup text to an image file
    #[command(alias = "r")]
    Render(Box<RenderArgs>),

    /// Print the text and style runs parsed from markup as JSON
    #[command(alias = "m")]
    Markup(MarkupArgs),
}

/// Arguments for the info command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// List render behaviours
    #[arg(long)]
    pub behaviours: bool,

    /// List output formats
    #[arg(long)]
    pub formats: bool,

    /// List style effects and their markup
    #[arg(long)]
    pub effects: bool,
}

/// Arguments for the markup command
#[derive(Parser, Debug)]
pub struct MarkupArgs {
    /// Markup to parse (reads from stdin if omitted)
    pub text: Option<String>,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    // Text Input
    /// Markup text to render (reads from stdin if omitted)
    pub text: Option<String>,

    /// Read input text from file
    #[arg(short = 'T', long = "text-file", conflicts_with = "text")]
    pub text_file: Option<PathBuf>,

    // Font Options
    /// Font file path (.ttf, .otf, .ttc, .otc)
    #[arg(short = 'f', long = "font-file")]
    pub font_file: PathBuf,

    /// Face index for TTC/OTC collections
    #[arg(short = 'y', long = "face-index", default_value = "0")]
    pub face_index: u32,

    /// Font size in pixels
    #[arg(short = 's', long = "font-size", default_value = "32")]
    pub font_size: f32,

    // Layout Options
    /// Canvas size spec: <width>x<height>, <width>x, x<height>, or none
    #[arg(short = 'W', long = "width-height", default_value = "none")]
    pub width_height: String,

    /// Horizontal alignment of lines
    #[arg(short = 'a', long = "align", default_value = "begin")]
    pub align: AlignArg,

    /// Vertical alignment of the text block
    #[arg(long = "valign", default_value = "top")]
    pub valign: VAlignArg,

    /// Text direction
    #[arg(short = 'd', long = "direction", default_value = "ltr")]
    pub direction: DirectionArg,

    /// Extra pixels between lines
    #[arg(long = "line-spacing", default_value = "0")]
    pub line_spacing: f32,

    /// Elide the first line that overflows the canvas width
    #[arg(long = "ellipsis")]
    pub ellipsis: bool,

    /// Place lines as if they were all begin-aligned
    #[arg(long = "ignore-alignment")]
    pub ignore_alignment: bool,

    // Style Options
    /// JSON file with model-wide style defaults
    #[arg(long = "style")]
    pub style: Option<PathBuf>,

    /// Text color (name, #RRGGBB, #RRGGBBAA)
    #[arg(short = 'c', long = "color")]
    pub color: Option<String>,

    /// Fill the text area with this color
    #[arg(short = 'b', long = "background")]
    pub background: Option<String>,

    /// Underline the whole text
    #[arg(long = "underline")]
    pub underline: bool,

    /// Strike through the whole text
    #[arg(long = "strikethrough")]
    pub strikethrough: bool,

    /// Outline width in pixels
    #[arg(long = "outline")]
    pub outline: Option<u16>,

    /// Shadow offset as <dx>,<dy>
    #[arg(long = "shadow", allow_hyphen_values = true)]
    pub shadow: Option<String>,

    /// Shadow blur radius in pixels
    #[arg(long = "shadow-blur")]
    pub shadow_blur: Option<f32>,

    /// What to draw: full, no-styles, no-text, mask, overlay
    #[arg(short = 'B', long = "behaviour", default_value = "full")]
    pub behaviour: String,

    /// Leave the strikethrough overlay out of full renders
    #[arg(long = "no-overlay")]
    pub no_overlay: bool,

    /// Pixel format of the rendered buffer
    #[arg(long = "pixel-format", default_value = "rgba")]
    pub pixel_format: PixelFormatArg,

    /// Report how texture layers split into tiles of this height
    #[arg(long = "max-texture-size")]
    pub max_texture_size: Option<u32>,

    // Output Options
    /// Output file path (stdout if omitted)
    #[arg(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'O', long = "format", default_value = "png")]
    pub format: OutputFormat,

    /// Silent mode (no progress info)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// RGBA PNG (straight alpha)
    Png,
    /// Color over white, plain-text PPM
    Ppm,
    /// Coverage as plain-text PGM
    Pgm,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Ppm => "ppm",
            Self::Pgm => "pgm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum AlignArg {
    Begin,
    Center,
    End,
}

impl From<AlignArg> for HorizontalAlignment {
    fn from(value: AlignArg) -> Self {
        match value {
            AlignArg::Begin => HorizontalAlignment::Begin,
            AlignArg::Center => HorizontalAlignment::Center,
            AlignArg::End => HorizontalAlignment::End,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum VAlignArg {
    Top,
    Center,
    Bottom,
}

impl From<VAlignArg> for VerticalAlignment {
    fn from(value: VAlignArg) -> Self {
        match value {
            VAlignArg::Top => VerticalAlignment::Top,
            VAlignArg::Center => VerticalAlignment::Center,
            VAlignArg::Bottom => VerticalAlignment::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum DirectionArg {
    Ltr,
    Rtl,
}

impl From<DirectionArg> for TextDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Ltr => TextDirection::LeftToRight,
            DirectionArg::Rtl => TextDirection::RightToLeft,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum PixelFormatArg {
    Rgba,
    Bgra,
    L8,
}

impl From<PixelFormatArg> for PixelFormat {
    fn from(value: PixelFormatArg) -> Self {
        match value {
            PixelFormatArg::Rgba => PixelFormat::Rgba8888,
            PixelFormatArg::Bgra => PixelFormat::Bgra8888,
            PixelFormatArg::L8 => PixelFormat::L8,
        }
    }
}
