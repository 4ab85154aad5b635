//! Info command implementation
//!
//! Displays the render behaviours, output formats and effects on offer.

use crate::cli::InfoArgs;
use typeset_core::error::Result;

pub fn run(args: &InfoArgs) -> Result<()> {
    // If no specific flags, show all info
    let show_all = !args.behaviours && !args.formats && !args.effects;

    println!("typeset v{}", env!("CARGO_PKG_VERSION"));
    println!();

    if show_all || args.behaviours {
        print_behaviours();
        if show_all {
            println!();
        }
    }

    if show_all || args.formats {
        print_formats();
        if show_all {
            println!();
        }
    }

    if show_all || args.effects {
        print_effects();
    }

    Ok(())
}

fn print_behaviours() {
    println!("Render behaviours:");
    println!("  full              - Text with every enabled style (default)");
    println!("  no-styles         - Text only");
    println!("  no-text           - Styles only, on a transparent base");
    println!("  mask              - Alpha mask with color glyphs cut out");
    println!("  overlay           - Decorations above the ink (strikethrough)");
}

fn print_formats() {
    println!("Output formats:");
    println!("  png               - PNG RGBA (straight alpha) or grayscale for l8");
    println!("  ppm               - Portable Pixmap, composited over white");
    println!("  pgm               - Portable Graymap of the coverage");
    println!();
    println!("Pixel formats:");
    println!("  rgba, bgra        - Premultiplied 32-bit color");
    println!("  l8                - 8-bit alpha (no-styles and mask renders)");
}

fn print_effects() {
    println!("Effects (markup / style file):");
    println!("  underline         - <u type color height dash-gap dash-width>");
    println!("  strikethrough     - <s color height>");
    println!("  text color        - <color value>, <span text-color>");
    println!("  background        - <background color>, <span background-color>");
    println!("  bold, italic      - <b>, <i>, <span font-weight font-slant>");
    println!("  spacing           - <char-spacing value>");
    println!("  paragraphs        - <p align='begin|center|end'>");
    println!("  shadow            - style file: shadow-offset, shadow-color, shadow-blur");
    println!("  outline           - style file: outline-width, outline-color");
}
