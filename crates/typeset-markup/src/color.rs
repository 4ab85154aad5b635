//! Color strings as they appear in markup attributes

use typeset_core::Color;

/// Parse a markup color
///
/// Accepts color names, `#RGB`, `#RRGGBB`, `#RRGGBBAA` and `0xAARRGGBB`.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim().to_ascii_lowercase();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hash(hex);
    }
    if let Some(hex) = value.strip_prefix("0x") {
        let argb = u32::from_str_radix(hex, 16).ok().filter(|_| hex.len() == 8)?;
        let [a, r, g, b] = argb.to_be_bytes();
        return Some(Color::from_rgba8(r, g, b, a));
    }
    let named = match value.as_str() {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::RED,
        "green" => Color::GREEN,
        "blue" => Color::BLUE,
        "yellow" => Color::YELLOW,
        "magenta" => Color::MAGENTA,
        "cyan" => Color::CYAN,
        "transparent" => Color::TRANSPARENT,
        _ => return None,
    };
    Some(named)
}

fn parse_hash(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize, width: usize| u8::from_str_radix(&hex[i..i + width], 16).ok();
    match hex.len() {
        3 => {
            let r = channel(0, 1)?;
            let g = channel(1, 1)?;
            let b = channel(2, 1)?;
            Some(Color::from_rgba8(r * 17, g * 17, b * 17, 255))
        },
        6 => Some(Color::from_rgba8(
            channel(0, 2)?,
            channel(2, 2)?,
            channel(4, 2)?,
            255,
        )),
        8 => Some(Color::from_rgba8(
            channel(0, 2)?,
            channel(2, 2)?,
            channel(4, 2)?,
            channel(6, 2)?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(parse_color("red"), Some(Color::RED));
        assert_eq!(parse_color(" Yellow "), Some(Color::YELLOW));
        assert_eq!(parse_color("mauve"), None);
    }

    #[test]
    fn test_hash_colors() {
        assert_eq!(parse_color("#f00"), Some(Color::RED));
        assert_eq!(parse_color("#00FF00"), Some(Color::GREEN));
        assert_eq!(
            parse_color("#0000ff80"),
            Some(Color::from_rgba8(0, 0, 255, 128))
        );
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("#ggg"), None);
    }

    #[test]
    fn test_argb_hex() {
        assert_eq!(
            parse_color("0x80FF0000"),
            Some(Color::from_rgba8(255, 0, 0, 128))
        );
        assert_eq!(parse_color("0xFF00"), None);
    }
}
