//! Style files and option parsing
//!
//! A style file is a JSON object with the model-wide defaults. Every key is
//! optional and colors are strings in any form the markup accepts:
//!
//! ```json
//! {
//!   "text-color": "#202020",
//!   "underline": true,
//!   "underline-type": "dashed",
//!   "shadow-offset": [2, 2],
//!   "shadow-blur": 1.5,
//!   "background-color": "yellow"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use typeset_core::error::{Result, TypesetError};
use typeset_core::style::UnderlineType;
use typeset_core::{Color, TextStyle, Vector2};
use typeset_markup::parse_color;

/// Model-wide style defaults as written in a style file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct StyleConfig {
    pub text_color: Option<String>,
    pub underline: Option<bool>,
    pub underline_type: Option<String>,
    pub underline_color: Option<String>,
    pub underline_height: Option<f32>,
    pub dash_gap: Option<f32>,
    pub dash_width: Option<f32>,
    pub strikethrough: Option<bool>,
    pub strikethrough_color: Option<String>,
    pub strikethrough_height: Option<f32>,
    pub shadow_offset: Option<[f32; 2]>,
    pub shadow_color: Option<String>,
    pub shadow_blur: Option<f32>,
    pub outline_width: Option<u16>,
    pub outline_color: Option<String>,
    /// Setting a background color enables the background
    pub background_color: Option<String>,
    pub character_spacing: Option<f32>,
}

impl StyleConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TypesetError::ConfigError(format!("invalid style: {}", e)))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            TypesetError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        log::debug!("loaded style file {}", path.display());
        Self::from_json(&json)
    }

    /// Overlay the configured fields onto `style`
    pub fn apply(&self, style: &mut TextStyle) -> Result<()> {
        if let Some(color) = &self.text_color {
            style.default_color = color_value(color)?;
        }
        if let Some(enabled) = self.underline {
            style.underline_enabled = enabled;
        }
        if let Some(kind) = &self.underline_type {
            style.underline_type = UnderlineType::parse(kind).ok_or_else(|| {
                TypesetError::ConfigError(format!("unknown underline type '{}'", kind))
            })?;
        }
        if let Some(color) = &self.underline_color {
            style.underline_color = color_value(color)?;
        }
        if let Some(height) = self.underline_height {
            style.underline_height = height;
        }
        if let Some(gap) = self.dash_gap {
            style.dashed_underline_gap = gap;
        }
        if let Some(width) = self.dash_width {
            style.dashed_underline_width = width;
        }
        if let Some(enabled) = self.strikethrough {
            style.strikethrough_enabled = enabled;
        }
        if let Some(color) = &self.strikethrough_color {
            style.strikethrough_color = color_value(color)?;
        }
        if let Some(height) = self.strikethrough_height {
            style.strikethrough_height = height;
        }
        if let Some([dx, dy]) = self.shadow_offset {
            style.shadow_offset = Vector2::new(dx, dy);
        }
        if let Some(color) = &self.shadow_color {
            style.shadow_color = color_value(color)?;
        }
        if let Some(radius) = self.shadow_blur {
            style.shadow_blur_radius = radius;
        }
        if let Some(width) = self.outline_width {
            style.outline_width = width;
        }
        if let Some(color) = &self.outline_color {
            style.outline_color = color_value(color)?;
        }
        if let Some(color) = &self.background_color {
            style.background_color = color_value(color)?;
            style.background_enabled = true;
        }
        if let Some(spacing) = self.character_spacing {
            style.character_spacing = spacing;
        }
        Ok(())
    }
}

/// Parse a color option
pub fn color_value(value: &str) -> Result<Color> {
    parse_color(value)
        .ok_or_else(|| TypesetError::ConfigError(format!("invalid color '{}'", value)))
}

/// Parse `<w>x<h>`, `<w>x`, `x<h>` or `none` into optional width and height
pub fn parse_size(spec: &str) -> Result<(Option<f32>, Option<f32>)> {
    let spec = spec.trim();
    if spec.eq_ignore_ascii_case("none") || spec.is_empty() {
        return Ok((None, None));
    }
    let invalid = || TypesetError::ConfigError(format!("invalid size '{}'", spec));
    let (w, h) = spec.split_once(['x', 'X']).ok_or_else(invalid)?;
    let dimension = |value: &str| -> Result<Option<f32>> {
        if value.is_empty() {
            return Ok(None);
        }
        match value.parse::<f32>() {
            Ok(v) if v > 0.0 && v.is_finite() => Ok(Some(v)),
            _ => Err(invalid()),
        }
    };
    Ok((dimension(w)?, dimension(h)?))
}

/// Parse a `<dx>,<dy>` shadow offset
pub fn parse_offset(spec: &str) -> Result<Vector2> {
    let invalid = || TypesetError::ConfigError(format!("invalid offset '{}'", spec));
    let (dx, dy) = spec.split_once(',').ok_or_else(invalid)?;
    let dx = dx.trim().parse::<f32>().map_err(|_| invalid())?;
    let dy = dy.trim().parse::<f32>().map_err(|_| invalid())?;
    Ok(Vector2::new(dx, dy))
}
