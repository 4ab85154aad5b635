//! Export module for typeset
//!
//! Encoders that turn a finished [`PixelBuffer`] into bytes: PNG through the
//! `image` crate and plain-text PNM for quick inspection and golden files.

use std::io::Write;

use typeset_core::{
    error::{ExportError, Result},
    Exporter, PixelBuffer, PixelFormat,
};

pub mod png;

pub use png::PngExporter;

/// PNM (Portable Any Map) exporter for minimal bitmap output
pub struct PnmExporter {
    format: PnmFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnmFormat {
    /// PGM - coverage (alpha) as gray
    Pgm,
    /// PPM - color composited over white
    Ppm,
}

impl PnmExporter {
    pub fn new(format: PnmFormat) -> Self {
        Self { format }
    }

    /// Create a PPM (color) exporter
    pub fn ppm() -> Self {
        Self::new(PnmFormat::Ppm)
    }

    /// Create a PGM (grayscale) exporter
    pub fn pgm() -> Self {
        Self::new(PnmFormat::Pgm)
    }

    fn export_buffer(&self, buffer: &PixelBuffer) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let (width, height) = (buffer.width(), buffer.height());

        match self.format {
            PnmFormat::Ppm => {
                writeln!(&mut output, "P3")?;
                writeln!(&mut output, "{} {}", width, height)?;
                writeln!(&mut output, "255")?;

                let rgba = buffer.clone().convert(PixelFormat::Rgba8888);
                for row in rgba.data().chunks_exact(rgba.stride().max(1)) {
                    for px in row.chunks_exact(4) {
                        // premultiplied source over opaque white
                        let under = 255 - px[3] as u32;
                        let [r, g, b] =
                            [px[0], px[1], px[2]].map(|c| (c as u32 + under).min(255));
                        write!(&mut output, "{} {} {} ", r, g, b)?;
                    }
                    writeln!(&mut output)?;
                }
            },
            PnmFormat::Pgm => {
                writeln!(&mut output, "P2")?;
                writeln!(&mut output, "{} {}", width, height)?;
                writeln!(&mut output, "255")?;

                let alpha = buffer.clone().convert(PixelFormat::L8);
                for row in alpha.data().chunks_exact((width as usize).max(1)) {
                    for a in row {
                        write!(&mut output, "{} ", a)?;
                    }
                    writeln!(&mut output)?;
                }
            },
        }

        Ok(output)
    }
}

impl Exporter for PnmExporter {
    fn name(&self) -> &'static str {
        match self.format {
            PnmFormat::Pgm => "pgm",
            PnmFormat::Ppm => "ppm",
        }
    }

    fn export(&self, buffer: &PixelBuffer) -> Result<Vec<u8>> {
        if buffer.is_empty() {
            return Err(ExportError::EncodingFailed("empty buffer".into()).into());
        }
        self.export_buffer(buffer)
    }

    fn extension(&self) -> &'static str {
        self.name()
    }

    fn mime_type(&self) -> &'static str {
        match self.format {
            PnmFormat::Pgm => "image/x-portable-graymap",
            PnmFormat::Ppm => "image/x-portable-pixmap",
        }
    }
}

/// Exporter for a format name or file extension
pub fn exporter_for(format: &str) -> Result<Box<dyn Exporter>> {
    match format.to_ascii_lowercase().as_str() {
        "png" => Ok(Box::new(PngExporter::new())),
        "ppm" => Ok(Box::new(PnmExporter::ppm())),
        "pgm" => Ok(Box::new(PnmExporter::pgm())),
        other => Err(ExportError::FormatNotSupported(other.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_red() -> PixelBuffer {
        // premultiplied: 50% red next to a clear pixel
        PixelBuffer::from_data(2, 1, PixelFormat::Rgba8888, vec![128, 0, 0, 128, 0, 0, 0, 0])
            .unwrap()
    }

    #[test]
    fn test_ppm_composites_over_white() {
        let output = PnmExporter::ppm().export(&half_red()).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n255 127 127 255 255 255 \n");
    }

    #[test]
    fn test_pgm_writes_coverage() {
        let output = PnmExporter::pgm().export(&half_red()).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text, "P2\n2 1\n255\n128 0 \n");
    }

    #[test]
    fn test_pgm_from_mask() {
        let mask = PixelBuffer::from_data(1, 2, PixelFormat::L8, vec![7, 9]).unwrap();
        let text = String::from_utf8(PnmExporter::pgm().export(&mask).unwrap()).unwrap();
        assert_eq!(text, "P2\n1 2\n255\n7 \n9 \n");
    }

    #[test]
    fn test_exporter_lookup() {
        assert_eq!(exporter_for("PNG").unwrap().extension(), "png");
        assert_eq!(exporter_for("ppm").unwrap().mime_type(), "image/x-portable-pixmap");
        assert_eq!(exporter_for("pgm").unwrap().name(), "pgm");
        assert!(exporter_for("tiff").is_err());
    }

    #[test]
    fn test_empty_buffer_rejected() {
        assert!(PnmExporter::ppm().export(&PixelBuffer::empty()).is_err());
    }
}
