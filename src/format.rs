//! Output format dispatch from the file extension

use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// Encodings the render backend can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
    Pdf,
}

impl OutputFormat {
    /// Pick the format from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| Error::UnsupportedFormat(format!("{} has no file extension", path.display())))?;

        match ext.as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::Webp),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(Error::UnsupportedFormat(format!(".{}", other))),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
            OutputFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
            OutputFormat::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_known_extensions() {
        assert_eq!(OutputFormat::from_path(Path::new("out.png")).unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("a/b/shot.JPG")).unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("shot.jpeg")).unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("shot.webp")).unwrap(), OutputFormat::Webp);
        assert_eq!(OutputFormat::from_path(Path::new("page.pdf")).unwrap(), OutputFormat::Pdf);
    }

    #[test]
    fn rejects_missing_or_unknown_extension() {
        assert!(matches!(
            OutputFormat::from_path(Path::new("screenshot")),
            Err(Error::UnsupportedFormat(_))
        ));
        let err = OutputFormat::from_path(Path::new("shot.gif")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported output format: .gif");
    }

    #[test]
    fn mime_types_match_formats() {
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Pdf.mime_type(), "application/pdf");
    }
}
