//! Page geometry accepted by the PDF renderer.

use std::fmt;
use std::str::FromStr;

use crate::export::error::ExportError;

/// Page margin used when none is configured.
pub const DEFAULT_MARGIN: &str = "1cm";

/// Height of the header and footer bands.
pub const BAND_HEIGHT: &str = "1cm";

/// Paper sizes understood by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PaperFormat {
    /// ISO A3.
    A3,
    /// ISO A4.
    #[default]
    A4,
    /// ISO A5.
    A5,
    /// US Legal.
    Legal,
    /// US Letter.
    Letter,
    /// US Tabloid.
    Tabloid,
}

impl PaperFormat {
    /// Every supported format, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::A3,
        Self::A4,
        Self::A5,
        Self::Legal,
        Self::Letter,
        Self::Tabloid,
    ];

    /// Returns the name passed to the renderer.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A3 => "A3",
            Self::A4 => "A4",
            Self::A5 => "A5",
            Self::Legal => "Legal",
            Self::Letter => "Letter",
            Self::Tabloid => "Tabloid",
        }
    }
}

impl fmt::Display for PaperFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaperFormat {
    type Err = ExportError;

    /// Matches format names exactly; `a4` is not `A4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| ExportError::Configuration {
                message: format!(
                    "unsupported paper format '{s}', expected one of: {}",
                    Self::ALL.map(Self::as_str).join(", ")
                ),
            })
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Taller than wide.
    #[default]
    Portrait,
    /// Wider than tall.
    Landscape,
}

impl Orientation {
    /// Returns the name passed to the renderer.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            other => Err(ExportError::Configuration {
                message: format!(
                    "unsupported orientation '{other}', expected one of: portrait, landscape"
                ),
            }),
        }
    }
}
