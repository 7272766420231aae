//! Output configuration for E Ink page generation.
//!
//! This module consolidates the geometry and rendering settings that were
//! previously passed around as loose option maps: page profile, font size,
//! contrast, margins, and image policy. All types carry serde derives so
//! presets can be persisted by an external collaborator.

use serde::{Deserialize, Serialize};

/// Target page geometry profile.
///
/// `Device` is the E Ink device profile: a fixed page size and DPI for a
/// specific reader (reMarkable Paper Pro Move).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageProfile {
    /// E Ink device page (107.8 x 195.6 mm, 226 DPI)
    #[default]
    Device,
    /// ISO A4 (210 x 297 mm)
    A4,
    /// US Letter (215.9 x 279.4 mm)
    Letter,
}

impl PageProfile {
    /// Page dimensions in millimetres as `(width, height)`.
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            Self::Device => (DEVICE_WIDTH_MM, DEVICE_HEIGHT_MM),
            Self::A4 => (210.0, 297.0),
            Self::Letter => (215.9, 279.4),
        }
    }
}

/// E Ink device page width in millimetres (portrait).
pub const DEVICE_WIDTH_MM: f32 = 107.8;
/// E Ink device page height in millimetres (portrait).
pub const DEVICE_HEIGHT_MM: f32 = 195.6;
/// E Ink device panel resolution in dots per inch.
pub const DEVICE_DPI: u32 = 226;

/// Text contrast level for E Ink panels.
///
/// Lower contrast renders dark grey instead of black, which reduces
/// ghosting on some panels at the cost of legibility in sunlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contrast {
    /// Dark grey text (60, 60, 60)
    Low,
    /// Near-black text (30, 30, 30)
    #[default]
    Medium,
    /// Pure black text (0, 0, 0)
    High,
}

impl Contrast {
    /// Text color as an RGB triple.
    pub fn text_rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (60, 60, 60),
            Self::Medium => (30, 30, 30),
            Self::High => (0, 0, 0),
        }
    }
}

/// How extracted images are prepared for the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImagePolicy {
    /// Keep original pixels
    Original,
    /// Luminance grayscale conversion
    #[default]
    Grayscale,
    /// 1-bit black and white with Floyd-Steinberg dithering
    BlackWhite,
    /// Drop all images from the output
    Omit,
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin
    pub top: f32,
    /// Bottom margin
    pub bottom: f32,
    /// Left margin
    pub left: f32,
    /// Right margin
    pub right: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 10.0,
            bottom: 10.0,
            left: 10.0,
            right: 10.0,
        }
    }
}

impl Margins {
    /// Uniform margins on all four sides.
    pub fn uniform(mm: f32) -> Self {
        Self {
            top: mm,
            bottom: mm,
            left: mm,
            right: mm,
        }
    }
}

/// Output geometry and rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Target page profile
    pub page_profile: PageProfile,
    /// Body font size in points
    pub font_size_pt: f32,
    /// Line height as a multiple of the font size
    pub line_height: f32,
    /// Text contrast level
    pub contrast: Contrast,
    /// Page margins in millimetres
    pub margins_mm: Margins,
    /// Image preparation policy
    pub image_policy: ImagePolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            page_profile: PageProfile::Device,
            font_size_pt: 12.0,
            line_height: 1.5,
            contrast: Contrast::Medium,
            margins_mm: Margins::default(),
            image_policy: ImagePolicy::Grayscale,
        }
    }
}

impl OutputConfig {
    /// Content area width in millimetres (page width minus side margins).
    pub fn content_width_mm(&self) -> f32 {
        let (w, _) = self.page_profile.dimensions_mm();
        w - self.margins_mm.left - self.margins_mm.right
    }

    /// Content area height in millimetres (page height minus top/bottom margins).
    pub fn content_height_mm(&self) -> f32 {
        let (_, h) = self.page_profile.dimensions_mm();
        h - self.margins_mm.top - self.margins_mm.bottom
    }

    /// Line advance in millimetres for one rendered text line.
    pub fn line_height_mm(&self) -> f32 {
        self.font_size_pt * PT_TO_MM * self.line_height
    }
}

/// Points to millimetres conversion factor (1 pt = 1/72 inch).
pub const PT_TO_MM: f32 = 0.352_778;
