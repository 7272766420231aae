//! Output handoff for rendering collaborators.
//!
//! The pipeline's terminal artifact is a [`PaginatedDocument`]: resolved
//! page geometry, placed lines and images, and the prepared image payloads.
//! PDF serialization and EPUB packaging live outside this crate; they only
//! need the structures here plus the HTML fragment view for reflowable
//! targets.

mod html;

pub use html::html_fragments;

use crate::config::OutputConfig;
use crate::flow::OutputPage;
use crate::images::ExtractedImage;
use crate::pipeline::{Conversion, ExtractionMethod};

/// Everything a rendering collaborator needs to serialize the result.
#[derive(Debug)]
pub struct PaginatedDocument {
    /// Output title, usually derived from the input file name
    pub title: Option<String>,
    /// The configuration the pages were flowed against
    pub config: OutputConfig,
    /// Flowed pages with placed lines and images
    pub pages: Vec<OutputPage>,
    /// Prepared image payloads referenced by `image_index`
    pub images: Vec<ExtractedImage>,
    /// Normalized document text, for reflowable (EPUB-style) targets
    pub text: String,
    /// How the text was obtained; degraded methods may warrant a notice
    pub method: ExtractionMethod,
}

impl PaginatedDocument {
    /// Assemble the handoff from a finished conversion.
    pub fn from_conversion(conversion: Conversion, config: OutputConfig, title: Option<String>) -> Self {
        Self {
            title,
            config,
            pages: conversion.pages,
            images: conversion.images,
            text: conversion.text,
            method: conversion.method,
        }
    }

    /// HTML fragments of the normalized text, one per block, for
    /// reflowable targets.
    pub fn html_fragments(&self) -> Vec<String> {
        html_fragments(&self.text)
    }
}
