//! Filter descriptors and the transform signatures they point at.
//!
//! A descriptor pairs a display name with a transform function. The
//! transform's arity is part of its type: [`Transform::Plain`] takes only
//! the image, [`Transform::Sized`] also takes a validated kernel size. The
//! "accepts kernel size" flag is derived from that, so the two can never
//! disagree.

use crate::core::kernel::KernelSize;
use crate::core::types::{ChannelMode, PixelBuffer};
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Category for organizing filters in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Smoothing and noise reduction
    Blur,
    /// Sharpening effects
    Sharpen,
    /// Edge detection
    Edge,
    /// Tone and contrast adjustments
    Adjust,
    /// Stylization effects
    Stylize,
    /// Binarization
    Threshold,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Blur => "Blur",
            Category::Sharpen => "Sharpen",
            Category::Edge => "Edge",
            Category::Adjust => "Adjust",
            Category::Stylize => "Stylize",
            Category::Threshold => "Threshold",
        }
    }

    /// Get all categories in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Blur,
            Category::Sharpen,
            Category::Edge,
            Category::Adjust,
            Category::Stylize,
            Category::Threshold,
        ]
    }
}

/// A pixel transform. Transforms are pure: they read the input and return
/// a new buffer.
#[derive(Clone, Copy)]
pub enum Transform {
    /// Takes only the image.
    Plain(fn(&RgbImage) -> PixelBuffer),
    /// Takes the image and a kernel size.
    Sized(fn(&RgbImage, KernelSize) -> PixelBuffer),
}

impl Transform {
    /// Whether this transform takes a kernel size.
    pub fn accepts_kernel_size(&self) -> bool {
        matches!(self, Transform::Sized(_))
    }
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transform::Plain(_) => f.write_str("Transform::Plain(<fn>)"),
            Transform::Sized(_) => f.write_str("Transform::Sized(<fn>)"),
        }
    }
}

/// Metadata describing a filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterMetadata {
    /// Stable identifier (e.g., "median_blur")
    pub id: String,
    /// Display label, unique within the registry (e.g., "Median Blur")
    pub name: String,
    /// Category for listings
    pub category: Category,
    /// One-line description
    pub description: String,
    /// Channel mode the filter produces for color input
    pub output_mode: ChannelMode,
}

impl FilterMetadata {
    /// Create a new metadata builder.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> FilterMetadataBuilder {
        FilterMetadataBuilder::new(id, name)
    }
}

/// Builder for FilterMetadata.
pub struct FilterMetadataBuilder {
    id: String,
    name: String,
    category: Category,
    description: String,
    output_mode: ChannelMode,
}

impl FilterMetadataBuilder {
    /// Create a new builder with required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: Category::Adjust,
            description: String::new(),
            output_mode: ChannelMode::Rgb,
        }
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the filter as producing a single intensity channel.
    pub fn grayscale_output(mut self) -> Self {
        self.output_mode = ChannelMode::Gray;
        self
    }

    /// Build the metadata.
    pub fn build(self) -> FilterMetadata {
        FilterMetadata {
            id: self.id,
            name: self.name,
            category: self.category,
            description: self.description,
            output_mode: self.output_mode,
        }
    }
}

/// A registered filter: its metadata and transform.
#[derive(Debug, Clone)]
pub struct FilterDescriptor {
    /// Display and listing metadata.
    pub metadata: FilterMetadata,
    /// Function that applies the filter.
    pub transform: Transform,
}

impl FilterDescriptor {
    /// Create a descriptor.
    pub fn new(metadata: FilterMetadata, transform: Transform) -> Self {
        Self { metadata, transform }
    }

    /// Display label.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Whether the filter takes a kernel size.
    pub fn accepts_kernel_size(&self) -> bool {
        self.transform.accepts_kernel_size()
    }
}
