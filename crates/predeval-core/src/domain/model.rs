//! Model roster: the ordered (name, color) pairs every run iterates over.

use serde::{Deserialize, Serialize};

/// An sRGB plot color.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(0xff, 0x00, 0x00);
    pub const BLUE: Rgb = Rgb::new(0x00, 0x00, 0xff);
    pub const GREEN: Rgb = Rgb::new(0x00, 0x80, 0x00);
    pub const YELLOW: Rgb = Rgb::new(0xff, 0xff, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A named model and the color its ROC curve is drawn in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelSpec {
    /// Display name, also used for heatmap titles and filenames.
    pub name: String,

    /// Stable lowercase identifier used in derived prediction filenames.
    pub slug: String,

    /// ROC curve color.
    pub color: Rgb,
}

impl ModelSpec {
    /// Create a spec, deriving the slug from the display name.
    pub fn new(name: impl Into<String>, color: Rgb) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self { name, slug, color }
    }
}

fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Ordered list of models evaluated together in one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelRoster {
    models: Vec<ModelSpec>,
}

impl ModelRoster {
    pub fn new(models: Vec<ModelSpec>) -> Self {
        Self { models }
    }

    pub fn models(&self) -> &[ModelSpec] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelSpec> {
        self.models.iter()
    }
}

impl Default for ModelRoster {
    /// XGBoost, LightGBM, GBDT, Neural Network.
    fn default() -> Self {
        Self::new(vec![
            ModelSpec::new("XGBoost", Rgb::RED),
            ModelSpec::new("LightGBM", Rgb::BLUE),
            ModelSpec::new("GBDT", Rgb::GREEN),
            ModelSpec::new("Neural Network", Rgb::YELLOW),
        ])
    }
}

impl<'a> IntoIterator for &'a ModelRoster {
    type Item = &'a ModelSpec;
    type IntoIter = std::slice::Iter<'a, ModelSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}
