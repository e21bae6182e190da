use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{Adjustments, FilterPreset};

/// A filter-function list such as `sepia(100%) blur(2px)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FilterExpression(String);

impl FilterExpression {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FilterExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the single expression shared by the live preview and the export.
///
/// The preset runs first, then brightness, contrast, saturation and finally
/// blur; functions composite left to right.
pub fn composite_filter(preset: FilterPreset, adjustments: &Adjustments) -> FilterExpression {
    let mut segments: Vec<String> = Vec::with_capacity(5);
    let preset_expression = preset.expression();
    if !preset_expression.is_empty() {
        segments.push(preset_expression.to_string());
    }
    segments.push(format!("brightness({}%)", adjustments.brightness));
    segments.push(format!("contrast({}%)", adjustments.contrast));
    segments.push(format!("saturate({}%)", adjustments.saturation));
    segments.push(format!("blur({}px)", adjustments.blur));
    FilterExpression(segments.join(" "))
}
