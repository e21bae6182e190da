use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

pub const PERCENT_RANGE: RangeInclusive<i32> = 0..=200;
pub const BLUR_RANGE: RangeInclusive<i32> = 0..=10;

/// The four continuous corrections applied on top of the active preset.
///
/// Values are percentages for brightness/contrast/saturation and a radius in
/// pixels for blur. Nothing here clamps: the ranges are enforced by the input
/// controls only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Adjustments {
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    pub blur: i32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            brightness: 100,
            contrast: 100,
            saturation: 100,
            blur: 0,
        }
    }
}

impl Adjustments {
    pub fn get(&self, field: AdjustmentField) -> i32 {
        match field {
            AdjustmentField::Brightness => self.brightness,
            AdjustmentField::Contrast => self.contrast,
            AdjustmentField::Saturation => self.saturation,
            AdjustmentField::Blur => self.blur,
        }
    }

    /// Copy of `self` with one field replaced.
    pub fn with_field(self, field: AdjustmentField, value: i32) -> Self {
        let mut next = self;
        match field {
            AdjustmentField::Brightness => next.brightness = value,
            AdjustmentField::Contrast => next.contrast = value,
            AdjustmentField::Saturation => next.saturation = value,
            AdjustmentField::Blur => next.blur = value,
        }
        next
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentField {
    Brightness,
    Contrast,
    Saturation,
    Blur,
}

impl AdjustmentField {
    pub const ALL: [AdjustmentField; 4] = [
        AdjustmentField::Brightness,
        AdjustmentField::Contrast,
        AdjustmentField::Saturation,
        AdjustmentField::Blur,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturation => "saturation",
            Self::Blur => "blur",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Blur => "px",
            _ => "%",
        }
    }

    pub fn range(self) -> RangeInclusive<i32> {
        match self {
            Self::Blur => BLUR_RANGE,
            _ => PERCENT_RANGE,
        }
    }
}

impl FromStr for AdjustmentField {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == value)
            .ok_or_else(|| DomainError::UnknownAdjustment(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_neutral() {
        let adjustments = Adjustments::default();
        assert_eq!(adjustments.brightness, 100);
        assert_eq!(adjustments.contrast, 100);
        assert_eq!(adjustments.saturation, 100);
        assert_eq!(adjustments.blur, 0);
    }

    #[test]
    fn with_field_leaves_original_untouched() {
        let original = Adjustments::default();
        let next = original.with_field(AdjustmentField::Contrast, 140);
        assert_eq!(original.contrast, 100);
        assert_eq!(next.contrast, 140);
        assert_eq!(next.brightness, original.brightness);
        assert_eq!(next.blur, original.blur);
    }

    #[test]
    fn with_field_does_not_clamp() {
        let next = Adjustments::default().with_field(AdjustmentField::Blur, 42);
        assert_eq!(next.get(AdjustmentField::Blur), 42);
    }

    #[test]
    fn field_ranges_and_units() {
        assert_eq!(AdjustmentField::Saturation.range(), 0..=200);
        assert_eq!(AdjustmentField::Blur.range(), 0..=10);
        assert_eq!(AdjustmentField::Brightness.unit(), "%");
        assert_eq!(AdjustmentField::Blur.unit(), "px");
    }

    #[test]
    fn parses_field_names() {
        assert_eq!(
            "saturation".parse::<AdjustmentField>(),
            Ok(AdjustmentField::Saturation)
        );
        assert!(matches!(
            "hue".parse::<AdjustmentField>(),
            Err(DomainError::UnknownAdjustment(name)) if name == "hue"
        ));
    }
}
