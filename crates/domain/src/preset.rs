use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Canned looks, each bound to a fixed filter-function list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FilterPreset {
    #[default]
    None,
    Grayscale,
    Sepia,
    Vintage,
    Warm,
    Cool,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 6] = [
        FilterPreset::None,
        FilterPreset::Grayscale,
        FilterPreset::Sepia,
        FilterPreset::Vintage,
        FilterPreset::Warm,
        FilterPreset::Cool,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
            Self::Vintage => "vintage",
            Self::Warm => "warm",
            Self::Cool => "cool",
        }
    }

    pub fn expression(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Grayscale => "grayscale(100%)",
            Self::Sepia => "sepia(100%)",
            Self::Vintage => "sepia(50%) contrast(85%) brightness(90%)",
            Self::Warm => "saturate(150%) hue-rotate(10deg)",
            Self::Cool => "saturate(120%) hue-rotate(-10deg)",
        }
    }
}

impl Display for FilterPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterPreset {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == value)
            .ok_or_else(|| DomainError::UnknownPreset(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_is_none_with_empty_expression() {
        assert_eq!(FilterPreset::default(), FilterPreset::None);
        assert!(FilterPreset::None.expression().is_empty());
    }

    #[test]
    fn every_named_preset_roundtrips_through_its_name() {
        for preset in FilterPreset::ALL {
            assert_eq!(preset.name().parse::<FilterPreset>(), Ok(preset));
        }
    }

    #[test]
    fn vintage_expression_is_fixed() {
        assert_eq!(
            FilterPreset::Vintage.expression(),
            "sepia(50%) contrast(85%) brightness(90%)"
        );
        assert_eq!(
            FilterPreset::Cool.expression(),
            "saturate(120%) hue-rotate(-10deg)"
        );
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(matches!(
            "noir".parse::<FilterPreset>(),
            Err(DomainError::UnknownPreset(name)) if name == "noir"
        ));
    }

    #[test]
    fn serializes_as_lowercase_name() {
        let json = serde_json::to_string(&FilterPreset::Warm).expect("serialize");
        assert_eq!(json, "\"warm\"");
    }
}
