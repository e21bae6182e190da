use crate::{
    composite_filter, AdjustmentField, Adjustments, FilterExpression, FilterPreset, History,
    ImageDimensions, ImageSource,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
    pub source: ImageSource,
    pub dimensions: Option<ImageDimensions>,
}

/// All editor state, changed only through the transitions below.
///
/// The composite expression is derived on demand and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    source: Option<LoadedSource>,
    adjustments: Adjustments,
    preset: FilterPreset,
    history: History,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&LoadedSource> {
        self.source.as_ref()
    }

    pub fn adjustments(&self) -> Adjustments {
        self.adjustments
    }

    pub fn preset(&self) -> FilterPreset {
        self.preset
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Installs a freshly uploaded image. Adjustments, preset and history are
    /// carried over to the new image.
    pub fn replace_source(&mut self, source: ImageSource) {
        self.source = Some(LoadedSource {
            source,
            dimensions: None,
        });
    }

    pub fn set_source_dimensions(&mut self, dimensions: ImageDimensions) {
        if let Some(loaded) = self.source.as_mut() {
            loaded.dimensions = Some(dimensions);
        }
    }

    pub fn set_adjustment(&mut self, field: AdjustmentField, value: i32) -> Adjustments {
        let next = self.adjustments.with_field(field, value);
        self.adjustments = next;
        self.history.push(next);
        next
    }

    pub fn select_preset(&mut self, preset: FilterPreset) {
        self.preset = preset;
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(previous) => {
                self.adjustments = previous;
                true
            }
            None => false,
        }
    }

    pub fn composite_expression(&self) -> FilterExpression {
        composite_filter(self.preset, &self.adjustments)
    }

    /// Natural dimensions of the loaded image, if it has been decoded.
    pub fn export_dimensions(&self) -> Option<ImageDimensions> {
        self.source.as_ref().and_then(|loaded| loaded.dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_source(tag: &str) -> ImageSource {
        ImageSource::from_base64("image/png", tag)
    }

    #[test]
    fn history_tracks_every_change() {
        let mut state = EditorState::new();
        let changes = [
            (AdjustmentField::Brightness, 120),
            (AdjustmentField::Contrast, 90),
            (AdjustmentField::Blur, 4),
            (AdjustmentField::Saturation, 170),
        ];
        for (field, value) in changes {
            state.set_adjustment(field, value);
        }
        assert_eq!(state.history().len(), changes.len() + 1);
        assert_eq!(state.history().current(), state.adjustments());
    }

    #[test]
    fn brightness_then_undo_restores_default() {
        let mut state = EditorState::new();
        state.set_adjustment(AdjustmentField::Brightness, 150);
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.adjustments().brightness, 150);

        assert!(state.undo());
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.adjustments().brightness, 100);
    }

    #[test]
    fn undo_is_inverse_of_last_change() {
        let mut state = EditorState::new();
        state.set_adjustment(AdjustmentField::Blur, 2);
        let before = state.clone();

        state.set_adjustment(AdjustmentField::Contrast, 10);
        state.undo();
        assert_eq!(state, before);
    }

    #[test]
    fn undo_at_seed_changes_nothing() {
        let mut state = EditorState::new();
        let before = state.clone();
        assert!(!state.undo());
        assert_eq!(state, before);
    }

    #[test]
    fn repeated_identical_values_all_land_in_history() {
        let mut state = EditorState::new();
        for _ in 0..5 {
            state.set_adjustment(AdjustmentField::Saturation, 0);
        }
        assert_eq!(state.history().len(), 6);
    }

    #[test]
    fn switching_presets_leaves_history_alone() {
        let mut state = EditorState::new();
        state.set_adjustment(AdjustmentField::Brightness, 130);
        let history = state.history().clone();
        for preset in FilterPreset::ALL {
            state.select_preset(preset);
            assert_eq!(state.history(), &history);
        }
        assert_eq!(state.preset(), FilterPreset::Cool);
    }

    #[test]
    fn new_upload_keeps_edits() {
        let mut state = EditorState::new();
        state.replace_source(sample_source("Zmlyc3Q="));
        state.set_source_dimensions(ImageDimensions {
            width: 4,
            height: 3,
        });
        state.select_preset(FilterPreset::Vintage);
        state.set_adjustment(AdjustmentField::Contrast, 60);

        state.replace_source(sample_source("c2Vjb25k"));
        assert_eq!(state.preset(), FilterPreset::Vintage);
        assert_eq!(state.adjustments().contrast, 60);
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.export_dimensions(), None);
        assert_eq!(
            state.source().map(|loaded| loaded.source.payload()),
            Some("c2Vjb25k")
        );
    }

    #[test]
    fn dimensions_require_a_source() {
        let mut state = EditorState::new();
        state.set_source_dimensions(ImageDimensions {
            width: 10,
            height: 10,
        });
        assert_eq!(state.export_dimensions(), None);
    }

    #[test]
    fn expression_is_recomputed_from_current_state() {
        let mut state = EditorState::new();
        state.select_preset(FilterPreset::Sepia);
        state.set_adjustment(AdjustmentField::Blur, 5);
        let text = state.composite_expression().to_string();
        assert!(text.find("sepia(100%)") < text.find("blur(5px)"));

        state.undo();
        assert!(state.composite_expression().as_str().ends_with("blur(0px)"));
        assert_eq!(state.composite_expression(), state.composite_expression());
    }
}
