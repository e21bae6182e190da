use photo_editor_domain::{AdjustmentField, EditorState, FilterPreset, History, HistoryState};
use serde_json::json;

pub fn present_field_label(field: AdjustmentField) -> String {
    capitalize(field.name())
}

pub fn present_preset_label(preset: FilterPreset) -> String {
    capitalize(preset.name())
}

pub fn present_adjustment_value(field: AdjustmentField, value: i32) -> String {
    format!("{value}{}", field.unit())
}

pub fn present_history_status(history: &History) -> String {
    match history.state() {
        HistoryState::AtSeed => "nothing to undo".to_string(),
        HistoryState::CanUndo => match history.len() - 1 {
            1 => "1 undo step".to_string(),
            steps => format!("{steps} undo steps"),
        },
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Compact one-line dump of the editor state for debug logs.
pub fn present_state_json(state: &EditorState) -> String {
    let source = state.source().map(|loaded| {
        json!({
            "media_type": loaded.source.media_type(),
            "dimensions": loaded.dimensions,
        })
    });
    json!({
        "source": source,
        "adjustments": state.adjustments(),
        "preset": state.preset(),
        "history_len": state.history().len(),
        "expression": state.composite_expression(),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use photo_editor_domain::ImageSource;

    #[test]
    fn values_carry_their_unit() {
        assert_eq!(present_adjustment_value(AdjustmentField::Brightness, 150), "150%");
        assert_eq!(present_adjustment_value(AdjustmentField::Blur, 5), "5px");
        assert_eq!(present_field_label(AdjustmentField::Saturation), "Saturation");
        assert_eq!(present_preset_label(FilterPreset::Vintage), "Vintage");
    }

    #[test]
    fn history_status_counts_undo_steps() {
        let mut state = EditorState::new();
        assert_eq!(present_history_status(state.history()), "nothing to undo");
        state.set_adjustment(AdjustmentField::Contrast, 80);
        assert_eq!(present_history_status(state.history()), "1 undo step");
        state.set_adjustment(AdjustmentField::Blur, 2);
        assert_eq!(present_history_status(state.history()), "2 undo steps");
    }

    #[test]
    fn state_json_includes_expression_and_source() {
        let mut state = EditorState::new();
        state.replace_source(ImageSource::from_base64("image/png", "AAAA"));
        state.select_preset(FilterPreset::Sepia);

        let value: serde_json::Value =
            serde_json::from_str(&present_state_json(&state)).expect("json");
        assert_eq!(value["preset"], "sepia");
        assert_eq!(value["source"]["media_type"], "image/png");
        assert!(value["source"]["dimensions"].is_null());
        assert_eq!(
            value["expression"],
            state.composite_expression().as_str()
        );
    }
}
