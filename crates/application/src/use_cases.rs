use std::path::PathBuf;

use photo_editor_domain::{AdjustmentField, FilterPreset};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "edited-image.png";

#[derive(Debug, Clone, Default)]
pub struct UploadImageCommand {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct PollUploadCommand;

#[derive(Debug, Clone, Copy)]
pub struct SetAdjustmentCommand {
    pub field: AdjustmentField,
    pub value: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct SelectFilterCommand {
    pub preset: FilterPreset,
}

#[derive(Debug, Clone, Default)]
pub struct UndoCommand;

#[derive(Debug, Clone, Copy)]
pub struct SubmitPreviewCommand {
    pub target_width: u32,
    pub target_height: u32,
}

#[derive(Debug, Clone, Default)]
pub struct PollPreviewCommand;

#[derive(Debug, Clone)]
pub struct ExportCommand {
    pub file_name: String,
}

impl Default for ExportCommand {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}
