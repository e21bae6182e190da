use std::path::PathBuf;

use photo_editor_application::DEFAULT_EXPORT_FILE_NAME;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub download_dir: PathBuf,
    pub export_file_name: String,
    /// Longest preview edge; larger images are downsampled for display.
    pub preview_max_edge: u32,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            preview_max_edge: 1600,
            window_size: [1100.0, 760.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_exports_to_edited_image_png() {
        let config = AppConfig::default();
        assert_eq!(config.export_file_name, "edited-image.png");
        assert_eq!(config.download_dir, PathBuf::from("downloads"));
        assert!(config.preview_max_edge > 0);
    }
}
