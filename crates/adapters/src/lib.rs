pub mod compositor;
pub mod export;
pub mod presenters;
pub mod preview;
pub mod upload;

pub use compositor::FilterCompositor;
pub use export::{FsDownloadSink, PngRasterEncoder};
pub use presenters::{
    present_adjustment_value, present_field_label, present_history_status, present_preset_label,
    present_state_json,
};
pub use preview::BackgroundPreviewPipeline;
pub use upload::BackgroundUploadReader;

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageReader;
use photo_editor_application::{ApplicationError, ImageDecoder};
use photo_editor_domain::{DecodedImage, ImageSource};

/// Decodes the base64 payload of a data url with the `image` crate.
#[derive(Debug, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, source: &ImageSource) -> Result<DecodedImage, ApplicationError> {
        let bytes = STANDARD
            .decode(source.payload())
            .map_err(|error| ApplicationError::Decode(format!("invalid base64 payload: {error}")))?;

        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|error| ApplicationError::Decode(error.to_string()))?
            .decode()
            .map_err(|error| ApplicationError::Decode(error.to_string()))?
            .to_rgba8();

        if image.width() == 0 || image.height() == 0 {
            return Err(ApplicationError::Decode(format!(
                "{} image has no pixels",
                source.media_type()
            )));
        }

        Ok(DecodedImage {
            width: image.width(),
            height: image.height(),
            pixels: image.into_raw(),
        })
    }
}
