use std::path::{Path, PathBuf};
use std::sync::Arc;

use photo_editor_domain::{
    DecodedImage, FilterExpression, ImageSource, PreviewFrame, PreviewRequest, RasterSurface,
};

use crate::ApplicationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UploadTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedUpload {
    pub ticket: UploadTicket,
    pub source: ImageSource,
}

/// Reads a picked file into an encoded source off the UI thread.
///
/// A file that cannot be read never shows up in `try_receive_upload`.
pub trait UploadReader {
    fn begin_upload(&self, path: &Path) -> Result<UploadTicket, ApplicationError>;

    fn try_receive_upload(&self) -> Result<Option<CompletedUpload>, ApplicationError>;

    /// True while a begun upload has neither completed nor been dropped.
    /// Turns false only after any completion has been queued.
    fn uploads_in_flight(&self) -> bool;
}

pub trait ImageDecoder {
    fn decode(&self, source: &ImageSource) -> Result<DecodedImage, ApplicationError>;
}

/// Draws an image through a filter expression, standing in for the host's
/// compositing filters.
pub trait Compositor: Send + Sync {
    fn composite(
        &self,
        image: &DecodedImage,
        expression: &FilterExpression,
    ) -> Result<RasterSurface, ApplicationError>;
}

impl<T: Compositor + ?Sized> Compositor for Arc<T> {
    fn composite(
        &self,
        image: &DecodedImage,
        expression: &FilterExpression,
    ) -> Result<RasterSurface, ApplicationError> {
        (**self).composite(image, expression)
    }
}

pub trait PreviewPipeline {
    fn submit_preview(&self, request: PreviewRequest) -> Result<(), ApplicationError>;

    fn try_receive_preview(&self) -> Result<Option<PreviewFrame>, ApplicationError>;

    /// True while the newest request is still queued or rendering. Failed
    /// and superseded renders count as finished.
    fn is_rendering(&self) -> bool;
}

pub trait RasterEncoder {
    fn encode_lossless(&self, surface: &RasterSurface) -> Result<Vec<u8>, ApplicationError>;
}

pub trait DownloadSink {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ApplicationError>;
}
