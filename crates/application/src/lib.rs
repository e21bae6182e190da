mod error;
mod ports;
mod service;
mod use_cases;

pub use error::ApplicationError;
pub use ports::{
    CompletedUpload, Compositor, DownloadSink, ImageDecoder, PreviewPipeline, RasterEncoder,
    UploadReader, UploadTicket,
};
pub use service::{ApplicationService, ExportOutcome};
pub use use_cases::{
    ExportCommand, PollPreviewCommand, PollUploadCommand, SelectFilterCommand,
    SetAdjustmentCommand, SubmitPreviewCommand, UndoCommand, UploadImageCommand,
    DEFAULT_EXPORT_FILE_NAME,
};
