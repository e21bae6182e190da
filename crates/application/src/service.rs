use std::path::PathBuf;
use std::sync::Arc;

use photo_editor_domain::{
    Adjustments, DecodedImage, EditorState, FilterExpression, PreviewFrame, PreviewRequest,
};

use crate::{
    ApplicationError, Compositor, DownloadSink, ExportCommand, ImageDecoder, PollPreviewCommand,
    PollUploadCommand, PreviewPipeline, RasterEncoder, SelectFilterCommand, SetAdjustmentCommand,
    SubmitPreviewCommand, UndoCommand, UploadImageCommand, UploadReader, UploadTicket,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nothing to export: no image, or its dimensions are unknown.
    Skipped,
    Delivered { location: PathBuf },
}

pub struct ApplicationService {
    state: EditorState,
    decoded: Option<Arc<DecodedImage>>,
    uploads: Box<dyn UploadReader>,
    decoder: Box<dyn ImageDecoder>,
    compositor: Box<dyn Compositor>,
    preview: Box<dyn PreviewPipeline>,
    encoder: Box<dyn RasterEncoder>,
    downloads: Box<dyn DownloadSink>,
}

impl ApplicationService {
    pub fn new(
        uploads: Box<dyn UploadReader>,
        decoder: Box<dyn ImageDecoder>,
        compositor: Box<dyn Compositor>,
        preview: Box<dyn PreviewPipeline>,
        encoder: Box<dyn RasterEncoder>,
        downloads: Box<dyn DownloadSink>,
    ) -> Self {
        Self {
            state: EditorState::new(),
            decoded: None,
            uploads,
            decoder,
            compositor,
            preview,
            encoder,
            downloads,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn upload_image(
        &self,
        command: UploadImageCommand,
    ) -> Result<Option<UploadTicket>, ApplicationError> {
        let Some(path) = command.path else {
            log::debug!("upload skipped: no file selected");
            return Ok(None);
        };
        let ticket = self.uploads.begin_upload(&path)?;
        log::debug!("upload {} started for {}", ticket.0, path.display());
        Ok(Some(ticket))
    }

    /// Applies finished uploads in completion order; the last one wins.
    pub fn poll_upload(&mut self, _command: PollUploadCommand) -> Result<bool, ApplicationError> {
        let mut latest = None;
        while let Some(completed) = self.uploads.try_receive_upload()? {
            log::debug!("upload {} completed", completed.ticket.0);
            self.state.replace_source(completed.source.clone());
            latest = Some(completed);
        }

        let Some(completed) = latest else {
            return Ok(false);
        };

        self.decoded = None;
        match self.decoder.decode(&completed.source) {
            Ok(image) => {
                log::info!(
                    "loaded {} image {}x{}",
                    completed.source.media_type(),
                    image.width,
                    image.height
                );
                self.state.set_source_dimensions(image.dimensions());
                self.decoded = Some(Arc::new(image));
            }
            Err(error) => {
                log::debug!("upload {} could not be decoded: {error}", completed.ticket.0);
            }
        }
        Ok(true)
    }

    pub fn set_adjustment(&mut self, command: SetAdjustmentCommand) -> Adjustments {
        let next = self.state.set_adjustment(command.field, command.value);
        log::trace!(
            "{} set to {} (history {})",
            command.field.name(),
            command.value,
            self.state.history().len()
        );
        next
    }

    pub fn select_filter(&mut self, command: SelectFilterCommand) {
        log::trace!("preset {} selected", command.preset);
        self.state.select_preset(command.preset);
    }

    pub fn undo(&mut self, _command: UndoCommand) -> bool {
        let changed = self.state.undo();
        if !changed {
            log::trace!("undo ignored at seed snapshot");
        }
        changed
    }

    pub fn composite_expression(&self) -> FilterExpression {
        self.state.composite_expression()
    }

    /// Queues a preview render of the current state. Returns `false` when
    /// there is no decoded image to render.
    pub fn submit_preview(&self, command: SubmitPreviewCommand) -> Result<bool, ApplicationError> {
        let Some(source) = self.decoded.as_ref() else {
            return Ok(false);
        };
        if command.target_width == 0 || command.target_height == 0 {
            return Err(ApplicationError::InvalidInput(
                "preview target dimensions must be non-zero".to_string(),
            ));
        }
        self.preview.submit_preview(PreviewRequest {
            source: Arc::clone(source),
            expression: self.state.composite_expression(),
            target_width: command.target_width,
            target_height: command.target_height,
        })?;
        Ok(true)
    }

    pub fn poll_preview(
        &self,
        _command: PollPreviewCommand,
    ) -> Result<Option<PreviewFrame>, ApplicationError> {
        self.preview.try_receive_preview()
    }

    pub fn upload_in_flight(&self) -> bool {
        self.uploads.uploads_in_flight()
    }

    pub fn preview_in_flight(&self) -> bool {
        self.preview.is_rendering()
    }

    pub fn export(&self, command: ExportCommand) -> Result<ExportOutcome, ApplicationError> {
        let (Some(dimensions), Some(image)) = (self.state.export_dimensions(), self.decoded.as_ref())
        else {
            log::debug!("export skipped: no decoded image");
            return Ok(ExportOutcome::Skipped);
        };

        let expression = self.state.composite_expression();
        let surface = self.compositor.composite(image, &expression)?;
        if surface.width != dimensions.width || surface.height != dimensions.height {
            return Err(ApplicationError::Render(format!(
                "compositor returned {}x{} for a {}x{} source",
                surface.width, surface.height, dimensions.width, dimensions.height
            )));
        }
        let bytes = self.encoder.encode_lossless(&surface)?;
        let location = self.downloads.deliver(&command.file_name, &bytes)?;
        log::info!(
            "exported {}x{} image to {}",
            surface.width,
            surface.height,
            location.display()
        );
        Ok(ExportOutcome::Delivered { location })
    }
}
