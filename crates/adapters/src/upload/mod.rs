use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info};
use photo_editor_application::{ApplicationError, CompletedUpload, UploadReader, UploadTicket};
use photo_editor_domain::{media_type_for_extension, ImageSource};

struct ReadJob {
    ticket: UploadTicket,
    path: PathBuf,
}

/// Reads picked files into base64 data urls on a worker thread.
///
/// Completions arrive in finishing order; the caller keeps whichever one it
/// sees last.
pub struct BackgroundUploadReader {
    next_ticket: AtomicU64,
    in_flight: Arc<AtomicUsize>,
    submit_tx: mpsc::Sender<ReadJob>,
    result_rx: Mutex<mpsc::Receiver<CompletedUpload>>,
}

impl BackgroundUploadReader {
    pub fn new() -> Self {
        let (submit_tx, submit_rx) = mpsc::channel::<ReadJob>();
        let (result_tx, result_rx) = mpsc::channel::<CompletedUpload>();
        let in_flight = Arc::new(AtomicUsize::new(0));
        spawn_reader(submit_rx, result_tx, Arc::clone(&in_flight));

        Self {
            next_ticket: AtomicU64::new(0),
            in_flight,
            submit_tx,
            result_rx: Mutex::new(result_rx),
        }
    }
}

impl Default for BackgroundUploadReader {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadReader for BackgroundUploadReader {
    fn begin_upload(&self, path: &Path) -> Result<UploadTicket, ApplicationError> {
        let ticket = UploadTicket(self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1);
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let sent = self.submit_tx.send(ReadJob {
            ticket,
            path: path.to_path_buf(),
        });
        if let Err(error) = sent {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            return Err(ApplicationError::Io(format!("failed to enqueue upload: {error}")));
        }
        Ok(ticket)
    }

    fn try_receive_upload(&self) -> Result<Option<CompletedUpload>, ApplicationError> {
        let receiver = self
            .result_rx
            .lock()
            .map_err(|_| ApplicationError::Io("upload result lock poisoned".to_string()))?;

        match receiver.try_recv() {
            Ok(upload) => Ok(Some(upload)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(ApplicationError::Io(
                "upload result channel disconnected".to_string(),
            )),
        }
    }

    fn uploads_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

fn spawn_reader(
    submit_rx: mpsc::Receiver<ReadJob>,
    result_tx: mpsc::Sender<CompletedUpload>,
    in_flight: Arc<AtomicUsize>,
) {
    thread::spawn(move || {
        while let Ok(job) = submit_rx.recv() {
            // The counter drops only after the completion is queued.
            let source = match read_as_data_url(&job.path) {
                Ok(source) => source,
                Err(error) => {
                    debug!("upload {:?} dropped: {error}", job.ticket);
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    continue;
                }
            };
            info!(
                "read {} as {} ({} base64 bytes)",
                job.path.display(),
                source.media_type(),
                source.payload().len()
            );
            let upload = CompletedUpload {
                ticket: job.ticket,
                source,
            };
            let sent = result_tx.send(upload);
            in_flight.fetch_sub(1, Ordering::SeqCst);
            if sent.is_err() {
                return;
            }
        }
    });
}

fn read_as_data_url(path: &Path) -> Result<ImageSource, ApplicationError> {
    let bytes = std::fs::read(path)
        .map_err(|error| ApplicationError::Io(format!("{}: {error}", path.display())))?;
    let media_type = sniff_media_type(path, &bytes);
    Ok(ImageSource::from_base64(media_type, &STANDARD.encode(&bytes)))
}

/// Content sniffing first, extension as the fallback.
fn sniff_media_type(path: &Path, bytes: &[u8]) -> &'static str {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(media_type_for_extension)
        .unwrap_or("application/octet-stream")
}
