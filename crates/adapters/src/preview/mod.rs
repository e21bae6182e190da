use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Instant;

use image::imageops::FilterType;
use image::RgbaImage;
use log::{debug, trace};
use photo_editor_application::{ApplicationError, Compositor, PreviewPipeline};
use photo_editor_domain::{DecodedImage, PreviewFrame, PreviewRequest};

struct ScheduledJob {
    sequence: u64,
    request: PreviewRequest,
}

/// Composites downsampled previews on a worker thread; only the newest
/// request is rendered and only its frame is handed back.
pub struct BackgroundPreviewPipeline {
    next_sequence: AtomicU64,
    latest_sequence: Arc<AtomicU64>,
    finished_sequence: Arc<AtomicU64>,
    submit_tx: mpsc::Sender<ScheduledJob>,
    result_rx: Mutex<mpsc::Receiver<PreviewFrame>>,
}

impl BackgroundPreviewPipeline {
    pub fn new(compositor: Arc<dyn Compositor>) -> Self {
        let (submit_tx, submit_rx) = mpsc::channel::<ScheduledJob>();
        let (result_tx, result_rx) = mpsc::channel::<PreviewFrame>();
        let latest_sequence = Arc::new(AtomicU64::new(0));
        let finished_sequence = Arc::new(AtomicU64::new(0));

        spawn_worker(
            submit_rx,
            result_tx,
            Arc::clone(&latest_sequence),
            Arc::clone(&finished_sequence),
            compositor,
        );

        Self {
            next_sequence: AtomicU64::new(0),
            latest_sequence,
            finished_sequence,
            submit_tx,
            result_rx: Mutex::new(result_rx),
        }
    }
}

impl PreviewPipeline for BackgroundPreviewPipeline {
    fn submit_preview(&self, request: PreviewRequest) -> Result<(), ApplicationError> {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest_sequence.store(sequence, Ordering::SeqCst);
        self.submit_tx
            .send(ScheduledJob { sequence, request })
            .map_err(|error| ApplicationError::Io(format!("failed to enqueue preview job: {error}")))
    }

    fn try_receive_preview(&self) -> Result<Option<PreviewFrame>, ApplicationError> {
        let receiver = self
            .result_rx
            .lock()
            .map_err(|_| ApplicationError::Io("preview result lock poisoned".to_string()))?;

        let mut newest = match receiver.try_recv() {
            Ok(frame) => frame,
            Err(mpsc::TryRecvError::Empty) => return Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => {
                return Err(ApplicationError::Io(
                    "preview result channel disconnected".to_string(),
                ))
            }
        };
        while let Ok(next) = receiver.try_recv() {
            trace!("dropping stale preview frame {}", newest.sequence);
            newest = next;
        }

        Ok(Some(newest))
    }

    fn is_rendering(&self) -> bool {
        self.latest_sequence.load(Ordering::SeqCst) > self.finished_sequence.load(Ordering::SeqCst)
    }
}

fn spawn_worker(
    submit_rx: mpsc::Receiver<ScheduledJob>,
    result_tx: mpsc::Sender<PreviewFrame>,
    latest_sequence: Arc<AtomicU64>,
    finished_sequence: Arc<AtomicU64>,
    compositor: Arc<dyn Compositor>,
) {
    thread::spawn(move || {
        while let Ok(mut job) = submit_rx.recv() {
            while let Ok(next) = submit_rx.try_recv() {
                job = next;
            }
            // Every exit below marks the job finished; a sent frame is queued first.
            if job.sequence < latest_sequence.load(Ordering::SeqCst) {
                finished_sequence.fetch_max(job.sequence, Ordering::SeqCst);
                continue;
            }

            let started = Instant::now();
            let rendered = match render(compositor.as_ref(), &job.request) {
                Ok(rendered) => rendered,
                Err(error) => {
                    debug!("preview {} failed: {error}", job.sequence);
                    finished_sequence.fetch_max(job.sequence, Ordering::SeqCst);
                    continue;
                }
            };
            let elapsed = started.elapsed().as_millis() as u64;

            if job.sequence < latest_sequence.load(Ordering::SeqCst) {
                finished_sequence.fetch_max(job.sequence, Ordering::SeqCst);
                continue;
            }

            let frame = PreviewFrame {
                sequence: job.sequence,
                width: rendered.width(),
                height: rendered.height(),
                render_time_ms: elapsed,
                pixels: rendered.into_raw(),
            };
            let sequence = frame.sequence;
            let sent = result_tx.send(frame);
            finished_sequence.fetch_max(sequence, Ordering::SeqCst);
            if sent.is_err() {
                return;
            }
        }
    });
}

fn render(compositor: &dyn Compositor, request: &PreviewRequest) -> Result<RgbaImage, ApplicationError> {
    let scaled = downsample(&request.source, request.target_width, request.target_height)?;
    let surface = match scaled {
        Some(scaled) => compositor.composite(&scaled, &request.expression)?,
        None => compositor.composite(&request.source, &request.expression)?,
    };
    RgbaImage::from_raw(surface.width, surface.height, surface.pixels)
        .ok_or_else(|| ApplicationError::Render("compositor returned a short buffer".to_string()))
}

/// Scales down to fit the target box, keeping aspect ratio. Never upscales;
/// `None` means the source already fits.
fn downsample(
    source: &DecodedImage,
    target_width: u32,
    target_height: u32,
) -> Result<Option<DecodedImage>, ApplicationError> {
    if target_width == 0 || target_height == 0 {
        return Err(ApplicationError::InvalidInput(
            "preview target must be non-zero".to_string(),
        ));
    }
    if source.width <= target_width && source.height <= target_height {
        return Ok(None);
    }

    let scale = f64::min(
        target_width as f64 / source.width as f64,
        target_height as f64 / source.height as f64,
    );
    let width = ((source.width as f64 * scale).round() as u32).max(1);
    let height = ((source.height as f64 * scale).round() as u32).max(1);

    let image = RgbaImage::from_raw(source.width, source.height, source.pixels.clone())
        .ok_or_else(|| ApplicationError::Render("source pixel buffer is truncated".to_string()))?;
    let resized = image::imageops::resize(&image, width, height, FilterType::Triangle);
    Ok(Some(DecodedImage {
        width,
        height,
        pixels: resized.into_raw(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterCompositor;
    use photo_editor_domain::FilterExpression;
    use std::time::Duration;

    fn source(width: u32, height: u32) -> Arc<DecodedImage> {
        Arc::new(DecodedImage {
            width,
            height,
            pixels: vec![120; (width * height * 4) as usize],
        })
    }

    fn request(width: u32, height: u32, expression: &str) -> PreviewRequest {
        PreviewRequest {
            source: source(width, height),
            expression: FilterExpression::new(expression),
            target_width: 64,
            target_height: 64,
        }
    }

    #[test]
    fn latest_job_wins() {
        let pipeline = BackgroundPreviewPipeline::new(Arc::new(FilterCompositor::cpu_only()));
        for brightness in 0..8 {
            pipeline
                .submit_preview(request(32, 16, &format!("brightness({}%)", brightness * 20)))
                .expect("submit preview");
        }

        let deadline = Instant::now() + Duration::from_millis(2000);
        let frame = loop {
            if let Some(frame) = pipeline.try_receive_preview().expect("poll") {
                if frame.sequence == 8 {
                    break frame;
                }
            }
            assert!(Instant::now() < deadline, "timed out waiting for preview frame");
            thread::sleep(Duration::from_millis(10));
        };
        assert_eq!((frame.width, frame.height), (32, 16));
        assert_eq!(frame.pixels.len(), 32 * 16 * 4);
    }

    #[test]
    fn failed_render_stops_counting_as_in_flight() {
        let pipeline = BackgroundPreviewPipeline::new(Arc::new(FilterCompositor::cpu_only()));
        let truncated = PreviewRequest {
            source: Arc::new(DecodedImage {
                width: 8,
                height: 8,
                pixels: vec![0; 12],
            }),
            expression: FilterExpression::new("sepia(100%)"),
            target_width: 64,
            target_height: 64,
        };
        pipeline.submit_preview(truncated).expect("submit preview");

        let deadline = Instant::now() + Duration::from_millis(2000);
        while pipeline.is_rendering() {
            assert!(Instant::now() < deadline, "failed render still in flight");
            thread::sleep(Duration::from_millis(10));
        }
        assert!(pipeline.try_receive_preview().expect("poll").is_none());
    }

    #[test]
    fn finished_frame_is_queued_before_rendering_clears() {
        let pipeline = BackgroundPreviewPipeline::new(Arc::new(FilterCompositor::cpu_only()));
        pipeline
            .submit_preview(request(4, 4, "grayscale(100%)"))
            .expect("submit preview");

        let deadline = Instant::now() + Duration::from_millis(2000);
        while pipeline.is_rendering() {
            assert!(Instant::now() < deadline, "render still in flight");
            thread::sleep(Duration::from_millis(10));
        }
        let frame = pipeline.try_receive_preview().expect("poll").expect("frame queued");
        assert_eq!(frame.sequence, 1);
    }

    #[test]
    fn downsample_fits_box_without_upscaling() {
        let scaled = downsample(&source(400, 100), 100, 100)
            .expect("downsample")
            .expect("scaled");
        assert_eq!((scaled.width, scaled.height), (100, 25));
        assert!(downsample(&source(40, 10), 100, 100).expect("downsample").is_none());
    }

    #[test]
    fn downsample_rejects_zero_dimensions() {
        assert!(matches!(
            downsample(&source(4, 4), 0, 512),
            Err(ApplicationError::InvalidInput(_))
        ));
    }
}
