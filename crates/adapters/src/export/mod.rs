use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use log::info;
use photo_editor_application::{ApplicationError, DownloadSink, RasterEncoder};
use photo_editor_domain::RasterSurface;

/// Lossless PNG encoding of a composited surface.
#[derive(Debug, Default)]
pub struct PngRasterEncoder;

impl RasterEncoder for PngRasterEncoder {
    fn encode_lossless(&self, surface: &RasterSurface) -> Result<Vec<u8>, ApplicationError> {
        let expected = surface.width as usize * surface.height as usize * 4;
        if surface.pixels.len() != expected {
            return Err(ApplicationError::Encode(format!(
                "expected {expected} bytes for {}x{}, got {}",
                surface.width,
                surface.height,
                surface.pixels.len()
            )));
        }

        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(
                &surface.pixels,
                surface.width,
                surface.height,
                ExtendedColorType::Rgba8,
            )
            .map_err(|error| ApplicationError::Encode(error.to_string()))?;
        Ok(bytes)
    }
}

/// Saves downloads into a fixed directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct FsDownloadSink {
    directory: PathBuf,
}

impl FsDownloadSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl DownloadSink for FsDownloadSink {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ApplicationError> {
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name == "."
            || file_name == ".."
        {
            return Err(ApplicationError::InvalidInput(format!(
                "invalid download file name `{file_name}`"
            )));
        }

        fs::create_dir_all(&self.directory)
            .map_err(|error| ApplicationError::Io(error.to_string()))?;
        let location = self.directory.join(file_name);
        fs::write(&location, bytes).map_err(|error| ApplicationError::Io(error.to_string()))?;
        info!("saved {} bytes to {}", bytes.len(), location.display());
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn surface() -> RasterSurface {
        RasterSurface {
            width: 3,
            height: 2,
            pixels: (0..24).map(|value| value as u8 * 10).collect(),
        }
    }

    #[test]
    fn png_round_trips_pixels_exactly() {
        let bytes = PngRasterEncoder.encode_lossless(&surface()).expect("encode");
        let decoded = image::load_from_memory(&bytes).expect("decode").to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.into_raw(), surface().pixels);
    }

    #[test]
    fn encoder_rejects_short_buffer() {
        let broken = RasterSurface {
            width: 4,
            height: 4,
            pixels: vec![0; 8],
        };
        assert!(PngRasterEncoder.encode_lossless(&broken).is_err());
    }

    #[test]
    fn sink_creates_directory_and_writes_file() {
        let temp = tempdir().expect("tempdir");
        let sink = FsDownloadSink::new(temp.path().join("downloads"));

        let location = sink.deliver("edited-image.png", b"png").expect("deliver");

        assert_eq!(location, temp.path().join("downloads/edited-image.png"));
        assert_eq!(fs::read(location).expect("read"), b"png");
    }

    #[test]
    fn sink_overwrites_previous_download() {
        let temp = tempdir().expect("tempdir");
        let sink = FsDownloadSink::new(temp.path());
        sink.deliver("edited-image.png", b"first").expect("deliver");
        let location = sink.deliver("edited-image.png", b"second").expect("deliver");
        assert_eq!(fs::read(location).expect("read"), b"second");
    }

    #[test]
    fn sink_rejects_path_like_names() {
        let temp = tempdir().expect("tempdir");
        let sink = FsDownloadSink::new(temp.path());
        for name in ["", "../escape.png", "nested/file.png", ".."] {
            assert!(matches!(
                sink.deliver(name, b"x"),
                Err(ApplicationError::InvalidInput(_))
            ));
        }
    }
}
