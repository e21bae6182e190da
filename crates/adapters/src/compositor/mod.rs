mod cpu;
mod gpu;
mod matrix;
mod parse;

use log::{debug, warn};
use photo_editor_application::{ApplicationError, Compositor};
use photo_editor_domain::{DecodedImage, FilterExpression, RasterSurface};

pub use matrix::ColorMatrix;
pub use parse::{parse_filter_list, FilterOp, FilterSyntaxError};

use gpu::WgpuColorStage;

/// Runs of colour functions collapse into one matrix stage; blur splits them.
#[derive(Debug, Clone, PartialEq)]
enum Stage {
    Color(Vec<ColorMatrix>),
    Blur(f32),
}

/// Draws images through CSS filter lists at natural resolution.
///
/// An expression that does not parse is ignored as a whole and the image
/// is drawn unfiltered.
pub struct FilterCompositor {
    gpu: Option<WgpuColorStage>,
}

impl FilterCompositor {
    pub fn new() -> Self {
        let gpu = match WgpuColorStage::new() {
            Ok(stage) => Some(stage),
            Err(reason) => {
                debug!("compositor running on cpu: {reason}");
                None
            }
        };
        Self { gpu }
    }

    pub fn cpu_only() -> Self {
        Self { gpu: None }
    }

    fn apply_colors(&self, pixels: Vec<u8>, matrices: &[ColorMatrix]) -> Vec<u8> {
        if let Some(gpu) = &self.gpu {
            match gpu.apply(&pixels, matrices) {
                Ok(output) if output.len() == pixels.len() => return output,
                Ok(_) => warn!("gpu colour stage returned a short buffer, using cpu"),
                Err(error) => warn!("gpu colour stage failed, using cpu: {error}"),
            }
        }
        let mut pixels = pixels;
        cpu::apply_color_matrices(&mut pixels, matrices);
        pixels
    }
}

impl Default for FilterCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor for FilterCompositor {
    fn composite(
        &self,
        image: &DecodedImage,
        expression: &FilterExpression,
    ) -> Result<RasterSurface, ApplicationError> {
        let expected = image.width as usize * image.height as usize * 4;
        if image.pixels.len() != expected {
            return Err(ApplicationError::Render(format!(
                "expected {expected} bytes for {}x{}, got {}",
                image.width,
                image.height,
                image.pixels.len()
            )));
        }

        let ops = match parse_filter_list(expression.as_str()) {
            Ok(ops) => ops,
            Err(error) => {
                debug!("ignoring filter `{expression}`: {error}");
                Vec::new()
            }
        };

        let mut pixels = image.pixels.clone();
        for stage in plan_stages(&ops) {
            pixels = match stage {
                Stage::Color(matrices) => self.apply_colors(pixels, &matrices),
                Stage::Blur(sigma) => cpu::blur_rgba(image.width, image.height, pixels, sigma)?,
            };
        }

        Ok(RasterSurface {
            width: image.width,
            height: image.height,
            pixels,
        })
    }
}

fn plan_stages(ops: &[FilterOp]) -> Vec<Stage> {
    let mut stages = Vec::new();
    let mut pending = Vec::new();

    for op in ops {
        match ColorMatrix::for_op(*op) {
            Some(matrix) if matrix.is_identity() => {}
            Some(matrix) => pending.push(matrix),
            None => {
                let FilterOp::Blur(radius) = *op else {
                    continue;
                };
                if radius <= 0.0 {
                    continue;
                }
                if !pending.is_empty() {
                    stages.push(Stage::Color(std::mem::take(&mut pending)));
                }
                stages.push(Stage::Blur(radius));
            }
        }
    }
    if !pending.is_empty() {
        stages.push(Stage::Color(pending));
    }
    stages
}
