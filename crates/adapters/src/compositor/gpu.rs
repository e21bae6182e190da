use std::sync::mpsc;

use photo_editor_application::ApplicationError;
use wgpu::util::DeviceExt;

use super::matrix::ColorMatrix;

const WORKGROUP_SIZE: u32 = 64;
const MAX_PIXELS_PER_DISPATCH: usize = 65_535 * WORKGROUP_SIZE as usize;
const COLOR_SHADER: &str = r#"
struct Params {
    pixel_count: u32,
    matrix_count: u32,
    _pad0: u32,
    _pad1: u32,
}

@group(0) @binding(0)
var<storage, read> source_pixels: array<u32>;

@group(0) @binding(1)
var<storage, read_write> output_pixels: array<u32>;

@group(0) @binding(2)
var<uniform> params: Params;

@group(0) @binding(3)
var<storage, read> matrices: array<f32>;

fn to_u8(value: f32) -> u32 {
    return u32(round(clamp(value, 0.0, 1.0) * 255.0));
}

@compute @workgroup_size(64)
fn main(@builtin(global_invocation_id) gid: vec3<u32>) {
    let i = gid.x;
    if (i >= params.pixel_count) {
        return;
    }

    let source = source_pixels[i];
    var rgb = vec3<f32>(
        f32(source & 255u),
        f32((source >> 8u) & 255u),
        f32((source >> 16u) & 255u),
    ) / 255.0;

    for (var m = 0u; m < params.matrix_count; m = m + 1u) {
        let base = m * 12u;
        let red = matrices[base] * rgb.x + matrices[base + 1u] * rgb.y
            + matrices[base + 2u] * rgb.z + matrices[base + 3u];
        let green = matrices[base + 4u] * rgb.x + matrices[base + 5u] * rgb.y
            + matrices[base + 6u] * rgb.z + matrices[base + 7u];
        let blue = matrices[base + 8u] * rgb.x + matrices[base + 9u] * rgb.y
            + matrices[base + 10u] * rgb.z + matrices[base + 11u];
        rgb = clamp(vec3<f32>(red, green, blue), vec3<f32>(0.0), vec3<f32>(1.0));
    }

    output_pixels[i] = to_u8(rgb.x) | (to_u8(rgb.y) << 8u) | (to_u8(rgb.z) << 16u)
        | (source & 0xFF000000u);
}
"#;

/// Colour-matrix stage on a wgpu compute shader.
pub struct WgpuColorStage {
    device: wgpu::Device,
    queue: wgpu::Queue,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::ComputePipeline,
}

impl WgpuColorStage {
    pub fn new() -> Result<Self, String> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| "no suitable wgpu adapter found".to_string())?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("photo-editor-compositor-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
            },
            None,
        ))
        .map_err(|error| format!("failed to create wgpu device: {error}"))?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("photo-editor-color-shader"),
            source: wgpu::ShaderSource::Wgsl(COLOR_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("photo-editor-color-bind-group-layout"),
            entries: &[
                storage_entry(0, true),
                storage_entry(1, false),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                storage_entry(3, true),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("photo-editor-color-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("photo-editor-color-pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: "main",
        });

        Ok(Self {
            device,
            queue,
            bind_group_layout,
            pipeline,
        })
    }

    /// Returns a transformed copy; `pixels` is left untouched on failure.
    pub fn apply(&self, pixels: &[u8], matrices: &[ColorMatrix]) -> Result<Vec<u8>, ApplicationError> {
        if matrices.is_empty() {
            return Ok(pixels.to_vec());
        }
        let matrix_bytes = pack_matrices(matrices);
        let mut output = Vec::with_capacity(pixels.len());
        for chunk in pixels.chunks(MAX_PIXELS_PER_DISPATCH * 4) {
            output.extend(self.dispatch(chunk, &matrix_bytes, matrices.len() as u32)?);
        }
        Ok(output)
    }

    fn dispatch(
        &self,
        pixels: &[u8],
        matrix_bytes: &[u8],
        matrix_count: u32,
    ) -> Result<Vec<u8>, ApplicationError> {
        let pixel_count = (pixels.len() / 4) as u32;
        let pixel_bytes = pixels.len() as u64;
        if pixel_count == 0 {
            return Ok(Vec::new());
        }

        let source = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("photo-editor-color-source"),
                contents: pixels,
                usage: wgpu::BufferUsages::STORAGE,
            });

        let output = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("photo-editor-color-output"),
            size: pixel_bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let mut params = [0_u8; 16];
        params[0..4].copy_from_slice(&pixel_count.to_le_bytes());
        params[4..8].copy_from_slice(&matrix_count.to_le_bytes());
        let params_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("photo-editor-color-params"),
                contents: &params,
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let matrices = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("photo-editor-color-matrices"),
                contents: matrix_bytes,
                usage: wgpu::BufferUsages::STORAGE,
            });

        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("photo-editor-color-readback"),
            size: pixel_bytes,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("photo-editor-color-bind-group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: source.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: output.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: matrices.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("photo-editor-color-encoder"),
            });
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("photo-editor-color-pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.pipeline);
            compute_pass.set_bind_group(0, &bind_group, &[]);
            let workgroups = pixel_count.div_ceil(WORKGROUP_SIZE);
            compute_pass.dispatch_workgroups(workgroups, 1, 1);
        }
        encoder.copy_buffer_to_buffer(&output, 0, &readback, 0, pixel_bytes);
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|error| ApplicationError::Render(format!("gpu map channel failed: {error}")))?
            .map_err(|error| ApplicationError::Render(format!("gpu readback map failed: {error}")))?;

        let data = slice.get_mapped_range();
        let result = data.to_vec();
        drop(data);
        readback.unmap();
        Ok(result)
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn pack_matrices(matrices: &[ColorMatrix]) -> Vec<u8> {
    matrices
        .iter()
        .flat_map(|matrix| matrix.flattened())
        .flat_map(f32::to_le_bytes)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::parse::FilterOp;

    #[test]
    fn matrices_pack_row_major_little_endian() {
        let matrix = ColorMatrix::for_op(FilterOp::Brightness(0.5)).expect("colour op");
        let bytes = pack_matrices(&[matrix, matrix]);
        assert_eq!(bytes.len(), 2 * 12 * 4);
        assert_eq!(&bytes[0..4], &0.5_f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &0.0_f32.to_le_bytes());
        assert_eq!(&bytes[20..24], &0.5_f32.to_le_bytes());
    }

    #[test]
    fn gpu_stage_matches_cpu_when_available() {
        let Ok(stage) = WgpuColorStage::new() else {
            return;
        };
        let pixels: Vec<u8> = (0..64_u32)
            .flat_map(|value| [(value * 4) as u8, 200 - value as u8, 30, 255])
            .collect();
        let matrices = [
            ColorMatrix::for_op(FilterOp::Sepia(1.0)).expect("colour op"),
            ColorMatrix::for_op(FilterOp::Contrast(1.4)).expect("colour op"),
        ];

        let gpu = stage.apply(&pixels, &matrices).expect("gpu apply");
        let mut cpu = pixels.clone();
        super::super::cpu::apply_color_matrices(&mut cpu, &matrices);

        assert_eq!(gpu.len(), cpu.len());
        for (gpu_value, cpu_value) in gpu.iter().zip(cpu.iter()) {
            assert!(gpu_value.abs_diff(*cpu_value) <= 1);
        }
    }
}
