use std::sync::Arc;

use crate::{DecodedImage, FilterExpression};

#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub source: Arc<DecodedImage>,
    pub expression: FilterExpression,
    pub target_width: u32,
    pub target_height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    pub render_time_ms: u64,
    pub pixels: Vec<u8>,
}
