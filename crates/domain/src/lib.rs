mod adjustments;
mod editor;
mod error;
mod expression;
mod history;
mod image;
mod preset;
mod preview;

pub use adjustments::{AdjustmentField, Adjustments, BLUR_RANGE, PERCENT_RANGE};
pub use editor::{EditorState, LoadedSource};
pub use error::DomainError;
pub use expression::{composite_filter, FilterExpression};
pub use history::{History, HistoryState};
pub use image::{
    media_type_for_extension, DecodedImage, ImageDimensions, ImageSource, RasterSurface,
};
pub use preset::FilterPreset;
pub use preview::{PreviewFrame, PreviewRequest};
