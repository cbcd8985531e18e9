// The resume draft: typed nested record, path addressing and copy-on-write updates.

pub mod image;
pub mod lens;
pub mod model;
pub mod ordered_set;
pub mod path;

#[cfg(test)]
pub mod fixtures;

pub use image::{ImageData, ImageKind};
pub use model::{ImageSlot, ResumeDraft, RowList, SetField, LOGO_COUNT, MAX_ROWS, MIN_ROWS};
pub use path::FieldPath;
