//! Sticker batch entity: a generation run of N stickers.

pub mod model;
pub mod status;

pub use model::{NewBatch, StickerBatch};
pub use status::BatchStatus;
