// Domain models: resolutions, buckets, per-entity documents

mod bucket;
mod document;
mod resolution;

pub use bucket::{Bucket, CombineRule, Usage, UsageField};
pub use document::UsageDocument;
pub use resolution::{Resolution, UnknownResolution};
