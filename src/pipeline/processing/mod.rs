// Pipeline processing: normalization, validation, deduplication and aggregation

pub mod aggregate;
pub mod dedup;
pub mod normalize;
pub mod validate;
