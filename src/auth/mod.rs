pub mod extractor;
pub mod keys;
