// Pattern-based field and operation extraction
pub mod fields;
pub mod operations;
