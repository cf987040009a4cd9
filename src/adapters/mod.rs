// Adapters layer: concrete implementations for the filesystem and CSV formats.

pub mod roster_csv;
pub mod storage;
