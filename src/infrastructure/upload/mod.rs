//! Upload persistence infrastructure

mod disk;

pub use disk::{sanitize_filename, DiskUploadSink};
