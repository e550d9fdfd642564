//! Reference-tree scanning.

pub mod scanner;

pub use scanner::{MeshScanner, ScanIter};
