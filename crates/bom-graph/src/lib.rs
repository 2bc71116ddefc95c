//! # BOM Graph
//!
//! 記憶體內的物料/BOM 圖存儲與圖維護驗證

pub mod batches;
pub mod graph;
pub mod validate;

// Re-export 主要類型
pub use batches::MemoryBatchStore;
pub use graph::BomGraph;
pub use validate::{GraphValidationReport, GraphValidator};
