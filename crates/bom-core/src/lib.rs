//! # BOM Core
//!
//! 核心資料模型與類型定義

pub mod batch;
pub mod bom_item;
pub mod consumption;
pub mod part;
pub mod store;

// Re-export 主要類型
pub use batch::{Batch, BatchStatus};
pub use bom_item::BomItem;
pub use consumption::{ConsumptionInput, ConsumptionRecord};
pub use part::{ComponentId, Part, PartType};
pub use store::{BatchStore, PartStore};

/// BOM 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum BomError {
    #[error("找不到物料: {0}")]
    PartNotFound(String),

    #[error("找不到批次: {0}")]
    BatchNotFound(String),

    #[error("BOM 循環參照: {path}")]
    CyclicBom { path: String },

    #[error("BOM 展開深度超過上限 {max_depth}（物料: {component_id}）")]
    MaxDepthExceeded { component_id: String, max_depth: u32 },

    #[error("驗證錯誤: {0}")]
    Validation(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BomError>;
