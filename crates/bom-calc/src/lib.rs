//! # BOM Calculation Engine
//!
//! BOM 展開與物料需求/差異計算引擎
//!
//! 計算分三層，資料單向流動：
//! 展開引擎（純讀 BOM 圖）→ 差異計算器（對照批次實際消耗）→
//! 多項目彙總（跨多個根物料合併需求）。

pub mod aggregate;
pub mod explosion;
pub mod variance;

// Re-export 主要類型
pub use aggregate::{AggregatedReport, AggregationItem, ItemOutcome, RequirementsAggregator};
pub use explosion::{BomExploder, BomNode, BomStructure, MaterialRequirement, DEFAULT_MAX_DEPTH};
pub use variance::{
    ConsumptionStatus, MaterialRequirementsReport, MaterialVariance, VarianceCalculator,
    VarianceSummary, VARIANCE_TOLERANCE_PERCENT,
};
