//! # BOM Engine
//!
//! BOM 展開與物料需求計算引擎的統一入口
//!
//! - [`bom_core`]：資料模型、錯誤類型與存取邊界
//! - [`bom_graph`]：記憶體內 BOM 圖存儲與圖維護驗證
//! - [`bom_calc`]：展開引擎、差異計算與多項目彙總

pub use bom_calc::{
    AggregatedReport, AggregationItem, BomExploder, BomNode, BomStructure, ConsumptionStatus,
    ItemOutcome, MaterialRequirement, MaterialRequirementsReport, MaterialVariance,
    RequirementsAggregator, VarianceCalculator, VarianceSummary, DEFAULT_MAX_DEPTH,
    VARIANCE_TOLERANCE_PERCENT,
};
pub use bom_core::{
    Batch, BatchStatus, BatchStore, BomError, BomItem, ComponentId, ConsumptionInput,
    ConsumptionRecord, Part, PartStore, PartType, Result,
};
pub use bom_graph::{BomGraph, GraphValidationReport, GraphValidator, MemoryBatchStore};
