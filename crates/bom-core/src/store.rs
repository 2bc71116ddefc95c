//! 資料存取邊界
//!
//! 展開與差異計算不關心底層存儲技術，只透過這兩個 trait 讀寫。
//! 讀取路徑無副作用，可無限制並行；唯一的寫入操作是消耗記錄的
//! upsert，實作必須以 (batch_id, material_part_id) 為唯一鍵原子性
//! 地覆寫，確保併發寫入時後寫者勝且不產生重複行。

use crate::{Batch, BomItem, ComponentId, ConsumptionInput, ConsumptionRecord, Part, Result};

/// 物料與 BOM 圖的讀取介面
pub trait PartStore: Send + Sync {
    /// 取得物料主檔；不存在時回傳 `BomError::PartNotFound`
    fn get_part(&self, part_id: &ComponentId) -> Result<Part>;

    /// 取得某父件的所有 BOM 子項；無子項時回傳空 Vec
    fn bom_children(&self, parent_id: &ComponentId) -> Result<Vec<BomItem>>;
}

/// 批次與消耗記錄的存取介面
pub trait BatchStore: Send + Sync {
    /// 取得批次；不存在時回傳 `BomError::BatchNotFound`
    fn get_batch(&self, batch_id: &str) -> Result<Batch>;

    /// 取得批次的所有消耗記錄
    fn consumption_records(&self, batch_id: &str) -> Result<Vec<ConsumptionRecord>>;

    /// 原子性 upsert 一筆消耗記錄
    ///
    /// 同一 (batch_id, material_part_id) 已存在記錄時覆寫其數量與
    /// 成本，不新增行也不累加。
    fn upsert_consumption(&self, input: ConsumptionInput) -> Result<ConsumptionRecord>;
}
