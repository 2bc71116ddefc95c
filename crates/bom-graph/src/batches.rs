//! 記憶體內批次與消耗記錄存儲

use std::collections::HashMap;
use std::sync::RwLock;

use bom_core::{
    Batch, BatchStore, BomError, ComponentId, ConsumptionInput, ConsumptionRecord, Result,
};
use chrono::Utc;

/// 記憶體內的批次/消耗存儲
///
/// 消耗記錄以 (batch_id, material_part_id) 為唯一鍵存放，upsert 在
/// 同一把寫鎖內完成「查找＋覆寫」，併發寫入同一鍵時後寫者勝，
/// 不會產生重複行或遺失更新。
#[derive(Debug, Default)]
pub struct MemoryBatchStore {
    inner: RwLock<BatchInner>,
}

#[derive(Debug, Default)]
struct BatchInner {
    batches: HashMap<String, Batch>,
    consumption: HashMap<(String, ComponentId), ConsumptionRecord>,
}

impl MemoryBatchStore {
    /// 創建空存儲
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增或覆寫批次
    pub fn add_batch(&self, batch: Batch) {
        let mut inner = self.inner.write().expect("批次存儲鎖中毒");
        inner.batches.insert(batch.id.clone(), batch);
    }

    /// 消耗記錄總數（測試與維護用）
    pub fn consumption_count(&self) -> usize {
        self.inner.read().expect("批次存儲鎖中毒").consumption.len()
    }
}

impl BatchStore for MemoryBatchStore {
    fn get_batch(&self, batch_id: &str) -> Result<Batch> {
        let inner = self.inner.read().expect("批次存儲鎖中毒");
        inner
            .batches
            .get(batch_id)
            .cloned()
            .ok_or_else(|| BomError::BatchNotFound(batch_id.to_string()))
    }

    fn consumption_records(&self, batch_id: &str) -> Result<Vec<ConsumptionRecord>> {
        let inner = self.inner.read().expect("批次存儲鎖中毒");
        let mut records: Vec<ConsumptionRecord> = inner
            .consumption
            .values()
            .filter(|r| r.batch_id == batch_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.material_part_id.cmp(&b.material_part_id));
        Ok(records)
    }

    fn upsert_consumption(&self, input: ConsumptionInput) -> Result<ConsumptionRecord> {
        input.validate()?;

        let mut inner = self.inner.write().expect("批次存儲鎖中毒");

        if !inner.batches.contains_key(&input.batch_id) {
            return Err(BomError::BatchNotFound(input.batch_id.clone()));
        }

        let key = (input.batch_id.clone(), input.material_part_id.clone());
        let record = match inner.consumption.get(&key) {
            // 既有記錄：保留記錄ID，覆寫數量/成本並更新時間
            Some(existing) => {
                let mut updated = existing.clone();
                updated.quantity_used = input.quantity_used;
                updated.unit_cost = input.unit_cost;
                updated.operator_id = input.operator_id;
                updated.notes = input.notes;
                updated.consumed_at = Utc::now();
                updated
            }
            None => input.into_record(),
        };

        tracing::debug!(
            "記錄消耗: 批次 {} 物料 {} 用量 {}",
            record.batch_id,
            record.material_part_id,
            record.quantity_used
        );

        inner.consumption.insert(key, record.clone());
        Ok(record)
    }
}
