//! 物料消耗記錄模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BomError, ComponentId, Result};

/// 物料消耗記錄
///
/// 每個 (批次, 物料) 組合至多一筆；重複記錄同一組合時覆寫前值
/// （upsert 語義），而非追加新行或累加數量。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    /// 記錄ID
    pub id: Uuid,

    /// 批次ID
    pub batch_id: String,

    /// 消耗物料ID
    pub material_part_id: ComponentId,

    /// 實際用量
    pub quantity_used: Decimal,

    /// 記錄當下的單位成本（可能與標準成本不同）
    pub unit_cost: Decimal,

    /// 記錄時間
    pub consumed_at: DateTime<Utc>,

    /// 操作員ID
    pub operator_id: Option<String>,

    /// 備註
    pub notes: Option<String>,
}

impl ConsumptionRecord {
    /// 該筆消耗的總成本（實際用量 × 記錄單位成本）
    pub fn total_cost(&self) -> Decimal {
        self.quantity_used * self.unit_cost
    }
}

/// 消耗記錄 upsert 輸入，以 (batch_id, material_part_id) 為唯一鍵
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionInput {
    /// 批次ID
    pub batch_id: String,

    /// 消耗物料ID
    pub material_part_id: ComponentId,

    /// 實際用量
    pub quantity_used: Decimal,

    /// 記錄當下的單位成本
    pub unit_cost: Decimal,

    /// 操作員ID
    pub operator_id: Option<String>,

    /// 備註
    pub notes: Option<String>,
}

impl ConsumptionInput {
    /// 創建新的消耗輸入
    pub fn new(
        batch_id: impl Into<String>,
        material_part_id: impl Into<ComponentId>,
        quantity_used: Decimal,
        unit_cost: Decimal,
    ) -> Self {
        Self {
            batch_id: batch_id.into(),
            material_part_id: material_part_id.into(),
            quantity_used,
            unit_cost,
            operator_id: None,
            notes: None,
        }
    }

    /// 建構器模式：設置操作員
    pub fn with_operator(mut self, operator_id: impl Into<String>) -> Self {
        self.operator_id = Some(operator_id.into());
        self
    }

    /// 建構器模式：設置備註
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// 驗證輸入
    pub fn validate(&self) -> Result<()> {
        if self.batch_id.is_empty() {
            return Err(BomError::Validation("批次ID不可為空".to_string()));
        }

        if self.quantity_used < Decimal::ZERO {
            return Err(BomError::Validation(format!(
                "消耗數量不可為負: {}",
                self.quantity_used
            )));
        }

        if self.unit_cost < Decimal::ZERO {
            return Err(BomError::Validation(format!(
                "單位成本不可為負: {}",
                self.unit_cost
            )));
        }

        Ok(())
    }

    /// 轉成一筆新的消耗記錄（記錄時間取當下）
    pub fn into_record(self) -> ConsumptionRecord {
        ConsumptionRecord {
            id: Uuid::new_v4(),
            batch_id: self.batch_id,
            material_part_id: self.material_part_id,
            quantity_used: self.quantity_used,
            unit_cost: self.unit_cost,
            consumed_at: Utc::now(),
            operator_id: self.operator_id,
            notes: self.notes,
        }
    }
}
