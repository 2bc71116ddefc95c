//! BOM 邊（父件 → 子件用量）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BomError, ComponentId, Result};

/// BOM 組成項：父件每單位需要 `quantity` 單位的子件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomItem {
    /// BOM 項ID
    pub id: Uuid,

    /// 父件物料ID
    pub parent_id: ComponentId,

    /// 子件物料ID
    pub child_id: ComponentId,

    /// 單位用量（每 1 單位父件所需子件數量，必須 > 0）
    pub quantity: Decimal,

    /// 損耗率（0.05 = 5%，展開時以 quantity × (1 + scrap_factor) 計算）
    pub scrap_factor: Decimal,

    /// 邊層級的計量單位覆寫；None 時沿用子件本身的單位
    pub unit: Option<String>,

    /// 項次（顯示排序用）
    pub sequence: u32,
}

impl BomItem {
    /// 創建新的 BOM 項
    pub fn new(
        parent_id: impl Into<ComponentId>,
        child_id: impl Into<ComponentId>,
        quantity: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id: parent_id.into(),
            child_id: child_id.into(),
            quantity,
            scrap_factor: Decimal::ZERO,
            unit: None,
            sequence: 10,
        }
    }

    /// 建構器模式：設置損耗率
    pub fn with_scrap_factor(mut self, scrap_factor: Decimal) -> Self {
        self.scrap_factor = scrap_factor;
        self
    }

    /// 建構器模式：設置單位覆寫
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// 建構器模式：設置項次
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    /// 含損耗的有效單位用量
    pub fn effective_quantity(&self) -> Decimal {
        self.quantity * (Decimal::ONE + self.scrap_factor)
    }

    /// 驗證 BOM 項
    ///
    /// 來源系統允許寫入自我參照的邊（父件即子件），屬於資料缺陷；
    /// 此處於寫入時即拒絕，遍歷端另有循環防護。
    pub fn validate(&self) -> Result<()> {
        if self.quantity <= Decimal::ZERO {
            return Err(BomError::Validation(format!(
                "BOM 用量必須大於 0：{} -> {} (數量 {})",
                self.parent_id, self.child_id, self.quantity
            )));
        }

        if self.scrap_factor < Decimal::ZERO {
            return Err(BomError::Validation(format!(
                "損耗率不可為負：{} -> {} (損耗率 {})",
                self.parent_id, self.child_id, self.scrap_factor
            )));
        }

        if self.parent_id == self.child_id {
            return Err(BomError::Validation(format!(
                "BOM 不可自我參照：{}",
                self.parent_id
            )));
        }

        Ok(())
    }
}
