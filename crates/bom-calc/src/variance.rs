//! 物料需求與消耗差異計算
//!
//! 以批次數量展開 BOM 得到預期消耗，對照操作員記錄的實際消耗，
//! 產出逐料與彙總的差異報告。

use bom_core::{BatchStore, ComponentId, PartStore, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::explosion::BomExploder;

/// 差異容許帶（±5%，固定常數）
pub const VARIANCE_TOLERANCE_PERCENT: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// 消耗分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumptionStatus {
    /// 差異在容許帶內
    OnTarget,
    /// 超耗（差異百分比 > +5%）
    OverConsumed,
    /// 少耗（差異百分比 < -5%）
    UnderConsumed,
}

impl ConsumptionStatus {
    /// 依差異百分比分類
    pub fn classify(variance_percent: Decimal) -> Self {
        if variance_percent.abs() <= VARIANCE_TOLERANCE_PERCENT {
            ConsumptionStatus::OnTarget
        } else if variance_percent > VARIANCE_TOLERANCE_PERCENT {
            ConsumptionStatus::OverConsumed
        } else {
            ConsumptionStatus::UnderConsumed
        }
    }
}

/// 單一物料的差異明細
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialVariance {
    /// 物料ID
    pub part_id: ComponentId,

    /// 料號
    pub part_number: String,

    /// 計量單位
    pub unit: String,

    /// 預期用量（BOM 展開）
    pub expected_quantity: Decimal,

    /// 實際用量（無記錄視為 0）
    pub actual_quantity: Decimal,

    /// 差異 = 實際 - 預期
    pub variance: Decimal,

    /// 差異百分比；預期為 0 時定義為 0，避免除零
    pub variance_percent: Decimal,

    /// 標準單位成本
    pub standard_unit_cost: Decimal,

    /// 記錄當下的單位成本（無記錄時為 None）
    pub recorded_unit_cost: Option<Decimal>,

    /// 預期成本 = 預期用量 × 標準單位成本
    pub expected_cost: Decimal,

    /// 實際成本 = 實際用量 × 記錄單位成本
    pub actual_cost: Decimal,

    /// 分類
    pub status: ConsumptionStatus,
}

/// 差異彙總
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarianceSummary {
    /// 總需求成本（Σ 預期用量 × 標準成本）
    pub total_required_cost: Decimal,

    /// 總消耗成本（Σ 實際用量 × 記錄成本）
    pub total_consumed_cost: Decimal,

    /// 成本差異 = 消耗 - 需求
    pub variance_cost: Decimal,

    /// 在容許帶內的物料數
    pub on_target_count: usize,

    /// 超耗物料數
    pub over_consumed_count: usize,

    /// 少耗物料數
    pub under_consumed_count: usize,

    /// 缺料物料數
    ///
    /// 本設計沒有庫存帳，物料一律視為可得，缺料恆為 0；
    /// 此為刻意保留的來源行為，接上庫存子系統前不會有非零值。
    pub shortage_count: usize,
}

/// 批次物料需求報告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRequirementsReport {
    /// 批次ID
    pub batch_id: String,

    /// 批次生產的物料ID
    pub part_id: ComponentId,

    /// 批次數量
    pub batch_quantity: Decimal,

    /// 逐料差異明細（依物料ID排序）
    pub lines: Vec<MaterialVariance>,

    /// 彙總
    pub summary: VarianceSummary,
}

/// 差異計算器
pub struct VarianceCalculator<'a, P: PartStore, B: BatchStore> {
    exploder: BomExploder<'a, P>,
    batches: &'a B,
}

impl<'a, P: PartStore, B: BatchStore> VarianceCalculator<'a, P, B> {
    /// 創建差異計算器
    pub fn new(parts: &'a P, batches: &'a B) -> Self {
        Self {
            exploder: BomExploder::new(parts),
            batches,
        }
    }

    /// 計算單一批次的物料需求與消耗差異
    ///
    /// 展開以批次數量為準（不是訂單明細的訂購總量）；批次 BOM 之外
    /// 的消耗記錄不參與比對，也不計入彙總成本。
    pub fn requirements_for_batch(&self, batch_id: &str) -> Result<MaterialRequirementsReport> {
        let batch = self.batches.get_batch(batch_id)?;

        tracing::info!(
            "計算批次物料需求: {} (物料 {}, 數量 {})",
            batch.id,
            batch.part_id,
            batch.quantity
        );

        let structure = self.exploder.explode(&batch.part_id, batch.quantity)?;
        let records = self.batches.consumption_records(batch_id)?;

        let mut summary = VarianceSummary {
            total_required_cost: Decimal::ZERO,
            total_consumed_cost: Decimal::ZERO,
            variance_cost: Decimal::ZERO,
            on_target_count: 0,
            over_consumed_count: 0,
            under_consumed_count: 0,
            shortage_count: 0,
        };

        let mut lines = Vec::with_capacity(structure.material_requirements.len());
        for expected in &structure.material_requirements {
            let record = records
                .iter()
                .find(|r| r.material_part_id == expected.part_id);

            let actual_quantity = record.map(|r| r.quantity_used).unwrap_or(Decimal::ZERO);
            let recorded_unit_cost = record.map(|r| r.unit_cost);

            let variance = actual_quantity - expected.total_required_quantity;
            let variance_percent = if expected.total_required_quantity.is_zero() {
                Decimal::ZERO
            } else {
                variance / expected.total_required_quantity * Decimal::ONE_HUNDRED
            };

            let status = ConsumptionStatus::classify(variance_percent);
            match status {
                ConsumptionStatus::OnTarget => summary.on_target_count += 1,
                ConsumptionStatus::OverConsumed => summary.over_consumed_count += 1,
                ConsumptionStatus::UnderConsumed => summary.under_consumed_count += 1,
            }

            let expected_cost = expected.total_cost;
            let actual_cost = actual_quantity * recorded_unit_cost.unwrap_or(Decimal::ZERO);
            summary.total_required_cost += expected_cost;
            summary.total_consumed_cost += actual_cost;

            lines.push(MaterialVariance {
                part_id: expected.part_id.clone(),
                part_number: expected.part_number.clone(),
                unit: expected.unit.clone(),
                expected_quantity: expected.total_required_quantity,
                actual_quantity,
                variance,
                variance_percent,
                standard_unit_cost: expected.unit_cost,
                recorded_unit_cost,
                expected_cost,
                actual_cost,
                status,
            });
        }

        summary.variance_cost = summary.total_consumed_cost - summary.total_required_cost;

        tracing::info!(
            "批次 {} 差異: 達標 {}，超耗 {}，少耗 {}",
            batch.id,
            summary.on_target_count,
            summary.over_consumed_count,
            summary.under_consumed_count
        );

        Ok(MaterialRequirementsReport {
            batch_id: batch.id,
            part_id: batch.part_id,
            batch_quantity: batch.quantity,
            lines,
            summary,
        })
    }
}
