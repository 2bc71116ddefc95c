//! 多項目需求彙總
//!
//! 一次請求展開多個 (物料, 數量) 項目並合併需求。各項目互相獨立，
//! 以 rayon 平行展開；單一項目失敗只記錄在該項目上，不中止整批，
//! 失敗項目不計入合併總量。

use std::collections::BTreeMap;

use bom_core::{ComponentId, PartStore};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::explosion::{BomExploder, BomStructure, MaterialRequirement};

/// 彙總請求中的單一項目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationItem {
    /// 根物料ID
    pub part_id: ComponentId,

    /// 展開數量
    pub quantity: Decimal,
}

impl AggregationItem {
    /// 創建新的彙總項目
    pub fn new(part_id: impl Into<ComponentId>, quantity: Decimal) -> Self {
        Self {
            part_id: part_id.into(),
            quantity,
        }
    }
}

/// 單一項目的展開結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutcome {
    /// 根物料ID
    pub part_id: ComponentId,

    /// 展開數量
    pub quantity: Decimal,

    /// 成功時的展開結構
    pub structure: Option<BomStructure>,

    /// 失敗時的錯誤訊息
    pub error: Option<String>,
}

impl ItemOutcome {
    /// 該項目是否成功
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// 彙總報告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedReport {
    /// 逐項結果（與請求順序一致）
    pub items: Vec<ItemOutcome>,

    /// 合併後的物料需求（跨項目累加，依物料ID排序）
    pub materials: Vec<MaterialRequirement>,

    /// 合併總成本（僅含成功項目）
    pub total_cost: Decimal,

    /// 成功項目數
    pub succeeded: usize,

    /// 失敗項目數
    pub failed: usize,
}

impl AggregatedReport {
    /// 是否存在失敗項目（部分失敗，非整批失敗）
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// 需求彙總器
pub struct RequirementsAggregator<'a, S: PartStore> {
    exploder: BomExploder<'a, S>,
}

impl<'a, S: PartStore> RequirementsAggregator<'a, S> {
    /// 創建彙總器
    pub fn new(store: &'a S) -> Self {
        Self {
            exploder: BomExploder::new(store),
        }
    }

    /// 展開並合併多個項目的物料需求
    pub fn aggregate_requirements(&self, items: &[AggregationItem]) -> AggregatedReport {
        tracing::info!("開始需求彙總: {} 個項目", items.len());

        // 項目間互相獨立，平行展開；collect 保持請求順序
        let outcomes: Vec<ItemOutcome> = items
            .par_iter()
            .map(|item| match self.exploder.explode(&item.part_id, item.quantity) {
                Ok(structure) => ItemOutcome {
                    part_id: item.part_id.clone(),
                    quantity: item.quantity,
                    structure: Some(structure),
                    error: None,
                },
                Err(err) => {
                    tracing::warn!("項目 {} 展開失敗: {}", item.part_id, err);
                    ItemOutcome {
                        part_id: item.part_id.clone(),
                        quantity: item.quantity,
                        structure: None,
                        error: Some(err.to_string()),
                    }
                }
            })
            .collect();

        // 合併成功項目的需求：同一物料跨項目累加數量與成本
        let mut merged: BTreeMap<ComponentId, MaterialRequirement> = BTreeMap::new();
        for outcome in &outcomes {
            let Some(structure) = &outcome.structure else {
                continue;
            };
            for req in &structure.material_requirements {
                merged
                    .entry(req.part_id.clone())
                    .and_modify(|m| {
                        m.total_required_quantity += req.total_required_quantity;
                        m.total_cost += req.total_cost;
                    })
                    .or_insert_with(|| req.clone());
            }
        }

        let materials: Vec<MaterialRequirement> = merged.into_values().collect();
        let total_cost = materials.iter().map(|m| m.total_cost).sum();
        let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
        let failed = outcomes.len() - succeeded;

        tracing::info!(
            "需求彙總完成: 成功 {}，失敗 {}，合併 {} 項物料",
            succeeded,
            failed,
            materials.len()
        );

        AggregatedReport {
            items: outcomes,
            materials,
            total_cost,
            succeeded,
            failed,
        }
    }
}
