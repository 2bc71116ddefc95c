//! 物料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 物料識別碼（不透明字串 ID）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    /// 創建新的物料識別碼
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 取得字串形式
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// 物料類型
///
/// 成品位於 BOM 樹根，原物料位於葉節點；此分類不做機械性強制，
/// 展開引擎以「有無子件」判定葉節點，而非物料類型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartType {
    /// 成品
    Finished,
    /// 半成品
    SemiFinished,
    /// 原物料
    RawMaterial,
}

/// 物料主檔
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// 物料ID
    pub id: ComponentId,

    /// 料號（人工可讀，唯一）
    pub part_number: String,

    /// 品名
    pub name: String,

    /// 物料類型
    pub part_type: PartType,

    /// 標準單位成本
    pub standard_cost: Decimal,

    /// 計量單位（不做單位換算，僅作為標籤傳遞）
    pub unit: String,
}

impl Part {
    /// 創建新的物料
    pub fn new(
        id: impl Into<ComponentId>,
        part_number: impl Into<String>,
        name: impl Into<String>,
        part_type: PartType,
    ) -> Self {
        Self {
            id: id.into(),
            part_number: part_number.into(),
            name: name.into(),
            part_type,
            standard_cost: Decimal::ZERO,
            unit: "PCS".to_string(),
        }
    }

    /// 建構器模式：設置標準成本
    pub fn with_standard_cost(mut self, cost: Decimal) -> Self {
        self.standard_cost = cost;
        self
    }

    /// 建構器模式：設置計量單位
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// 是否為原物料
    pub fn is_raw_material(&self) -> bool {
        self.part_type == PartType::RawMaterial
    }
}
