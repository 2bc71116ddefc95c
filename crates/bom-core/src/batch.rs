//! 生產批次模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ComponentId;

/// 批次狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    /// 排隊中
    Queued,
    /// 生產中
    InProgress,
    /// 已完工
    Completed,
    /// 暫停
    OnHold,
    /// 已取消
    Cancelled,
}

/// 生產批次
///
/// 一個批次隸屬於一張訂單明細，生產該明細物料的固定數量；
/// 物料需求展開以批次數量為準，而非明細的訂購總量。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    /// 批次ID
    pub id: String,

    /// 所屬訂單明細ID
    pub order_line_id: String,

    /// 生產物料ID
    pub part_id: ComponentId,

    /// 批次數量
    pub quantity: Decimal,

    /// 批次狀態
    pub status: BatchStatus,

    /// 優先級（1-10，10最高）
    pub priority: u8,
}

impl Batch {
    /// 創建新的批次（初始狀態為排隊中）
    pub fn new(
        id: impl Into<String>,
        order_line_id: impl Into<String>,
        part_id: impl Into<ComponentId>,
        quantity: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            order_line_id: order_line_id.into(),
            part_id: part_id.into(),
            quantity,
            status: BatchStatus::Queued,
            priority: 5,
        }
    }

    /// 建構器模式：設置狀態
    pub fn with_status(mut self, status: BatchStatus) -> Self {
        self.status = status;
        self
    }

    /// 建構器模式：設置優先級
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.min(10);
        self
    }

    /// 是否為終結狀態
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, BatchStatus::Completed | BatchStatus::Cancelled)
    }
}
