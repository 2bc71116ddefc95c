//! 圖維護驗證
//!
//! 來源系統不強制 BOM 無環，歷史上曾出現自我參照與跨層循環的
//! 髒資料，需由維護腳本事後清理。此模組提供獨立的圖體檢：
//! 不展開任何 BOM，直接掃描整張圖並回報缺陷清單，清理動作
//! 留給維護人員決定，驗證本身不刪除任何資料。

use std::collections::HashMap;

use bom_core::{BomItem, ComponentId};
use rust_decimal::Decimal;

use crate::BomGraph;

/// 圖體檢結果
#[derive(Debug, Clone, Default)]
pub struct GraphValidationReport {
    /// 自我參照的邊（父件即子件）
    pub self_references: Vec<BomItem>,

    /// 用量非正的邊
    pub invalid_quantities: Vec<BomItem>,

    /// 循環路徑（每條循環列出其上的物料ID，不含重複的起點）
    pub cycles: Vec<Vec<ComponentId>>,
}

impl GraphValidationReport {
    /// 圖是否乾淨
    pub fn is_clean(&self) -> bool {
        self.self_references.is_empty()
            && self.invalid_quantities.is_empty()
            && self.cycles.is_empty()
    }

    /// 缺陷總數
    pub fn issue_count(&self) -> usize {
        self.self_references.len() + self.invalid_quantities.len() + self.cycles.len()
    }
}

/// 圖驗證器
pub struct GraphValidator;

/// DFS 著色狀態
#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

impl GraphValidator {
    /// 對整張圖做體檢
    pub fn validate(graph: &BomGraph) -> GraphValidationReport {
        let edges = graph.all_edges();
        let mut report = GraphValidationReport::default();

        // 鄰接表（自我參照單獨回報，不計入循環偵測）
        let mut adjacency: HashMap<ComponentId, Vec<ComponentId>> = HashMap::new();
        for edge in &edges {
            if edge.quantity <= Decimal::ZERO {
                report.invalid_quantities.push(edge.clone());
            }

            if edge.parent_id == edge.child_id {
                report.self_references.push(edge.clone());
                continue;
            }

            adjacency
                .entry(edge.parent_id.clone())
                .or_default()
                .push(edge.child_id.clone());
        }

        // 迭代式 DFS 找循環，不依賴呼叫堆疊深度
        let mut colors: HashMap<ComponentId, Color> = HashMap::new();
        for start in graph.all_part_ids() {
            if *colors.get(&start).unwrap_or(&Color::White) != Color::White {
                continue;
            }

            let mut stack: Vec<(ComponentId, usize)> = vec![(start.clone(), 0)];
            let mut path: Vec<ComponentId> = vec![start.clone()];
            colors.insert(start, Color::Gray);

            while let Some((node, child_idx)) = stack.last().cloned() {
                let children = adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[]);

                if child_idx < children.len() {
                    if let Some(entry) = stack.last_mut() {
                        entry.1 += 1;
                    }
                    let child = &children[child_idx];

                    match *colors.get(child).unwrap_or(&Color::White) {
                        Color::White => {
                            colors.insert(child.clone(), Color::Gray);
                            stack.push((child.clone(), 0));
                            path.push(child.clone());
                        }
                        Color::Gray => {
                            // 回邊指向祖先：擷取路徑上的循環片段
                            if let Some(pos) = path.iter().position(|p| p == child) {
                                report.cycles.push(path[pos..].to_vec());
                            }
                        }
                        Color::Black => {}
                    }
                } else {
                    colors.insert(node, Color::Black);
                    stack.pop();
                    path.pop();
                }
            }
        }

        if !report.is_clean() {
            tracing::warn!(
                "BOM 圖體檢發現 {} 項缺陷（自我參照 {}，非正用量 {}，循環 {}）",
                report.issue_count(),
                report.self_references.len(),
                report.invalid_quantities.len(),
                report.cycles.len()
            );
        }

        report
    }
}
