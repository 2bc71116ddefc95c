//! 記憶體內 BOM 圖

use std::collections::HashMap;
use std::sync::RwLock;

use bom_core::{BomError, BomItem, ComponentId, Part, PartStore, Result};

/// 記憶體內的物料主檔與 BOM 鄰接表
///
/// 讀多寫少：內部以 `RwLock` 保護，展開引擎的並行讀取互不阻塞。
/// `add_bom_item` 在寫入時即驗證邊的合法性；歷史資料可透過
/// `add_bom_item_unchecked` 原樣載入，再交由 [`crate::GraphValidator`]
/// 做事後體檢。
#[derive(Debug, Default)]
pub struct BomGraph {
    inner: RwLock<GraphInner>,
}

#[derive(Debug, Default)]
struct GraphInner {
    parts: HashMap<ComponentId, Part>,
    /// 父件 → 子項列表
    edges: HashMap<ComponentId, Vec<BomItem>>,
}

impl BomGraph {
    /// 創建空圖
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增或覆寫物料主檔
    pub fn add_part(&self, part: Part) {
        let mut inner = self.inner.write().expect("BOM 圖鎖中毒");
        inner.parts.insert(part.id.clone(), part);
    }

    /// 新增一條 BOM 邊（寫入時驗證）
    ///
    /// 拒絕：非正用量、自我參照、端點物料不存在、同一父子組合重複。
    pub fn add_bom_item(&self, item: BomItem) -> Result<()> {
        item.validate()?;

        let mut inner = self.inner.write().expect("BOM 圖鎖中毒");

        if !inner.parts.contains_key(&item.parent_id) {
            return Err(BomError::PartNotFound(item.parent_id.to_string()));
        }
        if !inner.parts.contains_key(&item.child_id) {
            return Err(BomError::PartNotFound(item.child_id.to_string()));
        }

        let children = inner.edges.entry(item.parent_id.clone()).or_default();
        if children.iter().any(|c| c.child_id == item.child_id) {
            return Err(BomError::Validation(format!(
                "BOM 邊重複：{} -> {}",
                item.parent_id, item.child_id
            )));
        }

        tracing::debug!("新增 BOM 邊: {} -> {} x {}", item.parent_id, item.child_id, item.quantity);
        children.push(item);
        Ok(())
    }

    /// 原樣載入一條邊，跳過所有驗證
    ///
    /// 僅供載入既有（可能含缺陷的）資料，之後應執行圖驗證。
    pub fn add_bom_item_unchecked(&self, item: BomItem) {
        let mut inner = self.inner.write().expect("BOM 圖鎖中毒");
        inner.edges.entry(item.parent_id.clone()).or_default().push(item);
    }

    /// 移除一條 BOM 邊，回傳是否確實存在
    pub fn remove_bom_item(&self, parent_id: &ComponentId, child_id: &ComponentId) -> bool {
        let mut inner = self.inner.write().expect("BOM 圖鎖中毒");
        if let Some(children) = inner.edges.get_mut(parent_id) {
            let before = children.len();
            children.retain(|c| &c.child_id != child_id);
            return children.len() != before;
        }
        false
    }

    /// 物料數量
    pub fn part_count(&self) -> usize {
        self.inner.read().expect("BOM 圖鎖中毒").parts.len()
    }

    /// 邊數量
    pub fn edge_count(&self) -> usize {
        self.inner
            .read()
            .expect("BOM 圖鎖中毒")
            .edges
            .values()
            .map(|v| v.len())
            .sum()
    }

    /// 所有物料ID（驗證遍歷起點用）
    pub fn all_part_ids(&self) -> Vec<ComponentId> {
        let inner = self.inner.read().expect("BOM 圖鎖中毒");
        let mut ids: Vec<ComponentId> = inner
            .parts
            .keys()
            .chain(inner.edges.keys())
            .cloned()
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// 所有 BOM 邊的快照
    pub fn all_edges(&self) -> Vec<BomItem> {
        let inner = self.inner.read().expect("BOM 圖鎖中毒");
        inner.edges.values().flatten().cloned().collect()
    }
}

impl PartStore for BomGraph {
    fn get_part(&self, part_id: &ComponentId) -> Result<Part> {
        let inner = self.inner.read().expect("BOM 圖鎖中毒");
        inner
            .parts
            .get(part_id)
            .cloned()
            .ok_or_else(|| BomError::PartNotFound(part_id.to_string()))
    }

    fn bom_children(&self, parent_id: &ComponentId) -> Result<Vec<BomItem>> {
        let inner = self.inner.read().expect("BOM 圖鎖中毒");
        Ok(inner.edges.get(parent_id).cloned().unwrap_or_default())
    }
}
