//! BOM 展開引擎
//!
//! 給定根物料與目標數量，遞迴展開 BOM 圖，輸出所有葉節點物料的
//! 總需求量與總成本。同一物料出現在樹的多個位置時數量累加；
//! 中間組件不列入物料需求，僅出現在層級樹中。

use std::collections::{BTreeMap, HashSet};

use bom_core::{BomError, ComponentId, Part, PartStore, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 預設最大展開深度
///
/// 獨立於循環偵測的防禦性上限：即使圖無環，病態深度也會被擋下。
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// 單一物料的彙總需求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRequirement {
    /// 物料ID
    pub part_id: ComponentId,

    /// 料號
    pub part_number: String,

    /// 品名
    pub name: String,

    /// 計量單位（邊覆寫優先，否則取物料本身單位；不做換算）
    pub unit: String,

    /// 標準單位成本
    pub unit_cost: Decimal,

    /// 總需求量（跨所有出現位置累加）
    pub total_required_quantity: Decimal,

    /// 總成本 = 總需求量 × 標準單位成本
    pub total_cost: Decimal,
}

/// 展開層級樹節點（顯示用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomNode {
    /// 物料ID
    pub part_id: ComponentId,

    /// 料號
    pub part_number: String,

    /// 每單位父件用量（含損耗；根節點為 1）
    pub quantity_per_parent: Decimal,

    /// 乘至根數量後的實際需求量
    pub required_quantity: Decimal,

    /// 計量單位
    pub unit: String,

    /// 是否為葉節點（無 BOM 子項）
    pub is_leaf: bool,

    /// 子節點
    pub children: Vec<BomNode>,
}

/// BOM 展開結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomStructure {
    /// 根物料
    pub root: Part,

    /// 根數量
    pub root_quantity: Decimal,

    /// 扁平化物料需求（僅葉節點，依物料ID排序）
    pub material_requirements: Vec<MaterialRequirement>,

    /// 完整層級樹
    pub tree: BomNode,

    /// 物料總成本
    pub total_material_cost: Decimal,
}

/// BOM 展開引擎
///
/// 純讀、無共享狀態，同一實例可被多執行緒並行呼叫。
pub struct BomExploder<'a, S: PartStore> {
    store: &'a S,
    max_depth: u32,
}

impl<'a, S: PartStore> BomExploder<'a, S> {
    /// 創建展開引擎
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// 建構器模式：設置最大展開深度
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 展開 BOM
    ///
    /// # 錯誤
    /// - `Validation`：`root_quantity` 非正
    /// - `PartNotFound`：根物料或任何子件不存在
    /// - `CyclicBom`：遍歷遇到祖先鏈上的物料
    /// - `MaxDepthExceeded`：超過深度上限
    pub fn explode(
        &self,
        root_part_id: &ComponentId,
        root_quantity: Decimal,
    ) -> Result<BomStructure> {
        if root_quantity <= Decimal::ZERO {
            return Err(BomError::Validation(format!(
                "展開數量必須大於 0: {}",
                root_quantity
            )));
        }

        let root = self.store.get_part(root_part_id)?;

        tracing::debug!("開始 BOM 展開: {} x {}", root_part_id, root_quantity);
        let start_time = std::time::Instant::now();

        let mut requirements: BTreeMap<ComponentId, MaterialRequirement> = BTreeMap::new();
        let mut path: Vec<ComponentId> = vec![root.id.clone()];
        let mut on_path: HashSet<ComponentId> = HashSet::from([root.id.clone()]);

        let tree = self.visit(
            &root,
            Decimal::ONE,
            root.unit.clone(),
            root_quantity,
            0,
            &mut path,
            &mut on_path,
            &mut requirements,
        )?;

        // 彙總完成後一次計算成本，避免逐筆累加的精度漂移
        let mut material_requirements: Vec<MaterialRequirement> =
            requirements.into_values().collect();
        let mut total_material_cost = Decimal::ZERO;
        for req in &mut material_requirements {
            req.total_cost = req.total_required_quantity * req.unit_cost;
            total_material_cost += req.total_cost;
        }

        tracing::debug!(
            "BOM 展開完成: {} 項物料，耗時 {:?}",
            material_requirements.len(),
            start_time.elapsed()
        );

        Ok(BomStructure {
            root,
            root_quantity,
            material_requirements,
            tree,
            total_material_cost,
        })
    }

    /// 遞迴訪問單一節點
    ///
    /// `multiplier` 為該節點的實際需求量（已乘至根數量）。遞迴深度
    /// 受 `max_depth` 限制，呼叫堆疊不會失控；循環由祖先集合擋下。
    #[allow(clippy::too_many_arguments)]
    fn visit(
        &self,
        part: &Part,
        quantity_per_parent: Decimal,
        unit: String,
        multiplier: Decimal,
        depth: u32,
        path: &mut Vec<ComponentId>,
        on_path: &mut HashSet<ComponentId>,
        requirements: &mut BTreeMap<ComponentId, MaterialRequirement>,
    ) -> Result<BomNode> {
        if depth > self.max_depth {
            return Err(BomError::MaxDepthExceeded {
                component_id: part.id.to_string(),
                max_depth: self.max_depth,
            });
        }

        let mut children = self.store.bom_children(&part.id)?;

        if children.is_empty() {
            // 葉節點：計入物料需求，同一物料跨位置累加
            let entry = requirements
                .entry(part.id.clone())
                .or_insert_with(|| MaterialRequirement {
                    part_id: part.id.clone(),
                    part_number: part.part_number.clone(),
                    name: part.name.clone(),
                    unit: unit.clone(),
                    unit_cost: part.standard_cost,
                    total_required_quantity: Decimal::ZERO,
                    total_cost: Decimal::ZERO,
                });
            entry.total_required_quantity += multiplier;

            return Ok(BomNode {
                part_id: part.id.clone(),
                part_number: part.part_number.clone(),
                quantity_per_parent,
                required_quantity: multiplier,
                unit,
                is_leaf: true,
                children: Vec::new(),
            });
        }

        children.sort_by_key(|c| c.sequence);

        let mut child_nodes = Vec::with_capacity(children.len());
        for edge in &children {
            if on_path.contains(&edge.child_id) {
                let cycle_path = path
                    .iter()
                    .map(ComponentId::to_string)
                    .chain(std::iter::once(edge.child_id.to_string()))
                    .collect::<Vec<_>>()
                    .join(" -> ");
                tracing::error!("BOM 循環參照: {}", cycle_path);
                return Err(BomError::CyclicBom { path: cycle_path });
            }

            let child_part = self.store.get_part(&edge.child_id)?;
            let per_parent = edge.effective_quantity();
            let child_multiplier = per_parent * multiplier;
            let child_unit = edge
                .unit
                .clone()
                .unwrap_or_else(|| child_part.unit.clone());

            path.push(edge.child_id.clone());
            on_path.insert(edge.child_id.clone());

            let node = self.visit(
                &child_part,
                per_parent,
                child_unit,
                child_multiplier,
                depth + 1,
                path,
                on_path,
                requirements,
            )?;

            path.pop();
            on_path.remove(&edge.child_id);

            child_nodes.push(node);
        }

        // 中間組件：只進層級樹，不列入物料需求
        Ok(BomNode {
            part_id: part.id.clone(),
            part_number: part.part_number.clone(),
            quantity_per_parent,
            required_quantity: multiplier,
            unit,
            is_leaf: false,
            children: child_nodes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bom_core::{BomItem, PartType};
    use bom_graph::BomGraph;
    use proptest::prelude::*;

    fn widget_graph() -> BomGraph {
        // Widget ── 2x Bracket ── 3x Screw
        //       └── 1x Screw-kit
        let graph = BomGraph::new();
        graph.add_part(
            Part::new("WIDGET", "WG-01", "Widget", PartType::Finished)
                .with_standard_cost(Decimal::from(100)),
        );
        graph.add_part(
            Part::new("BRACKET", "BR-01", "Bracket", PartType::SemiFinished)
                .with_standard_cost(Decimal::from(10)),
        );
        graph.add_part(
            Part::new("SCREW", "SC-01", "Screw", PartType::RawMaterial)
                .with_standard_cost(Decimal::new(5, 1)),
        );
        graph.add_part(
            Part::new("SCREW-KIT", "SK-01", "Screw-kit", PartType::RawMaterial)
                .with_standard_cost(Decimal::from(2)),
        );

        graph
            .add_bom_item(BomItem::new("WIDGET", "BRACKET", Decimal::from(2)))
            .unwrap();
        graph
            .add_bom_item(BomItem::new("WIDGET", "SCREW-KIT", Decimal::ONE))
            .unwrap();
        graph
            .add_bom_item(BomItem::new("BRACKET", "SCREW", Decimal::from(3)))
            .unwrap();
        graph
    }

    fn find<'a>(result: &'a BomStructure, id: &str) -> Option<&'a MaterialRequirement> {
        result
            .material_requirements
            .iter()
            .find(|m| m.part_id == ComponentId::new(id))
    }

    #[test]
    fn test_two_level_explosion() {
        // 規格情境：explode(Widget, 10) → Screw-kit 10、Screw 60
        let graph = widget_graph();
        let exploder = BomExploder::new(&graph);

        let result = exploder
            .explode(&ComponentId::new("WIDGET"), Decimal::from(10))
            .unwrap();

        assert_eq!(result.material_requirements.len(), 2);
        assert_eq!(
            find(&result, "SCREW").unwrap().total_required_quantity,
            Decimal::from(60)
        );
        assert_eq!(
            find(&result, "SCREW-KIT").unwrap().total_required_quantity,
            Decimal::from(10)
        );
        // Bracket 是中間組件，不列入需求
        assert!(find(&result, "BRACKET").is_none());
    }

    #[test]
    fn test_intermediate_appears_in_tree() {
        let graph = widget_graph();
        let exploder = BomExploder::new(&graph);

        let result = exploder
            .explode(&ComponentId::new("WIDGET"), Decimal::from(10))
            .unwrap();

        assert!(!result.tree.is_leaf);
        assert_eq!(result.tree.children.len(), 2);

        let bracket = result
            .tree
            .children
            .iter()
            .find(|n| n.part_id == ComponentId::new("BRACKET"))
            .unwrap();
        assert!(!bracket.is_leaf);
        assert_eq!(bracket.required_quantity, Decimal::from(20));
        assert_eq!(bracket.children[0].required_quantity, Decimal::from(60));
    }

    #[test]
    fn test_shared_component_quantities_sum() {
        // 同一物料經兩條路徑出現：數量相加而非覆寫
        let graph = BomGraph::new();
        graph.add_part(Part::new("TOP", "T", "Top", PartType::Finished));
        graph.add_part(Part::new("L", "L", "Left", PartType::SemiFinished));
        graph.add_part(Part::new("R", "R", "Right", PartType::SemiFinished));
        graph.add_part(
            Part::new("BASE", "B", "Base", PartType::RawMaterial)
                .with_standard_cost(Decimal::from(4)),
        );

        graph
            .add_bom_item(BomItem::new("TOP", "L", Decimal::from(2)))
            .unwrap();
        graph
            .add_bom_item(BomItem::new("TOP", "R", Decimal::from(3)))
            .unwrap();
        graph
            .add_bom_item(BomItem::new("L", "BASE", Decimal::from(5)))
            .unwrap();
        graph
            .add_bom_item(BomItem::new("R", "BASE", Decimal::from(7)))
            .unwrap();

        let exploder = BomExploder::new(&graph);
        let result = exploder
            .explode(&ComponentId::new("TOP"), Decimal::from(10))
            .unwrap();

        // 10 × (2×5 + 3×7) = 310
        let base = find(&result, "BASE").unwrap();
        assert_eq!(base.total_required_quantity, Decimal::from(310));
        assert_eq!(base.total_cost, Decimal::from(1240));
    }

    #[test]
    fn test_cycle_detected() {
        let graph = BomGraph::new();
        graph.add_part(Part::new("A", "A", "A", PartType::SemiFinished));
        graph.add_part(Part::new("B", "B", "B", PartType::SemiFinished));
        graph.add_bom_item_unchecked(BomItem::new("A", "B", Decimal::ONE));
        graph.add_bom_item_unchecked(BomItem::new("B", "A", Decimal::ONE));

        let exploder = BomExploder::new(&graph);
        let err = exploder
            .explode(&ComponentId::new("A"), Decimal::ONE)
            .unwrap_err();

        match err {
            BomError::CyclicBom { path } => {
                assert_eq!(path, "A -> B -> A");
            }
            other => panic!("預期 CyclicBom，實得 {:?}", other),
        }
    }

    #[test]
    fn test_self_reference_detected_at_traversal() {
        // 防線在遍歷端：即使髒資料繞過寫入驗證也不會無窮迴圈
        let graph = BomGraph::new();
        graph.add_part(Part::new("A", "A", "A", PartType::SemiFinished));
        graph.add_bom_item_unchecked(BomItem::new("A", "A", Decimal::ONE));

        let exploder = BomExploder::new(&graph);
        let err = exploder
            .explode(&ComponentId::new("A"), Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, BomError::CyclicBom { .. }));
    }

    #[test]
    fn test_max_depth_guard() {
        // 100 層的直鏈在預設上限 64 下必須被擋下
        let graph = BomGraph::new();
        for i in 0..100 {
            graph.add_part(Part::new(
                format!("P{}", i),
                format!("P{}", i),
                format!("P{}", i),
                PartType::SemiFinished,
            ));
        }
        for i in 0..99 {
            graph
                .add_bom_item(BomItem::new(
                    format!("P{}", i),
                    format!("P{}", i + 1),
                    Decimal::ONE,
                ))
                .unwrap();
        }

        let exploder = BomExploder::new(&graph);
        let err = exploder
            .explode(&ComponentId::new("P0"), Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, BomError::MaxDepthExceeded { .. }));

        // 放寬上限後可以展開
        let exploder = BomExploder::new(&graph).with_max_depth(128);
        let result = exploder
            .explode(&ComponentId::new("P0"), Decimal::ONE)
            .unwrap();
        assert_eq!(result.material_requirements.len(), 1);
    }

    #[test]
    fn test_root_not_found() {
        let graph = BomGraph::new();
        let exploder = BomExploder::new(&graph);
        let err = exploder
            .explode(&ComponentId::new("GHOST"), Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, BomError::PartNotFound(_)));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let graph = widget_graph();
        let exploder = BomExploder::new(&graph);

        let err = exploder
            .explode(&ComponentId::new("WIDGET"), Decimal::ZERO)
            .unwrap_err();
        assert!(matches!(err, BomError::Validation(_)));

        let err = exploder
            .explode(&ComponentId::new("WIDGET"), Decimal::from(-5))
            .unwrap_err();
        assert!(matches!(err, BomError::Validation(_)));
    }

    #[test]
    fn test_fractional_quantities() {
        // 連續計量單位：0.5 kg/單位 × 2.5 單位 = 1.25 kg
        let graph = BomGraph::new();
        graph.add_part(Part::new("PAINTED", "PT", "Painted part", PartType::Finished));
        graph.add_part(
            Part::new("PAINT", "PA", "Paint", PartType::RawMaterial)
                .with_unit("KG")
                .with_standard_cost(Decimal::from(8)),
        );
        graph
            .add_bom_item(BomItem::new("PAINTED", "PAINT", Decimal::new(5, 1)))
            .unwrap();

        let exploder = BomExploder::new(&graph);
        let result = exploder
            .explode(&ComponentId::new("PAINTED"), Decimal::new(25, 1))
            .unwrap();

        let paint = find(&result, "PAINT").unwrap();
        assert_eq!(paint.total_required_quantity, Decimal::new(125, 2));
        assert_eq!(paint.unit, "KG");
        assert_eq!(paint.total_cost, Decimal::from(10));
    }

    #[test]
    fn test_edge_unit_override() {
        let graph = BomGraph::new();
        graph.add_part(Part::new("ASSY", "AS", "Assembly", PartType::Finished));
        graph.add_part(
            Part::new("WIRE", "WR", "Wire", PartType::RawMaterial).with_unit("M"),
        );
        graph
            .add_bom_item(BomItem::new("ASSY", "WIRE", Decimal::from(30)).with_unit("CM"))
            .unwrap();

        let exploder = BomExploder::new(&graph);
        let result = exploder
            .explode(&ComponentId::new("ASSY"), Decimal::ONE)
            .unwrap();

        // 邊覆寫優先，且不做 CM → M 換算
        assert_eq!(find(&result, "WIRE").unwrap().unit, "CM");
        assert_eq!(
            find(&result, "WIRE").unwrap().total_required_quantity,
            Decimal::from(30)
        );
    }

    #[test]
    fn test_scrap_factor_inflates_requirement() {
        let graph = BomGraph::new();
        graph.add_part(Part::new("A", "A", "A", PartType::Finished));
        graph.add_part(Part::new("B", "B", "B", PartType::RawMaterial));
        graph
            .add_bom_item(
                BomItem::new("A", "B", Decimal::from(2)).with_scrap_factor(Decimal::new(5, 2)),
            )
            .unwrap();

        let exploder = BomExploder::new(&graph);
        let result = exploder
            .explode(&ComponentId::new("A"), Decimal::from(100))
            .unwrap();

        // 2 × 1.05 × 100 = 210
        assert_eq!(
            find(&result, "B").unwrap().total_required_quantity,
            Decimal::from(210)
        );
    }

    #[test]
    fn test_exploding_leaf_part_returns_itself() {
        let graph = widget_graph();
        let exploder = BomExploder::new(&graph);

        let result = exploder
            .explode(&ComponentId::new("SCREW"), Decimal::from(7))
            .unwrap();

        assert_eq!(result.material_requirements.len(), 1);
        assert_eq!(
            find(&result, "SCREW").unwrap().total_required_quantity,
            Decimal::from(7)
        );
        assert!(result.tree.is_leaf);
    }

    proptest! {
        /// 單層 BOM 的線性縮放：需求量 = 根數量 × 邊用量
        #[test]
        fn prop_flat_bom_scales_linearly(qty in 1u32..10_000, edge_qty in 1u32..500) {
            let graph = BomGraph::new();
            graph.add_part(Part::new("ROOT", "R", "Root", PartType::Finished));
            graph.add_part(Part::new("LEAF", "L", "Leaf", PartType::RawMaterial));
            graph
                .add_bom_item(BomItem::new("ROOT", "LEAF", Decimal::from(edge_qty)))
                .unwrap();

            let exploder = BomExploder::new(&graph);
            let result = exploder
                .explode(&ComponentId::new("ROOT"), Decimal::from(qty))
                .unwrap();

            prop_assert_eq!(
                result.material_requirements[0].total_required_quantity,
                Decimal::from(qty) * Decimal::from(edge_qty)
            );
        }
    }
}
