//! BOM 展開示例

use bom::{BomExploder, BomGraph, BomItem, ComponentId, Part, PartType};
use rust_decimal::Decimal;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== BOM 展開示例 ===\n");

    // 建立零件與 BOM：
    //   Widget ── 2x Bracket ── 3x Screw
    //         └── 1x Screw-kit
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

    graph.add_bom_item(BomItem::new("WIDGET", "BRACKET", Decimal::from(2)))?;
    graph.add_bom_item(BomItem::new("WIDGET", "SCREW-KIT", Decimal::ONE))?;
    graph.add_bom_item(BomItem::new("BRACKET", "SCREW", Decimal::from(3)))?;

    // 展開 10 件 Widget
    let exploder = BomExploder::new(&graph);
    let result = exploder.explode(&ComponentId::new("WIDGET"), Decimal::from(10))?;

    println!("根物料: {} x {}", result.root.part_number, result.root_quantity);
    println!("\n物料需求:");
    for req in &result.material_requirements {
        println!(
            "  - {} ({}): {} {}，成本 {}",
            req.part_number, req.name, req.total_required_quantity, req.unit, req.total_cost
        );
    }
    println!("\n物料總成本: {}", result.total_material_cost);

    Ok(())
}
