//! 批次消耗差異示例

use bom::{
    Batch, BatchStore, BomGraph, BomItem, ConsumptionInput, MemoryBatchStore, Part, PartType,
    VarianceCalculator,
};
use rust_decimal::Decimal;

fn main() -> anyhow::Result<()> {
    println!("=== 批次消耗差異示例 ===\n");

    // 每件成品需要 2 KG 樹脂
    let graph = BomGraph::new();
    graph.add_part(Part::new("MOLDED", "MD-01", "Molded part", PartType::Finished));
    graph.add_part(
        Part::new("RESIN", "RS-01", "Resin", PartType::RawMaterial)
            .with_unit("KG")
            .with_standard_cost(Decimal::from(12)),
    );
    graph.add_bom_item(BomItem::new("MOLDED", "RESIN", Decimal::from(2)))?;

    // 批次 50 件，操作員記錄實際用掉 96 KG
    let batches = MemoryBatchStore::new();
    batches.add_batch(Batch::new("BATCH-001", "LINE-001", "MOLDED", Decimal::from(50)));
    batches.upsert_consumption(
        ConsumptionInput::new("BATCH-001", "RESIN", Decimal::from(96), Decimal::from(12))
            .with_operator("OP-007"),
    )?;

    let calc = VarianceCalculator::new(&graph, &batches);
    let report = calc.requirements_for_batch("BATCH-001")?;

    println!("批次 {}（{} x {}）", report.batch_id, report.part_id, report.batch_quantity);
    println!("\n逐料差異:");
    for line in &report.lines {
        println!(
            "  - {}: 預期 {} {}，實際 {}，差異 {} ({}%)，分類 {:?}",
            line.part_number,
            line.expected_quantity,
            line.unit,
            line.actual_quantity,
            line.variance,
            line.variance_percent,
            line.status
        );
    }

    let summary = &report.summary;
    println!(
        "\n彙總: 需求成本 {}，消耗成本 {}，成本差異 {}",
        summary.total_required_cost, summary.total_consumed_cost, summary.variance_cost
    );

    Ok(())
}
