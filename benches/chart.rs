use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use multiview_db::chart::{build_chart, Aggregation, ChartConfig, ChartType, SortOrder, YAxisField};
use multiview_db::types::{FieldConfig, FieldType, RecordData};

fn dataset(rows: usize) -> (Vec<FieldConfig>, Vec<RecordData>) {
    let fields = vec![
        FieldConfig::new("region", "Region", FieldType::Text),
        FieldConfig::new("revenue", "Revenue", FieldType::Number),
        FieldConfig::new("units", "Units", FieldType::Number),
    ];
    let records = (0..rows)
        .map(|i| {
            RecordData::new(format!("r{i}"))
                .with("region", json!(format!("R{}", i % 40)))
                .with("revenue", json!((i * 37 % 1000) as f64 / 3.0))
                .with("units", json!(i % 17))
        })
        .collect();
    (fields, records)
}

fn bench_chart(c: &mut Criterion) {
    let (fields, records) = dataset(10_000);

    let bar = ChartConfig {
        x_axis_field: Some("region".to_string()),
        y_axis_fields: vec![YAxisField::new("revenue"), YAxisField::new("units")],
        aggregation: Aggregation::Sum,
        sort_order: SortOrder::Desc,
        top_n: 10,
        ..ChartConfig::default()
    };
    c.bench_function("chart_bar_sum_10k", |b| {
        b.iter(|| build_chart(black_box(&bar), black_box(&fields), black_box(&records)))
    });

    let pie = ChartConfig {
        chart_type: ChartType::Pie,
        x_axis_field: Some("region".to_string()),
        top_n: 8,
        sort_order: SortOrder::Desc,
        ..ChartConfig::default()
    };
    c.bench_function("chart_pie_count_10k", |b| {
        b.iter(|| build_chart(black_box(&pie), black_box(&fields), black_box(&records)))
    });
}

criterion_group!(benches, bench_chart);
criterion_main!(benches);
