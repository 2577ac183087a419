//! Benchmarks for the canvas Markdown renderer and edit history
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use shopdesk::canvas::{render, CanvasCommand, CanvasDocument};

fn sample_document(sections: usize) -> String {
    let mut text = String::from("# 季度销售报告\n\n");
    for i in 0..sections {
        text.push_str(&format!(
            "## 第{}部分\n\n本季度**营收**增长 *12.5%*，详见 `daily_metrics`。\n\n\
             - 手机配件\n- 智能穿戴\n1. 补货\n2. 促销\n\n\
             > 重点关注 VIP 客户复购\n\n\
             | 指标 | 数值 |\n| --- | --- |\n| 订单 | {} |\n| 客户 | {} |\n\n---\n\n",
            i + 1,
            i * 17,
            i * 5
        ));
    }
    text
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for sections in [1, 10, 100] {
        let text = sample_document(sections);
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_function(format!("sections_{}", sections), |b| {
            b.iter(|| render(black_box(&text)))
        });
    }

    group.finish();
}

fn bench_reveal(c: &mut Criterion) {
    let text = sample_document(10);
    let prefixes: Vec<String> = text
        .char_indices()
        .map(|(i, ch)| text[..i + ch.len_utf8()].to_string())
        .collect();

    c.bench_function("reveal_into_document", |b| {
        b.iter(|| {
            let mut doc = CanvasDocument::new("bench", "");
            let last = prefixes.len() - 1;
            for (i, prefix) in prefixes.iter().enumerate() {
                doc.apply(CanvasCommand::Reveal {
                    text: prefix.clone(),
                    done: i == last,
                });
            }
            black_box(doc.history().len())
        })
    });
}

criterion_group!(benches, bench_render, bench_reveal);
criterion_main!(benches);
