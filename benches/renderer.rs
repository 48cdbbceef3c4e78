use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use payslope::config::Config;
use payslope::dataset::Dataset;
use payslope::ir::Selection;
use payslope::layout::compute_slope_layout;
use payslope::layout::label_placement::{Label, resolve_group_positions, resolve_label_positions};
use payslope::parser::parse_comp_csv;
use payslope::render::render_svg;
use std::hint::black_box;

/// Labels packed tighter than their size so most of them collide.
fn crowded_labels(count: usize, groups: usize) -> Vec<Label> {
    (0..count)
        .map(|idx| {
            let anchor = 800.0 - (idx as f32 * 7.3) % 700.0;
            Label::new(idx, anchor, 18.0).with_group(format!("g{}", idx % groups.max(1)))
        })
        .collect()
}

fn synthetic_comp_csv(tickers: usize, roles: usize, ranks: usize) -> String {
    let mut out =
        String::from("Ticker,Role Name,Role Rank Name,Role Rank,Total Pay,Base Pay,Stock,Bonus\n");
    for t in 0..tickers {
        for r in 0..roles {
            for k in 0..ranks {
                let total = 120_000 + t * 7_000 + r * 11_000 + k * 45_000;
                out.push_str(&format!(
                    "T{t:02},role-{r},L{k},{k},{total},{},{},{}\n",
                    total * 6 / 10,
                    total * 3 / 10,
                    total / 10
                ));
            }
        }
    }
    out
}

fn fixture_csv() -> &'static str {
    include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/comp_small.csv"
    ))
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_labels");
    for count in [10usize, 100, 1_000, 10_000] {
        let labels = crowded_labels(count, 8);
        group.bench_with_input(BenchmarkId::from_parameter(count), &labels, |b, labels| {
            b.iter(|| {
                let resolved = resolve_label_positions(black_box(labels), 5.0);
                black_box(resolved.len());
            });
        });
    }
    group.finish();
}

fn bench_resolve_grouped(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_group_labels");
    for count in [100usize, 1_000, 10_000] {
        let labels = crowded_labels(count, 8);
        group.bench_with_input(BenchmarkId::from_parameter(count), &labels, |b, labels| {
            b.iter(|| {
                let resolved = resolve_group_positions(black_box(labels), 5.0, Some("g3"));
                black_box(resolved.len());
            });
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let inputs = [
        ("fixture", fixture_csv().to_string()),
        ("synthetic_50x8x6", synthetic_comp_csv(50, 8, 6)),
    ];
    for (name, input) in &inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, data| {
            b.iter(|| {
                let rows = parse_comp_csv(black_box(data)).expect("parse failed");
                black_box(rows.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let mut config = Config::default();
    config.chart.fast_text_metrics = true;
    let inputs = [
        ("fixture", fixture_csv().to_string()),
        ("synthetic_50x8x6", synthetic_comp_csv(50, 8, 6)),
    ];
    for (name, input) in &inputs {
        let dataset = Dataset::new(parse_comp_csv(input).expect("parse failed"), Vec::new());
        let ticker = dataset.tickers().into_iter().next().expect("tickers");
        let view = dataset.company_view(&ticker).expect("view");
        let selection = Selection::group(view.left[0].name.clone());
        group.bench_with_input(BenchmarkId::from_parameter(name), &view, |b, view| {
            b.iter(|| {
                let layout = compute_slope_layout(
                    black_box(view),
                    &selection,
                    &config.theme,
                    &config.chart,
                    &config.render,
                );
                let svg = render_svg(&layout, &config.theme, &config.chart);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_resolve, bench_resolve_grouped, bench_parse, bench_end_to_end
);
criterion_main!(benches);
