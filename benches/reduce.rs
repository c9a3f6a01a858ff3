/// Benchmarks for filter reducers.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glacierview::filters::{self, Field, Filter};
use glacierview::inventory::GlacierRecord;

fn get_test_records(count: usize) -> Vec<GlacierRecord> {
    (0..count)
        .map(|i| {
            let x = i as f64;
            let mut record = GlacierRecord::new(
                &format!("RGI60-11.{:05}", i),
                None,
                (x * 7.3) % 360.0 - 180.0,
                (x * 3.1) % 180.0 - 90.0,
                (x * 0.37) % 100.0,
            );
            record.mean_elev = (x * 13.0) % 6000.0;
            record.prcp = (x * 17.0) % 4000.0;
            record.temp = (x * 0.11) % 34.0 - 27.0;
            record
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    for size_k in [1, 16, 256] {
        let size = size_k * 1024;
        let records = get_test_records(size);
        let labels: Vec<String> = records
            .iter()
            .step_by(10)
            .map(|record| record.label.clone())
            .collect();
        let filter_sets: [(&str, Vec<Filter>); 4] = [
            ("none", vec![]),
            ("area", vec![Filter::range(Field::Area, 2.0, 60.0)]),
            (
                "climate",
                vec![
                    Filter::range(Field::Precipitation, 500.0, 2500.0),
                    Filter::range(Field::Temperature, -10.0, 0.0),
                ],
            ),
            (
                "labels",
                vec![
                    Filter::labels(labels.iter().cloned()),
                    Filter::range(Field::Latitude, -45.0, 45.0),
                ],
            ),
        ];
        for (filter_name, filters) in filter_sets {
            let name = format!("reduce({}, {})", size, filter_name);
            c.bench_function(&name, |b| {
                b.iter(|| filters::reduce(black_box(&records), black_box(&filters)).len())
            });
        }
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
