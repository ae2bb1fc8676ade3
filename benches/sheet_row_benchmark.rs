use chrono::{FixedOffset, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use status_log::record::{SheetRow, Status, StatusRecord};

fn benchmark_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("sheet_row");
    let timezone = FixedOffset::east_opt(3600).unwrap();
    let timestamp = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    group.bench_function("encode", |b| {
        b.iter(|| {
            let record = StatusRecord::new(black_box(timestamp), Status::On, &timezone);
            serde_json::to_string(&SheetRow::from(&record)).unwrap()
        });
    });

    let line = serde_json::to_string(&SheetRow::from(&StatusRecord::new(
        timestamp,
        Status::Off,
        &timezone,
    )))
    .unwrap();

    group.bench_function("decode", |b| {
        b.iter(|| {
            let row: SheetRow = serde_json::from_str(black_box(&line)).unwrap();
            StatusRecord::try_from(row).unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_rows);
criterion_main!(benches);
