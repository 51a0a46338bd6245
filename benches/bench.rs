// Criterion benchmarks for Nearby Factories

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nearby_factories::core::{
    distance::{approximate_distance, calculate_bounding_box, haversine_distance},
    FilterEngine, HIGH_RISK_CATEGORY_CODES,
};
use nearby_factories::models::{Coordinate, FacilityRecord, FilterCriteria};
use nearby_factories::services::{DatasetState, FilterCache};

const CENTER: Coordinate = Coordinate::new(14.0504, 101.3678);

fn create_record(id: usize) -> FacilityRecord {
    let lat_offset = ((id as f64 * 0.0037) % 0.6) - 0.3;
    let lon_offset = ((id as f64 * 0.0053) % 0.6) - 0.3;
    let category = if id % 4 == 0 {
        HIGH_RISK_CATEGORY_CODES[id % HIGH_RISK_CATEGORY_CODES.len()].to_string()
    } else {
        format!("{:05}", 20000 + id % 500)
    };

    FacilityRecord {
        id: format!("3-{}-{}", id % 100, id),
        name: format!("โรงงาน {}", id),
        owner: format!("บริษัท ผู้ประกอบการ {} จำกัด", id % 50),
        business_description: if id % 3 == 0 { "ผลิตแป้งมันสำปะหลัง" } else { "ซ่อมรถยนต์" }.to_string(),
        investment: Some(1_000_000.0 + id as f64),
        employees: Some((id % 200) as u32),
        horsepower: Some(100.0),
        kilowatts: Some(75.0),
        category_code: category,
        district: ["เมืองปราจีนบุรี", "กบินทร์บุรี", "ศรีมหาโพธิ", "บ้านสร้าง"][id % 4].to_string(),
        address: String::new(),
        phone: None,
        location: Coordinate::new(CENTER.latitude + lat_offset, CENTER.longitude + lon_offset),
    }
}

fn create_dataset(count: usize) -> Vec<FacilityRecord> {
    (0..count).map(create_record).collect()
}

fn bench_distance_metrics(c: &mut Criterion) {
    let other = Coordinate::new(13.9833, 101.7167);

    c.bench_function("haversine_distance", |b| {
        b.iter(|| haversine_distance(black_box(&CENTER), black_box(&other)));
    });

    c.bench_function("approximate_distance", |b| {
        b.iter(|| approximate_distance(black_box(&CENTER), black_box(&other)));
    });

    c.bench_function("bounding_box_calculation", |b| {
        b.iter(|| calculate_bounding_box(black_box(&CENTER), black_box(10.0)));
    });
}

fn bench_filtering(c: &mut Criterion) {
    let engine = FilterEngine::default();
    let criteria = FilterCriteria {
        search_text: "แป้ง".to_string(),
        radius_only: true,
        high_risk_only: true,
        ..Default::default()
    };

    let mut group = c.benchmark_group("filtering");

    for record_count in [100, 1000, 5000, 20000].iter() {
        let dataset = create_dataset(*record_count);

        group.bench_with_input(BenchmarkId::new("filter", record_count), record_count, |b, _| {
            b.iter(|| engine.filter(black_box(&dataset), black_box(&criteria), black_box(Some(&CENTER))));
        });
    }

    group.finish();
}

fn bench_cached_filtering(c: &mut Criterion) {
    let dataset = DatasetState::loaded(create_dataset(5000));
    let cache = FilterCache::new(FilterEngine::default(), 64);
    let criteria = FilterCriteria {
        radius_only: true,
        ..Default::default()
    };

    c.bench_function("cached_filter_5000_records", |b| {
        b.iter(|| cache.filter(black_box(&dataset), black_box(&criteria), black_box(Some(&CENTER))));
    });
}

criterion_group!(benches, bench_distance_metrics, bench_filtering, bench_cached_filtering);

criterion_main!(benches);
