// Integration tests for Nearby Factories

use async_trait::async_trait;
use nearby_factories::core::{
    FilterEngine, LocationError, LocationErrorKind, LocationResolver, LocationSource, LocationState, Position,
    PositionOptions, SessionAction, SessionController,
};
use nearby_factories::models::{Coordinate, FilterCriteria};
use nearby_factories::services::{parse_feature_collection, DatasetState, FilterCache, UnsupportedSource};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn feature(id: &str, name: &str, category: &str, district: &str, lat: f64, lng: f64) -> serde_json::Value {
    json!({
        "type": "Feature",
        "properties": {
            "เลขทะเบียน": id,
            "ชื่อโรงงาน": name,
            "ผู้ประกอบก": "บริษัท ตัวอย่าง จำกัด",
            "ประกอบกิจก": "ผลิตภัณฑ์ทั่วไป",
            "ละติจูด": lat,
            "ลองติจูด": lng,
            "โทรศัพท์": "",
            "อำเภอ": district,
            "ที่ตั้ง": "",
            "การลงทุน": "1000000",
            "จำนวนคน": "20",
            "hp": "100",
            "kw": "75",
            "ประเภท": category
        },
        "geometry": { "type": "Point", "coordinates": [lng, lat] }
    })
}

fn create_dataset(features: Vec<serde_json::Value>) -> DatasetState {
    let collection = json!({ "type": "FeatureCollection", "features": features });
    let records = parse_feature_collection(collection.to_string().as_bytes()).unwrap();
    DatasetState::loaded(records)
}

/// Source that answers after a delay
struct DelayedSource {
    coordinate: Coordinate,
    delay: Duration,
}

#[async_trait]
impl LocationSource for DelayedSource {
    async fn current_position(&self, _options: &PositionOptions) -> Result<Position, LocationError> {
        tokio::time::sleep(self.delay).await;
        Ok(Position {
            coordinate: self.coordinate,
            accuracy_m: 8.0,
            timestamp: chrono::Utc::now(),
        })
    }
}

#[tokio::test]
async fn test_integration_end_to_end_filtering() {
    let dataset = create_dataset(vec![
        feature("1", "โรงงานน้ำตาล", "10100", "เมืองปราจีนบุรี", 14.0504, 101.3700),
        feature("2", "โรงสีข้าว", "00101", "เมืองปราจีนบุรี", 14.0600, 101.3800),
        feature("3", "โรงงานเหล็ก", "05900", "กบินทร์บุรี", 13.9833, 101.7167),
        feature("4", "โรงงานกระดาษ", "04201", "ศรีมหาโพธิ", 14.0504, 101.4678),
    ]);

    let session = Arc::new(SessionController::new());
    let resolver = LocationResolver::new(Arc::new(UnsupportedSource), session.clone());
    let filters = FilterCache::new(FilterEngine::default(), 32);

    // Radius flag before any location: nothing is excluded
    session.dispatch(SessionAction::ToggleRadius);
    let location = session.location().coordinate();
    let before = filters.filter(&dataset, &session.criteria(), location.as_ref());
    assert_eq!(before.total_count, 4);

    // Unsupported environment settles on the regional center
    let state = resolver.resolve().await;
    assert_eq!(
        state,
        LocationState::Fallback {
            coordinate: Coordinate::new(14.0504, 101.3678),
            error: LocationErrorKind::Unsupported,
        }
    );

    let location = session.location().coordinate();
    let nearby = filters.filter(&dataset, &session.criteria(), location.as_ref());
    let ids: Vec<&str> = nearby.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);

    // High-risk on top of radius
    session.dispatch(SessionAction::ToggleHighRisk);
    let risky = filters.filter(&dataset, &session.criteria(), location.as_ref());
    assert_eq!(risky.total_count, 1);
    assert_eq!(risky.records[0].id, "1");

    // Move to Kabin Buri manually
    resolver.set_manual("13.9833", "101.7167");
    let location = session.location().coordinate();
    let moved = filters.filter(&dataset, &session.criteria(), location.as_ref());
    assert_eq!(moved.total_count, 1);
    assert_eq!(moved.records[0].id, "3");
}

#[tokio::test]
async fn test_integration_display_cap() {
    let features = (0..25)
        .map(|i| feature(&format!("R{}", i), "โรงงาน", "10100", "เมืองปราจีนบุรี", 14.05, 101.37))
        .collect();
    let dataset = create_dataset(features);
    let criteria = FilterCriteria {
        search_text: "โรงงาน".to_string(),
        high_risk_only: true,
        ..Default::default()
    };

    let result = FilterEngine::default().filter(dataset.records(), &criteria, None);

    assert_eq!(result.records.len(), 20);
    assert_eq!(result.total_count, 25);
    assert_eq!(result.records[0].id, "R0");
}

#[tokio::test]
async fn test_integration_unavailable_dataset() {
    let filters = FilterCache::new(FilterEngine::default(), 8);
    let criteria = FilterCriteria {
        search_text: "steel".to_string(),
        radius_only: true,
        ..Default::default()
    };

    let result = filters.filter(&DatasetState::Unavailable, &criteria, Some(&Coordinate::new(14.0, 101.0)));

    assert!(result.records.is_empty());
    assert_eq!(result.total_count, 0);
}

#[tokio::test]
async fn test_integration_last_write_wins() {
    let device = Coordinate::new(13.9, 101.2);
    let manual = Coordinate::new(14.2, 101.5);
    let session = Arc::new(SessionController::new());
    let resolver = Arc::new(LocationResolver::new(
        Arc::new(DelayedSource {
            coordinate: device,
            delay: Duration::from_millis(100),
        }),
        session.clone(),
    ));

    let background = resolver.clone();
    let request = tokio::spawn(async move { background.resolve().await });

    // Manual override lands while the device request is in flight
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(session.location(), LocationState::Requesting);
    resolver.set_manual("14.2", "101.5");
    assert_eq!(session.location(), LocationState::ManualOverride { coordinate: manual });

    let finished = request.await.unwrap();
    assert_eq!(finished, LocationState::Resolved { coordinate: device });

    // A later manual override wins again
    resolver.set_manual("14.2", "101.5");
    assert_eq!(session.location().coordinate(), Some(manual));
}

#[tokio::test]
async fn test_integration_status_changes_are_observable() {
    let session = Arc::new(SessionController::new());
    let mut rx = session.subscribe();
    let resolver = LocationResolver::new(Arc::new(UnsupportedSource), session.clone());

    assert!(rx.borrow().location.is_loading());
    resolver.resolve().await;

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert!(!state.location.is_loading());
    assert_eq!(
        state.location.error_message(),
        Some(LocationErrorKind::Unsupported.message())
    );
}
