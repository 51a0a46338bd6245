//! Raw GeoJSON shapes of the facility dataset.
//!
//! The source file labels its properties in Thai and stores most numbers as
//! strings, so the property bag is deserialized leniently and converted into
//! [`FacilityRecord`](super::FacilityRecord) by the dataset loader.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: FacilityProperties,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

impl Geometry {
    /// The geometry as a point, if it is a `Point` with numeric `[lng, lat]`
    pub fn point(&self) -> Option<geo::Point<f64>> {
        if self.kind != "Point" {
            return None;
        }

        let coords = self.coordinates.as_array()?;
        let longitude = coords.first()?.as_f64()?;
        let latitude = coords.get(1)?.as_f64()?;

        Some(geo::Point::new(longitude, latitude))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacilityProperties {
    #[serde(rename = "เลขทะเบียน", default, deserialize_with = "lenient_code")]
    pub registration_id: String,
    #[serde(rename = "ชื่อโรงงาน", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "ผู้ประกอบก", default, deserialize_with = "lenient_string")]
    pub owner: String,
    #[serde(rename = "ประกอบกิจก", default, deserialize_with = "lenient_string")]
    pub business: String,
    #[serde(rename = "การลงทุน", default, deserialize_with = "lenient_number")]
    pub investment: Option<f64>,
    #[serde(rename = "จำนวนคน", default, deserialize_with = "lenient_number")]
    pub employees: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub hp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub kw: Option<f64>,
    #[serde(rename = "ประเภท", default, deserialize_with = "lenient_code")]
    pub category: String,
    #[serde(rename = "อำเภอ", default, deserialize_with = "lenient_string")]
    pub district: String,
    #[serde(rename = "ที่ตั้ง", default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(rename = "โทรศัพท์", default, deserialize_with = "lenient_string")]
    pub phone: String,
}

/// Accepts a string, a number, or null; text is kept as written
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Identifier-like fields compared by equality, surrounding whitespace removed
fn lenient_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(|s| s.trim().to_string())
}

/// Accepts a number or a numeric string (thousands separators allowed)
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_numeric_text(&s),
        _ => None,
    })
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
