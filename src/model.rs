//! Marker resource: identifier, stored record, client payloads, and the public projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use utoipa::{IntoParams, ToSchema};

/// Maximum title length in characters.
pub const TITLE_MAX_LENGTH: usize = 128;
pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 30;
pub const MAX_PER_PAGE: u64 = 100;

/// 24 hex characters, any case.
pub static ID_SHAPE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[0-9a-fA-F]{24}$").expect("id shape pattern"));

/// Must contain both a digit and a letter; combined with [`ID_SHAPE`].
pub static ID_MIXED: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^(?i)(?:[0-9]+[a-f]|[a-f]+[0-9])").expect("id mix pattern"));

/// Store-assigned marker identifier: 24 lowercase hex characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct MarkerId(String);

impl MarkerId {
    /// Parses a client-supplied identifier. Uppercase hex is accepted and folded.
    pub fn parse(s: &str) -> Option<Self> {
        if ID_SHAPE.is_match(s) && ID_MIXED.is_match(s) {
            Some(MarkerId(s.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// Unix seconds (4 bytes, big endian) followed by 8 random bytes.
    /// Ids that would fail [`MarkerId::parse`] are discarded and redrawn.
    pub fn generate() -> Self {
        loop {
            let secs = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
            let random = uuid::Uuid::new_v4();
            let mut bytes = [0u8; 12];
            bytes[..4].copy_from_slice(&secs.to_be_bytes());
            bytes[4..].copy_from_slice(&random.as_bytes()[..8]);
            let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
            if let Some(id) = Self::parse(&hex) {
                break id;
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored marker, as the store returns it.
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Marker {
    pub id: MarkerId,
    pub title: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Marker {
    /// Public field set. Internal columns (`updated_at`) are left out.
    pub fn transform(&self) -> MarkerView {
        MarkerView {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            longitude: self.longitude,
            latitude: self.latitude,
            created_at: self.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MarkerView {
    #[serde(rename = "_id")]
    #[schema(value_type = String, example = "5f1d7a3b9c1e4a2b3c4d5e6f")]
    pub id: MarkerId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Fields accepted on create.
#[derive(Clone, Debug, PartialEq, Deserialize, ToSchema)]
pub struct NewMarker {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Fields accepted on update; absent fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, ToSchema)]
pub struct MarkerPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl MarkerPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }

    pub fn apply(&self, marker: &mut Marker) {
        if let Some(title) = &self.title {
            marker.title = title.clone();
        }
        if let Some(description) = &self.description {
            marker.description = Some(description.clone());
        }
        if let Some(latitude) = self.latitude {
            marker.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            marker.longitude = longitude;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number.
    #[serde(default = "default_page")]
    #[param(minimum = 1, default = 1)]
    pub page: u64,
    #[serde(default = "default_per_page")]
    #[param(minimum = 1, maximum = 100, default = 30)]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

impl Default for ListParams {
    fn default() -> Self {
        ListParams {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ListParams {
    pub fn skip(&self) -> u64 {
        self.per_page.saturating_mul(self.page.saturating_sub(1))
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }
}

/// Window over all markers, ordered by title descending (bytewise, ties by id).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FindOptions {
    pub skip: u64,
    pub limit: u64,
}

impl FindOptions {
    /// The window `list` serves for a page.
    pub fn by_title_desc(params: &ListParams) -> Self {
        FindOptions {
            skip: params.skip(),
            limit: params.limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Marker {
        let now = Utc::now();
        Marker {
            id: MarkerId::generate(),
            title: "Simple Marker One".into(),
            description: None,
            latitude: 37.78825,
            longitude: -122.4324,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn parse_accepts_mixed_hex_and_folds_case() {
        let id = MarkerId::parse("507F191E810C19729DE860EA").unwrap();
        assert_eq!(id.as_str(), "507f191e810c19729de860ea");
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        for raw in [
            "",
            "507f191e810c19729de860e",
            "507f191e810c19729de860eaa",
            "507f191e810c19729de860eg",
            "123456789012345678901234",
            "abcdefabcdefabcdefabcdef",
        ] {
            assert!(MarkerId::parse(raw).is_none(), "{raw}");
        }
    }

    #[test]
    fn generated_ids_round_trip_through_parse() {
        for _ in 0..256 {
            let id = MarkerId::generate();
            assert_eq!(MarkerId::parse(id.as_str()), Some(id.clone()));
        }
    }

    #[test]
    fn transform_exposes_public_fields_only() {
        let marker = sample();
        let json = serde_json::to_value(marker.transform()).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["_id", "createdAt", "latitude", "longitude", "title"]);
        assert_eq!(json["_id"], marker.id.as_str());
    }

    #[test]
    fn transform_keeps_description_when_present() {
        let mut marker = sample();
        marker.description = Some(String::new());
        let json = serde_json::to_value(marker.transform()).unwrap();
        assert_eq!(json["description"], "");
    }

    #[test]
    fn skip_is_per_page_times_previous_pages() {
        let params = ListParams { page: 3, per_page: 25 };
        assert_eq!(params.skip(), 50);
        assert_eq!(ListParams::default().skip(), 0);
        assert_eq!(ListParams::default().limit(), 30);
    }

    #[test]
    fn patch_applies_only_supplied_fields() {
        let mut marker = sample();
        let before = marker.clone();
        let patch = MarkerPatch {
            latitude: Some(1.0),
            ..MarkerPatch::default()
        };
        assert!(!patch.is_empty());
        patch.apply(&mut marker);
        assert_eq!(marker.latitude, 1.0);
        assert_eq!(marker.title, before.title);
        assert_eq!(marker.longitude, before.longitude);
        assert!(MarkerPatch::default().is_empty());
    }
}
