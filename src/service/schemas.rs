//! Per-route validation schemas for the marker endpoints.

use crate::model::{ID_MIXED, ID_SHAPE, MAX_PER_PAGE, TITLE_MAX_LENGTH};
use crate::service::{FieldRule, RouteSchema};

/// Path parameter name used by every `/markers/:markerId` route.
pub const MARKER_ID_PARAM: &str = "markerId";

fn marker_id() -> FieldRule {
    FieldRule::string(MARKER_ID_PARAM)
        .required()
        .pattern(&ID_SHAPE)
        .pattern(&ID_MIXED)
}

/// GET /markers
pub fn list_markers() -> RouteSchema {
    RouteSchema::new()
        .query(FieldRule::number("page").integer().min(1.0))
        .query(
            FieldRule::number("perPage")
                .integer()
                .min(1.0)
                .max(MAX_PER_PAGE as f64),
        )
}

/// POST /markers
pub fn create_marker() -> RouteSchema {
    RouteSchema::new()
        .body(FieldRule::string("title").max_length(TITLE_MAX_LENGTH).required())
        .body(FieldRule::string("description").allow_empty())
        .body(FieldRule::number("longitude").required())
        .body(FieldRule::number("latitude").required())
}

/// PATCH /markers/:markerId
pub fn update_marker() -> RouteSchema {
    RouteSchema::new()
        .params(marker_id())
        .body(FieldRule::string("title").max_length(TITLE_MAX_LENGTH))
        .body(FieldRule::string("description").allow_empty())
        .body(FieldRule::number("longitude"))
        .body(FieldRule::number("latitude"))
}

/// GET and DELETE /markers/:markerId
pub fn get_or_delete_marker() -> RouteSchema {
    RouteSchema::new().params(marker_id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListParams, MarkerPatch, NewMarker};
    use crate::service::{Location, RequestInput};
    use serde_json::{json, Map, Value};

    fn object(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn list_defaults_apply_when_query_is_empty() {
        let validated = list_markers().validate(&RequestInput::new()).unwrap();
        let params: ListParams = validated.query_as().unwrap();
        assert_eq!(params, ListParams::default());
    }

    #[test]
    fn create_requires_title_and_coordinates() {
        let input = RequestInput::new().body(object(json!({"description": "x"})));
        let errors = create_marker().validate(&input).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "longitude", "latitude"]);
        assert!(errors.iter().all(|e| e.location == Location::Body));
        assert_eq!(
            errors.field("longitude").unwrap().messages,
            vec!["\"longitude\" is required"]
        );
    }

    #[test]
    fn create_decodes_into_new_marker() {
        let input = RequestInput::new().body(object(json!({
            "title": "Simple Marker Two",
            "latitude": 37.54302,
            "longitude": "-122.123092",
            "color": "red"
        })));
        let marker: NewMarker = create_marker().validate(&input).unwrap().body_as().unwrap();
        assert_eq!(marker.title, "Simple Marker Two");
        assert_eq!(marker.description, None);
        assert_eq!(marker.longitude, -122.123092);
    }

    #[test]
    fn title_over_limit_is_rejected() {
        let input = RequestInput::new().body(object(json!({
            "title": "x".repeat(129),
            "latitude": 1,
            "longitude": 2
        })));
        let errors = create_marker().validate(&input).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.field("title").unwrap().location, Location::Body);
    }

    #[test]
    fn update_accepts_empty_body() {
        let input = RequestInput::new().param(MARKER_ID_PARAM, "507f191e810c19729de860ea");
        let validated = update_marker().validate(&input).unwrap();
        assert_eq!(validated.param(MARKER_ID_PARAM), Some("507f191e810c19729de860ea"));
        let patch: MarkerPatch = validated.body_as().unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn malformed_ids_fail_in_params() {
        for raw in ["123", "zzzzzzzzzzzzzzzzzzzzzzzz", "111111111111111111111111"] {
            let input = RequestInput::new().param(MARKER_ID_PARAM, raw);
            let errors = get_or_delete_marker().validate(&input).unwrap_err();
            let e = errors.field(MARKER_ID_PARAM).unwrap();
            assert_eq!(e.location, Location::Params);
            assert!(e.messages[0].contains("fails to match the required pattern"));
        }
    }
}
