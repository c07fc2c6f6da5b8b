//! Payload parsing and sanitization.
//!
//! This module turns raw JSON text into a typed [`Container`] plus item list,
//! rejecting malformed input with an error that names the offending field by
//! its dotted path (e.g. `items[2].weight`). Parsing is a pure transformation:
//! no I/O, no partial output — a payload either validates completely or the
//! previous scene state stays untouched.
//!
//! All dimensions are centimeters, weights are kilograms. Positions use a
//! centered coordinate frame: `Container::position` is the geometric center
//! of the box and item positions live in the same frame.

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use serde_json::Value;

/// The box that items are packed into.
///
/// Immutable once constructed for a given load; a new payload replaces it
/// wholesale.
#[derive(Debug, Clone, Serialize)]
pub struct Container {
    /// Optional display name (absent when blank in the payload).
    pub name: Option<String>,
    /// Inner width in cm (x axis).
    pub width: f64,
    /// Inner height in cm (y axis).
    pub height: f64,
    /// Inner depth in cm (z axis).
    pub depth: f64,
    /// Maximum supported weight in kg.
    pub max_weight: f64,
    /// Geometric center of the box.
    pub position: Point3<f64>,
}

impl Container {
    /// Returns the inner volume in cm³.
    pub fn volume(&self) -> f64 {
        self.width * self.height * self.depth
    }

    /// Returns the half-extents along (x, y, z).
    pub fn half_extents(&self) -> Vector3<f64> {
        Vector3::new(self.width / 2.0, self.height / 2.0, self.depth / 2.0)
    }

    /// Returns the y coordinate of the box floor (inner bottom face).
    pub fn floor_y(&self) -> f64 {
        self.position.y - self.height / 2.0
    }
}

/// A single packed item.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    /// Unique identifier (defaults to `item-{index+1}` when absent or blank).
    pub id: String,
    /// Display name (defaults to the id).
    pub name: String,
    /// Width in cm (x axis).
    pub width: f64,
    /// Height in cm (y axis).
    pub height: f64,
    /// Depth in cm (z axis).
    pub depth: f64,
    /// Weight in kg.
    pub weight: f64,
    /// Center position, box-relative.
    pub position: Point3<f64>,
}

impl Item {
    /// Returns the item volume in cm³.
    pub fn volume(&self) -> f64 {
        self.width * self.height * self.depth
    }

    /// Returns the half-extents along (x, y, z).
    pub fn half_extents(&self) -> Vector3<f64> {
        Vector3::new(self.width / 2.0, self.height / 2.0, self.depth / 2.0)
    }
}

/// A fully validated payload: one container and at least one item.
#[derive(Debug, Clone, Serialize)]
pub struct Payload {
    /// The box described by the payload's `box` field.
    pub container: Container,
    /// The packed items, in input order.
    pub items: Vec<Item>,
}

/// Parses raw JSON text into a validated payload.
///
/// Deterministic: the same text always produces a structurally identical
/// payload. Values are never silently coerced — a numeric string such as
/// `"5"` is rejected, not converted.
pub fn parse(raw: &str) -> Result<Payload> {
    if raw.trim().is_empty() {
        return Err(Error::EmptyPayload);
    }

    let value: Value =
        serde_json::from_str(raw).map_err(|err| Error::MalformedJson(err.to_string()))?;

    let box_value = value
        .get("box")
        .ok_or_else(|| Error::MissingField("box".to_string()))?;
    let container = sanitize_container(box_value)?;

    let item_values = match value.get("items").and_then(Value::as_array) {
        Some(arr) if !arr.is_empty() => arr,
        _ => return Err(Error::NoItems),
    };

    let items = item_values
        .iter()
        .enumerate()
        .map(|(index, item)| sanitize_item(item, index))
        .collect::<Result<Vec<_>>>()?;

    Ok(Payload { container, items })
}

fn sanitize_container(value: &Value) -> Result<Container> {
    let width = ensure_positive(value.get("width"), "box.width")?;
    let height = ensure_positive(value.get("height"), "box.height")?;
    let depth = ensure_positive(value.get("depth"), "box.depth")?;
    let max_weight = ensure_positive(value.get("maxWeight"), "box.maxWeight")?;

    // Only a fully absent box.position defaults to the origin. A present
    // position object must carry three finite axes.
    let position = match value.get("position") {
        Some(position) => sanitize_vector(position, "box.position")?,
        None => Point3::origin(),
    };

    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    Ok(Container {
        name,
        width,
        height,
        depth,
        max_weight,
        position,
    })
}

fn sanitize_item(value: &Value, index: usize) -> Result<Item> {
    if !value.is_object() {
        return Err(Error::InvalidItem(index + 1));
    }

    // Position absence is diagnosed before the item's numeric fields, citing
    // the friendliest label available.
    let position_value = value.get("position").ok_or_else(|| {
        let label = value
            .get("name")
            .and_then(Value::as_str)
            .or_else(|| value.get("id").and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| (index + 1).to_string());
        Error::MissingPosition(label)
    })?;

    let width = ensure_positive(value.get("width"), &format!("items[{index}].width"))?;
    let height = ensure_positive(value.get("height"), &format!("items[{index}].height"))?;
    let depth = ensure_positive(value.get("depth"), &format!("items[{index}].depth"))?;
    let weight = ensure_positive(value.get("weight"), &format!("items[{index}].weight"))?;
    let position = sanitize_vector(position_value, &format!("items[{index}].position"))?;

    let id = value
        .get("id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("item-{}", index + 1));

    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| id.clone());

    Ok(Item {
        id,
        name,
        width,
        height,
        depth,
        weight,
        position,
    })
}

fn ensure_positive(value: Option<&Value>, path: &str) -> Result<f64> {
    match value.and_then(Value::as_f64) {
        Some(num) if num.is_finite() && num > 0.0 => Ok(num),
        _ => Err(Error::NotPositive(path.to_string())),
    }
}

fn sanitize_vector(value: &Value, path: &str) -> Result<Point3<f64>> {
    if !value.is_object() {
        return Err(Error::InvalidVector(path.to_string()));
    }

    let mut coords = [0.0_f64; 3];
    for (slot, axis) in coords.iter_mut().zip(["x", "y", "z"]) {
        match value.get(axis).and_then(Value::as_f64) {
            Some(num) if num.is_finite() => *slot = num,
            _ => return Err(Error::NotFinite(format!("{path}.{axis}"))),
        }
    }

    Ok(Point3::new(coords[0], coords[1], coords[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_payload() -> String {
        r#"{
            "box": { "width": 100, "height": 100, "depth": 100, "maxWeight": 50,
                     "position": {"x": 0, "y": 0, "z": 0} },
            "items": [
                { "id": "a", "width": 50, "height": 50, "depth": 50, "weight": 10,
                  "position": {"x": 0, "y": 0, "z": 0} }
            ]
        }"#
        .to_string()
    }

    #[test]
    fn test_parse_minimal_payload() {
        let payload = parse(&minimal_payload()).unwrap();
        assert_eq!(payload.container.width, 100.0);
        assert_eq!(payload.container.max_weight, 50.0);
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].id, "a");
        assert_eq!(payload.items[0].name, "a");
    }

    #[test]
    fn test_parse_is_deterministic() {
        let raw = minimal_payload();
        let a = parse(&raw).unwrap();
        let b = parse(&raw).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_empty_payload_rejected() {
        assert!(matches!(parse(""), Err(Error::EmptyPayload)));
        assert!(matches!(parse("   \n\t "), Err(Error::EmptyPayload)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(parse("{ not json"), Err(Error::MalformedJson(_))));
    }

    #[test]
    fn test_missing_box_rejected() {
        let err = parse(r#"{ "items": [] }"#).unwrap_err();
        assert!(matches!(err, Error::MissingField(field) if field == "box"));
    }

    #[test]
    fn test_missing_items_rejected() {
        let raw = r#"{ "box": { "width": 10, "height": 10, "depth": 10, "maxWeight": 5 } }"#;
        assert!(matches!(parse(raw), Err(Error::NoItems)));

        let raw = r#"{ "box": { "width": 10, "height": 10, "depth": 10, "maxWeight": 5 },
                       "items": [] }"#;
        assert!(matches!(parse(raw), Err(Error::NoItems)));
    }

    #[test]
    fn test_nonpositive_dimension_cites_path() {
        let raw = r#"{
            "box": { "width": 100, "height": 100, "depth": 100, "maxWeight": 50 },
            "items": [
                { "width": 10, "height": 10, "depth": 10, "weight": 1,
                  "position": {"x": 0, "y": 0, "z": 0} },
                { "width": 10, "height": 10, "depth": 10, "weight": 1,
                  "position": {"x": 0, "y": 0, "z": 0} },
                { "width": 10, "height": 10, "depth": 10, "weight": 0,
                  "position": {"x": 0, "y": 0, "z": 0} }
            ]
        }"#;
        let err = parse(raw).unwrap_err();
        assert!(matches!(err, Error::NotPositive(path) if path == "items[2].weight"));
    }

    #[test]
    fn test_negative_and_string_numbers_rejected() {
        let raw = r#"{ "box": { "width": -1, "height": 10, "depth": 10, "maxWeight": 5 },
                       "items": [] }"#;
        let err = parse(raw).unwrap_err();
        assert!(matches!(err, Error::NotPositive(path) if path == "box.width"));

        // Numeric strings are never coerced.
        let raw = r#"{ "box": { "width": "10", "height": 10, "depth": 10, "maxWeight": 5 },
                       "items": [] }"#;
        let err = parse(raw).unwrap_err();
        assert!(matches!(err, Error::NotPositive(path) if path == "box.width"));
    }

    #[test]
    fn test_box_position_defaults_to_origin() {
        let raw = r#"{
            "box": { "width": 100, "height": 100, "depth": 100, "maxWeight": 50 },
            "items": [
                { "width": 10, "height": 10, "depth": 10, "weight": 1,
                  "position": {"x": 0, "y": 0, "z": 0} }
            ]
        }"#;
        let payload = parse(raw).unwrap();
        assert_eq!(payload.container.position, Point3::origin());
    }

    #[test]
    fn test_partial_box_position_rejected() {
        // A present position object must carry all three axes.
        let raw = r#"{
            "box": { "width": 100, "height": 100, "depth": 100, "maxWeight": 50,
                     "position": {"x": 0, "y": 0} },
            "items": [
                { "width": 10, "height": 10, "depth": 10, "weight": 1,
                  "position": {"x": 0, "y": 0, "z": 0} }
            ]
        }"#;
        let err = parse(raw).unwrap_err();
        assert!(matches!(err, Error::NotFinite(path) if path == "box.position.z"));
    }

    #[test]
    fn test_item_missing_position_cites_name() {
        let raw = r#"{
            "box": { "width": 100, "height": 100, "depth": 100, "maxWeight": 50 },
            "items": [
                { "name": "Crate A", "width": 10, "height": 10, "depth": 10, "weight": 1 }
            ]
        }"#;
        let err = parse(raw).unwrap_err();
        assert!(matches!(err, Error::MissingPosition(label) if label == "Crate A"));
    }

    #[test]
    fn test_item_ids_defaulted_in_order() {
        let raw = r#"{
            "box": { "width": 100, "height": 100, "depth": 100, "maxWeight": 50 },
            "items": [
                { "width": 10, "height": 10, "depth": 10, "weight": 1,
                  "position": {"x": 0, "y": 0, "z": 0} },
                { "id": "   ", "width": 10, "height": 10, "depth": 10, "weight": 1,
                  "position": {"x": 20, "y": 0, "z": 0} }
            ]
        }"#;
        let payload = parse(raw).unwrap();
        assert_eq!(payload.items[0].id, "item-1");
        assert_eq!(payload.items[1].id, "item-2");
        assert_eq!(payload.items[1].name, "item-2");
    }

    #[test]
    fn test_blank_box_name_dropped() {
        let raw = r#"{
            "box": { "name": "  ", "width": 100, "height": 100, "depth": 100, "maxWeight": 50 },
            "items": [
                { "width": 10, "height": 10, "depth": 10, "weight": 1,
                  "position": {"x": 0, "y": 0, "z": 0} }
            ]
        }"#;
        let payload = parse(raw).unwrap();
        assert!(payload.container.name.is_none());
    }

    #[test]
    fn test_container_helpers() {
        let payload = parse(&minimal_payload()).unwrap();
        let container = &payload.container;
        assert_eq!(container.volume(), 1_000_000.0);
        assert_eq!(container.half_extents(), Vector3::new(50.0, 50.0, 50.0));
        assert_eq!(container.floor_y(), -50.0);
    }
}
