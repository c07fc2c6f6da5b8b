//! Generated sample payloads.
//!
//! Twelve standard carton sizes (outer dimensions in mm) with three
//! proportionally sized demo items each. Useful as ready-made input for the
//! CLI and as fixtures: every generated payload must pass
//! [`crate::payload::parse`].

use serde_json::{json, Value};

/// A standard carton size, outer dimensions in millimeters.
#[derive(Debug, Clone, Copy)]
pub struct SampleConfig {
    /// Carton number (1-based).
    pub id: u32,
    /// Length in mm (becomes payload width in cm).
    pub length: f64,
    /// Width in mm (becomes payload depth in cm).
    pub width: f64,
    /// Height in mm.
    pub height: f64,
}

/// The standard carton lineup, largest first.
pub const SAMPLE_CONFIGS: [SampleConfig; 12] = [
    SampleConfig { id: 1, length: 800.0, width: 600.0, height: 600.0 },
    SampleConfig { id: 2, length: 700.0, width: 500.0, height: 500.0 },
    SampleConfig { id: 3, length: 600.0, width: 400.0, height: 400.0 },
    SampleConfig { id: 4, length: 500.0, width: 400.0, height: 400.0 },
    SampleConfig { id: 5, length: 400.0, width: 300.0, height: 300.0 },
    SampleConfig { id: 6, length: 350.0, width: 250.0, height: 250.0 },
    SampleConfig { id: 7, length: 300.0, width: 200.0, height: 200.0 },
    SampleConfig { id: 8, length: 250.0, width: 200.0, height: 150.0 },
    SampleConfig { id: 9, length: 200.0, width: 150.0, height: 150.0 },
    SampleConfig { id: 10, length: 150.0, width: 100.0, height: 100.0 },
    SampleConfig { id: 11, length: 100.0, width: 100.0, height: 80.0 },
    SampleConfig { id: 12, length: 80.0, width: 80.0, height: 50.0 },
];

impl SampleConfig {
    /// Returns a short label such as `Carton 5 (40×30×30 cm)`.
    pub fn label(&self) -> String {
        format!(
            "Carton {} ({:.0}×{:.0}×{:.0} cm)",
            self.id,
            self.length / 10.0,
            self.width / 10.0,
            self.height / 10.0
        )
    }
}

/// Builds a demo payload for one carton config.
pub fn sample_payload(config: &SampleConfig) -> Value {
    let width = round1(config.length / 10.0);
    let depth = round1(config.width / 10.0);
    let height = round1(config.height / 10.0);
    let max_weight = round1(width.max(depth) * height * 0.4);

    json!({
        "box": {
            "name": format!("Carton {}", config.id),
            "width": width,
            "height": height,
            "depth": depth,
            "maxWeight": max_weight,
            "position": { "x": 0, "y": 0, "z": 0 }
        },
        "items": sample_items(width, depth, height, config.id)
    })
}

fn sample_items(width: f64, depth: f64, height: f64, carton_id: u32) -> Vec<Value> {
    struct Template {
        ratio: f64,
        pos: (f64, f64, f64),
    }

    let templates = [
        Template { ratio: 0.45, pos: (-width / 4.0, -height / 4.0, -depth / 4.0) },
        Template { ratio: 0.35, pos: (width / 5.0, -height / 6.0, depth / 5.0) },
        Template { ratio: 0.25, pos: (0.0, height / 6.0, 0.0) },
    ];

    templates
        .iter()
        .enumerate()
        .map(|(index, template)| {
            let w = clamp_dimension(width * template.ratio);
            let h = clamp_dimension(height * template.ratio);
            let d = clamp_dimension(depth * template.ratio);
            let letter = (b'A' + index as u8) as char;
            json!({
                "id": format!("item-{}-{}", carton_id, index + 1),
                "name": format!("Package {letter}"),
                "width": w,
                "height": h,
                "depth": d,
                "weight": round1((w * h * d / 5000.0).max(1.0)),
                "position": {
                    "x": round1(template.pos.0),
                    "y": round1(template.pos.1),
                    "z": round1(template.pos.2)
                }
            })
        })
        .collect()
}

// Demo dimensions never drop below 4 cm so the smallest cartons still show
// visible items.
fn clamp_dimension(value: f64) -> f64 {
    round1(value.max(4.0))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload;

    #[test]
    fn test_every_sample_parses() {
        for config in &SAMPLE_CONFIGS {
            let value = sample_payload(config);
            let raw = serde_json::to_string(&value).unwrap();
            let parsed = payload::parse(&raw)
                .unwrap_or_else(|err| panic!("carton {} failed: {err}", config.id));
            assert_eq!(parsed.items.len(), 3);
        }
    }

    #[test]
    fn test_sample_dimensions_in_cm() {
        let value = sample_payload(&SAMPLE_CONFIGS[0]);
        assert_eq!(value["box"]["width"], json!(80.0));
        assert_eq!(value["box"]["depth"], json!(60.0));
        assert_eq!(value["box"]["height"], json!(60.0));
    }

    #[test]
    fn test_smallest_carton_items_clamped() {
        // Carton 12 is 8×8×5 cm; raw item dims would fall below 4 cm.
        let value = sample_payload(&SAMPLE_CONFIGS[11]);
        for item in value["items"].as_array().unwrap() {
            assert!(item["width"].as_f64().unwrap() >= 4.0);
            assert!(item["height"].as_f64().unwrap() >= 4.0);
            assert!(item["depth"].as_f64().unwrap() >= 4.0);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(SAMPLE_CONFIGS[0].label(), "Carton 1 (80×60×60 cm)");
    }
}
