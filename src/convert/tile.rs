//! Tile seed conversion.
//!
//! Each `Tile_*.tres` seed describes one board tile: a grid of road
//! segments plus optional pre-printed structures and drink sources. The
//! converted record carries a canonical lowercase id and a CJK display
//! name derived from the tile letter.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::{MigrateError, Result};
use crate::extract::assignment_expr;
use crate::normalize::to_json_text;

/// Every converted tile may be placed in any of the four rotations.
const ALLOWED_ROTATIONS: [u16; 4] = [0, 90, 180, 270];

static RE_TILE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*id\s*=\s*"([^"]+)"\s*$"#).expect("tile id pattern compiles")
});

#[derive(Debug, Clone, Serialize)]
pub struct TileRecord {
    pub id: String,
    pub display_name: String,
    pub road_segments: Vec<Vec<Value>>,
    pub printed_structures: Vec<PrintedStructure>,
    pub drink_sources: Vec<DrinkSource>,
    pub blocked_cells: Vec<[i64; 2]>,
    pub allowed_rotations: [u16; 4],
}

/// Structure pre-printed on the tile. Only the fields the game reads are
/// carried over; anything else in the seed entry is dropped.
#[derive(Debug, Clone, Serialize)]
pub struct PrintedStructure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piece_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<Value>,
}

impl PrintedStructure {
    fn from_entry(entry: &serde_json::Map<String, Value>) -> Option<Self> {
        let keep = |key: &str| entry.get(key).cloned();
        let out = Self {
            piece_id: keep("piece_id"),
            anchor: keep("anchor"),
            rotation: keep("rotation"),
            house_id: keep("house_id"),
            house_number: keep("house_number"),
        };
        if [
            &out.piece_id,
            &out.anchor,
            &out.rotation,
            &out.house_id,
            &out.house_number,
        ]
        .iter()
        .all(|field| field.is_none())
        {
            return None;
        }
        Some(out)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DrinkSource {
    pub pos: Value,
    #[serde(rename = "type")]
    pub kind: Value,
}

/// Converts one tile seed. The tile letter comes from the part of the raw
/// id after `tile_`; ids that never carried the prefix are used verbatim.
pub fn convert_tile(text: &str) -> Result<TileRecord> {
    let raw_id = RE_TILE_ID
        .captures(text)
        .and_then(|caps| caps.get(1))
        .ok_or(MigrateError::MissingKey("id"))?
        .as_str();

    let letter = if raw_id.to_lowercase().starts_with("tile_") {
        raw_id.split_once('_').map(|(_, rest)| rest).unwrap_or(raw_id)
    } else {
        raw_id
    };
    let id = format!("tile_{}", letter.to_lowercase());
    let display_name = format!("板块 {letter}");

    let road_expr = assignment_expr(text, "road_segments")?
        .ok_or(MigrateError::MissingKey("road_segments"))?;
    let mut road_segments: Vec<Vec<Value>> = serde_json::from_str(&to_json_text(road_expr))
        .map_err(|source| MigrateError::Parse {
            key: "road_segments",
            source,
        })?;
    for (y, row) in road_segments.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            let segments = cell
                .as_array_mut()
                .ok_or(MigrateError::MalformedCell { x, y })?;
            for segment in segments {
                if let Value::Object(fields) = segment {
                    // Older tile seeds predate the bridge flag.
                    fields.entry("bridge").or_insert(Value::Bool(false));
                }
            }
        }
    }

    let printed_structures = match assignment_expr(text, "printed_structures")? {
        Some(expr) => {
            let entries: Vec<Value> = serde_json::from_str(&to_json_text(expr))
                .map_err(|source| MigrateError::Parse {
                    key: "printed_structures",
                    source,
                })?;
            entries
                .iter()
                .filter_map(Value::as_object)
                .filter_map(PrintedStructure::from_entry)
                .collect()
        }
        None => Vec::new(),
    };

    let drink_sources = match assignment_expr(text, "drink_sources")? {
        Some(expr) => {
            let entries: Vec<Value> = serde_json::from_str(&to_json_text(expr))
                .map_err(|source| MigrateError::Parse {
                    key: "drink_sources",
                    source,
                })?;
            entries
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|entry| match (entry.get("pos"), entry.get("type")) {
                    (Some(pos), Some(kind)) => Some(DrinkSource {
                        pos: pos.clone(),
                        kind: kind.clone(),
                    }),
                    _ => None,
                })
                .collect()
        }
        None => Vec::new(),
    };

    Ok(TileRecord {
        id,
        display_name,
        road_segments,
        printed_structures,
        drink_sources,
        blocked_cells: Vec::new(),
        allowed_rotations: ALLOWED_ROTATIONS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TILE_B: &str = r#"[gd_resource type="Resource" script_class="TileSeed" load_steps=2 format=3]

[ext_resource type="Script" path="res://data/seeds/tile_seed.gd" id="1_tile"]

[resource]
script = ExtResource("1_tile")
id = "Tile_B"
road_segments = [
    [
        [{ "from": Vector2i(-1, 0), "to": Vector2i(1, 0), }],
        [],
    ],
]
printed_structures = [
    { "piece_id": "house_3", "anchor": Vector2i(0, 0), "rotation": 90, "editor_hint": true },
    { "editor_hint": true },
]
drink_sources = [
    { "pos": Vector2i(1, 0), "type": "soda" },
    { "pos": Vector2i(0, 0) },
]
"#;

    #[test]
    fn derives_id_and_display_name_from_the_tile_letter() {
        let tile = convert_tile(TILE_B).expect("tile converts");
        assert_eq!(tile.id, "tile_b");
        assert_eq!(tile.display_name, "板块 B");
    }

    #[test]
    fn unprefixed_raw_id_is_used_as_the_letter() {
        let seed = TILE_B.replace(r#"id = "Tile_B""#, r#"id = "Q2""#);
        let tile = convert_tile(&seed).expect("tile converts");
        assert_eq!(tile.id, "tile_q2");
        assert_eq!(tile.display_name, "板块 Q2");
    }

    #[test]
    fn backfills_the_bridge_flag_on_segments() {
        let tile = convert_tile(TILE_B).unwrap();
        let cell = tile.road_segments[0][0].as_array().expect("cell is a list");
        assert_eq!(cell[0]["bridge"], json!(false));
        assert_eq!(cell[0]["from"], json!([-1, 0]));
        assert_eq!(cell[0]["to"], json!([1, 0]));
    }

    #[test]
    fn existing_bridge_flag_is_left_alone() {
        let seed = TILE_B.replace(
            r#""to": Vector2i(1, 0),"#,
            r#""to": Vector2i(1, 0), "bridge": true,"#,
        );
        let tile = convert_tile(&seed).unwrap();
        let cell = tile.road_segments[0][0].as_array().unwrap();
        assert_eq!(cell[0]["bridge"], json!(true));
    }

    #[test]
    fn printed_structures_keep_only_the_known_fields() {
        let tile = convert_tile(TILE_B).unwrap();
        assert_eq!(tile.printed_structures.len(), 1);
        let entry = &tile.printed_structures[0];
        assert_eq!(entry.piece_id, Some(json!("house_3")));
        assert_eq!(entry.anchor, Some(json!([0, 0])));
        assert_eq!(entry.rotation, Some(json!(90)));
        assert!(entry.house_id.is_none());
        assert!(entry.house_number.is_none());
    }

    #[test]
    fn drink_sources_need_both_pos_and_type() {
        let tile = convert_tile(TILE_B).unwrap();
        assert_eq!(tile.drink_sources.len(), 1);
        assert_eq!(tile.drink_sources[0].pos, json!([1, 0]));
        assert_eq!(tile.drink_sources[0].kind, json!("soda"));
    }

    #[test]
    fn optional_sections_default_to_empty() {
        let seed = r#"
id = "Tile_A"
road_segments = [
    [
        [],
    ],
]
"#;
        let tile = convert_tile(seed).unwrap();
        assert!(tile.printed_structures.is_empty());
        assert!(tile.drink_sources.is_empty());
        assert!(tile.blocked_cells.is_empty());
        assert_eq!(tile.allowed_rotations, [0, 90, 180, 270]);
    }

    #[test]
    fn missing_id_is_an_error() {
        let err = convert_tile("road_segments = [[]]\n").unwrap_err();
        assert!(matches!(err, MigrateError::MissingKey("id")));
    }

    #[test]
    fn missing_road_segments_is_an_error() {
        let err = convert_tile("id = \"Tile_A\"\n").unwrap_err();
        assert!(matches!(err, MigrateError::MissingKey("road_segments")));
    }

    #[test]
    fn non_list_grid_cell_is_rejected_with_its_position() {
        let seed = r#"
id = "Tile_A"
road_segments = [
    [
        [],
        { "from": Vector2i(0, 0) },
    ],
]
"#;
        let err = convert_tile(seed).unwrap_err();
        assert!(matches!(err, MigrateError::MalformedCell { x: 1, y: 0 }));
    }

    #[test]
    fn record_serializes_with_id_first() {
        let tile = convert_tile(TILE_B).unwrap();
        let text = serde_json::to_string(&tile).expect("tile serializes");
        assert!(text.starts_with(r#"{"id":"tile_b""#));
    }
}
