// Tiled JSON maps with external JSON tilesets.
use crate::error::MapError;
use crate::map::{TileLayer, TileType, Tilemap, Tileset, GID_MASK};
use macroquad::math::ivec2;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    width: usize,
    #[serde(default)]
    height: usize,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>, // "tilelayer" expected here
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct JsonTilesetRef {
    firstgid: u32,
    source: String,
}

#[derive(Deserialize)]
struct JsonMap {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    layers: Vec<JsonLayer>,
    tilesets: Vec<JsonTilesetRef>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct ExternalTileset {
    tilecount: u32,
    columns: u32,
    image: String,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

#[derive(Deserialize)]
struct JsonProperty {
    name: String,
    value: JsonValue,
}

#[derive(Deserialize)]
struct JsonTile {
    id: u32,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    class: String,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

fn int_property(props: &[JsonProperty], name: &str) -> Option<i32> {
    props
        .iter()
        .find(|p| p.name == name)
        .and_then(|p| p.value.as_i64())
        .and_then(|v| i32::try_from(v).ok())
}

/// Tile type from, in order: `class`, legacy `type`, or a string property named `type`.
/// Names this game does not know collapse to `None`, as unknown binary codes do.
fn tile_type_of(tile: &JsonTile, tileset: &str) -> TileType {
    let name = if !tile.class.is_empty() {
        tile.class.as_str()
    } else if !tile.kind.is_empty() {
        tile.kind.as_str()
    } else {
        tile.properties
            .iter()
            .find(|p| p.name == "type")
            .and_then(|p| p.value.as_str())
            .unwrap_or("")
    };
    TileType::from_name(name).unwrap_or_else(|| {
        debug!(tileset, id = tile.id, name, "unknown tile type, treating as none");
        TileType::None
    })
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, MapError> {
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn decode_json_map_file(path: &Path) -> Result<Tilemap, MapError> {
    let j: JsonMap = read_json(path)?;
    let map_dir = path.parent().unwrap_or_else(|| Path::new("./"));

    let mut tilesets = Vec::with_capacity(j.tilesets.len());
    let mut max_gid = 0u32;
    for ts in &j.tilesets {
        if !ts.source.ends_with(".json") {
            return Err(MapError::InvalidMap(format!(
                "External tileset must be JSON: {}",
                ts.source
            )));
        }
        let ext: ExternalTileset = read_json(&map_dir.join(&ts.source))?;

        let mut tile_types = HashMap::new();
        for tile in &ext.tiles {
            let ty = tile_type_of(tile, &ts.source);
            if ty != TileType::None {
                tile_types.insert(tile.id, ty);
            }
        }

        let end = ts.firstgid.checked_add(ext.tilecount).ok_or_else(|| {
            MapError::InvalidMap(format!(
                "tileset {} gid range overflows: firstgid {} + tilecount {}",
                ts.source, ts.firstgid, ext.tilecount
            ))
        })?;
        max_gid = max_gid.max(end.saturating_sub(1));
        tilesets.push(Tileset {
            first_gid: ts.firstgid,
            image: ext.image,
            tile_types,
            columns: Some(ext.columns),
        });
    }

    let mut layers = Vec::with_capacity(j.layers.len());
    for l in j.layers {
        if l.kind.as_deref().unwrap_or("tilelayer") != "tilelayer" {
            debug!(layer = %l.name, kind = ?l.kind, "skipping non-tile layer");
            continue;
        }
        let expected = l.width.checked_mul(l.height).ok_or_else(|| {
            MapError::InvalidMap(format!(
                "layer '{}' is too large: {}x{}",
                l.name, l.width, l.height
            ))
        })?;
        if l.data.len() != expected {
            return Err(MapError::InvalidLayerSize {
                layer: l.name,
                expected,
                actual: l.data.len(),
            });
        }
        for &raw_gid in &l.data {
            let gid = raw_gid & GID_MASK;
            if gid != 0 && gid > max_gid {
                return Err(MapError::InvalidTileGid {
                    layer: l.name.clone(),
                    gid,
                    max_gid,
                });
            }
        }
        layers.push(TileLayer {
            name: l.name,
            width: l.width,
            height: l.height,
            visible: l.visible,
            data: l.data,
        });
    }

    let spawn = ivec2(
        int_property(&j.properties, "spawn_x").unwrap_or(0),
        int_property(&j.properties, "spawn_y").unwrap_or(0),
    );
    let map = Tilemap::new(j.width, j.height, j.tilewidth, j.tileheight, tilesets, layers)
        .with_spawn(spawn)
        .with_map_id(int_property(&j.properties, "map_id").unwrap_or(0));

    info!(
        path = %path.display(),
        tilesets = map.tilesets().len(),
        layers = map.layer_count(),
        "decoded Tiled JSON map"
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TILESET_JSON: &str = r#"{
      "tilewidth":16,
      "tileheight":16,
      "tilecount":4,
      "columns":2,
      "image":"tiles.png",
      "tiles":[
        {"id":0, "class":"ground"},
        {"id":1, "type":"wall"},
        {"id":2, "properties":[{"name":"type","type":"string","value":"table"}]},
        {"id":3, "properties":[{"name":"damage","type":"int","value":10}]}
      ]
    }"#;

    fn write_map(dir: &Path, map_json: &str) -> std::path::PathBuf {
        let map_path = dir.join("map.json");
        fs::write(&map_path, map_json).expect("failed to write map");
        fs::write(dir.join("tileset.json"), TILESET_JSON).expect("failed to write tileset");
        map_path
    }

    #[test]
    fn parses_layers_tile_types_and_spawn() {
        let dir = tempfile::tempdir().expect("temp dir");
        let map_path = write_map(
            dir.path(),
            r#"{
              "width": 2, "height": 2,
              "tilewidth": 16, "tileheight": 16,
              "properties": [
                {"name":"spawn_x","type":"int","value":1},
                {"name":"spawn_y","type":"int","value":0},
                {"name":"map_id","type":"int","value":4}
              ],
              "layers": [
                {"type":"tilelayer","name":"ground","width":2,"height":2,"data":[1,2,3,4]},
                {"type":"objectgroup","name":"spawns","objects":[]}
              ],
              "tilesets":[{"firstgid":1,"source":"tileset.json"}]
            }"#,
        );

        let map = decode_json_map_file(&map_path).expect("decode");
        assert_eq!(map.layer_count(), 1);
        assert_eq!(map.spawn, ivec2(1, 0));
        assert_eq!(map.map_id, 4);
        assert_eq!(map.tilesets()[0].columns, Some(2));
        assert_eq!(map.tile_type(0, 0, 0), TileType::Ground);
        assert_eq!(map.tile_type(0, 1, 0), TileType::Wall);
        assert_eq!(map.tile_type(0, 0, 1), TileType::Table);
        assert_eq!(map.tile_type(0, 1, 1), TileType::None);
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let dir = tempfile::tempdir().expect("temp dir");
        let map_path = dir.path().join("map.json");
        fs::write(&map_path, "{ not json").expect("failed to write map");

        let err = decode_json_map_file(&map_path).unwrap_err();
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn returns_typed_error_for_missing_tileset_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let map_path = dir.path().join("map.json");
        fs::write(
            &map_path,
            r#"{"width":1,"height":1,"tilewidth":16,"tileheight":16,"layers":[],
                "tilesets":[{"firstgid":1,"source":"missing_tileset.json"}]}"#,
        )
        .expect("failed to write map");

        let err = decode_json_map_file(&map_path).unwrap_err();
        assert!(matches!(err, MapError::Io { .. }));
    }

    #[test]
    fn returns_typed_error_for_invalid_gid_reference() {
        let dir = tempfile::tempdir().expect("temp dir");
        let map_path = write_map(
            dir.path(),
            r#"{"width":1,"height":1,"tilewidth":16,"tileheight":16,
                "layers":[{"type":"tilelayer","name":"ground","width":1,"height":1,"data":[99]}],
                "tilesets":[{"firstgid":1,"source":"tileset.json"}]}"#,
        );

        let err = decode_json_map_file(&map_path).unwrap_err();
        assert!(matches!(err, MapError::InvalidTileGid { gid: 99, max_gid: 4, .. }));
    }

    #[test]
    fn error_on_layer_size_mismatch() {
        let dir = tempfile::tempdir().expect("temp dir");
        let map_path = write_map(
            dir.path(),
            r#"{"width":2,"height":2,"tilewidth":16,"tileheight":16,
                "layers":[{"name":"oops","width":2,"height":2,"data":[1,2,3]}],
                "tilesets":[{"firstgid":1,"source":"tileset.json"}]}"#,
        );

        let err = decode_json_map_file(&map_path).unwrap_err();
        assert!(matches!(err, MapError::InvalidLayerSize { layer, .. } if layer == "oops"));
    }

    #[test]
    fn unknown_tile_class_resolves_to_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let map_path = dir.path().join("map.json");
        fs::write(
            &map_path,
            r#"{"width":2,"height":1,"tilewidth":16,"tileheight":16,
                "layers":[{"name":"ground","width":2,"height":1,"data":[1,2]}],
                "tilesets":[{"firstgid":1,"source":"lava.json"}]}"#,
        )
        .expect("failed to write map");
        fs::write(
            dir.path().join("lava.json"),
            r#"{"tilecount":2,"columns":2,"image":"lava.png",
                "tiles":[{"id":0,"class":"lava"},{"id":1,"class":"wall"}]}"#,
        )
        .expect("failed to write tileset");

        let map = decode_json_map_file(&map_path).expect("decode");
        assert_eq!(map.tile_type(0, 0, 0), TileType::None);
        assert_eq!(map.tile_type(0, 1, 0), TileType::Wall);
    }

    #[test]
    fn overflowing_gid_range_is_invalid() {
        let dir = tempfile::tempdir().expect("temp dir");
        let map_path = dir.path().join("map.json");
        fs::write(
            &map_path,
            r#"{"width":1,"height":1,"tilewidth":16,"tileheight":16,"layers":[],
                "tilesets":[{"firstgid":4294967295,"source":"tileset.json"}]}"#,
        )
        .expect("failed to write map");
        fs::write(dir.path().join("tileset.json"), TILESET_JSON).expect("failed to write tileset");

        let err = decode_json_map_file(&map_path).unwrap_err();
        assert!(matches!(err, MapError::InvalidMap(msg) if msg.contains("overflows")));
    }

    #[test]
    fn oversized_layer_dimensions_are_invalid() {
        let dir = tempfile::tempdir().expect("temp dir");
        let huge = usize::MAX / 2 + 1;
        let map_path = write_map(
            dir.path(),
            &format!(
                r#"{{"width":1,"height":1,"tilewidth":16,"tileheight":16,
                    "layers":[{{"name":"big","width":{huge},"height":2,"data":[]}}],
                    "tilesets":[{{"firstgid":1,"source":"tileset.json"}}]}}"#
            ),
        );

        let err = decode_json_map_file(&map_path).unwrap_err();
        assert!(matches!(err, MapError::InvalidMap(msg) if msg.contains("too large")));
    }
}
