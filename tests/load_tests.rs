// tests/load_tests.rs

use std::fs;
use std::path::Path;
use tilestep::{load_map, MapError, TileId, TileType};

fn int(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// 3 x 2 map, one tileset (ground, wall), ground layer plus a wall layer.
fn binary_map() -> Vec<u8> {
    let mut b = Vec::new();
    for v in [3, 2, 16, 16, 1, 2, 12, 1, 1] {
        int(&mut b, v);
    }
    let path = "atlas.bin";
    for v in [1, 2, path.len() as i32] {
        int(&mut b, v);
    }
    b.extend_from_slice(path.as_bytes());
    for v in [0, 1, 1, 2] {
        int(&mut b, v);
    }
    for data in [[1u32; 6], [0, 0, 2, 0, 0, 2]] {
        int(&mut b, 3);
        int(&mut b, 2);
        for gid in data {
            b.extend_from_slice(&gid.to_le_bytes());
        }
    }
    b
}

#[test]
fn loads_binary_map_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("level.bin");
    fs::write(&path, binary_map()).unwrap();

    let map = load_map(&path).expect("binary map should load");
    assert_eq!((map.width, map.height), (3, 2));
    assert_eq!(map.map_id, 12);
    assert_eq!(map.layers()[1].name, "layer1");
    assert_eq!(map.layers()[1].get(2, 0), Some(TileId(2)));
    assert_eq!(map.tile_type(0, 0, 0), TileType::Ground);
    assert_eq!(map.tile_type(1, 2, 1), TileType::Wall);
    assert_eq!(map.tile_type(1, 9, 9), TileType::None);
}

#[test]
fn trailing_bytes_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("padded.bin");
    let mut bytes = binary_map();
    bytes.extend_from_slice(&[0xde, 0xad]);
    fs::write(&path, bytes).unwrap();

    assert!(load_map(&path).is_ok());
}

#[test]
fn truncated_binary_map_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.bin");
    let bytes = binary_map();
    fs::write(&path, &bytes[..bytes.len() - 5]).unwrap();

    let err = load_map(&path).unwrap_err();
    assert!(matches!(err, MapError::Truncated { .. }), "got {err:?}");
}

#[test]
fn loads_json_map_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("ts.json"),
        r#"{"tilecount":2,"columns":2,"image":"ts.png","tiles":[{"id":1,"class":"border"}]}"#,
    )
    .unwrap();
    let path = dir.path().join("level.json");
    fs::write(
        &path,
        r#"{"width":2,"height":1,"tilewidth":8,"tileheight":8,
            "layers":[{"type":"tilelayer","name":"edge","width":2,"height":1,"data":[2,0]}],
            "tilesets":[{"firstgid":1,"source":"ts.json"}]}"#,
    )
    .unwrap();

    let map = load_map(&path).expect("json map should load");
    assert_eq!(map.layers()[0].name, "edge");
    assert_eq!(map.tile_type(0, 0, 0), TileType::Border);
}

#[test]
fn unsupported_format() {
    let err = load_map("foo.tmx").unwrap_err();
    match err {
        MapError::UnsupportedFormat(path) => assert_eq!(path, Path::new("foo.tmx")),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn missing_file_is_io_error() {
    let err = load_map("does/not/exist.bin").unwrap_err();
    assert!(matches!(err, MapError::Io { .. }));
}
