#![allow(dead_code)]

use base64::Engine;

/// Skeleton-only glTF: one `Hips` node and a single translation clip named
/// `clip_name` that lifts the hips by one unit over `duration` seconds.
pub fn clip_gltf(clip_name: &str, duration: f32) -> Vec<u8> {
    let mut bin: Vec<u8> = Vec::new();
    for x in [0.0f32, duration, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
        bin.extend_from_slice(&x.to_le_bytes());
    }
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&bin)
    );
    format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "name": "Hips" }}],
  "buffers": [{{ "byteLength": 32, "uri": "{uri}" }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 8 }},
    {{ "buffer": 0, "byteOffset": 8, "byteLength": 24 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [{duration}] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" }}
  ],
  "animations": [{{
    "name": "{clip_name}",
    "samplers": [{{ "input": 0, "output": 1, "interpolation": "LINEAR" }}],
    "channels": [{{ "sampler": 0, "target": {{ "node": 0, "path": "translation" }} }}]
  }}]
}}"#
    )
    .into_bytes()
}
