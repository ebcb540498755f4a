#![allow(dead_code)]

use base64::Engine;

/// One upward-facing triangle on node `node_name`, with a dark material and a
/// two-key translation clip named `Bob`. Padded past `min_len` bytes.
pub fn triangle_gltf(node_name: &str, min_len: usize) -> Vec<u8> {
    let mut bin: Vec<u8> = Vec::new();
    let f32s = |v: &[f32], out: &mut Vec<u8>| {
        for x in v {
            out.extend_from_slice(&x.to_le_bytes());
        }
    };
    f32s(&[0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0], &mut bin); // 0..36
    f32s(&[0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0], &mut bin); // 36..72
    for i in [0u16, 1, 2, 0] {
        bin.extend_from_slice(&i.to_le_bytes()); // 72..80 (last is padding)
    }
    f32s(&[0.0, 1.0], &mut bin); // 80..88
    f32s(&[0.0, 0.0, 0.0, 0.0, 2.0, 0.0], &mut bin); // 88..112
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&bin)
    );
    let json = format!(
        r#"{{
  "asset": {{ "version": "2.0", "generator": "{pad}" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "name": "{node_name}", "mesh": 0, "translation": [0.0, 0.0, 0.0] }}],
  "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0, "NORMAL": 1 }}, "indices": 2, "material": 0 }}] }}],
  "materials": [{{ "name": "asphalt", "pbrMetallicRoughness": {{ "baseColorFactor": [0.1, 0.1, 0.1, 1.0] }} }}],
  "buffers": [{{ "byteLength": {len}, "uri": "{uri}" }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 72, "byteLength": 6 }},
    {{ "buffer": 0, "byteOffset": 80, "byteLength": 8 }},
    {{ "buffer": 0, "byteOffset": 88, "byteLength": 24 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 0.0, 1.0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" }},
    {{ "bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR" }},
    {{ "bufferView": 3, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [1.0] }},
    {{ "bufferView": 4, "componentType": 5126, "count": 2, "type": "VEC3" }}
  ],
  "animations": [{{
    "name": "Bob",
    "samplers": [{{ "input": 3, "output": 4, "interpolation": "LINEAR" }}],
    "channels": [{{ "sampler": 0, "target": {{ "node": 0, "path": "translation" }} }}]
  }}]
}}"#,
        pad = "p".repeat(min_len),
        len = bin.len(),
    );
    json.into_bytes()
}
