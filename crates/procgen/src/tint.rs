//! Stable per-variant color variation.

/// FNV-1a; stable across runs and platforms, unlike `DefaultHasher`.
pub(crate) fn hash_str(s: &str) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in s.as_bytes() {
        h ^= u64::from(*b);
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    h
}

fn mix(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// RGB in `[lo, hi]` per channel derived from `seed`.
pub(crate) fn from_seed(seed: &str, lo: f32, hi: f32) -> [f32; 3] {
    let h = mix(hash_str(seed));
    let ch = |shift: u32| {
        let v = ((h >> shift) & 0xff) as f32 / 255.0;
        lo + (hi - lo) * v
    };
    [ch(0), ch(8), ch(16)]
}
