use xxhash_rust::xxh3::Xxh3;

use crate::timeline::cue_timeline::ResolvedValues;

const XXH3_SEED: u64 = 0x5c0d_a11e_7e1e_0b07;

/// Stable 128-bit fingerprint of a resolved frame.
///
/// Two frames with bit-identical values for the same keys always hash equal; used to check
/// replay determinism and to print compact traces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ValuesFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

impl std::fmt::Display for ValuesFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Fingerprint resolved values in key order.
pub fn fingerprint_values(values: &ResolvedValues) -> ValuesFingerprint {
    let mut h = Xxh3::with_seed(XXH3_SEED);
    h.update(&(values.len() as u64).to_le_bytes());
    for (key, value) in values {
        write_str(&mut h, key.target.as_str());
        write_str(&mut h, key.property.as_str());
        // -0.0 and 0.0 render identically.
        let v = if *value == 0.0 { 0.0f64 } else { *value };
        h.update(&v.to_bits().to_le_bytes());
    }
    let v = h.digest128();
    ValuesFingerprint {
        hi: (v >> 64) as u64,
        lo: v as u64,
    }
}

fn write_str(h: &mut Xxh3, s: &str) {
    h.update(&(s.len() as u64).to_le_bytes());
    h.update(s.as_bytes());
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/fingerprint.rs"]
mod tests;
