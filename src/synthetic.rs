use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Default number of epochs when the caller does not specify one.
pub const DEFAULT_EPOCHS: usize = 15;

/// One synthetic time-step of a simulated training-metrics curve.
///
/// Field names are the wire contract consumed by the charting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    pub epoch: u32,
    pub accuracy: f64,
    #[serde(rename = "mAP")]
    pub map: f64,
    pub box_loss: f64,
    pub class_loss: f64,
    pub object_loss: f64,
}

const FNV_OFFSET: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a fold over a string's code points.
pub(crate) fn fnv1a_str(seed: &str) -> u32 {
    let mut hash = FNV_OFFSET;
    for ch in seed.chars() {
        hash ^= ch as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// 32-bit FNV-1a fold over raw bytes. Used to seed the pipeline's simulated
/// confidence numbers from image content.
pub(crate) fn fnv1a_bytes(data: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET;
    for &byte in data {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

// Parameter derivation reads decimal digit windows out of the hash's string
// form. Windows shorter than requested fall back to the digits available; an
// empty window reads as 0.

fn digits_back(digits: &str, n: usize) -> u64 {
    let start = digits.len().saturating_sub(n);
    digits[start..].parse().unwrap_or(0)
}

fn digits_front(digits: &str, range: Range<usize>) -> u64 {
    let end = range.end.min(digits.len());
    if range.start >= end {
        return 0;
    }
    digits[range.start..end].parse().unwrap_or(0)
}

/// Expands an arbitrary seed string into a plausible multi-epoch training
/// curve: accuracy, mAP and three loss series.
///
/// Every derived parameter is a pure function of the seed's FNV-1a hash, so
/// identical `(seed, epochs)` inputs always produce a bit-identical sequence.
/// No clock or external randomness is consulted. This makes the curve usable
/// as a stable placeholder whenever a real metrics history is absent.
pub fn generate(seed: &str, epochs: usize) -> Vec<EpochRecord> {
    let hash = fnv1a_str(seed);
    let digits = hash.to_string();

    let base_acc = (70 + digits_back(&digits, 2) % 25) as f64;
    let base_map = (30 + digits_front(&digits, 0..2) % 60) as f64;

    // Bounded pseudo-noise stream indexed by epoch, re-derived from the hash.
    let noise_seed = digits_back(&digits, 6);
    let rnd = |i: u64| ((noise_seed + i * 9973) % 1_000_000 % 1000) as f64 / 1000.0;

    let acc_amp = (6 + digits_back(&digits, 1) % 6) as f64;
    let map_amp = (6 + (digits_back(&digits, 2) >> 1) % 6) as f64;
    let acc_freq = 0.45 + (digits_front(&digits, 0..3) % 7) as f64 * 0.03;
    let map_freq = 0.55 + (digits_front(&digits, 1..4) % 7) as f64 * 0.02;
    let acc_phase = f64::from(hash % 13);
    let map_phase = f64::from(hash % 11);

    let half = epochs as f64 / 2.0;
    (1..=epochs)
        .map(|epoch| {
            let e = epoch as f64;
            let i = epoch as u64;

            let noise_acc = (rnd(i) - 0.5) * 4.0;
            let noise_map = (rnd(i + 5) - 0.5) * 4.0;
            let seasonal_acc = (e * acc_freq + acc_phase).sin() * acc_amp;
            let seasonal_map = (e * map_freq + map_phase).cos() * map_amp * 0.6;

            let accuracy = base_acc + seasonal_acc + noise_acc + (e - half) * 0.15;
            let map = base_map + seasonal_map + noise_map + (e - half) * -0.08;

            EpochRecord {
                epoch: epoch as u32,
                accuracy: round_to(accuracy.clamp(0.0, 99.9), 3),
                map: round_to(map.clamp(0.0, 100.0), 3),
                box_loss: round_to((1.2 - rnd(i) * 1.2 + (e * 0.35).sin() * 0.4).abs(), 5),
                class_loss: round_to((0.8 - rnd(i + 3) * 0.9 + (e * 0.25).cos() * 0.3).abs(), 5),
                object_loss: round_to((0.6 - rnd(i + 7) * 0.7 + (e * 0.18).sin() * 0.25).abs(), 5),
            }
        })
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_hash_values() {
        // Reference FNV-1a 32-bit digests.
        assert_eq!(fnv1a_str(""), 0x811C_9DC5);
        assert_eq!(fnv1a_str("hello"), 0x4F9F_2CAB);
    }

    #[test]
    fn identical_seeds_yield_identical_sequences() {
        assert_eq!(generate("abc", 15), generate("abc", 15));
    }

    #[test]
    fn different_seeds_yield_different_sequences() {
        assert_ne!(generate("abc", 15), generate("abd", 15));
    }

    #[test]
    fn epochs_are_numbered_from_one() {
        let records = generate("seed", 5);
        assert_eq!(records.len(), 5);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.epoch, i as u32 + 1);
        }
    }

    #[test]
    fn values_stay_within_bounds() {
        for seed in ["a", "hello", "data:image/png;base64,AAAA", "日本語", ""] {
            for record in generate(seed, 30) {
                assert!((0.0..=99.9).contains(&record.accuracy), "accuracy {record:?}");
                assert!((0.0..=100.0).contains(&record.map), "mAP {record:?}");
                assert!(record.box_loss >= 0.0);
                assert!(record.class_loss >= 0.0);
                assert!(record.object_loss >= 0.0);
            }
        }
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let json = serde_json::to_value(&generate("abc", 1)[0]).unwrap();
        assert!(json.get("mAP").is_some());
        assert!(json.get("box_loss").is_some());
        assert!(json.get("map").is_none());
    }
}
