use std::io::Cursor;
use std::time::Instant;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat, Rgb, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::errors::{CrackSegError, Result};
use crate::rasterops::{apply, mask_to_bw, paint_mask, threshold_mask, TransformKind};
use crate::synthetic::fnv1a_bytes;

/// Marker color painted over detected crack pixels.
pub const MARKER_RED: Rgb<u8> = Rgb([255, 0, 0]);

/// Default luminance cutoff for crack classification.
pub const DEFAULT_THRESHOLD: f32 = 100.0;

/// Output bundle for one analyzed image.
///
/// The five images are self-contained PNG data URIs, directly displayable and
/// safe to pass across process boundaries. PNG keeps the mask output strictly
/// two-valued. Field names are the wire contract consumed by the result
/// screens and the history backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub normal: String,
    pub flipped: String,
    pub rotated: String,
    pub cropped: String,
    pub mask: String,
    #[serde(rename = "inferenceTime")]
    pub inference_time: f64,
    pub accuracy: f64,
    #[serde(rename = "mAP")]
    pub map: f64,
}

/// Runs the full per-image analysis: threshold mask, four geometric
/// derivatives with re-projected overlays, encoded outputs and metrics.
///
/// Stateless between invocations; every stage allocates fresh buffers, so a
/// host may process many images in parallel with one pipeline value.
#[derive(Debug, Clone, Copy)]
pub struct ImagePipeline {
    threshold: f32,
    marker: Rgb<u8>,
}

impl Default for ImagePipeline {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ImagePipeline {
    pub const fn new(threshold: f32) -> Self {
        Self {
            threshold,
            marker: MARKER_RED,
        }
    }

    pub fn process(&self, image: &DynamicImage) -> Result<PipelineResult> {
        let started = Instant::now();
        let src = image.to_rgba8();

        // The mask is computed once from the identity-oriented source and
        // then re-projected through each transform, never re-derived.
        let mask0 = threshold_mask(&src, self.threshold);

        let render = |kind: TransformKind| -> Result<String> {
            let composited = paint_mask(&apply(&src, kind), &apply(&mask0, kind), self.marker)?;
            to_data_uri(&composited)
        };

        let normal = render(TransformKind::Identity)?;
        let flipped = render(TransformKind::Flip180)?;
        let rotated = render(TransformKind::Rotate90)?;
        let cropped = render(TransformKind::CenterCrop)?;
        let mask = to_data_uri(&mask_to_bw(&mask0))?;

        let (accuracy, map) = simulated_confidence(&src);
        let inference_time = round_to(started.elapsed().as_secs_f64() * 1000.0, 2);

        Ok(PipelineResult {
            normal,
            flipped,
            rotated,
            cropped,
            mask,
            inference_time,
            accuracy,
            map,
        })
    }
}

/// Simulated model confidence, derived from a hash of the pixel content so
/// repeated runs on the same image report the same numbers. Accuracy lands in
/// [85, 95), mAP in [0.65, 0.90).
fn simulated_confidence(src: &RgbaImage) -> (f64, f64) {
    let hash = fnv1a_bytes(src.as_raw());
    let accuracy = 85.0 + f64::from(hash % 1000) / 1000.0 * 10.0;
    let map = 0.65 + f64::from(hash / 1000 % 1000) / 1000.0 * 0.25;
    (round_to(accuracy, 2), round_to(map, 3))
}

fn to_data_uri(image: &RgbaImage) -> Result<String> {
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|source| CrackSegError::Encode {
            operation: "PNG encode".to_string(),
            source,
        })?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
