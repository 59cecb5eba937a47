pub mod config;
pub mod errors;
pub mod pipeline;
pub mod rasterops;
pub mod synthetic;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::DynamicImage;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

pub use config::Config;
pub use errors::{CrackSegError, Result};
pub use pipeline::{ImagePipeline, PipelineResult, DEFAULT_THRESHOLD, MARKER_RED};
pub use rasterops::TransformKind;
pub use synthetic::{EpochRecord, DEFAULT_EPOCHS};

/// Everything persisted for one analyzed image: the pipeline output plus a
/// synthetic training history, seeded by the image's own encoded form. The
/// history stands in whenever no real one exists, which for a local batch run
/// is always; seeding from the result keeps it stable across re-runs.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionRecord {
    #[serde(flatten)]
    pub result: PipelineResult,
    pub metrics_history: Vec<EpochRecord>,
}

pub struct ImageProcessor {
    pipeline: ImagePipeline,
    config: Config,
}

impl ImageProcessor {
    pub fn new(config: Config) -> Self {
        Self {
            pipeline: ImagePipeline::new(config.threshold),
            config,
        }
    }

    /// Analyzes every supported image under the input directory and writes
    /// one JSON record per image, mirroring the input tree.
    ///
    /// Images are independent, so the batch runs in parallel and a failed
    /// image is reported and skipped rather than aborting the rest.
    pub fn process_directory(&self) -> Result<()> {
        let input_path = &self.config.input_dir;
        let output_path = &self.config.output_dir;

        if !input_path.exists() {
            return Err(CrackSegError::FileSystem {
                path: input_path.clone(),
                operation: "input directory lookup".to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "input directory does not exist",
                ),
            });
        }

        fs::create_dir_all(output_path).map_err(|e| CrackSegError::FileSystem {
            path: output_path.clone(),
            operation: "output directory creation".to_string(),
            source: e,
        })?;

        let image_files = self.collect_image_files(input_path);

        if image_files.is_empty() {
            println!("No images to process");
            return Ok(());
        }

        let pb = ProgressBar::new(image_files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );

        let failures = AtomicUsize::new(0);
        image_files.par_iter().for_each(|input_file| {
            if let Err(err) = self.process_single_image(input_file, output_path) {
                failures.fetch_add(1, Ordering::Relaxed);
                pb.println(format!("{}: {err}", input_file.display()));
            }
            pb.inc(1);
        });

        pb.finish();
        let failed = failures.load(Ordering::Relaxed);
        println!(
            "Processed {} image(s), {} failed",
            image_files.len() - failed,
            failed
        );
        Ok(())
    }

    fn collect_image_files(&self, input_path: &Path) -> Vec<PathBuf> {
        WalkDir::new(input_path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && self.is_supported_image_format(e.path()))
            .map(|e| e.into_path())
            .collect()
    }

    pub fn is_supported_image_format(&self, path: &Path) -> bool {
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            matches!(
                extension.to_lowercase().as_str(),
                "jpg" | "jpeg" | "png" | "webp" | "bmp" | "gif" | "tiff" | "avif"
            )
        } else {
            false
        }
    }

    pub fn process_single_image(&self, input_file: &Path, output_dir: &Path) -> Result<()> {
        let img = image::open(input_file).map_err(|e| CrackSegError::Decode {
            path: input_file.display().to_string(),
            source: e,
        })?;

        let record = self.analyze(&img)?;

        let relative_path = self.get_relative_path(input_file)?;
        let output_file = output_dir.join(relative_path).with_extension("json");

        if let Some(parent) = output_file.parent() {
            fs::create_dir_all(parent).map_err(|e| CrackSegError::FileSystem {
                path: parent.to_path_buf(),
                operation: "output directory creation".to_string(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&output_file, json).map_err(|e| CrackSegError::FileSystem {
            path: output_file,
            operation: "record write".to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Runs the pipeline on an already decoded image and attaches the seeded
    /// metrics history.
    pub fn analyze(&self, image: &DynamicImage) -> Result<DetectionRecord> {
        let result = self.pipeline.process(image)?;
        let metrics_history = synthetic::generate(&result.normal, self.config.epochs);
        Ok(DetectionRecord {
            result,
            metrics_history,
        })
    }

    pub fn get_relative_path(&self, input_file: &Path) -> Result<PathBuf> {
        let input_dir = &self.config.input_dir;
        input_file
            .strip_prefix(input_dir)
            .map(|p| p.to_path_buf())
            .map_err(|_| CrackSegError::FileSystem {
                path: input_file.to_path_buf(),
                operation: "relative path resolution".to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "input file is not under the input directory",
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(input_dir: PathBuf) -> Config {
        Config {
            input_dir,
            output_dir: "output".into(),
            threshold: DEFAULT_THRESHOLD,
            epochs: 5,
        }
    }

    #[test]
    fn supported_formats_by_extension() {
        let processor = ImageProcessor::new(test_config("input".into()));
        let test_cases = vec![
            ("test.jpg", true),
            ("test.jpeg", true),
            ("test.PNG", true),
            ("test.webp", true),
            ("test.txt", false),
            ("test", false),
        ];
        for (filename, expected) in test_cases {
            assert_eq!(
                processor.is_supported_image_format(Path::new(filename)),
                expected,
                "{filename}"
            );
        }
    }

    #[test]
    fn relative_path_calculation() -> Result<()> {
        use tempfile::TempDir;

        let temp_dir = TempDir::new()?;
        let input_dir = temp_dir.path().join("input");
        let subdir = input_dir.join("subdir");
        fs::create_dir_all(&subdir)?;

        let processor = ImageProcessor::new(test_config(input_dir));
        let test_file = subdir.join("test.jpg");
        let relative = processor.get_relative_path(&test_file)?;

        assert_eq!(relative, Path::new("subdir/test.jpg"));
        Ok(())
    }

    #[test]
    fn analyze_attaches_a_deterministic_history() -> Result<()> {
        use image::{Rgba, RgbaImage};

        let processor = ImageProcessor::new(test_config("input".into()));
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([10, 10, 10, 255])));

        let first = processor.analyze(&img)?;
        let second = processor.analyze(&img)?;

        assert_eq!(first.metrics_history.len(), 5);
        assert_eq!(first.metrics_history, second.metrics_history);
        Ok(())
    }
}
