use anyhow::{ensure, Context, Result};

use crack_seg_rs::{Config, ImageProcessor};

fn main() -> Result<()> {
    let config = Config::new();

    ensure!(
        config.input_dir.exists(),
        "Input directory does not exist: {}",
        config.input_dir.display()
    );
    ensure!(
        config.threshold.is_finite(),
        "Threshold must be a finite number"
    );

    ImageProcessor::new(config)
        .process_directory()
        .context("batch processing failed")
}
