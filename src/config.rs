use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Clone, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    pub input_dir: PathBuf,

    #[arg(default_value = "output")]
    pub output_dir: PathBuf,

    /// Luminance cutoff below which a pixel is classified as a crack.
    #[arg(short, long, default_value_t = crate::pipeline::DEFAULT_THRESHOLD)]
    pub threshold: f32,

    /// Number of synthetic training epochs attached to each result.
    #[arg(short, long, default_value_t = crate::synthetic::DEFAULT_EPOCHS, value_parser = check_epochs)]
    pub epochs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }
}

fn check_epochs(s: &str) -> Result<usize, String> {
    let epochs: usize = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if epochs == 0 {
        return Err("epoch count must be at least 1".to_string());
    }
    Ok(epochs)
}
