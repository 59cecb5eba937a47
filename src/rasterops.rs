pub mod mask;
pub mod overlay;
pub mod transform;

pub use mask::{mask_to_bw, threshold_mask};
pub use overlay::paint_mask;
pub use transform::{apply, TransformKind};
