use image::{ImageBuffer, Pixel};

/// Geometric derivative produced for every analyzed image.
///
/// The set is closed: the pipeline always emits all four, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Identity,
    Flip180,
    Rotate90,
    CenterCrop,
}

impl TransformKind {
    pub const ALL: [Self; 4] = [
        Self::Identity,
        Self::Flip180,
        Self::Rotate90,
        Self::CenterCrop,
    ];
}

/// Applies `kind` to a raster buffer, returning a freshly allocated output.
///
/// Generic over the pixel type so the exact same code path runs on the photo
/// (`Rgba<u8>`) and on its defect mask (`Luma<u8>`). Overlay alignment after a
/// transform therefore holds by construction: both buffers go through the
/// same coordinate mapping with the same parameters.
pub fn apply<P>(src: &ImageBuffer<P, Vec<P::Subpixel>>, kind: TransformKind) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel + 'static,
{
    let (w, h) = src.dimensions();
    match kind {
        TransformKind::Identity => src.clone(),
        // Point reflection through the center: out(x,y) = in(W-1-x, H-1-y).
        TransformKind::Flip180 => {
            ImageBuffer::from_fn(w, h, |x, y| *src.get_pixel(w - 1 - x, h - 1 - y))
        }
        // Clockwise quarter turn; output dimensions are swapped.
        TransformKind::Rotate90 => {
            ImageBuffer::from_fn(h, w, |x, y| *src.get_pixel(y, h - 1 - x))
        }
        // Central 50% window. Integer division floors the origin and the
        // size, so image and mask crop to identical rectangles.
        TransformKind::CenterCrop => {
            let (x0, y0) = (w / 4, h / 4);
            ImageBuffer::from_fn(w / 2, h / 2, |x, y| *src.get_pixel(x0 + x, y0 + y))
        }
    }
}
