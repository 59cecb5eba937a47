use image::{GenericImageView, GrayImage, Luma, Rgba, RgbaImage};
use num_traits::AsPrimitive;

/// Mask value for a pixel classified as a crack.
pub const MASK_ON: u8 = 255;
/// Mask value for background.
pub const MASK_OFF: u8 = 0;

/// Classifies every pixel of `image` by luminance, returning a binary mask.
///
/// Luminance is the unweighted mean of R, G and B; a pixel is marked as a
/// crack when its luminance falls strictly below `threshold`. This is a
/// stand-in heuristic for dark, crack-like regions, not a trained model.
///
/// Pure: the same input and threshold always yield the same mask. An
/// all-bright image yields an all-off mask and an all-dark image an all-on
/// mask; both are legal.
pub fn threshold_mask<I, S>(image: &I, threshold: f32) -> GrayImage
where
    I: GenericImageView<Pixel = Rgba<S>>,
    S: image::Primitive + AsPrimitive<f32> + 'static,
{
    let (w, h) = image.dimensions();
    let mut mask = GrayImage::new(w, h);
    for (x, y, Rgba([r, g, b, _])) in image.pixels() {
        let luminance = (r.as_() + g.as_() + b.as_()) / 3.0;
        let value = if luminance < threshold { MASK_ON } else { MASK_OFF };
        mask.put_pixel(x, y, Luma([value]));
    }
    mask
}

/// Renders a mask as an opaque black/white image: crack pixels white,
/// background black. Used for the standalone mask output, which must stay
/// strictly two-valued through encoding.
pub fn mask_to_bw(mask: &GrayImage) -> RgbaImage {
    RgbaImage::from_fn(mask.width(), mask.height(), |x, y| {
        if mask.get_pixel(x, y).0[0] == MASK_ON {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn dark_pixels_are_on_bright_pixels_are_off() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([30, 30, 30, 255]));
        img.put_pixel(1, 0, Rgba([200, 200, 200, 255]));

        let mask = threshold_mask(&img, 100.0);
        assert_eq!(mask.get_pixel(0, 0).0[0], MASK_ON);
        assert_eq!(mask.get_pixel(1, 0).0[0], MASK_OFF);
    }

    #[test]
    fn luminance_equal_to_threshold_is_off() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([100, 100, 100, 255]));
        let mask = threshold_mask(&img, 100.0);
        assert_eq!(mask.get_pixel(0, 0).0[0], MASK_OFF);
    }

    #[test]
    fn all_black_image_yields_all_on_mask() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let mask = threshold_mask(&img, 100.0);
        assert!(mask.pixels().all(|p| p.0[0] == MASK_ON));
    }

    #[test]
    fn threshold_mask_is_pure() {
        let img = RgbaImage::from_fn(8, 8, |x, y| {
            let v = ((x * 37 + y * 11) % 256) as u8;
            Rgba([v, v / 2, v / 3, 255])
        });
        assert_eq!(threshold_mask(&img, 100.0), threshold_mask(&img, 100.0));
    }

    #[test]
    fn bw_rendering_is_opaque_and_two_valued() {
        let img = RgbaImage::from_fn(2, 2, |x, _| {
            if x == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let bw = mask_to_bw(&threshold_mask(&img, 100.0));
        assert_eq!(*bw.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*bw.get_pixel(1, 0), Rgba([0, 0, 0, 255]));
    }
}
