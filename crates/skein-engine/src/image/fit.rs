use crate::coords::Rect;

/// How an image is placed into its destination box.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ImageFit {
    /// Stretch to the box.
    #[default]
    Fill,
    /// Scale uniformly to fit inside the box, centered.
    Contain,
    /// Scale uniformly to cover the box; the overflow is cropped from the source.
    Cover,
    /// Natural size, centered on the box.
    None,
}

impl ImageFit {
    /// Parses a `fit` prop. Unknown values stretch.
    pub fn parse(s: &str) -> Self {
        match s {
            "contain" => ImageFit::Contain,
            "cover" => ImageFit::Cover,
            "none" => ImageFit::None,
            _ => ImageFit::Fill,
        }
    }
}

/// Source region of the image and where it lands.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FitRects {
    pub src: Rect,
    pub dst: Rect,
}

/// Computes the source/destination rectangles for an `image_w`×`image_h`
/// image drawn into `bounds`.
pub fn compute_fit(fit: ImageFit, image_w: f32, image_h: f32, bounds: Rect) -> FitRects {
    let full = Rect::new(0.0, 0.0, image_w, image_h);
    let (x, y, w, h) = (bounds.x(), bounds.y(), bounds.width(), bounds.height());
    if image_w <= 0.0 || image_h <= 0.0 {
        return FitRects { src: full, dst: bounds };
    }

    match fit {
        ImageFit::Fill => FitRects { src: full, dst: bounds },
        ImageFit::Contain => {
            let scale = (w / image_w).min(h / image_h);
            let (nw, nh) = (image_w * scale, image_h * scale);
            FitRects {
                src: full,
                dst: Rect::new(x + (w - nw) / 2.0, y + (h - nh) / 2.0, nw, nh),
            }
        }
        ImageFit::Cover => {
            let scale = (w / image_w).max(h / image_h);
            let src = if image_w * scale > w {
                let crop = w / scale;
                Rect::new((image_w - crop) / 2.0, 0.0, crop, image_h)
            } else if image_h * scale > h {
                let crop = h / scale;
                Rect::new(0.0, (image_h - crop) / 2.0, image_w, crop)
            } else {
                full
            };
            FitRects { src, dst: bounds }
        }
        ImageFit::None => FitRects {
            src: full,
            dst: Rect::new(x + (w - image_w) / 2.0, y + (h - image_h) / 2.0, image_w, image_h),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

    #[test]
    fn parse_falls_back_to_fill() {
        assert_eq!(ImageFit::parse("cover"), ImageFit::Cover);
        assert_eq!(ImageFit::parse("stretch"), ImageFit::Fill);
    }

    #[test]
    fn fill_stretches() {
        let r = compute_fit(ImageFit::Fill, 30.0, 10.0, BOX);
        assert_eq!(r.src, Rect::new(0.0, 0.0, 30.0, 10.0));
        assert_eq!(r.dst, BOX);
    }

    #[test]
    fn contain_letterboxes() {
        let r = compute_fit(ImageFit::Contain, 200.0, 100.0, BOX);
        assert_eq!(r.src, Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(r.dst, Rect::new(0.0, 25.0, 100.0, 50.0));
    }

    #[test]
    fn cover_crops_the_long_axis() {
        let r = compute_fit(ImageFit::Cover, 100.0, 200.0, BOX);
        assert_eq!(r.src, Rect::new(0.0, 50.0, 100.0, 100.0));
        assert_eq!(r.dst, BOX);

        let r = compute_fit(ImageFit::Cover, 400.0, 100.0, BOX);
        assert_eq!(r.src, Rect::new(150.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn none_centers_natural_size() {
        let r = compute_fit(ImageFit::None, 40.0, 20.0, Rect::new(10.0, 10.0, 100.0, 100.0));
        assert_eq!(r.dst, Rect::new(40.0, 50.0, 40.0, 20.0));
    }
}
