use super::ImageError;

/// Straight-alpha RGBA8 pixels ready for `Backend::make_image`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decodes PNG/JPEG/GIF/WebP/BMP through `image`, and SVG documents through
/// `resvg` at their intrinsic size.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, ImageError> {
    if looks_like_svg(bytes) {
        return decode_svg(bytes);
    }
    let img = ::image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        // A multi-byte character may straddle the cut.
        return String::from_utf8_lossy(head).contains("<svg");
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with('<') && text.contains("<svg"))
}

fn decode_svg(bytes: &[u8]) -> Result<DecodedImage, ImageError> {
    use resvg::tiny_skia::{Pixmap, Transform};
    use resvg::usvg::{Options, Tree};

    let tree = Tree::from_data(bytes, &Options::default()).map_err(|e| ImageError::Decode(e.to_string()))?;
    let size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(size.width(), size.height())
        .ok_or_else(|| ImageError::Decode(format!("bad SVG size {}x{}", size.width(), size.height())))?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(DecodedImage {
        width: size.width(),
        height: size.height(),
        rgba,
    })
}
