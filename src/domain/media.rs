use image::RgbImage;
use std::path::Path;

use super::errors::{DomainError, DomainResult};

pub const SUPPORTED_MIMES: [&str; 4] = ["image/jpeg", "image/png", "image/bmp", "image/webp"];

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

pub fn is_supported_mime(content_type: &str) -> bool {
    SUPPORTED_MIMES.contains(&content_type)
}

/// Case-insensitive extension check.
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Decodes any supported container and converts it to 3-channel RGB.
pub fn decode_rgb(bytes: &[u8]) -> DomainResult<RgbImage> {
    let img = image::load_from_memory(bytes).map_err(|e| DomainError::InvalidImage(e.to_string()))?;
    Ok(img.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_whitelist() {
        assert!(is_supported_mime("image/webp"));
        assert!(!is_supported_mime("text/plain"));
        assert!(!is_supported_mime("image/gif"));
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(has_supported_extension(Path::new("a/B.JPG")));
        assert!(has_supported_extension(Path::new("x.WebP")));
        assert!(!has_supported_extension(Path::new("x.txt")));
        assert!(!has_supported_extension(Path::new("jpg")));
    }

    #[test]
    fn decodes_png_to_rgb() {
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 128]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        let rgb = decode_rgb(buf.get_ref()).unwrap();
        assert_eq!(rgb.dimensions(), (4, 3));
        assert_eq!(rgb.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn garbage_is_invalid_image() {
        assert!(matches!(decode_rgb(b"not an image"), Err(DomainError::InvalidImage(_))));
    }
}
