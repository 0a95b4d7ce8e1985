//! Source panorama decoding.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};

use super::{DecodeError, PanoramaRaster};

/// Decode an encoded panorama from bytes into an RGB raster.
///
/// The container format is detected from the data. Alpha channels are
/// dropped and grayscale is expanded, so the result is always RGB8.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be detected.
/// Returns `DecodeError::CorruptedFile` if the data fails to decode.
pub fn decode_raster(bytes: &[u8]) -> Result<PanoramaRaster, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(PanoramaRaster::from_rgb_image(img.into_rgb8()))
}

/// Read and decode a panorama from disk.
pub fn load_raster(path: &Path) -> Result<PanoramaRaster, DecodeError> {
    let bytes = std::fs::read(path)
        .map_err(|e| DecodeError::IoError(format!("{}: {}", path.display(), e)))?;
    decode_raster(&bytes)
}

/// Format implied by a source path's extension, if recognized.
pub fn source_format(path: &Path) -> Option<ImageFormat> {
    ImageFormat::from_path(path).ok()
}

/// True if the path names a JPEG source (`.jpg` / `.jpeg`, any case).
pub fn is_jpeg_source(path: &Path) -> bool {
    source_format(path) == Some(ImageFormat::Jpeg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png_collapses_alpha() {
        let rgba = RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 128]));
        let raster = decode_raster(&png_bytes(DynamicImage::ImageRgba8(rgba))).unwrap();

        assert_eq!(raster.width, 4);
        assert_eq!(raster.height, 2);
        assert_eq!(raster.pixels.len(), 4 * 2 * 3);
        assert_eq!(raster.pixel(1, 3), [10, 20, 30]);
    }

    #[test]
    fn test_decode_grayscale_expands_to_rgb() {
        let gray = image::GrayImage::from_pixel(3, 3, image::Luma([77]));
        let raster = decode_raster(&png_bytes(DynamicImage::ImageLuma8(gray))).unwrap();

        assert_eq!(raster.pixel(2, 2), [77, 77, 77]);
    }

    #[test]
    fn test_decode_unknown_bytes() {
        let result = decode_raster(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_raster(&[]).is_err());
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(DynamicImage::ImageRgb8(image::RgbImage::new(8, 8)));
        let result = decode_raster(&bytes[..20]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_raster(&dir.path().join("missing.jpg"));
        assert!(matches!(result, Err(DecodeError::IoError(_))));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pano.png");
        let rgb = image::RgbImage::from_pixel(6, 3, image::Rgb([1, 2, 3]));
        std::fs::write(&path, png_bytes(DynamicImage::ImageRgb8(rgb))).unwrap();

        let raster = load_raster(&path).unwrap();
        assert_eq!((raster.width, raster.height), (6, 3));
        assert_eq!(raster.pixel(0, 0), [1, 2, 3]);
    }

    #[test]
    fn test_jpeg_source_detection() {
        assert!(is_jpeg_source(Path::new("panos/a.jpg")));
        assert!(is_jpeg_source(Path::new("panos/A.JPEG")));
        assert!(!is_jpeg_source(Path::new("panos/a.png")));
        assert!(!is_jpeg_source(Path::new("panos/a")));
        assert_eq!(source_format(Path::new("b.png")), Some(ImageFormat::Png));
    }
}
