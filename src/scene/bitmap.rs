use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch image from {url}: {message}")]
    Fetch { url: String, message: String },
    #[error("failed to decode image from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },
    #[error("image from {url} has no pixels")]
    Empty { url: String },
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Decoded raster data for a background image, stored premultiplied for compositing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePixels {
    pub width: u32,
    pub height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl ImagePixels {
    pub fn from_rgba(rgba: image::RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        let mut data = rgba.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        }
    }

    pub fn premultiplied(&self) -> &[u8] {
        &self.rgba8_premul
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Decodes encoded bytes (PNG, JPEG, ...) fetched from `url`.
pub fn decode_image(url: &str, bytes: &[u8]) -> LoadResult<ImagePixels> {
    let decoded = image::load_from_memory(bytes).map_err(|source| LoadError::Decode {
        url: url.to_string(),
        source,
    })?;
    let pixels = ImagePixels::from_rgba(decoded.to_rgba8());
    if pixels.is_empty() {
        return Err(LoadError::Empty {
            url: url.to_string(),
        });
    }
    Ok(pixels)
}

/// Image payload of a scene object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageContent {
    pub source_url: String,
    pub pixels: ImagePixels,
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((u16::from(px[0]) * a + 127) / 255) as u8;
        px[1] = ((u16::from(px[1]) * a + 127) / 255) as u8;
        px[2] = ((u16::from(px[2]) * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
pub(crate) fn encoded_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    use std::io::Cursor;

    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode test png");
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_image_premultiplies_alpha() {
        let bytes = encoded_png(2, 3, [200, 100, 50, 128]);
        let pixels = decode_image("mem://a.png", &bytes).expect("decode png");
        assert_eq!((pixels.width, pixels.height), (2, 3));
        assert_eq!(pixels.premultiplied().len(), 2 * 3 * 4);
        assert_eq!(&pixels.premultiplied()[..4], &[100, 50, 25, 128]);
    }

    #[test]
    fn decode_image_rejects_garbage() {
        let err = decode_image("mem://bad", b"not an image").expect_err("should fail");
        assert!(matches!(err, LoadError::Decode { ref url, .. } if url == "mem://bad"));
    }

    #[test]
    fn transparent_pixels_clear_color_channels() {
        let pixels = ImagePixels::from_rgba(image::RgbaImage::from_pixel(
            1,
            1,
            image::Rgba([255, 255, 255, 0]),
        ));
        assert_eq!(pixels.premultiplied(), &[0, 0, 0, 0]);
    }
}
