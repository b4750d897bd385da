//! Composites the render stack into pixels: images through tiny-skia, text and shapes
//! through per-object SVG documents rendered by resvg.

mod chrome;
mod svg;

use std::io::Cursor;
use std::sync::Arc;

use resvg::tiny_skia::{
    Color as SkiaColor, FilterQuality, Pixmap, PixmapPaint, PixmapRef, Transform,
};
use thiserror::Error;

use crate::editor::EditorCanvas;
use crate::geometry::{Color, Size};
use crate::scene::{ImageContent, SceneObject, SceneStack};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },
    #[error("object {id} produced invalid vector markup: {message}")]
    Svg { id: String, message: String },
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Shared rasterizer. Cloning is cheap; the font database is reference counted.
#[derive(Clone)]
pub struct Rasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rasterizer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl Rasterizer {
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self::with_fontdb(Arc::new(db))
    }

    pub fn with_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { fontdb }
    }

    /// On-screen frame: transparent base plus selection chrome and caret.
    pub fn render_surface(&self, canvas: &EditorCanvas) -> RenderResult<image::RgbaImage> {
        let mut pixmap = self.compose(canvas.stack(), canvas.surface_size(), None)?;
        chrome::draw_selection(&mut pixmap, canvas.stack(), canvas.state());
        Ok(to_rgba_image(&pixmap))
    }

    /// Flattens the stack over an opaque `base`, without any chrome.
    pub fn rasterize(
        &self,
        stack: &SceneStack,
        surface: Size,
        base: Color,
    ) -> RenderResult<image::RgbaImage> {
        let pixmap = self.compose(stack, surface, Some(base))?;
        Ok(to_rgba_image(&pixmap))
    }

    fn compose(
        &self,
        stack: &SceneStack,
        surface: Size,
        base: Option<Color>,
    ) -> RenderResult<Pixmap> {
        let mut pixmap = Pixmap::new(surface.width, surface.height).ok_or(
            RenderError::SurfaceAllocation {
                width: surface.width,
                height: surface.height,
            },
        )?;
        if let Some(color) = base {
            pixmap.fill(SkiaColor::from_rgba8(color.r, color.g, color.b, color.a));
        }
        for object in stack.iter() {
            match object.as_image() {
                Some(image) => draw_image(&mut pixmap, object, image),
                None => self.draw_vector(&mut pixmap, object, surface)?,
            }
        }
        Ok(pixmap)
    }

    fn draw_vector(
        &self,
        pixmap: &mut Pixmap,
        object: &SceneObject,
        surface: Size,
    ) -> RenderResult<()> {
        let Some(document) = svg::object_document(object, surface) else {
            return Ok(());
        };
        let options = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&document, &options).map_err(|err| RenderError::Svg {
            id: object.id.to_string(),
            message: err.to_string(),
        })?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Ok(())
    }
}

fn draw_image(pixmap: &mut Pixmap, object: &SceneObject, image: &ImageContent) {
    let pixels = &image.pixels;
    let Some(source) = PixmapRef::from_bytes(pixels.premultiplied(), pixels.width, pixels.height)
    else {
        tracing::warn!(id = %object.id, "skipping image with inconsistent pixel buffer");
        return;
    };
    let geometry = &object.geometry;
    let scale = geometry.scale as f32;
    let transform = Transform::from_translate(geometry.center.x as f32, geometry.center.y as f32)
        .pre_concat(Transform::from_rotate(geometry.angle as f32))
        .pre_concat(Transform::from_scale(scale, scale))
        .pre_concat(Transform::from_translate(
            -(pixels.width as f32) / 2.0,
            -(pixels.height as f32) / 2.0,
        ));
    let paint = PixmapPaint {
        opacity: object.style.opacity.clamp(0.0, 1.0) as f32,
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, source, &paint, transform, None);
}

/// Converts premultiplied surface pixels into straight-alpha RGBA.
pub fn to_rgba_image(pixmap: &Pixmap) -> image::RgbaImage {
    let mut data = pixmap.data().to_vec();
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for channel in &mut px[..3] {
            *channel = ((u16::from(*channel) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .unwrap_or_else(|| image::RgbaImage::new(pixmap.width(), pixmap.height()))
}

pub fn encode_png(image: &image::RgbaImage) -> RenderResult<Vec<u8>> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(buf)
}
