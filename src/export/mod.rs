//! Flattens the canvas into a PNG download.

use thiserror::Error;

use crate::editor::EditorCanvas;
use crate::geometry::Color;
use crate::notification::Notifier;
use crate::render::{encode_png, Rasterizer, RenderError};
use crate::storage::{Delivery, DeliveryError, DeliveryPayload, Download};
use crate::viewport::Clock;

pub const EXPORT_FAILURE_NOTICE: &str =
    "There was an error downloading your image. Please try again.";
const EXPORT_BASE_COLOR: Color = Color::WHITE;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    Blob,
    DataUri,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Delivered {
        file_name: String,
        encoding: PayloadEncoding,
    },
    /// The user was notified; the canvas is unchanged.
    Failed,
}

pub fn export_file_name(unix_millis: u128) -> String {
    format!("edited-image-{unix_millis}.png")
}

/// Exports the visible scene without selection chrome, then puts the selection back.
///
/// Failures are logged and surfaced once through `notifier`; they never propagate.
pub fn export_raster(
    canvas: &mut EditorCanvas,
    rasterizer: &Rasterizer,
    delivery: &dyn Delivery,
    notifier: &dyn Notifier,
    clock: &dyn Clock,
) -> ExportOutcome {
    let previous = canvas.suspend_selection();
    let result = render_and_deliver(canvas, rasterizer, delivery, clock);
    canvas.restore_selection(previous);

    match result {
        Ok((file_name, encoding)) => {
            tracing::info!(%file_name, ?encoding, "export delivered");
            ExportOutcome::Delivered {
                file_name,
                encoding,
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "export failed");
            notifier.notify(EXPORT_FAILURE_NOTICE);
            ExportOutcome::Failed
        }
    }
}

fn render_and_deliver(
    canvas: &EditorCanvas,
    rasterizer: &Rasterizer,
    delivery: &dyn Delivery,
    clock: &dyn Clock,
) -> ExportResult<(String, PayloadEncoding)> {
    let image = rasterizer.rasterize(canvas.stack(), canvas.surface_size(), EXPORT_BASE_COLOR)?;
    let png = encode_png(&image)?;
    let file_name = export_file_name(clock.unix_millis());

    let blob = Download {
        file_name: file_name.clone(),
        payload: DeliveryPayload::Blob(png),
    };
    match delivery.deliver(&blob) {
        Ok(()) => Ok((file_name, PayloadEncoding::Blob)),
        Err(DeliveryError::BlobUnsupported) => {
            tracing::debug!(%file_name, "blob refused, retrying as data URI");
            let DeliveryPayload::Blob(png) = blob.payload else {
                return Err(DeliveryError::BlobUnsupported.into());
            };
            let fallback = Download {
                file_name,
                payload: DeliveryPayload::png_data_uri(&png),
            };
            delivery.deliver(&fallback)?;
            Ok((fallback.file_name, PayloadEncoding::DataUri))
        }
        Err(err) => Err(err.into()),
    }
}
