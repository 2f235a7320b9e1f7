use axum::extract::multipart::{Multipart, MultipartError};
use base64::Engine;
use image::ImageFormat;

use crate::model::GameObject;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub(super) enum FormError {
    #[error("{field} must be a number")]
    NotANumber { field: &'static str },
    #[error("invalid form data: {0}")]
    Multipart(#[from] MultipartError),
}

/// Values submitted by the create/edit form.
#[derive(Debug, Default, Clone, PartialEq)]
pub(super) struct GameObjectForm {
    pub x: Option<f32>,
    pub y: Option<f32>,
    /// Newly uploaded bitmap as (base64, content type).
    pub bitmap: Option<(String, String)>,
    pub clear_bitmap: bool,
    pub is_enabled: bool,
}

impl GameObjectForm {
    pub(super) async fn read(mut multipart: Multipart) -> Result<Self, FormError> {
        let mut form = GameObjectForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "x" => form.x = parse_coordinate("X", &field.text().await?)?,
                "y" => form.y = parse_coordinate("Y", &field.text().await?)?,
                "isEnabled" => form.is_enabled = checkbox(&field.text().await?),
                "bitmapClear" => form.clear_bitmap = checkbox(&field.text().await?),
                "bitmap" => {
                    let declared = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    if !bytes.is_empty() {
                        form.bitmap = Some(encode_bitmap(&bytes, declared.as_deref()));
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }

    /// Submitted values laid over `base`. Fields the form always sends replace
    /// the base value; the bitmap is kept unless replaced or cleared.
    pub(super) fn apply_to(&self, base: &GameObject) -> GameObject {
        let mut entity = base.clone();
        entity.x = self.x;
        entity.y = self.y;
        entity.is_enabled = Some(self.is_enabled);
        if self.clear_bitmap {
            entity.clear_bitmap();
        }
        if let Some((data, content_type)) = &self.bitmap {
            entity.bitmap = Some(data.clone());
            entity.bitmap_content_type = Some(content_type.clone());
        }
        entity
    }
}

fn parse_coordinate(field: &'static str, raw: &str) -> Result<Option<f32>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(FormError::NotANumber { field }),
    }
}

fn checkbox(value: &str) -> bool {
    !matches!(value.trim(), "false" | "off" | "0")
}

fn encode_bitmap(bytes: &[u8], declared: Option<&str>) -> (String, String) {
    let content_type = declared
        .filter(|ct| !ct.is_empty() && *ct != FALLBACK_CONTENT_TYPE)
        .map(str::to_string)
        .or_else(|| sniff_content_type(bytes).map(str::to_string))
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());
    (
        base64::engine::general_purpose::STANDARD.encode(bytes),
        content_type,
    )
}

fn sniff_content_type(bytes: &[u8]) -> Option<&'static str> {
    let mime = match image::guess_format(bytes).ok()? {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Ico => "image/x-icon",
        ImageFormat::Tiff => "image/tiff",
        ImageFormat::Avif => "image/avif",
        _ => return None,
    };
    Some(mime)
}
