//! QR code rendering for memorial plaques and PIX payment codes.

use std::io::Cursor;

use base64::Engine;
use image::Luma;
use qrcode::render::svg;
use qrcode::QrCode;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Minimum edge length of rendered codes, in pixels.
const MIN_DIMENSION: u32 = 300;

/// Output format of a rendered QR code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrFormat {
    #[default]
    Png,
    Svg,
}

impl QrFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            QrFormat::Png => "png",
            QrFormat::Svg => "svg",
        }
    }
}

/// Public URL of a memorial page: `{base}/m/{slug}`.
pub fn memorial_url(base_url: &str, slug: &str) -> String {
    format!("{}/m/{}", base_url.trim_end_matches('/'), slug)
}

/// Render `data` in the requested format.
pub fn render(data: &str, format: QrFormat) -> Result<String, CoreError> {
    match format {
        QrFormat::Png => render_png_data_url(data),
        QrFormat::Svg => render_svg(data),
    }
}

/// Render `data` as a `data:image/png;base64,...` URL.
pub fn render_png_data_url(data: &str) -> Result<String, CoreError> {
    let code = encode(data)?;
    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .build();

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| CoreError::Internal(format!("PNG encoding failed: {e}")))?;

    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    ))
}

/// Render `data` as a standalone SVG document.
pub fn render_svg(data: &str) -> Result<String, CoreError> {
    let code = encode(data)?;
    Ok(code
        .render::<svg::Color<'_>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

fn encode(data: &str) -> Result<QrCode, CoreError> {
    QrCode::new(data.as_bytes())
        .map_err(|e| CoreError::Validation(format!("Cannot encode QR code: {e}")))
}
