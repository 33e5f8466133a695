//! Registration QR tokens
//!
//! A token is `base64url("reg:{id}:{checksum}")` where the checksum is the
//! first 8 hex digits of `sha256("reg:{id}")`. Check-in staff scan the
//! rendered image and the server verifies the token back to an id.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use qrcode::{render::svg, QrCode};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const PREFIX: &str = "reg";

fn checksum(id: Uuid) -> String {
    let digest = Sha256::digest(format!("{}:{}", PREFIX, id).as_bytes());
    hex::encode(digest)[..8].to_string()
}

/// Build the QR payload for a registration id
pub fn generate_qr_data(id: Uuid) -> String {
    let raw = format!("{}:{}:{}", PREFIX, id, checksum(id));
    URL_SAFE_NO_PAD.encode(raw.as_bytes())
}

/// Decode a scanned token back to its registration id
pub fn verify(token: &str) -> AppResult<Uuid> {
    let invalid = || AppError::BadRequest("Invalid registration code".to_string());

    let bytes = URL_SAFE_NO_PAD.decode(token.trim()).map_err(|_| invalid())?;
    let raw = String::from_utf8(bytes).map_err(|_| invalid())?;

    let mut parts = raw.splitn(3, ':');
    let (prefix, id, sum) = match (parts.next(), parts.next(), parts.next()) {
        (Some(p), Some(i), Some(s)) => (p, i, s),
        _ => return Err(invalid()),
    };
    if prefix != PREFIX {
        return Err(invalid());
    }
    let id = Uuid::parse_str(id).map_err(|_| invalid())?;
    if checksum(id) != sum {
        return Err(invalid());
    }
    Ok(id)
}

/// Render a token as an SVG QR code embedded in a `data:` URL
pub fn render_qr_image(token: &str) -> AppResult<String> {
    let code = QrCode::new(token.as_bytes())
        .map_err(|e| AppError::Internal(format!("Failed to encode QR code: {}", e)))?;

    let image = code
        .render::<svg::Color>()
        .min_dimensions(240, 240)
        .quiet_zone(true)
        .build();

    Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
}
