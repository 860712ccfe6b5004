use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::assets::texture::PreparedImage;

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> anyhow::Result<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Extract the payload bytes of a base64 `data:` URI (embedded bodymovin images).
pub fn data_uri_bytes(uri: &str) -> anyhow::Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .context("data URI must start with 'data:'")?;
    let (meta, payload) = rest
        .split_once(',')
        .context("data URI has no ',' separator")?;
    if !meta.ends_with(";base64") {
        anyhow::bail!("only base64 data URIs are supported");
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .context("decode base64 data URI payload")
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
