//! Entity-tag computation.
//!
//! Tags have the form `"<length>-<checksum>"` over the response body,
//! with a `W/` prefix for weak tags. The checksum is CRC-32 (IEEE),
//! implemented here directly to keep dependencies minimal — a content
//! fingerprint, not a cryptographic digest.

use strand_core::Ctx;

const CRC32_POLY: u32 = 0xEDB8_8320;

const CRC32_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 == 1 {
                (crc >> 1) ^ CRC32_POLY
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// CRC-32 (IEEE) checksum of `bytes`.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in bytes {
        let index = ((crc ^ u32::from(byte)) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[index];
    }
    !crc
}

/// Format an entity tag for `body`.
#[must_use]
pub fn entity_tag(body: &[u8], weak: bool) -> String {
    let tag = format!("\"{}-{}\"", body.len(), checksum(body));
    if weak { format!("W/{tag}") } else { tag }
}

/// Stamp an `etag` header computed from the response body written so far.
///
/// Does nothing for an empty body or when a handler already set the
/// header. Intended to run late in a chain, after the body-producing
/// handler.
pub fn set_etag(ctx: &mut Ctx, weak: bool) {
    if ctx.response().body().is_empty() || ctx.response().header("etag").is_some() {
        return;
    }
    let tag = entity_tag(ctx.response().body(), weak);
    ctx.set_header("etag", &tag);
}
