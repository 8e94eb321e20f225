//! Block payload codec.
//!
//! Compressed blocks hold an LZ-style token stream:
//!
//! ```text
//! [token][lit ext...][literals][offset lo][offset hi][match ext...]
//! ```
//!
//! * **token** – high nibble literal count, low nibble match length minus
//!   [`MIN_MATCH`]; a nibble of 15 continues into extension bytes, each
//!   adding its value, terminated by the first byte below 255.
//! * **offset** – 16-bit little-endian distance back into the output of the
//!   *same* block; zero is invalid. Matches may overlap their own output.
//! * The final sequence carries literals only and ends exactly at the end of
//!   the payload.
//!
//! Blocks are self-contained: no window or table state survives from one
//! block to the next, so any block can be decoded knowing only its payload
//! and an upper bound on its output size.

use crate::error::{Error, Result};
use crate::level::LevelParams;

/// Shortest match worth encoding; a sequence with a match always regenerates
/// at least this many bytes from the offset.
pub(crate) const MIN_MATCH: usize = 4;

/// Furthest back an offset can reach.
const MAX_OFFSET: usize = u16::MAX as usize;

fn hash(seq: u32, hash_log: u32) -> usize {
    // Knuth multiplicative hash over the 4 bytes at the probe position.
    (seq.wrapping_mul(2654435761) >> (32 - hash_log)) as usize
}

fn read_u32_le(src: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([src[pos], src[pos + 1], src[pos + 2], src[pos + 3]])
}

fn write_ext(dst: &mut Vec<u8>, mut v: usize) {
    while v >= 255 {
        dst.push(255);
        v -= 255;
    }
    dst.push(v as u8);
}

fn emit_sequence(dst: &mut Vec<u8>, literals: &[u8], offset: u16, match_len: usize) {
    let ml = match_len - MIN_MATCH;
    let lit_nib = literals.len().min(15) as u8;
    let ml_nib = ml.min(15) as u8;
    dst.push((lit_nib << 4) | ml_nib);
    if literals.len() >= 15 {
        write_ext(dst, literals.len() - 15);
    }
    dst.extend_from_slice(literals);
    dst.extend_from_slice(&offset.to_le_bytes());
    if ml >= 15 {
        write_ext(dst, ml - 15);
    }
}

fn emit_final_literals(dst: &mut Vec<u8>, literals: &[u8]) {
    let lit_nib = literals.len().min(15) as u8;
    dst.push(lit_nib << 4);
    if literals.len() >= 15 {
        write_ext(dst, literals.len() - 15);
    }
    dst.extend_from_slice(literals);
}

/// Compress one block into `dst` using a greedy single-probe match finder.
///
/// Deterministic for a fixed `(src, params)` pair: the table starts empty
/// for every block and probing order depends only on the input.
pub(crate) fn compress_block(src: &[u8], params: &LevelParams, dst: &mut Vec<u8>) {
    let mut table = vec![u32::MAX; 1usize << params.hash_log];
    let mut anchor = 0usize;
    let mut pos = 0usize;

    while pos + MIN_MATCH <= src.len() {
        let seq = read_u32_le(src, pos);
        let slot = hash(seq, params.hash_log);
        let cand = table[slot];
        table[slot] = pos as u32;

        let found = cand != u32::MAX
            && pos - cand as usize <= MAX_OFFSET
            && read_u32_le(src, cand as usize) == seq;
        if !found {
            pos += params.step;
            continue;
        }

        let cand = cand as usize;
        let mut len = MIN_MATCH;
        while pos + len < src.len() && src[cand + len] == src[pos + len] {
            len += 1;
        }
        emit_sequence(dst, &src[anchor..pos], (pos - cand) as u16, len);
        pos += len;
        anchor = pos;
    }

    emit_final_literals(dst, &src[anchor..]);
}

fn read_ext(src: &[u8], pos: &mut usize) -> Result<usize> {
    let mut total = 0usize;
    loop {
        let b = *src
            .get(*pos)
            .ok_or_else(|| Error::CorruptFrame("unterminated length extension".into()))?;
        *pos += 1;
        total += b as usize;
        if b != 255 {
            return Ok(total);
        }
    }
}

/// Decode one block payload. `max_out` bounds the regenerated size (the
/// frame layer passes the declared content size still outstanding); a block
/// producing more than that is corrupt, never silently clipped.
///
/// The payload is known to be complete at this point -- the frame layer has
/// already consumed it against the block header -- so any malformed token
/// stream here is `CorruptFrame` rather than a truncation.
pub(crate) fn decompress_block(src: &[u8], max_out: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut pos = 0usize;

    while pos < src.len() {
        let token = src[pos];
        pos += 1;

        let mut lit = (token >> 4) as usize;
        if lit == 15 {
            lit += read_ext(src, &mut pos)?;
        }
        if pos + lit > src.len() {
            return Err(Error::CorruptFrame("literal run past end of block".into()));
        }
        if out.len() + lit > max_out {
            return Err(Error::CorruptFrame(
                "block output exceeds declared content size".into(),
            ));
        }
        out.extend_from_slice(&src[pos..pos + lit]);
        pos += lit;

        if pos == src.len() {
            // Final literals-only sequence.
            break;
        }

        if pos + 2 > src.len() {
            return Err(Error::CorruptFrame("match offset past end of block".into()));
        }
        let offset = u16::from_le_bytes([src[pos], src[pos + 1]]) as usize;
        pos += 2;
        if offset == 0 || offset > out.len() {
            return Err(Error::CorruptFrame(format!(
                "match offset {} outside block window of {} bytes",
                offset,
                out.len()
            )));
        }

        let mut ml = (token & 0x0F) as usize;
        if ml == 15 {
            ml += read_ext(src, &mut pos)?;
        }
        ml += MIN_MATCH;
        if out.len() + ml > max_out {
            return Err(Error::CorruptFrame(
                "block output exceeds declared content size".into(),
            ));
        }

        // Byte-at-a-time copy so overlapping matches (offset < length)
        // regenerate runs correctly.
        let start = out.len() - offset;
        for i in 0..ml {
            let b = out[start + i];
            out.push(b);
        }
    }

    Ok(out)
}
