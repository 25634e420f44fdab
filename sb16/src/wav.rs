//! Waveform header validation.
//!
//! The driver only needs five fields out of the canonical 44-byte header:
//! the "RIFF" tag, the format code, the channel count, the sample width and
//! the sample rate. Everything else (chunk sizes, data offset) is the
//! producer's problem. The header is validated once at init and not
//! retained.

use crate::error::{Result, Sb16Error};

/// Canonical header length in bytes.
pub const HEADER_LEN: usize = 44;

/// "RIFF" as a 32-bit value, after byte-reversing the on-wire tag.
const MAGIC_RIFF: u32 = 0x5249_4646;

/// Linear PCM format code.
const FORMAT_PCM: u16 = 1;
/// Required channel count (stereo).
const CHANNELS_STEREO: u16 = 2;
/// Required sample width.
const BITS_PER_SAMPLE: u16 = 16;

const MAGIC_OFF: usize = 0;
const FORMAT_OFF: usize = 20;
const CHANNELS_OFF: usize = 22;
const RATE_OFF: usize = 24;
const BPS_OFF: usize = 34;

#[inline]
fn field_u16(header: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([header[off], header[off + 1]])
}

/// Validate a header and extract the sample rate.
///
/// Checks, in order: the big-endian "RIFF" tag, the PCM format code, then
/// channels and sample width together. A header shorter than
/// [`HEADER_LEN`] cannot carry the tag and is rejected the same way a bad
/// tag is.
pub fn parse(header: &[u8]) -> Result<u16> {
    if header.len() < HEADER_LEN {
        return Err(Sb16Error::NotWave);
    }

    // Tag is stored big-endian on the wire; reverse the four bytes before
    // comparing.
    let magic = u32::from_be_bytes([
        header[MAGIC_OFF],
        header[MAGIC_OFF + 1],
        header[MAGIC_OFF + 2],
        header[MAGIC_OFF + 3],
    ]);
    if magic != MAGIC_RIFF {
        return Err(Sb16Error::NotWave);
    }

    if field_u16(header, FORMAT_OFF) != FORMAT_PCM {
        return Err(Sb16Error::Compressed);
    }

    if field_u16(header, CHANNELS_OFF) != CHANNELS_STEREO
        || field_u16(header, BPS_OFF) != BITS_PER_SAMPLE
    {
        return Err(Sb16Error::Unsupported);
    }

    Ok(field_u16(header, RATE_OFF))
}

#[cfg(test)]
pub(crate) fn make_header(magic: &[u8; 4], format: u16, channels: u16, rate: u16, bps: u16) -> [u8; HEADER_LEN] {
    let mut h = [0u8; HEADER_LEN];
    h[MAGIC_OFF..MAGIC_OFF + 4].copy_from_slice(magic);
    h[FORMAT_OFF..FORMAT_OFF + 2].copy_from_slice(&format.to_le_bytes());
    h[CHANNELS_OFF..CHANNELS_OFF + 2].copy_from_slice(&channels.to_le_bytes());
    h[RATE_OFF..RATE_OFF + 2].copy_from_slice(&rate.to_le_bytes());
    h[BPS_OFF..BPS_OFF + 2].copy_from_slice(&bps.to_le_bytes());
    h
}
