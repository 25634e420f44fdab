//! ISA DMA programmer (8237, 16-bit channel 5).
//!
//! One-shot programming of the playback channel. The base-address and count
//! registers are eight bits wide on the wire; a flip-flop inside the
//! controller latches low byte then high byte, so the register writes must
//! land in exactly the order below - any reorder corrupts the transfer
//! silently. Clearing the flip-flop first forces the latch to a known
//! state.

use crate::bus::{hi_byte, lo_byte, PortBus};

/// Channel mask register (channels 4-7).
pub const PORT_MASK: u16 = 0xD4;
/// Mode register.
pub const PORT_MODE: u16 = 0xD6;
/// Any write clears the low/high flip-flop.
pub const PORT_FLIPFLOP: u16 = 0xD8;
/// Channel 5 base address (word offset, low then high).
pub const PORT_BASE_ADDR: u16 = 0xC4;
/// Channel 5 transfer count (low then high).
pub const PORT_COUNT: u16 = 0xC6;
/// Channel 5 page register (address bits 16..24).
pub const PORT_PAGE: u16 = 0x8B;

/// Auto-init, single mode, read transfer (memory -> card).
pub const MODE_AUTO_SINGLE_READ: u8 = 0x58;
/// Freeze channel 5.
pub const MASK_STOP: u8 = 0x05;
/// Unfreeze channel 5.
pub const MASK_START: u8 = 0x01;

/// Program the playback channel.
///
/// `offset16` is the buffer's physical address shifted right by one, modulo
/// 2^16 (the 16-bit channel counts words). `count16` is the transfer length
/// in bytes minus one. `page8` is bits 16..24 of the physical address.
///
/// The channel stays frozen until the final unmask, so the DSP can be
/// programmed between this call and the first sample fetch.
pub fn program<B: PortBus>(bus: &B, offset16: u16, count16: u16, page8: u8) {
    // Freeze the channel before touching its registers
    bus.write8(PORT_MASK, MASK_STOP);

    // Force the byte latch to "low byte next"
    bus.write8(PORT_FLIPFLOP, 0);

    bus.write8(PORT_MODE, MODE_AUTO_SINGLE_READ);

    bus.write8(PORT_BASE_ADDR, lo_byte(offset16));
    bus.write8(PORT_BASE_ADDR, hi_byte(offset16));

    bus.write8(PORT_COUNT, lo_byte(count16));
    bus.write8(PORT_COUNT, hi_byte(count16));

    bus.write8(PORT_PAGE, page8);

    // Unfreeze - must be the last DMA write
    bus.write8(PORT_MASK, MASK_START);
}
