//! DSP command channel.
//!
//! The DSP speaks over a handful of fixed ports at base `0x220`: commands
//! and data go in through the write port, replies come back through the read
//! port, and two status ports gate both directions with a ready bit. All
//! waits are polled - the device answers within microseconds, and a hung
//! card simply blocks the caller (acceptable for a jumpered ISA device).
//!
//! The one bounded wait is the reset handshake: the card must cough up
//! `0xAA` within [`WAIT_LOOP`] polls or init reports the hardware missing.

use crate::bus::{hi_byte, lo_byte, PortBus};
use crate::error::{Result, Sb16Error};

/// Card base address (jumpered/ISA-PnP default).
pub const DSP_BASE: u16 = 0x220;

/// Reset strobe port.
pub const PORT_RESET: u16 = DSP_BASE + 0x06;
/// Data read port.
pub const PORT_READ_DATA: u16 = DSP_BASE + 0x0A;
/// Command/data write port (doubles as write-status when read).
pub const PORT_WRITE: u16 = DSP_BASE + 0x0C;
/// Read-buffer status port.
pub const PORT_READ_STATUS: u16 = DSP_BASE + 0x0E;
/// Reading this acknowledges a 16-bit transfer IRQ.
pub const PORT_IRQ_ACK16: u16 = DSP_BASE + 0x0F;

/// Ready bit in both status ports.
const STATUS_READY: u8 = 0x80;

/// Byte the DSP returns once reset completes.
pub const RESET_MAGIC: u8 = 0xAA;

/// Spin iterations between the two reset strobes.
pub const DELAY_ITERS: u32 = 1 << 16;

/// Status polls allowed for the reset magic to appear.
pub const WAIT_LOOP: u32 = 0x1000;

// ═══════════════════════════════════════════════════════════════════════════
// COMMANDS
// ═══════════════════════════════════════════════════════════════════════════

/// Set output sample rate.
pub const CMD_OUTPUT_RATE: u8 = 0x41;
/// 16-bit auto-init block output.
pub const CMD_BLOCK_OUT_16: u8 = 0xB6;
/// Transfer mode: stereo, signed samples.
pub const MODE_STEREO_SIGNED: u8 = 0x30;

// ═══════════════════════════════════════════════════════════════════════════
// CHANNEL PRIMITIVES
// ═══════════════════════════════════════════════════════════════════════════

/// Read one byte from the DSP, polling until it has one.
pub fn read<B: PortBus>(bus: &B) -> u8 {
    while bus.read8(PORT_READ_STATUS) & STATUS_READY == 0 {
        core::hint::spin_loop();
    }
    bus.read8(PORT_READ_DATA)
}

/// Write one command/data byte, polling until the DSP will take it.
///
/// The write port reads back as write-status; ready means the bit is clear.
pub fn write<B: PortBus>(bus: &B, byte: u8) {
    while bus.read8(PORT_WRITE) & STATUS_READY != 0 {
        core::hint::spin_loop();
    }
    bus.write8(PORT_WRITE, byte);
}

/// Reset the DSP.
///
/// Strobe the reset port high, hold, strobe low, then wait for the `0xAA`
/// magic. Succeeds iff the magic shows up within [`WAIT_LOOP`] status
/// polls. Reset also silences any running auto-init transfer, which is why
/// shutdown reuses it.
pub fn reset<B: PortBus>(bus: &B) -> Result<()> {
    bus.write8(PORT_RESET, 1);
    bus.io_delay(DELAY_ITERS);
    bus.write8(PORT_RESET, 0);

    for _ in 0..WAIT_LOOP {
        if bus.read8(PORT_READ_STATUS) & STATUS_READY != 0
            && bus.read8(PORT_READ_DATA) == RESET_MAGIC
        {
            return Ok(());
        }
    }
    Err(Sb16Error::HardwareNotResponding)
}

/// Program sample rate, transfer command/mode and block length.
///
/// The sample-rate register takes **high byte then low byte** - opposite to
/// the DMA controller's latches. The block length (in bytes, minus one) is
/// low then high. Mixing these up produces garbage audio, not an error.
pub fn program<B: PortBus>(bus: &B, sample_rate: u16, block_len: u16) {
    write(bus, CMD_OUTPUT_RATE);
    write(bus, hi_byte(sample_rate));
    write(bus, lo_byte(sample_rate));

    write(bus, CMD_BLOCK_OUT_16);
    write(bus, MODE_STEREO_SIGNED);
    write(bus, lo_byte(block_len));
    write(bus, hi_byte(block_len));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testbus::FakeCard;

    #[test]
    fn test_reset_sees_magic() {
        let card = FakeCard::alive();
        assert!(reset(&card).is_ok());
        // Strobe high then low on the reset port
        assert_eq!(card.writes_to(PORT_RESET), [1, 0]);
    }

    #[test]
    fn test_reset_times_out_on_dead_card() {
        let card = FakeCard::dead();
        assert_eq!(reset(&card).unwrap_err(), Sb16Error::HardwareNotResponding);
        // Bounded: one status poll per iteration, no data reads
        assert_eq!(card.reads_of(PORT_READ_STATUS), WAIT_LOOP as usize);
        assert_eq!(card.reads_of(PORT_READ_DATA), 0);
    }

    #[test]
    fn test_program_command_stream_44100() {
        let card = FakeCard::alive();
        program(&card, 44100, 0x7FFF);
        assert_eq!(
            card.writes_to(PORT_WRITE),
            [0x41, 0xAC, 0x44, 0xB6, 0x30, 0xFF, 0x7F]
        );
    }

    #[test]
    fn test_rate_is_big_endian_block_len_little() {
        let card = FakeCard::alive();
        program(&card, 0x1234, 0xABCD);
        assert_eq!(
            card.writes_to(PORT_WRITE),
            [CMD_OUTPUT_RATE, 0x12, 0x34, CMD_BLOCK_OUT_16, MODE_STEREO_SIGNED, 0xCD, 0xAB]
        );
    }

    #[test]
    fn test_write_polls_until_ready() {
        let card = FakeCard::alive();
        card.stall_write_status(3);
        write(&card, 0xD1);
        assert_eq!(card.reads_of(PORT_WRITE), 4);
        assert_eq!(card.writes_to(PORT_WRITE), [0xD1]);
    }

    #[test]
    fn test_read_returns_data_byte() {
        let card = FakeCard::alive();
        card.queue_dsp_reply(0x42);
        assert_eq!(read(&card), 0x42);
    }
}
