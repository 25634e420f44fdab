//! Byte-wide port I/O.
//!
//! Everything the driver says to the hardware goes through [`PortBus`], so
//! the DSP/DMA/PIC sequencing can be exercised on a host against a recording
//! fake. The real implementation is [`IsaBus`], a zero-sized wrapper around
//! `in`/`out`.

/// Byte-wide I/O port access.
///
/// Implementations take `&self`: the bare-metal bus is stateless, and the
/// driver's IRQ handler must be able to touch ports without any exclusive
/// borrow or lock.
pub trait PortBus {
    /// Read one byte from an I/O port.
    fn read8(&self, port: u16) -> u8;

    /// Write one byte to an I/O port.
    fn write8(&self, port: u16, value: u8);

    /// Fixed-iteration busy wait.
    ///
    /// Only used to satisfy the DSP's reset timing; carries no ordering
    /// semantics. Do not convert to a sleeping wait - the device answers in
    /// microseconds.
    fn io_delay(&self, iters: u32) {
        for _ in 0..iters {
            core::hint::spin_loop();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// WORD SPLITTING
// ═══════════════════════════════════════════════════════════════════════════

/// Low byte of a 16-bit word.
#[inline]
pub const fn lo_byte(word: u16) -> u8 {
    (word & 0xFF) as u8
}

/// High byte of a 16-bit word.
#[inline]
pub const fn hi_byte(word: u16) -> u8 {
    (word >> 8) as u8
}

// ═══════════════════════════════════════════════════════════════════════════
// BARE-METAL BUS
// ═══════════════════════════════════════════════════════════════════════════

/// Real ISA port I/O.
///
/// Zero-sized; constructing one is free, so the IRQ path can make its own.
#[cfg(target_arch = "x86_64")]
#[derive(Clone, Copy, Default)]
pub struct IsaBus;

#[cfg(target_arch = "x86_64")]
impl PortBus for IsaBus {
    #[inline]
    fn read8(&self, port: u16) -> u8 {
        let value: u8;
        unsafe {
            core::arch::asm!(
                "in al, dx",
                in("dx") port,
                out("al") value,
                options(nostack, preserves_flags)
            );
        }
        value
    }

    #[inline]
    fn write8(&self, port: u16, value: u8) {
        unsafe {
            core::arch::asm!(
                "out dx, al",
                in("dx") port,
                in("al") value,
                options(nostack, preserves_flags)
            );
        }
    }
}
