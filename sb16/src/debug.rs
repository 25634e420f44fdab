//! Serial debug output (COM1 @ 0x3F8).
//!
//! Compiled in only under the `serial_debug` feature; the default build
//! logs nothing and links nothing. No buffering, no interrupts, pure
//! polling with a bounded spin so a missing UART cannot hang the driver.

#[cfg(all(feature = "serial_debug", target_arch = "x86_64"))]
mod com1 {
    use crate::bus::{IsaBus, PortBus};

    const COM1: u16 = 0x3F8;
    const COM1_LSR: u16 = COM1 + 5;
    const LSR_TX_EMPTY: u8 = 0x20;

    /// Write byte to COM1. Gives up after ~100 spins.
    #[inline]
    pub fn putc(b: u8) {
        let bus = IsaBus;
        for _ in 0..100 {
            if bus.read8(COM1_LSR) & LSR_TX_EMPTY != 0 {
                bus.write8(COM1, b);
                return;
            }
            core::hint::spin_loop();
        }
    }

    /// Write string to COM1.
    pub fn puts(s: &str) {
        for b in s.bytes() {
            putc(b);
        }
    }
}

#[cfg(all(feature = "serial_debug", target_arch = "x86_64"))]
pub use com1::puts;

#[cfg(not(all(feature = "serial_debug", target_arch = "x86_64")))]
#[inline]
pub fn puts(_s: &str) {}

/// Debug log with [SB16] prefix.
#[allow(unused_macros)]
macro_rules! sb_dbg {
    ($msg:expr) => {{
        $crate::debug::puts("[SB16] ");
        $crate::debug::puts($msg);
        $crate::debug::puts("\n");
    }};
}
