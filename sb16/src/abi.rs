//! Kernel-facing entry points.
//!
//! The syscall glue and the IRQ dispatch table bind to these four
//! functions. The driver instance is a process-wide singleton established
//! by [`register`]; the playback ring is claimed there once and never
//! reallocated across init/shutdown cycles.
//!
//! Return convention is the classic one: `audio_init` hands back the ring's
//! virtual base as a non-negative integer, `-1` on any failure (each
//! failure logs its own message over serial when `serial_debug` is on).

use dma_ring::{PlaybackRing, RingError};
use spin::Once;

use crate::bus::IsaBus;
use crate::driver::{Sb16, PHASE_INITIAL};
use crate::error::{Result, Sb16Error};
use crate::wav;

static DRIVER: Once<Sb16<IsaBus>> = Once::new();

/// Register the driver singleton.
///
/// Call exactly once at boot, after the IRQ 5 handler is installed in the
/// dispatch table and before any client can reach `audio_init`. Claims the
/// static playback ring; a second registration fails.
pub fn register() -> Result<&'static Sb16<IsaBus>> {
    let ring = PlaybackRing::claim_static().map_err(ring_error)?;
    Ok(DRIVER.call_once(|| Sb16::new(IsaBus, ring)))
}

fn ring_error(e: RingError) -> Sb16Error {
    match e {
        RingError::CrossesPage => Sb16Error::RingCrossesPage,
        _ => Sb16Error::RingUnavailable,
    }
}

/// The registered driver, if any.
pub fn driver() -> Option<&'static Sb16<IsaBus>> {
    DRIVER.get()
}

/// `audio_init` syscall: bring the card up from a 44-byte waveform header.
///
/// Returns the ring's virtual base address, or `-1`.
pub fn audio_init(header: *const u8) -> isize {
    let Some(drv) = DRIVER.get() else {
        sb_dbg!("audio_init before driver registration");
        return -1;
    };

    if header.is_null() {
        sb_dbg!(Sb16Error::NullHeader.as_str());
        return -1;
    }

    // SAFETY: non-null checked above; the syscall layer guarantees the
    // user buffer spans the full header.
    let block = unsafe { core::slice::from_raw_parts(header, wav::HEADER_LEN) };

    match drv.init(block) {
        Ok(base) => base as isize,
        Err(e) => {
            sb_dbg!(e.as_str());
            -1
        }
    }
}

/// `audio_status` syscall: current phase flag. Never blocks.
pub fn audio_status() -> isize {
    match DRIVER.get() {
        Some(drv) => drv.status() as isize,
        None => PHASE_INITIAL as isize,
    }
}

/// `audio_shutdown` syscall: stop playback, release the card. Always `0`.
pub fn audio_shutdown() -> isize {
    if let Some(drv) = DRIVER.get() {
        drv.shutdown();
    }
    0
}

/// IRQ 5 handler body. The kernel's dispatch trampoline has already saved
/// state and disabled interrupts; it restores and `iret`s after we return.
pub fn audio_irq() {
    if let Some(drv) = DRIVER.get() {
        drv.handle_irq();
    }
}
