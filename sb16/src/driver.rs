//! Driver state machine and IRQ handler body.
//!
//! Two states. `Idle`: DMA channel masked, DSP quiescent, nobody holds the
//! card. `Armed`: DSP in 16-bit auto-init output mode, DMA channel ticking
//! through the ring, IRQ 5 live. `init` moves Idle -> Armed, `shutdown`
//! moves back.
//!
//! # Steady-state contract
//!
//! The phase flag is toggled only by [`Sb16::handle_irq`], which the kernel
//! enters with interrupts disabled. The producer polls [`Sb16::status`] and
//! refills the half whose index equals the value it reads; the DMA engine is
//! draining the other half. On a uniprocessor no further synchronization is
//! needed; the atomics give a multiprocessor port the fences it would need.
//!
//! The control mutex serializes `init`/`shutdown` between producers only.
//! The IRQ path never takes it - a handler that can block is a wedged
//! machine.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use dma_ring::PlaybackRing;
use spin::Mutex;

use crate::bus::PortBus;
use crate::error::{Result, Sb16Error};
use crate::{dma, dsp, pic, wav};

/// The card's jumpered IRQ line.
pub const SB16_IRQ: u8 = 5;

/// One half of the playback ring (the DSP block length).
pub const HALF_LEN: usize = dma_ring::HALF_SIZE;

/// Whole playback ring.
pub const RING_LEN: usize = dma_ring::RING_SIZE;

/// Phase value the producer sees before the first IRQ.
pub const PHASE_INITIAL: u8 = 1;

/// SB16 playback driver.
///
/// Owns the port bus and the playback ring for the lifetime of the process.
/// All methods take `&self`; the mutable state is the two atomic flags, so
/// the IRQ handler needs no lock and no exclusive borrow.
pub struct Sb16<B: PortBus> {
    bus: B,
    ring: PlaybackRing,
    /// Single-client exclusion flag. True iff the card is armed.
    in_use: AtomicBool,
    /// Which ring half the producer should refill next (0 or 1).
    phase: AtomicU8,
    /// Serializes bring-up and shutdown between producers.
    ctl: Mutex<()>,
}

impl<B: PortBus> Sb16<B> {
    /// Build an idle driver over a bus and a claimed ring.
    pub fn new(bus: B, ring: PlaybackRing) -> Self {
        Self {
            bus,
            ring,
            in_use: AtomicBool::new(false),
            phase: AtomicU8::new(PHASE_INITIAL),
            ctl: Mutex::new(()),
        }
    }

    /// Bring the card up for playback (Idle -> Armed).
    ///
    /// Validates the 44-byte waveform header, resets the DSP, programs the
    /// DMA channel over the whole ring and the DSP for half-ring auto-init
    /// blocks, then marks the card armed. Returns the ring's virtual base;
    /// the producer writes PCM there.
    ///
    /// Every failure leaves the driver idle. A second client gets `Busy`
    /// without a single port access.
    pub fn init(&self, header: &[u8]) -> Result<*mut u8> {
        let _ctl = self.ctl.lock();

        if self.in_use.load(Ordering::Acquire) {
            return Err(Sb16Error::Busy);
        }

        // The handler must already be installed; open the line before the
        // card can latch a block-completion interrupt.
        pic::unmask_irq(&self.bus, SB16_IRQ);

        dsp::reset(&self.bus)?;

        let sample_rate = wav::parse(header)?;

        dma::program(
            &self.bus,
            self.ring.isa_offset16(),
            (RING_LEN - 1) as u16,
            self.ring.isa_page(),
        );

        // DSP last: the block command arms the transfer, and the DMA
        // channel is already unmasked and waiting on the card's requests.
        dsp::program(&self.bus, sample_rate, (HALF_LEN - 1) as u16);

        self.phase.store(PHASE_INITIAL, Ordering::Release);
        self.in_use.store(true, Ordering::Release);

        Ok(self.ring.virt_base())
    }

    /// Current phase flag. Wait-free; never touches hardware.
    #[inline]
    pub fn status(&self) -> u8 {
        self.phase.load(Ordering::Acquire)
    }

    /// Whether a client currently holds the card.
    #[inline]
    pub fn in_use(&self) -> bool {
        self.in_use.load(Ordering::Acquire)
    }

    /// Stop playback and release the card (Armed -> Idle).
    ///
    /// Resetting the DSP also kills the running auto-init transfer, so no
    /// separate DMA teardown is needed. Idempotent: shutting down an idle
    /// driver just re-resets and leaves the flags where they were going.
    pub fn shutdown(&self) {
        let _ctl = self.ctl.lock();

        // A dead card stays dead; nothing useful to do with the error here.
        let _ = dsp::reset(&self.bus);

        self.in_use.store(false, Ordering::Release);
        self.phase.store(PHASE_INITIAL, Ordering::Release);
    }

    /// IRQ handler body. Entered with interrupts disabled.
    ///
    /// Toggles the phase flag, reads the 16-bit acknowledge port (skipping
    /// this wedges the card - its IRQ latch never clears), and signals end
    /// of interrupt. Wait-free: one flag toggle, one ack read, one EOI
    /// write, no allocation, no locking. Harmless if it fires before
    /// `init` has finished arming.
    pub fn handle_irq(&self) {
        self.phase.fetch_xor(1, Ordering::AcqRel);
        let _ = self.bus.read8(dsp::PORT_IRQ_ACK16);
        pic::send_eoi(&self.bus, SB16_IRQ);
    }

    /// The playback ring.
    #[inline]
    pub fn ring(&self) -> &PlaybackRing {
        &self.ring
    }

    /// The underlying port bus.
    #[inline]
    pub fn bus(&self) -> &B {
        &self.bus
    }
}
