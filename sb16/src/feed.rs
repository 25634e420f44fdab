//! Producer-side refill discipline.
//!
//! The driver only exposes the phase flag; actually keeping the ring fed is
//! the producer's job. This helper owns the stream position and implements
//! the steady-state loop: prime both halves before playback, then on each
//! observed phase flip copy the next chunk into the half the flag points
//! at. The caller supplies PCM bytes (file I/O stays outside the driver)
//! and shuts the card down when the feeder reports the stream exhausted.
//!
//! ```ignore
//! let mut feeder = WavFeeder::new(&pcm);
//! feeder.prime(drv.ring());
//! let mut last = drv.status();
//! loop {
//!     let phase = drv.status();
//!     if phase != last {
//!         last = phase;
//!         if !feeder.pump(drv.ring(), phase) {
//!             drv.shutdown();
//!             break;
//!         }
//!     }
//! }
//! ```

use dma_ring::{PlaybackRing, HALF_SIZE};

/// Streams a PCM slice into the playback ring, half by half.
pub struct WavFeeder<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> WavFeeder<'a> {
    /// Wrap a PCM stream (header already stripped).
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0 }
    }

    /// Fill both halves before starting playback.
    ///
    /// The hardware starts draining half 0 the moment the DSP block command
    /// lands, so both halves must hold data up front.
    pub fn prime(&mut self, ring: &PlaybackRing) {
        ring.fill_half(0, self.take_chunk());
        ring.fill_half(1, self.take_chunk());
    }

    /// Refill after a phase flip.
    ///
    /// `phase` is the value just read from the driver: the half the
    /// hardware stopped draining and the producer now owns. Returns `false`
    /// once the stream is exhausted - time to shut the card down.
    pub fn pump(&mut self, ring: &PlaybackRing, phase: u8) -> bool {
        if self.pos >= self.src.len() {
            return false;
        }
        ring.fill_half(phase, self.take_chunk());
        true
    }

    /// Bytes not yet handed to the ring.
    pub fn remaining(&self) -> usize {
        self.src.len() - self.pos
    }

    fn take_chunk(&mut self) -> &'a [u8] {
        let n = (self.src.len() - self.pos).min(HALF_SIZE);
        let chunk = &self.src[self.pos..self.pos + n];
        self.pos += n;
        chunk
    }
}
