//! Sound Blaster 16 playback driver.
//!
//! Plays uncompressed 16-bit stereo linear PCM through the card's DSP using
//! interrupt-driven double-buffered ISA DMA. The kernel wires three entry
//! points (`audio_init`, `audio_status`, `audio_shutdown`) plus the IRQ 5
//! handler; a user-space producer does the refilling.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       abi (singleton)                       │
//! │  audio_init / audio_status / audio_shutdown / audio_irq     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    driver::Sb16<B: PortBus>                 │
//! │  (state machine, half-buffer phase flag, IRQ handler body)  │
//! └──────────┬──────────────┬──────────────┬────────────────────┘
//!            │              │              │
//!            ▼              ▼              ▼
//! ┌─────────────────┐ ┌───────────┐ ┌─────────────────┐
//! │   dsp (0x220)   │ │ dma (8237)│ │   pic (8259)    │
//! │ reset, command  │ │ channel 5 │ │ unmask, EOI     │
//! └─────────────────┘ └───────────┘ └─────────────────┘
//!            │              │              │
//!            └──────────────┴──────────────┘
//!                           ▼
//!              bus::PortBus (in/out byte I/O)
//! ```
//!
//! # Steady state
//!
//! The DMA engine drains one 32 KiB half of the ring into the DSP while the
//! producer refills the other. On each block completion the card raises
//! IRQ 5; the handler toggles the phase flag; the producer observes the flip
//! via `audio_status` and refills the half the hardware just left.
//!
//! # Usage
//!
//! ```ignore
//! use sb16::abi;
//!
//! // At driver registration (before the IRQ line is unmasked):
//! abi::register()?;
//!
//! // Syscall glue:
//! let buf = abi::audio_init(header_ptr);
//! let phase = abi::audio_status();
//! abi::audio_shutdown();
//!
//! // IRQ dispatch glue (interrupts already disabled):
//! abi::audio_irq();
//! ```

#![no_std]
#![allow(dead_code)]

#[cfg(test)]
extern crate std;

pub mod bus;
pub mod dma;
pub mod driver;
pub mod dsp;
pub mod error;
pub mod feed;
pub mod pic;
pub mod wav;

#[macro_use]
pub mod debug;

#[cfg(target_arch = "x86_64")]
pub mod abi;

#[cfg(test)]
pub(crate) mod testbus;

// ═══════════════════════════════════════════════════════════════════════════
// RE-EXPORTS
// ═══════════════════════════════════════════════════════════════════════════

pub use bus::{lo_byte, hi_byte, PortBus};
pub use driver::{Sb16, HALF_LEN, RING_LEN, PHASE_INITIAL, SB16_IRQ};
pub use error::{Result, Sb16Error};
pub use feed::WavFeeder;
pub use wav::HEADER_LEN;

#[cfg(target_arch = "x86_64")]
pub use bus::IsaBus;
