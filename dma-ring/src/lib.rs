//! Static double buffer for legacy ISA DMA playback.
//!
//! The 8237 DMA controller addresses memory through a 16-bit base register
//! plus an 8-bit page register, so a transfer can never cross a 64 KiB
//! physical boundary. This crate provides a physically-contiguous 64 KiB
//! ring, aligned so the whole ring lives inside one DMA page, split into
//! two 32 KiB halves: the card drains one half while the producer refills
//! the other.
//!
//! # Design Philosophy
//!
//! - **Zero firmware dependencies**: compile-time storage, works anywhere
//!   memory is identity-mapped
//! - **No reallocation**: claimed once at driver registration, kept for the
//!   lifetime of the process
//! - **Address discipline**: raw pointers never leak; the ring hands out
//!   only its virtual base and its `(offset16, page8)` ISA decomposition
//!
//! # Usage
//!
//! ```ignore
//! use dma_ring::PlaybackRing;
//!
//! // Claim the built-in aligned storage (once per process)
//! let ring = PlaybackRing::claim_static()?;
//!
//! // Program the DMA controller
//! let offset = ring.isa_offset16();
//! let page = ring.isa_page();
//!
//! // Producer side: refill the idle half
//! ring.fill_half(phase, &pcm_chunk);
//! ```

#![no_std]
#![allow(dead_code)]

use core::sync::atomic::{AtomicBool, Ordering};

/// One buffer half (32 KiB).
pub const HALF_SIZE: usize = 32 * 1024;

/// Whole ring (two halves, 64 KiB).
pub const RING_SIZE: usize = 2 * HALF_SIZE;

/// ISA DMA page size. The page register supplies bits 16..24 of the
/// physical address, so a transfer is confined to one such page.
pub const ISA_PAGE_SIZE: usize = 64 * 1024;

// ============================================================================
// ISA address decomposition
// ============================================================================

/// Word offset programmed into the 16-bit channel's base-address register.
///
/// 16-bit DMA channels count in words, not bytes, hence the shift.
#[inline]
pub const fn isa_offset16(phys: usize) -> u16 {
    ((phys >> 1) % (1 << 16)) as u16
}

/// Value for the channel's page register (bits 16..24 of the address).
#[inline]
pub const fn isa_page8(phys: usize) -> u8 {
    ((phys >> 16) & 0xFF) as u8
}

/// Check whether `[base, base + len)` straddles a 64 KiB DMA page.
///
/// The hardware behavior for such a transfer is undefined; callers must
/// reject these regions.
#[inline]
pub const fn crosses_isa_page(base: usize, len: usize) -> bool {
    if len == 0 {
        return false;
    }
    (base / ISA_PAGE_SIZE) != ((base + len - 1) / ISA_PAGE_SIZE)
}

// ============================================================================
// Error types
// ============================================================================

/// Ring acquisition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// The static ring was already claimed.
    AlreadyClaimed,
    /// Region crosses a 64 KiB DMA page boundary.
    CrossesPage,
    /// Region is smaller than `RING_SIZE`.
    TooSmall,
    /// Null base pointer.
    NullRegion,
}

/// Result type for ring operations.
pub type Result<T> = core::result::Result<T, RingError>;

// ============================================================================
// Static storage
// ============================================================================

/// 64 KiB-aligned backing store. The alignment equals the ring length, so
/// the ring can never cross a DMA page boundary.
#[repr(C, align(65536))]
struct RingStorage {
    data: [u8; RING_SIZE],
}

static mut STORAGE: RingStorage = RingStorage {
    data: [0u8; RING_SIZE],
};

static CLAIMED: AtomicBool = AtomicBool::new(false);

// ============================================================================
// PlaybackRing
// ============================================================================

/// Handle to the playback double buffer.
///
/// Identity mapping is assumed (physical == virtual), as everywhere else in
/// the bare-metal environment. The handle is `Copy`-free on purpose: there
/// is exactly one ring and exactly one owner (the driver singleton).
#[derive(Debug)]
pub struct PlaybackRing {
    base: *mut u8,
    phys: usize,
    len: usize,
}

// SAFETY: access discipline is enforced by the driver (producer writes the
// idle half only, the DMA engine reads the active half).
unsafe impl Send for PlaybackRing {}
unsafe impl Sync for PlaybackRing {}

impl PlaybackRing {
    /// Claim the built-in static storage.
    ///
    /// Succeeds at most once per process; the storage is never handed back.
    pub fn claim_static() -> Result<Self> {
        if CLAIMED.swap(true, Ordering::SeqCst) {
            return Err(RingError::AlreadyClaimed);
        }

        // SAFETY: the swap above makes us the only claimant, and the
        // storage outlives the process.
        let base = unsafe { core::ptr::addr_of_mut!(STORAGE.data) as *mut u8 };
        Ok(Self {
            base,
            phys: base as usize,
            len: RING_SIZE,
        })
    }

    /// Build a ring over an externally-provided identity-mapped region.
    ///
    /// # Safety
    ///
    /// - `base` must point to at least `len` bytes of valid, physically
    ///   contiguous memory at physical address `phys`.
    /// - The region must not be used by anything else while the ring lives.
    pub unsafe fn from_raw(base: *mut u8, phys: usize, len: usize) -> Result<Self> {
        if base.is_null() {
            return Err(RingError::NullRegion);
        }
        if len < RING_SIZE {
            return Err(RingError::TooSmall);
        }
        if crosses_isa_page(phys, RING_SIZE) {
            return Err(RingError::CrossesPage);
        }
        Ok(Self {
            base,
            phys,
            len: RING_SIZE,
        })
    }

    /// Virtual base address, for producer writes.
    #[inline]
    pub fn virt_base(&self) -> *mut u8 {
        self.base
    }

    /// Physical base address.
    #[inline]
    pub fn phys_base(&self) -> usize {
        self.phys
    }

    /// Total ring length in bytes.
    #[inline]
    pub const fn total_len(&self) -> usize {
        RING_SIZE
    }

    /// Length of one half in bytes.
    #[inline]
    pub const fn half_len(&self) -> usize {
        HALF_SIZE
    }

    /// Word offset for the DMA base-address register.
    #[inline]
    pub fn isa_offset16(&self) -> u16 {
        isa_offset16(self.phys)
    }

    /// Value for the DMA page register.
    #[inline]
    pub fn isa_page(&self) -> u8 {
        isa_page8(self.phys)
    }

    /// Copy PCM data into half `0` or `1`, zero-filling the remainder.
    ///
    /// A short final chunk therefore plays out as silence past the end of
    /// the stream. Input longer than a half is truncated.
    pub fn fill_half(&self, half: u8, src: &[u8]) {
        let n = src.len().min(HALF_SIZE);
        // SAFETY: destination lies fully inside the ring; the producer only
        // calls this for the half the hardware is not draining.
        unsafe {
            let dst = self.base.add((half as usize & 1) * HALF_SIZE);
            core::ptr::copy_nonoverlapping(src.as_ptr(), dst, n);
            if n < HALF_SIZE {
                core::ptr::write_bytes(dst.add(n), 0, HALF_SIZE - n);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset16_is_word_offset() {
        assert_eq!(isa_offset16(0), 0);
        assert_eq!(isa_offset16(2), 1);
        assert_eq!(isa_offset16(0x10000), 0x8000);
        // Wraps modulo 2^16 words
        assert_eq!(isa_offset16(0x20000), 0);
        assert_eq!(isa_offset16(0x2_FFFE), 0x7FFF);
    }

    #[test]
    fn test_page8_is_high_byte() {
        assert_eq!(isa_page8(0), 0);
        assert_eq!(isa_page8(0x10000), 1);
        assert_eq!(isa_page8(0x23_0000), 0x23);
        assert_eq!(isa_page8(0x1_23_4567), 0x23);
    }

    #[test]
    fn test_page_crossing() {
        assert!(!crosses_isa_page(0, RING_SIZE));
        assert!(!crosses_isa_page(0x10000, RING_SIZE));
        assert!(crosses_isa_page(0x10001, RING_SIZE));
        assert!(crosses_isa_page(0x1FFFF, 2));
        assert!(!crosses_isa_page(0x1FFFF, 1));
        assert!(!crosses_isa_page(0x12345, 0));
    }

    #[test]
    fn test_static_storage_alignment() {
        let base = unsafe { core::ptr::addr_of!(STORAGE) as usize };
        assert_eq!(base % ISA_PAGE_SIZE, 0);
        assert!(!crosses_isa_page(base, RING_SIZE));
    }

    #[test]
    fn test_claim_static_is_one_shot() {
        let ring = PlaybackRing::claim_static().unwrap();
        assert_eq!(ring.total_len(), RING_SIZE);
        assert_eq!(ring.half_len(), HALF_SIZE);
        assert_eq!(ring.isa_offset16(), isa_offset16(ring.phys_base()));
        assert_eq!(ring.isa_page(), isa_page8(ring.phys_base()));
        assert_eq!(
            PlaybackRing::claim_static().unwrap_err(),
            RingError::AlreadyClaimed
        );
    }

    #[test]
    fn test_from_raw_validation() {
        let mut buf = AlignedBuf::new();
        let base = buf.0.as_mut_ptr();

        let ring = unsafe { PlaybackRing::from_raw(base, 0x40000, RING_SIZE) }.unwrap();
        assert_eq!(ring.isa_offset16(), 0);
        assert_eq!(ring.isa_page(), 4);

        let err = unsafe { PlaybackRing::from_raw(base, 0x40800, RING_SIZE) };
        assert_eq!(err.unwrap_err(), RingError::CrossesPage);

        let err = unsafe { PlaybackRing::from_raw(base, 0x40000, HALF_SIZE) };
        assert_eq!(err.unwrap_err(), RingError::TooSmall);

        let err = unsafe { PlaybackRing::from_raw(core::ptr::null_mut(), 0, RING_SIZE) };
        assert_eq!(err.unwrap_err(), RingError::NullRegion);
    }

    #[test]
    fn test_fill_half_pads_with_silence() {
        let mut buf = AlignedBuf::new();
        buf.0.fill(0xEE);
        let base = buf.0.as_mut_ptr();
        let ring = unsafe { PlaybackRing::from_raw(base, 0x80000, RING_SIZE) }.unwrap();

        let chunk = [0x11u8; 100];
        ring.fill_half(1, &chunk);

        assert_eq!(buf.0[0], 0xEE); // half 0 untouched
        assert_eq!(buf.0[HALF_SIZE], 0x11);
        assert_eq!(buf.0[HALF_SIZE + 99], 0x11);
        assert_eq!(buf.0[HALF_SIZE + 100], 0); // zero padded
        assert_eq!(buf.0[RING_SIZE - 1], 0);
    }

    /// Host-side stand-in for the identity-mapped region.
    #[repr(C, align(65536))]
    struct AlignedBuf([u8; RING_SIZE]);

    impl AlignedBuf {
        fn new() -> std::boxed::Box<Self> {
            std::boxed::Box::new(AlignedBuf([0u8; RING_SIZE]))
        }
    }
}

#[cfg(test)]
extern crate std;
