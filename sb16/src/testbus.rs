//! Scripted ISA bus for driver tests.
//!
//! Records every port access and plays the card's side of the handshakes:
//! reset produces the ready magic (unless the card is "dead"), the status
//! ports report ready, the PIC mask registers read back what was written.

use std::boxed::Box;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::vec::Vec;

use dma_ring::{PlaybackRing, RING_SIZE};

use crate::bus::PortBus;
use crate::dsp;

/// One recorded port access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Rd(u16, u8),
    Wr(u16, u8),
}

const DMA_PORTS: [u16; 6] = [0xD4, 0xD6, 0xD8, 0xC4, 0xC6, 0x8B];

pub struct FakeCard {
    alive: bool,
    trace: RefCell<Vec<IoOp>>,
    dsp_replies: RefCell<VecDeque<u8>>,
    write_stall: Cell<u32>,
    pic1_mask: Cell<u8>,
    pic2_mask: Cell<u8>,
}

impl FakeCard {
    /// A card that answers its reset handshake.
    pub fn alive() -> Self {
        Self::with_health(true)
    }

    /// A card that never becomes ready (reset times out).
    pub fn dead() -> Self {
        Self::with_health(false)
    }

    fn with_health(alive: bool) -> Self {
        Self {
            alive,
            trace: RefCell::new(Vec::new()),
            dsp_replies: RefCell::new(VecDeque::new()),
            write_stall: Cell::new(0),
            pic1_mask: Cell::new(0xFF),
            pic2_mask: Cell::new(0xFF),
        }
    }

    /// Report "busy" from write-status for the next `n` polls.
    pub fn stall_write_status(&self, n: u32) {
        self.write_stall.set(n);
    }

    /// Queue a byte the DSP data port returns ahead of its default.
    pub fn queue_dsp_reply(&self, byte: u8) {
        self.dsp_replies.borrow_mut().push_back(byte);
    }

    fn port_value(&self, port: u16) -> u8 {
        match port {
            dsp::PORT_READ_STATUS => {
                if self.alive {
                    0x80
                } else {
                    0x00
                }
            }
            dsp::PORT_READ_DATA => self
                .dsp_replies
                .borrow_mut()
                .pop_front()
                .unwrap_or(if self.alive { dsp::RESET_MAGIC } else { 0x00 }),
            dsp::PORT_WRITE => {
                // Read as write-status: 0x80 while busy
                let stall = self.write_stall.get();
                if stall > 0 {
                    self.write_stall.set(stall - 1);
                    0x80
                } else {
                    0x00
                }
            }
            0x21 => self.pic1_mask.get(),
            0xA1 => self.pic2_mask.get(),
            _ => 0x00,
        }
    }

    /// Full access trace since the last clear.
    pub fn ops(&self) -> Vec<IoOp> {
        self.trace.borrow().clone()
    }

    /// Accesses to the DMA controller's ports only.
    pub fn dma_ops(&self) -> Vec<IoOp> {
        self.trace
            .borrow()
            .iter()
            .filter(|op| {
                let (IoOp::Rd(p, _) | IoOp::Wr(p, _)) = op;
                DMA_PORTS.contains(p)
            })
            .copied()
            .collect()
    }

    /// Values written to one port, in order.
    pub fn writes_to(&self, port: u16) -> Vec<u8> {
        self.trace
            .borrow()
            .iter()
            .filter_map(|op| match op {
                IoOp::Wr(p, v) if *p == port => Some(*v),
                _ => None,
            })
            .collect()
    }

    /// Number of reads of one port.
    pub fn reads_of(&self, port: u16) -> usize {
        self.trace
            .borrow()
            .iter()
            .filter(|op| matches!(op, IoOp::Rd(p, _) if *p == port))
            .count()
    }

    pub fn clear_trace(&self) {
        self.trace.borrow_mut().clear();
    }
}

impl PortBus for FakeCard {
    fn read8(&self, port: u16) -> u8 {
        let value = self.port_value(port);
        self.trace.borrow_mut().push(IoOp::Rd(port, value));
        value
    }

    fn write8(&self, port: u16, value: u8) {
        match port {
            0x21 => self.pic1_mask.set(value),
            0xA1 => self.pic2_mask.set(value),
            _ => {}
        }
        self.trace.borrow_mut().push(IoOp::Wr(port, value));
    }

    // Instant on the fake; the real delay only serves reset timing.
    fn io_delay(&self, _iters: u32) {}
}

/// A host-side playback ring with a deterministic fake physical address
/// (0x40000: word offset 0, page 4).
pub fn test_ring() -> PlaybackRing {
    #[repr(C, align(65536))]
    struct Backing([u8; RING_SIZE]);

    let backing: &'static mut Backing = Box::leak(Box::new(Backing([0u8; RING_SIZE])));
    unsafe { PlaybackRing::from_raw(backing.0.as_mut_ptr(), 0x40000, RING_SIZE) }.unwrap()
}
