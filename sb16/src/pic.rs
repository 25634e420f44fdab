//! 8259 PIC plumbing for the card's IRQ line.
//!
//! Only what the driver needs: unmask/mask one line and signal end of
//! interrupt. Mask updates read-modify-write the data ports instead of
//! caching, so the driver never fights the kernel over mask state.

use crate::bus::PortBus;

/// PIC1 (master) command port.
const PIC1_COMMAND: u16 = 0x20;
/// PIC1 (master) data port.
const PIC1_DATA: u16 = 0x21;
/// PIC2 (slave) command port.
const PIC2_COMMAND: u16 = 0xA0;
/// PIC2 (slave) data port.
const PIC2_DATA: u16 = 0xA1;

/// End of interrupt command.
const PIC_EOI: u8 = 0x20;

/// Slave cascade line on the master.
const CASCADE_IRQ: u8 = 2;

/// Unmask an IRQ line (0..16).
pub fn unmask_irq<B: PortBus>(bus: &B, irq: u8) {
    if irq < 8 {
        let mask = bus.read8(PIC1_DATA);
        bus.write8(PIC1_DATA, mask & !(1 << irq));
    } else if irq < 16 {
        // Slave lines also need the cascade open on the master
        let mask = bus.read8(PIC1_DATA);
        if mask & (1 << CASCADE_IRQ) != 0 {
            bus.write8(PIC1_DATA, mask & !(1 << CASCADE_IRQ));
        }
        let mask = bus.read8(PIC2_DATA);
        bus.write8(PIC2_DATA, mask & !(1 << (irq - 8)));
    }
}

/// Mask an IRQ line (0..16).
pub fn mask_irq<B: PortBus>(bus: &B, irq: u8) {
    if irq < 8 {
        let mask = bus.read8(PIC1_DATA);
        bus.write8(PIC1_DATA, mask | (1 << irq));
    } else if irq < 16 {
        let mask = bus.read8(PIC2_DATA);
        bus.write8(PIC2_DATA, mask | (1 << (irq - 8)));
    }
}

/// Send end-of-interrupt for an IRQ line.
///
/// Slave lines acknowledge both controllers; master lines acknowledge the
/// master only.
pub fn send_eoi<B: PortBus>(bus: &B, irq: u8) {
    if irq >= 8 {
        bus.write8(PIC2_COMMAND, PIC_EOI);
    }
    bus.write8(PIC1_COMMAND, PIC_EOI);
}
