use crate::cpu::InterruptType;
use crate::host::Host;
use crate::memory::ioregisters::IoRegister;
use crate::memory::Bus;

// One whole byte takes 4096 cycles at the 8192 Hz internal clock.
pub(crate) const TRANSFER_CYCLES: u32 = 4096;

pub(crate) const SC_TRANSFER_START: u8 = 0x80;
pub(crate) const SC_INTERNAL_CLOCK: u8 = 0x01;

#[derive(Debug, Clone)]
pub(crate) struct SerialCounter {
    pub count: u32,
}

impl SerialCounter {
    pub fn new() -> Self {
        Self { count: 0 }
    }
}

/// Count down an in-flight transfer while SC bit 7 is set.
///
/// The outgoing byte is handed to the host when the transfer starts. When
/// the byte time elapses the incoming byte replaces SB: either the host's
/// byte, or 0xFF on an internally clocked transfer with no partner. An
/// externally clocked transfer with no partner never completes and leaves
/// SB alone.
pub(crate) fn advance<H: Host>(bus: &mut Bus<H>, cycles: u32) {
    let sc = bus.io.read_register(IoRegister::SC);
    if sc & SC_TRANSFER_START == 0 {
        return;
    }

    if bus.serial.count == 0 {
        let sb = bus.io.read_register(IoRegister::SB);
        bus.host.serial_tx(sb);
    }

    bus.serial.count += cycles;

    if bus.serial.count >= TRANSFER_CYCLES {
        match bus.host.serial_rx() {
            Some(received) => {
                bus.io.write_register(IoRegister::SB, received);
                bus.io.write_register(IoRegister::SC, sc & SC_INTERNAL_CLOCK);
                bus.io.request_interrupt(InterruptType::Serial);
            }
            None if sc & SC_INTERNAL_CLOCK != 0 => {
                // Nothing on the other end of the cable shifts in logic 1.
                bus.io.write_register(IoRegister::SB, 0xFF);
                bus.io.write_register(IoRegister::SC, sc & SC_INTERNAL_CLOCK);
                bus.io.request_interrupt(InterruptType::Serial);
            }
            None => {}
        }

        bus.serial.count = 0;
    }
}
