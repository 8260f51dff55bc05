use crate::cpu::InterruptType;
use crate::host::Host;
use crate::memory::ioregisters::IoRegister;
use crate::memory::Bus;

// DIV advances at 16384 Hz: once every 256 master clock cycles.
const DIV_PERIOD: u32 = 256;

pub(crate) const TAC_ENABLE: u8 = 0x04;
pub(crate) const TAC_RATE_MASK: u8 = 0x03;

// TIMA period per TAC rate select: 4096 Hz, 262144 Hz, 65536 Hz, 16384 Hz.
pub(crate) const TAC_PERIODS: [u32; 4] = [1024, 16, 64, 256];

#[derive(Debug, Clone)]
pub(crate) struct TimerCounters {
    pub div_count: u32,
    pub tima_count: u32,
}

impl TimerCounters {
    pub fn new() -> Self {
        Self {
            div_count: 0,
            tima_count: 0,
        }
    }
}

pub(crate) fn advance_divider<H: Host>(bus: &mut Bus<H>, cycles: u32) {
    bus.timer.div_count += cycles;
    while bus.timer.div_count >= DIV_PERIOD {
        bus.timer.div_count -= DIV_PERIOD;
        let div = bus.io.read_register(IoRegister::DIV);
        bus.io.write_register(IoRegister::DIV, div.wrapping_add(1));
    }
}

pub(crate) fn advance_tima<H: Host>(bus: &mut Bus<H>, cycles: u32) {
    let tac = bus.io.read_register(IoRegister::TAC);
    if tac & TAC_ENABLE == 0 {
        return;
    }

    let period = TAC_PERIODS[usize::from(tac & TAC_RATE_MASK)];

    bus.timer.tima_count += cycles;
    while bus.timer.tima_count >= period {
        bus.timer.tima_count -= period;

        let tima = bus.io.read_register(IoRegister::TIMA).wrapping_add(1);
        if tima == 0 {
            let tma = bus.io.read_register(IoRegister::TMA);
            bus.io.write_register(IoRegister::TIMA, tma);
            bus.io.request_interrupt(InterruptType::Timer);
        } else {
            bus.io.write_register(IoRegister::TIMA, tima);
        }
    }
}
