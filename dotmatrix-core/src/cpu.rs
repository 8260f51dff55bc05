pub(crate) mod instructions;
pub(crate) mod registers;


use crate::host::Host;
use crate::memory::ioregisters::IoRegister;
use crate::memory::Bus;
use crate::ppu::{self, PpuMode};
use crate::serial;
use crate::timer;
use crate::RunError;

pub(crate) use registers::CpuRegisters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptType {
    VBlank,
    LcdStatus,
    Timer,
    Serial,
    Joypad,
}

impl InterruptType {
    pub fn bit(self) -> u8 {
        match self {
            Self::VBlank => 0x01,
            Self::LcdStatus => 0x02,
            Self::Timer => 0x04,
            Self::Serial => 0x08,
            Self::Joypad => 0x10,
        }
    }

    pub fn handler_address(self) -> u16 {
        match self {
            Self::VBlank => 0x0040,
            Self::LcdStatus => 0x0048,
            Self::Timer => 0x0050,
            Self::Serial => 0x0058,
            Self::Joypad => 0x0060,
        }
    }

    /// The lowest-numbered interrupt set in a pending mask, which is the
    /// one the CPU services first.
    fn highest_priority(pending: u8) -> Option<Self> {
        [
            Self::VBlank,
            Self::LcdStatus,
            Self::Timer,
            Self::Serial,
            Self::Joypad,
        ]
        .into_iter()
        .find(|interrupt| pending & interrupt.bit() != 0)
    }
}

/// Execute one CPU step: service a pending interrupt, run one instruction,
/// then bring every peripheral up to date with the cycles it consumed.
/// While halted, time is fast-forwarded to the next peripheral event until
/// an interrupt becomes pending.
pub(crate) fn step<H: Host>(bus: &mut Bus<H>, registers: &mut CpuRegisters) -> Result<(), RunError> {
    service_interrupts(bus, registers);

    let pc = registers.pc;
    let (instruction, next_pc) = instructions::parse_next_instruction(bus, pc)
        .map_err(|err| RunError::InvalidOpcode {
            opcode: err.opcode,
            pc,
        })?;

    let cycles = instruction.cycles_required(registers);
    registers.pc = next_pc;
    instruction.execute(bus, registers);

    advance_peripherals(bus, cycles);

    while registers.halted && bus.io.pending_interrupts() == 0 {
        // A halted CPU with no enabled interrupts would otherwise spin
        // forever; give control back to the host at the frame boundary.
        if bus.ppu.frame_ready && bus.io.ie() & 0x1F == 0 {
            break;
        }

        let skip = halt_skip_cycles(bus);
        advance_peripherals(bus, skip);
    }

    Ok(())
}

fn service_interrupts<H: Host>(bus: &mut Bus<H>, registers: &mut CpuRegisters) {
    let pending = bus.io.pending_interrupts();
    if !registers.halted && !(registers.ime && pending != 0) {
        return;
    }

    // Any pending interrupt releases HALT, whether or not it dispatches.
    registers.halted = false;

    if !registers.ime || pending == 0 {
        return;
    }

    registers.ime = false;
    let return_address = registers.pc;
    instructions::push_stack(bus, registers, return_address);

    // Re-read the pending set: the PC push itself may have landed on IF or
    // IE.
    let pending = bus.io.pending_interrupts();
    if let Some(interrupt) = InterruptType::highest_priority(pending) {
        bus.io.clear_interrupt_flag(interrupt);
        registers.pc = interrupt.handler_address();
    }
}

/// One pass over every cycle-driven subsystem, in a fixed order: DIV, RTC,
/// serial, TIMA, then the LCD. Interrupt flags raised here are observed by
/// the next step's dispatch.
fn advance_peripherals<H: Host>(bus: &mut Bus<H>, cycles: u32) {
    timer::advance_divider(bus, cycles);
    bus.mapper.tick_rtc(cycles);
    serial::advance(bus, cycles);
    timer::advance_tima(bus, cycles);
    ppu::advance(bus, cycles);
}

/// How far a halted CPU can jump forward in one go: the distance to the
/// nearest upcoming peripheral event, and no less than 4 cycles.
fn halt_skip_cycles<H: Host>(bus: &mut Bus<H>) -> u32 {
    let mut skip = ppu::FRAME_CYCLES;

    if bus.io.read_register(IoRegister::SC) & serial::SC_TRANSFER_START != 0 {
        skip = skip.min(serial::TRANSFER_CYCLES.saturating_sub(bus.serial.count));
    }

    let tac = bus.io.read_register(IoRegister::TAC);
    if tac & timer::TAC_ENABLE != 0 {
        let period = timer::TAC_PERIODS[usize::from(tac & timer::TAC_RATE_MASK)];
        skip = skip.min(period.saturating_sub(bus.timer.tima_count));
    }

    if bus.io.read_register(IoRegister::LCDC) & ppu::LCDC_ENABLE != 0 {
        let boundary = match PpuMode::from_stat(bus.io.read_register(IoRegister::STAT)) {
            PpuMode::OamScan => ppu::OAM_SCAN_END,
            PpuMode::Draw => ppu::DRAW_END,
            PpuMode::HBlank | PpuMode::VBlank => ppu::LINE_CYCLES,
        };
        skip = skip.min(boundary.saturating_sub(bus.ppu.lcd_count));
    }

    skip.max(4)
}
