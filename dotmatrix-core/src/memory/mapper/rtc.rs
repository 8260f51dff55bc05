use crate::CLOCK_FREQUENCY;
use serde::{Deserialize, Serialize};

// Writable bits of the five RTC registers (S, M, H, DL, DH).
const REGISTER_MASKS: [u8; 5] = [0x3F, 0x3F, 0x1F, 0xFF, 0xC1];

const DAY_HIGH_BIT_8: u8 = 0x01;
const DAY_HIGH_HALT: u8 = 0x40;
const DAY_HIGH_OVERFLOW: u8 = 0x80;

/// A broken-down time used to seed the clock, typically from the host's
/// wall clock when a save is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcTime {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    /// Day counter; only the low 9 bits are representable.
    pub days: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct RtcRegisters {
    seconds: u8,
    minutes: u8,
    hours: u8,
    days_low: u8,
    days_high: u8,
}

impl RtcRegisters {
    fn new() -> Self {
        Self {
            seconds: 0,
            minutes: 0,
            hours: 0,
            days_low: 0,
            days_high: 0,
        }
    }

    fn read(&self, index: u8) -> u8 {
        match index {
            0 => self.seconds,
            1 => self.minutes,
            2 => self.hours,
            3 => self.days_low,
            4 => self.days_high,
            _ => 0xFF,
        }
    }

    fn write(&mut self, index: u8, value: u8) {
        match index {
            0 => self.seconds = value & REGISTER_MASKS[0],
            1 => self.minutes = value & REGISTER_MASKS[1],
            2 => self.hours = value & REGISTER_MASKS[2],
            3 => self.days_low = value & REGISTER_MASKS[3],
            4 => self.days_high = value & REGISTER_MASKS[4],
            _ => {}
        }
    }
}

/// The MBC3 real-time clock: a live register set ticked from the emulated
/// master clock, and a latched copy that the game reads.
///
/// Hosts that want the clock to survive power cycles can persist this value
/// alongside cartridge RAM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealTimeClock {
    real: RtcRegisters,
    latched: RtcRegisters,
    #[serde(skip)]
    cycle_count: u32,
}

impl RealTimeClock {
    pub fn new() -> Self {
        Self {
            real: RtcRegisters::new(),
            latched: RtcRegisters::new(),
            cycle_count: 0,
        }
    }

    /// Advance the clock by the given number of master clock cycles. Does
    /// nothing while the halt bit is set.
    pub fn tick(&mut self, cycles: u32) {
        if self.real.days_high & DAY_HIGH_HALT != 0 {
            return;
        }

        self.cycle_count += cycles;
        while self.cycle_count >= CLOCK_FREQUENCY {
            self.cycle_count -= CLOCK_FREQUENCY;
            self.advance_second();
        }
    }

    fn advance_second(&mut self) {
        // The seconds and minutes registers can hold 60-63 if the game
        // wrote such a value; a roll out of the invalid range resets the
        // register without carrying.
        if self.real.seconds == 63 {
            self.real.seconds = 0;
            return;
        }
        self.real.seconds += 1;
        if self.real.seconds != 60 {
            return;
        }
        self.real.seconds = 0;

        if self.real.minutes == 63 {
            self.real.minutes = 0;
            return;
        }
        self.real.minutes += 1;
        if self.real.minutes != 60 {
            return;
        }
        self.real.minutes = 0;

        if self.real.hours == 31 {
            self.real.hours = 0;
            return;
        }
        self.real.hours += 1;
        if self.real.hours != 24 {
            return;
        }
        self.real.hours = 0;

        self.real.days_low = self.real.days_low.wrapping_add(1);
        if self.real.days_low != 0 {
            return;
        }

        // Day counter rolled past 0xFF: toggle bit 8, and if it was already
        // set, latch the sticky overflow bit.
        if self.real.days_high & DAY_HIGH_BIT_8 != 0 {
            self.real.days_high |= DAY_HIGH_OVERFLOW;
        }
        self.real.days_high ^= DAY_HIGH_BIT_8;
    }

    /// Copy the live registers into the latched set. Triggered by a 0-to-1
    /// edge on the MBC3 latch register.
    pub fn latch(&mut self) {
        self.latched = self.real;
    }

    /// Game-visible read of RTC register `index` (0-4). Reads come from the
    /// latched copy.
    pub fn register_read(&self, index: u8) -> u8 {
        self.latched.read(index)
    }

    /// Game-visible write of RTC register `index` (0-4). Writes go to the
    /// live registers through the per-register mask.
    pub fn register_write(&mut self, index: u8, value: u8) {
        self.real.write(index, value);
    }

    /// Load the live registers from a broken-down time.
    pub fn set_time(&mut self, time: &RtcTime) {
        self.real.seconds = time.seconds;
        self.real.minutes = time.minutes;
        self.real.hours = time.hours;
        self.real.days_low = (time.days & 0xFF) as u8;
        self.real.days_high = (time.days >> 8) as u8 & DAY_HIGH_BIT_8;
    }
}
