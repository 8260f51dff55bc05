mod rtc;

use crate::memory::address;

pub use rtc::{RealTimeClock, RtcTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperKind {
    None,
    Mbc1,
    Mbc2,
    Mbc3,
    Mbc5,
}

/// Where a CPU access to 0xA000-0xBFFF lands after bank translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RamTarget {
    /// Relative offset into the host's cartridge RAM.
    Ram(u32),
    /// MBC2 built-in RAM: 512 cells of which only the low nibble is stored.
    HalfByte(u32),
    /// One of the five MBC3 RTC registers (0-4).
    RtcRegister(u8),
    /// RAM is absent, disabled, or the selected bank is not mapped.
    Unmapped,
}

/// Cartridge bank-switching state. ROM reads translate to absolute offsets
/// handed to the host; writes into 0x0000-0x7FFF mutate the registers held
/// here.
#[derive(Debug, Clone)]
pub enum Mapper {
    None,
    Mbc1 {
        rom_bank: u16,
        ram_bank: u8,
        ram_enabled: bool,
        banking_mode: u8,
        rom_bank_mask: u16,
        ram_banks: u8,
        has_ram: bool,
    },
    Mbc2 {
        rom_bank: u16,
        ram_enabled: bool,
        rom_bank_mask: u16,
    },
    Mbc3 {
        rom_bank: u16,
        ram_bank: u8,
        ram_enabled: bool,
        mode_select: u8,
        rom_bank_mask: u16,
        ram_banks: u8,
        has_ram: bool,
        /// MBC30: more than 128 ROM banks or more than 4 RAM banks. Widens
        /// the ROM bank register to 8 bits and the RAM bank field to 0-7.
        oversized: bool,
        rtc: RealTimeClock,
    },
    Mbc5 {
        rom_bank: u16,
        ram_bank: u8,
        ram_enabled: bool,
        rom_bank_mask: u16,
        ram_banks: u8,
        has_ram: bool,
    },
}

impl Mapper {
    pub fn new(
        kind: MapperKind,
        has_ram: bool,
        rom_banks: u16,
        ram_banks: u8,
        oversized: bool,
    ) -> Self {
        let rom_bank_mask = rom_banks - 1;

        match kind {
            MapperKind::None => Self::None,
            MapperKind::Mbc1 => Self::Mbc1 {
                rom_bank: 1,
                ram_bank: 0,
                ram_enabled: false,
                banking_mode: 0,
                rom_bank_mask,
                ram_banks,
                has_ram,
            },
            MapperKind::Mbc2 => Self::Mbc2 {
                rom_bank: 1,
                ram_enabled: false,
                rom_bank_mask,
            },
            MapperKind::Mbc3 => Self::Mbc3 {
                rom_bank: 1,
                ram_bank: 0,
                ram_enabled: false,
                mode_select: 0,
                rom_bank_mask,
                ram_banks,
                has_ram,
                oversized,
                rtc: RealTimeClock::new(),
            },
            MapperKind::Mbc5 => Self::Mbc5 {
                rom_bank: 1,
                ram_bank: 0,
                ram_enabled: false,
                rom_bank_mask,
                ram_banks,
                has_ram,
            },
        }
    }

    pub fn kind(&self) -> MapperKind {
        match self {
            Self::None => MapperKind::None,
            Self::Mbc1 { .. } => MapperKind::Mbc1,
            Self::Mbc2 { .. } => MapperKind::Mbc2,
            Self::Mbc3 { .. } => MapperKind::Mbc3,
            Self::Mbc5 { .. } => MapperKind::Mbc5,
        }
    }

    /// Back to the power-on register state. The RTC is deliberately left
    /// alone; it keeps time across power cycles on real hardware.
    pub fn reset(&mut self) {
        match self {
            Self::None => {}
            Self::Mbc1 {
                rom_bank,
                ram_bank,
                ram_enabled,
                banking_mode,
                ..
            } => {
                *rom_bank = 1;
                *ram_bank = 0;
                *ram_enabled = false;
                *banking_mode = 0;
            }
            Self::Mbc2 {
                rom_bank,
                ram_enabled,
                ..
            } => {
                *rom_bank = 1;
                *ram_enabled = false;
            }
            Self::Mbc3 {
                rom_bank,
                ram_bank,
                ram_enabled,
                mode_select,
                ..
            } => {
                *rom_bank = 1;
                *ram_bank = 0;
                *ram_enabled = false;
                *mode_select = 0;
            }
            Self::Mbc5 {
                rom_bank,
                ram_bank,
                ram_enabled,
                ..
            } => {
                *rom_bank = 1;
                *ram_bank = 0;
                *ram_enabled = false;
            }
        }
    }

    /// The currently selected switchable ROM bank.
    pub fn rom_bank(&self) -> u16 {
        match self {
            Self::None => 1,
            Self::Mbc1 { rom_bank, .. }
            | Self::Mbc2 { rom_bank, .. }
            | Self::Mbc3 { rom_bank, .. }
            | Self::Mbc5 { rom_bank, .. } => *rom_bank,
        }
    }

    /// Translate a CPU address in 0x0000-0x7FFF to an absolute ROM offset.
    pub fn map_rom_address(&self, address: u16) -> u32 {
        if address < address::ROM_BANK_N_START {
            return u32::from(address);
        }

        let relative = u32::from(address - address::ROM_BANK_N_START);
        let bank = match self {
            Self::None => 1,
            // In advanced banking mode only the low five bits of the bank
            // register route this window; the upper two bits affect the
            // 0x0000-0x3FFF window on real hardware, which is not modelled.
            &Self::Mbc1 {
                rom_bank,
                banking_mode: 1,
                ..
            } => rom_bank & 0x1F,
            &Self::Mbc1 { rom_bank, .. }
            | &Self::Mbc2 { rom_bank, .. }
            | &Self::Mbc3 { rom_bank, .. }
            | &Self::Mbc5 { rom_bank, .. } => rom_bank,
        };

        relative + u32::from(bank) * address::ROM_BANK_SIZE
    }

    /// Translate a CPU access to 0xA000-0xBFFF.
    pub fn map_ram_address(&self, address: u16) -> RamTarget {
        let relative = u32::from(address - address::EXTERNAL_RAM_START);

        match self {
            Self::None => RamTarget::Unmapped,
            &Self::Mbc1 {
                ram_bank,
                ram_enabled,
                banking_mode,
                ram_banks,
                has_ram,
                ..
            } => {
                if !has_ram || !ram_enabled {
                    return RamTarget::Unmapped;
                }

                // Base mode always maps bank 0.
                if banking_mode != 0 && ram_bank < ram_banks {
                    RamTarget::Ram(relative + u32::from(ram_bank) * address::EXTERNAL_RAM_BANK_SIZE)
                } else {
                    RamTarget::Ram(relative)
                }
            }
            &Self::Mbc2 { ram_enabled, .. } => {
                if ram_enabled {
                    // Only 9 address bits are wired up.
                    RamTarget::HalfByte(u32::from(address & 0x01FF))
                } else {
                    RamTarget::Unmapped
                }
            }
            &Self::Mbc3 {
                ram_bank,
                ram_enabled,
                ram_banks,
                has_ram,
                ..
            } => match ram_bank {
                0x08..=0x0C => RamTarget::RtcRegister(ram_bank - 0x08),
                bank if has_ram && ram_enabled => {
                    if bank < ram_banks {
                        RamTarget::Ram(relative + u32::from(bank) * address::EXTERNAL_RAM_BANK_SIZE)
                    } else {
                        RamTarget::Ram(relative)
                    }
                }
                _ => RamTarget::Unmapped,
            },
            &Self::Mbc5 {
                ram_bank,
                ram_enabled,
                ram_banks,
                has_ram,
                ..
            } => {
                if !has_ram || !ram_enabled {
                    return RamTarget::Unmapped;
                }

                if ram_bank < ram_banks {
                    RamTarget::Ram(relative + u32::from(ram_bank) * address::EXTERNAL_RAM_BANK_SIZE)
                } else {
                    RamTarget::Ram(relative)
                }
            }
        }
    }

    /// Handle a CPU write into 0x0000-0x7FFF, which programs the mapper
    /// registers rather than the (read-only) ROM.
    pub fn write_control(&mut self, address: u16, value: u8) {
        match self {
            Self::None => {}
            Self::Mbc1 {
                rom_bank,
                ram_bank,
                ram_enabled,
                banking_mode,
                rom_bank_mask,
                ..
            } => match address {
                0x0000..=0x1FFF => {
                    *ram_enabled = value & 0x0F == 0x0A;
                    log::trace!("MBC1 RAM enable <- {}", *ram_enabled);
                }
                0x2000..=0x3FFF => {
                    let mut bank = u16::from(value & 0x1F) | (*rom_bank & 0x60);
                    if bank & 0x1F == 0 {
                        bank += 1;
                    }
                    *rom_bank = bank & *rom_bank_mask;
                    log::trace!("MBC1 ROM bank <- {:#04X}", *rom_bank);
                }
                0x4000..=0x5FFF => {
                    *ram_bank = value & 0x03;
                    *rom_bank =
                        (u16::from(value & 0x03) << 5 | (*rom_bank & 0x1F)) & *rom_bank_mask;
                    log::trace!("MBC1 RAM bank <- {:#04X}", *ram_bank);
                }
                0x6000..=0x7FFF => {
                    *banking_mode = value & 0x01;
                    log::trace!("MBC1 banking mode <- {}", *banking_mode);
                }
                _ => {}
            },
            Self::Mbc2 {
                rom_bank,
                ram_enabled,
                rom_bank_mask,
            } => {
                // Address bit 8 selects between the two registers across
                // the whole 0x0000-0x3FFF range.
                if address <= 0x3FFF {
                    if address & 0x0100 != 0 {
                        let mut bank = u16::from(value & 0x0F);
                        if bank == 0 {
                            bank = 1;
                        }
                        *rom_bank = bank & *rom_bank_mask;
                        log::trace!("MBC2 ROM bank <- {:#04X}", *rom_bank);
                    } else {
                        *ram_enabled = value & 0x0F == 0x0A;
                        log::trace!("MBC2 RAM enable <- {}", *ram_enabled);
                    }
                }
            }
            Self::Mbc3 {
                rom_bank,
                ram_bank,
                ram_enabled,
                mode_select,
                rom_bank_mask,
                oversized,
                rtc,
                ..
            } => match address {
                0x0000..=0x1FFF => {
                    *ram_enabled = value & 0x0F == 0x0A;
                    log::trace!("MBC3 RAM/RTC enable <- {}", *ram_enabled);
                }
                0x2000..=0x3FFF => {
                    let mut bank = if *oversized {
                        u16::from(value)
                    } else {
                        u16::from(value & 0x7F)
                    };
                    if bank == 0 {
                        bank = 1;
                    }
                    *rom_bank = bank & *rom_bank_mask;
                    log::trace!("MBC3 ROM bank <- {:#04X}", *rom_bank);
                }
                0x4000..=0x5FFF => {
                    // 0x08-0x0C select an RTC register; below that, only
                    // the first 4 (8 for MBC30) RAM banks exist.
                    *ram_bank = if !*oversized && value < 0x08 {
                        value & 0x03
                    } else {
                        value
                    };
                    log::trace!("MBC3 RAM bank <- {:#04X}", *ram_bank);
                }
                0x6000..=0x7FFF => {
                    let value = value & 0x01;
                    if value == 1 && *mode_select == 0 {
                        rtc.latch();
                        log::trace!("MBC3 RTC latched");
                    }
                    *mode_select = value;
                }
                _ => {}
            },
            Self::Mbc5 {
                rom_bank,
                ram_bank,
                ram_enabled,
                rom_bank_mask,
                ..
            } => match address {
                0x0000..=0x1FFF => {
                    *ram_enabled = value & 0x0F == 0x0A;
                    log::trace!("MBC5 RAM enable <- {}", *ram_enabled);
                }
                0x2000..=0x2FFF => {
                    *rom_bank = ((*rom_bank & 0x0100) | u16::from(value)) & *rom_bank_mask;
                    log::trace!("MBC5 ROM bank <- {:#05X}", *rom_bank);
                }
                0x3000..=0x3FFF => {
                    *rom_bank = ((u16::from(value & 0x01) << 8) | (*rom_bank & 0x00FF))
                        & *rom_bank_mask;
                    log::trace!("MBC5 ROM bank <- {:#05X}", *rom_bank);
                }
                0x4000..=0x5FFF => {
                    *ram_bank = value & 0x0F;
                    log::trace!("MBC5 RAM bank <- {:#04X}", *ram_bank);
                }
                _ => {}
            },
        }
    }

    pub fn tick_rtc(&mut self, cycles: u32) {
        if let Self::Mbc3 { rtc, .. } = self {
            rtc.tick(cycles);
        }
    }

    pub fn rtc(&self) -> Option<&RealTimeClock> {
        match self {
            Self::Mbc3 { rtc, .. } => Some(rtc),
            _ => None,
        }
    }

    pub fn rtc_mut(&mut self) -> Option<&mut RealTimeClock> {
        match self {
            Self::Mbc3 { rtc, .. } => Some(rtc),
            _ => None,
        }
    }
}

/// Map the cartridge-type header byte to a mapper kind and whether the
/// cartridge carries external RAM. Returns None for types this core does
/// not support (MBC6/7, HuC1/3, camera, TAMA5).
pub fn parse_header_byte(value: u8) -> Option<(MapperKind, bool)> {
    let (kind, has_ram) = match value {
        0x00 | 0x0B..=0x0D => (MapperKind::None, false),
        0x01 => (MapperKind::Mbc1, false),
        0x02 | 0x03 => (MapperKind::Mbc1, true),
        0x05 | 0x06 => (MapperKind::Mbc2, true),
        0x08 | 0x09 => (MapperKind::None, true),
        0x0F | 0x11 => (MapperKind::Mbc3, false),
        0x10 | 0x12 | 0x13 => (MapperKind::Mbc3, true),
        // 0x19-0x1B are plain MBC5, 0x1C-0x1E add the rumble motor
        0x19 | 0x1C..=0x1E => (MapperKind::Mbc5, false),
        0x1A | 0x1B => (MapperKind::Mbc5, true),
        _ => return None,
    };

    Some((kind, has_ram))
}
