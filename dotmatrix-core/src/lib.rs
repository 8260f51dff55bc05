//! Cycle-approximate Game Boy (DMG) emulation core.
//!
//! The core owns all console state (CPU, memory, mapper, timers, PPU) and
//! calls back into a host-supplied [`Host`] implementation for cartridge
//! ROM/RAM bytes, the rendered scanlines, and the serial link. One call to
//! [`GameBoy::run_frame`] executes exactly one frame's worth of machine
//! cycles (~59.73 Hz pacing is up to the host).

mod cpu;
mod host;
mod memory;
mod ppu;
mod serial;
mod timer;

use crate::cpu::CpuRegisters;
use crate::memory::ioregisters::IoRegister;
use crate::memory::mapper::{self, Mapper, MapperKind};
use crate::memory::{address, Bus};
use thiserror::Error;

pub use crate::host::Host;
pub use crate::memory::mapper::RtcTime;
pub use crate::ppu::{
    FRAME_CYCLES, PALETTE_BG, PALETTE_MASK, PALETTE_OBJ0, PALETTE_OBJ1, SCREEN_HEIGHT,
    SCREEN_WIDTH, SHADE_MASK,
};

/// Master clock rate in Hz.
pub const CLOCK_FREQUENCY: u32 = 4_194_304;

// Joypad bits for [`GameBoy::set_joypad`]; a cleared bit means the button
// is held.
pub const JOYPAD_A: u8 = 0x01;
pub const JOYPAD_B: u8 = 0x02;
pub const JOYPAD_SELECT: u8 = 0x04;
pub const JOYPAD_START: u8 = 0x08;
pub const JOYPAD_RIGHT: u8 = 0x10;
pub const JOYPAD_LEFT: u8 = 0x20;
pub const JOYPAD_UP: u8 = 0x40;
pub const JOYPAD_DOWN: u8 = 0x80;

/// Reasons a cartridge can be rejected at initialisation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartridgeError {
    #[error("header checksum mismatch: computed {computed:#04X}, header has {stored:#04X}")]
    InvalidChecksum { computed: u8, stored: u8 },
    #[error("unsupported cartridge header byte {code:#04X} at {location:#06X}")]
    UnsupportedCartridge { code: u8, location: u16 },
}

/// Fatal faults hit while executing. After an error is returned the
/// emulator state is undefined and must not be stepped further.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunError {
    #[error("invalid opcode {opcode:#04X} at {pc:#06X}")]
    InvalidOpcode { opcode: u8, pc: u16 },
}

/// An emulated DMG console wired to a host implementation.
pub struct GameBoy<H: Host> {
    registers: CpuRegisters,
    bus: Bus<H>,
}

impl<H: Host> GameBoy<H> {
    /// Validate the cartridge header read through `host` and build a
    /// powered-on console.
    ///
    /// # Errors
    ///
    /// Returns [`CartridgeError::InvalidChecksum`] when the header
    /// checksum over 0x0134-0x014C does not match byte 0x014D, and
    /// [`CartridgeError::UnsupportedCartridge`] for mapper types or bank
    /// counts this core does not implement.
    pub fn new(mut host: H) -> Result<Self, CartridgeError> {
        let mut computed: u8 = 0;
        for location in address::HEADER_CHECKSUM_START..=address::HEADER_CHECKSUM_END {
            computed = computed
                .wrapping_sub(host.rom_read(u32::from(location)))
                .wrapping_sub(1);
        }
        let stored = host.rom_read(u32::from(address::HEADER_CHECKSUM));
        if computed != stored {
            return Err(CartridgeError::InvalidChecksum { computed, stored });
        }

        let mapper_byte = host.rom_read(u32::from(address::MAPPER));
        let Some((kind, mut has_ram)) = mapper::parse_header_byte(mapper_byte) else {
            return Err(CartridgeError::UnsupportedCartridge {
                code: mapper_byte,
                location: address::MAPPER,
            });
        };

        let bank_code = host.rom_read(u32::from(address::ROM_BANK_COUNT));
        let rom_banks: u16 = match bank_code {
            0..=8 => 2 << bank_code,
            _ => {
                return Err(CartridgeError::UnsupportedCartridge {
                    code: bank_code,
                    location: address::ROM_BANK_COUNT,
                })
            }
        };

        let ram_code = host.rom_read(u32::from(address::RAM_SIZE));
        let mut ram_banks: u8 = match ram_code {
            0..=5 => [0, 1, 1, 4, 16, 8][usize::from(ram_code)],
            _ => {
                return Err(CartridgeError::UnsupportedCartridge {
                    code: ram_code,
                    location: address::RAM_SIZE,
                })
            }
        };

        // MBC2 carries its own 512 half-byte cells and reports zero RAM in
        // the header; everything else with no RAM banks has no usable RAM.
        if kind == MapperKind::Mbc2 {
            has_ram = true;
        } else if !has_ram || ram_banks == 0 {
            has_ram = false;
            ram_banks = 0;
        }

        let oversized = kind == MapperKind::Mbc3 && (rom_banks > 128 || ram_banks > 4);

        log::info!(
            "Cartridge: mapper {kind:?} (byte {mapper_byte:#04X}), {rom_banks} ROM banks, \
             {ram_banks} RAM banks, has_ram={has_ram}, oversized={oversized}"
        );

        let mapper = Mapper::new(kind, has_ram, rom_banks, ram_banks, oversized);
        let mut console = Self {
            registers: CpuRegisters::new(),
            bus: Bus::new(host, mapper),
        };
        console.reset();

        Ok(console)
    }

    /// Power-cycle the console.
    ///
    /// Without a boot ROM the CPU and IO registers take the documented
    /// post-boot values; with one (the host returns `Some` from
    /// `bootrom_read`) execution starts from address 0 with the overlay
    /// mapped.
    pub fn reset(&mut self) {
        let has_bootrom = self.bus.host.bootrom_read(0).is_some();
        self.bus.bootrom_present = has_bootrom;

        self.bus.mapper.reset();
        self.bus.timer = crate::timer::TimerCounters::new();
        self.bus.serial = crate::serial::SerialCounter::new();
        self.bus.ppu.reset();
        self.bus.io = crate::memory::ioregisters::IoRegisters::new();
        self.bus.joypad = 0xFF;

        self.registers = CpuRegisters::new();
        self.registers.ime = true;

        if has_bootrom {
            // As though the console was just switched on.
            self.registers = CpuRegisters {
                a: 0,
                f: 0,
                b: 0,
                c: 0,
                d: 0,
                e: 0,
                h: 0,
                l: 0,
                sp: 0,
                pc: 0,
                ime: true,
                halted: false,
            };
            self.bus.io.write_register(IoRegister::DIV, 0x00);
            self.bus.io.write_register(IoRegister::LCDC, 0x00);
            self.bus.io.write_register(IoRegister::STAT, 0x84);
            self.bus.io.write_register(IoRegister::BOOT, 0x00);
        } else {
            // As though the boot ROM already ran. Its checksum pass leaves
            // H and C set unless the header checksum byte is zero.
            let checksum_nonzero =
                self.bus.host.rom_read(u32::from(address::HEADER_CHECKSUM)) != 0;
            self.registers.f = 0x80 | if checksum_nonzero { 0x30 } else { 0x00 };

            self.bus.io.write_register(IoRegister::DIV, 0xAB);
            self.bus.io.write_register(IoRegister::LCDC, 0x91);
            self.bus.io.write_register(IoRegister::STAT, 0x85);
            self.bus.io.write_register(IoRegister::BOOT, 0x01);
            self.bus.write(0xFF26, 0xF1);
            self.bus.vram.fill(0);
        }

        self.bus.io.write_register(IoRegister::JOYP, 0xCF);
        self.bus.io.write_register(IoRegister::SB, 0x00);
        self.bus.io.write_register(IoRegister::SC, 0x7E);
        self.bus.io.write_register(IoRegister::TIMA, 0x00);
        self.bus.io.write_register(IoRegister::TMA, 0x00);
        self.bus.io.write_register(IoRegister::TAC, 0xF8);
        self.bus.io.write_register(IoRegister::IF, 0xE1);
        self.bus.io.write_register(IoRegister::SCY, 0x00);
        self.bus.io.write_register(IoRegister::SCX, 0x00);
        self.bus.io.write_register(IoRegister::LY, 0x00);
        self.bus.io.write_register(IoRegister::LYC, 0x00);
        self.bus.write(0xFF47, 0xFC);
        self.bus.write(0xFF48, 0xFF);
        self.bus.write(0xFF49, 0xFF);
        self.bus.io.write_register(IoRegister::WY, 0x00);
        self.bus.io.write_register(IoRegister::WX, 0x00);
        self.bus.io.set_ie(0x00);
    }

    /// Run the emulator until the next frame boundary: the LY 143 -> 144
    /// transition, or one frame period of the LCD being off.
    pub fn run_frame(&mut self) -> Result<(), RunError> {
        self.bus.ppu.frame_ready = false;
        while !self.bus.ppu.frame_ready {
            cpu::step(&mut self.bus, &mut self.registers)?;
        }

        Ok(())
    }

    /// Execute a single CPU instruction (plus any interrupt dispatch and
    /// halted time skips). Mainly useful for tests and debuggers; use
    /// [`Self::run_frame`] to drive the console.
    pub fn step(&mut self) -> Result<(), RunError> {
        cpu::step(&mut self.bus, &mut self.registers)
    }

    /// Size in bytes of the battery-backed save data the host should
    /// allocate and persist.
    pub fn save_size(&mut self) -> usize {
        if self.bus.mapper.kind() == MapperKind::Mbc2 {
            // 512 half-byte cells, stored one per byte.
            return 0x200;
        }

        let ram_code = self.bus.host.rom_read(u32::from(address::RAM_SIZE));
        match ram_code {
            0..=5 => [0, 0x800, 0x2000, 0x8000, 0x2_0000, 0x1_0000][usize::from(ram_code)],
            _ => 0,
        }
    }

    /// Hash of the title bytes, as used by the Game Boy Color to pick
    /// colourisation palettes for DMG games.
    pub fn colour_hash(&mut self) -> u8 {
        (address::TITLE_START..=address::TITLE_END)
            .fold(0u8, |hash, location| {
                hash.wrapping_add(self.bus.host.rom_read(u32::from(location)))
            })
    }

    /// The cartridge title, up to 16 printable characters.
    pub fn rom_title(&mut self) -> String {
        let mut title = String::with_capacity(16);
        for location in address::TITLE_START..=address::TITLE_END {
            let byte = self.bus.host.rom_read(u32::from(location));
            if (b' '..=b'_').contains(&byte) {
                title.push(char::from(byte));
            } else {
                break;
            }
        }

        title
    }

    /// Seed the MBC3 real-time clock. Has no effect on cartridges without
    /// one.
    pub fn set_rtc(&mut self, time: &RtcTime) {
        if let Some(rtc) = self.bus.mapper.rtc_mut() {
            rtc.set_time(time);
        }
    }

    /// Update the button state (see the `JOYPAD_*` constants; bit cleared
    /// = pressed). Safe to call between steps.
    pub fn set_joypad(&mut self, state: u8) {
        self.bus.joypad = state;
    }

    pub fn joypad(&self) -> u8 {
        self.bus.joypad
    }

    /// Render only every other line, alternating fields per frame.
    pub fn set_interlace(&mut self, enabled: bool) {
        self.bus.ppu.interlace = enabled;
    }

    /// Render only every other frame.
    pub fn set_frame_skip(&mut self, enabled: bool) {
        self.bus.ppu.frame_skip = enabled;
    }

    pub fn host(&self) -> &H {
        &self.bus.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.bus.host
    }

    pub fn into_host(self) -> H {
        self.bus.host
    }
}
