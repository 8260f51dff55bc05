//
// Cartridge header addresses
//

pub const ENTRY_POINT: u16 = 0x0100;
pub const TITLE_START: u16 = 0x0134;
pub const TITLE_END: u16 = 0x0143;
pub const HEADER_CHECKSUM_START: u16 = 0x0134;
pub const HEADER_CHECKSUM_END: u16 = 0x014C;
pub const HEADER_CHECKSUM: u16 = 0x014D;
pub const MAPPER: u16 = 0x0147;
pub const ROM_BANK_COUNT: u16 = 0x0148;
pub const RAM_SIZE: u16 = 0x0149;

//
// Address space boundaries
//

pub const ROM_START: u16 = 0x0000;
pub const ROM_END: u16 = 0x7FFF;

pub const ROM_BANK_N_START: u16 = 0x4000;

pub const VRAM_START: u16 = 0x8000;
pub const VRAM_END: u16 = 0x9FFF;

pub const EXTERNAL_RAM_START: u16 = 0xA000;
pub const EXTERNAL_RAM_END: u16 = 0xBFFF;

pub const WORKING_RAM_START: u16 = 0xC000;
pub const WORKING_RAM_END: u16 = 0xDFFF;

pub const ECHO_RAM_START: u16 = 0xE000;
pub const ECHO_RAM_END: u16 = 0xFDFF;

pub const OAM_START: u16 = 0xFE00;
pub const OAM_END: u16 = 0xFE9F;

pub const UNUSABLE_START: u16 = 0xFEA0;
pub const UNUSABLE_END: u16 = 0xFEFF;

pub const IO_REGISTERS_START: u16 = 0xFF00;
pub const IO_REGISTERS_END: u16 = 0xFF7F;

pub const APU_REGISTERS_START: u16 = 0xFF10;
pub const APU_REGISTERS_END: u16 = 0xFF3F;

pub const HRAM_START: u16 = 0xFF80;
pub const HRAM_END: u16 = 0xFFFE;

pub const IE_REGISTER: u16 = 0xFFFF;

//
// Region sizes
//

pub const ROM_BANK_SIZE: u32 = 0x4000;
pub const EXTERNAL_RAM_BANK_SIZE: u32 = 0x2000;
pub const VRAM_SIZE: usize = 0x2000;
pub const WORKING_RAM_SIZE: usize = 0x2000;
pub const OAM_SIZE: usize = 0xA0;
pub const HRAM_SIZE: usize = 0x7F;
pub const BOOT_ROM_SIZE: u16 = 0x0100;

//
// Offsets into VRAM (relative to VRAM_START)
//

// Tile data at 0x8000 (unsigned indexing) and 0x8800 (signed indexing)
pub const TILE_DATA_UNSIGNED: usize = 0x0000;
pub const TILE_DATA_SIGNED: usize = 0x0800;

// The two 32x32 tile maps at 0x9800 and 0x9C00
pub const TILE_MAP_0: usize = 0x1800;
pub const TILE_MAP_1: usize = 0x1C00;
