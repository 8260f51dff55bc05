use crate::SCREEN_WIDTH;

/// The set of services a front-end must (or may) provide to the emulation
/// core. The core owns the implementation and calls back into it
/// synchronously from `run_frame`; implementations must not re-enter the
/// emulator.
///
/// ROM, cartridge RAM, and boot ROM storage live on the host side so that
/// the core itself performs no allocation or file I/O for them. All
/// addresses passed to the host are absolute offsets with bank translation
/// already applied.
pub trait Host {
    /// Read one byte from cartridge ROM at the given absolute offset.
    fn rom_read(&mut self, addr: u32) -> u8;

    /// Read one byte of battery-backed cartridge RAM.
    fn cart_ram_read(&mut self, addr: u32) -> u8;

    /// Write one byte of battery-backed cartridge RAM.
    fn cart_ram_write(&mut self, addr: u32, value: u8);

    /// Read one byte of the 256-byte boot ROM.
    ///
    /// Returning `Some` from this method enables the boot ROM: a subsequent
    /// `reset` starts execution at 0x0000 with the overlay mapped, instead
    /// of assuming the boot ROM already ran. Only addresses below 0x0100
    /// are ever requested.
    fn bootrom_read(&mut self, addr: u16) -> Option<u8> {
        let _ = addr;
        None
    }

    /// Transmit one byte over the link cable.
    fn serial_tx(&mut self, value: u8) {
        let _ = value;
    }

    /// Receive one byte from the link cable partner, or `None` when no
    /// partner is connected.
    fn serial_rx(&mut self) -> Option<u8> {
        None
    }

    /// Present one rendered scanline. `line` is in 0..144.
    ///
    /// Each pixel byte carries the shade in bits 1-0 and the palette tag in
    /// bits 5-4 (see [`PALETTE_BG`](crate::PALETTE_BG) and friends), which
    /// front-ends can use to colourise DMG games the way the Game Boy Color
    /// does.
    fn draw_line(&mut self, line: u8, pixels: &[u8; SCREEN_WIDTH]) {
        let _ = (line, pixels);
    }

    /// Read an APU register (0xFF10-0xFF3F). Return `None` to let the core
    /// serve the read from its register file with unused bits forced high.
    fn audio_read(&mut self, addr: u16) -> Option<u8> {
        let _ = addr;
        None
    }

    /// Write an APU register (0xFF10-0xFF3F). Return `true` if the write
    /// was consumed; `false` lets the core store the raw byte.
    fn audio_write(&mut self, addr: u16, value: u8) -> bool {
        let _ = (addr, value);
        false
    }
}
