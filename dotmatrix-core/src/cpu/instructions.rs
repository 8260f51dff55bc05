mod parse;

use crate::cpu::registers::{CpuRegister, CpuRegisterPair, CpuRegisters};
use crate::host::Host;
use crate::memory::Bus;

pub(crate) use parse::{parse_next_instruction, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpCondition {
    NZ,
    Z,
    NC,
    C,
}

impl JumpCondition {
    fn check(self, registers: &CpuRegisters) -> bool {
        match self {
            Self::NZ => !registers.z_flag(),
            Self::Z => registers.z_flag(),
            Self::NC => !registers.c_flag(),
            Self::C => registers.c_flag(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTarget {
    Register(CpuRegister),
    Immediate(u8),
    IndirectHL,
    IndirectHLInc,
    IndirectHLDec,
    IndirectBC,
    IndirectDE,
    Accumulator,
    FFIndirectC,
    FFDirect(u8),
    Direct(u16),
}

impl ReadTarget {
    fn read_value<H: Host>(self, registers: &mut CpuRegisters, bus: &mut Bus<H>) -> u8 {
        match self {
            Self::Register(register) => registers.read_register(register),
            Self::Immediate(n) => n,
            Self::IndirectHL => bus.read(registers.hl()),
            Self::IndirectHLInc => {
                let hl = registers.hl();
                let value = bus.read(hl);
                registers.set_hl(hl.wrapping_add(1));
                value
            }
            Self::IndirectHLDec => {
                let hl = registers.hl();
                let value = bus.read(hl);
                registers.set_hl(hl.wrapping_sub(1));
                value
            }
            Self::IndirectBC => bus.read(registers.bc()),
            Self::IndirectDE => bus.read(registers.de()),
            Self::Accumulator => registers.a,
            Self::FFIndirectC => bus.read(u16::from_be_bytes([0xFF, registers.c])),
            Self::FFDirect(n) => bus.read(u16::from_be_bytes([0xFF, n])),
            Self::Direct(nn) => bus.read(nn),
        }
    }

    fn cycles_required(self) -> u32 {
        match self {
            Self::Register(..) | Self::Accumulator => 0,
            Self::Immediate(..)
            | Self::IndirectHL
            | Self::IndirectHLInc
            | Self::IndirectHLDec
            | Self::IndirectBC
            | Self::IndirectDE
            | Self::FFIndirectC => 4,
            Self::FFDirect(..) => 8,
            Self::Direct(..) => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    Register(CpuRegister),
    IndirectHL,
    IndirectHLInc,
    IndirectHLDec,
    IndirectBC,
    IndirectDE,
    Accumulator,
    FFIndirectC,
    FFDirect(u8),
    Direct(u16),
}

impl WriteTarget {
    fn write_value<H: Host>(self, value: u8, registers: &mut CpuRegisters, bus: &mut Bus<H>) {
        match self {
            Self::Register(register) => registers.set_register(register, value),
            Self::IndirectHL => bus.write(registers.hl(), value),
            Self::IndirectHLInc => {
                let hl = registers.hl();
                bus.write(hl, value);
                registers.set_hl(hl.wrapping_add(1));
            }
            Self::IndirectHLDec => {
                let hl = registers.hl();
                bus.write(hl, value);
                registers.set_hl(hl.wrapping_sub(1));
            }
            Self::IndirectBC => bus.write(registers.bc(), value),
            Self::IndirectDE => bus.write(registers.de(), value),
            Self::Accumulator => registers.a = value,
            Self::FFIndirectC => bus.write(u16::from_be_bytes([0xFF, registers.c]), value),
            Self::FFDirect(n) => bus.write(u16::from_be_bytes([0xFF, n]), value),
            Self::Direct(nn) => bus.write(nn, value),
        }
    }

    fn cycles_required(self) -> u32 {
        match self {
            Self::Register(..) | Self::Accumulator => 0,
            Self::IndirectHL
            | Self::IndirectHLInc
            | Self::IndirectHLDec
            | Self::IndirectBC
            | Self::IndirectDE
            | Self::FFIndirectC => 4,
            Self::FFDirect(..) => 8,
            Self::Direct(..) => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyTarget {
    Register(CpuRegister),
    IndirectHL,
    Accumulator,
}

impl ModifyTarget {
    fn read_value<H: Host>(self, registers: &CpuRegisters, bus: &mut Bus<H>) -> u8 {
        match self {
            Self::Register(register) => registers.read_register(register),
            Self::IndirectHL => bus.read(registers.hl()),
            Self::Accumulator => registers.a,
        }
    }

    fn write_value<H: Host>(self, value: u8, registers: &mut CpuRegisters, bus: &mut Bus<H>) {
        match self {
            Self::Register(register) => registers.set_register(register, value),
            Self::IndirectHL => bus.write(registers.hl(), value),
            Self::Accumulator => registers.a = value,
        }
    }

    fn cycles_required(self) -> u32 {
        match self {
            Self::Register(..) | Self::Accumulator => 0,
            Self::IndirectHL => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // All 8-bit LD/LDH instructions
    Load(WriteTarget, ReadTarget),
    // LD rr, nn
    LoadRegisterPairImmediate(CpuRegisterPair, u16),
    // LD (nn), SP
    LoadDirectStackPointer(u16),
    // LD SP, HL
    LoadStackPointerHL,
    // LD HL, SP+e
    LoadHLStackPointerOffset(i8),
    // PUSH rr
    PushStack(CpuRegisterPair),
    // POP rr
    PopStack(CpuRegisterPair),
    // ADD r / (HL) / n
    Add(ReadTarget),
    // ADC r / (HL) / n
    AddWithCarry(ReadTarget),
    // SUB r / (HL) / n
    Subtract(ReadTarget),
    // SBC r / (HL) / n
    SubtractWithCarry(ReadTarget),
    // CP r / (HL) / n
    Compare(ReadTarget),
    // INC r / (HL)
    Increment(ModifyTarget),
    // DEC r / (HL)
    Decrement(ModifyTarget),
    // AND r / (HL) / n
    And(ReadTarget),
    // OR r / (HL) / n
    Or(ReadTarget),
    // XOR r / (HL) / n
    Xor(ReadTarget),
    // ADD HL, rr
    AddHLRegister(CpuRegisterPair),
    // INC rr
    IncRegisterPair(CpuRegisterPair),
    // DEC rr
    DecRegisterPair(CpuRegisterPair),
    // ADD SP, e
    AddSPImmediate(i8),
    // RLCA / RLC r / RLC (HL)
    RotateLeft(ModifyTarget),
    // RLA / RL r / RL (HL)
    RotateLeftThruCarry(ModifyTarget),
    // RRCA / RRC r / RRC (HL)
    RotateRight(ModifyTarget),
    // RRA / RR r / RR (HL)
    RotateRightThruCarry(ModifyTarget),
    // SLA r / (HL)
    ShiftLeft(ModifyTarget),
    // SWAP r / (HL)
    Swap(ModifyTarget),
    // SRA r / (HL)
    ArithmeticShiftRight(ModifyTarget),
    // SRL r / (HL)
    LogicalShiftRight(ModifyTarget),
    // BIT n, r / (HL)
    TestBit(u8, ReadTarget),
    // RES n, r / (HL)
    ResetBit(u8, ModifyTarget),
    // SET n, r / (HL)
    SetBit(u8, ModifyTarget),
    // CCF
    ComplementCarryFlag,
    // SCF
    SetCarryFlag,
    // DAA
    DecimalAdjustAccumulator,
    // CPL
    ComplementAccumulator,
    // JP nn
    Jump(u16),
    // JP HL
    JumpHL,
    // JP cc, nn
    JumpCond(JumpCondition, u16),
    // JR e
    RelativeJump(i8),
    // JR cc, e
    RelativeJumpCond(JumpCondition, i8),
    // CALL nn
    Call(u16),
    // CALL cc, nn
    CallCond(JumpCondition, u16),
    // RET
    Return,
    // RET cc
    ReturnCond(JumpCondition),
    // RETI
    ReturnFromInterruptHandler,
    // RST n
    RestartCall(u8),
    // HALT
    Halt,
    // STOP; behaves as NOP in this core
    Stop,
    // DI
    DisableInterrupts,
    // EI
    EnableInterrupts,
    // NOP
    NoOp,
}

/// Push a 16-bit value: SP is decremented before each byte, high byte
/// first.
pub(crate) fn push_stack<H: Host>(bus: &mut Bus<H>, registers: &mut CpuRegisters, value: u16) {
    let [high, low] = value.to_be_bytes();
    registers.sp = registers.sp.wrapping_sub(1);
    bus.write(registers.sp, high);
    registers.sp = registers.sp.wrapping_sub(1);
    bus.write(registers.sp, low);
}

/// Pop a 16-bit value: low byte first, SP incremented after each byte.
fn pop_stack<H: Host>(bus: &mut Bus<H>, registers: &mut CpuRegisters) -> u16 {
    let low = bus.read(registers.sp);
    registers.sp = registers.sp.wrapping_add(1);
    let high = bus.read(registers.sp);
    registers.sp = registers.sp.wrapping_add(1);
    u16::from_be_bytes([high, low])
}

impl Instruction {
    /// Execute the given CPU instruction, modifying CPU registers, flags,
    /// and memory as needed.
    ///
    /// This method does *not* update the PC register for the given
    /// instruction; it expects that PC was advanced past the instruction
    /// before this method was called.
    pub fn execute<H: Host>(self, bus: &mut Bus<H>, registers: &mut CpuRegisters) {
        match self {
            Self::Load(write_target, read_target) => {
                let value = read_target.read_value(registers, bus);
                write_target.write_value(value, registers, bus);
            }
            Self::LoadRegisterPairImmediate(rr, nn) => {
                registers.set_register_pair(rr, nn);
            }
            Self::LoadDirectStackPointer(nn) => {
                let [sp_high, sp_low] = registers.sp.to_be_bytes();
                bus.write(nn, sp_low);
                bus.write(nn.wrapping_add(1), sp_high);
            }
            Self::LoadStackPointerHL => {
                registers.sp = registers.hl();
            }
            Self::PushStack(rr) => {
                let value = registers.read_register_pair(rr);
                push_stack(bus, registers, value);
            }
            Self::PopStack(rr) => {
                let value = pop_stack(bus, registers);
                registers.set_register_pair(rr, value);
            }
            Self::Add(read_target) => {
                let (sum, carry, half_carry) =
                    add(registers.a, read_target.read_value(registers, bus), false);
                registers.a = sum;
                registers.set_flags(sum == 0, false, half_carry, carry);
            }
            Self::AddWithCarry(read_target) => {
                let (sum, carry, half_carry) = add(
                    registers.a,
                    read_target.read_value(registers, bus),
                    registers.c_flag(),
                );
                registers.a = sum;
                registers.set_flags(sum == 0, false, half_carry, carry);
            }
            Self::Subtract(read_target) => {
                let (difference, carry, half_carry) =
                    sub(registers.a, read_target.read_value(registers, bus), false);
                registers.a = difference;
                registers.set_flags(difference == 0, true, half_carry, carry);
            }
            Self::SubtractWithCarry(read_target) => {
                let (difference, carry, half_carry) = sub(
                    registers.a,
                    read_target.read_value(registers, bus),
                    registers.c_flag(),
                );
                registers.a = difference;
                registers.set_flags(difference == 0, true, half_carry, carry);
            }
            Self::Compare(read_target) => {
                let (difference, carry, half_carry) =
                    sub(registers.a, read_target.read_value(registers, bus), false);
                registers.set_flags(difference == 0, true, half_carry, carry);
            }
            Self::Increment(modify_target) => {
                let value = modify_target.read_value(registers, bus);
                let (sum, _, half_carry) = add(value, 1, false);
                modify_target.write_value(sum, registers, bus);
                registers.update_flags(Some(sum == 0), Some(false), Some(half_carry), None);
            }
            Self::Decrement(modify_target) => {
                let value = modify_target.read_value(registers, bus);
                let (difference, _, half_carry) = sub(value, 1, false);
                modify_target.write_value(difference, registers, bus);
                registers.update_flags(Some(difference == 0), Some(true), Some(half_carry), None);
            }
            Self::And(read_target) => {
                let value = registers.a & read_target.read_value(registers, bus);
                registers.a = value;
                registers.set_flags(value == 0, false, true, false);
            }
            Self::Or(read_target) => {
                let value = registers.a | read_target.read_value(registers, bus);
                registers.a = value;
                registers.set_flags(value == 0, false, false, false);
            }
            Self::Xor(read_target) => {
                let value = registers.a ^ read_target.read_value(registers, bus);
                registers.a = value;
                registers.set_flags(value == 0, false, false, false);
            }
            Self::AddHLRegister(rr) => {
                let (sum, carry, half_carry) =
                    add_u16(registers.hl(), registers.read_register_pair(rr));
                registers.set_hl(sum);
                registers.update_flags(None, Some(false), Some(half_carry), Some(carry));
            }
            Self::IncRegisterPair(rr) => {
                registers.set_register_pair(rr, registers.read_register_pair(rr).wrapping_add(1));
            }
            Self::DecRegisterPair(rr) => {
                registers.set_register_pair(rr, registers.read_register_pair(rr).wrapping_sub(1));
            }
            Self::AddSPImmediate(e) => {
                let (sp, carry, half_carry) = add_sp_offset(registers.sp, e);
                registers.sp = sp;
                registers.set_flags(false, false, half_carry, carry);
            }
            Self::LoadHLStackPointerOffset(e) => {
                let (sp, carry, half_carry) = add_sp_offset(registers.sp, e);
                registers.set_hl(sp);
                registers.set_flags(false, false, half_carry, carry);
            }
            Self::RotateLeft(modify_target) => {
                let (value, carry) = rotate_left(modify_target.read_value(registers, bus));
                modify_target.write_value(value, registers, bus);
                let z = modify_target != ModifyTarget::Accumulator && value == 0;
                registers.set_flags(z, false, false, carry);
            }
            Self::RotateLeftThruCarry(modify_target) => {
                let (value, carry) = rotate_left_thru_carry(
                    modify_target.read_value(registers, bus),
                    registers.c_flag(),
                );
                modify_target.write_value(value, registers, bus);
                let z = modify_target != ModifyTarget::Accumulator && value == 0;
                registers.set_flags(z, false, false, carry);
            }
            Self::RotateRight(modify_target) => {
                let (value, carry) = rotate_right(modify_target.read_value(registers, bus));
                modify_target.write_value(value, registers, bus);
                let z = modify_target != ModifyTarget::Accumulator && value == 0;
                registers.set_flags(z, false, false, carry);
            }
            Self::RotateRightThruCarry(modify_target) => {
                let (value, carry) = rotate_right_thru_carry(
                    modify_target.read_value(registers, bus),
                    registers.c_flag(),
                );
                modify_target.write_value(value, registers, bus);
                let z = modify_target != ModifyTarget::Accumulator && value == 0;
                registers.set_flags(z, false, false, carry);
            }
            Self::ShiftLeft(modify_target) => {
                let value = modify_target.read_value(registers, bus);
                let carry = value & 0x80 != 0;
                let value = value << 1;
                modify_target.write_value(value, registers, bus);
                registers.set_flags(value == 0, false, false, carry);
            }
            Self::Swap(modify_target) => {
                let value = modify_target.read_value(registers, bus);
                let value = (value >> 4) | (value << 4);
                modify_target.write_value(value, registers, bus);
                registers.set_flags(value == 0, false, false, false);
            }
            Self::ArithmeticShiftRight(modify_target) => {
                let value = modify_target.read_value(registers, bus);
                let carry = value & 0x01 != 0;
                let value = (value >> 1) | (value & 0x80);
                modify_target.write_value(value, registers, bus);
                registers.set_flags(value == 0, false, false, carry);
            }
            Self::LogicalShiftRight(modify_target) => {
                let value = modify_target.read_value(registers, bus);
                let carry = value & 0x01 != 0;
                let value = value >> 1;
                modify_target.write_value(value, registers, bus);
                registers.set_flags(value == 0, false, false, carry);
            }
            Self::TestBit(n, read_target) => {
                let value = read_target.read_value(registers, bus);
                registers.update_flags(
                    Some(value & (1 << n) == 0),
                    Some(false),
                    Some(true),
                    None,
                );
            }
            Self::SetBit(n, modify_target) => {
                let value = (1 << n) | modify_target.read_value(registers, bus);
                modify_target.write_value(value, registers, bus);
            }
            Self::ResetBit(n, modify_target) => {
                let value = !(1 << n) & modify_target.read_value(registers, bus);
                modify_target.write_value(value, registers, bus);
            }
            Self::ComplementCarryFlag => {
                registers.update_flags(
                    None,
                    Some(false),
                    Some(false),
                    Some(!registers.c_flag()),
                );
            }
            Self::SetCarryFlag => {
                registers.update_flags(None, Some(false), Some(false), Some(true));
            }
            Self::DecimalAdjustAccumulator => {
                decimal_adjust_accumulator(registers);
            }
            Self::ComplementAccumulator => {
                registers.a = !registers.a;
                registers.update_flags(None, Some(true), Some(true), None);
            }
            Self::Jump(nn) => {
                registers.pc = nn;
            }
            Self::JumpHL => {
                registers.pc = registers.hl();
            }
            Self::JumpCond(cc, nn) => {
                if cc.check(registers) {
                    registers.pc = nn;
                }
            }
            Self::RelativeJump(e) => {
                registers.pc = registers.pc.wrapping_add(e as u16);
            }
            Self::RelativeJumpCond(cc, e) => {
                if cc.check(registers) {
                    registers.pc = registers.pc.wrapping_add(e as u16);
                }
            }
            Self::Call(nn) => {
                let return_address = registers.pc;
                push_stack(bus, registers, return_address);
                registers.pc = nn;
            }
            Self::CallCond(cc, nn) => {
                if cc.check(registers) {
                    let return_address = registers.pc;
                    push_stack(bus, registers, return_address);
                    registers.pc = nn;
                }
            }
            Self::Return => {
                registers.pc = pop_stack(bus, registers);
            }
            Self::ReturnCond(cc) => {
                if cc.check(registers) {
                    registers.pc = pop_stack(bus, registers);
                }
            }
            Self::ReturnFromInterruptHandler => {
                registers.pc = pop_stack(bus, registers);
                registers.ime = true;
            }
            Self::RestartCall(rst_address) => {
                let return_address = registers.pc;
                push_stack(bus, registers, return_address);
                registers.pc = rst_address.into();
            }
            Self::Halt => {
                registers.halted = true;
            }
            Self::Stop => {
                // STOP would halt the clocks until a button press; treated
                // as NOP for compatibility.
            }
            Self::DisableInterrupts => {
                registers.ime = false;
            }
            Self::EnableInterrupts => {
                registers.ime = true;
            }
            Self::NoOp => {}
        }
    }

    /// Return the number of clock cycles required to execute this
    /// instruction.
    ///
    /// Requires CPU registers as a parameter because conditional control
    /// flow instructions cost more when the condition holds.
    pub fn cycles_required(self, registers: &CpuRegisters) -> u32 {
        match self {
            Self::DecimalAdjustAccumulator
            | Self::ComplementAccumulator
            | Self::RotateLeft(ModifyTarget::Accumulator)
            | Self::RotateLeftThruCarry(ModifyTarget::Accumulator)
            | Self::RotateRight(ModifyTarget::Accumulator)
            | Self::RotateRightThruCarry(ModifyTarget::Accumulator)
            | Self::SetCarryFlag
            | Self::ComplementCarryFlag
            | Self::NoOp
            | Self::DisableInterrupts
            | Self::EnableInterrupts
            | Self::JumpHL
            | Self::Halt
            | Self::Stop => 4,
            Self::LoadStackPointerHL
            | Self::AddHLRegister(..)
            | Self::IncRegisterPair(..)
            | Self::DecRegisterPair(..) => 8,
            Self::LoadRegisterPairImmediate(..)
            | Self::PopStack(..)
            | Self::LoadHLStackPointerOffset(..)
            | Self::RelativeJump(..) => 12,
            Self::PushStack(..)
            | Self::AddSPImmediate(..)
            | Self::Jump(..)
            | Self::Return
            | Self::ReturnFromInterruptHandler
            | Self::RestartCall(..) => 16,
            Self::LoadDirectStackPointer(..) => 20,
            Self::Call(..) => 24,
            Self::JumpCond(cc, ..) => {
                if cc.check(registers) {
                    16
                } else {
                    12
                }
            }
            Self::RelativeJumpCond(cc, ..) => {
                if cc.check(registers) {
                    12
                } else {
                    8
                }
            }
            Self::CallCond(cc, ..) => {
                if cc.check(registers) {
                    24
                } else {
                    12
                }
            }
            Self::ReturnCond(cc) => {
                if cc.check(registers) {
                    20
                } else {
                    8
                }
            }
            Self::Load(write_target, read_target) => {
                4 + read_target.cycles_required() + write_target.cycles_required()
            }
            Self::Add(read_target)
            | Self::AddWithCarry(read_target)
            | Self::Subtract(read_target)
            | Self::SubtractWithCarry(read_target)
            | Self::And(read_target)
            | Self::Or(read_target)
            | Self::Xor(read_target)
            | Self::Compare(read_target) => 4 + read_target.cycles_required(),
            Self::TestBit(_, read_target) => 8 + read_target.cycles_required(),
            Self::Increment(modify_target) | Self::Decrement(modify_target) => {
                4 + 2 * modify_target.cycles_required()
            }
            Self::RotateLeft(modify_target)
            | Self::RotateRight(modify_target)
            | Self::RotateLeftThruCarry(modify_target)
            | Self::RotateRightThruCarry(modify_target)
            | Self::ShiftLeft(modify_target)
            | Self::ArithmeticShiftRight(modify_target)
            | Self::LogicalShiftRight(modify_target)
            | Self::Swap(modify_target)
            | Self::ResetBit(_, modify_target)
            | Self::SetBit(_, modify_target) => 8 + 2 * modify_target.cycles_required(),
        }
    }
}

fn add(lhs: u8, rhs: u8, carry_in: bool) -> (u8, bool, bool) {
    let carry_in = u8::from(carry_in);
    let (sum, carry) = match lhs.overflowing_add(rhs) {
        (sum, true) => (sum.wrapping_add(carry_in), true),
        (sum, false) => sum.overflowing_add(carry_in),
    };
    let half_carry = (lhs & 0x0F) + (rhs & 0x0F) + carry_in >= 0x10;

    (sum, carry, half_carry)
}

fn sub(lhs: u8, rhs: u8, carry_in: bool) -> (u8, bool, bool) {
    let carry_in = u8::from(carry_in);
    let (difference, carry) = match lhs.overflowing_sub(rhs) {
        (difference, true) => (difference.wrapping_sub(carry_in), true),
        (difference, false) => difference.overflowing_sub(carry_in),
    };
    let half_carry = lhs & 0x0F < (rhs & 0x0F) + carry_in;

    (difference, carry, half_carry)
}

fn add_u16(lhs: u16, rhs: u16) -> (u16, bool, bool) {
    let (sum, carry) = lhs.overflowing_add(rhs);
    let half_carry = (lhs & 0x0FFF) + (rhs & 0x0FFF) >= 0x1000;

    (sum, carry, half_carry)
}

// ADD SP, e and LD HL, SP+e compute H and C from the unsigned addition of
// the offset byte to the low byte of SP, even when the offset is negative.
fn add_sp_offset(sp: u16, offset: i8) -> (u16, bool, bool) {
    let unsigned = offset as u8;
    let half_carry = (sp & 0x000F) + u16::from(unsigned & 0x0F) >= 0x0010;
    let carry = (sp & 0x00FF) + u16::from(unsigned) >= 0x0100;

    (sp.wrapping_add(offset as u16), carry, half_carry)
}

fn rotate_left(value: u8) -> (u8, bool) {
    let top_set = value & 0x80 != 0;
    ((value << 1) | u8::from(top_set), top_set)
}

fn rotate_left_thru_carry(value: u8, carry: bool) -> (u8, bool) {
    ((value << 1) | u8::from(carry), value & 0x80 != 0)
}

fn rotate_right(value: u8) -> (u8, bool) {
    let bottom_set = value & 0x01 != 0;
    ((value >> 1) | (u8::from(bottom_set) << 7), bottom_set)
}

fn rotate_right_thru_carry(value: u8, carry: bool) -> (u8, bool) {
    ((value >> 1) | (u8::from(carry) << 7), value & 0x01 != 0)
}

fn decimal_adjust_accumulator(registers: &mut CpuRegisters) {
    if registers.n_flag() {
        // Last op was subtraction
        let mut value = registers.a;
        if registers.h_flag() {
            value = value.wrapping_sub(0x06);
        }
        if registers.c_flag() {
            value = value.wrapping_sub(0x60);
        }

        registers.a = value;
        registers.update_flags(Some(value == 0), None, Some(false), None);
    } else {
        // Last op was addition
        let mut value = registers.a;
        let mut carry = false;
        if value > 0x99 || registers.c_flag() {
            value = value.wrapping_add(0x60);
            carry = true;
        }
        if value & 0x0F >= 0x0A || registers.h_flag() {
            value = value.wrapping_add(0x06);
        }

        registers.a = value;
        registers.update_flags(Some(value == 0), None, Some(false), Some(carry));
    }
}
