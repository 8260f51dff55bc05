use crate::cpu::instructions::{Instruction, JumpCondition, ModifyTarget, ReadTarget, WriteTarget};
use crate::cpu::registers::{CpuRegister, CpuRegisterPair};
use crate::host::Host;
use crate::memory::Bus;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid opcode {opcode:#04X}")]
pub(crate) struct ParseError {
    pub opcode: u8,
}

/// Decode the instruction at `pc`, returning it along with the address of
/// the following instruction.
pub(crate) fn parse_next_instruction<H: Host>(
    bus: &mut Bus<H>,
    pc: u16,
) -> Result<(Instruction, u16), ParseError> {
    let opcode = bus.read(pc);

    let decoded = match opcode {
        0x00 => (Instruction::NoOp, pc.wrapping_add(1)),
        0x01 | 0x11 | 0x21 | 0x31 => {
            let rr = register_pair_for_other_ops(opcode);
            let nn = bus.read_u16(pc.wrapping_add(1));
            (Instruction::LoadRegisterPairImmediate(rr, nn), pc.wrapping_add(3))
        }
        0x02 => (
            Instruction::Load(WriteTarget::IndirectBC, ReadTarget::Accumulator),
            pc.wrapping_add(1),
        ),
        0x03 | 0x13 | 0x23 | 0x33 => (
            Instruction::IncRegisterPair(register_pair_for_other_ops(opcode)),
            pc.wrapping_add(1),
        ),
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
            let target = CpuRegister::from_mid_opcode_bits(opcode)
                .map_or(ModifyTarget::IndirectHL, ModifyTarget::Register);
            (Instruction::Increment(target), pc.wrapping_add(1))
        }
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
            let target = CpuRegister::from_mid_opcode_bits(opcode)
                .map_or(ModifyTarget::IndirectHL, ModifyTarget::Register);
            (Instruction::Decrement(target), pc.wrapping_add(1))
        }
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            let target = CpuRegister::from_mid_opcode_bits(opcode)
                .map_or(WriteTarget::IndirectHL, WriteTarget::Register);
            let n = bus.read(pc.wrapping_add(1));
            (
                Instruction::Load(target, ReadTarget::Immediate(n)),
                pc.wrapping_add(2),
            )
        }
        0x07 => (
            Instruction::RotateLeft(ModifyTarget::Accumulator),
            pc.wrapping_add(1),
        ),
        0x08 => {
            let nn = bus.read_u16(pc.wrapping_add(1));
            (Instruction::LoadDirectStackPointer(nn), pc.wrapping_add(3))
        }
        0x09 | 0x19 | 0x29 | 0x39 => (
            Instruction::AddHLRegister(register_pair_for_other_ops(opcode)),
            pc.wrapping_add(1),
        ),
        0x0A => (
            Instruction::Load(WriteTarget::Accumulator, ReadTarget::IndirectBC),
            pc.wrapping_add(1),
        ),
        0x0B | 0x1B | 0x2B | 0x3B => (
            Instruction::DecRegisterPair(register_pair_for_other_ops(opcode)),
            pc.wrapping_add(1),
        ),
        0x0F => (
            Instruction::RotateRight(ModifyTarget::Accumulator),
            pc.wrapping_add(1),
        ),
        0x10 => (Instruction::Stop, pc.wrapping_add(1)),
        0x12 => (
            Instruction::Load(WriteTarget::IndirectDE, ReadTarget::Accumulator),
            pc.wrapping_add(1),
        ),
        0x17 => (
            Instruction::RotateLeftThruCarry(ModifyTarget::Accumulator),
            pc.wrapping_add(1),
        ),
        0x18 => {
            let e = bus.read(pc.wrapping_add(1)) as i8;
            (Instruction::RelativeJump(e), pc.wrapping_add(2))
        }
        0x1A => (
            Instruction::Load(WriteTarget::Accumulator, ReadTarget::IndirectDE),
            pc.wrapping_add(1),
        ),
        0x1F => (
            Instruction::RotateRightThruCarry(ModifyTarget::Accumulator),
            pc.wrapping_add(1),
        ),
        0x20 | 0x28 | 0x30 | 0x38 => {
            let cc = parse_jump_condition(opcode);
            let e = bus.read(pc.wrapping_add(1)) as i8;
            (Instruction::RelativeJumpCond(cc, e), pc.wrapping_add(2))
        }
        0x22 => (
            Instruction::Load(WriteTarget::IndirectHLInc, ReadTarget::Accumulator),
            pc.wrapping_add(1),
        ),
        0x27 => (Instruction::DecimalAdjustAccumulator, pc.wrapping_add(1)),
        0x2A => (
            Instruction::Load(WriteTarget::Accumulator, ReadTarget::IndirectHLInc),
            pc.wrapping_add(1),
        ),
        0x2F => (Instruction::ComplementAccumulator, pc.wrapping_add(1)),
        0x32 => (
            Instruction::Load(WriteTarget::IndirectHLDec, ReadTarget::Accumulator),
            pc.wrapping_add(1),
        ),
        0x37 => (Instruction::SetCarryFlag, pc.wrapping_add(1)),
        0x3A => (
            Instruction::Load(WriteTarget::Accumulator, ReadTarget::IndirectHLDec),
            pc.wrapping_add(1),
        ),
        0x3F => (Instruction::ComplementCarryFlag, pc.wrapping_add(1)),
        opcode @ 0x40..=0x7F => {
            if opcode == 0x76 {
                (Instruction::Halt, pc.wrapping_add(1))
            } else {
                let write_target = CpuRegister::from_mid_opcode_bits(opcode)
                    .map_or(WriteTarget::IndirectHL, WriteTarget::Register);
                let read_target = CpuRegister::from_low_opcode_bits(opcode)
                    .map_or(ReadTarget::IndirectHL, ReadTarget::Register);
                (Instruction::Load(write_target, read_target), pc.wrapping_add(1))
            }
        }
        opcode @ 0x80..=0xBF => {
            let read_target = CpuRegister::from_low_opcode_bits(opcode)
                .map_or(ReadTarget::IndirectHL, ReadTarget::Register);
            let instruction = match opcode & 0x38 {
                0x00 => Instruction::Add(read_target),
                0x08 => Instruction::AddWithCarry(read_target),
                0x10 => Instruction::Subtract(read_target),
                0x18 => Instruction::SubtractWithCarry(read_target),
                0x20 => Instruction::And(read_target),
                0x28 => Instruction::Xor(read_target),
                0x30 => Instruction::Or(read_target),
                _ => Instruction::Compare(read_target),
            };
            (instruction, pc.wrapping_add(1))
        }
        0xC0 | 0xC8 | 0xD0 | 0xD8 => (
            Instruction::ReturnCond(parse_jump_condition(opcode)),
            pc.wrapping_add(1),
        ),
        0xC1 | 0xD1 | 0xE1 | 0xF1 => (
            Instruction::PopStack(register_pair_for_push_pop(opcode)),
            pc.wrapping_add(1),
        ),
        0xC2 | 0xCA | 0xD2 | 0xDA => {
            let cc = parse_jump_condition(opcode);
            let nn = bus.read_u16(pc.wrapping_add(1));
            (Instruction::JumpCond(cc, nn), pc.wrapping_add(3))
        }
        0xC3 => {
            let nn = bus.read_u16(pc.wrapping_add(1));
            (Instruction::Jump(nn), pc.wrapping_add(3))
        }
        0xC4 | 0xCC | 0xD4 | 0xDC => {
            let cc = parse_jump_condition(opcode);
            let nn = bus.read_u16(pc.wrapping_add(1));
            (Instruction::CallCond(cc, nn), pc.wrapping_add(3))
        }
        0xC5 | 0xD5 | 0xE5 | 0xF5 => (
            Instruction::PushStack(register_pair_for_push_pop(opcode)),
            pc.wrapping_add(1),
        ),
        0xC6 => {
            let n = bus.read(pc.wrapping_add(1));
            (Instruction::Add(ReadTarget::Immediate(n)), pc.wrapping_add(2))
        }
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            (Instruction::RestartCall(opcode & 0x38), pc.wrapping_add(1))
        }
        0xC9 => (Instruction::Return, pc.wrapping_add(1)),
        0xCB => parse_cb_prefixed_opcode(bus, pc),
        0xCD => {
            let nn = bus.read_u16(pc.wrapping_add(1));
            (Instruction::Call(nn), pc.wrapping_add(3))
        }
        0xCE => {
            let n = bus.read(pc.wrapping_add(1));
            (
                Instruction::AddWithCarry(ReadTarget::Immediate(n)),
                pc.wrapping_add(2),
            )
        }
        0xD6 => {
            let n = bus.read(pc.wrapping_add(1));
            (
                Instruction::Subtract(ReadTarget::Immediate(n)),
                pc.wrapping_add(2),
            )
        }
        0xD9 => (Instruction::ReturnFromInterruptHandler, pc.wrapping_add(1)),
        0xDE => {
            let n = bus.read(pc.wrapping_add(1));
            (
                Instruction::SubtractWithCarry(ReadTarget::Immediate(n)),
                pc.wrapping_add(2),
            )
        }
        0xE0 => {
            let n = bus.read(pc.wrapping_add(1));
            (
                Instruction::Load(WriteTarget::FFDirect(n), ReadTarget::Accumulator),
                pc.wrapping_add(2),
            )
        }
        0xE2 => (
            Instruction::Load(WriteTarget::FFIndirectC, ReadTarget::Accumulator),
            pc.wrapping_add(1),
        ),
        0xE6 => {
            let n = bus.read(pc.wrapping_add(1));
            (Instruction::And(ReadTarget::Immediate(n)), pc.wrapping_add(2))
        }
        0xE8 => {
            let e = bus.read(pc.wrapping_add(1)) as i8;
            (Instruction::AddSPImmediate(e), pc.wrapping_add(2))
        }
        0xE9 => (Instruction::JumpHL, pc.wrapping_add(1)),
        0xEA => {
            let nn = bus.read_u16(pc.wrapping_add(1));
            (
                Instruction::Load(WriteTarget::Direct(nn), ReadTarget::Accumulator),
                pc.wrapping_add(3),
            )
        }
        0xEE => {
            let n = bus.read(pc.wrapping_add(1));
            (Instruction::Xor(ReadTarget::Immediate(n)), pc.wrapping_add(2))
        }
        0xF0 => {
            let n = bus.read(pc.wrapping_add(1));
            (
                Instruction::Load(WriteTarget::Accumulator, ReadTarget::FFDirect(n)),
                pc.wrapping_add(2),
            )
        }
        0xF2 => (
            Instruction::Load(WriteTarget::Accumulator, ReadTarget::FFIndirectC),
            pc.wrapping_add(1),
        ),
        0xF3 => (Instruction::DisableInterrupts, pc.wrapping_add(1)),
        0xF6 => {
            let n = bus.read(pc.wrapping_add(1));
            (Instruction::Or(ReadTarget::Immediate(n)), pc.wrapping_add(2))
        }
        0xF8 => {
            let e = bus.read(pc.wrapping_add(1)) as i8;
            (Instruction::LoadHLStackPointerOffset(e), pc.wrapping_add(2))
        }
        0xF9 => (Instruction::LoadStackPointerHL, pc.wrapping_add(1)),
        0xFA => {
            let nn = bus.read_u16(pc.wrapping_add(1));
            (
                Instruction::Load(WriteTarget::Accumulator, ReadTarget::Direct(nn)),
                pc.wrapping_add(3),
            )
        }
        0xFB => (Instruction::EnableInterrupts, pc.wrapping_add(1)),
        0xFE => {
            let n = bus.read(pc.wrapping_add(1));
            (
                Instruction::Compare(ReadTarget::Immediate(n)),
                pc.wrapping_add(2),
            )
        }
        _ => return Err(ParseError { opcode }),
    };

    Ok(decoded)
}

fn parse_cb_prefixed_opcode<H: Host>(bus: &mut Bus<H>, pc: u16) -> (Instruction, u16) {
    let opcode = bus.read(pc.wrapping_add(1));
    let next_pc = pc.wrapping_add(2);

    let modify_target = CpuRegister::from_low_opcode_bits(opcode)
        .map_or(ModifyTarget::IndirectHL, ModifyTarget::Register);

    let instruction = match opcode {
        0x00..=0x07 => Instruction::RotateLeft(modify_target),
        0x08..=0x0F => Instruction::RotateRight(modify_target),
        0x10..=0x17 => Instruction::RotateLeftThruCarry(modify_target),
        0x18..=0x1F => Instruction::RotateRightThruCarry(modify_target),
        0x20..=0x27 => Instruction::ShiftLeft(modify_target),
        0x28..=0x2F => Instruction::ArithmeticShiftRight(modify_target),
        0x30..=0x37 => Instruction::Swap(modify_target),
        0x38..=0x3F => Instruction::LogicalShiftRight(modify_target),
        0x40..=0x7F => {
            let bit = (opcode & 0x38) >> 3;
            let read_target = CpuRegister::from_low_opcode_bits(opcode)
                .map_or(ReadTarget::IndirectHL, ReadTarget::Register);
            Instruction::TestBit(bit, read_target)
        }
        0x80..=0xBF => {
            let bit = (opcode & 0x38) >> 3;
            Instruction::ResetBit(bit, modify_target)
        }
        0xC0..=0xFF => {
            let bit = (opcode & 0x38) >> 3;
            Instruction::SetBit(bit, modify_target)
        }
    };

    (instruction, next_pc)
}

fn register_pair_for_other_ops(opcode: u8) -> CpuRegisterPair {
    match opcode & 0x30 {
        0x00 => CpuRegisterPair::BC,
        0x10 => CpuRegisterPair::DE,
        0x20 => CpuRegisterPair::HL,
        _ => CpuRegisterPair::SP,
    }
}

fn register_pair_for_push_pop(opcode: u8) -> CpuRegisterPair {
    match opcode & 0x30 {
        0x00 => CpuRegisterPair::BC,
        0x10 => CpuRegisterPair::DE,
        0x20 => CpuRegisterPair::HL,
        _ => CpuRegisterPair::AF,
    }
}

fn parse_jump_condition(opcode: u8) -> JumpCondition {
    match opcode & 0x18 {
        0x00 => JumpCondition::NZ,
        0x08 => JumpCondition::Z,
        0x10 => JumpCondition::NC,
        _ => JumpCondition::C,
    }
}
