use crate::cpu::instructions::{
    Instruction as I, JumpCondition, ModifyTarget, ReadTarget, WriteTarget,
};
use crate::cpu::registers::{CpuRegister, CpuRegisterPair, CpuRegisters};

#[test]
fn validate_cycles_required() {
    let mut cr = CpuRegisters::new();
    cr.f = 0x00;

    let reg = ReadTarget::Register(CpuRegister::B);
    let w_reg = WriteTarget::Register(CpuRegister::B);
    let m_reg = ModifyTarget::Register(CpuRegister::B);

    // 8-bit loads
    assert_eq!(4, I::Load(w_reg, reg).cycles_required(&cr));
    assert_eq!(8, I::Load(w_reg, ReadTarget::Immediate(0)).cycles_required(&cr));
    assert_eq!(8, I::Load(w_reg, ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, I::Load(WriteTarget::IndirectHL, reg).cycles_required(&cr));
    assert_eq!(
        12,
        I::Load(WriteTarget::IndirectHL, ReadTarget::Immediate(0)).cycles_required(&cr)
    );
    assert_eq!(
        8,
        I::Load(WriteTarget::Accumulator, ReadTarget::IndirectBC).cycles_required(&cr)
    );
    assert_eq!(
        8,
        I::Load(WriteTarget::IndirectDE, ReadTarget::Accumulator).cycles_required(&cr)
    );
    assert_eq!(
        16,
        I::Load(WriteTarget::Accumulator, ReadTarget::Direct(0)).cycles_required(&cr)
    );
    assert_eq!(
        16,
        I::Load(WriteTarget::Direct(0), ReadTarget::Accumulator).cycles_required(&cr)
    );
    assert_eq!(
        8,
        I::Load(WriteTarget::Accumulator, ReadTarget::FFIndirectC).cycles_required(&cr)
    );
    assert_eq!(
        12,
        I::Load(WriteTarget::Accumulator, ReadTarget::FFDirect(0)).cycles_required(&cr)
    );
    assert_eq!(
        12,
        I::Load(WriteTarget::FFDirect(0), ReadTarget::Accumulator).cycles_required(&cr)
    );
    assert_eq!(
        8,
        I::Load(WriteTarget::Accumulator, ReadTarget::IndirectHLInc).cycles_required(&cr)
    );
    assert_eq!(
        8,
        I::Load(WriteTarget::IndirectHLDec, ReadTarget::Accumulator).cycles_required(&cr)
    );

    // 16-bit loads
    assert_eq!(
        12,
        I::LoadRegisterPairImmediate(CpuRegisterPair::BC, 0).cycles_required(&cr)
    );
    assert_eq!(20, I::LoadDirectStackPointer(0).cycles_required(&cr));
    assert_eq!(8, I::LoadStackPointerHL.cycles_required(&cr));
    assert_eq!(16, I::PushStack(CpuRegisterPair::BC).cycles_required(&cr));
    assert_eq!(12, I::PopStack(CpuRegisterPair::BC).cycles_required(&cr));

    // 8-bit arithmetic/logical
    assert_eq!(4, I::Add(reg).cycles_required(&cr));
    assert_eq!(8, I::Add(ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, I::Add(ReadTarget::Immediate(0)).cycles_required(&cr));
    assert_eq!(4, I::AddWithCarry(reg).cycles_required(&cr));
    assert_eq!(4, I::Subtract(reg).cycles_required(&cr));
    assert_eq!(8, I::SubtractWithCarry(ReadTarget::Immediate(0)).cycles_required(&cr));
    assert_eq!(8, I::Compare(ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(4, I::Increment(m_reg).cycles_required(&cr));
    assert_eq!(12, I::Increment(ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(4, I::Decrement(m_reg).cycles_required(&cr));
    assert_eq!(12, I::Decrement(ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(4, I::And(reg).cycles_required(&cr));
    assert_eq!(8, I::Or(ReadTarget::Immediate(0)).cycles_required(&cr));
    assert_eq!(8, I::Xor(ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(4, I::ComplementCarryFlag.cycles_required(&cr));
    assert_eq!(4, I::SetCarryFlag.cycles_required(&cr));
    assert_eq!(4, I::DecimalAdjustAccumulator.cycles_required(&cr));
    assert_eq!(4, I::ComplementAccumulator.cycles_required(&cr));

    // 16-bit arithmetic
    assert_eq!(8, I::AddHLRegister(CpuRegisterPair::BC).cycles_required(&cr));
    assert_eq!(8, I::IncRegisterPair(CpuRegisterPair::BC).cycles_required(&cr));
    assert_eq!(8, I::DecRegisterPair(CpuRegisterPair::SP).cycles_required(&cr));
    assert_eq!(16, I::AddSPImmediate(0).cycles_required(&cr));
    assert_eq!(12, I::LoadHLStackPointerOffset(0).cycles_required(&cr));

    // Rotates and shifts
    assert_eq!(
        4,
        I::RotateLeft(ModifyTarget::Accumulator).cycles_required(&cr)
    );
    assert_eq!(
        4,
        I::RotateRightThruCarry(ModifyTarget::Accumulator).cycles_required(&cr)
    );
    assert_eq!(8, I::RotateLeft(m_reg).cycles_required(&cr));
    assert_eq!(16, I::RotateLeft(ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, I::RotateRight(m_reg).cycles_required(&cr));
    assert_eq!(
        16,
        I::RotateLeftThruCarry(ModifyTarget::IndirectHL).cycles_required(&cr)
    );
    assert_eq!(8, I::ShiftLeft(m_reg).cycles_required(&cr));
    assert_eq!(
        16,
        I::ArithmeticShiftRight(ModifyTarget::IndirectHL).cycles_required(&cr)
    );
    assert_eq!(8, I::LogicalShiftRight(m_reg).cycles_required(&cr));
    assert_eq!(16, I::Swap(ModifyTarget::IndirectHL).cycles_required(&cr));

    // Single-bit ops
    assert_eq!(8, I::TestBit(0, reg).cycles_required(&cr));
    assert_eq!(12, I::TestBit(0, ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, I::SetBit(0, m_reg).cycles_required(&cr));
    assert_eq!(16, I::SetBit(0, ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, I::ResetBit(0, m_reg).cycles_required(&cr));
    assert_eq!(16, I::ResetBit(0, ModifyTarget::IndirectHL).cycles_required(&cr));

    // Unconditional control flow
    assert_eq!(16, I::Jump(0).cycles_required(&cr));
    assert_eq!(4, I::JumpHL.cycles_required(&cr));
    assert_eq!(12, I::RelativeJump(0).cycles_required(&cr));
    assert_eq!(24, I::Call(0).cycles_required(&cr));
    assert_eq!(16, I::Return.cycles_required(&cr));
    assert_eq!(16, I::ReturnFromInterruptHandler.cycles_required(&cr));
    assert_eq!(16, I::RestartCall(0).cycles_required(&cr));
    assert_eq!(4, I::DisableInterrupts.cycles_required(&cr));
    assert_eq!(4, I::EnableInterrupts.cycles_required(&cr));
    assert_eq!(4, I::NoOp.cycles_required(&cr));
    assert_eq!(4, I::Halt.cycles_required(&cr));
    assert_eq!(4, I::Stop.cycles_required(&cr));
}

#[test]
fn conditional_cycles_depend_on_flags() {
    // All flags clear
    let mut cr = CpuRegisters::new();
    cr.f = 0x00;

    assert_eq!(12, I::JumpCond(JumpCondition::Z, 0).cycles_required(&cr));
    assert_eq!(16, I::JumpCond(JumpCondition::NZ, 0).cycles_required(&cr));

    assert_eq!(8, I::RelativeJumpCond(JumpCondition::C, 0).cycles_required(&cr));
    assert_eq!(12, I::RelativeJumpCond(JumpCondition::NC, 0).cycles_required(&cr));

    assert_eq!(12, I::CallCond(JumpCondition::Z, 0).cycles_required(&cr));
    assert_eq!(24, I::CallCond(JumpCondition::NZ, 0).cycles_required(&cr));

    assert_eq!(8, I::ReturnCond(JumpCondition::Z).cycles_required(&cr));
    assert_eq!(20, I::ReturnCond(JumpCondition::NZ).cycles_required(&cr));
}
