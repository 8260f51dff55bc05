use super::{hash_map, run_test, set_in_state, ExpectedState, ALL_REGISTERS};

#[test]
fn ld_register_immediate() {
    for r in ALL_REGISTERS {
        let load_opcode = 0x06 | (r.to_opcode_bits() << 3);

        let mut expected = ExpectedState::empty();
        set_in_state(&mut expected, r, 0x47);

        run_test(&format!("{load_opcode:02X}47"), &expected);
    }
}

#[test]
fn ld_register_register() {
    run_test(
        // LD B, 0x33; LD A, B
        "063378",
        &ExpectedState {
            a: Some(0x33),
            b: Some(0x33),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x91; LD D, A; LD L, D
        "3E91576A",
        &ExpectedState {
            d: Some(0x91),
            l: Some(0x91),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn ld_indirect_hl() {
    run_test(
        // LD HL, 0xC456; LD (HL), 0x99; LD A, (HL)
        "2156C436997E",
        &ExpectedState {
            a: Some(0x99),
            memory: hash_map! { 0xC456: 0x99 },
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn ld_hl_inc_dec() {
    run_test(
        // LD HL, 0xC400; LD A, 0x12; LD (HL+), A
        "2100C43E1222",
        &ExpectedState {
            h: Some(0xC4),
            l: Some(0x01),
            memory: hash_map! { 0xC400: 0x12 },
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0xC400; LD A, 0x12; LD (HL-), A
        "2100C43E1232",
        &ExpectedState {
            h: Some(0xC3),
            l: Some(0xFF),
            memory: hash_map! { 0xC400: 0x12 },
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0xC400; LD (HL), 0x34; LD A, (HL+)
        "2100C436342A",
        &ExpectedState {
            a: Some(0x34),
            h: Some(0xC4),
            l: Some(0x01),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn ld_indirect_bc_de() {
    run_test(
        // LD BC, 0xC200; LD A, 0x9A; LD (BC), A
        "0100C23E9A02",
        &ExpectedState {
            memory: hash_map! { 0xC200: 0x9A },
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD DE, 0xC201; LD A, 0x45; LD (DE), A; LD A, 0x00; LD A, (DE)
        "1101C23E45123E001A",
        &ExpectedState {
            a: Some(0x45),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn ldh_direct_and_indirect_c() {
    run_test(
        // LD A, 0x5A; LDH (0x90), A; LD A, 0x00; LDH A, (0x90)
        "3E5AE0903E00F090",
        &ExpectedState {
            a: Some(0x5A),
            memory: hash_map! { 0xFF90: 0x5A },
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD C, 0x91; LD A, 0x77; LD (FF00+C), A
        "0E913E77E2",
        &ExpectedState {
            memory: hash_map! { 0xFF91: 0x77 },
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD C, 0x92; LD A, 0x13; LD (FF00+C), A; LD A, (FF00+C)
        "0E923E13E2F2",
        &ExpectedState {
            a: Some(0x13),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn ld_direct_16bit_address() {
    run_test(
        // LD A, 0x42; LD (0xC100), A; LD A, 0x00; LD A, (0xC100)
        "3E42EA00C13E00FA00C1",
        &ExpectedState {
            a: Some(0x42),
            memory: hash_map! { 0xC100: 0x42 },
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn ld_register_pair_immediate() {
    run_test(
        // LD BC, 0x1234; LD DE, 0x5678; LD HL, 0x9ABC; LD SP, 0xCDEF
        "01341211785621BC9A31EFCD",
        &ExpectedState {
            b: Some(0x12),
            c: Some(0x34),
            d: Some(0x56),
            e: Some(0x78),
            h: Some(0x9A),
            l: Some(0xBC),
            sp: Some(0xCDEF),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn ld_direct_stack_pointer() {
    run_test(
        // LD SP, 0xCAFE; LD (0xC300), SP
        "31FECA0800C3",
        &ExpectedState {
            sp: Some(0xCAFE),
            memory: hash_map! { 0xC300: 0xFE, 0xC301: 0xCA },
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn ld_stack_pointer_hl() {
    run_test(
        // LD HL, 0xC234; LD SP, HL
        "2134C2F9",
        &ExpectedState {
            sp: Some(0xC234),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn ld_hl_stack_pointer_offset() {
    run_test(
        // LD SP, 0xFFF8; LD HL, SP+0x08
        "31F8FFF808",
        &ExpectedState {
            h: Some(0x00),
            l: Some(0x00),
            sp: Some(0xFFF8),
            f: Some(0x30),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD SP, 0xC000; LD HL, SP-2
        "3100C0F8FE",
        &ExpectedState {
            h: Some(0xBF),
            l: Some(0xFE),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn push_pop() {
    run_test(
        // LD BC, 0x1234; PUSH BC; POP DE
        "013412C5D1",
        &ExpectedState {
            d: Some(0x12),
            e: Some(0x34),
            sp: Some(0xFFFE),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0xBEEF; PUSH HL; POP BC; PUSH BC; POP DE
        "21EFBEE5C1C5D1",
        &ExpectedState {
            b: Some(0xBE),
            c: Some(0xEF),
            d: Some(0xBE),
            e: Some(0xEF),
            sp: Some(0xFFFE),
            ..ExpectedState::empty()
        },
    );

    // The stack grows downward: high byte lands at SP-1, low at SP-2
    run_test(
        // LD SP, 0xC400; LD BC, 0x1234; PUSH BC
        "3100C4013412C5",
        &ExpectedState {
            sp: Some(0xC3FE),
            memory: hash_map! { 0xC3FF: 0x12, 0xC3FE: 0x34 },
            ..ExpectedState::empty()
        },
    );
}
