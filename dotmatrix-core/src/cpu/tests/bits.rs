use super::{hash_map, run_test, ExpectedState};

#[test]
fn bit_test_sets_zero_from_complement() {
    run_test(
        // LD A, 0x80; BIT 7, A
        "3E80CB7F",
        &ExpectedState {
            a: Some(0x80),
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x80; BIT 0, A
        "3E80CB47",
        &ExpectedState {
            a: Some(0x80),
            f: Some(0xA0),
            ..ExpectedState::empty()
        },
    );

    // Carry is left alone
    run_test(
        // SCF; LD A, 0x01; BIT 0, A
        "373E01CB47",
        &ExpectedState {
            f: Some(0x30),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn bit_test_indirect_hl() {
    run_test(
        // LD HL, 0xC100; LD (HL), 0x04; BIT 2, (HL)
        "2100C13604CB56",
        &ExpectedState {
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0xC100; LD (HL), 0x00; BIT 2, (HL)
        "2100C13600CB56",
        &ExpectedState {
            f: Some(0xA0),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn set_bit() {
    run_test(
        // LD B, 0x00; SET 3, B
        "0600CBD8",
        &ExpectedState {
            b: Some(0x08),
            f: Some(0x80),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0xC100; LD (HL), 0x00; SET 7, (HL)
        "2100C13600CBFE",
        &ExpectedState {
            memory: hash_map! { 0xC100: 0x80 },
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn reset_bit() {
    run_test(
        // LD C, 0xFF; RES 0, C
        "0EFFCB81",
        &ExpectedState {
            c: Some(0xFE),
            f: Some(0x80),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0xC100; LD (HL), 0xFF; RES 7, (HL)
        "2100C136FFCBBE",
        &ExpectedState {
            memory: hash_map! { 0xC100: 0x7F },
            ..ExpectedState::empty()
        },
    );
}
