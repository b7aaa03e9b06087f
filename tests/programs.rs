use rand::Rng;
use tisa::encoder::{self, put_imm16, put_regs};
use tisa::interpreter::{Context, Fault, FaultKind, Outcome};
use tisa::isa::{opcode::*, reg::*};

/// A context with random registers, whose memory is `code` followed by 4 zero bytes
fn setup(code: &[u8]) -> Context {
    let mut memory = code.to_vec();
    memory.extend_from_slice(&[0x00; 4]);
    Context::new(memory).with_registers(rand::thread_rng().gen())
}

fn assemble(lines: &[&str]) -> Vec<u8> {
    let mut mem = Vec::new();
    if let Err(e) = encoder::put_lines(&mut mem, lines) {
        panic!("{e}");
    }
    mem
}

#[test]
fn test_hlt() {
    let mut mem = Vec::new();
    put_regs(&mut mem, HLT, 0, 0).unwrap();
    let mut ctx = setup(&mem);

    assert_eq!(ctx.run(), Outcome::Halted { pc: 0x02 });
    assert_eq!(ctx.pc_end(), Some(0x02));
}

#[test]
fn test_nop() {
    let mut mem = Vec::new();
    put_regs(&mut mem, NOP, 0, 0).unwrap();
    put_regs(&mut mem, HLT, 0, 0).unwrap();
    let mut ctx = setup(&mem);
    let expected = ctx.clone();

    ctx.run();

    assert_eq!(ctx.registers, expected.registers);
    assert_eq!(ctx.memory, expected.memory);
    assert_eq!(ctx.pc_end(), Some(0x04));
}

#[test]
fn test_ldl() {
    let mut mem = Vec::new();
    put_imm16(&mut mem, LDL, RD, 0xFEED).unwrap();
    put_regs(&mut mem, HLT, 0, 0).unwrap();
    let mut ctx = setup(&mem);
    ctx.registers[RD as usize] = 0xDEADBEEF;

    let mut expected = ctx.registers;
    expected[RD as usize] = 0xDEADFEED;

    assert_eq!(ctx.run(), Outcome::Halted { pc: 0x06 });
    assert_eq!(ctx.registers, expected);
}

#[test]
fn test_ldh() {
    let mut mem = Vec::new();
    put_imm16(&mut mem, LDH, RF, 0xFEED).unwrap();
    put_regs(&mut mem, HLT, 0, 0).unwrap();
    let mut ctx = setup(&mem);
    ctx.registers[RF as usize] = 0xDEADBEEF;

    let mut expected = ctx.registers;
    expected[RF as usize] = 0xFEEDBEEF;

    ctx.run();
    assert_eq!(ctx.registers, expected);
}

#[test]
fn test_ldl_ldh_text() {
    let mut ctx = setup(&assemble(&["ldh ra dead", "ldl ra beef", "hlt"]));
    ctx.run();
    assert_eq!(ctx.register("ra"), Some(0xDEADBEEF));
}

#[test]
fn test_xor() {
    let mut ctx = setup(&assemble(&["xor rc rd", "hlt"]));

    let mut expected = ctx.registers;
    expected[RD as usize] ^= expected[RC as usize];

    ctx.run();
    assert_eq!(ctx.registers, expected);
}

#[test]
fn test_add() {
    let mut ctx = setup(&assemble(&["add re rf", "hlt"]));
    ctx.registers[RE as usize] = 0xBEEFDAD0;
    ctx.registers[RF as usize] = 0xFEEDDEAF;

    let mut expected = ctx.registers;
    expected[RF as usize] = 0xBEEFDAD0u32.wrapping_add(0xFEEDDEAF);

    ctx.run();
    assert_eq!(ctx.registers, expected);
}

#[test]
fn test_add_overflow() {
    let mut ctx = setup(&assemble(&["add ra rb", "hlt"]));
    ctx.registers[RA as usize] = 1;
    ctx.registers[RB as usize] = 0xFFFFFFFF;

    ctx.run();
    assert_eq!(ctx.registers[RB as usize], 0x00000000);
}

/// `beq` at 0, then nops and two `hlt`s at 8 and 14. Since the recorded pc points past the `hlt`,
/// a run that ends on the first one records 10 and one that ends on the second records 16.
fn run_beq(imm: &str, ra: u32, rc: u32) -> Context {
    let beq = format!("beq ra rb rc {imm}");
    let mut ctx = setup(&assemble(&[
        beq.as_str(), // 0
        "nop", // 4
        "nop", // 6
        "hlt", // 8
        "nop", // 10
        "nop", // 12
        "hlt", // 14
    ]));
    ctx.registers[RA as usize] = ra;
    ctx.registers[RB as usize] = 0xFEEDFEED;
    ctx.registers[RC as usize] = rc;

    let expected = ctx.registers;
    ctx.run();
    assert_eq!(ctx.registers, expected);
    ctx
}

#[test]
fn test_beq_zero_offset() {
    assert_eq!(run_beq("0", 0xFEEDFEED, 0x0E).pc_end(), Some(0x0E + 0x02));
    assert_eq!(run_beq("0", 0xFEEDF1ED, 0x0E).pc_end(), Some(0x08 + 0x02));
}

#[test]
fn test_beq_positive_offset() {
    assert_eq!(run_beq("2", 0xFEEDFEED, 0x0C).pc_end(), Some(0x0E + 0x02));
    assert_eq!(run_beq("2", 0xFEEDF1ED, 0x0C).pc_end(), Some(0x08 + 0x02));
}

#[test]
fn test_beq_negative_offset() {
    // 0x802 has the sign bit set and a magnitude of 2
    assert_eq!(run_beq("802", 0xFEEDFEED, 0x10).pc_end(), Some(0x0E + 0x02));
    assert_eq!(run_beq("802", 0xFEEDF1ED, 0x10).pc_end(), Some(0x08 + 0x02));
}

#[test]
fn test_beq_sign_magnitude() {
    // Negative zero
    assert_eq!(run_beq("800", 0xFEEDFEED, 0x0E).pc_end(), Some(0x0E + 0x02));
    // All ones is -2047, not -1
    assert_eq!(
        run_beq("fff", 0xFEEDFEED, 0x0E + 0x7FF).pc_end(),
        Some(0x0E + 0x02)
    );
}

#[test]
fn test_hlt_in_last_two_bytes() {
    // Only 2 bytes are needed to fetch a `hlt`, so it runs even though fewer than 4 bytes are
    // left at its address
    let mut ctx = Context::new(assemble(&["nop", "hlt"]));
    assert_eq!(ctx.run(), Outcome::Halted { pc: 4 });
}

#[test]
fn test_fetch_out_of_bounds() {
    let mut mem = assemble(&["nop", "ldl ra ffff"]);
    mem.truncate(5);
    let mut ctx = Context::new(mem).with_registers(rand::thread_rng().gen());
    let expected = ctx.registers;

    assert_eq!(
        ctx.run(),
        Outcome::Fault(Fault::new(FaultKind::FetchOutOfBounds, 2, Some(LDL)))
    );
    assert_eq!(ctx.registers, expected);
    assert_eq!(ctx.pc_end(), Some(2));
}

#[test]
fn test_invalid_opcode_keeps_prior_effects() {
    let mut mem = assemble(&["ldl ra 1234"]);
    mem.extend_from_slice(&[0x2A, 0x00]);
    let mut ctx = setup(&mem);

    let outcome = ctx.run();
    assert_eq!(
        outcome,
        Outcome::Fault(Fault::new(FaultKind::InvalidOpcode, 4, Some(0x2A)))
    );
    assert_eq!(ctx.registers[RA as usize] & 0xFFFF, 0x1234);
}

#[test]
fn test_assembled_source() {
    let source = "
        ; count rb up to 3 in steps of ra
        ldl ra 1
        ldl rc 3
        ldh rc 0
        ldl rd 12     # jumping to 0x12 + 2 lands on the add
        ldh rd 0
        add ra rb     ; 20
        beq rb rc re 0
        beq ra ra rd 2
        hlt
    ";
    let mut mem = Vec::new();
    encoder::assemble(&mut mem, source).unwrap();

    let mut ctx = Context::new(mem.clone()).with_registers([0; 16]);
    ctx.registers[RE as usize] = mem.len() as u32 - 2;

    assert_eq!(ctx.run(), Outcome::Halted { pc: mem.len() as u32 });
    assert_eq!(ctx.registers[RB as usize], 3);
}
