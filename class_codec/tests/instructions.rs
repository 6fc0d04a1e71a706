use pretty_assertions::assert_eq;
use class_codec::instruction::{decode, encode, instruction_at, verify_branch_targets, BadBranchTarget};
use class_codec::opcode::{self, Family};
use class_codec::{Error, Instruction, Operands};

#[test]
fn single_no_operand() -> anyhow::Result<()> {
	let instructions = decode(&[0x03])?;
	assert_eq!(instructions, vec![Instruction { offset: 0, opcode: opcode::ICONST_0, wide: false, operands: Operands::NoOperand }]);
	assert_eq!(instructions[0].size(), 1);
	assert_eq!(instructions[0].operands.family(), Family::NoOperand);
	Ok(())
}

#[test]
fn bipush() -> anyhow::Result<()> {
	let instructions = decode(&[0x10, 0x05])?;
	assert_eq!(instructions.len(), 1);
	assert_eq!(instructions[0].size(), 2);
	assert_eq!(instructions[0].to_string(), "0: bipush 5");
	Ok(())
}

#[test]
fn wide_iload() -> anyhow::Result<()> {
	let code = [0xc4, 0x15, 0x00, 0x01];
	let instructions = decode(&code)?;
	assert_eq!(instructions, vec![
		Instruction { offset: 0, opcode: opcode::WIDE, wide: false, operands: Operands::NoOperand },
		Instruction { offset: 1, opcode: opcode::ILOAD, wide: true, operands: Operands::ImmediateByte(1) },
	]);
	assert_eq!(instructions[0].size(), 1);
	assert_eq!(instructions[1].size(), 3);
	assert_eq!(encode(&instructions)?, code);
	Ok(())
}

#[test]
fn wide_resets_after_one_instruction() -> anyhow::Result<()> {
	let instructions = decode(&[0xc4, 0x84, 0x00, 0x01, 0x00, 0x02, 0x15, 0x03])?;
	assert_eq!(instructions[1].operands, Operands::Increment { index: 1, constant: 2 });
	assert_eq!(instructions[1].size(), 5);
	assert_eq!(instructions[2], Instruction { offset: 6, opcode: opcode::ILOAD, wide: false, operands: Operands::ImmediateByte(3) });
	assert_eq!(instructions[2].size(), 2);
	Ok(())
}

#[test]
fn switch_alignment_at_every_offset() -> anyhow::Result<()> {
	for offset in 0..8u32 {
		let mut code = vec![0x00; offset as usize];
		code.push(0xab);
		let padding = (4 - (offset + 1) % 4) % 4;
		code.extend(std::iter::repeat(0).take(padding as usize));
		assert_eq!(code.len() as u32, offset + 1 + padding);
		assert_eq!(code.len() % 4, 0);
		code.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]); // default 0, no pairs

		let instructions = decode(&code)?;
		let switch = instruction_at(&instructions, offset).ok_or_else(|| anyhow::anyhow!("no switch at {offset}"))?;
		assert_eq!(switch.operands, Operands::LookupSwitch { default: 0, pairs: Vec::new() });
		assert_eq!(switch.size(), 1 + padding + 8);
		assert_eq!(encode(&instructions)?, code);
	}
	Ok(())
}

#[test]
fn every_opcode_has_a_family() {
	for opcode in 0..=u8::MAX {
		let code = [opcode, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
		match decode(&code) {
			Err(Error::InvalidOpcode { opcode: found, offset: 0 }) => {
				assert_eq!(found, opcode);
				assert!(opcode::family(opcode).is_none(), "{opcode:#04x}");
			},
			Ok(instructions) => {
				assert_eq!(instructions[0].operands.family(), opcode::family(opcode).unwrap());
			},
			// switches with a zero default and an empty range of low = high = 0 need more bytes
			Err(Error::InvalidFormat(_)) => assert_eq!(opcode, opcode::TABLESWITCH),
			Err(e) => panic!("unexpected error for {opcode:#04x}: {e}"),
		}
	}
}

#[test]
fn branch_diagnostics() -> anyhow::Result<()> {
	let code = [
		0xa7, 0x00, 0x04, // goto 4, the middle of sipush
		0x11, 0x00, 0x01, // sipush 1
		0x99, 0xff, 0xfd, // ifeq 3
		0xb1,
	];
	let instructions = decode(&code)?;
	assert_eq!(verify_branch_targets(&instructions), vec![BadBranchTarget { offset: 0, target: 4 }]);
	Ok(())
}
