//! Decoding and encoding of the instructions in the `code` array of a `Code` attribute.
//!
//! Decoding doesn't need the constant pool: operands referencing it are kept as raw indices.

use std::fmt::{Display, Formatter};
use std::io::Cursor;
use crate::error::{bail_invalid, Error, Result};
use crate::io::{ClassRead, ClassWrite};
use crate::opcode::{self, Family};

/// The operands of an instruction, one variant per [`Family`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operands {
	NoOperand,
	/// For `bipush` this holds the signed byte, for `ldc` a constant pool index, for `newarray` the array type, and
	/// for the rest a local variable index.
	ImmediateByte(u16),
	Increment { index: u16, constant: i16 },
	/// For `sipush` this holds the signed short, for the rest a constant pool index.
	ImmediateShort(u16),
	Branch(i16),
	WideBranch(i32),
	TableSwitch { default: i32, low: i32, high: i32, offsets: Vec<i32> },
	LookupSwitch { default: i32, pairs: Vec<(i32, i32)> },
	InvokeInterface { index: u16, count: u8, reserved: u8 },
	InvokeDynamic { index: u16, reserved: u16 },
	MultiANewArray { index: u16, dimensions: u8 },
}

impl Operands {
	pub fn family(&self) -> Family {
		match self {
			Operands::NoOperand => Family::NoOperand,
			Operands::ImmediateByte(_) => Family::ImmediateByte,
			Operands::Increment { .. } => Family::Increment,
			Operands::ImmediateShort(_) => Family::ImmediateShort,
			Operands::Branch(_) => Family::Branch,
			Operands::WideBranch(_) => Family::WideBranch,
			Operands::TableSwitch { .. } => Family::TableSwitch,
			Operands::LookupSwitch { .. } => Family::LookupSwitch,
			Operands::InvokeInterface { .. } => Family::InvokeInterface,
			Operands::InvokeDynamic { .. } => Family::InvokeDynamic,
			Operands::MultiANewArray { .. } => Family::MultiANewArray,
		}
	}
}

/// A decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
	/// The position of the opcode in the `code` array. Branch offsets are relative to this.
	pub offset: u32,
	pub opcode: u8,
	/// Whether a preceding `wide` instruction widened the operands of this one.
	pub wide: bool,
	pub operands: Operands,
}

/// The number of padding bytes after the opcode of a switch instruction at `offset`, so that the operands start at a
/// multiple of four.
pub fn switch_padding(offset: u32) -> u32 {
	(4 - (offset + 1) % 4) % 4
}

impl Instruction {
	pub fn mnemonic(&self) -> &'static str {
		opcode::mnemonic(self.opcode).unwrap_or("?")
	}

	/// The number of bytes this instruction takes up, including the opcode.
	pub fn size(&self) -> u32 {
		let operands = match &self.operands {
			Operands::NoOperand => 0,
			Operands::ImmediateByte(_) => if self.wide { 2 } else { 1 },
			Operands::Increment { .. } => if self.wide { 4 } else { 2 },
			Operands::ImmediateShort(_) | Operands::Branch(_) => 2,
			Operands::WideBranch(_) => 4,
			Operands::TableSwitch { offsets, .. } => switch_padding(self.offset) + 12 + 4 * offsets.len() as u32,
			Operands::LookupSwitch { pairs, .. } => switch_padding(self.offset) + 8 + 8 * pairs.len() as u32,
			Operands::InvokeInterface { .. } | Operands::InvokeDynamic { .. } => 4,
			Operands::MultiANewArray { .. } => 3,
		};
		1 + operands
	}

	/// The absolute offsets this instruction may jump to. For switches the default target comes first.
	pub fn branch_targets(&self) -> Vec<i64> {
		let base = self.offset as i64;
		match &self.operands {
			&Operands::Branch(offset) => vec![base + offset as i64],
			&Operands::WideBranch(offset) => vec![base + offset as i64],
			Operands::TableSwitch { default, offsets, .. } => std::iter::once(default)
				.chain(offsets)
				.map(|&offset| base + offset as i64)
				.collect(),
			Operands::LookupSwitch { default, pairs } => std::iter::once(*default)
				.chain(pairs.iter().map(|&(_, offset)| offset))
				.map(|offset| base + offset as i64)
				.collect(),
			_ => Vec::new(),
		}
	}

	/// The constant pool index this instruction refers to, if any.
	pub fn constant_pool_index(&self) -> Option<u16> {
		if !opcode::references_constant_pool(self.opcode) {
			return None;
		}
		match self.operands {
			Operands::ImmediateByte(index) |
			Operands::ImmediateShort(index) |
			Operands::InvokeInterface { index, .. } |
			Operands::InvokeDynamic { index, .. } |
			Operands::MultiANewArray { index, .. } => Some(index),
			_ => None,
		}
	}

	fn read_operands(reader: &mut impl ClassRead, family: Family, offset: u32, wide: bool) -> Result<Operands> {
		Ok(match family {
			Family::NoOperand => Operands::NoOperand,
			Family::ImmediateByte => Operands::ImmediateByte(if wide { reader.read_u16()? } else { reader.read_u8()? as u16 }),
			Family::Increment => if wide {
				Operands::Increment { index: reader.read_u16()?, constant: reader.read_i16()? }
			} else {
				Operands::Increment { index: reader.read_u8()? as u16, constant: reader.read_i8()? as i16 }
			},
			Family::ImmediateShort => Operands::ImmediateShort(reader.read_u16()?),
			Family::Branch => Operands::Branch(reader.read_i16()?),
			Family::WideBranch => Operands::WideBranch(reader.read_i32()?),
			Family::TableSwitch => {
				reader.read_u8_vec(switch_padding(offset) as usize)?;
				let default = reader.read_i32()?;
				let low = reader.read_i32()?;
				let high = reader.read_i32()?;
				if low > high {
					bail_invalid!("tableswitch at offset {offset} has low {low} greater than high {high}");
				}
				let count = (high as i64 - low as i64 + 1) as usize;
				let offsets = reader.read_vec(|_| Ok(count), |r| r.read_i32())?;
				Operands::TableSwitch { default, low, high, offsets }
			},
			Family::LookupSwitch => {
				reader.read_u8_vec(switch_padding(offset) as usize)?;
				let default = reader.read_i32()?;
				let npairs = reader.read_i32()?;
				let Ok(npairs) = usize::try_from(npairs) else {
					bail_invalid!("lookupswitch at offset {offset} has negative npairs {npairs}");
				};
				let pairs = reader.read_vec(|_| Ok(npairs), |r| Ok((r.read_i32()?, r.read_i32()?)))?;
				Operands::LookupSwitch { default, pairs }
			},
			Family::InvokeInterface => Operands::InvokeInterface {
				index: reader.read_u16()?,
				count: reader.read_u8()?,
				reserved: reader.read_u8()?,
			},
			Family::InvokeDynamic => Operands::InvokeDynamic {
				index: reader.read_u16()?,
				reserved: reader.read_u16()?,
			},
			Family::MultiANewArray => Operands::MultiANewArray {
				index: reader.read_u16()?,
				dimensions: reader.read_u8()?,
			},
		})
	}

	fn write(&self, writer: &mut impl ClassWrite) -> Result<()> {
		let Some(family) = opcode::family(self.opcode) else {
			return Err(Error::InvalidOpcode { opcode: self.opcode, offset: self.offset });
		};
		if family != self.operands.family() {
			bail_invalid!("{} at offset {} can't have operands {:?}", self.mnemonic(), self.offset, self.operands);
		}

		writer.write_u8(self.opcode)?;
		match self.operands {
			Operands::NoOperand => {},
			Operands::ImmediateByte(value) => if self.wide {
				writer.write_u16(value)?;
			} else {
				let Ok(value) = u8::try_from(value) else {
					bail_invalid!("operand {value} of {} at offset {} needs a preceding wide", self.mnemonic(), self.offset);
				};
				writer.write_u8(value)?;
			},
			Operands::Increment { index, constant } => if self.wide {
				writer.write_u16(index)?;
				writer.write_i16(constant)?;
			} else {
				let (Ok(index), Ok(constant)) = (u8::try_from(index), i8::try_from(constant)) else {
					bail_invalid!("iinc {index} {constant} at offset {} needs a preceding wide", self.offset);
				};
				writer.write_u8(index)?;
				writer.write_i8(constant)?;
			},
			Operands::ImmediateShort(value) => writer.write_u16(value)?,
			Operands::Branch(offset) => writer.write_i16(offset)?,
			Operands::WideBranch(offset) => writer.write_i32(offset)?,
			Operands::TableSwitch { default, low, high, ref offsets } => {
				if low > high || (high as i64 - low as i64 + 1) as usize != offsets.len() {
					bail_invalid!("tableswitch at offset {} has {} offsets for the range {low}..={high}", self.offset, offsets.len());
				}
				write_padding(writer, self.offset)?;
				writer.write_i32(default)?;
				writer.write_i32(low)?;
				writer.write_i32(high)?;
				for &offset in offsets {
					writer.write_i32(offset)?;
				}
			},
			Operands::LookupSwitch { default, ref pairs } => {
				write_padding(writer, self.offset)?;
				writer.write_i32(default)?;
				let Ok(npairs) = i32::try_from(pairs.len()) else {
					bail_invalid!("lookupswitch at offset {} has too many pairs", self.offset);
				};
				writer.write_i32(npairs)?;
				for &(key, offset) in pairs {
					writer.write_i32(key)?;
					writer.write_i32(offset)?;
				}
			},
			Operands::InvokeInterface { index, count, reserved } => {
				writer.write_u16(index)?;
				writer.write_u8(count)?;
				writer.write_u8(reserved)?;
			},
			Operands::InvokeDynamic { index, reserved } => {
				writer.write_u16(index)?;
				writer.write_u16(reserved)?;
			},
			Operands::MultiANewArray { index, dimensions } => {
				writer.write_u16(index)?;
				writer.write_u8(dimensions)?;
			},
		}
		Ok(())
	}
}

fn write_padding(writer: &mut impl ClassWrite, offset: u32) -> Result<()> {
	match switch_padding(offset) {
		0 => Ok(()),
		1 => writer.write_u8_slice(&[0]),
		2 => writer.write_u8_slice(&[0, 0]),
		_ => writer.write_u8_slice(&[0, 0, 0]),
	}
}

impl Display for Instruction {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}", self.offset, self.mnemonic())?;
		let base = self.offset as i64;
		match self.operands {
			Operands::NoOperand => Ok(()),
			Operands::ImmediateByte(value) => match self.opcode {
				opcode::BIPUSH => write!(f, " {}", value as u8 as i8),
				opcode::LDC => write!(f, " #{value}"),
				opcode::NEWARRAY => match opcode::array_type_name(value as u8) {
					Some(name) => write!(f, " {name}"),
					None => write!(f, " {value}"),
				},
				_ => write!(f, " {value}"),
			},
			Operands::Increment { index, constant } => write!(f, " {index} {constant}"),
			Operands::ImmediateShort(value) => match self.opcode {
				opcode::SIPUSH => write!(f, " {}", value as i16),
				_ => write!(f, " #{value}"),
			},
			Operands::Branch(offset) => write!(f, " {}", base + offset as i64),
			Operands::WideBranch(offset) => write!(f, " {}", base + offset as i64),
			Operands::TableSwitch { default, low, ref offsets, .. } => {
				write!(f, " {{")?;
				for (key, &offset) in (low as i64..).zip(offsets) {
					write!(f, " {key}: {},", base + offset as i64)?;
				}
				write!(f, " default: {} }}", base + default as i64)
			},
			Operands::LookupSwitch { default, ref pairs } => {
				write!(f, " {{")?;
				for &(key, offset) in pairs {
					write!(f, " {key}: {},", base + offset as i64)?;
				}
				write!(f, " default: {} }}", base + default as i64)
			},
			Operands::InvokeInterface { index, count, .. } => write!(f, " #{index} {count}"),
			Operands::InvokeDynamic { index, .. } => write!(f, " #{index}"),
			Operands::MultiANewArray { index, dimensions } => write!(f, " #{index} {dimensions}"),
		}
	}
}

/// Decodes a whole `code` array.
///
/// An unknown opcode fails with [`Error::InvalidOpcode`], operands running past the end of the array with
/// [`Error::InvalidFormat`].
pub fn decode(code: &[u8]) -> Result<Vec<Instruction>> {
	let mut reader = Cursor::new(code);
	let mut instructions = Vec::new();
	// Whether the previous instruction was a `wide`.
	let mut after_wide = false;

	while (reader.position() as usize) < code.len() {
		let offset = reader.position() as u32;
		let opcode = reader.read_u8()?;
		let Some(family) = opcode::family(opcode) else {
			return Err(Error::InvalidOpcode { opcode, offset });
		};

		let wide = after_wide && opcode::is_widenable(opcode);
		if after_wide && !wide {
			log::debug!("wide at offset {} is followed by {}, which it doesn't widen", offset - 1, opcode::mnemonic(opcode).unwrap_or("?"));
		}

		let operands = Instruction::read_operands(&mut reader, family, offset, wide)
			.map_err(|e| match e {
				Error::Io(_) => Error::InvalidFormat(format!(
					"operands of {} at offset {offset} run past the end of the code array of length {}",
					opcode::mnemonic(opcode).unwrap_or("?"),
					code.len(),
				)),
				e => e,
			})?;

		instructions.push(Instruction { offset, opcode, wide, operands });
		after_wide = opcode == opcode::WIDE;
	}

	Ok(instructions)
}

/// Encodes instructions back into a `code` array.
///
/// The offset of each instruction must equal the position it ends up at, since switch padding and branch offsets
/// depend on it. The `wide` flags must match the `wide` instructions present.
pub fn encode(instructions: &[Instruction]) -> Result<Vec<u8>> {
	let mut code = Vec::new();
	let mut after_wide = false;

	for instruction in instructions {
		if instruction.offset as usize != code.len() {
			bail_invalid!(
				"{} is recorded at offset {}, but would be written at offset {}",
				instruction.mnemonic(), instruction.offset, code.len(),
			);
		}
		if instruction.wide != (after_wide && opcode::is_widenable(instruction.opcode)) {
			bail_invalid!(
				"wide flag of {} at offset {} doesn't match the preceding instruction",
				instruction.mnemonic(), instruction.offset,
			);
		}

		instruction.write(&mut code)?;
		after_wide = instruction.opcode == opcode::WIDE;
	}

	if u32::try_from(code.len()).is_err() {
		bail_invalid!("code array of length {} doesn't fit into an u32", code.len());
	}

	Ok(code)
}

/// Finds the instruction starting exactly at `offset`. The instructions must be sorted by offset, as returned by
/// [`decode`].
pub fn instruction_at(instructions: &[Instruction], offset: u32) -> Option<&Instruction> {
	instructions.binary_search_by_key(&offset, |instruction| instruction.offset)
		.ok()
		.map(|index| &instructions[index])
}

/// A branch target that doesn't land on the start of an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadBranchTarget {
	/// Offset of the branching instruction.
	pub offset: u32,
	pub target: i64,
}

/// Checks that every branch target lands on an instruction boundary, computing the boundaries by summing up the
/// instruction sizes.
///
/// This doesn't reject anything, it only reports what it found.
pub fn verify_branch_targets(instructions: &[Instruction]) -> Vec<BadBranchTarget> {
	let mut boundaries = Vec::with_capacity(instructions.len());
	let mut position: i64 = 0;
	for instruction in instructions {
		if instruction.offset as i64 != position {
			log::debug!("{} is recorded at offset {}, but the sizes before it add up to {position}", instruction.mnemonic(), instruction.offset);
		}
		boundaries.push(position);
		position += instruction.size() as i64;
	}

	instructions.iter()
		.flat_map(|instruction| {
			instruction.branch_targets()
				.into_iter()
				.map(|target| BadBranchTarget { offset: instruction.offset, target })
		})
		.filter(|bad| boundaries.binary_search(&bad.target).is_err())
		.collect()
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::error::Error;
	use crate::opcode;
	use super::{decode, encode, instruction_at, switch_padding, verify_branch_targets, BadBranchTarget, Instruction, Operands};

	fn instruction(offset: u32, opcode: u8, operands: Operands) -> Instruction {
		Instruction { offset, opcode, wide: false, operands }
	}

	#[test]
	fn padding() {
		let first_operand = |o: u32| o + 1 + switch_padding(o);
		assert_eq!(first_operand(0), 4);
		assert_eq!(first_operand(1), 4);
		assert_eq!(first_operand(2), 4);
		assert_eq!(first_operand(3), 4);
		assert_eq!(first_operand(4), 8);
	}

	#[test]
	fn every_family() -> anyhow::Result<()> {
		let code = [
			0x2a, // aload_0
			0x10, 0xfb, // bipush -5
			0x84, 0x01, 0xff, // iinc 1 -1
			0xb7, 0x00, 0x01, // invokespecial #1
			0xb9, 0x00, 0x02, 0x01, 0x00, // invokeinterface #2 1
			0xba, 0x00, 0x03, 0x00, 0x00, // invokedynamic #3
			0xc5, 0x00, 0x04, 0x02, // multianewarray #4 2
			0xa7, 0xff, 0xfc, // goto 19
			0xc8, 0x00, 0x00, 0x00, 0x05, // goto_w 31
			0xb1, // return
		];
		let instructions = decode(&code)?;
		assert_eq!(instructions, vec![
			instruction(0, opcode::ALOAD_0, Operands::NoOperand),
			instruction(1, opcode::BIPUSH, Operands::ImmediateByte(0xfb)),
			instruction(3, opcode::IINC, Operands::Increment { index: 1, constant: -1 }),
			instruction(6, opcode::INVOKESPECIAL, Operands::ImmediateShort(1)),
			instruction(9, opcode::INVOKEINTERFACE, Operands::InvokeInterface { index: 2, count: 1, reserved: 0 }),
			instruction(14, opcode::INVOKEDYNAMIC, Operands::InvokeDynamic { index: 3, reserved: 0 }),
			instruction(19, opcode::MULTIANEWARRAY, Operands::MultiANewArray { index: 4, dimensions: 2 }),
			instruction(23, opcode::GOTO, Operands::Branch(-4)),
			instruction(26, opcode::GOTO_W, Operands::WideBranch(5)),
			instruction(31, opcode::RETURN, Operands::NoOperand),
		]);
		for instruction in &instructions {
			let next = instructions.iter().find(|i| i.offset > instruction.offset).map_or(code.len() as u32, |i| i.offset);
			assert_eq!(instruction.size(), next - instruction.offset, "{instruction}");
		}
		assert_eq!(encode(&instructions)?, code);
		assert_eq!(verify_branch_targets(&instructions), Vec::new());
		Ok(())
	}

	#[test]
	fn table_switch() -> anyhow::Result<()> {
		let code = [
			0x00, // nop
			0xaa, 0x00, 0x00, // tableswitch, padding
			0x00, 0x00, 0x00, 0x18, // default
			0x00, 0x00, 0x00, 0x01, // low
			0x00, 0x00, 0x00, 0x02, // high
			0x00, 0x00, 0x00, 0x17,
			0xff, 0xff, 0xff, 0xff,
			0xb1, // return
		];
		let instructions = decode(&code)?;
		assert_eq!(instructions[1], instruction(1, opcode::TABLESWITCH, Operands::TableSwitch {
			default: 24,
			low: 1,
			high: 2,
			offsets: vec![23, -1],
		}));
		assert_eq!(instructions[1].size(), 23);
		assert_eq!(instructions[2].offset, 24);
		assert_eq!(instructions[1].branch_targets(), vec![25, 24, 0]);
		assert_eq!(instructions[1].to_string(), "1: tableswitch { 1: 24, 2: 0, default: 25 }");
		assert_eq!(encode(&instructions)?, code);

		assert_eq!(verify_branch_targets(&instructions), vec![BadBranchTarget { offset: 1, target: 25 }]);
		Ok(())
	}

	#[test]
	fn lookup_switch() -> anyhow::Result<()> {
		let code = [
			0xab, 0x00, 0x00, 0x00, // lookupswitch, padding
			0x00, 0x00, 0x00, 0x14, // default
			0x00, 0x00, 0x00, 0x01, // npairs
			0xff, 0xff, 0xff, 0x9c, 0x00, 0x00, 0x00, 0x14,
			0xb1,
		];
		let instructions = decode(&code)?;
		assert_eq!(instructions[0].operands, Operands::LookupSwitch { default: 20, pairs: vec![(-100, 20)] });
		assert_eq!(instructions[0].size(), 20);
		assert_eq!(encode(&instructions)?, code);

		let negative = [0xab, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff, 0xff, 0xff];
		assert!(matches!(decode(&negative), Err(Error::InvalidFormat(_))));
		Ok(())
	}

	#[test]
	fn table_switch_bounds() {
		let code = [0xaa, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 1];
		assert!(matches!(decode(&code), Err(Error::InvalidFormat(_))));
	}

	#[test]
	fn wide() -> anyhow::Result<()> {
		let code = [
			0xc4, 0x84, 0x01, 0x00, 0xff, 0x38, // wide iinc 256 -200
			0x84, 0x01, 0x01, // iinc 1 1
			0xc4, 0x3a, 0x00, 0x05, // wide astore 5
			0xc4, 0x00, // wide nop
		];
		let instructions = decode(&code)?;
		assert_eq!(instructions, vec![
			instruction(0, opcode::WIDE, Operands::NoOperand),
			Instruction { offset: 1, opcode: opcode::IINC, wide: true, operands: Operands::Increment { index: 256, constant: -200 } },
			instruction(6, opcode::IINC, Operands::Increment { index: 1, constant: 1 }),
			instruction(9, opcode::WIDE, Operands::NoOperand),
			Instruction { offset: 10, opcode: opcode::ASTORE, wide: true, operands: Operands::ImmediateByte(5) },
			instruction(13, opcode::WIDE, Operands::NoOperand),
			instruction(14, opcode::NOP, Operands::NoOperand),
		]);
		assert_eq!(instructions[1].size(), 5);
		assert_eq!(instructions[2].size(), 3);
		assert_eq!(encode(&instructions)?, code);
		Ok(())
	}

	#[test]
	fn unknown_opcode() {
		let result = decode(&[0x00, 0x00, 0xcb]);
		assert!(matches!(result, Err(Error::InvalidOpcode { opcode: 0xcb, offset: 2 })));
	}

	#[test]
	fn truncated_operands() {
		assert!(matches!(decode(&[0x11, 0x00]), Err(Error::InvalidFormat(_))));
		assert!(matches!(decode(&[0xc8, 0x00, 0x00]), Err(Error::InvalidFormat(_))));
		assert!(matches!(decode(&[0xaa, 0x00]), Err(Error::InvalidFormat(_))));
	}

	#[test]
	fn encode_checks() {
		let misplaced = [instruction(1, opcode::NOP, Operands::NoOperand)];
		assert!(matches!(encode(&misplaced), Err(Error::InvalidFormat(_))));

		let wrong_family = [instruction(0, opcode::GOTO, Operands::NoOperand)];
		assert!(matches!(encode(&wrong_family), Err(Error::InvalidFormat(_))));

		let needs_wide = [instruction(0, opcode::ILOAD, Operands::ImmediateByte(300))];
		assert!(matches!(encode(&needs_wide), Err(Error::InvalidFormat(_))));

		let stray_wide = [Instruction { offset: 0, opcode: opcode::ILOAD, wide: true, operands: Operands::ImmediateByte(1) }];
		assert!(matches!(encode(&stray_wide), Err(Error::InvalidFormat(_))));
	}

	#[test]
	fn lookup_by_offset() -> anyhow::Result<()> {
		let instructions = decode(&[0x10, 0x05, 0x3b, 0xb1])?;
		assert_eq!(instruction_at(&instructions, 2).map(|i| i.opcode), Some(opcode::ISTORE_0));
		assert_eq!(instruction_at(&instructions, 1), None);
		assert_eq!(instruction_at(&instructions, 9), None);
		Ok(())
	}

	#[test]
	fn display() -> anyhow::Result<()> {
		let instructions = decode(&[0x10, 0xfb, 0x11, 0x80, 0x00, 0xbc, 0x0a, 0x12, 0x07, 0x99, 0x00, 0x03])?;
		let lines: Vec<_> = instructions.iter().map(ToString::to_string).collect();
		assert_eq!(lines, ["0: bipush -5", "2: sipush -32768", "5: newarray int", "7: ldc #7", "9: ifeq 12"]);
		Ok(())
	}
}
