use crate::attribute::{find, Attribute, AttributeInfo, AttributeKind, LineNumberTableEntry};
use crate::error::Result;
use crate::instruction::{self, Instruction};
use crate::io::{read_structures, write_structures, ClassRead, ClassWrite, Context, Structure};
use crate::macros::structure;

structure! {
	struct ExceptionTableEntry {
		start_pc: u16,
		end_pc: u16,
		handler_pc: u16,
		/// Index of a `Class` entry, or `0` to catch everything.
		catch_type: u16,
	}
}

/// The body of a `Code` attribute.
///
/// The bytecode is kept as it was read. Use [`Code::instructions`] to decode it, which may fail for this code array
/// alone while the rest of the class file stays usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
	pub max_stack: u16,
	pub max_locals: u16,
	pub code: Vec<u8>,
	pub exception_table: Vec<ExceptionTableEntry>,
	pub attributes: Vec<Attribute>,
}

/// The source line of the instruction at `offset`, given the line number entries sorted by `start_pc`.
pub fn line_number_in(entries: &[LineNumberTableEntry], offset: u32) -> Option<u16> {
	let end = entries.partition_point(|entry| entry.start_pc as u32 <= offset);
	end.checked_sub(1).map(|index| entries[index].line_number)
}

impl Code {
	pub fn instructions(&self) -> Result<Vec<Instruction>> {
		instruction::decode(&self.code)
	}

	/// Replaces the bytecode by the encoding of the instructions.
	///
	/// This doesn't update the offsets stored in the exception table or in nested attributes.
	pub fn set_instructions(&mut self, instructions: &[Instruction]) -> Result<()> {
		self.code = instruction::encode(instructions)?;
		Ok(())
	}

	/// The entries of all `LineNumberTable` attributes, sorted by `start_pc`.
	pub fn line_numbers(&self) -> Vec<LineNumberTableEntry> {
		let mut entries: Vec<_> = self.attributes.iter()
			.filter_map(|attribute| match &attribute.info {
				AttributeInfo::LineNumberTable { line_number_table } => Some(line_number_table),
				_ => None,
			})
			.flatten()
			.cloned()
			.collect();
		entries.sort_by_key(|entry| entry.start_pc);
		entries
	}

	/// The source line of the instruction at `offset`, if there's line number information for it.
	///
	/// To look up many offsets, get [`Code::line_numbers`] once and use [`line_number_in`].
	pub fn line_number_at(&self, offset: u32) -> Option<u16> {
		line_number_in(&self.line_numbers(), offset)
	}

	pub fn attribute(&self, kind: AttributeKind) -> Option<&AttributeInfo> {
		find(&self.attributes, kind)
	}
}

impl Structure for Code {
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<Code> {
		cx.trace("read", "Code");
		let max_stack = reader.read_u16()?;
		let max_locals = reader.read_u16()?;
		let code_length = reader.read_u32_as_usize()?;
		let code = reader.read_u8_vec(code_length)?;
		let exception_table = read_structures(reader, cx)?;
		let attributes = read_structures(reader, cx)?;

		Ok(Code { max_stack, max_locals, code, exception_table, attributes })
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		cx.trace("write", "Code");
		writer.write_u16(self.max_stack)?;
		writer.write_u16(self.max_locals)?;
		writer.write_usize_as_u32(self.code.len())?;
		writer.write_u8_slice(&self.code)?;
		write_structures(writer, &self.exception_table, cx)?;
		write_structures(writer, &self.attributes, cx)
	}
}

#[cfg(test)]
mod testing {
	use std::io::Cursor;
	use pretty_assertions::assert_eq;
	use crate::attribute::{Attribute, AttributeInfo, LineNumberTableEntry};
	use crate::error::Error;
	use crate::instruction::Operands;
	use crate::io::{Context, Options, Structure};
	use crate::opcode;
	use crate::pool::{ConstantPool, CpInfo};
	use super::{line_number_in, Code, ExceptionTableEntry};

	fn code() -> Code {
		Code {
			max_stack: 1,
			max_locals: 1,
			code: vec![0x03, 0x3b, 0xb1], // iconst_0, istore_0, return
			exception_table: vec![ExceptionTableEntry { start_pc: 0, end_pc: 2, handler_pc: 2, catch_type: 0 }],
			attributes: vec![Attribute {
				name_index: 1,
				info: AttributeInfo::LineNumberTable {
					line_number_table: vec![
						LineNumberTableEntry { start_pc: 2, line_number: 11 },
						LineNumberTableEntry { start_pc: 0, line_number: 10 },
					],
				},
			}],
		}
	}

	#[test]
	fn nested_attributes() -> anyhow::Result<()> {
		let pool = ConstantPool::from_entries([Some(CpInfo::utf8("LineNumberTable"))]);
		let options = Options::default();
		let cx = Context::new(&options).with_pool(&pool);

		let code = code();
		let mut bytes = Vec::new();
		code.write(&mut bytes, &cx)?;
		assert_eq!(bytes, [
			0, 1, 0, 1,
			0, 0, 0, 3, 0x03, 0x3b, 0xb1,
			0, 1, 0, 0, 0, 2, 0, 2, 0, 0,
			0, 1, 0, 1, 0, 0, 0, 10, 0, 2, 0, 2, 0, 2, 0, 11, 0, 0, 0, 10,
		]);
		assert_eq!(Code::read(&mut Cursor::new(&bytes), &cx)?, code);
		Ok(())
	}

	#[test]
	fn instructions_and_lines() -> anyhow::Result<()> {
		let mut code = code();
		let mut instructions = code.instructions()?;
		assert_eq!(instructions.len(), 3);
		assert_eq!(code.line_number_at(0), Some(10));
		assert_eq!(code.line_number_at(1), Some(10));
		assert_eq!(code.line_number_at(2), Some(11));

		instructions[0].opcode = opcode::ICONST_1;
		code.set_instructions(&instructions)?;
		assert_eq!(code.code, [0x04, 0x3b, 0xb1]);

		instructions[1].operands = Operands::ImmediateByte(0);
		assert!(matches!(code.set_instructions(&instructions), Err(Error::InvalidFormat(_))));
		Ok(())
	}

	#[test]
	fn lines_of_sorted_entries() {
		let entries = code().line_numbers();
		assert_eq!(entries[0], LineNumberTableEntry { start_pc: 0, line_number: 10 });
		assert_eq!(line_number_in(&entries, 7), Some(11));
		assert_eq!(line_number_in(&entries[1..], 1), None);
		assert_eq!(line_number_in(&[], 0), None);
	}

	#[test]
	fn invalid_opcode_stays_local() {
		let code = Code { code: vec![0x00, 0xee], ..code() };
		assert!(matches!(code.instructions(), Err(Error::InvalidOpcode { opcode: 0xee, offset: 1 })));
	}
}
