//! Type annotations, as found in `RuntimeVisibleTypeAnnotations` and `RuntimeInvisibleTypeAnnotations`.

use crate::attribute::annotation::{describe_pairs, read_pairs, write_pairs, ElementValuePair};
use crate::error::{bail_invalid, Result};
use crate::io::{ClassRead, ClassWrite, Context, Structure};
use crate::macros::structure;
use crate::pool::{display_utf8, ConstantPool};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeAnnotation {
	/// Which kind of type the annotation is on. This decides which variant of [`TargetInfo`] is used.
	pub target_type: u8,
	pub target_info: TargetInfo,
	pub target_path: Vec<TypePathEntry>,
	pub type_index: u16,
	pub element_value_pairs: Vec<ElementValuePair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetInfo {
	TypeParameter { type_parameter_index: u8 },
	Supertype { supertype_index: u16 },
	TypeParameterBound { type_parameter_index: u8, bound_index: u8 },
	Empty,
	FormalParameter { formal_parameter_index: u8 },
	Throws { throws_type_index: u16 },
	LocalVar { table: Vec<LocalVarTargetEntry> },
	Catch { exception_table_index: u16 },
	Offset { offset: u16 },
	TypeArgument { offset: u16, type_argument_index: u8 },
}

structure! {
	struct TypePathEntry {
		type_path_kind: u8,
		type_argument_index: u8,
	}
}

structure! {
	/// A live range of a local variable a type annotation is on.
	struct LocalVarTargetEntry {
		start_pc: u16,
		length: u16,
		index: u16,
	}
}

/// Which [`TargetInfo`] variant a target type uses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum TargetKind {
	TypeParameter,
	Supertype,
	TypeParameterBound,
	Empty,
	FormalParameter,
	Throws,
	LocalVar,
	Catch,
	Offset,
	TypeArgument,
}

impl TargetKind {
	fn of(target_type: u8) -> Option<TargetKind> {
		Some(match target_type {
			0x00 | 0x01 => TargetKind::TypeParameter,
			0x10 => TargetKind::Supertype,
			0x11 | 0x12 => TargetKind::TypeParameterBound,
			0x13..=0x15 => TargetKind::Empty,
			0x16 => TargetKind::FormalParameter,
			0x17 => TargetKind::Throws,
			0x40 | 0x41 => TargetKind::LocalVar,
			0x42 => TargetKind::Catch,
			0x43..=0x46 => TargetKind::Offset,
			0x47..=0x4b => TargetKind::TypeArgument,
			_ => return None,
		})
	}
}

impl TargetInfo {
	fn kind(&self) -> TargetKind {
		match self {
			TargetInfo::TypeParameter { .. } => TargetKind::TypeParameter,
			TargetInfo::Supertype { .. } => TargetKind::Supertype,
			TargetInfo::TypeParameterBound { .. } => TargetKind::TypeParameterBound,
			TargetInfo::Empty => TargetKind::Empty,
			TargetInfo::FormalParameter { .. } => TargetKind::FormalParameter,
			TargetInfo::Throws { .. } => TargetKind::Throws,
			TargetInfo::LocalVar { .. } => TargetKind::LocalVar,
			TargetInfo::Catch { .. } => TargetKind::Catch,
			TargetInfo::Offset { .. } => TargetKind::Offset,
			TargetInfo::TypeArgument { .. } => TargetKind::TypeArgument,
		}
	}

	fn read(reader: &mut impl ClassRead, cx: &Context, kind: TargetKind) -> Result<TargetInfo> {
		Ok(match kind {
			TargetKind::TypeParameter => TargetInfo::TypeParameter { type_parameter_index: reader.read_u8()? },
			TargetKind::Supertype => TargetInfo::Supertype { supertype_index: reader.read_u16()? },
			TargetKind::TypeParameterBound => TargetInfo::TypeParameterBound {
				type_parameter_index: reader.read_u8()?,
				bound_index: reader.read_u8()?,
			},
			TargetKind::Empty => TargetInfo::Empty,
			TargetKind::FormalParameter => TargetInfo::FormalParameter { formal_parameter_index: reader.read_u8()? },
			TargetKind::Throws => TargetInfo::Throws { throws_type_index: reader.read_u16()? },
			TargetKind::LocalVar => TargetInfo::LocalVar { table: crate::io::read_structures(reader, cx)? },
			TargetKind::Catch => TargetInfo::Catch { exception_table_index: reader.read_u16()? },
			TargetKind::Offset => TargetInfo::Offset { offset: reader.read_u16()? },
			TargetKind::TypeArgument => TargetInfo::TypeArgument {
				offset: reader.read_u16()?,
				type_argument_index: reader.read_u8()?,
			},
		})
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		match *self {
			TargetInfo::TypeParameter { type_parameter_index } => writer.write_u8(type_parameter_index)?,
			TargetInfo::Supertype { supertype_index } => writer.write_u16(supertype_index)?,
			TargetInfo::TypeParameterBound { type_parameter_index, bound_index } => {
				writer.write_u8(type_parameter_index)?;
				writer.write_u8(bound_index)?;
			},
			TargetInfo::Empty => {},
			TargetInfo::FormalParameter { formal_parameter_index } => writer.write_u8(formal_parameter_index)?,
			TargetInfo::Throws { throws_type_index } => writer.write_u16(throws_type_index)?,
			TargetInfo::LocalVar { ref table } => crate::io::write_structures(writer, table, cx)?,
			TargetInfo::Catch { exception_table_index } => writer.write_u16(exception_table_index)?,
			TargetInfo::Offset { offset } => writer.write_u16(offset)?,
			TargetInfo::TypeArgument { offset, type_argument_index } => {
				writer.write_u16(offset)?;
				writer.write_u8(type_argument_index)?;
			},
		}
		Ok(())
	}
}

impl TypeAnnotation {
	pub fn describe(&self, pool: &ConstantPool) -> Result<String> {
		let mut string = format!(
			"@{} on target {:#04x} {:?}",
			display_utf8(pool.get_utf8(self.type_index)?),
			self.target_type,
			self.target_info,
		);
		if !self.target_path.is_empty() {
			let path: Vec<_> = self.target_path.iter()
				.map(|entry| format!("{}:{}", entry.type_path_kind, entry.type_argument_index))
				.collect();
			string.push_str(&format!(" path [{}]", path.join(", ")));
		}
		if !self.element_value_pairs.is_empty() {
			string.push_str(&format!(" ({})", describe_pairs(&self.element_value_pairs, pool)?));
		}
		Ok(string)
	}
}

impl Structure for TypeAnnotation {
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<TypeAnnotation> {
		cx.trace("read", "TypeAnnotation");
		let target_type = reader.read_u8()?;
		let Some(kind) = TargetKind::of(target_type) else {
			bail_invalid!("unknown type annotation target type {target_type:#04x}");
		};
		let target_info = TargetInfo::read(reader, cx, kind)?;
		let target_path = reader.read_vec(
			|r| r.read_u8_as_usize(),
			|r| TypePathEntry::read(r, cx),
		)?;
		let type_index = reader.read_u16()?;
		let element_value_pairs = read_pairs(reader, cx, 0)?;

		Ok(TypeAnnotation { target_type, target_info, target_path, type_index, element_value_pairs })
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		cx.trace("write", "TypeAnnotation");
		if TargetKind::of(self.target_type) != Some(self.target_info.kind()) {
			bail_invalid!("type annotation target type {:#04x} doesn't fit target info {:?}", self.target_type, self.target_info);
		}
		writer.write_u8(self.target_type)?;
		self.target_info.write(writer, cx)?;
		writer.write_slice(
			&self.target_path,
			|w, size| w.write_usize_as_u8(size),
			|w, entry| entry.write(w, cx),
		)?;
		writer.write_u16(self.type_index)?;
		write_pairs(writer, &self.element_value_pairs, cx)
	}
}
