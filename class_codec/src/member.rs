use java_string::JavaString;
use crate::access::{describe_with_hex, AccessKind};
use crate::attribute::code::Code;
use crate::attribute::{find, Attribute, AttributeInfo, AttributeKind};
use crate::error::Result;
use crate::io::{read_structures, write_structures, ClassRead, ClassWrite, Context};
use crate::pool::ConstantPool;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MemberKind {
	Field,
	Method,
}

/// A field or a method.
///
/// Names and descriptors are stored as constant pool indices. The methods resolving them take the pool of the
/// class file this member belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMember {
	pub kind: MemberKind,
	pub access_flags: u16,
	pub name_index: u16,
	pub descriptor_index: u16,
	pub attributes: Vec<Attribute>,
}

impl ClassMember {
	pub fn name(&self, pool: &ConstantPool) -> Result<JavaString> {
		pool.get_string(self.name_index)
	}

	pub fn descriptor(&self, pool: &ConstantPool) -> Result<JavaString> {
		pool.get_string(self.descriptor_index)
	}

	/// Whether this member has exactly this name and descriptor. Indices that don't resolve never match.
	pub fn is(&self, pool: &ConstantPool, name: &str, descriptor: &str) -> bool {
		pool.utf8_equals(self.name_index, name) && pool.utf8_equals(self.descriptor_index, descriptor)
	}

	pub fn attribute(&self, kind: AttributeKind) -> Option<&AttributeInfo> {
		find(&self.attributes, kind)
	}

	pub fn code(&self) -> Option<&Code> {
		self.attributes.iter().find_map(|attribute| match &attribute.info {
			AttributeInfo::Code(code) => Some(code),
			_ => None,
		})
	}

	pub fn code_mut(&mut self) -> Option<&mut Code> {
		self.attributes.iter_mut().find_map(|attribute| match &mut attribute.info {
			AttributeInfo::Code(code) => Some(code),
			_ => None,
		})
	}

	pub fn access_kind(&self) -> AccessKind {
		match self.kind {
			MemberKind::Field => AccessKind::Field,
			MemberKind::Method => AccessKind::Method,
		}
	}

	/// The access flags as text, like `0x0009 (public static)`.
	pub fn describe_access(&self) -> String {
		describe_with_hex(self.access_flags, self.access_kind())
	}

	pub fn read(reader: &mut impl ClassRead, cx: &Context, kind: MemberKind) -> Result<ClassMember> {
		cx.trace("read", match kind {
			MemberKind::Field => "field",
			MemberKind::Method => "method",
		});
		Ok(ClassMember {
			kind,
			access_flags: reader.read_u16()?,
			name_index: reader.read_u16()?,
			descriptor_index: reader.read_u16()?,
			attributes: read_structures(reader, cx)?,
		})
	}

	pub fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		cx.trace("write", match self.kind {
			MemberKind::Field => "field",
			MemberKind::Method => "method",
		});
		writer.write_u16(self.access_flags)?;
		writer.write_u16(self.name_index)?;
		writer.write_u16(self.descriptor_index)?;
		write_structures(writer, &self.attributes, cx)
	}
}

/// Reads a `u16` count followed by that many members.
pub fn read_members(reader: &mut impl ClassRead, cx: &Context, kind: MemberKind) -> Result<Vec<ClassMember>> {
	reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| ClassMember::read(r, cx, kind),
	)
}

pub fn write_members(writer: &mut impl ClassWrite, members: &[ClassMember], cx: &Context) -> Result<()> {
	writer.write_slice(
		members,
		|w, size| w.write_usize_as_u16(size),
		|w, member| member.write(w, cx),
	)
}
