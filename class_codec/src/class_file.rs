//! The root of the model: a whole class file.

use std::io::Cursor;
use std::ops::RangeInclusive;
use java_string::JavaString;
use crate::access::{describe_with_hex, AccessKind};
use crate::attribute::{find, Attribute, AttributeInfo, AttributeKind};
use crate::error::{bail_invalid, Error, Result};
use crate::io::{read_structures, read_u16_list, write_structures, write_u16_list, ClassRead, ClassWrite, Context, Options, Structure};
use crate::member::{read_members, write_members, ClassMember, MemberKind};
use crate::pool::{tag, ConstantPool, CpInfo};

pub const MAGIC: u32 = 0xcafe_babe;

/// Major versions from Java 1.1 to Java 25. Others are read anyway, but produce a warning.
pub const SUPPORTED_MAJOR_VERSIONS: RangeInclusive<u16> = 45..=69;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
	pub minor_version: u16,
	pub major_version: u16,
	pub constant_pool: ConstantPool,
	pub access_flags: u16,
	/// Index of the `Class` entry of this class.
	pub this_class: u16,
	/// Index of the `Class` entry of the super class, or `0` for `java/lang/Object` and modules.
	pub super_class: u16,
	pub interfaces: Vec<u16>,
	pub fields: Vec<ClassMember>,
	pub methods: Vec<ClassMember>,
	pub attributes: Vec<Attribute>,
}

impl ClassFile {
	/// Reads a class file that makes up all of `bytes`.
	pub fn from_bytes(bytes: &[u8], options: &Options) -> Result<ClassFile> {
		let mut reader = Cursor::new(bytes);
		let class = ClassFile::read(&mut reader, &Context::new(options))
			.map_err(|e| match e {
				Error::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
					Error::InvalidFormat(format!("class file ends early after {} bytes: {e}", bytes.len()))
				},
				e => e,
			})?;

		let remaining = bytes.len() as u64 - reader.position();
		if remaining != 0 {
			bail_invalid!("{remaining} bytes left over after the class file");
		}

		Ok(class)
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		self.to_bytes_with(&Options::default())
	}

	/// Writes the class file with the given options. Only [`Options::trace`] has an effect on writing.
	pub fn to_bytes_with(&self, options: &Options) -> Result<Vec<u8>> {
		let mut vec = Vec::new();
		self.write(&mut vec, &Context::new(options))?;
		Ok(vec)
	}

	/// Gets the constant pool entry at `index`, failing if it isn't of the kind given by the tag.
	pub fn constant(&self, index: u16, tag: u8) -> Result<&CpInfo> {
		self.constant_pool.expect(index, tag)
	}

	/// The name of this class, like `java/lang/String`.
	pub fn class_name(&self) -> Result<JavaString> {
		self.constant_pool.class_name(self.this_class)
	}

	/// The name of the super class, or `None` if there's none.
	pub fn super_class_name(&self) -> Result<Option<JavaString>> {
		if self.super_class == 0 {
			Ok(None)
		} else {
			self.constant_pool.class_name(self.super_class).map(Some)
		}
	}

	pub fn interface_names(&self) -> Result<Vec<JavaString>> {
		self.interfaces.iter()
			.map(|&index| self.constant_pool.class_name(index))
			.collect()
	}

	pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&ClassMember> {
		self.methods.iter().find(|method| method.is(&self.constant_pool, name, descriptor))
	}

	pub fn find_field(&self, name: &str, descriptor: &str) -> Option<&ClassMember> {
		self.fields.iter().find(|field| field.is(&self.constant_pool, name, descriptor))
	}

	pub fn attribute(&self, kind: AttributeKind) -> Option<&AttributeInfo> {
		find(&self.attributes, kind)
	}

	pub fn source_file(&self) -> Result<Option<JavaString>> {
		match self.attribute(AttributeKind::SourceFile) {
			Some(&AttributeInfo::SourceFile { sourcefile_index }) => self.constant_pool.get_string(sourcefile_index).map(Some),
			_ => Ok(None),
		}
	}

	/// The access flags as text, like `0x0021 (public super)`.
	pub fn describe_access(&self) -> String {
		describe_with_hex(self.access_flags, AccessKind::Class)
	}

	/// Returns the index of a constant equal to `entry`, adding it to the pool if there's none.
	pub fn intern_constant(&mut self, entry: CpInfo) -> Result<u16> {
		self.constant_pool.intern(entry)
	}

	/// Adds `additional` empty slots at the end of the constant pool.
	pub fn enlarge_constant_pool(&mut self, additional: usize) -> Result<()> {
		self.constant_pool.enlarge(additional)
	}
}

impl Structure for ClassFile {
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<ClassFile> {
		cx.trace("read", "ClassFile");

		let magic = reader.read_u32()?;
		if magic != MAGIC {
			bail_invalid!("wrong magic {magic:#010x}, expected {MAGIC:#010x}");
		}

		let minor_version = reader.read_u16()?;
		let major_version = reader.read_u16()?;
		if !SUPPORTED_MAJOR_VERSIONS.contains(&major_version) {
			log::warn!(
				"class file version {major_version}.{minor_version} is outside of the supported major versions {}..={}",
				SUPPORTED_MAJOR_VERSIONS.start(), SUPPORTED_MAJOR_VERSIONS.end(),
			);
		}

		let constant_pool = ConstantPool::read(reader, cx)?;
		let cx = cx.with_pool(&constant_pool);

		let access_flags = reader.read_u16()?;
		let this_class = reader.read_u16()?;
		constant_pool.expect(this_class, tag::CLASS).map_err(|e| e.context("this_class"))?;
		let super_class = reader.read_u16()?;
		if super_class != 0 {
			constant_pool.expect(super_class, tag::CLASS).map_err(|e| e.context("super_class"))?;
		}

		let interfaces = read_u16_list(reader)?;
		let fields = read_members(reader, &cx, MemberKind::Field)?;
		let methods = read_members(reader, &cx, MemberKind::Method)?;
		let attributes = read_structures(reader, &cx)?;

		log::debug!(
			"read class file with {} constant pool slots, {} fields, {} methods and {} attributes",
			constant_pool.len(), fields.len(), methods.len(), attributes.len(),
		);

		Ok(ClassFile {
			minor_version,
			major_version,
			constant_pool,
			access_flags,
			this_class,
			super_class,
			interfaces,
			fields,
			methods,
			attributes,
		})
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		cx.trace("write", "ClassFile");

		writer.write_u32(MAGIC)?;
		writer.write_u16(self.minor_version)?;
		writer.write_u16(self.major_version)?;
		self.constant_pool.write(writer, cx)?;

		let cx = cx.with_pool(&self.constant_pool);
		writer.write_u16(self.access_flags)?;
		writer.write_u16(self.this_class)?;
		writer.write_u16(self.super_class)?;
		write_u16_list(writer, &self.interfaces)?;
		write_members(writer, &self.fields, &cx)?;
		write_members(writer, &self.methods, &cx)?;
		write_structures(writer, &self.attributes, &cx)
	}
}
