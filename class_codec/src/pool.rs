//! The constant pool: the table of literals and symbolic references of a class file, indexed from `1`.
//!
//! `Long` and `Double` entries take up two indices. The slot after one of these is never used, and the pool keeps it
//! empty so that the indices of all other entries stay the same as in the class file.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use java_string::{JavaStr, JavaString};
use crate::error::{bail_invalid, Error, Result};
use crate::io::{ClassRead, ClassWrite, Context, Structure};

/// The tag bytes of the constant pool entries.
pub mod tag {
	pub const UTF8: u8 = 1;
	pub const INTEGER: u8 = 3;
	pub const FLOAT: u8 = 4;
	pub const LONG: u8 = 5;
	pub const DOUBLE: u8 = 6;
	pub const CLASS: u8 = 7;
	pub const STRING: u8 = 8;
	pub const FIELDREF: u8 = 9;
	pub const METHODREF: u8 = 10;
	pub const INTERFACE_METHODREF: u8 = 11;
	pub const NAME_AND_TYPE: u8 = 12;
	pub const METHOD_HANDLE: u8 = 15;
	pub const METHOD_TYPE: u8 = 16;
	pub const INVOKE_DYNAMIC: u8 = 18;

	/// The name of the entry kind for a tag, or `None` if the tag is unknown.
	pub fn name(tag: u8) -> Option<&'static str> {
		Some(match tag {
			UTF8 => "Utf8",
			INTEGER => "Integer",
			FLOAT => "Float",
			LONG => "Long",
			DOUBLE => "Double",
			CLASS => "Class",
			STRING => "String",
			FIELDREF => "Fieldref",
			METHODREF => "Methodref",
			INTERFACE_METHODREF => "InterfaceMethodref",
			NAME_AND_TYPE => "NameAndType",
			METHOD_HANDLE => "MethodHandle",
			METHOD_TYPE => "MethodType",
			INVOKE_DYNAMIC => "InvokeDynamic",
			_ => return None,
		})
	}
}

/// The `reference_kind` of a `MethodHandle` entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
	GetField,
	GetStatic,
	PutField,
	PutStatic,
	InvokeVirtual,
	InvokeStatic,
	InvokeSpecial,
	NewInvokeSpecial,
	InvokeInterface,
}

impl TryFrom<u8> for ReferenceKind {
	type Error = Error;

	fn try_from(value: u8) -> Result<ReferenceKind> {
		Ok(match value {
			1 => ReferenceKind::GetField,
			2 => ReferenceKind::GetStatic,
			3 => ReferenceKind::PutField,
			4 => ReferenceKind::PutStatic,
			5 => ReferenceKind::InvokeVirtual,
			6 => ReferenceKind::InvokeStatic,
			7 => ReferenceKind::InvokeSpecial,
			8 => ReferenceKind::NewInvokeSpecial,
			9 => ReferenceKind::InvokeInterface,
			kind => bail_invalid!("unknown `reference_kind` {kind} for `MethodHandle` pool entry"),
		})
	}
}

impl From<ReferenceKind> for u8 {
	fn from(value: ReferenceKind) -> u8 {
		match value {
			ReferenceKind::GetField => 1,
			ReferenceKind::GetStatic => 2,
			ReferenceKind::PutField => 3,
			ReferenceKind::PutStatic => 4,
			ReferenceKind::InvokeVirtual => 5,
			ReferenceKind::InvokeStatic => 6,
			ReferenceKind::InvokeSpecial => 7,
			ReferenceKind::NewInvokeSpecial => 8,
			ReferenceKind::InvokeInterface => 9,
		}
	}
}

/// A constant pool entry.
///
/// Equality and hashing are structural, two entries with the same content are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CpInfo {
	/// The bytes are kept in the modified UTF-8 format of the class file, so that they're written back unchanged.
	Utf8 { bytes: Vec<u8> },
	Integer { bytes: u32 },
	Float { bytes: u32 },
	Long { high_bytes: u32, low_bytes: u32 },
	Double { high_bytes: u32, low_bytes: u32 },
	Class { name_index: u16 },
	String { string_index: u16 },
	Fieldref { class_index: u16, name_and_type_index: u16 },
	Methodref { class_index: u16, name_and_type_index: u16 },
	InterfaceMethodref { class_index: u16, name_and_type_index: u16 },
	NameAndType { name_index: u16, descriptor_index: u16 },
	MethodHandle { reference_kind: ReferenceKind, reference_index: u16 },
	MethodType { descriptor_index: u16 },
	InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
}

impl CpInfo {
	pub fn utf8(string: &str) -> CpInfo {
		CpInfo::Utf8 { bytes: JavaStr::from_str(string).to_modified_utf8().into_owned() }
	}

	pub fn integer(value: i32) -> CpInfo {
		CpInfo::Integer { bytes: value as u32 }
	}

	pub fn float(value: f32) -> CpInfo {
		CpInfo::Float { bytes: value.to_bits() }
	}

	pub fn long(value: i64) -> CpInfo {
		let (high_bytes, low_bytes) = split(value as u64);
		CpInfo::Long { high_bytes, low_bytes }
	}

	pub fn double(value: f64) -> CpInfo {
		let (high_bytes, low_bytes) = split(value.to_bits());
		CpInfo::Double { high_bytes, low_bytes }
	}

	pub fn integer_value(&self) -> Option<i32> {
		match *self {
			CpInfo::Integer { bytes } => Some(bytes as i32),
			_ => None,
		}
	}

	pub fn float_value(&self) -> Option<f32> {
		match *self {
			CpInfo::Float { bytes } => Some(f32::from_bits(bytes)),
			_ => None,
		}
	}

	/// The value of a `Long` entry. Both halves are taken as unsigned 32 bit values.
	pub fn long_value(&self) -> Option<i64> {
		match *self {
			CpInfo::Long { high_bytes, low_bytes } => Some(join(high_bytes, low_bytes) as i64),
			_ => None,
		}
	}

	pub fn double_value(&self) -> Option<f64> {
		match *self {
			CpInfo::Double { high_bytes, low_bytes } => Some(f64::from_bits(join(high_bytes, low_bytes))),
			_ => None,
		}
	}

	pub fn tag(&self) -> u8 {
		match self {
			CpInfo::Utf8 { .. } => tag::UTF8,
			CpInfo::Integer { .. } => tag::INTEGER,
			CpInfo::Float { .. } => tag::FLOAT,
			CpInfo::Long { .. } => tag::LONG,
			CpInfo::Double { .. } => tag::DOUBLE,
			CpInfo::Class { .. } => tag::CLASS,
			CpInfo::String { .. } => tag::STRING,
			CpInfo::Fieldref { .. } => tag::FIELDREF,
			CpInfo::Methodref { .. } => tag::METHODREF,
			CpInfo::InterfaceMethodref { .. } => tag::INTERFACE_METHODREF,
			CpInfo::NameAndType { .. } => tag::NAME_AND_TYPE,
			CpInfo::MethodHandle { .. } => tag::METHOD_HANDLE,
			CpInfo::MethodType { .. } => tag::METHOD_TYPE,
			CpInfo::InvokeDynamic { .. } => tag::INVOKE_DYNAMIC,
		}
	}

	pub fn kind_name(&self) -> &'static str {
		tag::name(self.tag()).unwrap_or("?")
	}

	/// Whether this entry takes up two slots in the pool.
	pub fn is_wide(&self) -> bool {
		matches!(self, CpInfo::Long { .. } | CpInfo::Double { .. })
	}
}

fn split(value: u64) -> (u32, u32) {
	((value >> 32) as u32, value as u32)
}

fn join(high: u32, low: u32) -> u64 {
	((high as u64) << 32) | (low as u64)
}

impl Structure for CpInfo {
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<CpInfo> {
		let tag = reader.read_u8()?;
		cx.trace("read", tag::name(tag).unwrap_or("unknown constant pool entry"));
		Ok(match tag {
			tag::UTF8 => {
				let length = reader.read_u16_as_usize()?;
				CpInfo::Utf8 { bytes: reader.read_u8_vec(length)? }
			},
			tag::INTEGER => CpInfo::Integer { bytes: reader.read_u32()? },
			tag::FLOAT => CpInfo::Float { bytes: reader.read_u32()? },
			tag::LONG => CpInfo::Long { high_bytes: reader.read_u32()?, low_bytes: reader.read_u32()? },
			tag::DOUBLE => CpInfo::Double { high_bytes: reader.read_u32()?, low_bytes: reader.read_u32()? },
			tag::CLASS => CpInfo::Class { name_index: reader.read_u16()? },
			tag::STRING => CpInfo::String { string_index: reader.read_u16()? },
			tag::FIELDREF => CpInfo::Fieldref { class_index: reader.read_u16()?, name_and_type_index: reader.read_u16()? },
			tag::METHODREF => CpInfo::Methodref { class_index: reader.read_u16()?, name_and_type_index: reader.read_u16()? },
			tag::INTERFACE_METHODREF => CpInfo::InterfaceMethodref { class_index: reader.read_u16()?, name_and_type_index: reader.read_u16()? },
			tag::NAME_AND_TYPE => CpInfo::NameAndType { name_index: reader.read_u16()?, descriptor_index: reader.read_u16()? },
			tag::METHOD_HANDLE => CpInfo::MethodHandle {
				reference_kind: ReferenceKind::try_from(reader.read_u8()?)?,
				reference_index: reader.read_u16()?,
			},
			tag::METHOD_TYPE => CpInfo::MethodType { descriptor_index: reader.read_u16()? },
			tag::INVOKE_DYNAMIC => CpInfo::InvokeDynamic {
				bootstrap_method_attr_index: reader.read_u16()?,
				name_and_type_index: reader.read_u16()?,
			},
			tag => bail_invalid!("unexpected constant pool tag {tag}"),
		})
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		cx.trace("write", self.kind_name());
		writer.write_u8(self.tag())?;
		match self {
			CpInfo::Utf8 { bytes } => {
				writer.write_usize_as_u16(bytes.len())?;
				writer.write_u8_slice(bytes)?;
			},
			&CpInfo::Integer { bytes } | &CpInfo::Float { bytes } => writer.write_u32(bytes)?,
			&CpInfo::Long { high_bytes, low_bytes } | &CpInfo::Double { high_bytes, low_bytes } => {
				writer.write_u32(high_bytes)?;
				writer.write_u32(low_bytes)?;
			},
			&CpInfo::Class { name_index } => writer.write_u16(name_index)?,
			&CpInfo::String { string_index } => writer.write_u16(string_index)?,
			&CpInfo::Fieldref { class_index, name_and_type_index } |
			&CpInfo::Methodref { class_index, name_and_type_index } |
			&CpInfo::InterfaceMethodref { class_index, name_and_type_index } => {
				writer.write_u16(class_index)?;
				writer.write_u16(name_and_type_index)?;
			},
			&CpInfo::NameAndType { name_index, descriptor_index } => {
				writer.write_u16(name_index)?;
				writer.write_u16(descriptor_index)?;
			},
			&CpInfo::MethodHandle { reference_kind, reference_index } => {
				writer.write_u8(reference_kind.into())?;
				writer.write_u16(reference_index)?;
			},
			&CpInfo::MethodType { descriptor_index } => writer.write_u16(descriptor_index)?,
			&CpInfo::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index } => {
				writer.write_u16(bootstrap_method_attr_index)?;
				writer.write_u16(name_and_type_index)?;
			},
		}
		Ok(())
	}
}

/// Decodes the modified UTF-8 of a `Utf8` entry.
pub fn decode_utf8(bytes: &[u8]) -> Result<JavaString> {
	JavaString::from_modified_utf8(bytes.to_vec())
		.map_err(|e| Error::InvalidFormat(format!("invalid modified utf8 contents: {e}")))
}

/// Decodes the modified UTF-8 of a `Utf8` entry for display, replacing what can't be represented in a [`String`].
pub fn display_utf8(bytes: &[u8]) -> String {
	if let Ok(string) = decode_utf8(bytes) {
		if let Ok(str) = string.as_java_str().as_str() {
			return str.to_owned();
		}
	}
	String::from_utf8_lossy(bytes).into_owned()
}

/// The constant pool of a class file.
///
/// Slot `0` is never used. Besides the entries, the pool keeps a map from entry content to the first index holding
/// it, so that adding an entry can reuse an existing one. All methods that change the pool keep that map up to date.
#[derive(Debug, Clone)]
pub struct ConstantPool {
	entries: Vec<Option<CpInfo>>,
	/// `None` until first needed, if reading skipped building it.
	lookup: Option<HashMap<CpInfo, u16>>,
}

impl PartialEq for ConstantPool {
	fn eq(&self, other: &ConstantPool) -> bool {
		self.entries == other.entries
	}
}

impl Eq for ConstantPool {}

impl Default for ConstantPool {
	fn default() -> ConstantPool {
		ConstantPool::new()
	}
}

impl ConstantPool {
	/// Creates an empty pool, written as a `constant_pool_count` of `1`.
	pub fn new() -> ConstantPool {
		ConstantPool {
			entries: vec![None],
			lookup: Some(HashMap::new()),
		}
	}

	/// Creates a pool from entries for index `1` onwards. A `None` must follow each `Long` and `Double`.
	pub fn from_entries(entries: impl IntoIterator<Item=Option<CpInfo>>) -> ConstantPool {
		let entries: Vec<_> = std::iter::once(None).chain(entries).collect();
		let lookup = Some(build_lookup(&entries));
		ConstantPool { entries, lookup }
	}

	/// The number of slots, including the unused slot `0` and the slots after `Long` and `Double` entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether there's no entry in the pool.
	pub fn is_empty(&self) -> bool {
		self.entries.iter().all(Option::is_none)
	}

	/// All entries, together with their index.
	pub fn iter(&self) -> impl Iterator<Item=(u16, &CpInfo)> + '_ {
		self.entries.iter()
			.enumerate()
			.filter_map(|(index, entry)| entry.as_ref().map(|entry| (index as u16, entry)))
	}

	/// Gets the entry at `index`, or `None` if there's nothing there.
	pub fn get_optional(&self, index: u16) -> Option<&CpInfo> {
		self.entries.get(index as usize).and_then(Option::as_ref)
	}

	/// Gets the entry at `index`, failing if the index is not in `1..count` or the slot is empty.
	pub fn get(&self, index: u16) -> Result<&CpInfo> {
		if index == 0 || index as usize >= self.entries.len() {
			bail_invalid!("constant pool index {index} is out of the valid range 1..{}", self.entries.len());
		}
		match &self.entries[index as usize] {
			Some(entry) => Ok(entry),
			None => bail_invalid!("constant pool index {index} points at an unused slot"),
		}
	}

	/// Gets the entry at `index`, failing if it's not of the kind given by the tag.
	pub fn expect(&self, index: u16, expected: u8) -> Result<&CpInfo> {
		let entry = self.get(index)?;
		if entry.tag() != expected {
			return Err(unexpected(index, expected, entry));
		}
		Ok(entry)
	}

	/// The raw bytes of the `Utf8` entry at `index`.
	pub fn get_utf8(&self, index: u16) -> Result<&[u8]> {
		match self.get(index)? {
			CpInfo::Utf8 { bytes } => Ok(bytes),
			entry => Err(unexpected(index, tag::UTF8, entry)),
		}
	}

	/// The decoded contents of the `Utf8` entry at `index`.
	pub fn get_string(&self, index: u16) -> Result<JavaString> {
		decode_utf8(self.get_utf8(index)?)
	}

	/// Whether the entry at `index` is a `Utf8` entry holding exactly the given string.
	pub fn utf8_equals(&self, index: u16, value: &str) -> bool {
		match self.get_optional(index) {
			Some(CpInfo::Utf8 { bytes }) => *bytes == *JavaStr::from_str(value).to_modified_utf8(),
			_ => false,
		}
	}

	/// The name of the `Class` entry at `index`, in internal form, like `java/lang/Object`.
	pub fn class_name(&self, index: u16) -> Result<JavaString> {
		match *self.get(index)? {
			CpInfo::Class { name_index } => self.get_string(name_index),
			ref entry => Err(unexpected(index, tag::CLASS, entry)),
		}
	}

	/// The name and descriptor of the `NameAndType` entry at `index`.
	pub fn name_and_type(&self, index: u16) -> Result<(JavaString, JavaString)> {
		match *self.get(index)? {
			CpInfo::NameAndType { name_index, descriptor_index } => {
				Ok((self.get_string(name_index)?, self.get_string(descriptor_index)?))
			},
			ref entry => Err(unexpected(index, tag::NAME_AND_TYPE, entry)),
		}
	}

	/// Resolves the entry at `index` into readable text, following references to other entries.
	///
	/// References are only followed to entries of the kind they must point at, so a pool referencing itself in a
	/// loop gives an error, not endless recursion.
	pub fn describe(&self, index: u16) -> Result<String> {
		Ok(match *self.get(index)? {
			CpInfo::Utf8 { ref bytes } => display_utf8(bytes),
			CpInfo::Integer { bytes } => (bytes as i32).to_string(),
			CpInfo::Float { bytes } => format!("{}f", f32::from_bits(bytes)),
			ref entry @ CpInfo::Long { .. } => format!("{}l", entry.long_value().unwrap_or_default()),
			ref entry @ CpInfo::Double { .. } => format!("{}d", entry.double_value().unwrap_or_default()),
			CpInfo::Class { name_index } => display_utf8(self.get_utf8(name_index)?),
			CpInfo::String { string_index } => format!("{:?}", display_utf8(self.get_utf8(string_index)?)),
			CpInfo::Fieldref { .. } | CpInfo::Methodref { .. } | CpInfo::InterfaceMethodref { .. } => self.describe_member_ref(index)?,
			CpInfo::NameAndType { .. } => self.describe_name_and_type(index)?,
			CpInfo::MethodHandle { reference_kind, reference_index } => {
				format!("{reference_kind:?} {}", self.describe_member_ref(reference_index)?)
			},
			CpInfo::MethodType { descriptor_index } => display_utf8(self.get_utf8(descriptor_index)?),
			CpInfo::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index } => {
				format!("#{bootstrap_method_attr_index}:{}", self.describe_name_and_type(name_and_type_index)?)
			},
		})
	}

	fn describe_class(&self, index: u16) -> Result<String> {
		match *self.get(index)? {
			CpInfo::Class { name_index } => Ok(display_utf8(self.get_utf8(name_index)?)),
			ref entry => Err(unexpected(index, tag::CLASS, entry)),
		}
	}

	fn describe_name_and_type(&self, index: u16) -> Result<String> {
		match *self.get(index)? {
			CpInfo::NameAndType { name_index, descriptor_index } => {
				Ok(format!("{}:{}", display_utf8(self.get_utf8(name_index)?), display_utf8(self.get_utf8(descriptor_index)?)))
			},
			ref entry => Err(unexpected(index, tag::NAME_AND_TYPE, entry)),
		}
	}

	/// Something like `java/lang/Object.<init>:()V`, for a `Fieldref`, `Methodref` or `InterfaceMethodref`.
	fn describe_member_ref(&self, index: u16) -> Result<String> {
		match *self.get(index)? {
			CpInfo::Fieldref { class_index, name_and_type_index } |
			CpInfo::Methodref { class_index, name_and_type_index } |
			CpInfo::InterfaceMethodref { class_index, name_and_type_index } => {
				Ok(format!("{}.{}", self.describe_class(class_index)?, self.describe_name_and_type(name_and_type_index)?))
			},
			ref entry => bail_invalid!("expected a field or method reference at constant pool index {index}, got {entry:?}"),
		}
	}

	/// The first index holding an entry equal to `entry`.
	pub fn index_of(&self, entry: &CpInfo) -> Option<u16> {
		match &self.lookup {
			Some(lookup) => lookup.get(entry).copied(),
			None => self.iter().find(|&(_, e)| e == entry).map(|(index, _)| index),
		}
	}

	fn lookup_mut(&mut self) -> &mut HashMap<CpInfo, u16> {
		self.lookup.get_or_insert_with(|| build_lookup(&self.entries))
	}

	/// Returns the index of an entry equal to `entry`, appending it to the pool if there's none yet.
	pub fn intern(&mut self, entry: CpInfo) -> Result<u16> {
		if let Some(&index) = self.lookup_mut().get(&entry) {
			return Ok(index);
		}

		let index = self.entries.len();
		let slots = if entry.is_wide() { 2 } else { 1 };
		if index + slots > u16::MAX as usize {
			bail_invalid!("constant pool is full, can't add {entry:?} at index {index}");
		}

		self.entries.push(Some(entry.clone()));
		if slots == 2 {
			self.entries.push(None);
		}
		self.lookup_mut().insert(entry, index as u16);

		Ok(index as u16)
	}

	/// Appends `additional` empty slots to the pool. Use [`ConstantPool::set`] to fill them.
	///
	/// Empty slots at the end of the pool are not written.
	pub fn enlarge(&mut self, additional: usize) -> Result<()> {
		let new_len = self.entries.len() + additional;
		if new_len > u16::MAX as usize {
			bail_invalid!("can't enlarge constant pool to {new_len} slots, the maximum is {}", u16::MAX);
		}
		self.entries.resize(new_len, None);
		Ok(())
	}

	/// Replaces the slot at `index` with `entry`, returning the old entry.
	pub fn set(&mut self, index: u16, entry: CpInfo) -> Result<Option<CpInfo>> {
		if index == 0 || index as usize >= self.entries.len() {
			bail_invalid!("can't set constant pool slot {index}, valid slots are 1..{}", self.entries.len());
		}
		if index > 1 && self.get_optional(index - 1).is_some_and(CpInfo::is_wide) {
			bail_invalid!("can't set constant pool slot {index}, it's the second slot of the entry at {}", index - 1);
		}
		if entry.is_wide() {
			let next = index as usize + 1;
			if next >= self.entries.len() {
				bail_invalid!("can't set {entry:?} at constant pool slot {index}, there's no room for its second slot");
			}
			if self.entries[next].is_some() {
				bail_invalid!("can't set {entry:?} at constant pool slot {index}, its second slot {next} is in use");
			}
		}
		self.unregister(index);
		let old = self.entries[index as usize].replace(entry);
		self.register(index)?;
		Ok(old)
	}

	/// Empties the slot at `index`, returning the entry that was there.
	pub fn take(&mut self, index: u16) -> Option<CpInfo> {
		self.unregister(index);
		self.entries.get_mut(index as usize).and_then(Option::take)
	}

	/// Makes the entry at `index` findable by [`ConstantPool::index_of`], unless an equal entry sits at a lower index.
	pub fn register(&mut self, index: u16) -> Result<()> {
		let entry = self.get(index)?.clone();
		match self.lookup_mut().entry(entry) {
			Entry::Occupied(mut occupied) => {
				if *occupied.get() > index {
					occupied.insert(index);
				}
			},
			Entry::Vacant(vacant) => {
				vacant.insert(index);
			},
		}
		Ok(())
	}

	/// Removes the entry at `index` from the reverse lookup. If another slot holds an equal entry, that one is found
	/// by [`ConstantPool::index_of`] afterwards.
	pub fn unregister(&mut self, index: u16) {
		let Some(entry) = self.get_optional(index).cloned() else {
			return;
		};
		let replacement = self.iter()
			.find(|&(i, e)| i != index && *e == entry)
			.map(|(i, _)| i);

		let lookup = self.lookup_mut();
		if lookup.get(&entry) == Some(&index) {
			match replacement {
				Some(replacement) => { lookup.insert(entry, replacement); },
				None => { lookup.remove(&entry); },
			}
		}
	}

	/// The value written as `constant_pool_count`: one more than the highest used index, accounting for the second
	/// slot of a `Long` or `Double` at the end.
	pub fn count(&self) -> Result<u16> {
		let highest = self.entries.iter().rposition(Option::is_some).unwrap_or(0);
		let count = match self.entries.get(highest).and_then(Option::as_ref) {
			Some(entry) if entry.is_wide() => highest + 2,
			_ => highest + 1,
		};
		let Ok(count) = u16::try_from(count) else {
			bail_invalid!("constant pool count {count} doesn't fit into an u16");
		};
		Ok(count)
	}
}

fn unexpected(index: u16, expected: u8, entry: &CpInfo) -> Error {
	Error::InvalidFormat(format!(
		"expected constant pool entry {} at index {index}, got {entry:?}",
		tag::name(expected).unwrap_or("?"),
	))
}

fn build_lookup(entries: &[Option<CpInfo>]) -> HashMap<CpInfo, u16> {
	let mut lookup = HashMap::with_capacity(entries.len());
	for (index, entry) in entries.iter().enumerate() {
		if let Some(entry) = entry {
			lookup.entry(entry.clone()).or_insert(index as u16);
		}
	}
	lookup
}

impl Structure for ConstantPool {
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<ConstantPool> {
		cx.trace("read", "constant pool");

		let count = reader.read_u16_as_usize()?;
		if count == 0 {
			bail_invalid!("`constant_pool_count` must be at least 1");
		}

		let mut entries = vec![None; count];
		let mut index = 1;
		while index < count {
			let entry = CpInfo::read(reader, cx)
				.map_err(|e| e.context(format!("constant pool entry {index}")))?;

			let slots = if entry.is_wide() { 2 } else { 1 };
			if index + slots > count {
				bail_invalid!("{} entry at the last constant pool index {index} has no room for its second slot", entry.kind_name());
			}

			entries[index] = Some(entry);
			index += slots;
		}

		let lookup = if cx.options.skip_constant_pool_index {
			None
		} else {
			Some(build_lookup(&entries))
		};

		log::debug!("read constant pool with {count} slots");

		Ok(ConstantPool { entries, lookup })
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		cx.trace("write", "constant pool");

		let count = self.count()?;
		writer.write_u16(count)?;

		let mut index = 1;
		while index < count as usize {
			let Some(entry) = &self.entries[index] else {
				bail_invalid!("constant pool slot {index} is empty, but there are entries after it");
			};
			entry.write(writer, cx)?;
			index += if entry.is_wide() { 2 } else { 1 };
		}

		Ok(())
	}
}
