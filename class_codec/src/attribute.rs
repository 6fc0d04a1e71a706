//! Attributes: named, length-prefixed records attached to classes, members, `Code` attributes and record components.
//!
//! The name of an attribute decides how its payload is interpreted. Names not found in [`AttributeKind::NAMES`] keep
//! their payload as raw bytes, so that they're written back unchanged.

use std::io::Cursor;
use java_string::JavaString;
use crate::error::{bail_invalid, Error, Result};
use crate::io::{read_structures, read_u16_list, write_structures, write_u16_list, ClassRead, ClassWrite, Context, Structure};
use crate::macros::structure;
use crate::pool::{ConstantPool, CpInfo};

pub mod annotation;
pub mod code;
pub mod stack_map;
pub mod type_annotation;

use annotation::{Annotation, ElementValue, ParameterAnnotations};
use code::Code;
use stack_map::StackMapFrame;
use type_annotation::TypeAnnotation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	pub name_index: u16,
	pub info: AttributeInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeInfo {
	ConstantValue { constantvalue_index: u16 },
	Code(Code),
	StackMapTable { entries: Vec<StackMapFrame> },
	Exceptions { exception_index_table: Vec<u16> },
	InnerClasses { classes: Vec<InnerClassesEntry> },
	EnclosingMethod { class_index: u16, method_index: u16 },
	Synthetic,
	Signature { signature_index: u16 },
	SourceFile { sourcefile_index: u16 },
	SourceDebugExtension { debug_extension: Vec<u8> },
	LineNumberTable { line_number_table: Vec<LineNumberTableEntry> },
	LocalVariableTable { local_variable_table: Vec<LocalVariableTableEntry> },
	LocalVariableTypeTable { local_variable_type_table: Vec<LocalVariableTypeTableEntry> },
	Deprecated,
	RuntimeVisibleAnnotations { annotations: Vec<Annotation> },
	RuntimeInvisibleAnnotations { annotations: Vec<Annotation> },
	RuntimeVisibleParameterAnnotations { parameter_annotations: Vec<ParameterAnnotations> },
	RuntimeInvisibleParameterAnnotations { parameter_annotations: Vec<ParameterAnnotations> },
	RuntimeVisibleTypeAnnotations { annotations: Vec<TypeAnnotation> },
	RuntimeInvisibleTypeAnnotations { annotations: Vec<TypeAnnotation> },
	AnnotationDefault { default_value: ElementValue },
	BootstrapMethods { bootstrap_methods: Vec<BootstrapMethod> },
	MethodParameters { parameters: Vec<MethodParameter> },
	NestHost { host_class_index: u16 },
	NestMembers { classes: Vec<u16> },
	PermittedSubclasses { classes: Vec<u16> },
	Record { components: Vec<RecordComponent> },
	/// An attribute with a name that isn't known, or any attribute if [`Options::skip_attributes`] was set.
	///
	/// [`Options::skip_attributes`]: crate::io::Options::skip_attributes
	Unknown { info: Vec<u8> },
	/// An attribute whose name index doesn't point at a `Utf8` entry. It's kept in place with its payload.
	Unresolved { info: Vec<u8> },
}

/// The attributes this crate knows how to interpret.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKind {
	ConstantValue,
	Code,
	StackMapTable,
	Exceptions,
	InnerClasses,
	EnclosingMethod,
	Synthetic,
	Signature,
	SourceFile,
	SourceDebugExtension,
	LineNumberTable,
	LocalVariableTable,
	LocalVariableTypeTable,
	Deprecated,
	RuntimeVisibleAnnotations,
	RuntimeInvisibleAnnotations,
	RuntimeVisibleParameterAnnotations,
	RuntimeInvisibleParameterAnnotations,
	RuntimeVisibleTypeAnnotations,
	RuntimeInvisibleTypeAnnotations,
	AnnotationDefault,
	BootstrapMethods,
	MethodParameters,
	NestHost,
	NestMembers,
	PermittedSubclasses,
	Record,
}

impl AttributeKind {
	pub const NAMES: &'static [(&'static str, AttributeKind)] = &[
		("ConstantValue", AttributeKind::ConstantValue),
		("Code", AttributeKind::Code),
		("StackMapTable", AttributeKind::StackMapTable),
		("Exceptions", AttributeKind::Exceptions),
		("InnerClasses", AttributeKind::InnerClasses),
		("EnclosingMethod", AttributeKind::EnclosingMethod),
		("Synthetic", AttributeKind::Synthetic),
		("Signature", AttributeKind::Signature),
		("SourceFile", AttributeKind::SourceFile),
		("SourceDebugExtension", AttributeKind::SourceDebugExtension),
		("LineNumberTable", AttributeKind::LineNumberTable),
		("LocalVariableTable", AttributeKind::LocalVariableTable),
		("LocalVariableTypeTable", AttributeKind::LocalVariableTypeTable),
		("Deprecated", AttributeKind::Deprecated),
		("RuntimeVisibleAnnotations", AttributeKind::RuntimeVisibleAnnotations),
		("RuntimeInvisibleAnnotations", AttributeKind::RuntimeInvisibleAnnotations),
		("RuntimeVisibleParameterAnnotations", AttributeKind::RuntimeVisibleParameterAnnotations),
		("RuntimeInvisibleParameterAnnotations", AttributeKind::RuntimeInvisibleParameterAnnotations),
		("RuntimeVisibleTypeAnnotations", AttributeKind::RuntimeVisibleTypeAnnotations),
		("RuntimeInvisibleTypeAnnotations", AttributeKind::RuntimeInvisibleTypeAnnotations),
		("AnnotationDefault", AttributeKind::AnnotationDefault),
		("BootstrapMethods", AttributeKind::BootstrapMethods),
		("MethodParameters", AttributeKind::MethodParameters),
		("NestHost", AttributeKind::NestHost),
		("NestMembers", AttributeKind::NestMembers),
		("PermittedSubclasses", AttributeKind::PermittedSubclasses),
		("Record", AttributeKind::Record),
	];

	/// Looks up the kind for the raw bytes of an attribute name. All known names are plain ASCII, so the modified
	/// UTF-8 bytes can be compared directly.
	pub fn from_name(name: &[u8]) -> Option<AttributeKind> {
		AttributeKind::NAMES.iter()
			.find(|(literal, _)| literal.as_bytes() == name)
			.map(|&(_, kind)| kind)
	}

	pub fn name(self) -> &'static str {
		AttributeKind::NAMES.iter()
			.find(|&&(_, kind)| kind == self)
			.map_or("?", |&(name, _)| name)
	}
}

structure! {
	struct InnerClassesEntry {
		inner_class_info_index: u16,
		outer_class_info_index: u16,
		inner_name_index: u16,
		inner_class_access_flags: u16,
	}
}

structure! {
	struct LineNumberTableEntry {
		start_pc: u16,
		line_number: u16,
	}
}

structure! {
	struct LocalVariableTableEntry {
		start_pc: u16,
		length: u16,
		name_index: u16,
		descriptor_index: u16,
		index: u16,
	}
}

structure! {
	struct LocalVariableTypeTableEntry {
		start_pc: u16,
		length: u16,
		name_index: u16,
		signature_index: u16,
		index: u16,
	}
}

structure! {
	struct MethodParameter {
		name_index: u16,
		access_flags: u16,
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BootstrapMethod {
	/// Index of a `MethodHandle` entry.
	pub bootstrap_method_ref: u16,
	pub bootstrap_arguments: Vec<u16>,
}

impl Structure for BootstrapMethod {
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<BootstrapMethod> {
		cx.trace("read", "BootstrapMethod");
		Ok(BootstrapMethod {
			bootstrap_method_ref: reader.read_u16()?,
			bootstrap_arguments: read_u16_list(reader)?,
		})
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		cx.trace("write", "BootstrapMethod");
		writer.write_u16(self.bootstrap_method_ref)?;
		write_u16_list(writer, &self.bootstrap_arguments)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordComponent {
	pub name_index: u16,
	pub descriptor_index: u16,
	pub attributes: Vec<Attribute>,
}

impl Structure for RecordComponent {
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<RecordComponent> {
		cx.trace("read", "RecordComponent");
		Ok(RecordComponent {
			name_index: reader.read_u16()?,
			descriptor_index: reader.read_u16()?,
			attributes: read_structures(reader, cx)?,
		})
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		cx.trace("write", "RecordComponent");
		writer.write_u16(self.name_index)?;
		writer.write_u16(self.descriptor_index)?;
		write_structures(writer, &self.attributes, cx)
	}
}

impl Attribute {
	/// Creates an attribute, adding its name to the pool if needed.
	///
	/// Fails for [`AttributeInfo::Unknown`] and [`AttributeInfo::Unresolved`], as they have no name to add.
	pub fn new(pool: &mut ConstantPool, info: AttributeInfo) -> Result<Attribute> {
		let Some(kind) = info.kind() else {
			bail_invalid!("can't create an attribute without a known name from {info:?}");
		};
		let name_index = pool.intern(CpInfo::utf8(kind.name()))?;
		Ok(Attribute { name_index, info })
	}

	pub fn name(&self, pool: &ConstantPool) -> Result<JavaString> {
		pool.get_string(self.name_index)
	}

	fn read_info(kind: AttributeKind, info: &[u8], cx: &Context) -> Result<AttributeInfo> {
		let mut reader = Cursor::new(info);
		let attribute = AttributeInfo::read_payload(kind, &mut reader, info.len(), cx)
			.map_err(|e| match e {
				Error::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
					Error::InvalidFormat(format!("payload ends before the {} attribute does", kind.name()))
				},
				e => e.context(format!("{} attribute", kind.name())),
			})?;

		let consumed = reader.position();
		if consumed != info.len() as u64 {
			bail_invalid!("{} attribute only used {consumed} of its {} bytes", kind.name(), info.len());
		}

		Ok(attribute)
	}
}

impl Structure for Attribute {
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<Attribute> {
		let name_index = reader.read_u16()?;
		let length = reader.read_u32_as_usize()?;
		let info = reader.read_u8_vec(length)?;

		let name = match cx.pool()?.get_optional(name_index) {
			Some(CpInfo::Utf8 { bytes }) => bytes,
			entry => {
				log::warn!("attribute name index {name_index} points at {entry:?} instead of a Utf8 entry, keeping its {length} bytes as they are");
				return Ok(Attribute { name_index, info: AttributeInfo::Unresolved { info } });
			},
		};

		let kind = match AttributeKind::from_name(name) {
			Some(kind) if !cx.options.skip_attributes => kind,
			_ => {
				cx.trace("read", "unknown attribute");
				return Ok(Attribute { name_index, info: AttributeInfo::Unknown { info } });
			},
		};

		cx.trace("read", kind.name());
		let info = Attribute::read_info(kind, &info, &cx.nested()?)?;
		Ok(Attribute { name_index, info })
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		cx.trace("write", self.info.kind().map_or("unknown attribute", AttributeKind::name));
		writer.write_u16(self.name_index)?;

		match &self.info {
			AttributeInfo::Unknown { info } | AttributeInfo::Unresolved { info } => {
				writer.write_usize_as_u32(info.len())?;
				writer.write_u8_slice(info)?;
			},
			info => {
				let mut payload = Vec::new();
				info.write_payload(&mut payload, cx)?;
				writer.write_usize_as_u32(payload.len())?;
				writer.write_u8_slice(&payload)?;
			},
		}
		Ok(())
	}
}

impl AttributeInfo {
	/// The kind of this attribute, or `None` for [`AttributeInfo::Unknown`] and [`AttributeInfo::Unresolved`].
	pub fn kind(&self) -> Option<AttributeKind> {
		Some(match self {
			AttributeInfo::ConstantValue { .. } => AttributeKind::ConstantValue,
			AttributeInfo::Code(_) => AttributeKind::Code,
			AttributeInfo::StackMapTable { .. } => AttributeKind::StackMapTable,
			AttributeInfo::Exceptions { .. } => AttributeKind::Exceptions,
			AttributeInfo::InnerClasses { .. } => AttributeKind::InnerClasses,
			AttributeInfo::EnclosingMethod { .. } => AttributeKind::EnclosingMethod,
			AttributeInfo::Synthetic => AttributeKind::Synthetic,
			AttributeInfo::Signature { .. } => AttributeKind::Signature,
			AttributeInfo::SourceFile { .. } => AttributeKind::SourceFile,
			AttributeInfo::SourceDebugExtension { .. } => AttributeKind::SourceDebugExtension,
			AttributeInfo::LineNumberTable { .. } => AttributeKind::LineNumberTable,
			AttributeInfo::LocalVariableTable { .. } => AttributeKind::LocalVariableTable,
			AttributeInfo::LocalVariableTypeTable { .. } => AttributeKind::LocalVariableTypeTable,
			AttributeInfo::Deprecated => AttributeKind::Deprecated,
			AttributeInfo::RuntimeVisibleAnnotations { .. } => AttributeKind::RuntimeVisibleAnnotations,
			AttributeInfo::RuntimeInvisibleAnnotations { .. } => AttributeKind::RuntimeInvisibleAnnotations,
			AttributeInfo::RuntimeVisibleParameterAnnotations { .. } => AttributeKind::RuntimeVisibleParameterAnnotations,
			AttributeInfo::RuntimeInvisibleParameterAnnotations { .. } => AttributeKind::RuntimeInvisibleParameterAnnotations,
			AttributeInfo::RuntimeVisibleTypeAnnotations { .. } => AttributeKind::RuntimeVisibleTypeAnnotations,
			AttributeInfo::RuntimeInvisibleTypeAnnotations { .. } => AttributeKind::RuntimeInvisibleTypeAnnotations,
			AttributeInfo::AnnotationDefault { .. } => AttributeKind::AnnotationDefault,
			AttributeInfo::BootstrapMethods { .. } => AttributeKind::BootstrapMethods,
			AttributeInfo::MethodParameters { .. } => AttributeKind::MethodParameters,
			AttributeInfo::NestHost { .. } => AttributeKind::NestHost,
			AttributeInfo::NestMembers { .. } => AttributeKind::NestMembers,
			AttributeInfo::PermittedSubclasses { .. } => AttributeKind::PermittedSubclasses,
			AttributeInfo::Record { .. } => AttributeKind::Record,
			AttributeInfo::Unknown { .. } | AttributeInfo::Unresolved { .. } => return None,
		})
	}

	fn read_payload(kind: AttributeKind, reader: &mut impl ClassRead, length: usize, cx: &Context) -> Result<AttributeInfo> {
		Ok(match kind {
			AttributeKind::ConstantValue => AttributeInfo::ConstantValue { constantvalue_index: reader.read_u16()? },
			AttributeKind::Code => AttributeInfo::Code(Code::read(reader, cx)?),
			AttributeKind::StackMapTable => AttributeInfo::StackMapTable { entries: read_structures(reader, cx)? },
			AttributeKind::Exceptions => AttributeInfo::Exceptions { exception_index_table: read_u16_list(reader)? },
			AttributeKind::InnerClasses => AttributeInfo::InnerClasses { classes: read_structures(reader, cx)? },
			AttributeKind::EnclosingMethod => AttributeInfo::EnclosingMethod {
				class_index: reader.read_u16()?,
				method_index: reader.read_u16()?,
			},
			AttributeKind::Synthetic => AttributeInfo::Synthetic,
			AttributeKind::Signature => AttributeInfo::Signature { signature_index: reader.read_u16()? },
			AttributeKind::SourceFile => AttributeInfo::SourceFile { sourcefile_index: reader.read_u16()? },
			AttributeKind::SourceDebugExtension => AttributeInfo::SourceDebugExtension { debug_extension: reader.read_u8_vec(length)? },
			AttributeKind::LineNumberTable => AttributeInfo::LineNumberTable { line_number_table: read_structures(reader, cx)? },
			AttributeKind::LocalVariableTable => AttributeInfo::LocalVariableTable { local_variable_table: read_structures(reader, cx)? },
			AttributeKind::LocalVariableTypeTable => AttributeInfo::LocalVariableTypeTable { local_variable_type_table: read_structures(reader, cx)? },
			AttributeKind::Deprecated => AttributeInfo::Deprecated,
			AttributeKind::RuntimeVisibleAnnotations => AttributeInfo::RuntimeVisibleAnnotations { annotations: read_structures(reader, cx)? },
			AttributeKind::RuntimeInvisibleAnnotations => AttributeInfo::RuntimeInvisibleAnnotations { annotations: read_structures(reader, cx)? },
			AttributeKind::RuntimeVisibleParameterAnnotations => AttributeInfo::RuntimeVisibleParameterAnnotations {
				parameter_annotations: read_parameter_annotations(reader, cx)?,
			},
			AttributeKind::RuntimeInvisibleParameterAnnotations => AttributeInfo::RuntimeInvisibleParameterAnnotations {
				parameter_annotations: read_parameter_annotations(reader, cx)?,
			},
			AttributeKind::RuntimeVisibleTypeAnnotations => AttributeInfo::RuntimeVisibleTypeAnnotations { annotations: read_structures(reader, cx)? },
			AttributeKind::RuntimeInvisibleTypeAnnotations => AttributeInfo::RuntimeInvisibleTypeAnnotations { annotations: read_structures(reader, cx)? },
			AttributeKind::AnnotationDefault => AttributeInfo::AnnotationDefault { default_value: ElementValue::read(reader, cx)? },
			AttributeKind::BootstrapMethods => AttributeInfo::BootstrapMethods { bootstrap_methods: read_structures(reader, cx)? },
			AttributeKind::MethodParameters => AttributeInfo::MethodParameters {
				parameters: reader.read_vec(
					|r| r.read_u8_as_usize(),
					|r| MethodParameter::read(r, cx),
				)?,
			},
			AttributeKind::NestHost => AttributeInfo::NestHost { host_class_index: reader.read_u16()? },
			AttributeKind::NestMembers => AttributeInfo::NestMembers { classes: read_u16_list(reader)? },
			AttributeKind::PermittedSubclasses => AttributeInfo::PermittedSubclasses { classes: read_u16_list(reader)? },
			AttributeKind::Record => AttributeInfo::Record { components: read_structures(reader, cx)? },
		})
	}

	/// Writes everything after the `attribute_length`.
	fn write_payload(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		match self {
			&AttributeInfo::ConstantValue { constantvalue_index } => writer.write_u16(constantvalue_index)?,
			AttributeInfo::Code(code) => code.write(writer, cx)?,
			AttributeInfo::StackMapTable { entries } => write_structures(writer, entries, cx)?,
			AttributeInfo::Exceptions { exception_index_table } => write_u16_list(writer, exception_index_table)?,
			AttributeInfo::InnerClasses { classes } => write_structures(writer, classes, cx)?,
			&AttributeInfo::EnclosingMethod { class_index, method_index } => {
				writer.write_u16(class_index)?;
				writer.write_u16(method_index)?;
			},
			AttributeInfo::Synthetic | AttributeInfo::Deprecated => {},
			&AttributeInfo::Signature { signature_index } => writer.write_u16(signature_index)?,
			&AttributeInfo::SourceFile { sourcefile_index } => writer.write_u16(sourcefile_index)?,
			AttributeInfo::SourceDebugExtension { debug_extension } => writer.write_u8_slice(debug_extension)?,
			AttributeInfo::LineNumberTable { line_number_table } => write_structures(writer, line_number_table, cx)?,
			AttributeInfo::LocalVariableTable { local_variable_table } => write_structures(writer, local_variable_table, cx)?,
			AttributeInfo::LocalVariableTypeTable { local_variable_type_table } => write_structures(writer, local_variable_type_table, cx)?,
			AttributeInfo::RuntimeVisibleAnnotations { annotations } |
			AttributeInfo::RuntimeInvisibleAnnotations { annotations } => write_structures(writer, annotations, cx)?,
			AttributeInfo::RuntimeVisibleParameterAnnotations { parameter_annotations } |
			AttributeInfo::RuntimeInvisibleParameterAnnotations { parameter_annotations } => {
				writer.write_slice(
					parameter_annotations,
					|w, size| w.write_usize_as_u8(size),
					|w, parameter| parameter.write(w, cx),
				)?;
			},
			AttributeInfo::RuntimeVisibleTypeAnnotations { annotations } |
			AttributeInfo::RuntimeInvisibleTypeAnnotations { annotations } => write_structures(writer, annotations, cx)?,
			AttributeInfo::AnnotationDefault { default_value } => default_value.write(writer, cx)?,
			AttributeInfo::BootstrapMethods { bootstrap_methods } => write_structures(writer, bootstrap_methods, cx)?,
			AttributeInfo::MethodParameters { parameters } => {
				writer.write_slice(
					parameters,
					|w, size| w.write_usize_as_u8(size),
					|w, parameter| parameter.write(w, cx),
				)?;
			},
			&AttributeInfo::NestHost { host_class_index } => writer.write_u16(host_class_index)?,
			AttributeInfo::NestMembers { classes } |
			AttributeInfo::PermittedSubclasses { classes } => write_u16_list(writer, classes)?,
			AttributeInfo::Record { components } => write_structures(writer, components, cx)?,
			AttributeInfo::Unknown { info } | AttributeInfo::Unresolved { info } => writer.write_u8_slice(info)?,
		}
		Ok(())
	}
}

fn read_parameter_annotations(reader: &mut impl ClassRead, cx: &Context) -> Result<Vec<ParameterAnnotations>> {
	reader.read_vec(
		|r| r.read_u8_as_usize(),
		|r| ParameterAnnotations::read(r, cx),
	)
}

/// Finds the first attribute of the given kind.
pub fn find(attributes: &[Attribute], kind: AttributeKind) -> Option<&AttributeInfo> {
	attributes.iter()
		.map(|attribute| &attribute.info)
		.find(|info| info.kind() == Some(kind))
}
