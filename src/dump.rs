//! Text output of a whole class file.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use class_codec::access::{describe_with_hex, AccessKind};
use class_codec::attribute::annotation::Annotation;
use class_codec::attribute::code::line_number_in;
use class_codec::instruction::verify_branch_targets;
use class_codec::{Attribute, AttributeInfo, ClassFile, ClassMember, Code, ConstantPool, Options};
use crate::jar;

/// Reads the class to dump, either from a class file or from the entry `entry` of an archive.
pub(crate) fn load(file: &Path, entry: Option<&str>, options: &Options) -> Result<ClassFile> {
	let bytes = match entry {
		Some(entry) => {
			if !jar::is_archive(file) {
				bail!("{file:?} is not an archive, can't read entry {entry:?} from it");
			}
			let reader = BufReader::new(File::open(file)
				.with_context(|| anyhow!("failed to open archive {file:?}"))?);
			jar::read_entry(reader, entry)
				.with_context(|| anyhow!("failed to read {entry:?} from {file:?}"))?
		},
		None => {
			if jar::is_archive(file) {
				bail!("{file:?} is an archive, select a class in it with --entry");
			}
			std::fs::read(file)
				.with_context(|| anyhow!("failed to read class file {file:?}"))?
		},
	};

	ClassFile::from_bytes(&bytes, options)
		.with_context(|| anyhow!("failed to read class from {file:?}"))
}

pub(crate) fn dump(class: &ClassFile, out: &mut impl Write) -> Result<()> {
	let pool = &class.constant_pool;

	writeln!(out, "class {}", pool.describe(class.this_class)?)?;
	writeln!(out, "  version: {}.{}", class.major_version, class.minor_version)?;
	writeln!(out, "  access: {}", class.describe_access())?;
	if class.super_class == 0 {
		writeln!(out, "  super: none")?;
	} else {
		writeln!(out, "  super: {}", pool.describe(class.super_class)?)?;
	}
	for &interface in &class.interfaces {
		writeln!(out, "  implements: {}", pool.describe(interface)?)?;
	}

	writeln!(out, "constant pool ({} slots):", pool.len())?;
	for (index, entry) in pool.iter() {
		writeln!(out, "  #{index} = {} {}", entry.kind_name(), pool.describe(index)?)?;
	}

	writeln!(out, "fields ({}):", class.fields.len())?;
	for field in &class.fields {
		dump_member(pool, field, out)?;
	}

	writeln!(out, "methods ({}):", class.methods.len())?;
	for method in &class.methods {
		dump_member(pool, method, out)?;
	}

	writeln!(out, "attributes ({}):", class.attributes.len())?;
	dump_attributes(pool, &class.attributes, "  ", out)
}

fn dump_member(pool: &ConstantPool, member: &ClassMember, out: &mut impl Write) -> Result<()> {
	writeln!(out, "  {} {}:{}", member.describe_access(), pool.describe(member.name_index)?, pool.describe(member.descriptor_index)?)?;
	dump_attributes(pool, &member.attributes, "    ", out)
}

fn dump_attributes(pool: &ConstantPool, attributes: &[Attribute], indent: &str, out: &mut impl Write) -> Result<()> {
	for attribute in attributes {
		let name = pool.describe(attribute.name_index).unwrap_or_else(|_| format!("#{}", attribute.name_index));
		match &attribute.info {
			AttributeInfo::Code(code) => {
				writeln!(out, "{indent}{name}: max_stack={}, max_locals={}", code.max_stack, code.max_locals)?;
				dump_code(pool, code, &format!("{indent}  "), out)?;
			},
			info => writeln!(out, "{indent}{name}: {}", describe_attribute(pool, info)?)?,
		}
	}
	Ok(())
}

fn describe_annotations(pool: &ConstantPool, annotations: &[Annotation]) -> Result<String> {
	Ok(annotations.iter()
		.map(|annotation| annotation.describe(pool))
		.collect::<class_codec::Result<Vec<_>>>()?
		.join(" "))
}

fn describe_indices(pool: &ConstantPool, indices: &[u16]) -> Result<String> {
	Ok(indices.iter()
		.map(|&index| pool.describe(index))
		.collect::<class_codec::Result<Vec<_>>>()?
		.join(", "))
}

/// A one line summary of an attribute other than `Code`.
fn describe_attribute(pool: &ConstantPool, info: &AttributeInfo) -> Result<String> {
	Ok(match info {
		AttributeInfo::ConstantValue { constantvalue_index: index } |
		AttributeInfo::Signature { signature_index: index } |
		AttributeInfo::SourceFile { sourcefile_index: index } |
		AttributeInfo::NestHost { host_class_index: index } => pool.describe(*index)?,
		AttributeInfo::Exceptions { exception_index_table: indices } |
		AttributeInfo::NestMembers { classes: indices } |
		AttributeInfo::PermittedSubclasses { classes: indices } => describe_indices(pool, indices)?,
		AttributeInfo::EnclosingMethod { class_index, method_index } => {
			if *method_index == 0 {
				pool.describe(*class_index)?
			} else {
				format!("{}.{}", pool.describe(*class_index)?, pool.describe(*method_index)?)
			}
		},
		AttributeInfo::Synthetic | AttributeInfo::Deprecated => String::new(),
		AttributeInfo::RuntimeVisibleAnnotations { annotations } |
		AttributeInfo::RuntimeInvisibleAnnotations { annotations } => describe_annotations(pool, annotations)?,
		AttributeInfo::RuntimeVisibleParameterAnnotations { parameter_annotations } |
		AttributeInfo::RuntimeInvisibleParameterAnnotations { parameter_annotations } => {
			let parameters = parameter_annotations.iter()
				.map(|parameter| describe_annotations(pool, &parameter.annotations))
				.collect::<Result<Vec<_>>>()?;
			format!("[{}]", parameters.join("], ["))
		},
		AttributeInfo::RuntimeVisibleTypeAnnotations { annotations } |
		AttributeInfo::RuntimeInvisibleTypeAnnotations { annotations } => {
			annotations.iter()
				.map(|annotation| annotation.describe(pool))
				.collect::<class_codec::Result<Vec<_>>>()?
				.join(" ")
		},
		AttributeInfo::AnnotationDefault { default_value } => default_value.describe(pool)?,
		AttributeInfo::BootstrapMethods { bootstrap_methods } => {
			let methods = bootstrap_methods.iter()
				.map(|method| -> Result<String> {
					Ok(format!("{}({})", pool.describe(method.bootstrap_method_ref)?, describe_indices(pool, &method.bootstrap_arguments)?))
				})
				.collect::<Result<Vec<_>>>()?;
			methods.join(", ")
		},
		AttributeInfo::MethodParameters { parameters } => {
			let parameters = parameters.iter()
				.map(|parameter| -> Result<String> {
					let name = if parameter.name_index == 0 { "<unnamed>".to_owned() } else { pool.describe(parameter.name_index)? };
					Ok(format!("{} {name}", describe_with_hex(parameter.access_flags, AccessKind::Parameter)))
				})
				.collect::<Result<Vec<_>>>()?;
			parameters.join(", ")
		},
		AttributeInfo::Record { components } => {
			let components = components.iter()
				.map(|component| -> Result<String> {
					Ok(format!("{}:{}", pool.describe(component.name_index)?, pool.describe(component.descriptor_index)?))
				})
				.collect::<Result<Vec<_>>>()?;
			components.join(", ")
		},
		AttributeInfo::InnerClasses { classes } => format!("{} entries", classes.len()),
		AttributeInfo::StackMapTable { entries } => format!("{} frames", entries.len()),
		AttributeInfo::LineNumberTable { line_number_table: table } => format!("{} entries", table.len()),
		AttributeInfo::LocalVariableTable { local_variable_table: table } => format!("{} entries", table.len()),
		AttributeInfo::LocalVariableTypeTable { local_variable_type_table: table } => format!("{} entries", table.len()),
		AttributeInfo::SourceDebugExtension { debug_extension } => format!("{} bytes", debug_extension.len()),
		AttributeInfo::Code(code) => format!("{} bytes of code", code.code.len()),
		AttributeInfo::Unknown { info } => format!("{} bytes, not interpreted", info.len()),
		AttributeInfo::Unresolved { info } => format!("{} bytes, name doesn't resolve", info.len()),
	})
}

fn dump_code(pool: &ConstantPool, code: &Code, indent: &str, out: &mut impl Write) -> Result<()> {
	let instructions = match code.instructions() {
		Ok(instructions) => instructions,
		Err(e) => {
			writeln!(out, "{indent}can't disassemble {} bytes of code: {e}", code.code.len())?;
			return Ok(());
		},
	};

	let lines = code.line_numbers();
	for instruction in &instructions {
		write!(out, "{indent}{instruction}")?;
		if let Some(index) = instruction.constant_pool_index() {
			match pool.describe(index) {
				Ok(text) => write!(out, " // {text}")?,
				Err(e) => write!(out, " // {e}")?,
			}
		}
		if let Some(line) = line_number_in(&lines, instruction.offset) {
			write!(out, " (line {line})")?;
		}
		writeln!(out)?;
	}

	for entry in &code.exception_table {
		let catch_type = if entry.catch_type == 0 { "any".to_owned() } else { pool.describe(entry.catch_type)? };
		writeln!(out, "{indent}try {}..{} catch {catch_type} at {}", entry.start_pc, entry.end_pc, entry.handler_pc)?;
	}

	for bad in verify_branch_targets(&instructions) {
		writeln!(out, "{indent}warning: instruction at {} branches to {}, which is no instruction boundary", bad.offset, bad.target)?;
	}

	dump_attributes(pool, &code.attributes, indent, out)
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use class_codec::attribute::LineNumberTableEntry;
	use class_codec::{Attribute, AttributeInfo, CpInfo};
	use crate::check::testing::class;

	#[test]
	fn dump() -> Result<()> {
		let mut out = Vec::new();
		super::dump(&class(), &mut out)?;

		assert_eq!(String::from_utf8(out)?, "\
class Answer
  version: 52.0
  access: 0x0021 (public super)
  super: java/lang/Object
constant pool (7 slots):
  #1 = Utf8 Answer
  #2 = Class Answer
  #3 = Utf8 java/lang/Object
  #4 = Class java/lang/Object
  #5 = Utf8 answer
  #6 = Utf8 ()I
  #7 = Utf8 Code
fields (0):
methods (1):
  0x0009 (public static) answer:()I
    Code: max_stack=1, max_locals=0
      0: bipush 42
      2: ifeq 5
      5: ireturn
attributes (0):
");
		Ok(())
	}

	#[test]
	fn line_numbers() -> Result<()> {
		let mut class = class();
		let name_index = class.intern_constant(CpInfo::utf8("LineNumberTable"))?;
		if let Some(code) = class.methods[0].code_mut() {
			code.attributes.push(Attribute {
				name_index,
				info: AttributeInfo::LineNumberTable {
					line_number_table: vec![
						LineNumberTableEntry { start_pc: 5, line_number: 4 },
						LineNumberTableEntry { start_pc: 0, line_number: 3 },
					],
				},
			});
		}

		let mut out = Vec::new();
		super::dump(&class, &mut out)?;

		let out = String::from_utf8(out)?;
		assert!(out.contains("      0: bipush 42 (line 3)\n      2: ifeq 5 (line 3)\n      5: ireturn (line 4)\n"), "{out}");
		assert!(out.contains("      LineNumberTable: 2 entries\n"), "{out}");
		Ok(())
	}

	#[test]
	fn bad_branch_is_reported() -> Result<()> {
		let mut class = class();
		if let Some(code) = class.methods[0].code_mut() {
			code.code[4] = 0x02;
		}

		let mut out = Vec::new();
		super::dump(&class, &mut out)?;

		let out = String::from_utf8(out)?;
		assert!(out.contains("      2: ifeq 4\n"), "{out}");
		assert!(out.contains("      warning: instruction at 2 branches to 4, which is no instruction boundary\n"), "{out}");
		Ok(())
	}
}
