use pretty_assertions::assert_eq;
use class_codec::{AttributeInfo, ClassFile, Error, Options};

/// Assembles a class file with the given constant pool, `this_class = 2`, no super class, and the given class
/// level attributes.
fn class_bytes(major_version: u16, pool_count: u16, pool: &[u8], attributes: &[&[u8]]) -> Vec<u8> {
	let mut bytes = vec![0xca, 0xfe, 0xba, 0xbe, 0, 0];
	bytes.extend_from_slice(&major_version.to_be_bytes());
	bytes.extend_from_slice(&pool_count.to_be_bytes());
	bytes.extend_from_slice(pool);
	bytes.extend_from_slice(&[
		0x00, 0x21, // access_flags
		0, 2, // this_class
		0, 0, // super_class
		0, 0, // interfaces
		0, 0, // fields
		0, 0, // methods
	]);
	bytes.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
	for attribute in attributes {
		bytes.extend_from_slice(attribute);
	}
	bytes
}

const POOL: &[u8] = &[
	1, 0, 1, b'A', // 1: Utf8 "A"
	7, 0, 1, // 2: Class A
	5, 0, 0, 0, 1, 0x80, 0, 0, 0, // 3: Long, taking up 4 too
	1, 0, 6, b'V', b'e', b'n', b'd', b'o', b'r', // 5: Utf8 "Vendor"
	6, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0, // 6: Double 1.0, taking up 7 too
	1, 0, 10, b'S', b'o', b'u', b'r', b'c', b'e', b'F', b'i', b'l', b'e', // 8: Utf8 "SourceFile"
	15, 6, 0, 17, // 9: MethodHandle
	16, 0, 1, // 10: MethodType
	18, 0, 0, 0, 12, // 11: InvokeDynamic
	12, 0, 1, 0, 1, // 12: NameAndType
	3, 0xff, 0xff, 0xff, 0xfe, // 13: Integer -2
	4, 0x7f, 0xc0, 0, 0, // 14: Float NaN
	8, 0, 1, // 15: String
	9, 0, 2, 0, 12, // 16: Fieldref
	10, 0, 2, 0, 12, // 17: Methodref
	11, 0, 2, 0, 12, // 18: InterfaceMethodref
];

const POOL_COUNT: u16 = 19;

#[test]
fn all_kinds_of_entries() -> anyhow::Result<()> {
	let bytes = class_bytes(61, POOL_COUNT, POOL, &[]);
	let class = ClassFile::from_bytes(&bytes, &Options::default())?;

	assert_eq!(class.constant_pool.iter().count(), 16);
	assert!(class.constant_pool.get_optional(4).is_none());
	assert!(class.constant_pool.get_optional(7).is_none());
	assert_eq!(class.constant_pool.get(3)?.long_value(), Some(0x1_8000_0000));
	assert_eq!(class.constant_pool.get(6)?.double_value(), Some(1.0));
	assert_eq!(class.constant_pool.get(13)?.integer_value(), Some(-2));
	assert!(class.constant_pool.get(14)?.float_value().is_some_and(f32::is_nan));
	assert_eq!(class.constant_pool.describe(17)?, "A.A:A");
	assert_eq!(class.constant_pool.describe(9)?, "InvokeStatic A.A:A");
	assert_eq!(class.constant_pool.describe(11)?, "#0:A:A");

	assert_eq!(class.to_bytes()?, bytes);
	Ok(())
}

#[test]
fn unknown_attribute_passthrough() -> anyhow::Result<()> {
	let vendor: &[u8] = &[0, 5, 0, 0, 0, 4, 0xde, 0xad, 0xbe, 0xef];
	let source_file: &[u8] = &[0, 8, 0, 0, 0, 2, 0, 5];
	let bytes = class_bytes(52, POOL_COUNT, POOL, &[vendor, source_file]);

	let class = ClassFile::from_bytes(&bytes, &Options::default())?;
	assert_eq!(class.attributes[0].info, AttributeInfo::Unknown { info: vec![0xde, 0xad, 0xbe, 0xef] });
	assert_eq!(class.attributes[1].info, AttributeInfo::SourceFile { sourcefile_index: 5 });
	assert_eq!(class.to_bytes()?, bytes);
	Ok(())
}

#[test]
fn unresolved_attribute_name_is_kept() -> anyhow::Result<()> {
	// name index 2 is a Class entry, 4 the unused slot after the Long
	let first: &[u8] = &[0, 2, 0, 0, 0, 1, 9];
	let second: &[u8] = &[0, 4, 0, 0, 0, 0];
	let source_file: &[u8] = &[0, 8, 0, 0, 0, 2, 0, 5];
	let bytes = class_bytes(52, POOL_COUNT, POOL, &[first, second, source_file]);

	let class = ClassFile::from_bytes(&bytes, &Options::default())?;
	assert_eq!(class.attributes[0].info, AttributeInfo::Unresolved { info: vec![9] });
	assert_eq!(class.attributes[1].info, AttributeInfo::Unresolved { info: vec![] });
	assert_eq!(class.attributes[2].info, AttributeInfo::SourceFile { sourcefile_index: 5 });
	assert_eq!(class.to_bytes()?, bytes);
	Ok(())
}

#[test]
fn toggles_keep_output() -> anyhow::Result<()> {
	let source_file: &[u8] = &[0, 8, 0, 0, 0, 2, 0, 5];
	let bytes = class_bytes(52, POOL_COUNT, POOL, &[source_file]);

	let options = Options { trace: true, skip_constant_pool_index: true, skip_attributes: true };
	let class = ClassFile::from_bytes(&bytes, &options)?;
	assert_eq!(class.attributes[0].info, AttributeInfo::Unknown { info: vec![0, 5] });
	assert_eq!(class.to_bytes()?, bytes);
	assert_eq!(class.to_bytes_with(&options)?, bytes);
	Ok(())
}

#[test]
fn this_class_outside_empty_pool() {
	let bytes = class_bytes(52, 1, &[], &[]);
	assert!(matches!(ClassFile::from_bytes(&bytes, &Options::default()), Err(Error::InvalidFormat(_))));
}

#[test]
fn this_class_of_wrong_kind() {
	let bytes = class_bytes(52, 3, &[1, 0, 1, b'A', 1, 0, 1, b'B'], &[]);
	assert!(matches!(ClassFile::from_bytes(&bytes, &Options::default()), Err(Error::InvalidFormat(_))));
}

#[test]
fn bad_magic() {
	let mut bytes = class_bytes(52, POOL_COUNT, POOL, &[]);
	bytes[3] = 0xbf;
	assert!(matches!(ClassFile::from_bytes(&bytes, &Options::default()), Err(Error::InvalidFormat(_))));
}

#[test]
fn unusual_version_is_read() -> anyhow::Result<()> {
	let bytes = class_bytes(99, POOL_COUNT, POOL, &[]);
	let class = ClassFile::from_bytes(&bytes, &Options::default())?;
	assert_eq!(class.major_version, 99);
	Ok(())
}

#[test]
fn truncated_and_trailing_bytes() {
	let bytes = class_bytes(52, POOL_COUNT, POOL, &[]);

	let truncated = &bytes[..bytes.len() - 1];
	assert!(matches!(ClassFile::from_bytes(truncated, &Options::default()), Err(Error::InvalidFormat(_))));

	let mut trailing = bytes.clone();
	trailing.push(0);
	assert!(matches!(ClassFile::from_bytes(&trailing, &Options::default()), Err(Error::InvalidFormat(_))));
}

#[test]
fn unknown_pool_tag() {
	let bytes = class_bytes(52, 2, &[2, 0, 0], &[]);
	assert!(matches!(ClassFile::from_bytes(&bytes, &Options::default()), Err(Error::InvalidFormat(_))));
}

/// A `Code` attribute holding a `Code` attribute, and so on, `depth` levels deep. Name index 3 is `Code`.
fn nested_code(depth: usize) -> Vec<u8> {
	let mut attribute = Vec::new();
	for level in 0..depth {
		let mut payload = vec![
			0, 0, 0, 0, // max_stack, max_locals
			0, 0, 0, 1, 0xb1, // return
			0, 0, // exception_table
		];
		if level == 0 {
			payload.extend_from_slice(&[0, 0]);
		} else {
			payload.extend_from_slice(&[0, 1]);
			payload.extend_from_slice(&attribute);
		}
		attribute = vec![0, 3];
		attribute.extend_from_slice(&(payload.len() as u32).to_be_bytes());
		attribute.extend_from_slice(&payload);
	}
	attribute
}

const CODE_POOL: &[u8] = &[
	1, 0, 1, b'A', // 1: Utf8 "A"
	7, 0, 1, // 2: Class A
	1, 0, 4, b'C', b'o', b'd', b'e', // 3: Utf8 "Code"
];

#[test]
fn nested_attributes() -> anyhow::Result<()> {
	let bytes = class_bytes(52, 4, CODE_POOL, &[&nested_code(3)[..]]);
	let class = ClassFile::from_bytes(&bytes, &Options::default())?;
	let AttributeInfo::Code(code) = &class.attributes[0].info else {
		anyhow::bail!("expected a Code attribute, got {:?}", class.attributes[0].info);
	};
	assert!(matches!(code.attributes[0].info, AttributeInfo::Code(_)));
	assert_eq!(class.to_bytes()?, bytes);
	Ok(())
}

#[test]
fn attribute_nesting_is_bounded() {
	let bytes = class_bytes(52, 4, CODE_POOL, &[&nested_code(500)[..]]);
	assert!(matches!(ClassFile::from_bytes(&bytes, &Options::default()), Err(Error::InvalidFormat(_))));

	// not interpreted, so not nested
	let options = Options { skip_attributes: true, ..Options::default() };
	assert!(ClassFile::from_bytes(&bytes, &options).is_ok());
}
