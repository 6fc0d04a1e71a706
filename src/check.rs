//! Round-trip checking of class files, on their own or inside archives.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, bail, Context, Result};
use class_codec::instruction::{decode, encode, verify_branch_targets};
use class_codec::{ClassFile, Options};
use walkdir::WalkDir;
use crate::jar;

#[derive(Debug, Default, PartialEq)]
pub(crate) struct Summary {
	pub(crate) checked: usize,
	/// Names of the classes that failed, with the reason.
	pub(crate) failed: Vec<(String, String)>,
}

impl Summary {
	fn record(&mut self, name: &str, result: Result<()>) {
		self.checked += 1;
		if let Err(e) = result {
			log::error!("{name}: {e:#}");
			self.failed.push((name.to_owned(), format!("{e:#}")));
		}
	}
}

/// Reads and writes back the class in `bytes`, failing if the bytes written differ from `bytes`.
///
/// The code arrays of all methods also need to survive being disassembled and assembled again.
pub(crate) fn check_class(bytes: &[u8], options: &Options) -> Result<()> {
	let class = ClassFile::from_bytes(bytes, options)?;

	let written = class.to_bytes_with(options)?;
	if let Some(position) = first_difference(bytes, &written) {
		bail!("written class differs from the read one at byte {position} (read {} bytes, wrote {})", bytes.len(), written.len());
	}

	for method in &class.methods {
		if let Some(code) = method.code() {
			let describe = || format!("in method {}{}",
				class.constant_pool.describe(method.name_index).unwrap_or_default(),
				class.constant_pool.describe(method.descriptor_index).unwrap_or_default());

			let instructions = decode(&code.code).with_context(describe)?;
			for bad in verify_branch_targets(&instructions) {
				log::warn!("{}: instruction at {} branches to {}, which is no instruction boundary", describe(), bad.offset, bad.target);
			}

			let encoded = encode(&instructions).with_context(describe)?;
			if let Some(position) = first_difference(&code.code, &encoded) {
				return Err(anyhow!("reassembled code differs at byte {position}")).with_context(describe);
			}
		}
	}

	Ok(())
}

fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
	a.iter().zip(b).position(|(a, b)| a != b)
		.or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

fn files(path: &Path) -> Result<Vec<PathBuf>> {
	WalkDir::new(path)
		.sort_by_file_name()
		.into_iter()
		.filter(|res| res.as_ref().is_ok_and(|res| !res.file_type().is_dir()))
		.map(|res| res.map(|entry| entry.into_path()))
		.collect::<Result<_, walkdir::Error>>()
		.with_context(|| anyhow!("failed to get files (recursively) for {path:?}"))
}

/// Checks the archive read by `reader`, naming the classes in it after `archive_name`.
pub(crate) fn check_archive(reader: impl std::io::Read + std::io::Seek, archive_name: &str, options: &Options, summary: &mut Summary) -> Result<()> {
	jar::for_each_class(reader, |name, bytes| {
		summary.record(&format!("{archive_name}!{name}"), check_class(&bytes, options));
		Ok(())
	})
}

/// Checks every class file and every class in an archive found under the given paths.
pub(crate) fn check_paths(paths: &[PathBuf], options: &Options) -> Result<Summary> {
	let mut summary = Summary::default();

	for path in paths {
		for file in files(path)? {
			let name = file.display().to_string();

			if jar::is_class(&file) {
				let bytes = std::fs::read(&file)
					.with_context(|| anyhow!("failed to read class file {file:?}"))?;
				summary.record(&name, check_class(&bytes, options));
			} else if jar::is_archive(&file) {
				log::info!("checking archive {name}");
				let reader = BufReader::new(File::open(&file)
					.with_context(|| anyhow!("failed to open archive {file:?}"))?);
				check_archive(reader, &name, options, &mut summary)
					.with_context(|| anyhow!("failed to check archive {file:?}"))?;
			} else {
				log::debug!("skipping {name}");
			}
		}
	}

	Ok(summary)
}

#[cfg(test)]
pub(crate) mod testing {
	use std::io::Cursor;
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use class_codec::access::{ACC_PUBLIC, ACC_STATIC, ACC_SUPER};
	use class_codec::{Attribute, AttributeInfo, ClassFile, ClassMember, Code, ConstantPool, CpInfo, MemberKind, Options};
	use crate::jar::testing::archive;
	use super::{check_archive, check_class, Summary};

	/// A class with one static method `int answer()` that returns 42.
	pub(crate) fn class() -> ClassFile {
		ClassFile {
			minor_version: 0,
			major_version: 52,
			constant_pool: ConstantPool::from_entries([
				Some(CpInfo::utf8("Answer")), // 1
				Some(CpInfo::Class { name_index: 1 }),
				Some(CpInfo::utf8("java/lang/Object")),
				Some(CpInfo::Class { name_index: 3 }),
				Some(CpInfo::utf8("answer")), // 5
				Some(CpInfo::utf8("()I")),
				Some(CpInfo::utf8("Code")),
			]),
			access_flags: ACC_PUBLIC | ACC_SUPER,
			this_class: 2,
			super_class: 4,
			interfaces: Vec::new(),
			fields: Vec::new(),
			methods: vec![
				ClassMember {
					kind: MemberKind::Method,
					access_flags: ACC_PUBLIC | ACC_STATIC,
					name_index: 5,
					descriptor_index: 6,
					attributes: vec![
						Attribute {
							name_index: 7,
							info: AttributeInfo::Code(Code {
								max_stack: 1,
								max_locals: 0,
								code: vec![
									0x10, 0x2a, // bipush 42
									0x99, 0x00, 0x03, // ifeq +3
									0xac, // ireturn
								],
								exception_table: Vec::new(),
								attributes: Vec::new(),
							}),
						},
					],
				},
			],
			attributes: Vec::new(),
		}
	}

	#[test]
	fn valid_class() -> Result<()> {
		let bytes = class().to_bytes()?;
		check_class(&bytes, &Options::default())?;
		check_class(&bytes, &Options { trace: false, skip_constant_pool_index: true, skip_attributes: true })?;
		Ok(())
	}

	#[test]
	fn trailing_bytes() -> Result<()> {
		let mut bytes = class().to_bytes()?;
		bytes.push(0);
		assert!(check_class(&bytes, &Options::default()).is_err());
		Ok(())
	}

	#[test]
	fn bad_code() -> Result<()> {
		let mut class = class();
		if let Some(code) = class.methods[0].code_mut() {
			code.code = vec![0x00, 0xcb]; // nop, then an opcode that doesn't exist
		}
		let bytes = class.to_bytes()?;

		let error = check_class(&bytes, &Options::default()).map(|_| ()).err().map(|e| format!("{e:#}"));
		assert!(error.is_some_and(|e| e.starts_with("in method answer()I")));
		Ok(())
	}

	#[test]
	fn in_memory_archive() -> Result<()> {
		let good = class().to_bytes()?;
		let mut bad = good.clone();
		bad[0] = 0;

		let archive = archive(&[
			("META-INF/MANIFEST.MF", &b"Manifest-Version: 1.0\n"[..]),
			("Answer.class", &good[..]),
			("Broken.class", &bad[..]),
		])?;

		let mut summary = Summary::default();
		check_archive(Cursor::new(&archive), "test.jar", &Options::default(), &mut summary)?;

		assert_eq!(summary.checked, 2);
		assert_eq!(summary.failed.len(), 1);
		assert_eq!(summary.failed[0].0, "test.jar!Broken.class");
		Ok(())
	}

	#[test]
	fn differences() {
		assert_eq!(super::first_difference(&[1, 2, 3], &[1, 2, 3]), None);
		assert_eq!(super::first_difference(&[1, 2, 3], &[1, 0, 3]), Some(1));
		assert_eq!(super::first_difference(&[1, 2, 3], &[1, 2]), Some(2));
	}
}
