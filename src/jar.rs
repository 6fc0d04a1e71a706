use std::io::{Read, Seek};
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use zip::ZipArchive;

/// Whether the file at `path` is read as an archive of class files.
pub(crate) fn is_archive(path: &Path) -> bool {
	path.extension().is_some_and(|extension| extension == "jar" || extension == "zip")
}

pub(crate) fn is_class(path: &Path) -> bool {
	path.extension().is_some_and(|extension| extension == "class")
}

/// Calls `f` with the name and contents of every `.class` entry of the archive, in archive order.
pub(crate) fn for_each_class(reader: impl Read + Seek, mut f: impl FnMut(&str, Vec<u8>) -> Result<()>) -> Result<()> {
	let mut zip = ZipArchive::new(reader)?;

	for index in 0..zip.len() {
		let mut file = zip.by_index(index)?;
		if file.is_file() && file.name().ends_with(".class") {
			let name = file.name().to_owned();

			let mut vec = Vec::new();
			file.read_to_end(&mut vec)
				.with_context(|| anyhow!("failed to read archive entry {name:?}"))?;

			f(&name, vec)?;
		}
	}

	Ok(())
}

/// Reads the entry called `name` out of the archive.
pub(crate) fn read_entry(reader: impl Read + Seek, name: &str) -> Result<Vec<u8>> {
	let mut zip = ZipArchive::new(reader)?;

	let Some(index) = zip.index_for_name(name) else {
		bail!("no entry named {name:?} in archive");
	};
	let mut file = zip.by_index(index)?;

	let mut vec = Vec::new();
	file.read_to_end(&mut vec)
		.with_context(|| anyhow!("failed to read archive entry {name:?}"))?;
	Ok(vec)
}

#[cfg(test)]
pub(crate) mod testing {
	use std::io::{Cursor, Write};
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use zip::write::SimpleFileOptions;
	use zip::ZipWriter;

	/// Writes an archive holding the given entries.
	pub(crate) fn archive(entries: &[(&str, &[u8])]) -> Result<Vec<u8>> {
		let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
		for (name, data) in entries {
			writer.start_file(*name, SimpleFileOptions::default())?;
			writer.write_all(data)?;
		}
		Ok(writer.finish()?.into_inner())
	}

	#[test]
	fn only_class_entries() -> Result<()> {
		let archive = archive(&[
			("META-INF/MANIFEST.MF", &b"Manifest-Version: 1.0\n"[..]),
			("a/A.class", &[1, 2, 3][..]),
			("b/B.class", &[4][..]),
		])?;

		let mut seen = Vec::new();
		super::for_each_class(Cursor::new(&archive), |name, bytes| {
			seen.push((name.to_owned(), bytes));
			Ok(())
		})?;

		assert_eq!(seen, vec![
			("a/A.class".to_owned(), vec![1, 2, 3]),
			("b/B.class".to_owned(), vec![4]),
		]);
		Ok(())
	}

	#[test]
	fn entry_by_name() -> Result<()> {
		let archive = archive(&[("a/A.class", &[1, 2, 3][..])])?;

		assert_eq!(super::read_entry(Cursor::new(&archive), "a/A.class")?, vec![1, 2, 3]);
		assert!(super::read_entry(Cursor::new(&archive), "a/B.class").is_err());
		Ok(())
	}
}
