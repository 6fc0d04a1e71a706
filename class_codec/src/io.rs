//! The read/write contract shared by every structure of a class file.
//!
//! All multi-byte integers of the class file format are big-endian. The helpers here read exactly the bytes they're
//! asked for, there's no look-ahead and no seeking.

use std::io::{Read, Write};
use crate::error::{bail_invalid, Result};
use crate::pool::ConstantPool;

/// Explicit configuration for a single read or write call.
///
/// The default value is what normal operation uses.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Options {
	/// Emit a [`log::trace!`] record for each structure read or written.
	///
	/// This is diagnostic only, the bytes produced are the same either way.
	pub trace: bool,
	/// Don't build the reverse-lookup map of the constant pool while reading.
	///
	/// The map is built on first use instead, see [`ConstantPool::index_of`].
	pub skip_constant_pool_index: bool,
	/// Don't interpret any attributes while reading, keep all of them as [`AttributeInfo::Unknown`].
	///
	/// [`AttributeInfo::Unknown`]: crate::attribute::AttributeInfo::Unknown
	pub skip_attributes: bool,
}

/// How deep attributes may be nested in other attributes, like `Code` in `Code`.
pub const MAX_ATTRIBUTE_NESTING: usize = 64;

/// What a structure gets to see while being read or written.
#[derive(Debug, Copy, Clone)]
pub struct Context<'a> {
	/// The constant pool, once it's been read. It's `None` while reading the pool itself.
	pub pool: Option<&'a ConstantPool>,
	pub options: &'a Options,
	/// The number of attributes enclosing the structure.
	pub depth: usize,
}

impl<'a> Context<'a> {
	pub fn new(options: &'a Options) -> Context<'a> {
		Context { pool: None, options, depth: 0 }
	}

	/// The context for the payload of an attribute, failing if that's nested too deep.
	pub fn nested(self) -> Result<Context<'a>> {
		if self.depth >= MAX_ATTRIBUTE_NESTING {
			bail_invalid!("attributes nested deeper than {MAX_ATTRIBUTE_NESTING} levels");
		}
		Ok(Context { depth: self.depth + 1, ..self })
	}

	pub fn with_pool(self, pool: &'a ConstantPool) -> Context<'a> {
		Context { pool: Some(pool), ..self }
	}

	/// Gets the constant pool, failing if it's not yet available.
	pub fn pool(&self) -> Result<&'a ConstantPool> {
		match self.pool {
			Some(pool) => Ok(pool),
			None => bail_invalid!("expected to have the constant pool at this point of reading"),
		}
	}

	/// The trace hook. Fires only if [`Options::trace`] is set.
	pub fn trace(&self, action: &str, structure: &str) {
		if self.options.trace {
			log::trace!(target: "class_codec::trace", "{action} {structure}");
		}
	}
}

/// A binary record of the class file format.
pub trait Structure: Sized {
	/// Reads this structure, consuming exactly the bytes that make it up.
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<Self>;

	/// Writes this structure, producing exactly the bytes that [`Structure::read`] consumes.
	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()>;
}

pub trait ClassRead {
	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]>;
	fn read_u8_vec(&mut self, size: usize) -> Result<Vec<u8>>;

	fn read_u8(&mut self) -> Result<u8> {
		Ok(u8::from_be_bytes(self.read_n()?))
	}
	fn read_u16(&mut self) -> Result<u16> {
		Ok(u16::from_be_bytes(self.read_n()?))
	}
	fn read_u32(&mut self) -> Result<u32> {
		Ok(u32::from_be_bytes(self.read_n()?))
	}
	fn read_u64(&mut self) -> Result<u64> {
		Ok(u64::from_be_bytes(self.read_n()?))
	}
	fn read_i8(&mut self) -> Result<i8> {
		Ok(i8::from_be_bytes(self.read_n()?))
	}
	fn read_i16(&mut self) -> Result<i16> {
		Ok(i16::from_be_bytes(self.read_n()?))
	}
	fn read_i32(&mut self) -> Result<i32> {
		Ok(i32::from_be_bytes(self.read_n()?))
	}
	fn read_i64(&mut self) -> Result<i64> {
		Ok(i64::from_be_bytes(self.read_n()?))
	}

	fn read_u8_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u8()? as usize)
	}
	fn read_u16_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u16()? as usize)
	}
	fn read_u32_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u32()? as usize)
	}

	fn read_vec<T, S, E>(&mut self, get_size: S, mut get_element: E) -> Result<Vec<T>>
		where
			S: FnOnce(&mut Self) -> Result<usize>,
			E: FnMut(&mut Self) -> Result<T>
	{
		let size = get_size(self)?;
		// The size comes from untrusted data, so don't let it decide the allocation up front.
		let mut vec = Vec::with_capacity(size.min(1024));
		for _ in 0..size {
			vec.push(get_element(self)?);
		}
		Ok(vec)
	}
}

impl<T: Read> ClassRead for T {
	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut buf = [0u8; N];
		self.read_exact(&mut buf)?;
		Ok(buf)
	}

	fn read_u8_vec(&mut self, size: usize) -> Result<Vec<u8>> {
		let mut vec = Vec::new();
		let read = self.by_ref().take(size as u64).read_to_end(&mut vec)?;
		if read != size {
			return Err(std::io::Error::new(
				std::io::ErrorKind::UnexpectedEof,
				format!("expected {size} bytes, but only {read} were left"),
			).into());
		}
		Ok(vec)
	}
}

pub trait ClassWrite {
	fn write_u8_slice(&mut self, buf: &[u8]) -> Result<()>;

	fn write_u8(&mut self, value: u8) -> Result<()> {
		self.write_u8_slice(&[value])
	}
	fn write_u16(&mut self, value: u16) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes())
	}
	fn write_u32(&mut self, value: u32) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes())
	}
	fn write_u64(&mut self, value: u64) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes())
	}
	fn write_i8(&mut self, value: i8) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes())
	}
	fn write_i16(&mut self, value: i16) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes())
	}
	fn write_i32(&mut self, value: i32) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes())
	}
	fn write_i64(&mut self, value: i64) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes())
	}

	fn write_usize_as_u8(&mut self, value: usize) -> Result<()> {
		let Ok(value) = u8::try_from(value) else {
			bail_invalid!("failed to convert {value} to u8 for writing: value too large");
		};
		self.write_u8(value)
	}
	fn write_usize_as_u16(&mut self, value: usize) -> Result<()> {
		let Ok(value) = u16::try_from(value) else {
			bail_invalid!("failed to convert {value} to u16 for writing: value too large");
		};
		self.write_u16(value)
	}
	fn write_usize_as_u32(&mut self, value: usize) -> Result<()> {
		let Ok(value) = u32::try_from(value) else {
			bail_invalid!("failed to convert {value} to u32 for writing: value too large");
		};
		self.write_u32(value)
	}

	fn write_slice<T>(
		&mut self,
		slice: &[T],
		put_size: impl FnOnce(&mut Self, usize) -> Result<()>,
		mut put_element: impl FnMut(&mut Self, &T) -> Result<()>
	) -> Result<()> {
		put_size(self, slice.len())?;
		for value in slice {
			put_element(self, value)?;
		}
		Ok(())
	}
}

impl<T: Write> ClassWrite for T {
	fn write_u8_slice(&mut self, buf: &[u8]) -> Result<()> {
		self.write_all(buf)?;
		Ok(())
	}
}

/// Reads a `u16` count followed by that many structures.
pub fn read_structures<T: Structure>(reader: &mut impl ClassRead, cx: &Context) -> Result<Vec<T>> {
	reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| T::read(r, cx),
	)
}

/// Writes a `u16` count followed by the structures.
pub fn write_structures<T: Structure>(writer: &mut impl ClassWrite, structures: &[T], cx: &Context) -> Result<()> {
	writer.write_slice(
		structures,
		|w, size| w.write_usize_as_u16(size),
		|w, structure| structure.write(w, cx),
	)
}

/// Reads a `u16` count followed by that many `u16` values, as used for lists of constant pool indices.
pub fn read_u16_list(reader: &mut impl ClassRead) -> Result<Vec<u16>> {
	reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| r.read_u16(),
	)
}

pub fn write_u16_list(writer: &mut impl ClassWrite, values: &[u16]) -> Result<()> {
	writer.write_slice(
		values,
		|w, size| w.write_usize_as_u16(size),
		|w, &value| w.write_u16(value),
	)
}

/// Formats a flags value as four hex digits, like `0x0021`.
pub fn hex_u16(value: u16) -> String {
	format!("{value:#06x}")
}

#[cfg(test)]
mod testing {
	use std::io::Cursor;
	use pretty_assertions::assert_eq;
	use crate::error::Error;
	use super::{ClassRead, ClassWrite, Context, Options, MAX_ATTRIBUTE_NESTING, hex_u16, read_u16_list, write_u16_list};

	#[test]
	fn big_endian() {
		let mut r = Cursor::new([0xca, 0xfe, 0xba, 0xbe, 0x00, 0x34, 0xff]);
		assert_eq!(r.read_u32().unwrap(), 0xcafebabe);
		assert_eq!(r.read_u16().unwrap(), 52);
		assert_eq!(r.read_i8().unwrap(), -1);
		assert!(matches!(r.read_u8(), Err(Error::Io(_))));

		let mut w = Vec::new();
		w.write_i16(-2).unwrap();
		w.write_u64(1).unwrap();
		assert_eq!(w, [0xff, 0xfe, 0, 0, 0, 0, 0, 0, 0, 1]);
	}

	#[test]
	fn u8_vec_must_be_complete() {
		let mut r = Cursor::new([1, 2, 3]);
		assert_eq!(r.read_u8_vec(2).unwrap(), vec![1, 2]);
		assert!(matches!(r.read_u8_vec(2), Err(Error::Io(_))));
	}

	#[test]
	fn lengths_must_fit() {
		let mut w = Vec::new();
		assert!(matches!(w.write_usize_as_u8(256), Err(Error::InvalidFormat(_))));
		w.write_usize_as_u8(255).unwrap();
		assert_eq!(w, [255]);
	}

	#[test]
	fn u16_list() {
		let mut w = Vec::new();
		write_u16_list(&mut w, &[3, 0x102]).unwrap();
		assert_eq!(w, [0, 2, 0, 3, 1, 2]);
		assert_eq!(read_u16_list(&mut Cursor::new(w)).unwrap(), vec![3, 0x102]);
	}

	#[test]
	fn nesting_is_bounded() {
		let options = Options::default();
		let mut cx = Context::new(&options);
		for _ in 0..MAX_ATTRIBUTE_NESTING {
			cx = cx.nested().unwrap();
		}
		assert_eq!(cx.depth, MAX_ATTRIBUTE_NESTING);
		assert!(matches!(cx.nested(), Err(Error::InvalidFormat(_))));
	}

	#[test]
	fn hex() {
		assert_eq!(hex_u16(0x21), "0x0021");
		assert_eq!(hex_u16(0xffff), "0xffff");
	}
}
