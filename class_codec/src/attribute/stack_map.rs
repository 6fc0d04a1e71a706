use crate::error::{bail_invalid, Result};
use crate::io::{read_structures, write_structures, ClassRead, ClassWrite, Context, Structure};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VerificationTypeInfo {
	Top,
	Integer,
	Float,
	Double,
	Long,
	Null,
	UninitializedThis,
	Object { cpool_index: u16 },
	Uninitialized { offset: u16 },
}

impl Structure for VerificationTypeInfo {
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<VerificationTypeInfo> {
		cx.trace("read", "VerificationTypeInfo");
		Ok(match reader.read_u8()? {
			0 => VerificationTypeInfo::Top,
			1 => VerificationTypeInfo::Integer,
			2 => VerificationTypeInfo::Float,
			3 => VerificationTypeInfo::Double,
			4 => VerificationTypeInfo::Long,
			5 => VerificationTypeInfo::Null,
			6 => VerificationTypeInfo::UninitializedThis,
			7 => VerificationTypeInfo::Object { cpool_index: reader.read_u16()? },
			8 => VerificationTypeInfo::Uninitialized { offset: reader.read_u16()? },
			tag => bail_invalid!("unexpected verification type info tag {tag}"),
		})
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		cx.trace("write", "VerificationTypeInfo");
		match *self {
			VerificationTypeInfo::Top => writer.write_u8(0),
			VerificationTypeInfo::Integer => writer.write_u8(1),
			VerificationTypeInfo::Float => writer.write_u8(2),
			VerificationTypeInfo::Double => writer.write_u8(3),
			VerificationTypeInfo::Long => writer.write_u8(4),
			VerificationTypeInfo::Null => writer.write_u8(5),
			VerificationTypeInfo::UninitializedThis => writer.write_u8(6),
			VerificationTypeInfo::Object { cpool_index } => {
				writer.write_u8(7)?;
				writer.write_u16(cpool_index)
			},
			VerificationTypeInfo::Uninitialized { offset } => {
				writer.write_u8(8)?;
				writer.write_u16(offset)
			},
		}
	}
}

/// An entry of the `StackMapTable` attribute.
///
/// The frame type byte is not stored where it can be computed back from the other fields. For [`StackMapFrame::Same`]
/// and [`StackMapFrame::SameLocals1StackItem`] it encodes the offset delta, for [`StackMapFrame::Chop`] the number of
/// chopped locals, and for [`StackMapFrame::Append`] the number of appended locals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StackMapFrame {
	/// Frame types `0..=63`.
	Same { offset_delta: u8 },
	/// Frame types `64..=127`.
	SameLocals1StackItem { offset_delta: u8, stack: VerificationTypeInfo },
	/// Frame type `247`.
	SameLocals1StackItemExtended { offset_delta: u16, stack: VerificationTypeInfo },
	/// Frame types `248..=250`, chopping `k` locals, `1..=3`.
	Chop { k: u8, offset_delta: u16 },
	/// Frame type `251`.
	SameExtended { offset_delta: u16 },
	/// Frame types `252..=254`, appending one to three locals.
	Append { offset_delta: u16, locals: Vec<VerificationTypeInfo> },
	/// Frame type `255`.
	Full { offset_delta: u16, locals: Vec<VerificationTypeInfo>, stack: Vec<VerificationTypeInfo> },
}

impl StackMapFrame {
	pub fn offset_delta(&self) -> u16 {
		match *self {
			StackMapFrame::Same { offset_delta } |
			StackMapFrame::SameLocals1StackItem { offset_delta, .. } => offset_delta as u16,
			StackMapFrame::SameLocals1StackItemExtended { offset_delta, .. } |
			StackMapFrame::Chop { offset_delta, .. } |
			StackMapFrame::SameExtended { offset_delta } |
			StackMapFrame::Append { offset_delta, .. } |
			StackMapFrame::Full { offset_delta, .. } => offset_delta,
		}
	}

	fn frame_type(&self) -> Result<u8> {
		Ok(match self {
			&StackMapFrame::Same { offset_delta } if offset_delta <= 63 => offset_delta,
			&StackMapFrame::SameLocals1StackItem { offset_delta, .. } if offset_delta <= 63 => offset_delta + 64,
			StackMapFrame::SameLocals1StackItemExtended { .. } => 247,
			&StackMapFrame::Chop { k, .. } if (1..=3).contains(&k) => 251 - k,
			StackMapFrame::SameExtended { .. } => 251,
			StackMapFrame::Append { locals, .. } if (1..=3).contains(&locals.len()) => 251 + locals.len() as u8,
			StackMapFrame::Full { .. } => 255,
			frame => bail_invalid!("can't encode stack map frame {frame:?}, a field is out of the range of its frame type"),
		})
	}
}

impl Structure for StackMapFrame {
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<StackMapFrame> {
		cx.trace("read", "StackMapFrame");
		let frame_type = reader.read_u8()?;
		Ok(match frame_type {
			0..=63 => StackMapFrame::Same { offset_delta: frame_type },
			64..=127 => StackMapFrame::SameLocals1StackItem {
				offset_delta: frame_type - 64,
				stack: VerificationTypeInfo::read(reader, cx)?,
			},
			128..=246 => bail_invalid!("stack map frame type {frame_type} is reserved"),
			247 => StackMapFrame::SameLocals1StackItemExtended {
				offset_delta: reader.read_u16()?,
				stack: VerificationTypeInfo::read(reader, cx)?,
			},
			248..=250 => StackMapFrame::Chop { k: 251 - frame_type, offset_delta: reader.read_u16()? },
			251 => StackMapFrame::SameExtended { offset_delta: reader.read_u16()? },
			252..=254 => {
				let offset_delta = reader.read_u16()?;
				let locals = reader.read_vec(
					|_| Ok((frame_type - 251) as usize),
					|r| VerificationTypeInfo::read(r, cx),
				)?;
				StackMapFrame::Append { offset_delta, locals }
			},
			255 => StackMapFrame::Full {
				offset_delta: reader.read_u16()?,
				locals: read_structures(reader, cx)?,
				stack: read_structures(reader, cx)?,
			},
		})
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		cx.trace("write", "StackMapFrame");
		writer.write_u8(self.frame_type()?)?;
		match self {
			StackMapFrame::Same { .. } => {},
			StackMapFrame::SameLocals1StackItem { stack, .. } => stack.write(writer, cx)?,
			StackMapFrame::SameLocals1StackItemExtended { offset_delta, stack } => {
				writer.write_u16(*offset_delta)?;
				stack.write(writer, cx)?;
			},
			StackMapFrame::Chop { offset_delta, .. } |
			StackMapFrame::SameExtended { offset_delta } => writer.write_u16(*offset_delta)?,
			StackMapFrame::Append { offset_delta, locals } => {
				writer.write_u16(*offset_delta)?;
				for local in locals {
					local.write(writer, cx)?;
				}
			},
			StackMapFrame::Full { offset_delta, locals, stack } => {
				writer.write_u16(*offset_delta)?;
				write_structures(writer, locals, cx)?;
				write_structures(writer, stack, cx)?;
			},
		}
		Ok(())
	}
}

#[cfg(test)]
mod testing {
	use std::io::Cursor;
	use pretty_assertions::assert_eq;
	use crate::error::Error;
	use crate::io::{Context, Options, Structure};
	use super::{StackMapFrame, VerificationTypeInfo};

	fn read(bytes: &[u8]) -> Result<StackMapFrame, Error> {
		StackMapFrame::read(&mut Cursor::new(bytes), &Context::new(&Options::default()))
	}

	fn write(frame: &StackMapFrame) -> Result<Vec<u8>, Error> {
		let mut vec = Vec::new();
		frame.write(&mut vec, &Context::new(&Options::default()))?;
		Ok(vec)
	}

	#[test]
	fn frame_types() -> anyhow::Result<()> {
		let cases: &[(&[u8], StackMapFrame)] = &[
			(&[12], StackMapFrame::Same { offset_delta: 12 }),
			(&[65, 1], StackMapFrame::SameLocals1StackItem { offset_delta: 1, stack: VerificationTypeInfo::Integer }),
			(&[249, 0, 9], StackMapFrame::Chop { k: 2, offset_delta: 9 }),
			(&[253, 0, 3, 7, 0, 4, 4], StackMapFrame::Append {
				offset_delta: 3,
				locals: vec![VerificationTypeInfo::Object { cpool_index: 4 }, VerificationTypeInfo::Long],
			}),
			(&[255, 0, 1, 0, 1, 6, 0, 1, 8, 0, 2], StackMapFrame::Full {
				offset_delta: 1,
				locals: vec![VerificationTypeInfo::UninitializedThis],
				stack: vec![VerificationTypeInfo::Uninitialized { offset: 2 }],
			}),
		];
		for (bytes, frame) in cases {
			assert_eq!(&read(bytes)?, frame);
			assert_eq!(write(frame)?, *bytes);
		}
		Ok(())
	}

	#[test]
	fn reserved_frame_types() {
		for frame_type in 128..=246 {
			assert!(matches!(read(&[frame_type, 0, 0]), Err(Error::InvalidFormat(_))), "{frame_type}");
		}
	}

	#[test]
	fn out_of_range_fields() {
		assert!(matches!(write(&StackMapFrame::Same { offset_delta: 64 }), Err(Error::InvalidFormat(_))));
		assert!(matches!(write(&StackMapFrame::Chop { k: 0, offset_delta: 0 }), Err(Error::InvalidFormat(_))));
		assert!(matches!(write(&StackMapFrame::Append { offset_delta: 0, locals: Vec::new() }), Err(Error::InvalidFormat(_))));
	}
}
