use thiserror::Error;

/// An error produced while reading or writing a class file.
#[derive(Error, Debug)]
pub enum Error {
	/// A structural field of the class file is malformed: a bad magic number, a constant pool index out of range or
	/// pointing at the wrong kind of entry, an unknown tag byte, or a payload that doesn't match its declared length.
	#[error("invalid class file format: {0}")]
	InvalidFormat(String),
	/// An opcode byte that doesn't belong to any instruction. This only aborts decoding of the code array it was found in.
	#[error("invalid opcode {opcode:#04x} at bytecode offset {offset}")]
	InvalidOpcode {
		opcode: u8,
		offset: u32,
	},
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Prefixes the message of an [`Error::InvalidFormat`] with some context. Other kinds are returned unchanged.
	pub(crate) fn context(self, context: impl std::fmt::Display) -> Error {
		match self {
			Error::InvalidFormat(message) => Error::InvalidFormat(format!("{context}: {message}")),
			other => other,
		}
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns early with an [`Error::InvalidFormat`], formatting the arguments like [`format!`].
macro_rules! bail_invalid {
	($($arg:tt)*) => {
		return Err($crate::error::Error::InvalidFormat(format!($($arg)*)))
	};
}

pub(crate) use bail_invalid;

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::{Error, Result};

	fn fails() -> Result<()> {
		bail_invalid!("index {} out of range", 7);
	}

	#[test]
	fn context_only_touches_invalid_format() {
		let error = fails().unwrap_err().context("while reading pool");
		assert_eq!(error.to_string(), "invalid class file format: while reading pool: index 7 out of range");

		let error = Error::InvalidOpcode { opcode: 0xcb, offset: 4 }.context("ignored");
		assert_eq!(error.to_string(), "invalid opcode 0xcb at bytecode offset 4");
	}
}
