//! Access flags, and turning them into text.

use crate::io::hex_u16;

pub const ACC_PUBLIC: u16       = 0x0001; // class, field, method, inner class
pub const ACC_PRIVATE: u16      = 0x0002; // field, method, inner class
pub const ACC_PROTECTED: u16    = 0x0004; // field, method, inner class
pub const ACC_STATIC: u16       = 0x0008; // field, method, inner class
pub const ACC_FINAL: u16        = 0x0010; // class, field, method, inner class, parameter
pub const ACC_SUPER: u16        = 0x0020; // class
pub const ACC_SYNCHRONIZED: u16 = 0x0020; // method
pub const ACC_VOLATILE: u16     = 0x0040; // field
pub const ACC_BRIDGE: u16       = 0x0040; // method
pub const ACC_TRANSIENT: u16    = 0x0080; // field
pub const ACC_VARARGS: u16      = 0x0080; // method
pub const ACC_NATIVE: u16       = 0x0100; // method
pub const ACC_INTERFACE: u16    = 0x0200; // class, inner class
pub const ACC_ABSTRACT: u16     = 0x0400; // class, method, inner class
pub const ACC_STRICT: u16       = 0x0800; // method
pub const ACC_SYNTHETIC: u16    = 0x1000; // class, field, method, inner class, parameter
pub const ACC_ANNOTATION: u16   = 0x2000; // class, inner class
pub const ACC_ENUM: u16         = 0x4000; // class, field, inner class
pub const ACC_MODULE: u16       = 0x8000; // class
pub const ACC_MANDATED: u16     = 0x8000; // parameter

/// The kind of structure some access flags belong to. The same bit means different things for different kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessKind {
	Class,
	Field,
	Method,
	InnerClass,
	Parameter,
}

const CLASS: &[(u16, &str)] = &[
	(ACC_PUBLIC, "public"),
	(ACC_FINAL, "final"),
	(ACC_SUPER, "super"),
	(ACC_INTERFACE, "interface"),
	(ACC_ABSTRACT, "abstract"),
	(ACC_SYNTHETIC, "synthetic"),
	(ACC_ANNOTATION, "annotation"),
	(ACC_ENUM, "enum"),
	(ACC_MODULE, "module"),
];

const FIELD: &[(u16, &str)] = &[
	(ACC_PUBLIC, "public"),
	(ACC_PRIVATE, "private"),
	(ACC_PROTECTED, "protected"),
	(ACC_STATIC, "static"),
	(ACC_FINAL, "final"),
	(ACC_VOLATILE, "volatile"),
	(ACC_TRANSIENT, "transient"),
	(ACC_SYNTHETIC, "synthetic"),
	(ACC_ENUM, "enum"),
];

const METHOD: &[(u16, &str)] = &[
	(ACC_PUBLIC, "public"),
	(ACC_PRIVATE, "private"),
	(ACC_PROTECTED, "protected"),
	(ACC_STATIC, "static"),
	(ACC_FINAL, "final"),
	(ACC_SYNCHRONIZED, "synchronized"),
	(ACC_BRIDGE, "bridge"),
	(ACC_VARARGS, "varargs"),
	(ACC_NATIVE, "native"),
	(ACC_ABSTRACT, "abstract"),
	(ACC_STRICT, "strict"),
	(ACC_SYNTHETIC, "synthetic"),
];

const INNER_CLASS: &[(u16, &str)] = &[
	(ACC_PUBLIC, "public"),
	(ACC_PRIVATE, "private"),
	(ACC_PROTECTED, "protected"),
	(ACC_STATIC, "static"),
	(ACC_FINAL, "final"),
	(ACC_INTERFACE, "interface"),
	(ACC_ABSTRACT, "abstract"),
	(ACC_SYNTHETIC, "synthetic"),
	(ACC_ANNOTATION, "annotation"),
	(ACC_ENUM, "enum"),
];

const PARAMETER: &[(u16, &str)] = &[
	(ACC_FINAL, "final"),
	(ACC_SYNTHETIC, "synthetic"),
	(ACC_MANDATED, "mandated"),
];

impl AccessKind {
	/// The `(bit, name)` pairs for this kind, in the order they get printed.
	pub fn table(self) -> &'static [(u16, &'static str)] {
		match self {
			AccessKind::Class => CLASS,
			AccessKind::Field => FIELD,
			AccessKind::Method => METHOD,
			AccessKind::InnerClass => INNER_CLASS,
			AccessKind::Parameter => PARAMETER,
		}
	}
}

/// Turns access flags into space separated words, like `public final super`.
///
/// Bits that have no meaning for the given kind are printed in hex at the end.
pub fn describe(flags: u16, kind: AccessKind) -> String {
	let mut words = Vec::new();
	let mut known = 0;
	for &(bit, name) in kind.table() {
		if flags & bit != 0 {
			words.push(name.to_owned());
		}
		known |= bit;
	}
	let unknown = flags & !known;
	if unknown != 0 {
		words.push(hex_u16(unknown));
	}
	words.join(" ")
}

/// Both the hex value and the words, like `0x0021 (public super)`.
pub fn describe_with_hex(flags: u16, kind: AccessKind) -> String {
	format!("{} ({})", hex_u16(flags), describe(flags, kind))
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::{AccessKind, describe, describe_with_hex};

	#[test]
	fn same_bit_different_kind() {
		assert_eq!(describe(0x0021, AccessKind::Class), "public super");
		assert_eq!(describe(0x0021, AccessKind::Method), "public synchronized");
		assert_eq!(describe(0x0048, AccessKind::Field), "static volatile");
		assert_eq!(describe(0x0048, AccessKind::Method), "static bridge");
	}

	#[test]
	fn unknown_bits() {
		assert_eq!(describe(0x0101, AccessKind::Field), "public 0x0100");
		assert_eq!(describe(0, AccessKind::Class), "");
	}

	#[test]
	fn with_hex() {
		assert_eq!(describe_with_hex(0x0609, AccessKind::InnerClass), "0x0609 (public static interface abstract)");
	}
}
