//! Reading and writing of JVM class files.
//!
//! [`ClassFile::from_bytes`] parses a class file into a model of its constant pool, members and attributes, and
//! [`ClassFile::to_bytes`] writes it back. Without edits in between, the bytes written are the bytes read.
//!
//! ```no_run
//! use class_codec::{ClassFile, Options};
//!
//! # fn main() -> class_codec::Result<()> {
//! let bytes = std::fs::read("Main.class")?;
//! let class = ClassFile::from_bytes(&bytes, &Options::default())?;
//! if let Some(code) = class.find_method("main", "([Ljava/lang/String;)V").and_then(|method| method.code()) {
//! 	for instruction in code.instructions()? {
//! 		println!("{instruction}");
//! 	}
//! }
//! assert_eq!(class.to_bytes()?, bytes);
//! # Ok(())
//! # }
//! ```

mod macros;

pub mod access;
pub mod attribute;
pub mod class_file;
pub mod error;
pub mod instruction;
pub mod io;
pub mod member;
pub mod opcode;
pub mod pool;

pub use attribute::code::Code;
pub use attribute::{Attribute, AttributeInfo, AttributeKind};
pub use class_file::ClassFile;
pub use error::{Error, Result};
pub use instruction::{Instruction, Operands};
pub use io::{Context, Options, Structure};
pub use member::{ClassMember, MemberKind};
pub use pool::{ConstantPool, CpInfo};
