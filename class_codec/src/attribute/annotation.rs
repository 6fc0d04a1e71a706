//! Annotations and their recursive element values.

use crate::error::{bail_invalid, Result};
use crate::io::{read_structures, write_structures, ClassRead, ClassWrite, Context, Structure};
use crate::pool::{display_utf8, ConstantPool};

/// Element values can nest arbitrarily through arrays and annotations. Bound the nesting so that malformed input
/// can't exhaust the stack.
const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
	pub type_index: u16,
	pub element_value_pairs: Vec<ElementValuePair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementValuePair {
	pub element_name_index: u16,
	pub value: ElementValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementValue {
	/// A constant, with the tag one of `B`, `C`, `D`, `F`, `I`, `J`, `S`, `Z` or `s`.
	Const { tag: u8, const_value_index: u16 },
	Enum { type_name_index: u16, const_name_index: u16 },
	Class { class_info_index: u16 },
	Annotation(Annotation),
	Array(Vec<ElementValue>),
}

const CONST_TAGS: &[u8] = b"BCDFIJSZs";

impl Annotation {
	fn read_nested(reader: &mut impl ClassRead, cx: &Context, depth: usize) -> Result<Annotation> {
		cx.trace("read", "Annotation");
		let type_index = reader.read_u16()?;
		let element_value_pairs = read_pairs(reader, cx, depth)?;
		Ok(Annotation { type_index, element_value_pairs })
	}

	/// Something like `@Ljava/lang/Deprecated;(since="9")`.
	pub fn describe(&self, pool: &ConstantPool) -> Result<String> {
		let mut string = format!("@{}", display_utf8(pool.get_utf8(self.type_index)?));
		if !self.element_value_pairs.is_empty() {
			let pairs = describe_pairs(&self.element_value_pairs, pool)?;
			string.push('(');
			string.push_str(&pairs);
			string.push(')');
		}
		Ok(string)
	}
}

impl Structure for Annotation {
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<Annotation> {
		Annotation::read_nested(reader, cx, 0)
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		cx.trace("write", "Annotation");
		writer.write_u16(self.type_index)?;
		write_pairs(writer, &self.element_value_pairs, cx)
	}
}

pub(crate) fn read_pairs(reader: &mut impl ClassRead, cx: &Context, depth: usize) -> Result<Vec<ElementValuePair>> {
	reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| Ok(ElementValuePair {
			element_name_index: r.read_u16()?,
			value: ElementValue::read_nested(r, cx, depth)?,
		}),
	)
}

pub(crate) fn write_pairs(writer: &mut impl ClassWrite, pairs: &[ElementValuePair], cx: &Context) -> Result<()> {
	writer.write_slice(
		pairs,
		|w, size| w.write_usize_as_u16(size),
		|w, pair| {
			w.write_u16(pair.element_name_index)?;
			pair.value.write(w, cx)
		},
	)
}

pub(crate) fn describe_pairs(pairs: &[ElementValuePair], pool: &ConstantPool) -> Result<String> {
	let pairs = pairs.iter()
		.map(|pair| Ok(format!(
			"{}={}",
			display_utf8(pool.get_utf8(pair.element_name_index)?),
			pair.value.describe(pool)?,
		)))
		.collect::<Result<Vec<_>>>()?;
	Ok(pairs.join(", "))
}

impl ElementValue {
	pub fn tag(&self) -> u8 {
		match self {
			ElementValue::Const { tag, .. } => *tag,
			ElementValue::Enum { .. } => b'e',
			ElementValue::Class { .. } => b'c',
			ElementValue::Annotation(_) => b'@',
			ElementValue::Array(_) => b'[',
		}
	}

	fn read_nested(reader: &mut impl ClassRead, cx: &Context, depth: usize) -> Result<ElementValue> {
		if depth >= MAX_NESTING {
			bail_invalid!("element values nested deeper than {MAX_NESTING} levels");
		}
		let tag = reader.read_u8()?;
		cx.trace("read", "ElementValue");
		Ok(match tag {
			tag if CONST_TAGS.contains(&tag) => ElementValue::Const { tag, const_value_index: reader.read_u16()? },
			b'e' => ElementValue::Enum { type_name_index: reader.read_u16()?, const_name_index: reader.read_u16()? },
			b'c' => ElementValue::Class { class_info_index: reader.read_u16()? },
			b'@' => ElementValue::Annotation(Annotation::read_nested(reader, cx, depth + 1)?),
			b'[' => ElementValue::Array(reader.read_vec(
				|r| r.read_u16_as_usize(),
				|r| ElementValue::read_nested(r, cx, depth + 1),
			)?),
			tag => bail_invalid!("unexpected element value tag {tag:?}", tag = tag as char),
		})
	}

	pub fn describe(&self, pool: &ConstantPool) -> Result<String> {
		Ok(match self {
			&ElementValue::Const { tag: b's', const_value_index } => {
				format!("{:?}", display_utf8(pool.get_utf8(const_value_index)?))
			},
			&ElementValue::Const { const_value_index, .. } => pool.describe(const_value_index)?,
			&ElementValue::Enum { type_name_index, const_name_index } => format!(
				"{}.{}",
				display_utf8(pool.get_utf8(type_name_index)?),
				display_utf8(pool.get_utf8(const_name_index)?),
			),
			&ElementValue::Class { class_info_index } => format!("{}.class", display_utf8(pool.get_utf8(class_info_index)?)),
			ElementValue::Annotation(annotation) => annotation.describe(pool)?,
			ElementValue::Array(values) => {
				let values = values.iter()
					.map(|value| value.describe(pool))
					.collect::<Result<Vec<_>>>()?;
				format!("{{{}}}", values.join(", "))
			},
		})
	}
}

impl Structure for ElementValue {
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<ElementValue> {
		ElementValue::read_nested(reader, cx, 0)
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		cx.trace("write", "ElementValue");
		writer.write_u8(self.tag())?;
		match self {
			ElementValue::Const { tag, const_value_index } => {
				if !CONST_TAGS.contains(tag) {
					bail_invalid!("{:?} is not a tag of a constant element value", *tag as char);
				}
				writer.write_u16(*const_value_index)?;
			},
			&ElementValue::Enum { type_name_index, const_name_index } => {
				writer.write_u16(type_name_index)?;
				writer.write_u16(const_name_index)?;
			},
			&ElementValue::Class { class_info_index } => writer.write_u16(class_info_index)?,
			ElementValue::Annotation(annotation) => annotation.write(writer, cx)?,
			ElementValue::Array(values) => write_structures(writer, values, cx)?,
		}
		Ok(())
	}
}

/// The annotations of one parameter, as found in `Runtime*ParameterAnnotations`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterAnnotations {
	pub annotations: Vec<Annotation>,
}

impl Structure for ParameterAnnotations {
	fn read(reader: &mut impl ClassRead, cx: &Context) -> Result<ParameterAnnotations> {
		Ok(ParameterAnnotations { annotations: read_structures(reader, cx)? })
	}

	fn write(&self, writer: &mut impl ClassWrite, cx: &Context) -> Result<()> {
		write_structures(writer, &self.annotations, cx)
	}
}
