/// Declares a fixed-layout record made only of `u8`, `u16` and `u32` items, together with its [`Structure`]
/// implementation. Items are read and written in declaration order.
///
/// [`Structure`]: crate::io::Structure
macro_rules! structure {
	// rules used for reading
	(read, $r:ident, u8) => { $crate::io::ClassRead::read_u8($r)? };
	(read, $r:ident, u16) => { $crate::io::ClassRead::read_u16($r)? };
	(read, $r:ident, u32) => { $crate::io::ClassRead::read_u32($r)? };
	// rules used for writing
	(write, $w:ident, $v:expr, u8) => { $crate::io::ClassWrite::write_u8($w, $v)?; };
	(write, $w:ident, $v:expr, u16) => { $crate::io::ClassWrite::write_u16($w, $v)?; };
	(write, $w:ident, $v:expr, u32) => { $crate::io::ClassWrite::write_u32($w, $v)?; };
	// rule actually used in the definition of things
	(
		$( #[$doc:meta] )*
		struct $n:ident {
			$(
				$( #[$item_doc:meta] )*
				$i:ident: $it:ident,
			)*
		}
	) => {
		$( #[$doc] )*
		#[derive(Debug, Clone, PartialEq, Eq, Hash)]
		pub struct $n {
			$(
				$( #[$item_doc] )*
				pub $i: $it,
			)*
		}

		impl $crate::io::Structure for $n {
			fn read(reader: &mut impl $crate::io::ClassRead, cx: &$crate::io::Context) -> $crate::error::Result<$n> {
				cx.trace("read", stringify!($n));
				$( let $i = $crate::macros::structure!(read, reader, $it); )*
				Ok($n {
					$( $i, )*
				})
			}

			fn write(&self, writer: &mut impl $crate::io::ClassWrite, cx: &$crate::io::Context) -> $crate::error::Result<()> {
				cx.trace("write", stringify!($n));
				$( $crate::macros::structure!(write, writer, self.$i, $it); )*
				Ok(())
			}
		}
	};
}

pub(crate) use structure;
