//! Opcode constants, their mnemonics, and the addressing-mode family each of them belongs to.

/// How the operands following an opcode are laid out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Family {
	NoOperand,
	/// One byte, or two bytes after `wide` for the local variable instructions.
	ImmediateByte,
	/// `iinc`: a local variable index and a signed constant, one byte each, or two bytes each after `wide`.
	Increment,
	ImmediateShort,
	Branch,
	WideBranch,
	TableSwitch,
	LookupSwitch,
	InvokeInterface,
	InvokeDynamic,
	MultiANewArray,
}

macro_rules! opcodes {
	(
		$( $opcode:literal $name:ident $mnemonic:literal $family:ident, )*
	) => {
		$( pub const $name: u8 = $opcode; )*

		/// The mnemonic of an opcode, like `iconst_0`, or `None` if the byte is not an opcode.
		pub fn mnemonic(opcode: u8) -> Option<&'static str> {
			match opcode {
				$( $opcode => Some($mnemonic), )*
				_ => None,
			}
		}

		/// The family of an opcode, or `None` if the byte is not an opcode.
		pub fn family(opcode: u8) -> Option<Family> {
			match opcode {
				$( $opcode => Some(Family::$family), )*
				_ => None,
			}
		}

		/// All opcodes, in ascending order.
		pub const ALL: &[u8] = &[ $( $opcode, )* ];
	};
}

opcodes! {
	0x00 NOP "nop" NoOperand,
	0x01 ACONST_NULL "aconst_null" NoOperand,
	0x02 ICONST_M1 "iconst_m1" NoOperand,
	0x03 ICONST_0 "iconst_0" NoOperand,
	0x04 ICONST_1 "iconst_1" NoOperand,
	0x05 ICONST_2 "iconst_2" NoOperand,
	0x06 ICONST_3 "iconst_3" NoOperand,
	0x07 ICONST_4 "iconst_4" NoOperand,
	0x08 ICONST_5 "iconst_5" NoOperand,
	0x09 LCONST_0 "lconst_0" NoOperand,
	0x0a LCONST_1 "lconst_1" NoOperand,
	0x0b FCONST_0 "fconst_0" NoOperand,
	0x0c FCONST_1 "fconst_1" NoOperand,
	0x0d FCONST_2 "fconst_2" NoOperand,
	0x0e DCONST_0 "dconst_0" NoOperand,
	0x0f DCONST_1 "dconst_1" NoOperand,
	0x10 BIPUSH "bipush" ImmediateByte,
	0x11 SIPUSH "sipush" ImmediateShort,
	0x12 LDC "ldc" ImmediateByte,
	0x13 LDC_W "ldc_w" ImmediateShort,
	0x14 LDC2_W "ldc2_w" ImmediateShort,
	0x15 ILOAD "iload" ImmediateByte,
	0x16 LLOAD "lload" ImmediateByte,
	0x17 FLOAD "fload" ImmediateByte,
	0x18 DLOAD "dload" ImmediateByte,
	0x19 ALOAD "aload" ImmediateByte,
	0x1a ILOAD_0 "iload_0" NoOperand,
	0x1b ILOAD_1 "iload_1" NoOperand,
	0x1c ILOAD_2 "iload_2" NoOperand,
	0x1d ILOAD_3 "iload_3" NoOperand,
	0x1e LLOAD_0 "lload_0" NoOperand,
	0x1f LLOAD_1 "lload_1" NoOperand,
	0x20 LLOAD_2 "lload_2" NoOperand,
	0x21 LLOAD_3 "lload_3" NoOperand,
	0x22 FLOAD_0 "fload_0" NoOperand,
	0x23 FLOAD_1 "fload_1" NoOperand,
	0x24 FLOAD_2 "fload_2" NoOperand,
	0x25 FLOAD_3 "fload_3" NoOperand,
	0x26 DLOAD_0 "dload_0" NoOperand,
	0x27 DLOAD_1 "dload_1" NoOperand,
	0x28 DLOAD_2 "dload_2" NoOperand,
	0x29 DLOAD_3 "dload_3" NoOperand,
	0x2a ALOAD_0 "aload_0" NoOperand,
	0x2b ALOAD_1 "aload_1" NoOperand,
	0x2c ALOAD_2 "aload_2" NoOperand,
	0x2d ALOAD_3 "aload_3" NoOperand,
	0x2e IALOAD "iaload" NoOperand,
	0x2f LALOAD "laload" NoOperand,
	0x30 FALOAD "faload" NoOperand,
	0x31 DALOAD "daload" NoOperand,
	0x32 AALOAD "aaload" NoOperand,
	0x33 BALOAD "baload" NoOperand,
	0x34 CALOAD "caload" NoOperand,
	0x35 SALOAD "saload" NoOperand,
	0x36 ISTORE "istore" ImmediateByte,
	0x37 LSTORE "lstore" ImmediateByte,
	0x38 FSTORE "fstore" ImmediateByte,
	0x39 DSTORE "dstore" ImmediateByte,
	0x3a ASTORE "astore" ImmediateByte,
	0x3b ISTORE_0 "istore_0" NoOperand,
	0x3c ISTORE_1 "istore_1" NoOperand,
	0x3d ISTORE_2 "istore_2" NoOperand,
	0x3e ISTORE_3 "istore_3" NoOperand,
	0x3f LSTORE_0 "lstore_0" NoOperand,
	0x40 LSTORE_1 "lstore_1" NoOperand,
	0x41 LSTORE_2 "lstore_2" NoOperand,
	0x42 LSTORE_3 "lstore_3" NoOperand,
	0x43 FSTORE_0 "fstore_0" NoOperand,
	0x44 FSTORE_1 "fstore_1" NoOperand,
	0x45 FSTORE_2 "fstore_2" NoOperand,
	0x46 FSTORE_3 "fstore_3" NoOperand,
	0x47 DSTORE_0 "dstore_0" NoOperand,
	0x48 DSTORE_1 "dstore_1" NoOperand,
	0x49 DSTORE_2 "dstore_2" NoOperand,
	0x4a DSTORE_3 "dstore_3" NoOperand,
	0x4b ASTORE_0 "astore_0" NoOperand,
	0x4c ASTORE_1 "astore_1" NoOperand,
	0x4d ASTORE_2 "astore_2" NoOperand,
	0x4e ASTORE_3 "astore_3" NoOperand,
	0x4f IASTORE "iastore" NoOperand,
	0x50 LASTORE "lastore" NoOperand,
	0x51 FASTORE "fastore" NoOperand,
	0x52 DASTORE "dastore" NoOperand,
	0x53 AASTORE "aastore" NoOperand,
	0x54 BASTORE "bastore" NoOperand,
	0x55 CASTORE "castore" NoOperand,
	0x56 SASTORE "sastore" NoOperand,
	0x57 POP "pop" NoOperand,
	0x58 POP2 "pop2" NoOperand,
	0x59 DUP "dup" NoOperand,
	0x5a DUP_X1 "dup_x1" NoOperand,
	0x5b DUP_X2 "dup_x2" NoOperand,
	0x5c DUP2 "dup2" NoOperand,
	0x5d DUP2_X1 "dup2_x1" NoOperand,
	0x5e DUP2_X2 "dup2_x2" NoOperand,
	0x5f SWAP "swap" NoOperand,
	0x60 IADD "iadd" NoOperand,
	0x61 LADD "ladd" NoOperand,
	0x62 FADD "fadd" NoOperand,
	0x63 DADD "dadd" NoOperand,
	0x64 ISUB "isub" NoOperand,
	0x65 LSUB "lsub" NoOperand,
	0x66 FSUB "fsub" NoOperand,
	0x67 DSUB "dsub" NoOperand,
	0x68 IMUL "imul" NoOperand,
	0x69 LMUL "lmul" NoOperand,
	0x6a FMUL "fmul" NoOperand,
	0x6b DMUL "dmul" NoOperand,
	0x6c IDIV "idiv" NoOperand,
	0x6d LDIV "ldiv" NoOperand,
	0x6e FDIV "fdiv" NoOperand,
	0x6f DDIV "ddiv" NoOperand,
	0x70 IREM "irem" NoOperand,
	0x71 LREM "lrem" NoOperand,
	0x72 FREM "frem" NoOperand,
	0x73 DREM "drem" NoOperand,
	0x74 INEG "ineg" NoOperand,
	0x75 LNEG "lneg" NoOperand,
	0x76 FNEG "fneg" NoOperand,
	0x77 DNEG "dneg" NoOperand,
	0x78 ISHL "ishl" NoOperand,
	0x79 LSHL "lshl" NoOperand,
	0x7a ISHR "ishr" NoOperand,
	0x7b LSHR "lshr" NoOperand,
	0x7c IUSHR "iushr" NoOperand,
	0x7d LUSHR "lushr" NoOperand,
	0x7e IAND "iand" NoOperand,
	0x7f LAND "land" NoOperand,
	0x80 IOR "ior" NoOperand,
	0x81 LOR "lor" NoOperand,
	0x82 IXOR "ixor" NoOperand,
	0x83 LXOR "lxor" NoOperand,
	0x84 IINC "iinc" Increment,
	0x85 I2L "i2l" NoOperand,
	0x86 I2F "i2f" NoOperand,
	0x87 I2D "i2d" NoOperand,
	0x88 L2I "l2i" NoOperand,
	0x89 L2F "l2f" NoOperand,
	0x8a L2D "l2d" NoOperand,
	0x8b F2I "f2i" NoOperand,
	0x8c F2L "f2l" NoOperand,
	0x8d F2D "f2d" NoOperand,
	0x8e D2I "d2i" NoOperand,
	0x8f D2L "d2l" NoOperand,
	0x90 D2F "d2f" NoOperand,
	0x91 I2B "i2b" NoOperand,
	0x92 I2C "i2c" NoOperand,
	0x93 I2S "i2s" NoOperand,
	0x94 LCMP "lcmp" NoOperand,
	0x95 FCMPL "fcmpl" NoOperand,
	0x96 FCMPG "fcmpg" NoOperand,
	0x97 DCMPL "dcmpl" NoOperand,
	0x98 DCMPG "dcmpg" NoOperand,
	0x99 IFEQ "ifeq" Branch,
	0x9a IFNE "ifne" Branch,
	0x9b IFLT "iflt" Branch,
	0x9c IFGE "ifge" Branch,
	0x9d IFGT "ifgt" Branch,
	0x9e IFLE "ifle" Branch,
	0x9f IF_ICMPEQ "if_icmpeq" Branch,
	0xa0 IF_ICMPNE "if_icmpne" Branch,
	0xa1 IF_ICMPLT "if_icmplt" Branch,
	0xa2 IF_ICMPGE "if_icmpge" Branch,
	0xa3 IF_ICMPGT "if_icmpgt" Branch,
	0xa4 IF_ICMPLE "if_icmple" Branch,
	0xa5 IF_ACMPEQ "if_acmpeq" Branch,
	0xa6 IF_ACMPNE "if_acmpne" Branch,
	0xa7 GOTO "goto" Branch,
	0xa8 JSR "jsr" Branch,
	0xa9 RET "ret" ImmediateByte,
	0xaa TABLESWITCH "tableswitch" TableSwitch,
	0xab LOOKUPSWITCH "lookupswitch" LookupSwitch,
	0xac IRETURN "ireturn" NoOperand,
	0xad LRETURN "lreturn" NoOperand,
	0xae FRETURN "freturn" NoOperand,
	0xaf DRETURN "dreturn" NoOperand,
	0xb0 ARETURN "areturn" NoOperand,
	0xb1 RETURN "return" NoOperand,
	0xb2 GETSTATIC "getstatic" ImmediateShort,
	0xb3 PUTSTATIC "putstatic" ImmediateShort,
	0xb4 GETFIELD "getfield" ImmediateShort,
	0xb5 PUTFIELD "putfield" ImmediateShort,
	0xb6 INVOKEVIRTUAL "invokevirtual" ImmediateShort,
	0xb7 INVOKESPECIAL "invokespecial" ImmediateShort,
	0xb8 INVOKESTATIC "invokestatic" ImmediateShort,
	0xb9 INVOKEINTERFACE "invokeinterface" InvokeInterface,
	0xba INVOKEDYNAMIC "invokedynamic" InvokeDynamic,
	0xbb NEW "new" ImmediateShort,
	0xbc NEWARRAY "newarray" ImmediateByte,
	0xbd ANEWARRAY "anewarray" ImmediateShort,
	0xbe ARRAYLENGTH "arraylength" NoOperand,
	0xbf ATHROW "athrow" NoOperand,
	0xc0 CHECKCAST "checkcast" ImmediateShort,
	0xc1 INSTANCEOF "instanceof" ImmediateShort,
	0xc2 MONITORENTER "monitorenter" NoOperand,
	0xc3 MONITOREXIT "monitorexit" NoOperand,
	0xc4 WIDE "wide" NoOperand,
	0xc5 MULTIANEWARRAY "multianewarray" MultiANewArray,
	0xc6 IFNULL "ifnull" Branch,
	0xc7 IFNONNULL "ifnonnull" Branch,
	0xc8 GOTO_W "goto_w" WideBranch,
	0xc9 JSR_W "jsr_w" WideBranch,
	0xca BREAKPOINT "breakpoint" NoOperand,
	0xfe IMPDEP1 "impdep1" NoOperand,
	0xff IMPDEP2 "impdep2" NoOperand,
}

/// Whether a `wide` in front of this opcode widens its operands.
pub fn is_widenable(opcode: u8) -> bool {
	matches!(opcode, ILOAD..=ALOAD | ISTORE..=ASTORE | RET | IINC)
}

/// Whether the operand of this opcode is a constant pool index.
pub fn references_constant_pool(opcode: u8) -> bool {
	match family(opcode) {
		Some(Family::ImmediateShort) => opcode != SIPUSH,
		Some(Family::ImmediateByte) => opcode == LDC,
		Some(Family::InvokeInterface | Family::InvokeDynamic | Family::MultiANewArray) => true,
		_ => false,
	}
}

/// The element type name of a `newarray` operand.
pub fn array_type_name(atype: u8) -> Option<&'static str> {
	Some(match atype {
		4 => "boolean",
		5 => "char",
		6 => "float",
		7 => "double",
		8 => "byte",
		9 => "short",
		10 => "int",
		11 => "long",
		_ => return None,
	})
}
