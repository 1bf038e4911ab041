//! Tagged value representation for the dispatch boundary
//!
//! Arguments and results cross the bridge as a small C-compatible tagged
//! union. Primitives (null, bool, i32, i64, f64) are stored inline; anything
//! heap-shaped crosses as an opaque pointer whose ownership stays on the
//! native side. The bridge never inspects pointer payloads.

/// Tagged value crossing the dispatch boundary.
///
/// # Thread Safety
///
/// `NativeValue` is `Send + Sync`. It is a plain bit pattern; the pointer
/// variant is an inert token the bridge forwards without dereferencing.
///
/// # Memory Management
///
/// - Primitive values (null, bool, i32, i64, f64) are stored inline
/// - Pointer values are owned and freed by the native side
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NativeValue {
    tag: u8,
    data: u64,
}

// Value type tags (stable across the C ABI)
const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_I32: u8 = 2;
const TAG_I64: u8 = 3;
const TAG_F64: u8 = 4;
const TAG_PTR: u8 = 5;

unsafe impl Send for NativeValue {}
unsafe impl Sync for NativeValue {}

impl NativeValue {
    /// Create a null value
    pub const fn null() -> Self {
        NativeValue {
            tag: TAG_NULL,
            data: 0,
        }
    }

    /// Create a boolean value
    pub const fn bool(b: bool) -> Self {
        NativeValue {
            tag: TAG_BOOL,
            data: b as u64,
        }
    }

    /// Create a 32-bit integer value
    pub const fn i32(i: i32) -> Self {
        NativeValue {
            tag: TAG_I32,
            data: i as u64,
        }
    }

    /// Create a 64-bit integer value
    pub const fn i64(i: i64) -> Self {
        NativeValue {
            tag: TAG_I64,
            data: i as u64,
        }
    }

    /// Create a 64-bit float value
    pub fn f64(f: f64) -> Self {
        NativeValue {
            tag: TAG_F64,
            data: f.to_bits(),
        }
    }

    /// Create from an opaque pointer.
    ///
    /// # Safety
    /// The pointer must stay valid (and owned by the native side) for as
    /// long as any copy of this value is live.
    pub unsafe fn from_ptr(ptr: *mut ()) -> Self {
        NativeValue {
            tag: TAG_PTR,
            data: ptr as u64,
        }
    }

    /// Check if this is a null value
    pub const fn is_null(&self) -> bool {
        self.tag == TAG_NULL
    }

    /// Get as boolean if this is a bool
    pub const fn as_bool(&self) -> Option<bool> {
        if self.tag == TAG_BOOL {
            Some(self.data != 0)
        } else {
            None
        }
    }

    /// Get as i32 if this is an i32
    pub const fn as_i32(&self) -> Option<i32> {
        if self.tag == TAG_I32 {
            Some(self.data as i32)
        } else {
            None
        }
    }

    /// Get as i64 if this is an i64
    pub const fn as_i64(&self) -> Option<i64> {
        if self.tag == TAG_I64 {
            Some(self.data as i64)
        } else {
            None
        }
    }

    /// Get as f64 if this is an f64
    pub fn as_f64(&self) -> Option<f64> {
        if self.tag == TAG_F64 {
            Some(f64::from_bits(self.data))
        } else {
            None
        }
    }

    /// Get as opaque pointer if this is a pointer value.
    ///
    /// # Safety
    /// The returned pointer is only meaningful to the native side that
    /// created it; dereferencing it is subject to that side's rules.
    pub unsafe fn as_ptr(&self) -> Option<*mut ()> {
        if self.tag == TAG_PTR {
            Some(self.data as *mut ())
        } else {
            None
        }
    }

    /// Get the raw type tag
    pub const fn tag(&self) -> u8 {
        self.tag
    }

    /// Check whether this value's runtime type satisfies a declared type.
    ///
    /// Null satisfies `Ptr` (a nullable reference). Nothing is checked for
    /// `Void` since void results are discarded before any check.
    pub const fn conforms_to(&self, declared: TypeTag) -> bool {
        match declared {
            TypeTag::Void => true,
            TypeTag::Bool => self.tag == TAG_BOOL,
            TypeTag::I32 => self.tag == TAG_I32,
            TypeTag::I64 => self.tag == TAG_I64,
            TypeTag::F64 => self.tag == TAG_F64,
            TypeTag::Ptr => self.tag == TAG_PTR || self.tag == TAG_NULL,
        }
    }

    /// Get type name for diagnostics
    pub const fn type_name(&self) -> &'static str {
        match self.tag {
            TAG_NULL => "null",
            TAG_BOOL => "bool",
            TAG_I32 => "i32",
            TAG_I64 => "i64",
            TAG_F64 => "f64",
            TAG_PTR => "ptr",
            _ => "unknown",
        }
    }
}

impl Default for NativeValue {
    fn default() -> Self {
        Self::null()
    }
}

impl std::fmt::Debug for NativeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tag {
            TAG_NULL => write!(f, "NativeValue::Null"),
            TAG_BOOL => write!(f, "NativeValue::Bool({})", self.data != 0),
            TAG_I32 => write!(f, "NativeValue::I32({})", self.data as i32),
            TAG_I64 => write!(f, "NativeValue::I64({})", self.data as i64),
            TAG_F64 => write!(f, "NativeValue::F64({})", f64::from_bits(self.data)),
            TAG_PTR => write!(f, "NativeValue::Ptr({:#x})", self.data),
            _ => write!(f, "NativeValue::Unknown(tag={}, data={})", self.tag, self.data),
        }
    }
}

/// Declared parameter and return types in a [`MethodDescriptor`].
///
/// Mirrors the [`NativeValue`] tags, plus `Void` for methods that return
/// nothing. The discriminants are stable across the C ABI.
///
/// [`MethodDescriptor`]: crate::MethodDescriptor
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    /// No return value; any native result is discarded
    Void = 0,
    /// Boolean
    Bool = 1,
    /// 32-bit signed integer
    I32 = 2,
    /// 64-bit signed integer
    I64 = 3,
    /// 64-bit float
    F64 = 4,
    /// Opaque native-owned pointer (nullable)
    Ptr = 5,
}

impl TypeTag {
    /// Get type name for diagnostics and signature rendering
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Void => "void",
            TypeTag::Bool => "bool",
            TypeTag::I32 => "i32",
            TypeTag::I64 => "i64",
            TypeTag::F64 => "f64",
            TypeTag::Ptr => "ptr",
        }
    }

    /// Decode from a raw discriminant (as seen on the C ABI)
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(TypeTag::Void),
            1 => Some(TypeTag::Bool),
            2 => Some(TypeTag::I32),
            3 => Some(TypeTag::I64),
            4 => Some(TypeTag::F64),
            5 => Some(TypeTag::Ptr),
            _ => None,
        }
    }
}
