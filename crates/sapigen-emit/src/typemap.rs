//! C type to `::sapi::v` wrapper mapping.
//!
//! Wrapper selection always works on the structurally resolved type
//! ([`DeclarationModel::resolve`]); the alias spelling a declaration used is
//! irrelevant here and only matters for display.

use std::fmt;

use sapigen_core::{DeclarationModel, Primitive, Resolved, Type};

use crate::error::{UnsupportedReason, UnsupportedTypeError};

/// Namespace of the sandbox value wrappers.
pub const SAPI_VARS: &str = "::sapi::v";

/// Table entry for a primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveWrapper {
    /// A named scalar wrapper, e.g. `Int`.
    Scalar(&'static str),
    /// `Reg<T>` parameterized by the exact C spelling.
    Reg,
}

/// Registered wrappers for C arithmetic kinds. Kinds absent from this table
/// are rejected, never mapped to a fallback.
pub const PRIMITIVE_WRAPPERS: &[(Primitive, PrimitiveWrapper)] = &[
    (Primitive::Bool, PrimitiveWrapper::Scalar("Bool")),
    (Primitive::UnsignedChar, PrimitiveWrapper::Scalar("UChar")),
    (Primitive::Char, PrimitiveWrapper::Scalar("Char")),
    (Primitive::SignedChar, PrimitiveWrapper::Scalar("SChar")),
    (Primitive::UnsignedShort, PrimitiveWrapper::Scalar("UShort")),
    (Primitive::Short, PrimitiveWrapper::Scalar("Short")),
    (Primitive::UnsignedInt, PrimitiveWrapper::Scalar("UInt")),
    (Primitive::Int, PrimitiveWrapper::Scalar("Int")),
    (Primitive::UnsignedLong, PrimitiveWrapper::Scalar("ULong")),
    (Primitive::Long, PrimitiveWrapper::Scalar("Long")),
    (Primitive::UnsignedLongLong, PrimitiveWrapper::Scalar("ULLong")),
    (Primitive::LongLong, PrimitiveWrapper::Scalar("LLong")),
    (Primitive::Float, PrimitiveWrapper::Reg),
    (Primitive::Double, PrimitiveWrapper::Reg),
    (Primitive::LongDouble, PrimitiveWrapper::Reg),
];

/// Look up the registered wrapper for a primitive kind.
pub fn registered_wrapper(kind: Primitive) -> Option<PrimitiveWrapper> {
    PRIMITIVE_WRAPPERS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, w)| *w)
}

/// A value-wrapper type from the sandbox library.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WrapperType {
    /// `::sapi::v::Int`, `::sapi::v::UChar`, ...
    Scalar(&'static str),
    /// `::sapi::v::Reg<double>`
    Reg(Primitive),
    /// `::sapi::v::IntBase<Enum>`, named after the declared enum.
    IntBase(String),
    /// `::sapi::v::Ptr`, always handled by pointer on the parameter side.
    Ptr,
    /// `::sapi::v::GenericPtr`, holds pointer return values.
    GenericPtr,
    /// `::sapi::v::Void`, the return sentinel of void functions.
    Void,
}

impl WrapperType {
    pub fn is_pointer(&self) -> bool {
        matches!(self, WrapperType::Ptr)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, WrapperType::Void)
    }
}

impl fmt::Display for WrapperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapperType::Scalar(name) => write!(f, "{SAPI_VARS}::{name}"),
            WrapperType::Reg(kind) => write!(f, "{SAPI_VARS}::Reg<{kind}>"),
            WrapperType::IntBase(name) => write!(f, "{SAPI_VARS}::IntBase<{name}>"),
            WrapperType::Ptr => write!(f, "{SAPI_VARS}::Ptr"),
            WrapperType::GenericPtr => write!(f, "{SAPI_VARS}::GenericPtr"),
            WrapperType::Void => write!(f, "{SAPI_VARS}::Void"),
        }
    }
}

/// Selects wrapper types for the types of one model.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'m> {
    model: &'m DeclarationModel,
}

impl<'m> TypeMapper<'m> {
    pub fn new(model: &'m DeclarationModel) -> Self {
        Self { model }
    }

    /// Wrapper holding a value of `ty`.
    ///
    /// `void` maps to the `Void` sentinel and every pointer to `Ptr`;
    /// [`parameter_wrapper`](Self::parameter_wrapper) and
    /// [`return_wrapper`](Self::return_wrapper) refine this per position.
    pub fn wrapper_type_for(&self, ty: &Type) -> Result<WrapperType, UnsupportedTypeError> {
        let resolved = self
            .model
            .resolve(ty)
            .map_err(|e| UnsupportedTypeError::new(ty, UnsupportedReason::Unresolved(e)))?;
        let unsupported = |reason: UnsupportedReason| -> Result<WrapperType, UnsupportedTypeError> {
            Err(UnsupportedTypeError::new(ty, reason))
        };

        match resolved {
            Resolved::Void => Ok(WrapperType::Void),
            Resolved::Primitive(kind) => match registered_wrapper(kind) {
                Some(PrimitiveWrapper::Scalar(name)) => Ok(WrapperType::Scalar(name)),
                Some(PrimitiveWrapper::Reg) => Ok(WrapperType::Reg(kind)),
                None => unsupported(UnsupportedReason::NoRegisteredWrapper),
            },
            Resolved::Pointer(pointee) => {
                if matches!(self.model.resolve(pointee), Ok(Resolved::Function(_))) {
                    return unsupported(UnsupportedReason::Function);
                }
                Ok(WrapperType::Ptr)
            }
            Resolved::Enum(decl) => Ok(WrapperType::IntBase(decl.name.clone())),
            Resolved::Record { .. } => unsupported(UnsupportedReason::RecordByValue),
            Resolved::Array(_) => unsupported(UnsupportedReason::Array),
            Resolved::Function(_) => unsupported(UnsupportedReason::Function),
        }
    }

    /// Wrapper for a parameter. `void` is not a value.
    pub fn parameter_wrapper(&self, ty: &Type) -> Result<WrapperType, UnsupportedTypeError> {
        match self.wrapper_type_for(ty)? {
            WrapperType::Void => Err(UnsupportedTypeError::new(ty, UnsupportedReason::VoidValue)),
            wrapper => Ok(wrapper),
        }
    }

    /// Wrapper for the `ret` local. Pointer results come back as a plain
    /// address in a `GenericPtr`.
    pub fn return_wrapper(&self, ty: &Type) -> Result<WrapperType, UnsupportedTypeError> {
        match self.wrapper_type_for(ty)? {
            WrapperType::Ptr => Ok(WrapperType::GenericPtr),
            wrapper => Ok(wrapper),
        }
    }
}
