//! Generation errors.

use std::fmt;

use sapigen_core::ModelError;

/// Why a type has no marshalling strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// The primitive kind has no entry in the wrapper table.
    NoRegisteredWrapper,
    /// `void` used where a value is required.
    VoidValue,
    /// Arrays are never passed by value.
    Array,
    /// Function types and function pointers.
    Function,
    /// Structs and unions by value.
    RecordByValue,
    /// A typedef whose declarator cannot be written back as C.
    Declarator,
    /// The type does not resolve in the model.
    Unresolved(ModelError),
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedReason::NoRegisteredWrapper => {
                f.write_str("no registered wrapper for this primitive kind")
            }
            UnsupportedReason::VoidValue => f.write_str("void is only valid as a return type"),
            UnsupportedReason::Array => f.write_str("arrays cannot be marshalled by value"),
            UnsupportedReason::Function => f.write_str("function types are not supported"),
            UnsupportedReason::RecordByValue => {
                f.write_str("structs and unions can only be passed by pointer")
            }
            UnsupportedReason::Declarator => f.write_str("declarator too complex to emit"),
            UnsupportedReason::Unresolved(err) => write!(f, "{err}"),
        }
    }
}

/// A type the wrapper mapping cannot handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported type `{ty}`: {reason}")]
pub struct UnsupportedTypeError {
    /// Display spelling of the offending type.
    pub ty: String,
    pub reason: UnsupportedReason,
}

impl UnsupportedTypeError {
    pub fn new(ty: impl fmt::Display, reason: UnsupportedReason) -> Self {
        Self {
            ty: ty.to_string(),
            reason,
        }
    }
}

/// Errors that abort generation of a whole proxy class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// A function signature uses a type without a wrapper.
    #[error("function `{function}`: {source}")]
    UnsupportedType {
        function: String,
        source: UnsupportedTypeError,
    },

    /// A typedef that would be emitted cannot be written back.
    #[error("typedef `{alias}`: {source}")]
    UnsupportedTypedef {
        alias: String,
        source: UnsupportedTypeError,
    },

    /// The options name a function the model does not declare.
    #[error("unknown function `{name}` requested for the proxy class")]
    UnknownFunction { name: String },

    /// The options are unusable (empty class name, bad namespace, ...).
    #[error("invalid option {option}: {detail}")]
    InvalidOption { option: &'static str, detail: String },

    /// Invalid declaration model.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GenerateError>;
