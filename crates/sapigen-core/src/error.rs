//! Model validation errors.

/// Reasons a declaration model is structurally invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Two functions share a name.
    #[error("duplicate function `{name}`")]
    DuplicateFunction { name: String },

    /// Two typedefs/enums share a name.
    #[error("duplicate type declaration `{name}`")]
    DuplicateType { name: String },

    /// An enumerator has no explicit value.
    #[error("enum `{enum_name}`: member `{member}` has no explicit value")]
    MissingEnumValue { enum_name: String, member: String },

    /// An enumerator name appears twice in one enum.
    #[error("enum `{enum_name}`: duplicate member `{member}`")]
    DuplicateEnumMember { enum_name: String, member: String },

    /// A named type does not refer to any typedef or enum of the model.
    #[error("unknown type `{name}` referenced by {referrer}")]
    UnknownType { name: String, referrer: String },

    /// A typedef resolves to itself.
    #[error("typedef cycle: {chain}")]
    TypedefCycle { chain: String },

    /// A typedef mentions a type declared after it, or itself.
    #[error("typedef `{alias}` uses `{name}` before it is declared")]
    ForwardReference { alias: String, name: String },

    /// A name that cannot appear in generated C++.
    #[error("{referrer}: `{name}` {reason}")]
    InvalidIdentifier {
        name: String,
        referrer: String,
        reason: &'static str,
    },

    /// A parameter would produce an identifier that clashes in the
    /// generated method.
    #[error("function `{function}`: parameter identifier `{name}` collides in generated code")]
    ParameterCollision { function: String, name: String },
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
