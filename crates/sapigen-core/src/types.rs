//! The C type universe seen by the generator.
//!
//! A [`Type`] is exactly what the declaration spelled: typedef names stay
//! [`Type::Named`], qualifiers stay [`Type::Const`]. Its `Display` impl is the
//! *display spelling* used in signature comments, method parameter lists and
//! typedef emission. Structural resolution (what the spelling means) lives in
//! [`crate::model::DeclarationModel::resolve`] and never rewrites a `Type`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// C arithmetic kinds a frontend can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Primitive {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "char")]
    Char,
    #[serde(rename = "signed char")]
    SignedChar,
    #[serde(rename = "unsigned char")]
    UnsignedChar,
    #[serde(rename = "short")]
    Short,
    #[serde(rename = "unsigned short")]
    UnsignedShort,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "unsigned int")]
    UnsignedInt,
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "unsigned long")]
    UnsignedLong,
    #[serde(rename = "long long")]
    LongLong,
    #[serde(rename = "unsigned long long")]
    UnsignedLongLong,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "long double")]
    LongDouble,
    #[serde(rename = "wchar_t")]
    WChar,
    #[serde(rename = "char16_t")]
    Char16,
    #[serde(rename = "char32_t")]
    Char32,
    #[serde(rename = "__int128")]
    Int128,
    #[serde(rename = "unsigned __int128")]
    UnsignedInt128,
}

impl Primitive {
    /// Every kind, in declaration order.
    pub const ALL: [Primitive; 20] = [
        Primitive::Bool,
        Primitive::Char,
        Primitive::SignedChar,
        Primitive::UnsignedChar,
        Primitive::Short,
        Primitive::UnsignedShort,
        Primitive::Int,
        Primitive::UnsignedInt,
        Primitive::Long,
        Primitive::UnsignedLong,
        Primitive::LongLong,
        Primitive::UnsignedLongLong,
        Primitive::Float,
        Primitive::Double,
        Primitive::LongDouble,
        Primitive::WChar,
        Primitive::Char16,
        Primitive::Char32,
        Primitive::Int128,
        Primitive::UnsignedInt128,
    ];

    /// The C spelling of this kind.
    pub fn c_name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::SignedChar => "signed char",
            Primitive::UnsignedChar => "unsigned char",
            Primitive::Short => "short",
            Primitive::UnsignedShort => "unsigned short",
            Primitive::Int => "int",
            Primitive::UnsignedInt => "unsigned int",
            Primitive::Long => "long",
            Primitive::UnsignedLong => "unsigned long",
            Primitive::LongLong => "long long",
            Primitive::UnsignedLongLong => "unsigned long long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::LongDouble => "long double",
            Primitive::WChar => "wchar_t",
            Primitive::Char16 => "char16_t",
            Primitive::Char32 => "char32_t",
            Primitive::Int128 => "__int128",
            Primitive::UnsignedInt128 => "unsigned __int128",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_name())
    }
}

/// Tag keyword of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Struct,
    Union,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Struct => f.write_str("struct"),
            RecordKind::Union => f.write_str("union"),
        }
    }
}

/// A C type as spelled in a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Void,
    Primitive(Primitive),
    /// Pointer to another type.
    Pointer(Box<Type>),
    /// Const-qualified type.
    Const(Box<Type>),
    /// Reference to a typedef or enum declared in the model.
    Named(String),
    /// Struct or union referenced by tag.
    Record { kind: RecordKind, name: String },
    /// Array with an optional fixed length.
    Array {
        element: Box<Type>,
        #[serde(default)]
        length: Option<u64>,
    },
    /// Function type (reachable through function pointers).
    Function { result: Box<Type>, params: Vec<Type> },
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(name.into())
    }

    pub fn pointer_to(inner: Type) -> Self {
        Type::Pointer(Box::new(inner))
    }

    pub fn const_of(inner: Type) -> Self {
        Type::Const(Box::new(inner))
    }

    /// Whether this type is exactly `void` (qualifiers ignored).
    pub fn is_void(&self) -> bool {
        matches!(self.strip_const(), Type::Void)
    }

    /// Strip const qualifiers from the outer level.
    pub fn strip_const(&self) -> &Type {
        match self {
            Type::Const(inner) => inner.strip_const(),
            other => other,
        }
    }

    /// Names of the typedefs and enums this spelling mentions directly.
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Type::Named(name) => out.push(name),
            Type::Pointer(inner) | Type::Const(inner) => inner.collect_names(out),
            Type::Array { element, .. } => element.collect_names(out),
            Type::Function { result, params } => {
                result.collect_names(out);
                for param in params {
                    param.collect_names(out);
                }
            }
            Type::Void | Type::Primitive(_) | Type::Record { .. } => {}
        }
    }
}

impl From<Primitive> for Type {
    fn from(kind: Primitive) -> Self {
        Type::Primitive(kind)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Primitive(kind) => write!(f, "{kind}"),
            // `char *`, but `char **` for nested pointers
            Type::Pointer(inner) => match inner.as_ref() {
                Type::Pointer(_) => write!(f, "{inner}*"),
                pointee @ (Type::Function { .. } | Type::Array { .. }) => {
                    write_abstract_pointer(f, pointee, "")
                }
                _ => write!(f, "{inner} *"),
            },
            Type::Const(inner) => match inner.as_ref() {
                Type::Pointer(pointee)
                    if matches!(pointee.as_ref(), Type::Function { .. } | Type::Array { .. }) =>
                {
                    write_abstract_pointer(f, pointee, " const")
                }
                Type::Pointer(_) => write!(f, "{inner} const"),
                _ => write!(f, "const {inner}"),
            },
            Type::Named(name) => f.write_str(name),
            Type::Record { kind, name } => write!(f, "{kind} {name}"),
            Type::Array { .. } => {
                let (element, dims) = split_array(self);
                write!(f, "{element}")?;
                write_dims(f, &dims)
            }
            Type::Function { result, params } => {
                write!(f, "{result} (")?;
                write_list(f, params)?;
                f.write_str(")")
            }
        }
    }
}

/// `R (*)(P...)` and `E (*)[n]`, with `qual` placed after the star.
fn write_abstract_pointer(f: &mut fmt::Formatter<'_>, pointee: &Type, qual: &str) -> fmt::Result {
    match pointee {
        Type::Function { result, params } => {
            write!(f, "{result} (*{qual})(")?;
            write_list(f, params)?;
            f.write_str(")")
        }
        Type::Array { .. } => {
            let (element, dims) = split_array(pointee);
            write!(f, "{element} (*{qual})")?;
            write_dims(f, &dims)
        }
        other => write!(f, "{other} *{qual}"),
    }
}

/// Innermost element type and the dimensions, outermost first.
fn split_array(ty: &Type) -> (&Type, Vec<Option<u64>>) {
    let mut dims = Vec::new();
    let mut current = ty;
    while let Type::Array { element, length } = current {
        dims.push(*length);
        current = element;
    }
    (current, dims)
}

fn write_dims(f: &mut fmt::Formatter<'_>, dims: &[Option<u64>]) -> fmt::Result {
    for dim in dims {
        match dim {
            Some(n) => write!(f, "[{n}]")?,
            None => f.write_str("[]")?,
        }
    }
    Ok(())
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}
