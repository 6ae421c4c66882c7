//! Declarations of one translation unit.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::types::Type;

/// A function parameter. The name is optional, as in C prototypes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }

    pub fn anonymous(ty: Type) -> Self {
        Self { name: None, ty }
    }

    /// Identifier used in generated code: the declared name, or `a<index>`
    /// for anonymous parameters.
    pub fn code_name(&self, index: usize) -> Cow<'_, str> {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => Cow::Borrowed(name),
            _ => Cow::Owned(format!("a{index}")),
        }
    }
}

/// A function declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(rename = "returns")]
    pub return_type: Type,
    #[serde(default)]
    pub params: Vec<Parameter>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, return_type: Type, params: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            return_type,
            params,
        }
    }

    /// Parameters paired with their code-generation identifiers.
    pub fn named_params(&self) -> impl Iterator<Item = (Cow<'_, str>, &Parameter)> {
        self.params
            .iter()
            .enumerate()
            .map(|(i, p)| (p.code_name(i), p))
    }
}

/// One enumerator. The value must be explicit; `None` is only accepted so
/// that an incomplete model can be rejected with a precise error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    #[serde(default)]
    pub value: Option<i64>,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }
}

/// An enum declaration with members in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    #[serde(default)]
    pub members: Vec<EnumMember>,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>, members: Vec<EnumMember>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }
}

/// `typedef <underlying> <alias>;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedefDecl {
    pub alias: String,
    pub underlying: Type,
}

impl TypedefDecl {
    pub fn new(alias: impl Into<String>, underlying: Type) -> Self {
        Self {
            alias: alias.into(),
            underlying,
        }
    }
}

/// A type-level declaration. Typedefs and enums share one ordered sequence
/// so their relative order survives into the generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDecl {
    Typedef(TypedefDecl),
    Enum(EnumDecl),
}

impl TypeDecl {
    /// The name this declaration introduces.
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Typedef(t) => &t.alias,
            TypeDecl::Enum(e) => &e.name,
        }
    }
}

impl From<TypedefDecl> for TypeDecl {
    fn from(decl: TypedefDecl) -> Self {
        TypeDecl::Typedef(decl)
    }
}

impl From<EnumDecl> for TypeDecl {
    fn from(decl: EnumDecl) -> Self {
        TypeDecl::Enum(decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Primitive;

    #[test]
    fn anonymous_parameters_get_positional_names() {
        let func = FunctionDecl::new(
            "types_1",
            Primitive::Int.into(),
            vec![
                Parameter::anonymous(Primitive::Bool.into()),
                Parameter::new("flag", Primitive::Char.into()),
                Parameter::anonymous(Primitive::Short.into()),
            ],
        );
        let names: Vec<String> = func.named_params().map(|(n, _)| n.into_owned()).collect();
        assert_eq!(names, vec!["a0", "flag", "a2"]);
    }

    #[test]
    fn empty_name_counts_as_anonymous() {
        let param = Parameter {
            name: Some(String::new()),
            ty: Primitive::Int.into(),
        };
        assert_eq!(param.code_name(3), "a3");
    }

    #[test]
    fn type_decl_name() {
        let td: TypeDecl = TypedefDecl::new("uint", Primitive::UnsignedInt.into()).into();
        assert_eq!(td.name(), "uint");
        let en: TypeDecl = EnumDecl::new("ProcessStatus", vec![EnumMember::new("OK", 0)]).into();
        assert_eq!(en.name(), "ProcessStatus");
    }
}
