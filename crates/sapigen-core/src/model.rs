//! The validated declaration model and its structural resolver.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::decl::{EnumDecl, FunctionDecl, TypeDecl, TypedefDecl};
use crate::error::{ModelError, Result};
use crate::ident::{identifier_problem, CLASS_MEMBERS};
use crate::types::{Primitive, RecordKind, Type};

/// Identifiers every generated method already uses.
const RESERVED_IDENTIFIERS: [&str; 2] = ["ret", "sandbox_"];

/// What a [`Type`] means once const qualifiers and typedefs are peeled off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    Void,
    Primitive(Primitive),
    /// Pointer; carries the pointee as spelled.
    Pointer(&'a Type),
    Enum(&'a EnumDecl),
    Record { kind: RecordKind, name: &'a str },
    /// Array type, as spelled.
    Array(&'a Type),
    /// Function type, as spelled.
    Function(&'a Type),
}

impl Resolved<'_> {
    pub fn is_pointer(&self) -> bool {
        matches!(self, Resolved::Pointer(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Resolved::Enum(_))
    }
}

/// All declarations of one translation unit.
///
/// Construction validates the model; every `DeclarationModel` in existence
/// is well-formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelParts")]
pub struct DeclarationModel {
    types: Vec<TypeDecl>,
    functions: Vec<FunctionDecl>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

#[derive(Deserialize)]
struct ModelParts {
    #[serde(default)]
    types: Vec<TypeDecl>,
    #[serde(default)]
    functions: Vec<FunctionDecl>,
}

impl TryFrom<ModelParts> for DeclarationModel {
    type Error = ModelError;

    fn try_from(parts: ModelParts) -> Result<Self> {
        DeclarationModel::new(parts.types, parts.functions)
    }
}

impl DeclarationModel {
    /// Build and validate a model.
    pub fn new(types: Vec<TypeDecl>, functions: Vec<FunctionDecl>) -> Result<Self> {
        let mut index = HashMap::with_capacity(types.len());
        for (i, decl) in types.iter().enumerate() {
            if index.insert(decl.name().to_string(), i).is_some() {
                return Err(ModelError::DuplicateType {
                    name: decl.name().to_string(),
                });
            }
        }

        let model = Self {
            types,
            functions,
            index,
        };
        model.validate()?;
        Ok(model)
    }

    /// Parse a JSON-serialized model.
    pub fn from_json(input: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn functions(&self) -> &[FunctionDecl] {
        &self.functions
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Typedefs and enums in declaration order.
    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeDecl> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    pub fn typedefs(&self) -> impl Iterator<Item = &TypedefDecl> {
        self.types.iter().filter_map(|d| match d {
            TypeDecl::Typedef(t) => Some(t),
            TypeDecl::Enum(_) => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDecl> {
        self.types.iter().filter_map(|d| match d {
            TypeDecl::Enum(e) => Some(e),
            TypeDecl::Typedef(_) => None,
        })
    }

    /// Resolve a type structurally: strip `const`, follow typedefs until a
    /// non-alias type is reached.
    pub fn resolve<'a>(&'a self, ty: &'a Type) -> Result<Resolved<'a>> {
        let mut current = ty;
        let mut chain: Vec<&str> = Vec::new();
        loop {
            match current {
                Type::Const(inner) => current = inner.as_ref(),
                Type::Named(name) => match self.lookup(name) {
                    Some(TypeDecl::Typedef(td)) => {
                        if chain.contains(&name.as_str()) {
                            chain.push(name);
                            return Err(ModelError::TypedefCycle {
                                chain: chain.join(" -> "),
                            });
                        }
                        chain.push(name);
                        current = &td.underlying;
                    }
                    Some(TypeDecl::Enum(e)) => return Ok(Resolved::Enum(e)),
                    None => {
                        return Err(ModelError::UnknownType {
                            name: name.clone(),
                            referrer: match chain.last() {
                                Some(alias) => format!("typedef `{alias}`"),
                                None => "a type spelling".to_string(),
                            },
                        });
                    }
                },
                Type::Void => return Ok(Resolved::Void),
                Type::Primitive(kind) => return Ok(Resolved::Primitive(*kind)),
                Type::Pointer(inner) => return Ok(Resolved::Pointer(inner)),
                Type::Record { kind, name } => {
                    return Ok(Resolved::Record { kind: *kind, name })
                }
                Type::Array { .. } => return Ok(Resolved::Array(current)),
                Type::Function { .. } => return Ok(Resolved::Function(current)),
            }
        }
    }

    /// Type declarations referenced, directly or through other typedefs, by
    /// the given functions. Model order is preserved.
    pub fn referenced_types<'a, I>(&'a self, functions: I) -> Vec<&'a TypeDecl>
    where
        I: IntoIterator<Item = &'a FunctionDecl>,
    {
        let mut pending: Vec<&str> = Vec::new();
        for func in functions {
            pending.extend(func.return_type.referenced_names());
            for param in &func.params {
                pending.extend(param.ty.referenced_names());
            }
        }

        let mut reached: HashSet<usize> = HashSet::new();
        while let Some(name) = pending.pop() {
            let Some(&i) = self.index.get(name) else {
                continue;
            };
            if !reached.insert(i) {
                continue;
            }
            if let TypeDecl::Typedef(td) = &self.types[i] {
                pending.extend(td.underlying.referenced_names());
            }
        }

        self.types
            .iter()
            .enumerate()
            .filter(|(i, _)| reached.contains(i))
            .map(|(_, decl)| decl)
            .collect()
    }

    fn validate(&self) -> Result<()> {
        for decl in &self.types {
            match decl {
                TypeDecl::Enum(e) => validate_enum(e)?,
                TypeDecl::Typedef(td) => {
                    let referrer = format!("typedef `{}`", td.alias);
                    check_identifier(&td.alias, "typedef")?;
                    self.check_names(&td.underlying, &referrer)?;
                    check_tags(&td.underlying, &referrer)?;
                }
            }
        }

        // Every alias must bottom out somewhere.
        for td in self.typedefs() {
            self.resolve(&Type::named(td.alias.as_str()))?;
        }

        // Declarations are emitted in model order.
        for (i, decl) in self.types.iter().enumerate() {
            let TypeDecl::Typedef(td) = decl else {
                continue;
            };
            for name in td.underlying.referenced_names() {
                if self.index.get(name).is_some_and(|&j| j >= i) {
                    return Err(ModelError::ForwardReference {
                        alias: td.alias.clone(),
                        name: name.to_string(),
                    });
                }
            }
        }

        let mut seen = HashSet::new();
        for func in &self.functions {
            if !seen.insert(func.name.as_str()) {
                return Err(ModelError::DuplicateFunction {
                    name: func.name.clone(),
                });
            }
            check_identifier(&func.name, "function")?;
            if CLASS_MEMBERS.contains(&func.name.as_str()) {
                return Err(ModelError::InvalidIdentifier {
                    name: func.name.clone(),
                    referrer: "function".to_string(),
                    reason: "collides with a member of the generated class",
                });
            }
            let referrer = format!("function `{}`", func.name);
            self.check_names(&func.return_type, &referrer)?;
            check_tags(&func.return_type, &referrer)?;
            for param in &func.params {
                self.check_names(&param.ty, &referrer)?;
                check_tags(&param.ty, &referrer)?;
            }
            self.validate_identifiers(func)?;
        }
        Ok(())
    }

    fn check_names(&self, ty: &Type, referrer: &str) -> Result<()> {
        for name in ty.referenced_names() {
            if !self.index.contains_key(name) {
                return Err(ModelError::UnknownType {
                    name: name.to_string(),
                    referrer: referrer.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Parameter names, their `<name>_` locals and the reserved identifiers
    /// must all be distinct.
    fn validate_identifiers(&self, func: &FunctionDecl) -> Result<()> {
        let collision = |name: &str| ModelError::ParameterCollision {
            function: func.name.clone(),
            name: name.to_string(),
        };

        let mut taken: HashSet<String> =
            RESERVED_IDENTIFIERS.iter().map(|s| s.to_string()).collect();
        let mut locals = Vec::new();
        for (name, param) in func.named_params() {
            if let Some(reason) = identifier_problem(&name) {
                return Err(ModelError::InvalidIdentifier {
                    name: name.to_string(),
                    referrer: format!("parameter of function `{}`", func.name),
                    reason,
                });
            }
            if !taken.insert(name.to_string()) {
                return Err(collision(&name));
            }
            if !self.resolve(&param.ty)?.is_pointer() {
                locals.push(format!("{name}_"));
            }
        }
        for local in locals {
            if !taken.insert(local.clone()) {
                return Err(collision(&local));
            }
        }
        Ok(())
    }
}

fn validate_enum(decl: &EnumDecl) -> Result<()> {
    check_identifier(&decl.name, "enum")?;
    let member_of = format!("member of enum `{}`", decl.name);
    let mut seen = HashSet::new();
    for member in &decl.members {
        check_identifier(&member.name, &member_of)?;
        if member.value.is_none() {
            return Err(ModelError::MissingEnumValue {
                enum_name: decl.name.clone(),
                member: member.name.clone(),
            });
        }
        if !seen.insert(member.name.as_str()) {
            return Err(ModelError::DuplicateEnumMember {
                enum_name: decl.name.clone(),
                member: member.name.clone(),
            });
        }
    }
    Ok(())
}

fn check_identifier(name: &str, referrer: &str) -> Result<()> {
    match identifier_problem(name) {
        Some(reason) => Err(ModelError::InvalidIdentifier {
            name: name.to_string(),
            referrer: referrer.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Struct and union tags are spelled verbatim too.
fn check_tags(ty: &Type, referrer: &str) -> Result<()> {
    match ty {
        Type::Record { name, .. } => check_identifier(name, referrer),
        Type::Pointer(inner) | Type::Const(inner) => check_tags(inner, referrer),
        Type::Array { element, .. } => check_tags(element, referrer),
        Type::Function { result, params } => {
            check_tags(result, referrer)?;
            params.iter().try_for_each(|p| check_tags(p, referrer))
        }
        Type::Void | Type::Primitive(_) | Type::Named(_) => Ok(()),
    }
}
