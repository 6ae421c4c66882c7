//! Hand-written C declaration parser.
//!
//! Handles function signatures and type spellings built from arithmetic
//! keywords, `signed`/`unsigned`, `const`, `struct`/`union`/`enum` tags,
//! declared typedef and enum names, pointer stars and array suffixes.
//! Does NOT handle function pointers, variadic functions or attributes.

use std::collections::HashSet;

use sapigen_core::{FunctionDecl, Parameter, Primitive, RecordKind, Type};

use crate::error::{DeclError, Result};

/// Parse result carrying only the failure detail; the public entry points
/// attach the offending input.
type Parse<T> = std::result::Result<T, String>;

/// Parses C spellings against a set of declared typedef and enum names.
#[derive(Debug, Clone, Default)]
pub struct CParser {
    names: HashSet<String>,
}

impl CParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `name` usable as a type name in later spellings.
    pub fn declare(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Parse a C function signature.
    ///
    /// Examples:
    /// - `"int function_a(int x, int y)"`
    /// - `"void types_6(char *)"`
    /// - `"uint function(uintp a)"` (with `uint` and `uintp` declared)
    pub fn parse_signature(&self, input: &str) -> Result<FunctionDecl> {
        self.signature(input.trim())
            .map_err(|detail| invalid(input, detail))
    }

    /// Parse a type spelling such as `unsigned int`, `uint *` or
    /// `unsigned char[32]`.
    pub fn parse_type(&self, input: &str) -> Result<Type> {
        self.type_spelling(input.trim())
            .map_err(|detail| invalid(input, detail))
    }

    fn signature(&self, input: &str) -> Parse<FunctionDecl> {
        if input.is_empty() {
            return Err("empty signature".to_string());
        }
        if input.contains("...") {
            return Err("variadic functions are not supported".to_string());
        }

        let paren_pos = input.find('(').ok_or("missing '('")?;
        if !input.ends_with(')') {
            return Err("missing ')'".to_string());
        }

        let before_paren = input[..paren_pos].trim();
        let params_str = &input[paren_pos + 1..input.len() - 1];
        if params_str.contains(['(', ')']) {
            return Err("function pointers are not supported".to_string());
        }

        let tokens = tokenize(before_paren);
        let (base, consumed) = self.parse_base_type(&tokens)?;
        let (return_type, name) = parse_declarator(base, &tokens[consumed..])?;
        let name = name.ok_or("missing function name")?;
        if matches!(return_type, Type::Array { .. }) {
            return Err(format!("function `{name}` cannot return an array"));
        }

        let params = self.parse_params(params_str)?;
        Ok(FunctionDecl::new(name, return_type, params))
    }

    fn type_spelling(&self, input: &str) -> Parse<Type> {
        if input.contains(['(', ')']) {
            return Err("function types are not supported".to_string());
        }
        let tokens = tokenize(input);
        let (base, consumed) = self.parse_base_type(&tokens)?;
        match parse_declarator(base, &tokens[consumed..])? {
            (ty, None) => Ok(ty),
            (_, Some(name)) => Err(format!("unexpected name `{name}` in type spelling")),
        }
    }

    /// Parse the parameter list between `(` and `)`.
    fn parse_params(&self, s: &str) -> Parse<Vec<Parameter>> {
        let s = s.trim();
        if s.is_empty() || s == "void" {
            return Ok(Vec::new());
        }

        let mut params = Vec::new();
        for part in s.split(',') {
            let tokens = tokenize(part);
            if tokens.is_empty() {
                return Err("empty parameter".to_string());
            }
            let (base, consumed) = self.parse_base_type(&tokens)?;
            let (ty, name) = parse_declarator(base, &tokens[consumed..])?;
            // Array parameters are pointers in C.
            let ty = match ty {
                Type::Array { element, .. } => Type::Pointer(element),
                other => other,
            };
            if ty.is_void() {
                return Err("`void` must be the only parameter".to_string());
            }
            params.push(match name {
                Some(name) => Parameter::new(name, ty),
                None => Parameter::anonymous(ty),
            });
        }
        Ok(params)
    }

    /// Parse a type specifier, with its qualifiers, from the front of
    /// `tokens`. Returns the type and the number of tokens consumed.
    fn parse_base_type(&self, tokens: &[&str]) -> Parse<(Type, usize)> {
        let mut pos = 0;
        let mut is_const = false;

        while tokens.get(pos) == Some(&"const") {
            is_const = true;
            pos += 1;
        }

        let ty = match tokens.get(pos).copied() {
            None => return Err("expected type".to_string()),
            Some(tag @ ("struct" | "union" | "enum")) => {
                pos += 1;
                let name = match tokens.get(pos) {
                    Some(name) if is_identifier(name) => name.to_string(),
                    _ => return Err(format!("expected {tag} name")),
                };
                pos += 1;
                match tag {
                    "struct" => Type::Record {
                        kind: RecordKind::Struct,
                        name,
                    },
                    "union" => Type::Record {
                        kind: RecordKind::Union,
                        name,
                    },
                    _ if self.is_declared(&name) => Type::Named(name),
                    _ => return Err(format!("undeclared enum '{name}'")),
                }
            }
            Some("void") => {
                pos += 1;
                Type::Void
            }
            Some(word) => match parse_arithmetic(tokens, &mut pos) {
                Some(kind) => Type::Primitive(kind),
                None if self.is_declared(word) => {
                    pos += 1;
                    Type::named(word)
                }
                None => return Err(format!("unknown type '{word}'")),
            },
        };

        // `char const` spells the same type as `const char`.
        while tokens.get(pos) == Some(&"const") {
            is_const = true;
            pos += 1;
        }

        let ty = if is_const { Type::const_of(ty) } else { ty };
        Ok((ty, pos))
    }
}

fn invalid(input: &str, detail: String) -> DeclError {
    DeclError::InvalidCSignature {
        input: input.trim().to_string(),
        detail,
    }
}

/// Parse an arithmetic type starting at `*pos`, advancing past it.
fn parse_arithmetic(tokens: &[&str], pos: &mut usize) -> Option<Primitive> {
    let start = *pos;
    let sign = match tokens.get(*pos).copied() {
        Some("unsigned") => Some(true),
        Some("signed") => Some(false),
        _ => None,
    };
    if sign.is_some() {
        *pos += 1;
    }
    let unsigned = sign == Some(true);

    let next = tokens.get(*pos).copied();
    let kind = match next {
        Some("char") => {
            *pos += 1;
            match sign {
                Some(true) => Primitive::UnsignedChar,
                Some(false) => Primitive::SignedChar,
                None => Primitive::Char,
            }
        }
        Some("short") => {
            *pos += 1;
            skip(tokens, pos, "int");
            if unsigned { Primitive::UnsignedShort } else { Primitive::Short }
        }
        Some("int") => {
            *pos += 1;
            if unsigned { Primitive::UnsignedInt } else { Primitive::Int }
        }
        Some("long") => {
            *pos += 1;
            if skip(tokens, pos, "long") {
                skip(tokens, pos, "int");
                if unsigned { Primitive::UnsignedLongLong } else { Primitive::LongLong }
            } else if sign.is_none() && skip(tokens, pos, "double") {
                Primitive::LongDouble
            } else {
                skip(tokens, pos, "int");
                if unsigned { Primitive::UnsignedLong } else { Primitive::Long }
            }
        }
        Some("__int128") => {
            *pos += 1;
            if unsigned { Primitive::UnsignedInt128 } else { Primitive::Int128 }
        }
        // bare `unsigned` or `signed` means `unsigned int` / `int`
        _ if sign.is_some() => {
            if unsigned { Primitive::UnsignedInt } else { Primitive::Int }
        }
        Some(word) => {
            let kind = match word {
                "bool" | "_Bool" => Primitive::Bool,
                "float" => Primitive::Float,
                "double" => Primitive::Double,
                "wchar_t" => Primitive::WChar,
                "char16_t" => Primitive::Char16,
                "char32_t" => Primitive::Char32,
                _ => {
                    *pos = start;
                    return None;
                }
            };
            *pos += 1;
            kind
        }
        None => return None,
    };
    Some(kind)
}

fn skip(tokens: &[&str], pos: &mut usize, word: &str) -> bool {
    if tokens.get(*pos) == Some(&word) {
        *pos += 1;
        true
    } else {
        false
    }
}

/// Apply pointer stars, pointer qualifiers, an optional name and array
/// suffixes to `base`.
fn parse_declarator(base: Type, tokens: &[&str]) -> Parse<(Type, Option<String>)> {
    let mut ty = base;
    let mut pos = 0;

    while let Some(&tok) = tokens.get(pos) {
        match tok {
            "*" => ty = Type::pointer_to(ty),
            "const" if matches!(ty, Type::Pointer(_)) => ty = Type::const_of(ty),
            "const" => return Err("misplaced 'const'".to_string()),
            _ => break,
        }
        pos += 1;
    }

    let mut name = None;
    if let Some(&tok) = tokens.get(pos) {
        if is_identifier(tok) {
            name = Some(tok.to_string());
            pos += 1;
        }
    }

    let mut lengths = Vec::new();
    while tokens.get(pos) == Some(&"[") {
        match (tokens.get(pos + 1).copied(), tokens.get(pos + 2).copied()) {
            (Some("]"), _) => {
                lengths.push(None);
                pos += 2;
            }
            (Some(n), Some("]")) => {
                let n = n
                    .parse::<u64>()
                    .map_err(|_| format!("array length '{n}' is not a number"))?;
                lengths.push(Some(n));
                pos += 3;
            }
            _ => return Err("unterminated array suffix".to_string()),
        }
    }
    // `T a[2][3]` is an array of 2 arrays of 3 T.
    for length in lengths.into_iter().rev() {
        ty = Type::Array {
            element: Box::new(ty),
            length,
        };
    }

    match tokens.get(pos) {
        None => Ok((ty, name)),
        Some(tok) => Err(format!("unexpected token '{tok}'")),
    }
}

/// Tokenize a C declaration fragment, splitting on whitespace and keeping
/// `*`, `[` and `]` as separate tokens.
fn tokenize(s: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for part in s.split_whitespace() {
        let mut remaining = part;
        while !remaining.is_empty() {
            match remaining.find(['*', '[', ']']) {
                Some(pos) => {
                    if pos > 0 {
                        tokens.push(&remaining[..pos]);
                    }
                    tokens.push(&remaining[pos..pos + 1]);
                    remaining = &remaining[pos + 1..];
                }
                None => {
                    tokens.push(remaining);
                    break;
                }
            }
        }
    }
    tokens
}

const KEYWORDS: &[&str] = &[
    "const", "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned",
    "struct", "union", "enum", "bool", "_Bool", "wchar_t", "char16_t", "char32_t", "__int128",
];

fn is_identifier(tok: &str) -> bool {
    let mut chars = tok.chars();
    let head_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !KEYWORDS.contains(&tok)
}
