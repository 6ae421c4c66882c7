//! Declaration file (`.sapi.toml`) parsing.
//!
//! A `.sapi.toml` file names the proxy class to generate and lists the C
//! typedefs, enums and function signatures of the sandboxed library.

use std::path::Path;

use sapigen_core::{DeclarationModel, EnumDecl, EnumMember, TypeDecl, TypedefDecl};
use sapigen_emit::{ApiOptions, EmbedOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::csig::CParser;
use crate::error::{DeclError, Result};

/// A complete declaration parsed from a `.sapi.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SapiDeclaration {
    /// The generated class.
    pub api: ApiSection,
    /// Typedefs and enums, in declaration order.
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    /// The sandboxed functions.
    #[serde(default)]
    pub functions: Vec<FunctionEntry>,
}

/// Class naming and output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    /// Base name; the class is `<name>Api`.
    pub name: String,
    /// Namespace path (e.g. "sapi::Tests").
    #[serde(default)]
    pub namespace: String,
    /// Restrict the class to these functions.
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default, alias = "header-guard")]
    pub header_guard: Option<String>,
    #[serde(default)]
    pub embed: Option<EmbedSection>,
}

/// Embedded sandbox settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedSection {
    pub dir: String,
    pub name: String,
}

/// A `[[types]]` entry: either a typedef or an enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeEntry {
    Typedef {
        typedef: String,
        /// Underlying type spelling.
        #[serde(rename = "type")]
        underlying: String,
    },
    Enum {
        #[serde(rename = "enum")]
        name: String,
        #[serde(default)]
        members: Vec<MemberEntry>,
    },
}

impl TypeEntry {
    pub fn name(&self) -> &str {
        match self {
            TypeEntry::Typedef { typedef, .. } => typedef,
            TypeEntry::Enum { name, .. } => name,
        }
    }
}

/// One enumerator. The value is required by the model; a missing value is
/// reported when the model is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberEntry {
    pub name: String,
    #[serde(default)]
    pub value: Option<i64>,
}

/// A single function declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionEntry {
    /// C signature (e.g. "int function_a(int x, int y)").
    #[serde(alias = "c-signature", alias = "c_signature")]
    pub signature: String,
    /// Whether this function is left out of the model.
    #[serde(default)]
    pub excluded: bool,
}

impl SapiDeclaration {
    /// Parse a declaration from a TOML string.
    pub fn parse(input: &str) -> Result<Self> {
        let decl: SapiDeclaration = toml::from_str(input)?;

        if decl.api.name.is_empty() {
            return Err(DeclError::InvalidDeclaration {
                detail: "api.name is required".to_string(),
            });
        }

        Ok(decl)
    }

    /// Parse a declaration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Return only the non-excluded functions.
    pub fn active_functions(&self) -> Vec<&FunctionEntry> {
        self.functions.iter().filter(|f| !f.excluded).collect()
    }

    /// Parse every type spelling and signature and build the model.
    pub fn to_model(&self) -> Result<DeclarationModel> {
        let mut parser = CParser::new();
        for entry in &self.types {
            parser.declare(entry.name());
        }

        let mut types = Vec::with_capacity(self.types.len());
        for entry in &self.types {
            let decl: TypeDecl = match entry {
                TypeEntry::Typedef {
                    typedef,
                    underlying,
                } => TypedefDecl::new(typedef.as_str(), parser.parse_type(underlying)?).into(),
                TypeEntry::Enum { name, members } => EnumDecl {
                    name: name.clone(),
                    members: members
                        .iter()
                        .map(|m| EnumMember {
                            name: m.name.clone(),
                            value: m.value,
                        })
                        .collect(),
                }
                .into(),
            };
            debug!(name = decl.name(), "declared type");
            types.push(decl);
        }

        let mut functions = Vec::new();
        for entry in self.active_functions() {
            let func = parser.parse_signature(&entry.signature)?;
            debug!(function = %func.name, params = func.params.len(), "declared function");
            functions.push(func);
        }

        Ok(DeclarationModel::new(types, functions)?)
    }

    /// Generator options from the `[api]` section.
    pub fn api_options(&self) -> ApiOptions {
        let mut options = ApiOptions::new(self.api.name.as_str(), self.api.namespace.as_str())
            .with_functions(self.api.functions.iter().cloned());
        if let Some(guard) = &self.api.header_guard {
            options = options.with_header_guard(guard.as_str());
        }
        if let Some(embed) = &self.api.embed {
            options = options.with_embed(EmbedOptions::new(embed.dir.as_str(), embed.name.as_str()));
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapigen_core::{ModelError, Primitive, Type};

    #[test]
    fn parse_mapped_declaration() {
        let toml = r#"
[api]
name = "Test"
namespace = "sapi::Tests"

[[types]]
typedef = "uint"
type = "unsigned int"

[[types]]
typedef = "uintp"
type = "uint *"

[[functions]]
signature = "uint function(uintp a)"
"#;
        let decl = SapiDeclaration::parse(toml).unwrap();
        assert_eq!(decl.api.name, "Test");
        assert_eq!(decl.types.len(), 2);
        assert_eq!(decl.types[1].name(), "uintp");

        let model = decl.to_model().unwrap();
        let typedefs: Vec<&TypedefDecl> = model.typedefs().collect();
        assert_eq!(typedefs[0].underlying, Type::Primitive(Primitive::UnsignedInt));
        assert_eq!(typedefs[1].underlying, Type::pointer_to(Type::named("uint")));
        let func = model.function("function").unwrap();
        assert_eq!(func.return_type, Type::named("uint"));
    }

    #[test]
    fn parse_enum_entries() {
        let toml = r#"
[api]
name = "Test"

[[types]]
enum = "ProcessStatus"
members = [{ name = "OK", value = 0 }, { name = "ERROR", value = 1 }]

[[functions]]
signature = "ProcessStatus ProcessDatapoint(ProcessStatus status)"
"#;
        let model = SapiDeclaration::parse(toml).unwrap().to_model().unwrap();
        let e = model.enums().next().unwrap();
        assert_eq!(e.name, "ProcessStatus");
        assert_eq!(e.members[1].value, Some(1));
    }

    #[test]
    fn enum_member_without_value() {
        let toml = r#"
[api]
name = "Test"

[[types]]
enum = "Color"
members = [{ name = "RED" }]
"#;
        let err = SapiDeclaration::parse(toml).unwrap().to_model().unwrap_err();
        assert!(matches!(
            err,
            DeclError::Model(ModelError::MissingEnumValue { .. })
        ));
    }

    #[test]
    fn types_must_be_declared_before_use() {
        let toml = r#"
[api]
name = "Test"

[[types]]
typedef = "handle_p"
type = "handle *"

[[types]]
typedef = "handle"
type = "struct handle_s"
"#;
        // The spelling parses, since every name is known up front, but the
        // emitted `typedef handle * handle_p;` would precede `handle`.
        let err = SapiDeclaration::parse(toml).unwrap().to_model().unwrap_err();
        assert!(matches!(
            err,
            DeclError::Model(ModelError::ForwardReference { ref alias, ref name })
                if alias == "handle_p" && name == "handle"
        ));

        let toml = r#"
[api]
name = "Test"

[[types]]
typedef = "handle"
type = "struct handle_s"

[[types]]
typedef = "handle_p"
type = "handle *"
"#;
        let model = SapiDeclaration::parse(toml).unwrap().to_model().unwrap();
        assert_eq!(model.types().len(), 2);
    }

    #[test]
    fn cpp_keyword_parameter_is_reported() {
        let toml = r#"
[api]
name = "Libc"

[[functions]]
signature = "int rename(const char *old, const char *new)"
"#;
        let err = SapiDeclaration::parse(toml).unwrap().to_model().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid declarations: parameter of function `rename`: `new` is a C++ keyword"
        );
    }

    #[test]
    fn excluded_functions_filtered() {
        let toml = r#"
[api]
name = "Test"

[[functions]]
signature = "int active_fn(void)"

[[functions]]
signature = "int excluded_fn(int, ...)"
excluded = true
"#;
        let decl = SapiDeclaration::parse(toml).unwrap();
        assert_eq!(decl.functions.len(), 2);
        let active = decl.active_functions();
        assert_eq!(active.len(), 1);

        // Excluded signatures are never parsed.
        let model = decl.to_model().unwrap();
        assert_eq!(model.functions().len(), 1);
        assert_eq!(model.functions()[0].name, "active_fn");
    }

    #[test]
    fn missing_api_section() {
        let toml = r#"
[[functions]]
signature = "void orphan(void)"
"#;
        assert!(matches!(
            SapiDeclaration::parse(toml),
            Err(DeclError::Toml(_))
        ));
        assert!(matches!(
            SapiDeclaration::parse("[api]\nname = \"\"\n"),
            Err(DeclError::InvalidDeclaration { .. })
        ));
    }

    #[test]
    fn api_options_from_section() {
        let toml = r#"
[api]
name = "Zlib"
namespace = "zlib"
functions = ["deflateInit_", "deflate"]
header-guard = "ZLIB_SAPI_H_"

[api.embed]
dir = "sandboxed_api/examples/zlib"
name = "zlib-sapi"
"#;
        let options = SapiDeclaration::parse(toml).unwrap().api_options();
        assert_eq!(options.class_name(), "ZlibApi");
        assert_eq!(options.namespace, "zlib");
        assert_eq!(options.function_names, vec!["deflateInit_", "deflate"]);
        assert_eq!(options.header_guard.as_deref(), Some("ZLIB_SAPI_H_"));
        let embed = options.embed.unwrap();
        assert_eq!(embed.include_path(), "sandboxed_api/examples/zlib/zlib-sapi_embed.h");
    }

    #[test]
    fn kebab_case_signature_field() {
        let toml = r#"
[api]
name = "Test"

[[functions]]
c-signature = "double sin(double x)"
"#;
        let decl = SapiDeclaration::parse(toml).unwrap();
        assert_eq!(decl.functions[0].signature, "double sin(double x)");
    }

    #[test]
    fn bad_signature_is_reported() {
        let toml = r#"
[api]
name = "Test"

[[functions]]
signature = "size_t strlen(const char *s)"
"#;
        let err = SapiDeclaration::parse(toml).unwrap().to_model().unwrap_err();
        assert!(matches!(err, DeclError::InvalidCSignature { .. }));
    }
}
