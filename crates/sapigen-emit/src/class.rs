//! Whole-file generation: banner, includes, namespaces, type declarations
//! and the proxy class.

use sapigen_core::{DeclarationModel, EnumDecl, FunctionDecl, Type, TypeDecl, TypedefDecl};
use tracing::{debug, info};

use crate::error::{GenerateError, Result, UnsupportedReason, UnsupportedTypeError};
use crate::method::{MethodSource, ProxyMethodGenerator};
use crate::options::{ApiOptions, EmbedOptions};
use crate::writer::SourceWriter;

const BANNER: [&str; 2] = [
    "// AUTO-GENERATED by the Sandboxed API generator.",
    "// Edits will be discarded when regenerating this file.",
];

const INCLUDES: [&str; 5] = [
    "absl/status/status.h",
    "absl/status/statusor.h",
    "sandboxed_api/sandbox.h",
    "sandboxed_api/util/status_macros.h",
    "sandboxed_api/vars.h",
];

/// Everything one generated file contains, borrowed from its model.
#[derive(Debug, Clone)]
pub struct ProxyClass<'m> {
    pub name: String,
    /// Outermost component first.
    pub namespace: Vec<String>,
    pub functions: Vec<&'m FunctionDecl>,
    pub types: Vec<&'m TypeDecl>,
    pub header_guard: Option<String>,
    /// Embedded sandbox as `(class name, options)`.
    pub embed: Option<(String, EmbedOptions)>,
}

impl<'m> ProxyClass<'m> {
    /// Select the exposed functions and the type declarations they need.
    pub fn from_model(model: &'m DeclarationModel, options: &ApiOptions) -> Result<Self> {
        options.validate()?;

        let functions: Vec<&FunctionDecl> = if options.function_names.is_empty() {
            model.functions().iter().collect()
        } else {
            if let Some(missing) = options
                .function_names
                .iter()
                .find(|name| model.function(name).is_none())
            {
                return Err(GenerateError::UnknownFunction {
                    name: missing.clone(),
                });
            }
            model
                .functions()
                .iter()
                .filter(|f| options.function_names.contains(&f.name))
                .collect()
        };
        let name = options.class_name();
        if functions.iter().any(|f| f.name == name) {
            return Err(GenerateError::InvalidOption {
                option: "name",
                detail: format!("class `{name}` has the same name as a sandboxed function"),
            });
        }
        let types = model.referenced_types(functions.iter().copied());

        debug!(
            functions = functions.len(),
            types = types.len(),
            "selected declarations"
        );

        Ok(Self {
            name,
            namespace: options.namespace_path()?,
            functions,
            types,
            header_guard: options.header_guard.clone(),
            embed: options
                .embed
                .clone()
                .map(|embed| (options.sandbox_class_name(), embed)),
        })
    }
}

/// Assembles generated files for one model.
#[derive(Debug, Clone, Copy)]
pub struct ProxyClassGenerator<'m> {
    methods: ProxyMethodGenerator<'m>,
}

impl<'m> ProxyClassGenerator<'m> {
    pub fn new(model: &'m DeclarationModel) -> Self {
        Self {
            methods: ProxyMethodGenerator::new(model),
        }
    }

    /// Generate the full file. Any unsupported function or typedef aborts
    /// the whole unit; no partial output is returned.
    pub fn generate_class(&self, class: &ProxyClass<'_>) -> Result<String> {
        let methods = class
            .functions
            .iter()
            .map(|func| self.methods.generate_method(func))
            .collect::<Result<Vec<MethodSource>>>()?;
        let type_decls = class
            .types
            .iter()
            .map(|decl| emit_type_decl(decl))
            .collect::<Result<Vec<String>>>()?;

        let mut w = SourceWriter::new();
        for line in BANNER {
            w.line(line);
        }
        w.blank_line();

        if let Some(guard) = &class.header_guard {
            w.line(&format!("#ifndef {guard}"));
            w.line(&format!("#define {guard}"));
            w.blank_line();
        }

        for include in INCLUDES {
            w.line(&format!("#include \"{include}\""));
        }
        if let Some((_, embed)) = &class.embed {
            w.line(&format!("#include \"{}\"", embed.include_path()));
        }
        w.blank_line();

        for ns in &class.namespace {
            w.line(&format!("namespace {ns} {{"));
        }
        if !class.namespace.is_empty() {
            w.blank_line();
        }

        if !type_decls.is_empty() {
            w.raw(&type_decls.join("\n"));
            w.raw("\n\n");
        }

        if let Some((sandbox_class, embed)) = &class.embed {
            w.line(&format!("class {sandbox_class} : public ::sapi::Sandbox {{"));
            w.line(" public:");
            w.indent();
            w.line(&format!(
                "{sandbox_class}() : ::sapi::Sandbox({}_embed_create()) {{}}",
                embed.identifier()
            ));
            w.dedent();
            w.line("};");
            w.blank_line();
        }

        let name = &class.name;
        w.line(&format!("class {name} {{"));
        w.line(" public:");
        w.indent();
        w.line(&format!(
            "explicit {name}(::sapi::Sandbox* sandbox) : sandbox_(sandbox) {{}}"
        ));
        w.line("// Deprecated");
        w.line("::sapi::Sandbox* GetSandbox() const { return sandbox(); }");
        w.line("::sapi::Sandbox* sandbox() const { return sandbox_; }");
        w.dedent();
        w.blank_line();
        for method in &methods {
            w.raw(&method.text);
            w.blank_line();
        }
        w.line(" private:");
        w.indent();
        w.line("::sapi::Sandbox* sandbox_;");
        w.dedent();
        w.line("};");

        if !class.namespace.is_empty() {
            w.blank_line();
            for ns in class.namespace.iter().rev() {
                w.line(&format!("}}  // namespace {ns}"));
            }
        }

        if let Some(guard) = &class.header_guard {
            w.blank_line();
            w.line(&format!("#endif  // {guard}"));
        }

        info!(
            class = %class.name,
            methods = methods.len(),
            types = type_decls.len(),
            "generated proxy class"
        );
        Ok(w.finish())
    }
}

/// Select declarations per `options` and generate the file.
pub fn generate(model: &DeclarationModel, options: &ApiOptions) -> Result<String> {
    let class = ProxyClass::from_model(model, options)?;
    ProxyClassGenerator::new(model).generate_class(&class)
}

fn emit_type_decl(decl: &TypeDecl) -> Result<String> {
    match decl {
        TypeDecl::Typedef(td) => emit_typedef(td),
        TypeDecl::Enum(e) => Ok(emit_enum(e)),
    }
}

fn emit_enum(decl: &EnumDecl) -> String {
    let mut out = format!("enum {} {{\n", decl.name);
    for member in &decl.members {
        match member.value {
            Some(value) => out.push_str(&format!("\t{} = {value} ,\n", member.name)),
            None => out.push_str(&format!("\t{} ,\n", member.name)),
        }
    }
    out.push_str("};");
    out
}

fn emit_typedef(td: &TypedefDecl) -> Result<String> {
    let alias = &td.alias;
    let declarator_error = || GenerateError::UnsupportedTypedef {
        alias: alias.clone(),
        source: UnsupportedTypeError::new(&td.underlying, UnsupportedReason::Declarator),
    };
    // `R declarator(params)` for function and function pointer aliases.
    let function_typedef = |result: &Type, params: &[Type], declarator: &str| {
        if is_compound_declarator(result) || params.iter().any(is_compound_declarator) {
            return Err(declarator_error());
        }
        Ok(format!("typedef {result} {declarator}({});", join_types(params)))
    };

    match &td.underlying {
        Type::Array { element, length } => {
            if is_compound_declarator(element) {
                return Err(declarator_error());
            }
            Ok(match length {
                Some(n) => format!("typedef {element} {alias}[{n}];"),
                None => format!("typedef {element} {alias}[];"),
            })
        }
        Type::Function { result, params } => {
            function_typedef(result.as_ref(), params.as_slice(), alias.as_str())
        }
        Type::Pointer(inner) => match inner.as_ref() {
            Type::Function { result, params } => {
                function_typedef(result.as_ref(), params.as_slice(), &format!("(*{alias})"))
            }
            pointee if is_compound_declarator(pointee) => Err(declarator_error()),
            _ => Ok(format!("typedef {} {alias};", td.underlying)),
        },
        other if is_compound_declarator(other) => Err(declarator_error()),
        other => Ok(format!("typedef {other} {alias};")),
    }
}

/// Whether a spelling needs a declarator wrapped around a name, which plain
/// `typedef T name;` cannot express.
fn is_compound_declarator(ty: &Type) -> bool {
    match ty {
        Type::Array { .. } | Type::Function { .. } => true,
        Type::Pointer(inner) | Type::Const(inner) => is_compound_declarator(inner),
        Type::Void | Type::Primitive(_) | Type::Named(_) | Type::Record { .. } => false,
    }
}

fn join_types(types: &[Type]) -> String {
    types
        .iter()
        .map(Type::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapigen_core::{EnumMember, Parameter, Primitive, RecordKind};

    #[test]
    fn typedef_forms() {
        let plain = TypedefDecl::new("uint", Primitive::UnsignedInt.into());
        assert_eq!(emit_typedef(&plain).unwrap(), "typedef unsigned int uint;");

        let ptr = TypedefDecl::new("uintp", Type::pointer_to(Type::named("uint")));
        assert_eq!(emit_typedef(&ptr).unwrap(), "typedef uint * uintp;");

        let record = TypedefDecl::new(
            "TIFF",
            Type::Record {
                kind: RecordKind::Struct,
                name: "tiff".to_string(),
            },
        );
        assert_eq!(emit_typedef(&record).unwrap(), "typedef struct tiff TIFF;");

        let array = TypedefDecl::new(
            "digest_t",
            Type::Array {
                element: Box::new(Primitive::UnsignedChar.into()),
                length: Some(32),
            },
        );
        assert_eq!(emit_typedef(&array).unwrap(), "typedef unsigned char digest_t[32];");

        let callback = TypedefDecl::new(
            "callback_t",
            Type::pointer_to(Type::Function {
                result: Box::new(Primitive::Int.into()),
                params: vec![Type::pointer_to(Type::Void), Primitive::Long.into()],
            }),
        );
        assert_eq!(
            emit_typedef(&callback).unwrap(),
            "typedef int (*callback_t)(void *, long);"
        );
    }

    #[test]
    fn nested_declarators_are_rejected() {
        let td = TypedefDecl::new(
            "matrix",
            Type::Array {
                element: Box::new(Type::Array {
                    element: Box::new(Primitive::Int.into()),
                    length: Some(3),
                }),
                length: Some(3),
            },
        );
        let err = emit_typedef(&td).unwrap_err();
        assert!(matches!(
            &err,
            GenerateError::UnsupportedTypedef { alias, source }
                if alias == "matrix" && source.reason == UnsupportedReason::Declarator
        ));

        let pp = TypedefDecl::new(
            "fnpp",
            Type::pointer_to(Type::pointer_to(Type::Function {
                result: Box::new(Type::Void),
                params: vec![],
            })),
        );
        assert!(emit_typedef(&pp).is_err());
    }

    #[test]
    fn enum_layout() {
        let e = EnumDecl::new(
            "ProcessStatus",
            vec![EnumMember::new("OK", 0), EnumMember::new("ERROR", -1)],
        );
        assert_eq!(
            emit_enum(&e),
            "enum ProcessStatus {\n\tOK = 0 ,\n\tERROR = -1 ,\n};"
        );
    }

    #[test]
    fn unknown_function_filter_fails() {
        let model = DeclarationModel::new(
            vec![],
            vec![FunctionDecl::new("f", Type::Void, vec![])],
        )
        .unwrap();
        let options = ApiOptions::new("Test", "").with_functions(["f", "g"]);
        let err = ProxyClass::from_model(&model, &options).unwrap_err();
        assert_eq!(err, GenerateError::UnknownFunction { name: "g".to_string() });
    }

    #[test]
    fn function_named_like_the_class_fails() {
        let model = DeclarationModel::new(
            vec![],
            vec![FunctionDecl::new("TestApi", Type::Void, vec![])],
        )
        .unwrap();
        let err = ProxyClass::from_model(&model, &ApiOptions::new("Test", "")).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidOption { option: "name", .. }));
        assert!(ProxyClass::from_model(&model, &ApiOptions::new("Other", "")).is_ok());
    }

    #[test]
    fn filter_keeps_model_order() {
        let model = DeclarationModel::new(
            vec![],
            vec![
                FunctionDecl::new("a", Type::Void, vec![]),
                FunctionDecl::new("b", Type::Void, vec![]),
                FunctionDecl::new("c", Type::Void, vec![]),
            ],
        )
        .unwrap();
        let options = ApiOptions::new("Test", "").with_functions(["c", "a"]);
        let class = ProxyClass::from_model(&model, &options).unwrap();
        let names: Vec<&str> = class.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn only_referenced_types_are_emitted() {
        let model = DeclarationModel::new(
            vec![
                TypedefDecl::new("unused_t", Primitive::Short.into()).into(),
                TypedefDecl::new("uint", Primitive::UnsignedInt.into()).into(),
            ],
            vec![FunctionDecl::new(
                "f",
                Type::Void,
                vec![Parameter::new("x", Type::named("uint"))],
            )],
        )
        .unwrap();
        let out = generate(&model, &ApiOptions::new("Test", "")).unwrap();
        assert!(out.contains("typedef unsigned int uint;\n\nclass TestApi {"));
        assert!(!out.contains("unused_t"));
    }

    #[test]
    fn global_namespace_has_no_wrapper() {
        let model = DeclarationModel::new(
            vec![],
            vec![FunctionDecl::new("f", Type::Void, vec![])],
        )
        .unwrap();
        let out = generate(&model, &ApiOptions::new("Test", "")).unwrap();
        assert!(!out.contains("namespace"));
        assert!(out.contains("#include \"sandboxed_api/vars.h\"\n\nclass TestApi {"));
        assert!(out.ends_with(" private:\n  ::sapi::Sandbox* sandbox_;\n};\n"));
    }
}
