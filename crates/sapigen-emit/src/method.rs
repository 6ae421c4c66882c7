//! Proxy method generation.
//!
//! Each method declares its wrapper locals, performs one
//! `sandbox_->Call("<name>", &ret, ...)` and returns through
//! `SAPI_RETURN_IF_ERROR`, so a failed remote call leaves no partial effects
//! visible to the caller.

use sapigen_core::{DeclarationModel, FunctionDecl};
use tracing::debug;

use crate::error::{GenerateError, Result, UnsupportedTypeError};
use crate::signature::render_signature;
use crate::typemap::{TypeMapper, WrapperType};
use crate::writer::SourceWriter;

/// Generated source of one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSource {
    /// The function name, also the method name.
    pub name: String,
    /// Signature comment text without the `// ` prefix.
    pub signature: String,
    /// Method text, indented for the class body, ending in `}\n`.
    pub text: String,
}

/// Generates proxy methods for functions of one model.
#[derive(Debug, Clone, Copy)]
pub struct ProxyMethodGenerator<'m> {
    model: &'m DeclarationModel,
    mapper: TypeMapper<'m>,
}

impl<'m> ProxyMethodGenerator<'m> {
    pub fn new(model: &'m DeclarationModel) -> Self {
        Self {
            model,
            mapper: TypeMapper::new(model),
        }
    }

    pub fn generate_method(&self, func: &FunctionDecl) -> Result<MethodSource> {
        let ret_wrapper = self
            .mapper
            .return_wrapper(&func.return_type)
            .map_err(in_function(func))?;
        let ret_kind = self.model.resolve(&func.return_type)?;
        // `StatusOr<const T>` is not a usable result type.
        let ret_display = func.return_type.strip_const();

        let mut params = Vec::with_capacity(func.params.len());
        let mut locals = Vec::new();
        let mut call_args = vec!["&ret".to_string()];
        for (name, param) in func.named_params() {
            let wrapper = self
                .mapper
                .parameter_wrapper(&param.ty)
                .map_err(in_function(func))?;
            if wrapper.is_pointer() {
                // Pointers are passed through; the caller owns the `Ptr`.
                params.push(format!("{}* {name}", WrapperType::Ptr));
                call_args.push(name.to_string());
            } else {
                params.push(format!("{} {name}", param.ty));
                locals.push(format!("{wrapper} {name}_(({name}));"));
                call_args.push(format!("&{name}_"));
            }
        }

        let result_type = if ret_wrapper.is_void() {
            "absl::Status".to_string()
        } else {
            format!("absl::StatusOr<{ret_display}>")
        };
        let return_stmt = if ret_wrapper.is_void() {
            "return absl::OkStatus();".to_string()
        } else if ret_kind.is_enum() {
            format!("return static_cast<{ret_display}>(ret.GetValue());")
        } else if ret_kind.is_pointer() {
            format!("return reinterpret_cast<{ret_display}>(ret.GetValue());")
        } else {
            "return ret.GetValue();".to_string()
        };

        let signature = render_signature(func);
        let mut w = SourceWriter::with_indent(1);
        w.line(&format!("// {signature}"));
        w.line(&format!(
            "{result_type} {}({}) {{",
            func.name,
            params.join(", ")
        ));
        w.indent();
        w.line(&format!("{ret_wrapper} ret;"));
        for local in &locals {
            w.line(local);
        }
        w.blank_line();
        w.line(&format!(
            "SAPI_RETURN_IF_ERROR(sandbox_->Call(\"{}\", {}));",
            func.name,
            call_args.join(", ")
        ));
        w.line(&return_stmt);
        w.dedent();
        w.line("}");

        debug!(
            function = %func.name,
            params = func.params.len(),
            locals = locals.len(),
            "generated proxy method"
        );

        Ok(MethodSource {
            name: func.name.clone(),
            signature,
            text: w.finish(),
        })
    }
}

fn in_function(func: &FunctionDecl) -> impl Fn(UnsupportedTypeError) -> GenerateError + '_ {
    move |source| GenerateError::UnsupportedType {
        function: func.name.clone(),
        source,
    }
}
