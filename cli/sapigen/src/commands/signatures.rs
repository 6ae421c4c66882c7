//! `sapigen signatures`: show how each exposed function is marshalled.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use sapigen_emit::{render_signature, ProxyClass, TypeMapper, WrapperType};

use super::{load_input, ApiOverrides};

pub fn run(input: &Path, overrides: &ApiOverrides) -> Result<()> {
    print!("{}", render(input, overrides)?);
    Ok(())
}

/// One block per exposed function: the signature comment, then the wrapper
/// of the return value and of each parameter.
pub fn render(input: &Path, overrides: &ApiOverrides) -> Result<String> {
    let (model, options) = load_input(input, overrides)?;
    let class = ProxyClass::from_model(&model, &options)?;
    let mapper = TypeMapper::new(&model);

    let mut out = String::new();
    for func in &class.functions {
        let context = || format!("function `{}`", func.name);
        writeln!(out, "{}", render_signature(func))?;

        let ret = mapper.return_wrapper(&func.return_type).with_context(context)?;
        writeln!(out, "  ret: {ret}")?;
        for (name, param) in func.named_params() {
            let wrapper = mapper.parameter_wrapper(&param.ty).with_context(context)?;
            if wrapper == WrapperType::Ptr {
                writeln!(out, "  {name}: {wrapper}* (passed through)")?;
            } else {
                writeln!(out, "  {name}: {wrapper}")?;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lists_wrappers_per_function() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("test.sapi.toml");
        std::fs::write(
            &input,
            r#"
[api]
name = "Test"

[[types]]
enum = "ProcessStatus"
members = [{ name = "OK", value = 0 }, { name = "ERROR", value = 1 }]

[[functions]]
signature = "ProcessStatus ProcessDatapoint(ProcessStatus status)"

[[functions]]
signature = "void types_6(char *)"
"#,
        )
        .unwrap();

        let text = render(&input, &ApiOverrides::default()).unwrap();
        assert_eq!(
            text,
            "ProcessStatus ProcessDatapoint(ProcessStatus)\n\
             \x20 ret: ::sapi::v::IntBase<ProcessStatus>\n\
             \x20 status: ::sapi::v::IntBase<ProcessStatus>\n\
             void types_6(char *)\n\
             \x20 ret: ::sapi::v::Void\n\
             \x20 a0: ::sapi::v::Ptr* (passed through)\n"
        );
    }

    #[test]
    fn function_filter_applies() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("test.sapi.toml");
        std::fs::write(
            &input,
            "[api]\nname = \"T\"\n\n[[functions]]\nsignature = \"int a(void)\"\n\n\
             [[functions]]\nsignature = \"int b(void)\"\n",
        )
        .unwrap();
        let overrides = ApiOverrides {
            functions: vec!["b".to_string()],
            ..Default::default()
        };
        let text = render(&input, &overrides).unwrap();
        assert_eq!(text, "int b()\n  ret: ::sapi::v::Int\n");
    }
}
