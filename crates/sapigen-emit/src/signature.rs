//! Signature comments (`// int function_a(int, int)`).

use sapigen_core::FunctionDecl;

/// Render `RET NAME(T1, T2, ...)` from display spellings. Parameter names
/// are left out; the comment summarizes the type signature only.
pub fn render_signature(func: &FunctionDecl) -> String {
    let params: Vec<String> = func.params.iter().map(|p| p.ty.to_string()).collect();
    format!("{} {}({})", func.return_type, func.name, params.join(", "))
}
