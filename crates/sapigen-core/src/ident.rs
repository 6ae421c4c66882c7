//! C++ identifier rules for names that reach generated code.

/// C++ keywords and alternative tokens. None of them can name a function,
/// parameter, type or enumerator in a generated header.
pub const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Members every generated API class declares besides its constructor.
pub const CLASS_MEMBERS: &[&str] = &["GetSandbox", "sandbox", "sandbox_"];

/// `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn is_cpp_keyword(s: &str) -> bool {
    CPP_KEYWORDS.contains(&s)
}

/// Why `name` cannot be emitted as an identifier, if it cannot.
pub fn identifier_problem(name: &str) -> Option<&'static str> {
    if !is_identifier(name) {
        Some("not a valid identifier")
    } else if is_cpp_keyword(name) {
        Some("is a C++ keyword")
    } else {
        None
    }
}
