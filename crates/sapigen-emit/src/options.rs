//! Per-run generator options.

use sapigen_core::ident::{identifier_problem, is_identifier};

use crate::error::{GenerateError, Result};

/// Embedded sandbox settings: the generated file includes
/// `"<dir>/<name>_embed.h"` and defines a `<Name>Sandbox` class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedOptions {
    pub dir: String,
    pub name: String,
}

impl EmbedOptions {
    pub fn new(dir: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// The embed name as a C identifier (`zlib-sapi` becomes `zlib_sapi`).
    pub fn identifier(&self) -> String {
        sanitize(&self.name, false)
    }

    pub fn include_path(&self) -> String {
        let dir = self.dir.trim_end_matches('/');
        if dir.is_empty() {
            format!("{}_embed.h", self.name)
        } else {
            format!("{dir}/{}_embed.h", self.name)
        }
    }
}

/// Options for one generated proxy class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiOptions {
    /// Base name; the class is `<name>Api`.
    pub name: String,
    /// `a::b` namespace path. Empty means global scope.
    pub namespace: String,
    /// Functions to expose. Empty exposes every function in the model.
    pub function_names: Vec<String>,
    pub header_guard: Option<String>,
    pub embed: Option<EmbedOptions>,
}

impl ApiOptions {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            function_names: Vec::new(),
            header_guard: None,
            embed: None,
        }
    }

    pub fn with_functions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.function_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_header_guard(mut self, guard: impl Into<String>) -> Self {
        self.header_guard = Some(guard.into());
        self
    }

    pub fn with_embed(mut self, embed: EmbedOptions) -> Self {
        self.embed = Some(embed);
        self
    }

    pub fn class_name(&self) -> String {
        format!("{}Api", self.name)
    }

    pub fn sandbox_class_name(&self) -> String {
        format!("{}Sandbox", self.name)
    }

    /// Namespace components, outermost first.
    pub fn namespace_path(&self) -> Result<Vec<String>> {
        if self.namespace.is_empty() {
            return Ok(Vec::new());
        }
        let path = self
            .namespace
            .trim_start_matches("::")
            .split("::")
            .map(str::to_string)
            .collect::<Vec<_>>();
        if let Some(bad) = path.iter().find(|p| identifier_problem(p).is_some()) {
            return Err(GenerateError::InvalidOption {
                option: "namespace",
                detail: format!("`{}` has an invalid component `{bad}`", self.namespace),
            });
        }
        Ok(path)
    }

    /// Check everything that ends up verbatim in the output.
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.name) {
            return Err(GenerateError::InvalidOption {
                option: "name",
                detail: format!("`{}` is not a valid C++ identifier", self.name),
            });
        }
        self.namespace_path()?;
        if let Some(guard) = &self.header_guard {
            if !is_identifier(guard) {
                return Err(GenerateError::InvalidOption {
                    option: "header_guard",
                    detail: format!("`{guard}` is not a valid macro name"),
                });
            }
        }
        if let Some(embed) = &self.embed {
            if embed.name.is_empty() {
                return Err(GenerateError::InvalidOption {
                    option: "embed.name",
                    detail: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Header guard for an output path: `sandboxed_api/zlib/zlib_sapi.sapi.h`
/// gives `SANDBOXED_API_ZLIB_ZLIB_SAPI_SAPI_H_`.
pub fn header_guard_for(path: &str) -> String {
    let mut guard = sanitize(path.trim_start_matches(['/', '.']), true);
    guard.push('_');
    if guard.starts_with(|c: char| c.is_ascii_digit()) {
        guard.insert(0, '_');
    }
    guard
}

fn sanitize(text: &str, uppercase: bool) -> String {
    text.chars()
        .map(|c| match c {
            c if c.is_ascii_alphanumeric() && uppercase => c.to_ascii_uppercase(),
            c if c.is_ascii_alphanumeric() => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_from_path() {
        assert_eq!(
            header_guard_for("sandboxed_api/zlib/zlib_sapi.sapi.h"),
            "SANDBOXED_API_ZLIB_ZLIB_SAPI_SAPI_H_"
        );
        assert_eq!(header_guard_for("./out/test-api.h"), "OUT_TEST_API_H_");
        assert_eq!(header_guard_for("2d.h"), "_2D_H_");
    }

    #[test]
    fn namespace_components() {
        let opts = ApiOptions::new("Test", "sapi::Tests");
        assert_eq!(opts.namespace_path().unwrap(), vec!["sapi", "Tests"]);
        assert!(ApiOptions::new("Test", "").namespace_path().unwrap().is_empty());
        assert_eq!(
            ApiOptions::new("Test", "::outer").namespace_path().unwrap(),
            vec!["outer"]
        );
    }

    #[test]
    fn invalid_options_are_rejected() {
        let err = ApiOptions::new("Test", "a::::b").validate().unwrap_err();
        assert!(matches!(err, GenerateError::InvalidOption { option: "namespace", .. }));

        let err = ApiOptions::new("my api", "").validate().unwrap_err();
        assert!(matches!(err, GenerateError::InvalidOption { option: "name", .. }));

        let err = ApiOptions::new("Test", "")
            .with_header_guard("NOT-A-MACRO")
            .validate()
            .unwrap_err();
        assert!(matches!(err, GenerateError::InvalidOption { option: "header_guard", .. }));

        let err = ApiOptions::new("Test", "sapi::new").validate().unwrap_err();
        assert!(matches!(err, GenerateError::InvalidOption { option: "namespace", .. }));

        assert!(ApiOptions::new("Zlib", "zlib").validate().is_ok());
    }

    #[test]
    fn class_names() {
        let opts = ApiOptions::new("Zlib", "");
        assert_eq!(opts.class_name(), "ZlibApi");
        assert_eq!(opts.sandbox_class_name(), "ZlibSandbox");
    }

    #[test]
    fn embed_paths() {
        let embed = EmbedOptions::new("sandboxed_api/examples/zlib/", "zlib-sapi");
        assert_eq!(embed.include_path(), "sandboxed_api/examples/zlib/zlib-sapi_embed.h");
        assert_eq!(embed.identifier(), "zlib_sapi");
        assert_eq!(EmbedOptions::new("", "z").include_path(), "z_embed.h");
    }
}
