//! `sapigen generate`: write the proxy class header.

use std::path::Path;

use anyhow::{bail, Context, Result};
use sapigen_emit::header_guard_for;
use tracing::info;

use super::{load_input, ApiOverrides};

/// Generate the header for `input`. Writes to `output` (or stdout), or with
/// `check` compares against the existing `output` instead.
pub fn run(input: &Path, output: Option<&Path>, check: bool, overrides: &ApiOverrides) -> Result<()> {
    let text = render(input, output, overrides)?;

    match (output, check) {
        (Some(path), true) => {
            let existing = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            if existing != text {
                bail!("{} is out of date; rerun `sapigen generate`", path.display());
            }
            info!(output = %path.display(), "up to date");
        }
        (Some(path), false) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(path, &text).with_context(|| format!("writing {}", path.display()))?;
            info!(output = %path.display(), bytes = text.len(), "wrote proxy header");
        }
        (None, true) => bail!("--check requires --output"),
        (None, false) => print!("{text}"),
    }
    Ok(())
}

/// The generated header text. Without an explicit guard, an output path
/// supplies one.
pub fn render(input: &Path, output: Option<&Path>, overrides: &ApiOverrides) -> Result<String> {
    let (model, mut options) = load_input(input, overrides)?;
    if options.header_guard.is_none() && !overrides.no_header_guard {
        options.header_guard = output.map(|path| header_guard_for(&path.to_string_lossy()));
    }

    sapigen_emit::generate(&model, &options)
        .with_context(|| format!("generating {} from {}", options.class_name(), input.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MAPPED_DECL: &str = r#"
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

    const CODE_GOLD_MAPPED: &str =
        include_str!("../../../../crates/sapigen-emit/tests/fixtures/test_api_mapped.h");

    fn no_guard() -> ApiOverrides {
        ApiOverrides {
            no_header_guard: true,
            ..Default::default()
        }
    }

    #[test]
    fn generate_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("test.sapi.toml");
        std::fs::write(&input, MAPPED_DECL).unwrap();
        let output = dir.path().join("out/test_api.sapi.h");

        run(&input, Some(&output), false, &no_guard()).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), CODE_GOLD_MAPPED);
    }

    #[test]
    fn check_detects_stale_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("test.sapi.toml");
        std::fs::write(&input, MAPPED_DECL).unwrap();
        let output = dir.path().join("test_api.sapi.h");

        run(&input, Some(&output), false, &ApiOverrides::default()).unwrap();
        run(&input, Some(&output), true, &ApiOverrides::default()).unwrap();

        std::fs::write(&output, "// stale\n").unwrap();
        let err = run(&input, Some(&output), true, &ApiOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("out of date"), "{err}");
    }

    #[test]
    fn check_without_existing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("test.sapi.toml");
        std::fs::write(&input, MAPPED_DECL).unwrap();
        let output = dir.path().join("missing.h");
        assert!(run(&input, Some(&output), true, &ApiOverrides::default()).is_err());
    }

    #[test]
    fn guard_defaults_to_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("test.sapi.toml");
        std::fs::write(&input, MAPPED_DECL).unwrap();

        let text = render(&input, Some(Path::new("gen/test_api.h")), &ApiOverrides::default())
            .unwrap();
        assert!(text.contains("#ifndef GEN_TEST_API_H_\n#define GEN_TEST_API_H_\n"));
        assert!(text.ends_with("#endif  // GEN_TEST_API_H_\n"));

        let text = render(&input, None, &ApiOverrides::default()).unwrap();
        assert_eq!(text, CODE_GOLD_MAPPED);
    }

    #[test]
    fn json_model_needs_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("model.json");
        std::fs::write(
            &input,
            r#"{"functions":[{"name":"getpid","returns":{"primitive":"int"},"params":[]}]}"#,
        )
        .unwrap();

        assert!(render(&input, None, &ApiOverrides::default()).is_err());

        let overrides = ApiOverrides {
            name: Some("Proc".to_string()),
            namespace: Some("proc".to_string()),
            ..Default::default()
        };
        let text = render(&input, None, &overrides).unwrap();
        assert!(text.contains("namespace proc {"));
        assert!(text.contains("class ProcApi {"));
        assert!(text.contains("absl::StatusOr<int> getpid() {"));
    }

    #[test]
    fn unsupported_type_reports_function() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("wide.sapi.toml");
        std::fs::write(
            &input,
            "[api]\nname = \"Wide\"\n\n[[functions]]\nsignature = \"int putwc(wchar_t c)\"\n",
        )
        .unwrap();
        let output = dir.path().join("wide.h");

        let err = run(&input, Some(&output), false, &ApiOverrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("function `putwc`"), "{err:#}");
        assert!(!output.exists());
    }
}
