//! CLI command implementations.

pub mod generate;
pub mod signatures;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;
use sapigen_core::DeclarationModel;
use sapigen_decl::SapiDeclaration;
use sapigen_emit::{ApiOptions, EmbedOptions};
use tracing::debug;

/// Command-line settings that override a declaration file's `[api]` section.
#[derive(Args, Debug, Clone, Default)]
pub struct ApiOverrides {
    /// Base name of the generated class (`<NAME>Api`)
    #[arg(long)]
    pub name: Option<String>,
    /// Namespace path, e.g. `sapi::zlib`
    #[arg(long)]
    pub namespace: Option<String>,
    /// Only expose these functions (repeatable)
    #[arg(long = "function", value_name = "FUNCTION")]
    pub functions: Vec<String>,
    /// Header guard macro (default: derived from --output)
    #[arg(long, conflicts_with = "no_header_guard")]
    pub header_guard: Option<String>,
    /// Emit no header guard
    #[arg(long)]
    pub no_header_guard: bool,
    /// Directory of the embedded sandbox header
    #[arg(long, requires = "embed_name")]
    pub embed_dir: Option<String>,
    /// Name of the embedded sandbox (`<NAME>_embed.h`)
    #[arg(long, requires = "embed_dir")]
    pub embed_name: Option<String>,
}

impl ApiOverrides {
    /// Apply the overrides on top of the options a declaration file gave.
    pub fn apply(&self, base: Option<ApiOptions>) -> Result<ApiOptions> {
        let mut options = match (base, &self.name) {
            (Some(options), _) => options,
            (None, Some(name)) => ApiOptions::new(name.as_str(), ""),
            (None, None) => bail!("--name is required for inputs without an [api] section"),
        };

        if let Some(name) = &self.name {
            options.name = name.clone();
        }
        if let Some(namespace) = &self.namespace {
            options.namespace = namespace.clone();
        }
        if !self.functions.is_empty() {
            options.function_names = self.functions.clone();
        }
        if self.no_header_guard {
            options.header_guard = None;
        } else if let Some(guard) = &self.header_guard {
            options.header_guard = Some(guard.clone());
        }
        if let (Some(dir), Some(name)) = (&self.embed_dir, &self.embed_name) {
            options.embed = Some(EmbedOptions::new(dir.as_str(), name.as_str()));
        }
        Ok(options)
    }
}

/// Load a `.toml` declaration file or a `.json` model.
pub fn load_input(path: &Path, overrides: &ApiOverrides) -> Result<(DeclarationModel, ApiOptions)> {
    if !path.is_file() {
        bail!("input file not found: {}", path.display());
    }

    let (model, base) = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => {
            let decl = SapiDeclaration::load(path)
                .with_context(|| format!("loading {}", path.display()))?;
            let model = decl
                .to_model()
                .with_context(|| format!("reading declarations from {}", path.display()))?;
            (model, Some(decl.api_options()))
        }
        Some("json") => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let model = DeclarationModel::from_json(&text)
                .with_context(|| format!("parsing model {}", path.display()))?;
            (model, None)
        }
        _ => bail!(
            "unsupported input {}: expected a .toml declaration file or a .json model",
            path.display()
        ),
    };

    debug!(
        input = %path.display(),
        functions = model.functions().len(),
        types = model.types().len(),
        "loaded declarations"
    );
    Ok((model, overrides.apply(base)?))
}
