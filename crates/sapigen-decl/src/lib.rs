//! Declaration frontend for the Sandboxed API proxy generator.
//!
//! Reads `.sapi.toml` declaration files and parses the C type spellings and
//! function signatures they contain into a validated
//! [`DeclarationModel`](sapigen_core::DeclarationModel).
//!
//! ## Modules
//!
//! - [`csig`]: C signature and type spelling parser
//! - [`declaration`]: `.sapi.toml` declaration file parsing
//! - [`error`]: frontend errors

pub mod csig;
pub mod declaration;
pub mod error;

pub use csig::CParser;
pub use declaration::SapiDeclaration;
pub use error::DeclError;
