//! C++ proxy class generation for the Sandboxed API.
//!
//! Turns a [`DeclarationModel`](sapigen_core::DeclarationModel) into the
//! source of a proxy class whose methods marshal their arguments into
//! `::sapi::v` wrappers and invoke the sandboxed function by name. Output
//! is a pure function of the model and the [`ApiOptions`].
//!
//! ## Modules
//!
//! - [`typemap`]: C type to `::sapi::v` wrapper selection
//! - [`signature`]: signature comment rendering
//! - [`method`]: one proxy method per function
//! - [`class`]: the whole generated file
//! - [`options`]: class name, namespace, filters, header guard, embedding
//! - [`writer`]: indented source buffer

pub mod class;
pub mod error;
pub mod method;
pub mod options;
pub mod signature;
pub mod typemap;
pub mod writer;

pub use class::{generate, ProxyClass, ProxyClassGenerator};
pub use error::{GenerateError, UnsupportedReason, UnsupportedTypeError};
pub use method::{MethodSource, ProxyMethodGenerator};
pub use options::{header_guard_for, ApiOptions, EmbedOptions};
pub use signature::render_signature;
pub use typemap::{TypeMapper, WrapperType};
