//! Declaration model for the Sandboxed API proxy generator.
//!
//! Holds the C declarations of one translation unit as supplied by a
//! frontend: functions, typedefs and enums. The model is validated on
//! construction and immutable afterwards; generators borrow from it.
//!
//! ## Modules
//!
//! - [`types`]: C type spellings and their display form
//! - [`decl`]: function, parameter, enum and typedef declarations
//! - [`model`]: the validated model and the structural type resolver
//! - [`ident`]: identifier rules for generated names
//! - [`error`]: validation errors

pub mod decl;
pub mod error;
pub mod ident;
pub mod model;
pub mod types;

pub use decl::{EnumDecl, EnumMember, FunctionDecl, Parameter, TypeDecl, TypedefDecl};
pub use error::ModelError;
pub use model::{DeclarationModel, Resolved};
pub use types::{Primitive, RecordKind, Type};
