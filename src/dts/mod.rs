//! TypeScript declaration generation.
//!
//! The pipeline mirrors a small compiler:
//! - `types`: declaration IR
//! - `convert`: documented type strings to IR types
//! - `codegen`: registry classes to IR declarations
//! - `emit`: IR to text

pub mod codegen;
pub mod convert;
pub mod diagnostics;
pub mod emit;
pub mod types;
pub mod utils;

pub use codegen::{Declarations, EmitOptions, Emitter};
pub use convert::{ModuleScope, TypeConverter};
pub use diagnostics::Diagnostic;
pub use emit::Emit;
