//! JSDuck documentation export: record schema and the class registry.

pub mod model;
pub mod registry;

pub use model::{ClassRecord, DECLARING_KINDS, EnumInfo, MemberKind, MemberRecord, ParamRecord};
pub use registry::{ClassId, ClassRegistry, DEFAULT_PREFIX, Module, RegistryOptions};
