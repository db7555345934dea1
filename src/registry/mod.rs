//! Extension registries
//!
//! Two named extension points populated once at bootstrap:
//! ```text
//! ServiceTypeRegistry      "aws_s3"   -> handler + factory + doc generator
//! DriverExtensionRegistry  "redshift" -> connection factory, schema factory
//! ```
//! Both are shared behind `Arc` and stay readable from any task afterwards.

mod driver;
mod service_type;
mod services;

pub use driver::{
    ConnectionFactory, DbConnection, DriverConfig, DriverExtensionRegistry, SchemaFactory,
    SchemaIntrospector,
};
pub use service_type::{
    ConfigField, ConfigHandler, DocGenerator, FieldKind, Service, ServiceTypeDescriptor,
    ServiceTypeGroup, ServiceTypeMeta, ValidatedConfig,
};
pub use services::{ServiceTypeInfo, ServiceTypeRegistry};
