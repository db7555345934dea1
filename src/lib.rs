//! AWS Service Registry Library
//!
//! Service-type and database-driver registries for AWS-backed adapters
//! (S3, DynamoDB, SNS, SES, Redshift), with lazy construction from
//! validated configuration.

pub mod api;
pub mod aws;
pub mod bootstrap;
pub mod config;
pub mod docs;
pub mod error;
pub mod redshift;
pub mod registry;
