use crate::aws::config::AwsConfig;
use crate::docs::{ApiDocInfo, Verb};
use crate::registry::Service;
use std::any::Any;

pub const SERVICE_TYPE: &str = "aws_ses";

#[derive(Debug)]
pub struct Ses {
    name: String,
    config: AwsConfig,
}

impl Ses {
    pub fn new(config: AwsConfig) -> Self {
        let name = config
            .service_name
            .clone()
            .unwrap_or_else(|| SERVICE_TYPE.to_string());
        Self { name, config }
    }
}

impl Service for Ses {
    fn service_type(&self) -> &str {
        SERVICE_TYPE
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn api_doc_info(&self) -> ApiDocInfo {
        ApiDocInfo::new(format!("Email delivery via SES in {}.", self.config.region)).path(
            "/",
            &[(Verb::Post, "email", "Send an email created from posted data and/or a template.")],
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
