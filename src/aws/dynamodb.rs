use crate::aws::config::AwsConfig;
use crate::aws::table_api;
use crate::docs::ApiDocInfo;
use crate::registry::Service;
use std::any::Any;

pub const SERVICE_TYPE: &str = "aws_dynamodb";

#[derive(Debug)]
pub struct DynamoDb {
    name: String,
    config: AwsConfig,
}

impl DynamoDb {
    pub fn new(config: AwsConfig) -> Self {
        let name = config
            .service_name
            .clone()
            .unwrap_or_else(|| SERVICE_TYPE.to_string());
        Self { name, config }
    }

    pub fn region(&self) -> &str {
        &self.config.region
    }
}

impl Service for DynamoDb {
    fn service_type(&self) -> &str {
        SERVICE_TYPE
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn api_doc_info(&self) -> ApiDocInfo {
        table_api(ApiDocInfo::new(format!(
            "DynamoDB tables in {}.",
            self.region()
        )))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
