use crate::aws::config::AwsConfig;
use crate::docs::{ApiDocInfo, Verb};
use crate::registry::Service;
use std::any::Any;

pub const SERVICE_TYPE: &str = "aws_sns";

/// Push notifications through SNS topics, applications and endpoints
#[derive(Debug)]
pub struct Sns {
    name: String,
    config: AwsConfig,
}

impl Sns {
    pub fn new(config: AwsConfig) -> Self {
        let name = config
            .service_name
            .clone()
            .unwrap_or_else(|| SERVICE_TYPE.to_string());
        Self { name, config }
    }

    /// ARN of `topic` owned by `account_id` in this service's region
    pub fn topic_arn(&self, account_id: &str, topic: &str) -> String {
        format!("arn:aws:sns:{}:{}:{}", self.config.region, account_id, topic)
    }
}

impl Service for Sns {
    fn service_type(&self) -> &str {
        SERVICE_TYPE
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn api_doc_info(&self) -> ApiDocInfo {
        ApiDocInfo::new(format!("Push notifications via SNS in {}.", self.config.region))
            .path("/", &[(Verb::Get, "resources", "List resources available for this service.")])
            .path(
                "/topic",
                &[
                    (Verb::Get, "topics", "Retrieve all topics available for the push service."),
                    (Verb::Post, "topic", "Create a topic."),
                ],
            )
            .path(
                "/topic/{topic_name}",
                &[
                    (Verb::Get, "topic_attributes", "Retrieve topic definition for the given topic."),
                    (Verb::Post, "publish_topic", "Send a message to the given topic."),
                    (Verb::Put, "topic_attributes", "Update a given topic's attributes."),
                    (Verb::Delete, "topic", "Delete a given topic."),
                ],
            )
            .path(
                "/topic/{topic_name}/subscription",
                &[
                    (Verb::Get, "subscriptions_by_topic", "List subscriptions of the topic."),
                    (Verb::Post, "subscription_by_topic", "Subscribe to the topic."),
                ],
            )
            .path(
                "/subscription",
                &[
                    (Verb::Get, "subscriptions", "Retrieve all subscriptions."),
                    (Verb::Post, "subscription", "Create a subscription."),
                ],
            )
            .path(
                "/subscription/{sub_name}",
                &[
                    (Verb::Get, "subscription_attributes", "Retrieve attributes of the subscription."),
                    (Verb::Put, "subscription_attributes", "Update attributes of the subscription."),
                    (Verb::Delete, "subscription", "Delete the subscription."),
                ],
            )
            .path(
                "/app",
                &[
                    (Verb::Get, "apps", "Retrieve all apps."),
                    (Verb::Post, "app", "Create a given app."),
                ],
            )
            .path(
                "/app/{app_name}",
                &[
                    (Verb::Get, "app_attributes", "Retrieve app definition for the given app."),
                    (Verb::Put, "app_attributes", "Update a given app's attributes."),
                    (Verb::Delete, "app", "Delete a given app."),
                ],
            )
            .path(
                "/endpoint",
                &[
                    (Verb::Get, "endpoints", "Retrieve all endpoints."),
                    (Verb::Post, "endpoint", "Create an endpoint for an app."),
                ],
            )
            .path(
                "/endpoint/{endpoint_name}",
                &[
                    (Verb::Get, "endpoint_attributes", "Retrieve the endpoint's attributes."),
                    (Verb::Post, "publish_endpoint", "Send a message to the given endpoint."),
                    (Verb::Put, "endpoint_attributes", "Update the endpoint's attributes."),
                    (Verb::Delete, "endpoint", "Delete the endpoint."),
                ],
            )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
