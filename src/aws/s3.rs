use crate::aws::config::AwsS3Config;
use crate::docs::{ApiDocInfo, Verb};
use crate::registry::Service;
use std::any::Any;

pub const SERVICE_TYPE: &str = "aws_s3";

/// File storage backed by one S3 bucket
#[derive(Debug)]
pub struct S3 {
    name: String,
    config: AwsS3Config,
}

impl S3 {
    pub fn new(config: AwsS3Config) -> Self {
        let name = config
            .aws
            .service_name
            .clone()
            .unwrap_or_else(|| SERVICE_TYPE.to_string());
        Self { name, config }
    }

    pub fn container(&self) -> &str {
        &self.config.container
    }

    pub fn region(&self) -> &str {
        &self.config.aws.region
    }

    /// Virtual-hosted style URL of the bucket, or the endpoint override
    pub fn bucket_url(&self) -> String {
        match &self.config.aws.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.container()),
            None => format!(
                "https://{}.s3.{}.amazonaws.com",
                self.container(),
                self.region()
            ),
        }
    }
}

impl Service for S3 {
    fn service_type(&self) -> &str {
        SERVICE_TYPE
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn api_doc_info(&self) -> ApiDocInfo {
        ApiDocInfo::new(format!(
            "File storage on the '{}' bucket in {}.",
            self.container(),
            self.region()
        ))
        .path(
            "/",
            &[
                (Verb::Get, "root", "List the contents of the root folder."),
                (Verb::Post, "root", "Create folders and/or files in the root folder."),
                (Verb::Delete, "root", "Delete folders and/or files from the root folder."),
            ],
        )
        .path(
            "/{folder_path}/",
            &[
                (Verb::Get, "folder", "List the folder's content, including properties."),
                (Verb::Post, "folder", "Create a folder and/or add content."),
                (Verb::Patch, "folder", "Update folder properties."),
                (Verb::Delete, "folder", "Delete one folder and/or its contents."),
            ],
        )
        .path(
            "/{file_path}",
            &[
                (Verb::Get, "file", "Download the file contents and/or its properties."),
                (Verb::Post, "file", "Create a new file."),
                (Verb::Put, "file", "Update content of the file."),
                (Verb::Patch, "file", "Update properties of the file."),
                (Verb::Delete, "file", "Delete one file."),
            ],
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
