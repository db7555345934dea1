use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_dir: PathBuf,
    pub aws: AwsDefaults,
}

/// Process-wide fallbacks applied by the AWS configuration handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsDefaults {
    pub region: String,
}

impl Default for AwsDefaults {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("REGISTRY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("REGISTRY_PORT")
            .unwrap_or_else(|_| "9100".to_string())
            .parse()
            .unwrap_or(9100);

        let log_dir = env::var("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/var/log/aws-service-registry"));

        // AWS_REGION wins over AWS_DEFAULT_REGION, matching the AWS CLI
        let region = env::var("AWS_REGION")
            .or_else(|_| env::var("AWS_DEFAULT_REGION"))
            .ok()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Ok(Config {
            host,
            port,
            log_dir,
            aws: AwsDefaults { region },
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e| anyhow::anyhow!("Invalid socket address: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 9100,
            log_dir: PathBuf::from("./logs"),
            aws: AwsDefaults::default(),
        };
        assert_eq!(config.socket_addr().unwrap().port(), 9100);

        let bad = Config {
            host: "not a host".to_string(),
            ..config
        };
        assert!(bad.socket_addr().is_err());
    }
}
