//! AWS SDK client bundle.

use aws_config::{BehaviorVersion, Region};

use crate::config::Config;

/// Bundle of AWS SDK clients sharing one [`aws_config::SdkConfig`], so that
/// credentials are resolved once and reused.
#[derive(Clone, Debug)]
pub struct AwsClients {
    /// S3 client used to read and write the accounts document.
    pub s3: aws_sdk_s3::Client,
    /// KMS client used to generate IVs. `None` when no region is configured.
    pub kms: Option<aws_sdk_kms::Client>,
}

impl AwsClients {
    /// Initialise the AWS SDK clients.
    ///
    /// Credentials and, when `AWS_REGION` is unset, the region are resolved
    /// via the standard AWS provider chain. `S3_ENDPOINT_URL` overrides the S3
    /// endpoint and switches to path-style addressing, which local
    /// S3-compatible servers expect.
    pub async fn init(cfg: &Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = cfg.aws_region() {
            loader = loader.region(Region::new(region.to_owned()));
        }
        let sdk_config = loader.load().await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = cfg.s3_endpoint_url() {
            s3_config = s3_config.endpoint_url(endpoint).force_path_style(true);
        }
        let s3 = aws_sdk_s3::Client::from_conf(s3_config.build());

        let kms = cfg
            .aws_region()
            .map(|_| aws_sdk_kms::Client::new(&sdk_config));

        Self { s3, kms }
    }
}
