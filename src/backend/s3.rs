// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! S3 backend built on `aws-sdk-s3`. No retries beyond the SDK's own.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::backend::ObjectBackend;
use crate::error::{FsError, Result};

pub struct S3Backend {
    client: Client,
}

impl S3Backend {
    /// Load credentials from the default provider chain and build a client
    /// for `region`. A custom `endpoint` switches to path-style addressing.
    pub async fn connect(region: &str, endpoint: Option<&str>) -> Result<Self> {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(url) = endpoint {
            loader = loader.endpoint_url(url);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(endpoint.is_some())
            .build();
        debug!(region, endpoint = ?endpoint, "S3 client configured");

        Ok(Self { client: Client::from_conf(s3_config) })
    }
}

#[async_trait]
impl ObjectBackend for S3Backend {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()> {
        let len = body.len() as i64;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_length(len)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| FsError::Backend(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let output = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    return Err(FsError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    });
                }
                return Err(FsError::Backend(DisplayErrorContext(&service_err).to_string()));
            }
        };

        let len = output.content_length().unwrap_or(0).max(0) as usize;
        let mut buf = BytesMut::with_capacity(len);
        let mut body = output.body;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| FsError::Backend(format!("read body of {bucket}/{key}: {e}")))?
        {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}
