use std::fmt;

use reqwest::{multipart, RequestBuilder, StatusCode};

use crate::{
    decode::{
        decode_search_result, parse_search_response, parse_status, verify_success,
        STATUS_IMAGE_NOT_FOUND, STATUS_NOT_ENOUGH_INFORMATION,
    },
    retry::RetryPolicy,
    ClientOptions, ImagePayload, LtuError, Result, SearchResult, ServiceConfig, Settings,
};

pub const ADD_IMAGE_PATH: &str = "ltumodify/json/AddImage";
pub const SEARCH_BY_UPLOAD_PATH: &str = "ltuquery/json/SearchImageByUpload";
pub const DELETE_IMAGE_PATH: &str = "ltumodify/json/DeleteImage";
pub const APPLICATION_STATUS_PATH: &str = "ltumodify/json/GetApplicationStatus";

const IMAGE_FIELD: &str = "image_content";

#[derive(Clone)]
/// HTTP client for the LTU image recognition API.
pub struct LtuClient {
    http: reqwest::Client,
    config: ServiceConfig,
    options: ClientOptions,
}

impl fmt::Debug for LtuClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LtuClient")
            .field("config", &self.config)
            .field("options", &self.options)
            .finish()
    }
}

/// Status line and body of a completed exchange.
struct RawResponse {
    status: StatusCode,
    body: String,
}

impl LtuClient {
    /// Creates a client for an already resolved service profile.
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            options: ClientOptions::default(),
        }
    }

    /// Resolves the named environment from `settings` and creates a client for it.
    ///
    /// Unknown environment names fail here rather than on the first call.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ltu_loadtest::{LtuClient, Settings};
    ///
    /// let client = LtuClient::for_environment(&Settings::from_env(), "test")
    ///     .expect("missing LTU_URL_TEST / LTU_APPKEY_TEST");
    /// ```
    pub fn for_environment(settings: &Settings, name: &str) -> Result<Self> {
        settings.resolve(name).map(Self::new)
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Returns the resolved base URL and application key this client targets.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Registers an image under a caller-assigned id and returns that id.
    pub async fn upload_image(
        &self,
        image_id: &str,
        keywords: &str,
        image: &ImagePayload,
    ) -> Result<String> {
        self.retry_policy()
            .execute(|| self.upload_once(image_id, keywords, image))
            .await?;
        Ok(image_id.to_owned())
    }

    /// Searches the image database with the uploaded image.
    ///
    /// Not retried unless [`ClientOptions::retry_search`] is set.
    pub async fn search_by_upload(&self, image: &ImagePayload) -> Result<SearchResult> {
        if self.options.retry_search {
            self.retry_policy()
                .execute(|| self.search_once(image))
                .await
        } else {
            self.search_once(image).await
        }
    }

    /// Removes an image from the image database.
    pub async fn delete_image(&self, image_id: &str) -> Result<()> {
        self.retry_policy()
            .execute(|| self.delete_once(image_id))
            .await
    }

    /// Returns whether the service answers its status endpoint with code 0.
    ///
    /// Every failure, including exhausted retries, is reported as `false`.
    pub async fn is_available(&self) -> bool {
        let outcome = self
            .retry_policy()
            .execute(|| {
                let request = self
                    .http
                    .get(self.endpoint(APPLICATION_STATUS_PATH))
                    .query(&[("application_key", self.config.application_key.as_str())]);
                self.send("GetApplicationStatus", request)
            })
            .await;

        match outcome {
            Ok(response) => {
                response.status.is_success()
                    && parse_status(&response.body).is_some_and(|status| status.is_success())
            }
            Err(err) => {
                tracing::debug!(error = %err, "application status check failed");
                false
            }
        }
    }

    async fn upload_once(
        &self,
        image_id: &str,
        keywords: &str,
        image: &ImagePayload,
    ) -> Result<()> {
        let form = multipart::Form::new().part(IMAGE_FIELD, image.to_part());
        let request = self
            .http
            .post(self.endpoint(ADD_IMAGE_PATH))
            .query(&[
                ("application_key", self.config.application_key.as_str()),
                ("image_id", image_id),
                ("keywords", keywords),
            ])
            .multipart(form);
        let response = self.send("UploadImage", request).await?;

        let status = parse_status(&response.body);
        if status
            .as_ref()
            .is_some_and(|status| status.code == STATUS_NOT_ENOUGH_INFORMATION)
        {
            return Err(LtuError::InsufficientImageData {
                image_id: image_id.to_owned(),
            });
        }

        verify_success("UploadImage", response.status, status)?;
        Ok(())
    }

    async fn search_once(&self, image: &ImagePayload) -> Result<SearchResult> {
        let form = multipart::Form::new().part(IMAGE_FIELD, image.to_part());
        let request = self
            .http
            .post(self.endpoint(SEARCH_BY_UPLOAD_PATH))
            .query(&[("application_key", self.config.application_key.as_str())])
            .multipart(form);
        let response = self.send("SearchByUpload", request).await?;

        let payload = parse_search_response(response.status, &response.body)?;
        decode_search_result(response.status, payload)
    }

    async fn delete_once(&self, image_id: &str) -> Result<()> {
        let request = self.http.get(self.endpoint(DELETE_IMAGE_PATH)).query(&[
            ("application_key", self.config.application_key.as_str()),
            ("image_id", image_id),
        ]);
        let response = self.send("DeleteImage", request).await?;

        let status = parse_status(&response.body);
        if status
            .as_ref()
            .is_some_and(|status| status.code == STATUS_IMAGE_NOT_FOUND)
        {
            return Err(LtuError::ImageNotFound {
                image_id: image_id.to_owned(),
            });
        }

        verify_success("DeleteImage", response.status, status)?;
        Ok(())
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<RawResponse> {
        let response = request.timeout(self.options.timeout()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            operation,
            http_status = status.as_u16(),
            "image recognition call completed"
        );
        Ok(RawResponse { status, body })
    }

    fn endpoint(&self, path: &str) -> String {
        join_endpoint(&self.config.base_url, path)
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from(&self.options)
    }
}

fn join_endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}
