//! Client for the gateway endpoints

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

/// Status and text body of a gateway reply
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Client for interacting with FileGate
pub struct FileGateClient {
    base_url: String,
    client: Client,
}

impl FileGateClient {
    /// Create a new client
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: Client::new(),
        }
    }

    /// `POST /upload` with a file part plus `userID` and `folderName`
    pub async fn upload(
        &self,
        user_id: &str,
        folder_name: &str,
        filename: &str,
        body: &[u8],
    ) -> Result<GatewayResponse, ClientError> {
        let form = Form::new()
            .text("userID", user_id.to_string())
            .text("folderName", folder_name.to_string())
            .part(
                "file",
                Part::bytes(body.to_vec()).file_name(filename.to_string()),
            );
        self.send_multipart("/upload", form).await
    }

    /// `POST /upload` carrying only the text fields
    pub async fn upload_without_file(
        &self,
        user_id: &str,
        folder_name: &str,
    ) -> Result<GatewayResponse, ClientError> {
        let form = Form::new()
            .text("userID", user_id.to_string())
            .text("folderName", folder_name.to_string());
        self.send_multipart("/upload", form).await
    }

    /// `POST {path}` with an arbitrary body and content type
    pub async fn post_raw(
        &self,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<GatewayResponse, ClientError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        Self::read(response).await
    }

    /// `POST /delete` with a urlencoded `key`
    pub async fn delete(&self, key: &str) -> Result<GatewayResponse, ClientError> {
        self.send_form("/delete", &[("key", key)]).await
    }

    /// `POST /deleteFolder` with a urlencoded `folderName`
    pub async fn delete_folder(&self, folder_name: &str) -> Result<GatewayResponse, ClientError> {
        self.send_form("/deleteFolder", &[("folderName", folder_name)])
            .await
    }

    async fn send_multipart(&self, path: &str, form: Form) -> Result<GatewayResponse, ClientError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .multipart(form)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn send_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<GatewayResponse, ClientError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .form(fields)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> Result<GatewayResponse, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        Ok(GatewayResponse { status, body })
    }
}

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
}
