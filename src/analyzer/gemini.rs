//! Gemini API連携（reqwest）

use super::{GenerativeModel, TransportError};
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use label_scan_common::{GeminiRequest, GeminiResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini generateContent クライアント
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: crate::config::DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// 設定ファイル・環境変数から作成（APIキー必須）
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;
        Ok(Self::new(api_key, config.model.clone()).with_endpoint(config.endpoint.clone()))
    }

    /// APIのベースURL（例: https://generativelanguage.googleapis.com/v1beta）
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// HTTPクライアントを差し替える（プロキシ・タイムアウト設定など）
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GeminiRequest) -> std::result::Result<Option<String>, TransportError> {
        let response = self
            .http
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError {
                status: e.status().map(|s| s.as_u16()),
                message: format!("API呼び出しエラー: {}", e),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| TransportError {
            status: Some(status.as_u16()),
            message: format!("レスポンス読み込みエラー: {}", e),
        })?;

        if !status.is_success() {
            return Err(TransportError {
                status: Some(status.as_u16()),
                message: format!("API error: {} {}", status.as_u16(), error_message(&body)),
            });
        }

        let payload: GeminiResponse = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Gemini APIの応答を解釈できません");
                return Ok(None);
            }
        };

        if let Some(reason) = payload.finish_reason() {
            tracing::debug!(reason, "Gemini APIの終了理由");
        }
        if let Some(reason) = payload.block_reason() {
            tracing::warn!(reason, "Gemini APIがリクエストをブロックしました");
        }

        Ok(payload.first_text())
    }
}

/// エラーレスポンス本文から message を取り出す（取れなければ本文そのまま）
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
