//! 成分ラベル解析クライアント
//!
//! 画像（Base64 / Data URL）→ Gemini 呼び出し → AnalysisResult の検証まで。
//! 呼び出しごとに独立しており、セッションや会話履歴は持たない。

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use label_scan_common::{
    build_analysis_request, parse_analysis_response, AnalysisResult, EncodedImage, GeminiRequest,
    DEFAULT_LANGUAGE,
};
use std::fmt;
use thiserror::Error;

use crate::config::DEFAULT_TEMPERATURE;

/// 送信〜応答受信の失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    /// HTTPステータス（接続失敗などでは None）
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{}] {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// マルチモーダルモデルへの1回の生成呼び出し
///
/// 応答テキストがない場合は `Ok(None)`。
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: &GeminiRequest) -> Result<Option<String>, TransportError>;
}

/// 解析失敗の分類
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// モデルが応答テキストを返さなかった
    #[error("モデルから解析結果を受け取れませんでした")]
    EmptyResponse,

    /// 応答テキストが期待する形ではなかった（必須項目欠落・範囲外スコア等）
    #[error("解析結果の形式が不正です: {0}")]
    Decode(String),

    /// 通信・認証・モデル側のエラー
    #[error("解析サービスの呼び出しに失敗しました: {message}")]
    ServiceFailure { status: Option<u16>, message: String },

    /// 送信前に検出した画像データの不備
    #[error("画像データが不正です: {0}")]
    InvalidImage(String),
}

impl AnalysisError {
    /// 利用可能な解析結果が得られなかった（EmptyResponse と Decode）
    pub fn is_unusable_response(&self) -> bool {
        matches!(self, AnalysisError::EmptyResponse | AnalysisError::Decode(_))
    }

    /// 認証・権限の問題と思われるか（ステータス 401/403、または "API key" / "403" を含む）
    pub fn is_credential_problem(&self) -> bool {
        match self {
            AnalysisError::ServiceFailure { status, message } => {
                matches!(status, Some(401) | Some(403))
                    || message.contains("API key")
                    || message.contains("403")
            }
            AnalysisError::EmptyResponse
            | AnalysisError::Decode(_)
            | AnalysisError::InvalidImage(_) => false,
        }
    }
}

impl From<TransportError> for AnalysisError {
    fn from(e: TransportError) -> Self {
        AnalysisError::ServiceFailure {
            status: e.status,
            message: e.to_string(),
        }
    }
}

/// 解析クライアント
pub struct Analyzer<M> {
    model: M,
    language: String,
    temperature: f32,
}

impl<M: GenerativeModel> Analyzer<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            language: DEFAULT_LANGUAGE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// 解析結果を書かせる言語
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Base64文字列（Data URLヘッダ付きでも可）を解析
    pub async fn analyze(&self, image: &str) -> Result<AnalysisResult, AnalysisError> {
        let image = EncodedImage::new(image).map_err(|e| match e {
            label_scan_common::Error::InvalidImage(msg) => AnalysisError::InvalidImage(msg),
            other => AnalysisError::InvalidImage(other.to_string()),
        })?;
        self.analyze_encoded(&image).await
    }

    /// 正規化済みの画像を解析
    pub async fn analyze_encoded(&self, image: &EncodedImage) -> Result<AnalysisResult, AnalysisError> {
        let request = build_analysis_request(image, &self.language, self.temperature);
        tracing::debug!(
            mime_type = image.mime_type(),
            payload_len = image.data().len(),
            language = %self.language,
            "解析リクエスト送信"
        );

        let text = self
            .model
            .generate(&request)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Gemini API呼び出しエラー");
                AnalysisError::from(e)
            })?
            .ok_or_else(|| {
                tracing::warn!("Gemini APIの応答にテキストがありません");
                AnalysisError::EmptyResponse
            })?;

        tracing::debug!(response_len = text.len(), "解析レスポンス受信");

        parse_analysis_response(&text).map_err(|e| {
            tracing::warn!(error = %e, "解析レスポンスの検証に失敗");
            AnalysisError::Decode(e.to_string())
        })
    }
}
