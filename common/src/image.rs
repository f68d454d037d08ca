//! 画像ペイロードの正規化
//!
//! 呼び出し側から渡されるBase64文字列（Data URLヘッダ付きでも可）を
//! Gemini APIへ送信できる形に揃える。ヘッダ除去はこのモジュールの責務。

use crate::error::{Error, Result};
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::{alphabet, Engine};
use regex::Regex;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// 検証用デコーダ（パディングの有無は問わない）
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// 送信用に正規化された画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data: String,
    mime_type: &'static str,
}

impl EncodedImage {
    /// Base64文字列（またはData URL）から作成
    ///
    /// `data:image/{png|jpeg|jpg|webp};base64,` で始まる場合はヘッダを除去する。
    /// 空文字・Base64として不正な場合は `Error::InvalidImage`。
    pub fn new(raw: &str) -> Result<Self> {
        let payload: String = strip_data_url_prefix(raw.trim())
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        if payload.is_empty() {
            return Err(Error::InvalidImage("画像データが空です".into()));
        }

        let bytes = LENIENT
            .decode(payload.as_bytes())
            .map_err(|e| Error::InvalidImage(format!("Base64デコード失敗: {}", e)))?;

        Ok(Self {
            mime_type: sniff_mime_type(&bytes),
            data: payload,
        })
    }

    /// 画像ファイルのバイト列から作成
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidImage("画像データが空です".into()));
        }
        Ok(Self {
            mime_type: sniff_mime_type(bytes),
            data: STANDARD.encode(bytes),
        })
    }

    /// ヘッダを含まないBase64データ
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// 画像のバイト列に戻す
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        LENIENT
            .decode(self.data.as_bytes())
            .map_err(|e| Error::InvalidImage(format!("Base64デコード失敗: {}", e)))
    }
}

/// Data URLヘッダを除去
///
/// 対象外の形式（ヘッダなし、gif等）はそのまま返す。
///
/// # Examples
/// ```
/// use label_scan_common::strip_data_url_prefix;
///
/// assert_eq!(strip_data_url_prefix("data:image/png;base64,iVBOR"), "iVBOR");
/// assert_eq!(strip_data_url_prefix("iVBOR"), "iVBOR");
/// ```
pub fn strip_data_url_prefix(raw: &str) -> &str {
    lazy_static::lazy_static! {
        static ref DATA_URL_PREFIX: Regex =
            Regex::new(r"^data:image/(png|jpeg|jpg|webp);base64,").unwrap();
    }

    match DATA_URL_PREFIX.find(raw) {
        Some(m) => &raw[m.end()..],
        None => raw,
    }
}

/// 先頭バイトからMIMEタイプを判定（不明時は image/jpeg）
pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else {
        DEFAULT_MIME_TYPE
    }
}
