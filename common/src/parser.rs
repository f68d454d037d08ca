//! APIレスポンスパーサー
//!
//! モデルが返したテキストから AnalysisResult を取り出し、形と値域を検証する。
//! スキーマ指定はモデル側への要求に過ぎないため、ここで改めて確認する。

use crate::error::{Error, Result};
use crate::types::AnalysisResult;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// APIレスポンスからJSONオブジェクト部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. エラー
///
/// # Examples
/// ```
/// use label_scan_common::extract_json;
///
/// let response = "result: {\"productName\": \"x\"}";
/// assert_eq!(extract_json(response).unwrap(), "{\"productName\": \"x\"}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 生の {...} を探す
    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 成分解析レスポンスをパース
///
/// 応答全体がJSONならそのまま厳密にデコードする（配列など形が違えばエラー）。
/// JSONでない応答に限り `extract_json` で埋め込まれたオブジェクトを探す。
///
/// # Returns
/// * `Ok(AnalysisResult)` - 必須項目が揃い、overallScoreが0〜100
/// * `Err(Error::Parse)` - JSONなし、型不一致、未知の判定値、スコア範囲外
pub fn parse_analysis_response(response: &str) -> Result<AnalysisResult> {
    let trimmed = response.trim();
    let result: AnalysisResult = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => serde_json::from_value(value).map_err(decode_error)?,
        Err(_) => {
            let json_str = extract_json(trimmed)?;
            serde_json::from_str(json_str.trim()).map_err(decode_error)?
        }
    };

    validate_score(result.overall_score)?;
    Ok(result)
}

fn decode_error(e: serde_json::Error) -> Error {
    Error::Parse(format!("解析結果 JSONパースエラー: {}", e))
}

fn validate_score(score: f64) -> Result<()> {
    if !score.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(Error::Parse(format!(
            "overallScoreが範囲外です: {} ({}〜{})",
            score, MIN_SCORE, MAX_SCORE
        )));
    }
    Ok(())
}
