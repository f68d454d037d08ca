//! 端末向けの表示
//!
//! 解析結果・履歴一覧の整形と、解析失敗時のメッセージ選択。
//! 認証系エラーの判別はここ（表示側）で行う。

use crate::analyzer::AnalysisError;
use chrono::{DateTime, Local, TimeZone};
use label_scan_common::{AnalysisResult, HistoryItem, IngredientStatus, ProductType, ScoreBand};
use std::fmt::Write;

pub fn status_label(status: IngredientStatus) -> &'static str {
    match status {
        IngredientStatus::Safe => "✔ 安全",
        IngredientStatus::Warning => "⚠ 注意",
        IngredientStatus::Danger => "✖ 危険",
        IngredientStatus::Unknown => "? 不明",
    }
}

pub fn product_type_label(product_type: ProductType) -> &'static str {
    match product_type {
        ProductType::Food => "食品",
        ProductType::Cosmetic => "化粧品",
        ProductType::Other => "その他",
    }
}

pub fn score_band_label(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Good => "良好",
        ScoreBand::Moderate => "注意",
        ScoreBand::Poor => "不良",
    }
}

/// 表示用スコア（整数に丸める）
pub fn format_score(score: f64) -> String {
    format!("{:.0}", score)
}

pub fn format_timestamp(millis: i64) -> String {
    format_timestamp_in(millis, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(millis: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// 解析結果の整形
pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let counts = result.status_counts();

    let _ = writeln!(out, "📦 {} ({})", result.product_name, product_type_label(result.product_type));
    let _ = writeln!(
        out,
        "総合スコア: {} / 100 [{}]",
        format_score(result.overall_score),
        score_band_label(result.score_band())
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", result.summary);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "成分: {}件 (安全 {} / 注意 {} / 危険 {} / 不明 {})",
        counts.total(),
        counts.safe,
        counts.warning,
        counts.danger,
        counts.unknown
    );

    let dangerous: Vec<&str> = result
        .dangerous_ingredients()
        .map(|i| i.name.as_str())
        .collect();
    if !dangerous.is_empty() {
        let _ = writeln!(out, "⚠ 危険な成分: {}", dangerous.join(", "));
    }

    for ingredient in &result.ingredients {
        let _ = writeln!(out, "  {}  {}", status_label(ingredient.status), ingredient.name);
        if !ingredient.description.is_empty() {
            let _ = writeln!(out, "      {}", ingredient.description);
        }
    }

    out
}

/// 履歴一覧の整形（新しい順のまま）
pub fn render_history(items: &[HistoryItem]) -> String {
    if items.is_empty() {
        return "履歴はありません\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "{}  {}  {:>3} [{}]  {}",
            item.id,
            format_timestamp(item.timestamp),
            format_score(item.result.overall_score),
            score_band_label(item.result.score_band()),
            item.result.product_name
        );
    }
    let _ = writeln!(out, "\n{}件", items.len());
    out
}

/// 解析失敗時に表示するメッセージ
pub fn describe_failure(error: &AnalysisError) -> String {
    if error.is_credential_problem() {
        return "APIキーに問題があります。キーの設定と有効性を確認してください。".to_string();
    }

    match error {
        AnalysisError::EmptyResponse | AnalysisError::Decode(_) => {
            "画像から解析結果を得られませんでした。もう一度お試しください。".to_string()
        }
        AnalysisError::InvalidImage(detail) => format!("画像データが不正です: {}", detail),
        AnalysisError::ServiceFailure { .. } => {
            "画像の解析中にエラーが発生しました。もう一度お試しください。".to_string()
        }
    }
}
