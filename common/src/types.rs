//! 解析結果の型定義
//!
//! CLIと共通ライブラリで共有される型:
//! - IngredientStatus / Ingredient: 成分ごとの判定
//! - AnalysisResult: モデル出力（1枚のラベル画像につき1件）
//! - HistoryItem: 履歴に保存された解析結果

use serde::{Deserialize, Serialize};
use std::fmt;

/// 成分の安全性判定
///
/// モデルはこの4値以外を出力しないようスキーマで制約される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IngredientStatus {
    Safe,
    Warning,
    Danger,
    Unknown,
}

impl IngredientStatus {
    /// スキーマのenumに渡す値（シリアライズ表現と同一）
    pub const ALL: [IngredientStatus; 4] = [
        IngredientStatus::Safe,
        IngredientStatus::Warning,
        IngredientStatus::Danger,
        IngredientStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientStatus::Safe => "SAFE",
            IngredientStatus::Warning => "WARNING",
            IngredientStatus::Danger => "DANGER",
            IngredientStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for IngredientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 製品種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    Food,
    Cosmetic,
    Other,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [ProductType::Food, ProductType::Cosmetic, ProductType::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Food => "Food",
            ProductType::Cosmetic => "Cosmetic",
            ProductType::Other => "Other",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 成分1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub status: IngredientStatus,
    pub description: String,       // 判定理由
}

/// AI解析結果
///
/// `ingredients` はモデルが返した順序を保持する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub product_name: String,
    pub product_type: ProductType,
    pub ingredients: Vec<Ingredient>,
    pub summary: String,
    pub overall_score: f64,        // 0〜100
}

impl AnalysisResult {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.overall_score)
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for ingredient in &self.ingredients {
            match ingredient.status {
                IngredientStatus::Safe => counts.safe += 1,
                IngredientStatus::Warning => counts.warning += 1,
                IngredientStatus::Danger => counts.danger += 1,
                IngredientStatus::Unknown => counts.unknown += 1,
            }
        }
        counts
    }

    /// 危険判定の成分（表示で強調する）
    pub fn dangerous_ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients
            .iter()
            .filter(|i| i.status == IngredientStatus::Danger)
    }
}

/// 総合スコアの区分（80以上: 良好, 50以上: 注意, それ未満: 不良）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Moderate,
    Poor,
}

impl ScoreBand {
    pub const GOOD_THRESHOLD: f64 = 80.0;
    pub const MODERATE_THRESHOLD: f64 = 50.0;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::GOOD_THRESHOLD {
            ScoreBand::Good
        } else if score >= Self::MODERATE_THRESHOLD {
            ScoreBand::Moderate
        } else {
            ScoreBand::Poor
        }
    }
}

/// 判定ごとの成分数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub safe: usize,
    pub warning: usize,
    pub danger: usize,
    pub unknown: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.safe + self.warning + self.danger + self.unknown
    }
}

/// 履歴エントリ
///
/// 保存時に一度だけ生成され、以後変更されない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub timestamp: i64,            // epoch millis
    pub result: AnalysisResult,
}
