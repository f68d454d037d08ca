//! プロンプト生成モジュール
//!
//! - build_analysis_prompt: 成分解析用の指示文
//! - analysis_response_schema: Gemini の responseSchema（出力JSONの形）

use crate::types::{IngredientStatus, ProductType};
use serde_json::{json, Value};

/// 既定の出力言語
pub const DEFAULT_LANGUAGE: &str = "Arabic";

/// 成分解析プロンプト生成
///
/// # Arguments
/// * `language` - 製品名・成分名・説明・要約を書かせる言語（例: "Arabic"）
pub fn build_analysis_prompt(language: &str) -> String {
    let language = match language.trim() {
        "" => DEFAULT_LANGUAGE,
        lang => lang,
    };

    format!(
        r#"You are an expert chemist and nutritionist specialised in analysing consumer products (food or cosmetics).
Analyse the attached product image. Extract the list of ingredients and assess each one.

Classify every visible ingredient into exactly one of:
- SAFE: safe for general use.
- WARNING: use with caution (e.g. high sugar content, questionable preservatives, common allergens).
- DANGER: harmful or potentially carcinogenic substances, or substances banned in some countries.
- UNKNOWN: the ingredient cannot be identified or assessed reliably.

Estimate an overall health score for the product from 0 (very bad) to 100 (excellent and healthy).

Write the product name, ingredient names, descriptions and summary in {language}."#
    )
}

/// 出力JSONスキーマ
///
/// トップレベル: productName, productType, ingredients, summary, overallScore（全て必須）
/// 成分: name, status, description（全て必須）
pub fn analysis_response_schema() -> Value {
    let statuses: Vec<&str> = IngredientStatus::ALL.iter().map(|s| s.as_str()).collect();
    let product_types: Vec<&str> = ProductType::ALL.iter().map(|t| t.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "productName": {
                "type": "STRING",
                "description": "Name of the product as shown in the image"
            },
            "productType": {
                "type": "STRING",
                "enum": product_types
            },
            "overallScore": {
                "type": "NUMBER",
                "description": "Health score from 0 to 100"
            },
            "summary": {
                "type": "STRING",
                "description": "General summary of the product and whether it is recommended"
            },
            "ingredients": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "status": {
                            "type": "STRING",
                            "enum": statuses
                        },
                        "description": {
                            "type": "STRING",
                            "description": "Short explanation of why the ingredient was classified this way"
                        }
                    },
                    "required": ["name", "status", "description"]
                }
            }
        },
        "required": ["productName", "productType", "ingredients", "summary", "overallScore"]
    })
}
