//! Label Scan Common Library
//!
//! 成分ラベル解析の共通部分:
//! データモデル、Gemini向けプロンプトとスキーマ、レスポンス検証、解析履歴ストア

pub mod types;
pub mod error;
pub mod image;
pub mod prompts;
pub mod gemini;
pub mod parser;
pub mod history;

pub use types::{
    AnalysisResult, HistoryItem, Ingredient, IngredientStatus, ProductType, ScoreBand,
    StatusCounts,
};
pub use error::{Error, Result};
pub use image::{sniff_mime_type, strip_data_url_prefix, EncodedImage};
pub use prompts::{analysis_response_schema, build_analysis_prompt, DEFAULT_LANGUAGE};
pub use gemini::{build_analysis_request, GeminiRequest, GeminiResponse, InlineData};
pub use parser::{extract_json, parse_analysis_response, MAX_SCORE, MIN_SCORE};
pub use history::{
    generate_id, HistoryStore, KeyValueStore, MemoryStore, HISTORY_KEY, MAX_HISTORY_ITEMS,
};
