//! 解析履歴ストア
//!
//! 履歴は新しい順の配列としてJSON化し、1つのキーにまとめて保存する。
//! 保存先は `KeyValueStore` で抽象化する（CLIはファイル、テストはメモリ）。
//!
//! 読み書きの失敗は呼び出し側に返さず、ログに残して縮退動作する:
//! - list: 空の配列
//! - save: 何もしない（解析結果そのものは呼び出し側に残る）
//! - delete: 空の配列
//!
//! 書き込み元は1つを前提とし、複数プロセスからの同時書き込みは後勝ちになる。

use crate::error::Result;
use crate::types::{AnalysisResult, HistoryItem};
use rand::Rng;
use std::collections::HashMap;

/// 保存キー
pub const HISTORY_KEY: &str = "label_scan_history_v1";

/// 保持する最大件数（超えた分は古い順に捨てる）
pub const MAX_HISTORY_ITEMS: usize = 50;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// キー・バリュー形式の永続化先
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// メモリ上のストア
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// 解析履歴
pub struct HistoryStore<S: KeyValueStore> {
    store: S,
    clock: Clock,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Box::new(|| chrono::Utc::now().timestamp_millis()),
        }
    }

    /// 時刻取得関数を差し替える（epoch millis）
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// 履歴一覧（新しい順）
    ///
    /// 読み込み・パースに失敗した場合は空の配列を返す。
    pub fn list(&self) -> Vec<HistoryItem> {
        match self.read() {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "履歴の読み込みに失敗しました");
                Vec::new()
            }
        }
    }

    /// IDで1件取得
    pub fn get(&self, id: &str) -> Option<HistoryItem> {
        self.list().into_iter().find(|item| item.id == id)
    }

    /// 解析結果を先頭に追加して保存
    ///
    /// 件数は MAX_HISTORY_ITEMS に切り詰める。失敗はログのみ。
    pub fn save(&mut self, result: AnalysisResult) {
        let timestamp = (self.clock)();
        let item = HistoryItem {
            id: generate_id(timestamp),
            timestamp,
            result,
        };

        let mut items = self.list();
        items.insert(0, item);
        items.truncate(MAX_HISTORY_ITEMS);

        match self.write(&items) {
            Ok(()) => tracing::debug!(count = items.len(), "履歴を保存しました"),
            Err(e) => tracing::error!(error = %e, "履歴の保存に失敗しました"),
        }
    }

    /// 指定IDを削除し、残りの履歴を返す
    ///
    /// 存在しないIDは何もしない。書き込み失敗時は空の配列を返す。
    pub fn delete(&mut self, id: &str) -> Vec<HistoryItem> {
        let mut items = self.list();
        let before = items.len();
        items.retain(|item| item.id != id);

        if items.len() == before {
            tracing::debug!(id, "削除対象の履歴がありません");
            return items;
        }

        match self.write(&items) {
            Ok(()) => items,
            Err(e) => {
                tracing::error!(error = %e, id, "履歴の削除に失敗しました");
                Vec::new()
            }
        }
    }

    /// 履歴を全て削除
    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            tracing::error!(error = %e, "履歴の全削除に失敗しました");
        }
    }

    fn read(&self) -> Result<Vec<HistoryItem>> {
        match self.store.get(HISTORY_KEY)? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Vec::new()),
        }
    }

    fn write(&mut self, items: &[HistoryItem]) -> Result<()> {
        let content = serde_json::to_string(items)?;
        self.store.set(HISTORY_KEY, &content)
    }
}

/// 履歴ID生成: epoch millis + ランダムな英数字9文字
///
/// 同一ミリ秒内の衝突を避けるための簡易的なもの。
pub fn generate_id(timestamp: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}{}", timestamp, suffix)
}
