//! 解析履歴ストアのテスト
//!
//! 件数上限・並び順・削除・破損データ時の縮退動作を検証

use label_scan::storage::FileStore;
use label_scan_common::{
    AnalysisResult, HistoryStore, Ingredient, IngredientStatus, KeyValueStore, MemoryStore,
    ProductType, HISTORY_KEY, MAX_HISTORY_ITEMS,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

fn result(name: &str, score: f64) -> AnalysisResult {
    AnalysisResult {
        product_name: name.to_string(),
        product_type: ProductType::Food,
        ingredients: vec![
            Ingredient {
                name: "sugar".to_string(),
                status: IngredientStatus::Warning,
                description: "high".to_string(),
            },
            Ingredient {
                name: "water".to_string(),
                status: IngredientStatus::Safe,
                description: "fine".to_string(),
            },
        ],
        summary: format!("summary of {}", name),
        overall_score: score,
    }
}

/// 呼ばれるたびに1秒進む時計
fn ticking_store<S: KeyValueStore>(store: S, start: i64) -> HistoryStore<S> {
    let now = Arc::new(AtomicI64::new(start));
    HistoryStore::new(store).with_clock(move || now.fetch_add(1000, Ordering::SeqCst))
}

/// 保存した順の逆（新しい順）で返る
#[test]
fn test_save_then_list_newest_first() {
    let mut history = ticking_store(MemoryStore::new(), 1_000);
    for i in 0..10 {
        history.save(result(&format!("p{}", i), i as f64));
    }

    let items = history.list();
    assert_eq!(items.len(), 10);
    let names: Vec<String> = items.iter().map(|i| i.result.product_name.clone()).collect();
    let expected: Vec<String> = (0..10).rev().map(|i| format!("p{}", i)).collect();
    assert_eq!(names, expected);

    let ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids.len(), 10);
}

/// 同一ミリ秒でもIDは重複しない
#[test]
fn test_unique_ids_with_frozen_clock() {
    let mut history = HistoryStore::new(MemoryStore::new()).with_clock(|| 5_000);
    for i in 0..MAX_HISTORY_ITEMS {
        history.save(result("same", i as f64));
    }
    let items = history.list();
    let ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids.len(), MAX_HISTORY_ITEMS);
}

/// 60件保存すると古い10件が捨てられる
#[test]
fn test_cap_evicts_oldest() {
    let mut history = ticking_store(MemoryStore::new(), 0);
    for i in 0..60 {
        history.save(result(&format!("p{}", i), 50.0));
    }

    let items = history.list();
    assert_eq!(items.len(), 50);
    assert_eq!(items[0].result.product_name, "p59");
    assert_eq!(items[49].result.product_name, "p10");
    assert!(items.iter().all(|i| i.result.product_name != "p9"));
    assert!(items.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
}

/// スコア 90, 40, 10 の順に保存 → 10, 40, 90 の順で返る
#[test]
fn test_three_scores_scenario() {
    let mut history = ticking_store(MemoryStore::new(), 1_700_000_000_000);
    history.save(result("first", 90.0));
    history.save(result("second", 40.0));
    history.save(result("third", 10.0));

    let items = history.list();
    let scores: Vec<f64> = items.iter().map(|i| i.result.overall_score).collect();
    assert_eq!(scores, vec![10.0, 40.0, 90.0]);

    let timestamps: Vec<i64> = items.iter().map(|i| i.timestamp).collect();
    assert_eq!(
        timestamps,
        vec![1_700_000_002_000, 1_700_000_001_000, 1_700_000_000_000]
    );
}

/// 保存した結果がそのまま取り出せる
#[test]
fn test_round_trip_deep_equal() {
    let mut history = HistoryStore::new(MemoryStore::new());
    let original = result("roundtrip", 72.5);
    history.save(original.clone());

    let items = history.list();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].result, original);
}

/// 削除は対象だけを取り除き、残りの順序を保つ
#[test]
fn test_delete_present_id() {
    let mut history = ticking_store(MemoryStore::new(), 0);
    for i in 0..5 {
        history.save(result(&format!("p{}", i), i as f64));
    }
    let before = history.list();
    let target = before[2].id.clone();

    let remaining = history.delete(&target);
    let expected: Vec<_> = before.iter().filter(|i| i.id != target).cloned().collect();
    assert_eq!(remaining, expected);
    assert_eq!(history.list(), expected);
}

/// 存在しないIDの削除は何も変えない
#[test]
fn test_delete_absent_id() {
    let mut history = ticking_store(MemoryStore::new(), 0);
    history.save(result("a", 1.0));
    history.save(result("b", 2.0));
    let before = history.list();

    let remaining = history.delete("no-such-id");
    assert_eq!(remaining, before);
    assert_eq!(history.list(), before);
}

#[test]
fn test_clear_removes_everything() {
    let mut history = HistoryStore::new(MemoryStore::new());
    history.save(result("a", 1.0));
    history.clear();

    assert!(history.list().is_empty());
    assert_eq!(history.store().get(HISTORY_KEY).unwrap(), None);
}

/// 破損データは空として扱う
#[test]
fn test_corrupted_blob_lists_empty() {
    let mut store = MemoryStore::new();
    store.set(HISTORY_KEY, "{not json").unwrap();
    let history = HistoryStore::new(store);
    assert!(history.list().is_empty());
}

/// 配列以外のJSONも空として扱う
#[test]
fn test_wrong_shape_lists_empty() {
    let mut store = MemoryStore::new();
    store.set(HISTORY_KEY, r#"{"id": "x"}"#).unwrap();
    let history = HistoryStore::new(store);
    assert!(history.list().is_empty());
}

/// 破損データの上に保存すると新しい履歴で置き換わる
#[test]
fn test_save_over_corrupted_blob() {
    let mut store = MemoryStore::new();
    store.set(HISTORY_KEY, "garbage").unwrap();
    let mut history = HistoryStore::new(store);

    history.save(result("fresh", 88.0));
    let items = history.list();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].result.product_name, "fresh");
}

/// 既存アプリ形式（整数スコア）の履歴も読める
#[test]
fn test_reads_existing_layout() {
    let blob = r#"[{
        "id": "1718000000000k3j9x8a1b",
        "timestamp": 1718000000000,
        "result": {
            "productName": "عصير",
            "productType": "Food",
            "ingredients": [{"name": "ماء", "status": "SAFE", "description": "آمن"}],
            "summary": "جيد",
            "overallScore": 85
        }
    }]"#;
    let mut store = MemoryStore::new();
    store.set(HISTORY_KEY, blob).unwrap();
    let history = HistoryStore::new(store);

    let items = history.list();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].result.overall_score, 85.0);
    assert_eq!(items[0].result.ingredients[0].status, IngredientStatus::Safe);
}

/// ファイルストアでもプロセスをまたいで残る
#[test]
fn test_file_store_survives_reopen() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("storage.json");

    {
        let mut history = ticking_store(FileStore::new(&path), 0);
        history.save(result("a", 10.0));
        history.save(result("b", 20.0));
    }

    let history = HistoryStore::new(FileStore::new(&path));
    let names: Vec<String> = history.list().into_iter().map(|i| i.result.product_name).collect();
    assert_eq!(names, vec!["b", "a"]);
}

/// ファイルが壊れていても list は空、save は失敗を飲み込む
#[test]
fn test_file_store_corruption_degrades() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "<<<broken>>>").unwrap();

    let mut history = HistoryStore::new(FileStore::new(&path));
    assert!(history.list().is_empty());
    history.save(result("lost", 10.0));
    assert!(history.list().is_empty());
    assert!(history.delete("anything").is_empty());
}
