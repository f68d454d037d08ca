//! エラーケーステスト
//!
//! 入力・設定・履歴まわりのエラー変換と表示を検証

use label_scan::analyzer::AnalysisError;
use label_scan::error::LabelScanError;
use label_scan::input;
use tempfile::tempdir;

/// 存在しないファイルを読み込んだ場合
#[test]
fn test_load_nonexistent_image() {
    let result = input::load_image("/nonexistent/path/12345.jpg");
    assert!(matches!(result, Err(LabelScanError::FileNotFound(_))));
}

/// 中身が画像として扱えないテキスト
#[test]
fn test_load_invalid_data_url_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("label.txt");
    std::fs::write(&path, "data:image/png;base64,@@@").unwrap();

    let result = input::load_image(path.to_str().unwrap());
    assert!(result.is_err());
}

/// LabelScanErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        LabelScanError::Config("テスト設定エラー".to_string()),
        LabelScanError::MissingApiKey,
        LabelScanError::FileNotFound("label.jpg".to_string()),
        LabelScanError::ImageLoad("読めません".to_string()),
        LabelScanError::HistoryNotFound("abc".to_string()),
        LabelScanError::CliExecution("端末がありません".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// APIキー未設定時は設定方法を案内する
#[test]
fn test_missing_api_key_message() {
    let msg = LabelScanError::MissingApiKey.to_string();
    assert!(msg.contains("label-scan config"));
    assert!(msg.contains("GEMINI_API_KEY"));
}

/// 各種エラーからの変換
#[test]
fn test_error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: LabelScanError = io_err.into();
    assert!(matches!(err, LabelScanError::Io(_)));
}

#[test]
fn test_error_from_json() {
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let err: LabelScanError = json_err.into();
    assert!(matches!(err, LabelScanError::JsonParse(_)));
}

#[test]
fn test_error_from_common() {
    let err: LabelScanError = label_scan_common::Error::InvalidImage("empty".to_string()).into();
    assert!(matches!(err, LabelScanError::Common(_)));
    assert!(err.to_string().contains("empty"));
}

/// 解析エラーはメッセージをそのまま表示する
#[test]
fn test_error_from_analysis() {
    let analysis = AnalysisError::Decode("missing field `summary`".to_string());
    let expected = analysis.to_string();
    let err: LabelScanError = analysis.into();
    assert!(matches!(err, LabelScanError::Analysis(_)));
    assert_eq!(err.to_string(), expected);
}
