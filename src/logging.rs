//! ログ出力の初期化
//!
//! RUST_LOG があればそれに従い、なければ warn（--verbose で debug）。
//! 出力先は標準エラー（標準出力は解析結果に使う）。

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "label_scan=debug,label_scan_common=debug"
    } else {
        "warn"
    }
}

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // 二重初期化（テスト等）は無視する
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
