use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "label-scan")]
#[command(about = "成分ラベルAI解析・解析履歴ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ラベル画像を解析
    Analyze {
        /// 画像ファイルのパス（`-` で標準入力からBase64/Data URLを読む）
        #[arg(required = true)]
        image: String,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,

        /// 履歴に保存しない
        #[arg(long)]
        no_save: bool,

        /// 出力言語（省略時は設定値）
        #[arg(short, long)]
        language: Option<String>,
    },

    /// 解析履歴
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 出力言語を設定
        #[arg(long)]
        set_language: Option<String>,

        /// モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// 履歴一覧（新しい順）
    List {
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 履歴の解析結果を表示
    Show {
        #[arg(required = true)]
        id: String,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 履歴を1件削除
    Delete {
        #[arg(required = true)]
        id: String,
    },

    /// 履歴を全て削除
    Clear {
        /// 確認せずに削除
        #[arg(short, long)]
        yes: bool,
    },
}
