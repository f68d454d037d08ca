use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use label_scan::{analyzer, cli, config, error, input, logging, report, storage};
use analyzer::{Analyzer, GeminiClient};
use cli::{Cli, Commands, HistoryAction};
use config::Config;
use error::{LabelScanError, Result};
use label_scan_common::HistoryStore;
use std::time::Duration;
use storage::FileStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { image, json, no_save, language } => {
            let client = GeminiClient::from_config(&config)?;
            let language = language.unwrap_or_else(|| config.language.clone());
            let analyzer = Analyzer::new(client)
                .with_language(language)
                .with_temperature(config.temperature);

            let encoded = input::load_image(&image)?;

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message(format!("成分を解析中... ({})", analyzer.model().model()));
            spinner.enable_steady_tick(Duration::from_millis(100));

            let outcome = analyzer.analyze_encoded(&encoded).await;
            spinner.finish_and_clear();

            let result = match outcome {
                Ok(result) => result,
                Err(e) => {
                    eprintln!("✖ 解析できませんでした: {}", report::describe_failure(&e));
                    if cli.verbose {
                        eprintln!("  詳細: {}", e);
                    }
                    // 標準入力の画像は再実行で読めないので退避しておく
                    let retry_target = if image == input::STDIN_MARKER {
                        Config::config_dir()
                            .and_then(|dir| input::keep_for_retry(&encoded, &dir))
                            .map(|path| path.display().to_string())
                            .map_err(|e| tracing::warn!(error = %e, "再試行用の画像を保存できません"))
                            .ok()
                    } else {
                        Some(image.clone())
                    };
                    if let Some(target) = retry_target {
                        eprintln!("  再試行: label-scan analyze {}", target);
                    }
                    std::process::exit(1);
                }
            };

            // 履歴保存の失敗は解析結果の表示を妨げない
            if !no_save {
                let mut history = HistoryStore::new(FileStore::new(config.storage_path()?));
                history.save(result.clone());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", report::render_result(&result));
            }
        }

        Commands::History { action } => {
            let mut history = HistoryStore::new(FileStore::new(config.storage_path()?));

            match action {
                HistoryAction::List { json } => {
                    let items = history.list();
                    if json {
                        println!("{}", serde_json::to_string_pretty(&items)?);
                    } else {
                        print!("{}", report::render_history(&items));
                    }
                }

                HistoryAction::Show { id, json } => {
                    let item = history
                        .get(&id)
                        .ok_or_else(|| LabelScanError::HistoryNotFound(id.clone()))?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&item)?);
                    } else {
                        println!("{}  {}\n", item.id, report::format_timestamp(item.timestamp));
                        print!("{}", report::render_result(&item.result));
                    }
                }

                HistoryAction::Delete { id } => {
                    if history.get(&id).is_none() {
                        println!("該当する履歴がありません: {}", id);
                    } else {
                        let remaining = history.delete(&id);
                        if history.get(&id).is_none() {
                            println!("✔ 削除しました: {} (残り{}件)", id, remaining.len());
                        } else {
                            eprintln!("✖ 削除できませんでした: {}", id);
                        }
                    }
                }

                HistoryAction::Clear { yes } => {
                    let confirmed = yes
                        || dialoguer::Confirm::new()
                            .with_prompt("履歴を全て削除しますか？")
                            .default(false)
                            .interact()
                            .map_err(|e| LabelScanError::CliExecution(e.to_string()))?;
                    if confirmed {
                        history.clear();
                        println!("✔ 履歴を全て削除しました");
                    }
                }
            }
        }

        Commands::Config { set_api_key, set_language, set_model, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(language) = set_language {
                config.language = language;
                config.save()?;
                println!("✔ 出力言語を設定しました: {}", config.language);
            }

            if let Some(model) = set_model {
                config.model = model;
                config.save()?;
                println!("✔ モデルを設定しました: {}", config.model);
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  出力言語: {}", config.language);
                println!("  エンドポイント: {}", config.endpoint);
                println!("  履歴ファイル: {}", config.storage_path()?.display());
                println!(
                    "  APIキー: {}",
                    if config.get_api_key().is_ok() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(())
}
