use clap::Parser;
use gallery_common::Gallery;
use gallery_rust::{browse, cli, client, config, error, host, listing, scanner, upload};
use cli::{Cli, Commands};
use client::HttpImageApi;
use config::Config;
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("gallery_rust={0},gallery_common={0}", log_level))
        .with_target(false)
        .init();

    let mut config = Config::load()?;
    let base_url = cli.api_url.clone().unwrap_or_else(|| config.api_base_url());

    match cli.command {
        Commands::List { pages, all, json } => {
            let gallery = Gallery::new(HttpImageApi::new(&base_url)?);

            let spinner = spinner("画像を読み込み中...");
            let fetched = listing::fetch_pages(&gallery, if all { None } else { Some(pages) }).await;
            spinner.finish_and_clear();
            let fetched = fetched?;

            let items = gallery.items();
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                println!("🖼  {}件 ({}ページ)\n", items.len(), fetched);
                listing::print_images(&items);
                if gallery.has_more() {
                    println!("\n… 続きがあります（--all ですべて表示）");
                }
            }
        }

        Commands::Upload { title, description, file } => {
            println!("📤 画像登録\n");

            let image = scanner::read_image_file(&file)?;
            let host = host::ImgbbHost::new(config.image_host_url.clone(), config.get_host_key()?)?;
            let gallery = Gallery::new(HttpImageApi::new(&base_url)?);

            let spinner = spinner("アップロード中...");
            let request = upload::UploadRequest { title, description, image };
            let outcome = upload::run_upload(&gallery, &host, request).await;
            spinner.finish_and_clear();

            if !upload::report_outcome(&outcome) {
                std::process::exit(1);
            }
        }

        Commands::Browse => {
            let gallery = Gallery::new(HttpImageApi::new(&base_url)?);
            browse::run_browse(&gallery).await?;
        }

        Commands::Config { set_api_url, set_host_key, show } => {
            let mut changed = false;

            if let Some(url) = set_api_url {
                config.set_api_base_url(url)?;
                changed = true;
                println!("✔ APIのURLを設定しました");
            }

            if let Some(key) = set_host_key {
                config.set_host_key(key);
                changed = true;
                println!("✔ 画像ホストのAPIキーを設定しました");
            }

            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定:");
                println!("  API: {}", config.api_base_url());
                println!("  画像ホスト: {}", config.image_host_url);
                println!(
                    "  画像ホストのAPIキー: {}",
                    if config.get_host_key().is_ok() { "設定済み" } else { "未設定" }
                );
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
