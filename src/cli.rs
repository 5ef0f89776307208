use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "画像ギャラリー クライアント（一覧・登録・プレビュー）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// APIのベースURL（設定ファイルより優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 登録済み画像の一覧を表示
    List {
        /// 取得するページ数
        #[arg(short, long, default_value = "1")]
        pages: usize,

        /// 最後のページまで取得
        #[arg(short, long, conflicts_with = "pages")]
        all: bool,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 画像を登録
    Upload {
        /// タイトル（2〜20文字）
        #[arg(short, long)]
        title: String,

        /// 説明（65文字以内）
        #[arg(short, long)]
        description: String,

        /// 画像ファイル（JPEG/PNG/GIF、10MB未満）。画像ホストへアップロードしてから登録する
        #[arg(short, long)]
        file: PathBuf,
    },

    /// 対話的に一覧を閲覧・プレビュー
    Browse,

    /// 設定を表示/編集
    Config {
        /// APIのベースURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 画像ホストのAPIキーを設定
        #[arg(long)]
        set_host_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
