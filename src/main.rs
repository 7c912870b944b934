// lab-files-proxy - GitHubのラボ教材リポジトリからラボファイル一覧を返すHTTPプロキシ
// Azure Functionsのカスタムハンドラーとして動かすことを想定

mod config;
mod error;
mod github;
mod labs;
mod repos;
mod server;

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use log::info;
use simple_logger::SimpleLogger;

use config::{Args, Config};
use github::GitHubClient;
use server::AppState;

// メイン関数
#[tokio::main]
async fn main() -> Result<()> {
    // .envファイルを読み込み
    dotenv().ok();

    // コマンドライン引数・環境変数を解析
    let config = Config::from(Args::parse());

    // ロガー初期化
    SimpleLogger::new()
        .with_level(config.log_level)
        .init()
        .context("ロガーの初期化に失敗")?;

    let github_client = GitHubClient::new(&config).context("GitHubクライアントの作成に失敗")?;

    info!("🚀 lab-files-proxy 起動中...");
    info!("GitHub API: {}", config.github_api_url);
    info!("ラボ取得元: {}/*/{}", config.lab_org, config.lab_base_path);
    info!(
        "一覧対象アカウント: {} ({:?})",
        config.github_account.as_deref().unwrap_or("未設定"),
        config.account_kind
    );
    if config.github_token.is_none() {
        info!("トークン未設定のため匿名でアクセスします（レート制限に注意）");
    }

    let addr = SocketAddr::new(config.host, config.port);
    let state = AppState {
        config: Arc::new(config),
        github: Arc::new(github_client),
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("{} で待ち受けできません", addr))?;
    info!("✅ 待ち受け開始: http://{}", addr);

    axum::serve(listener, server::router(state)).await?;

    Ok(())
}
