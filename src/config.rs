// 起動時に一度だけ読み込む設定
//
// .env → 環境変数 → コマンドライン引数の順で値を解決し、
// 以降は不変の Config として各ハンドラに渡す

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::{net::IpAddr, time::Duration};

// コマンドライン引数の定義

#[derive(Parser, Debug)]
#[clap(
    name = "lab-files-proxy",
    about = "GitHubのリポジトリからラボ用Markdownの一覧を組み立てて返すプロキシ",
    version = "0.1.0"
)]
pub struct Args {
    /// GitHubのアクセストークン（未設定なら匿名でアクセス）
    #[clap(long, env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    /// /repos で一覧を取得するユーザー名または組織名
    #[clap(long, env = "GITHUB_ACCOUNT")]
    pub github_account: Option<String>,

    /// github_account の種別
    #[clap(long, env = "GITHUB_ACCOUNT_KIND", value_enum, default_value = "user")]
    pub github_account_kind: AccountKind,

    /// ラボ用リポジトリの所有者
    #[clap(long, env = "LAB_ORG", default_value = "MicrosoftLearning")]
    pub lab_org: String,

    /// ラボファイルを探すリポジトリ内のディレクトリ
    #[clap(long, env = "LAB_BASE_PATH", default_value = "Instructions/Labs")]
    pub lab_base_path: String,

    /// GitHub APIのベースURL
    #[clap(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,

    /// GitHubに送るUser-Agent
    #[clap(long, env = "GITHUB_USER_AGENT", default_value = "lab-files-proxy")]
    pub user_agent: String,

    /// GitHubへのリクエストのタイムアウト（秒）
    #[clap(long, env = "GITHUB_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// サブディレクトリを同時に取得する最大数
    #[clap(long, env = "GITHUB_CONCURRENCY", default_value = "5")]
    pub concurrency: usize,

    /// 待ち受けアドレス
    #[clap(long, env = "LAB_PROXY_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// 待ち受けポート（Azure Functionsのカスタムハンドラーから渡される）
    #[clap(long, env = "FUNCTIONS_CUSTOMHANDLER_PORT", default_value = "3000")]
    pub port: u16,

    /// ログレベル
    #[clap(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
}

/// リポジトリ一覧のエンドポイント種別
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AccountKind {
    /// GET /users/{id}/repos
    User,
    /// GET /orgs/{id}/repos
    Org,
}

/// 実行中に参照する設定
#[derive(Clone, Debug)]
pub struct Config {
    pub github_token: Option<String>,
    pub github_account: Option<String>,
    pub account_kind: AccountKind,
    pub lab_org: String,
    pub lab_base_path: String,
    pub github_api_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub concurrency: usize,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: LevelFilter,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            // 空文字は未設定として扱う
            github_token: non_empty(args.github_token),
            github_account: non_empty(args.github_account),
            account_kind: args.github_account_kind,
            lab_org: args.lab_org.trim().to_string(),
            lab_base_path: args.lab_base_path.trim().trim_matches('/').to_string(),
            github_api_url: args.github_api_url.trim().trim_end_matches('/').to_string(),
            user_agent: args.user_agent,
            timeout: Duration::from_secs(args.timeout_secs),
            // 0 だと取得が進まないので最低1
            concurrency: args.concurrency.max(1),
            host: args.host,
            port: args.port,
            log_level: args.log_level,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
