// リポジトリ一覧の中継
//
// GitHubのレスポンスは解析せず、ステータスと本文をそのまま返す

use log::{error, info};

use crate::config::AccountKind;
use crate::error::ProxyError;
use crate::github::{FetchError, GitHubApi, RawResponse};

pub async fn list_repositories(
    api: &dyn GitHubApi,
    account: Option<&str>,
    kind: AccountKind,
) -> Result<RawResponse, ProxyError> {
    let account = match account.map(str::trim) {
        Some(account) if !account.is_empty() => account,
        _ => {
            return Err(ProxyError::ClientInput(
                "GITHUB_ACCOUNT にユーザー名または組織名を設定してください".to_string(),
            ));
        }
    };

    info!("📚 リポジトリ一覧を取得中: {} ({:?})", account, kind);

    api.list_repositories(account, kind).await.map_err(|e| {
        error!("❌ リポジトリ一覧取得エラー: {} - {}", account, e);
        match e {
            FetchError::Transport(_) => {
                ProxyError::Unavailable(format!("GitHubに接続できませんでした: {}", e))
            }
            // 一覧APIはステータスをそのまま返すので Status はここに来ない
            other => ProxyError::Internal(format!(
                "{} のリポジトリ一覧を読み込めませんでした: {}",
                account, other
            )),
        }
    })
}
