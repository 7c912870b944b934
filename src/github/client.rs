// GitHubクライアント

use anyhow::{Result, bail};
use async_trait::async_trait;
use log::debug;
use reqwest::{Url, header};
use thiserror::Error;

use super::schemas::RemoteEntry;
use crate::config::{AccountKind, Config};

/// GitHub API呼び出しの失敗
#[derive(Debug, Error)]
pub enum FetchError {
    /// 2xx 以外のステータス
    #[error("GitHubがステータス {0} を返しました")]
    Status(u16),
    /// 接続失敗・タイムアウトなど
    #[error("GitHubへのリクエストに失敗: {0}")]
    Transport(#[source] reqwest::Error),
    /// 本文の受信に失敗
    #[error("レスポンス本文の読み込みに失敗: {0}")]
    Body(#[source] reqwest::Error),
    /// 想定外の形のJSON
    #[error("レスポンスの解析に失敗: {0}")]
    Decode(#[from] serde_json::Error),
}

/// 加工せずに中継するレスポンス
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// 使用するGitHub APIの操作
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// `path` 直下のファイルとディレクトリを取得
    async fn list_contents(
        &self,
        org: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<RemoteEntry>, FetchError>;

    /// ユーザーまたは組織のリポジトリ一覧をそのまま取得
    async fn list_repositories(
        &self,
        account: &str,
        kind: AccountKind,
    ) -> Result<RawResponse, FetchError>;
}

pub struct GitHubClient {
    client: reqwest::Client,
    api_url: Url,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let api_url = Url::parse(&config.github_api_url)?;
        // パスセグメントを積めないURL（mailto: など）は使えない
        if api_url.cannot_be_a_base() {
            bail!("GitHub APIのURLが不正です: {}", config.github_api_url);
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        // GitHubはUser-Agentのないリクエストを拒否する
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)?,
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if !config.timeout.is_zero() {
            builder = builder.timeout(config.timeout);
        }

        Ok(GitHubClient {
            client: builder.build()?,
            api_url,
            token: config.github_token.clone(),
        })
    }

    // 各セグメントはパーセントエンコードされるので、
    // '/' '?' '#' を含む名前でも別のエンドポイントには届かない
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn contents_url(&self, org: &str, repo: &str, path: &str) -> Url {
        let path = path.split('/').filter(|segment| !segment.is_empty());
        self.endpoint(["repos", org, repo, "contents"].into_iter().chain(path))
    }

    fn repositories_url(&self, account: &str, kind: AccountKind) -> Url {
        let scope = match kind {
            AccountKind::User => "users",
            AccountKind::Org => "orgs",
        };
        self.endpoint([scope, account, "repos"])
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, FetchError> {
        debug!("➡️ GET {}", url);

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        request.send().await.map_err(FetchError::Transport)
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn list_contents(
        &self,
        org: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<RemoteEntry>, FetchError> {
        let response = self.get(self.contents_url(org, repo, path)).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // reqwestのjson()だと解析失敗と受信失敗の区別がつかないため自前で解析
        let body = response.bytes().await.map_err(FetchError::Body)?;
        let entries = serde_json::from_slice(&body)?;

        Ok(entries)
    }

    async fn list_repositories(
        &self,
        account: &str,
        kind: AccountKind,
    ) -> Result<RawResponse, FetchError> {
        let response = self.get(self.repositories_url(account, kind)).await?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(FetchError::Body)?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
