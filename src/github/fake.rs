// テスト用のGitHub API。ネットワークには出ない

use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use super::client::{FetchError, GitHubApi, RawResponse};
use super::schemas::{EntryType, RemoteEntry};
use crate::config::AccountKind;

/// 失敗のさせ方
#[derive(Clone, Copy, Debug)]
pub enum Failure {
    Status(u16),
    Malformed,
    Offline,
}

impl Failure {
    async fn into_error(self) -> FetchError {
        match self {
            Failure::Status(status) => FetchError::Status(status),
            Failure::Malformed => {
                FetchError::Decode(serde_json::from_str::<Vec<RemoteEntry>>("{").unwrap_err())
            }
            // URLが不正なのでsend()は接続前に失敗する
            Failure::Offline => FetchError::Transport(
                reqwest::Client::new()
                    .get("not a url")
                    .send()
                    .await
                    .unwrap_err(),
            ),
        }
    }
}

#[derive(Default)]
pub struct FakeGitHub {
    listings: HashMap<String, Result<Vec<RemoteEntry>, Failure>>,
    repositories: Option<Result<RawResponse, Failure>>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, path: &str, entries: Vec<RemoteEntry>) -> Self {
        self.listings.insert(path.to_string(), Ok(entries));
        self
    }

    pub fn with_failure(mut self, path: &str, failure: Failure) -> Self {
        self.listings.insert(path.to_string(), Err(failure));
        self
    }

    pub fn with_repositories(mut self, status: u16, body: &str) -> Self {
        self.repositories = Some(Ok(RawResponse {
            status,
            body: body.as_bytes().to_vec(),
        }));
        self
    }

    pub fn with_repositories_failure(mut self, failure: Failure) -> Self {
        self.repositories = Some(Err(failure));
        self
    }

    /// 受け取ったリクエストを到着順に返す
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// 同時に処理中だった list_contents の最大数
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn list_contents(
        &self,
        org: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<RemoteEntry>, FetchError> {
        self.record(format!("{}/{}:{}", org, repo, path));

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        // 他のリクエストにも順番を回して重なりを起こす
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.listings.get(path) {
            Some(Ok(entries)) => Ok(entries.clone()),
            Some(Err(failure)) => Err(failure.into_error().await),
            None => Err(FetchError::Status(404)),
        }
    }

    async fn list_repositories(
        &self,
        account: &str,
        kind: AccountKind,
    ) -> Result<RawResponse, FetchError> {
        self.record(format!("{:?}:{}", kind, account));

        match &self.repositories {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(failure)) => Err(failure.into_error().await),
            None => Err(FetchError::Status(404)),
        }
    }
}

pub fn dir(parent: &str, name: &str) -> RemoteEntry {
    entry(parent, name, EntryType::Dir)
}

pub fn file(parent: &str, name: &str) -> RemoteEntry {
    entry(parent, name, EntryType::File)
}

fn entry(parent: &str, name: &str, item_type: EntryType) -> RemoteEntry {
    RemoteEntry {
        name: name.to_string(),
        path: format!("{}/{}", parent, name),
        item_type,
    }
}
