// GitHubモジュール - GitHub REST APIへのアクセスをまとめたモジュール

// サブモジュールをエクスポート
pub mod client;
pub mod schemas;

pub use client::{FetchError, GitHubApi, GitHubClient, RawResponse};
pub use schemas::RemoteEntry;

#[cfg(test)]
pub mod fake;
