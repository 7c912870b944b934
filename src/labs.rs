// ラボファイル一覧の組み立て
//
// ベースパス直下のディレクトリを1階層だけたどり、
// 「フォルダ → Markdownファイル」の2階層のツリーを作る

use futures::{StreamExt, stream};
use log::{debug, error, info, warn};
use serde::{Serialize, Serializer};

use crate::error::ProxyError;
use crate::github::{FetchError, GitHubApi, RemoteEntry};

const MARKDOWN_SUFFIX: &str = ".md";

// GitHubのリポジトリ名に使える文字は英数字と '-' '_' '.' だけ
fn is_valid_repo_name(repo: &str) -> bool {
    repo != "."
        && repo != ".."
        && repo
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// ラボファイル（ツリーの葉）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabFile {
    /// 拡張子を除いたファイル名
    pub name: String,
    /// リポジトリルートからのパス
    pub path: String,
}

/// ラボファイルをまとめたフォルダ
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabFolder {
    /// 太字表記（`**名前**`）のディレクトリ名
    pub name: String,
    pub children: Vec<LabFile>,
}

/// レスポンスの1要素
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabItem {
    Folder(LabFolder),
    File(LabFile),
}

impl From<&RemoteEntry> for LabFile {
    fn from(entry: &RemoteEntry) -> Self {
        LabFile {
            name: entry
                .name
                .strip_suffix(MARKDOWN_SUFFIX)
                .unwrap_or(&entry.name)
                .to_string(),
            path: entry.path.clone(),
        }
    }
}

impl LabFolder {
    fn new(dir: &RemoteEntry, children: Vec<LabFile>) -> Self {
        LabFolder {
            name: format!("**{}**", dir.name),
            children,
        }
    }
}

impl LabItem {
    /// ファイルならそのパス
    pub fn path(&self) -> Option<&str> {
        match self {
            LabItem::File(file) => Some(&file.path),
            LabItem::Folder(_) => None,
        }
    }
}

// JSON上はフォルダもファイルも同じ形
// {name, path, isFolder, subItems}
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LabItemJson<'a> {
    name: &'a str,
    path: Option<&'a str>,
    is_folder: bool,
    sub_items: Option<&'a [LabFile]>,
}

impl Serialize for LabFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        LabItemJson {
            name: &self.name,
            path: Some(&self.path),
            is_folder: false,
            sub_items: None,
        }
        .serialize(serializer)
    }
}

impl Serialize for LabItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LabItem::File(file) => file.serialize(serializer),
            LabItem::Folder(folder) => LabItemJson {
                name: &folder.name,
                path: None,
                is_folder: true,
                sub_items: Some(&folder.children),
            }
            .serialize(serializer),
        }
    }
}

/// `org/repo` の `base_path` 以下にあるラボファイルのツリーを組み立てる
///
/// ベースパスの取得に失敗した場合はそのステータスを返す。
/// サブディレクトリの取得失敗はログに残し、そのフォルダを省くだけにする。
/// サブディレクトリは最大 `concurrency` 件ずつ並行して取得する。
pub async fn build_lab_tree(
    api: &dyn GitHubApi,
    org: &str,
    repo: &str,
    base_path: &str,
    concurrency: usize,
) -> Result<Vec<LabItem>, ProxyError> {
    if repo.trim().is_empty() {
        return Err(ProxyError::ClientInput(
            "リポジトリ名を指定してください".to_string(),
        ));
    }
    if !is_valid_repo_name(repo) {
        return Err(ProxyError::ClientInput(format!(
            "リポジトリ名が不正です: {}",
            repo
        )));
    }

    info!("🔍 ラボファイル一覧を取得中: {}/{}/{}", org, repo, base_path);

    let entries = api
        .list_contents(org, repo, base_path)
        .await
        .map_err(|e| {
            error!("❌ ラボ一覧取得エラー: {}/{}/{} - {}", org, repo, base_path, e);
            match e {
                FetchError::Status(status) => ProxyError::Upstream { status },
                other => ProxyError::Internal(format!(
                    "{} のラボ一覧を取得できませんでした: {}",
                    repo, other
                )),
            }
        })?;

    // サブディレクトリは並行して取得し、結果は元の並び順で受け取る
    let dirs: Vec<&RemoteEntry> = entries.iter().filter(|entry| entry.is_dir()).collect();
    let fetches: Vec<_> = dirs
        .into_iter()
        .map(|dir| fetch_lab_files(api, org, repo, dir))
        .collect();
    let mut outcomes = stream::iter(fetches)
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter();

    let mut items = Vec::new();
    for entry in &entries {
        if entry.is_dir() {
            let folder = outcomes
                .next()
                .and_then(|outcome| fold_folder(repo, entry, outcome));
            if let Some(folder) = folder {
                items.push(LabItem::Folder(folder));
            }
        } else if entry.is_markdown() {
            items.push(LabItem::File(LabFile::from(entry)));
        }
    }

    append_stray_lab_files(&mut items, &entries);

    info!("🗂️ ラボ項目数: {} ({}/{})", items.len(), org, repo);

    Ok(items)
}

// ディレクトリ直下のMarkdownだけを集める。孫ディレクトリはたどらない
async fn fetch_lab_files(
    api: &dyn GitHubApi,
    org: &str,
    repo: &str,
    dir: &RemoteEntry,
) -> Result<Vec<LabFile>, FetchError> {
    let entries = api.list_contents(org, repo, &dir.path).await?;

    Ok(entries
        .iter()
        .filter(|entry| entry.is_markdown())
        .map(LabFile::from)
        .collect())
}

// 取得結果をフォルダにする。失敗や空のディレクトリは省く
fn fold_folder(
    repo: &str,
    dir: &RemoteEntry,
    outcome: Result<Vec<LabFile>, FetchError>,
) -> Option<LabFolder> {
    match outcome {
        Ok(children) if children.is_empty() => {
            debug!("ラボファイルなし: {}/{}", repo, dir.path);
            None
        }
        Ok(children) => Some(LabFolder::new(dir, children)),
        Err(e) => {
            warn!("⚠️ サブディレクトリ取得エラー: {}/{} - {}", repo, dir.path, e);
            None
        }
    }
}

// ベースパス直下に置かれたMarkdownのうち、まだ出力にないものを追加する
fn append_stray_lab_files(items: &mut Vec<LabItem>, entries: &[RemoteEntry]) {
    let stray: Vec<LabItem> = entries
        .iter()
        .filter(|entry| entry.is_markdown())
        .filter(|entry| !items.iter().any(|item| item.path() == Some(entry.path.as_str())))
        .map(|entry| LabItem::File(LabFile::from(entry)))
        .collect();

    items.extend(stray);
}
