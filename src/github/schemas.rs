use serde::Deserialize;

/// GitHubのレスポンス型定義

/// コンテンツAPIが返すディレクトリ内のアイテム
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RemoteEntry {
    /// ファイル名またはディレクトリ名
    pub name: String,
    /// リポジトリルートからのパス
    pub path: String,
    /// アイテムタイプ（"file"や"dir"など）
    #[serde(rename = "type")]
    pub item_type: EntryType,
}

/// アイテムタイプ
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
    /// symlink や submodule など。たどらない
    #[serde(other)]
    Other,
}

impl RemoteEntry {
    pub fn is_dir(&self) -> bool {
        self.item_type == EntryType::Dir
    }

    /// Markdownファイルかどうか
    pub fn is_markdown(&self) -> bool {
        self.item_type == EntryType::File && self.name.ends_with(".md")
    }
}
