// HTTPエンドポイント
//
// GET /repos                                → リポジトリ一覧の中継
// GET /repositories/{repoName}/labfiles     → ラボファイルのツリー

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use log::info;
use std::sync::Arc;

use crate::config::Config;
use crate::error::ProxyError;
use crate::github::GitHubApi;
use crate::labs::{self, LabItem};
use crate::repos;

/// ハンドラ間で共有する状態。起動後は変更しない
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub github: Arc<dyn GitHubApi>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/repos", get(list_repos))
        .route("/repositories/{repo_name}/labfiles", get(lab_files))
        .with_state(state)
}

async fn list_repos(State(state): State<AppState>) -> Result<Response, ProxyError> {
    info!("➡️ GET /repos");

    let response = repos::list_repositories(
        state.github.as_ref(),
        state.config.github_account.as_deref(),
        state.config.account_kind,
    )
    .await?;

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body,
    )
        .into_response())
}

async fn lab_files(
    State(state): State<AppState>,
    Path(repo_name): Path<String>,
) -> Result<Json<Vec<LabItem>>, ProxyError> {
    info!("➡️ GET /repositories/{}/labfiles", repo_name);

    let items = labs::build_lab_tree(
        state.github.as_ref(),
        &state.config.lab_org,
        &repo_name,
        &state.config.lab_base_path,
        state.config.concurrency,
    )
    .await?;

    Ok(Json(items))
}
