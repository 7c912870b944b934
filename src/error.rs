// HTTPレスポンスに変換されるエラー

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// 必須パラメータや設定の不足
    #[error("{0}")]
    ClientInput(String),

    /// GitHubが返したステータスをそのまま返す
    #[error("GitHubがステータス {status} を返しました")]
    Upstream { status: u16 },

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::ClientInput(_) => StatusCode::BAD_REQUEST,
            // 不正なコードが来ることはまずないが、来たら上流の異常として扱う
            ProxyError::Upstream { status } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            // 本文は加工しない
            ProxyError::Upstream { .. } => status.into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}
