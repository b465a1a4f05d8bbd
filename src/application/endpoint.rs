// HTTPエンドポイント共通処理
//
// プリフライトの即時応答と、コールドスタート時の設定エラーの扱いを
// 3つのLambda関数で共通化する。

use async_trait::async_trait;
use lambda_http::{Body, Request, Response};
use tracing::error;

use super::http_response::{error_response, is_preflight, preflight};
use super::WorkflowError;
use crate::infrastructure::ConfigError;

/// HTTPリクエストを1つのワークフローとして処理するハンドラー
#[async_trait]
pub trait HttpWorkflow: Send + Sync {
    /// ボディのパースからレスポンス生成までを行う
    async fn handle(&self, request: &Request) -> Response<Body>;
}

/// リクエストをワークフローへ振り分ける
///
/// # 処理フロー
/// 1. OPTIONSならボディを見ずに200を返す
/// 2. 設定読み込みに失敗していれば、コラボレーターに触れず500を返す
/// 3. それ以外はワークフローに委譲
pub async fn dispatch<W: HttpWorkflow>(
    request: &Request,
    workflow: &Result<W, ConfigError>,
) -> Response<Body> {
    if is_preflight(request) {
        return preflight();
    }

    match workflow {
        Ok(workflow) => workflow.handle(request).await,
        Err(config_error) => {
            error!(error = %config_error, "設定が不足しているためリクエストを処理できない");
            error_response(&WorkflowError::Configuration(config_error.clone()))
        }
    }
}
