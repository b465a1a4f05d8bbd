// HTTPレスポンス生成
//
// すべてのレスポンスにCORSヘッダーを付与する。
// JSONレスポンスにはContent-Type: application/jsonを追加する。

use lambda_http::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use lambda_http::http::{Method, StatusCode};
use lambda_http::{Body, Request, Response};
use serde_json::Value;
use tracing::error;

use super::WorkflowError;

/// 許可するリクエストヘッダー
pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// CORSヘッダーを生成
///
/// - Access-Control-Allow-Origin: *
/// - Access-Control-Allow-Headers: authorization, x-client-info, apikey, content-type
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );

    headers
}

/// プリフライトリクエストか
pub fn is_preflight(request: &Request) -> bool {
    request.method() == Method::OPTIONS
}

/// プリフライトへの応答（200, ボディは"ok"）
pub fn preflight() -> Response<Body> {
    let mut response = Response::new(Body::Text("ok".to_string()));
    *response.headers_mut() = cors_headers();
    response
}

/// JSONレスポンスを生成
pub fn json_response(status: StatusCode, body: &Value) -> Response<Body> {
    let mut response = Response::new(Body::Text(body.to_string()));
    *response.status_mut() = status;

    let mut headers = cors_headers();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *response.headers_mut() = headers;

    response
}

/// ワークフローエラーをレスポンスに変換
pub fn error_response(err: &WorkflowError) -> Response<Body> {
    let status = err.status_code();
    if status.is_server_error() {
        error!(status = status.as_u16(), error = %err, "リクエスト処理に失敗");
    }
    json_response(status, &err.to_body())
}
