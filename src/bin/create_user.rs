/// ユーザー作成HTTP Lambdaエントリポイント
///
/// ユーザーをストアに作成し、Stripe顧客を作成してリンクする。
/// 設定とHTTPクライアントはコールドスタート時に1度だけ構築する。
use std::sync::Arc;

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use membership::application::{dispatch, CreateUserHandler};
use membership::infrastructure::{
    init_logging, ConfigError, PostgrestClient, StripeBillingClient, StripeConfig,
    SupabaseConfig, SupabaseUserRepository,
};
use tracing::{error, info};

type Handler = CreateUserHandler<SupabaseUserRepository, StripeBillingClient>;

/// 環境変数からハンドラーを構築
fn build_handler() -> Result<Handler, ConfigError> {
    let store = PostgrestClient::new(SupabaseConfig::from_env()?)?;
    let billing = StripeBillingClient::new(StripeConfig::from_env()?)?;
    Ok(CreateUserHandler::new(
        SupabaseUserRepository::new(store),
        billing,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    let handler = Arc::new(build_handler());
    match handler.as_ref() {
        Ok(_) => info!("create-user Lambda関数を初期化"),
        // 設定不足でも起動は続け、各リクエストに500を返す
        Err(e) => error!(error = %e, "create-user Lambda関数の設定が不足"),
    }

    run(service_fn(move |request: Request| {
        let handler = Arc::clone(&handler);
        async move { handle_request(request, &handler).await }
    }))
    .await
}

/// HTTPリクエストハンドラー
async fn handle_request(
    request: Request,
    handler: &Result<Handler, ConfigError>,
) -> Result<Response<Body>, Error> {
    info!(method = %request.method(), "create-userリクエスト受信");
    Ok(dispatch(&request, handler).await)
}
