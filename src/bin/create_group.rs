/// グループ作成HTTP Lambdaエントリポイント
///
/// グループを作成し、管理者をメンバーとして登録する。
/// 管理者の登録に失敗した場合は作成したグループを削除する。
use std::sync::Arc;

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use membership::application::{dispatch, CreateGroupHandler};
use membership::infrastructure::{
    init_logging, ConfigError, PostgrestClient, SupabaseConfig, SupabaseGroupRepository,
    SupabaseMemberRepository, SupabaseUserRepository,
};
use tracing::{error, info};

type Handler =
    CreateGroupHandler<SupabaseUserRepository, SupabaseGroupRepository, SupabaseMemberRepository>;

/// 環境変数からハンドラーを構築
fn build_handler() -> Result<Handler, ConfigError> {
    let store = PostgrestClient::new(SupabaseConfig::from_env()?)?;
    Ok(CreateGroupHandler::new(
        SupabaseUserRepository::new(store.clone()),
        SupabaseGroupRepository::new(store.clone()),
        SupabaseMemberRepository::new(store),
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    let handler = Arc::new(build_handler());
    match handler.as_ref() {
        Ok(_) => info!("create-group Lambda関数を初期化"),
        Err(e) => error!(error = %e, "create-group Lambda関数の設定が不足"),
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
    info!(method = %request.method(), "create-groupリクエスト受信");
    Ok(dispatch(&request, handler).await)
}
