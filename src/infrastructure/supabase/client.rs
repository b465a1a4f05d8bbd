// PostgrestClient - Supabase PostgREST用HTTPクライアント
//
// テーブル単位のinsert / update / select / deleteを提供する。
// 書き込みは`Prefer: return=representation`で作成・更新後の行を受け取る。
// 再試行は行わない（失敗はそのまま呼び出し元へ返す）。

use super::config::SupabaseConfig;
use crate::infrastructure::config::ConfigError;
use crate::infrastructure::StoreError;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

/// リクエストタイムアウト（秒）
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// 接続タイムアウト（秒）
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// PostgRESTのエラーレスポンスボディ
#[derive(Debug, Default, Deserialize)]
struct PostgrestErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

/// PostgrestClient - Supabase REST APIクライアント
#[derive(Clone)]
pub struct PostgrestClient {
    client: Client,
    config: SupabaseConfig,
}

impl std::fmt::Debug for PostgrestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestClient")
            .field("base_url", &self.config.base_url())
            .finish_non_exhaustive()
    }
}

impl PostgrestClient {
    /// 設定からPostgrestClientを作成
    pub fn new(config: SupabaseConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 設定への参照を取得
    /// `col=eq.value` 形式のフィルター付きURLを構築
    fn filtered_url(&self, table: &str, filters: &[(&str, &str)]) -> Url {
        let mut url = self.config.table_url(table);
        {
            let mut query = url.query_pairs_mut();
            for (column, value) in filters {
                query.append_pair(column, &format!("eq.{value}"));
            }
        }
        url
    }

    /// 認証ヘッダー付きリクエストを構築
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let key = self.config.service_role_key();
        self.client
            .request(method, url)
            .header("apikey", key)
            .header("Authorization", format!("Bearer {key}"))
    }

    /// 行を作成し、作成された行を返す（POST /rest/v1/{table}）
    #[instrument(skip_all, fields(table = %table))]
    pub async fn insert<T, R>(&self, table: &str, row: &T) -> Result<R, StoreError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.config.table_url(table);
        debug!(url = %url, "行を作成");

        let response = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        Self::single_row(response).await
    }

    /// フィルターに合致する行を更新し、更新後の行を返す（PATCH /rest/v1/{table}?col=eq.v）
    #[instrument(skip_all, fields(table = %table))]
    pub async fn update<T, R>(
        &self,
        table: &str,
        filters: &[(&str, &str)],
        changes: &T,
    ) -> Result<R, StoreError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.filtered_url(table, filters);
        debug!(url = %url, "行を更新");

        let response = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(changes)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        Self::single_row(response).await
    }

    /// フィルターに合致する1行を取得（GET /rest/v1/{table}?select=*&col=eq.v&limit=1）
    ///
    /// 0行の場合は`Ok(None)`。フィルター値が列の型に合わない場合
    /// （uuid列に"missing"を渡すなど）も該当行なしとして`Ok(None)`。
    #[instrument(skip_all, fields(table = %table))]
    pub async fn select_one<R>(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<Option<R>, StoreError>
    where
        R: DeserializeOwned,
    {
        let mut url = self.filtered_url(table, filters);
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("limit", "1");
        debug!(url = %url, "行を取得");

        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        match Self::parse_rows::<R>(response).await {
            Ok(rows) => Ok(rows.into_iter().next()),
            Err(e) if e.is_invalid_input() => {
                debug!(error = %e, "フィルター値が列の型に合わないため該当行なし");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// フィルターに合致する行を削除（DELETE /rest/v1/{table}?col=eq.v）
    #[instrument(skip_all, fields(table = %table))]
    pub async fn delete(&self, table: &str, filters: &[(&str, &str)]) -> Result<(), StoreError> {
        let url = self.filtered_url(table, filters);
        debug!(url = %url, "行を削除");

        let response = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let response = Self::check_status(response).await?;
        debug!(status = %response.status(), "削除完了");
        Ok(())
    }

    fn map_send_error(e: reqwest::Error) -> StoreError {
        error!(error = %e, "PostgRESTリクエスト送信に失敗");
        if e.is_connect() || e.is_timeout() {
            StoreError::ConnectionError(e.to_string())
        } else {
            StoreError::HttpError(e.to_string())
        }
    }

    /// エラーステータスをStoreError::Rejectedに変換
    async fn check_status(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %body, "PostgRESTエラー");

        let parsed: PostgrestErrorBody = serde_json::from_str(&body).unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            code: parsed.code,
            message: parsed.message.unwrap_or(body),
            details: parsed.details,
            hint: parsed.hint,
        })
    }

    async fn parse_rows<R: DeserializeOwned>(response: Response) -> Result<Vec<R>, StoreError> {
        let response = Self::check_status(response).await?;
        response.json().await.map_err(|e| {
            error!(error = %e, "レスポンスのデシリアライズに失敗");
            StoreError::DeserializationError(e.to_string())
        })
    }

    async fn single_row<R: DeserializeOwned>(response: Response) -> Result<R, StoreError> {
        let rows: Vec<R> = Self::parse_rows(response).await?;
        rows.into_iter().next().ok_or(StoreError::EmptyResult)
    }
}
