// Supabase接続設定
//
// PostgRESTエンドポイント（{SUPABASE_URL}/rest/v1）とサービスロールキーを管理

use url::Url;

use crate::infrastructure::config::{required_env, ConfigError};

/// Supabase接続設定
///
/// # フィールド
/// - `base_url`: SupabaseプロジェクトURL (例: "https://xxxx.supabase.co")
/// - `service_role_key`: RLSをバイパスする特権キー（apikey/Authorizationヘッダーに使用）
#[derive(Clone)]
pub struct SupabaseConfig {
    base_url: Url,
    service_role_key: String,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SupabaseConfig {
    /// 新しい設定を作成
    ///
    /// # 引数
    /// - `base_url`: SupabaseプロジェクトURL
    /// - `service_role_key`: サービスロールキー
    pub fn new(base_url: &str, service_role_key: impl Into<String>) -> Result<Self, ConfigError> {
        // 末尾スラッシュを揃えておかないとUrl::joinが最後のセグメントを置き換える
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| ConfigError::InvalidEnvVar {
            name: "SUPABASE_URL".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            base_url,
            service_role_key: service_role_key.into(),
        })
    }

    /// 環境変数から設定を読み込み
    ///
    /// # 環境変数
    /// - `SUPABASE_URL`: SupabaseプロジェクトURL（必須）
    /// - `SUPABASE_SERVICE_ROLE_KEY`: サービスロールキー（必須）
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = required_env("SUPABASE_URL")?;
        let service_role_key = required_env("SUPABASE_SERVICE_ROLE_KEY")?;
        Self::new(&base_url, service_role_key)
    }

    /// プロジェクトURLを取得
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// サービスロールキーを取得
    pub fn service_role_key(&self) -> &str {
        &self.service_role_key
    }

    /// テーブルのPostgRESTエンドポイントURLを構築
    ///
    /// # 戻り値
    /// 例: "https://xxxx.supabase.co/rest/v1/users"
    pub fn table_url(&self, table: &str) -> Url {
        let mut url = self.base_url.clone();
        // base_urlはhttp(s)なので常にパスセグメントを持つ
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["rest", "v1", table]);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_table_url_without_trailing_slash() {
        let config = SupabaseConfig::new("https://example.supabase.co", "key").unwrap();
        assert_eq!(
            config.table_url("users").as_str(),
            "https://example.supabase.co/rest/v1/users"
        );
    }

    #[test]
    fn test_table_url_with_trailing_slash() {
        let config = SupabaseConfig::new("https://example.supabase.co/", "key").unwrap();
        assert_eq!(
            config.table_url("group_members").as_str(),
            "https://example.supabase.co/rest/v1/group_members"
        );
    }

    #[test]
    fn test_table_url_with_path_prefix() {
        let config = SupabaseConfig::new("http://127.0.0.1:54321/proxy", "key").unwrap();
        assert_eq!(
            config.table_url("groups").as_str(),
            "http://127.0.0.1:54321/proxy/rest/v1/groups"
        );
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = SupabaseConfig::new("not a url", "key");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref name, .. }) if name == "SUPABASE_URL"
        ));
    }

    #[test]
    fn test_debug_hides_service_role_key() {
        let config = SupabaseConfig::new("https://example.supabase.co", "super-secret").unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("example.supabase.co"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    #[serial]
    fn test_from_env_success() {
        unsafe {
            std::env::set_var("SUPABASE_URL", "https://test.supabase.co");
            std::env::set_var("SUPABASE_SERVICE_ROLE_KEY", "service-key");
        }

        let config = SupabaseConfig::from_env().expect("設定の読み込みに失敗");

        assert_eq!(config.base_url(), "https://test.supabase.co/");
        assert_eq!(config.service_role_key(), "service-key");

        unsafe {
            std::env::remove_var("SUPABASE_URL");
            std::env::remove_var("SUPABASE_SERVICE_ROLE_KEY");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_missing_key() {
        unsafe {
            std::env::set_var("SUPABASE_URL", "https://test.supabase.co");
            std::env::remove_var("SUPABASE_SERVICE_ROLE_KEY");
        }

        let result = SupabaseConfig::from_env();

        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingEnvVar("SUPABASE_SERVICE_ROLE_KEY".to_string())
        );

        unsafe {
            std::env::remove_var("SUPABASE_URL");
        }
    }
}
