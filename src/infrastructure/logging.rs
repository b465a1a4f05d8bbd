/// ログ基盤モジュール
///
/// Lambda(CloudWatch)向けのJSON構造化ログを設定する。
/// ワークフローの各ステップはspan（workflow, step）で囲まれるため、
/// 現在のspanをログ行に含める。
use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// デフォルトのログレベル
const DEFAULT_LOG_LEVEL: &str = "info";

/// `RUST_LOG`が無ければデフォルトレベルのフィルターを返す
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Lambda環境向けのログサブスクライバーを初期化する
///
/// 複数回呼び出しても最初の1回のみ初期化する。
/// 他のサブスクライバーが既に登録されている場合は何もしない。
pub fn init_logging() {
    INIT.call_once(|| {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false);

        let _ = tracing_subscriber::registry()
            .with(env_filter(DEFAULT_LOG_LEVEL))
            .with(json_layer)
            .try_init();
    });
}

/// テスト用のログサブスクライバーを初期化する（人間が読みやすい形式）
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter("debug"))
            .with(fmt_layer)
            .try_init();
    });
}
