// Supabaseリレーショナルストアモジュール
//
// PostgREST（{SUPABASE_URL}/rest/v1）経由でusers / groups / group_membersを操作する
// - PostgrestClient: 共通HTTPクライアント（サービスロールキーで認証）
// - SupabaseUserRepository: UserRepository実装
// - SupabaseGroupRepository / SupabaseMemberRepository: グループ系リポジトリ実装

mod client;
mod config;
mod group_repository;
mod user_repository;

pub use client::PostgrestClient;
pub use config::SupabaseConfig;
pub use group_repository::{SupabaseGroupRepository, SupabaseMemberRepository};
pub use user_repository::SupabaseUserRepository;
