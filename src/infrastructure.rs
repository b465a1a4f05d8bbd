// Infrastructure layer modules
pub mod billing_provider;
pub mod config;
pub mod group_repository;
pub mod logging;
pub mod store_error;
pub mod stripe;
pub mod supabase;
pub mod user_repository;

#[cfg(test)]
pub mod in_memory_store;

// Re-exports
pub use billing_provider::{BillingAddress, BillingError, BillingProvider, NewBillingCustomer};
pub use config::ConfigError;
pub use group_repository::{GroupRepository, MemberRepository};
pub use logging::init_logging;
pub use store_error::StoreError;
pub use stripe::{StripeBillingClient, StripeConfig};
pub use supabase::{
    PostgrestClient, SupabaseConfig, SupabaseGroupRepository, SupabaseMemberRepository,
    SupabaseUserRepository,
};
pub use user_repository::UserRepository;
