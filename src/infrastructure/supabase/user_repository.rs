// SupabaseUserRepository - usersテーブルのPostgREST実装
//
// usersテーブル上の課金顧客IDカラム名は`stripe_customer_id`。
// ドメインの`billing_customer_id`との対応はUserRowで吸収する。

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use super::client::PostgrestClient;
use crate::domain::{NewUser, User, UserStatus};
use crate::infrastructure::{StoreError, UserRepository};

const USERS_TABLE: &str = "users";

/// usersテーブルの行
#[derive(Debug, Deserialize)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    country: Option<String>,
    status: UserStatus,
    #[serde(default)]
    stripe_customer_id: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            nickname: row.nickname,
            date_of_birth: row.date_of_birth,
            address: row.address,
            country: row.country,
            status: row.status,
            billing_customer_id: row.stripe_customer_id,
            extra: row.extra,
        }
    }
}

/// insert時のボディ（未指定フィールドはnullで送る）
#[derive(Debug, Serialize)]
struct InsertUserRow<'a> {
    email: &'a str,
    name: &'a str,
    nickname: Option<&'a str>,
    date_of_birth: Option<NaiveDate>,
    address: Option<&'a str>,
    country: Option<&'a str>,
    status: &'a str,
}

impl<'a> From<&'a NewUser> for InsertUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            email: &user.email,
            name: &user.name,
            nickname: user.nickname.as_deref(),
            date_of_birth: user.date_of_birth,
            address: user.address.as_deref(),
            country: user.country.as_deref(),
            status: user.status.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
struct LinkCustomerRow<'a> {
    stripe_customer_id: &'a str,
}

/// usersテーブルのSupabase実装
#[derive(Debug, Clone)]
pub struct SupabaseUserRepository {
    client: PostgrestClient,
}

impl SupabaseUserRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserRepository for SupabaseUserRepository {
    #[instrument(skip_all)]
    async fn insert(&self, user: &NewUser) -> Result<User, StoreError> {
        let row: UserRow = self
            .client
            .insert(USERS_TABLE, &InsertUserRow::from(user))
            .await?;
        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn set_billing_customer_id(
        &self,
        user_id: &str,
        billing_customer_id: &str,
    ) -> Result<User, StoreError> {
        let row: UserRow = self
            .client
            .update(
                USERS_TABLE,
                &[("id", user_id)],
                &LinkCustomerRow {
                    stripe_customer_id: billing_customer_id,
                },
            )
            .await?;
        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = self
            .client
            .select_one(USERS_TABLE, &[("id", user_id)])
            .await?;
        Ok(row.map(User::from))
    }
}
