use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::domain::models::{AccountRole, UserAccount};
use crate::storage::connection::DbConnection;
use crate::storage::traits::AccountStorage;

/// Repository for customer account documents
#[derive(Clone)]
pub struct AccountRepository {
    db: DbConnection,
}

impl AccountRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStorage for AccountRepository {
    async fn store_account(&self, account: &UserAccount) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, user_id, email, name, phone, role, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.id)
        .bind(&account.user_id)
        .bind(&account.email)
        .bind(&account.name)
        .bind(&account.phone)
        .bind(account.role.as_str())
        .bind(account.created_at.to_rfc3339())
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_account_by_user(&self, user_id: &str) -> Result<Option<UserAccount>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, email, name, phone, role, created_at
            FROM users
            WHERE user_id = ?
            ORDER BY ROWID
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => {
                let created_at: String = r.get("created_at");
                Ok(Some(UserAccount {
                    id: r.get("id"),
                    user_id: r.get("user_id"),
                    email: r.get("email"),
                    name: r.get("name"),
                    phone: r.get("phone"),
                    role: AccountRole::parse(&r.get::<String, _>("role"))?,
                    created_at: DateTime::parse_from_rfc3339(&created_at)
                        .context("Invalid account created_at")?
                        .with_timezone(&Utc),
                }))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_get_account() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repo = AccountRepository::new(db);

        let account = UserAccount {
            id: UserAccount::generate_id(),
            user_id: "uid-1".to_string(),
            email: "carl@example.com".to_string(),
            name: "Carl".to_string(),
            phone: "+15550001111".to_string(),
            role: AccountRole::Customer,
            created_at: Utc::now(),
        };
        repo.store_account(&account).await.unwrap();

        let loaded = repo.get_account_by_user("uid-1").await.unwrap().expect("Account should exist");
        assert_eq!(loaded.email, "carl@example.com");
        assert_eq!(loaded.role, AccountRole::Customer);
        assert!(repo.get_account_by_user("uid-2").await.unwrap().is_none());
    }
}
