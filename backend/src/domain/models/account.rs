use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Customer,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Customer => "customer",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "customer" => Ok(AccountRole::Customer),
            other => Err(anyhow!("Unknown account role: {}", other)),
        }
    }
}

/// Customer record written once at sign-up
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}
