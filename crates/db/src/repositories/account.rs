//! Account repository for chart of accounts database operations.

use std::collections::HashMap;

use chrono::Utc;
use mandir_core::ledger::AccountInfo;
use mandir_shared::types::AccountId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{accounts, journal_lines, sea_orm_active_enums::AccountType};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Account code already exists.
    #[error("Account code already exists: {0}")]
    DuplicateCode(String),

    /// Account type cannot change once the account has journal lines.
    #[error("Cannot change account type: account {0} has journal lines")]
    TypeChangeNotAllowed(Uuid),

    /// Account cannot be deactivated or typed while used as a parent.
    #[error("Account {0} has child accounts")]
    HasChildren(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code (unique).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Optional parent account for grouping.
    pub parent_id: Option<Uuid>,
}

/// Account repository for chart of accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is already taken, the parent does not
    /// exist, or the database operation fails.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(&input.code))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AccountError::DuplicateCode(input.code));
        }

        if let Some(parent_id) = input.parent_id {
            accounts::Entity::find_by_id(parent_id)
                .one(&self.db)
                .await?
                .ok_or(AccountError::NotFound(parent_id))?;
        }

        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(AccountId::new().0),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type),
            parent_id: Set(input.parent_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Finds an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        let mut query = accounts::Entity::find();
        if !include_inactive {
            query = query.filter(accounts::Column::IsActive.eq(true));
        }
        Ok(query
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?)
    }

    /// Renames an account or changes its type.
    ///
    /// The type can only change while the account has no journal lines;
    /// after the first posting the classification is fixed.
    ///
    /// # Errors
    ///
    /// Returns `TypeChangeNotAllowed` when a type change is requested for
    /// an account with postings.
    pub async fn update_account(
        &self,
        id: Uuid,
        name: Option<String>,
        account_type: Option<AccountType>,
    ) -> Result<accounts::Model, AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        if let Some(ref new_type) = account_type {
            if *new_type != account.account_type && self.has_journal_lines(id).await? {
                return Err(AccountError::TypeChangeNotAllowed(id));
            }
        }

        let mut active: accounts::ActiveModel = account.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(account_type) = account_type {
            active.account_type = Set(account_type);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deactivates an account. History stays; new postings are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not found or the update fails.
    pub async fn deactivate_account(&self, id: Uuid) -> Result<accounts::Model, AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let mut active: accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Fetches posting-validation info for all active and inactive accounts,
    /// keyed by id. Used to feed the ledger validation closures.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn account_info_map(&self) -> Result<HashMap<Uuid, AccountInfo>, AccountError> {
        let accounts = accounts::Entity::find().all(&self.db).await?;
        Ok(accounts
            .into_iter()
            .map(|a| {
                (
                    a.id,
                    AccountInfo {
                        id: AccountId(a.id),
                        account_type: a.account_type.into(),
                        is_active: a.is_active,
                    },
                )
            })
            .collect())
    }

    async fn has_journal_lines(&self, account_id: Uuid) -> Result<bool, AccountError> {
        let count = journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(account_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}
