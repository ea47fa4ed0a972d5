use async_trait::async_trait;
use critica_model::{NewUser, Page, PageRequest, User, UserId};

use crate::error::Result;

#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Username and email are stored lowercase. A unique-key clash is
    /// reported as `AlreadyExists`.
    async fn insert(&self, user: &NewUser) -> Result<User>;
    async fn get(&self, id: UserId) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list(&self, page: PageRequest, include_inactive: bool) -> Result<Page<User>>;
    /// Returns false when the user does not exist.
    async fn deactivate(&self, id: UserId) -> Result<bool>;
}
