use critica_model::{NewUser, Page, PageRequest, User, UserId, normalize_name};
use tracing::info;

use super::{deleted, found};
use crate::application::AppUnitOfWork;
use crate::error::{Aggregate, CatalogError, Result};

/// Registration, lookup and soft deletion of users.
#[derive(Debug, Clone, Copy)]
pub struct UserService<'a> {
    uow: &'a AppUnitOfWork,
}

impl<'a> UserService<'a> {
    pub fn new(uow: &'a AppUnitOfWork) -> Self {
        Self { uow }
    }

    pub async fn create(&self, user: NewUser) -> Result<User> {
        let username = normalize_name(&user.username);
        if self.uow.users.find_by_username(&username).await?.is_some() {
            return Err(CatalogError::already_exists(Aggregate::User, username));
        }
        let email = normalize_name(&user.email);
        if self.uow.users.find_by_email(&email).await?.is_some() {
            return Err(CatalogError::already_exists(Aggregate::User, email));
        }

        let created = self.uow.users.insert(&NewUser { username, email }).await?;
        info!(target: "critica::users", user_id = %created.id, "registered user");
        Ok(created)
    }

    pub async fn get(&self, id: UserId) -> Result<User> {
        found(self.uow.users.get(id).await?, Aggregate::User, id)
    }

    pub async fn list(&self, page: PageRequest, include_inactive: bool) -> Result<Page<User>> {
        self.uow.users.list(page, include_inactive).await
    }

    /// Flips `is_active`; likes and reviews stay in place.
    pub async fn deactivate(&self, id: UserId) -> Result<()> {
        deleted(self.uow.users.deactivate(id).await?, Aggregate::User, id)
    }
}
