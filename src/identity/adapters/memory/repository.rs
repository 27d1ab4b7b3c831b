//! In-memory repository for user accounts.

use crate::identity::{
    domain::{EmailAddress, User, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use crate::pagination::{Page, PageRequest};
use crate::store::InMemoryDatabase;
use crate::store::memory::sort_oldest_first;
use async_trait::async_trait;
use std::collections::HashMap;

/// User repository over the shared [`InMemoryDatabase`].
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    database: InMemoryDatabase,
}

impl InMemoryUserRepository {
    /// Creates a repository over `database`.
    #[must_use]
    pub const fn new(database: InMemoryDatabase) -> Self {
        Self { database }
    }
}

fn email_taken_by_other(users: &HashMap<UserId, User>, user: &User) -> bool {
    users
        .values()
        .any(|other| other.id() != user.id() && other.email() == user.email())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut tables = self
            .database
            .write()
            .map_err(UserRepositoryError::persistence)?;

        if tables.users.contains_key(&user.id()) {
            return Err(UserRepositoryError::DuplicateUser(user.id()));
        }
        if email_taken_by_other(&tables.users, user) {
            return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
        }

        tables.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut tables = self
            .database
            .write()
            .map_err(UserRepositoryError::persistence)?;

        if !tables.users.contains_key(&user.id()) {
            return Err(UserRepositoryError::NotFound(user.id()));
        }
        if email_taken_by_other(&tables.users, user) {
            return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
        }

        tables.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        let mut tables = self
            .database
            .write()
            .map_err(UserRepositoryError::persistence)?;

        if !tables.users.contains_key(&id) {
            return Err(UserRepositoryError::NotFound(id));
        }
        let referenced = tables.projects.values().any(|project| project.created_by() == id)
            || tables
                .tasks
                .values()
                .any(|task| task.created_by() == id || task.assigned_to() == id);
        if referenced {
            return Err(UserRepositoryError::StillReferenced(id));
        }

        tables.users.remove(&id);
        for project in tables.projects.values_mut() {
            project.forget_member(id);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let tables = self
            .database
            .read()
            .map_err(UserRepositoryError::persistence)?;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let tables = self
            .database
            .read()
            .map_err(UserRepositoryError::persistence)?;
        Ok(tables
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> UserRepositoryResult<Vec<User>> {
        let tables = self
            .database
            .read()
            .map_err(UserRepositoryError::persistence)?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    async fn search(
        &self,
        term: Option<&str>,
        page: PageRequest,
    ) -> UserRepositoryResult<Page<User>> {
        let tables = self
            .database
            .read()
            .map_err(UserRepositoryError::persistence)?;
        let needle = term.map(str::to_lowercase);
        let matches_term = |user: &User| {
            needle.as_deref().is_none_or(|fragment| {
                user.name().as_str().to_lowercase().contains(fragment)
                    || user.email().as_str().contains(fragment)
            })
        };
        let mut matches: Vec<User> = tables
            .users
            .values()
            .filter(|user| matches_term(user))
            .cloned()
            .collect();
        sort_oldest_first(&mut matches, |user| (user.created_at(), user.id()));
        Ok(page.slice(matches))
    }

    async fn list_active(&self) -> UserRepositoryResult<Vec<User>> {
        let tables = self
            .database
            .read()
            .map_err(UserRepositoryError::persistence)?;
        let mut active: Vec<User> = tables
            .users
            .values()
            .filter(|user| user.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()).then(a.id().cmp(&b.id())));
        Ok(active)
    }
}
