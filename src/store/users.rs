// In-memory user directory

use crate::domain::{CreateUser, UpdateUser, User};
use crate::errors::{AppError, Result};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;

struct Directory {
    users: HashMap<u64, User>,
    next_id: u64,
}

/// Volatile user store shared by all request handlers.
///
/// The whole directory lives behind one RwLock: reads (get/list) take a
/// shared lock, writes take an exclusive one. Contents are reset on
/// process restart.
pub struct UserStore {
    inner: RwLock<Directory>,
}

impl UserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Directory {
                users: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a store pre-populated with the well-known fixture user
    pub fn seeded() -> Self {
        let store = Self::new();

        {
            let mut directory = store.inner.write();
            directory.users.insert(
                2,
                User {
                    id: 2,
                    email: "janet.weaver@reqres.in".to_string(),
                    first_name: "Janet".to_string(),
                    last_name: "Weaver".to_string(),
                    avatar: "https://reqres.in/img/faces/2-image.jpg".to_string(),
                    created_at: Utc::now(),
                    updated_at: None,
                },
            );
            directory.next_id = 3;
        }

        store
    }

    /// Get a user by ID
    pub fn get(&self, id: u64) -> Result<User> {
        let directory = self.inner.read();
        directory
            .users
            .get(&id)
            .cloned()
            .ok_or(AppError::UserNotFound(id))
    }

    /// List all users, ordered by ID for stable pagination
    pub fn list(&self) -> Vec<User> {
        let directory = self.inner.read();
        let mut users: Vec<User> = directory.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        users
    }

    /// Create a new user, rejecting duplicate email addresses
    pub fn create(&self, payload: CreateUser) -> Result<User> {
        let mut directory = self.inner.write();

        if directory
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&payload.email))
        {
            return Err(AppError::Validation("Email already registered".to_string()));
        }

        let id = directory.next_id;
        directory.next_id += 1;

        let user = User {
            id,
            email: payload.email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            avatar: payload.avatar,
            created_at: Utc::now(),
            updated_at: None,
        };

        directory.users.insert(id, user.clone());

        Ok(user)
    }

    /// Apply a partial update to an existing user
    pub fn update(&self, id: u64, changes: UpdateUser) -> Result<User> {
        let mut directory = self.inner.write();

        if !directory.users.contains_key(&id) {
            return Err(AppError::UserNotFound(id));
        }

        // Reject an email change that collides with another user
        if let Some(email) = &changes.email {
            if directory
                .users
                .values()
                .any(|u| u.id != id && u.email.eq_ignore_ascii_case(email))
            {
                return Err(AppError::Validation("Email already registered".to_string()));
            }
        }

        let user = directory
            .users
            .get_mut(&id)
            .ok_or(AppError::UserNotFound(id))?;

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(avatar) = changes.avatar {
            user.avatar = avatar;
        }

        user.updated_at = Some(Utc::now());

        Ok(user.clone())
    }

    /// Delete a user by ID
    pub fn delete(&self, id: u64) -> Result<()> {
        let mut directory = self.inner.write();
        directory
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::UserNotFound(id))
    }

    /// Number of users currently in the directory
    pub fn len(&self) -> usize {
        self.inner.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
