// src/services/user_service.rs
//
// User Service - Admin directory and self-service profile
//
// RULES:
// - Accounts are addressed by username
// - The directory is admin-only, except that owners may read and edit their own account
// - Only admins change roles; self-service edits keep the current role

use std::sync::Arc;

use crate::domain::{validate_user, Role, User};
use crate::error::{AppError, AppResult};
use crate::permissions::{enforce, Action, Actor, Resource};
use crate::repositories::UserRepository;

#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

/// Partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub role: Option<Role>,
}

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Ordered by username
    pub fn list_users(&self, actor: &Actor) -> AppResult<Vec<User>> {
        enforce(actor, Action::List, Resource::Users)?;
        self.user_repo.list_all()
    }

    pub fn create_user(&self, actor: &Actor, request: CreateUserRequest) -> AppResult<User> {
        enforce(actor, Action::Create, Resource::Users)?;

        let mut user = User::new(request.username, request.email);
        user.update_profile(
            None,
            None,
            Some(request.first_name),
            Some(request.last_name),
            Some(request.bio),
            request.role,
        );
        validate_user(&user)?;
        self.ensure_identity_free(&user)?;

        self.user_repo.insert(&user).map_err(Self::map_conflict)?;
        log::info!("{} created user {} ({})", actor, user.username, user.role);

        Ok(user)
    }

    pub fn get_user(&self, actor: &Actor, username: &str) -> AppResult<User> {
        let user = self.load_account(actor, username)?;
        enforce(actor, Action::Retrieve, Resource::UserAccount { user_id: user.id })?;
        Ok(user)
    }

    pub fn update_user(
        &self,
        actor: &Actor,
        username: &str,
        mut request: UpdateUserRequest,
    ) -> AppResult<User> {
        let user = self.load_account(actor, username)?;
        enforce(actor, Action::Update, Resource::UserAccount { user_id: user.id })?;

        if !actor.is_admin() {
            request.role = None;
        }
        self.apply_update(user, request)
    }

    pub fn delete_user(&self, actor: &Actor, username: &str) -> AppResult<()> {
        let user = self.load_account(actor, username)?;
        enforce(actor, Action::Delete, Resource::UserAccount { user_id: user.id })?;

        self.user_repo.delete(user.id)?;
        log::info!("{} deleted user {}", actor, user.username);
        Ok(())
    }

    /// The actor's own profile
    pub fn get_me(&self, actor: &Actor) -> AppResult<User> {
        enforce(actor, Action::Retrieve, Resource::OwnProfile)?;
        let me = actor.require_user()?;
        self.user_repo
            .get_by_id(me.id)?
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// Edit the actor's own profile. A requested role is ignored.
    pub fn update_me(&self, actor: &Actor, mut request: UpdateUserRequest) -> AppResult<User> {
        let me = self.get_me(actor)?;
        enforce(actor, Action::Update, Resource::OwnProfile)?;

        request.role = None;
        self.apply_update(me, request)
    }

    // ------------------------------------------------------------------------

    /// Anonymous callers are turned away before the lookup
    fn load_account(&self, actor: &Actor, username: &str) -> AppResult<User> {
        actor.require_user()?;
        self.user_repo
            .get_by_username(username)?
            .ok_or_else(|| AppError::not_found("User"))
    }

    fn apply_update(&self, mut user: User, request: UpdateUserRequest) -> AppResult<User> {
        user.update_profile(
            request.username,
            request.email,
            request.first_name,
            request.last_name,
            request.bio,
            request.role,
        );
        validate_user(&user)?;
        self.ensure_identity_free(&user)?;

        self.user_repo.update(&user).map_err(Self::map_conflict)?;
        Ok(user)
    }

    /// Username and email must not belong to anyone else
    fn ensure_identity_free(&self, user: &User) -> AppResult<()> {
        if let Some(other) = self.user_repo.get_by_username(&user.username)? {
            if other.id != user.id {
                return Err(AppError::Conflict(
                    "A user with this username already exists".to_string(),
                ));
            }
        }
        if let Some(other) = self.user_repo.get_by_email(&user.email)? {
            if other.id != user.id {
                return Err(AppError::Conflict(
                    "A user with this email already exists".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn map_conflict(error: AppError) -> AppError {
        if error.is_unique_violation() {
            AppError::Conflict("A user with this username or email already exists".to_string())
        } else {
            error
        }
    }
}
