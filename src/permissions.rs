// src/permissions.rs
//
// Authorization Policy
//
// `authorize` is a pure function of (actor, action, resource). It is built
// from four capability predicates, each usable on its own:
//
// - is_admin_or_read_only
// - is_owner_or_admin
// - is_author_or_read_only
// - is_moderator_or_read_only
//
// Services call `enforce`, which turns a denial into the right error.

use uuid::Uuid;

use crate::domain::User;
use crate::error::{AppError, AppResult};

/// Who is making the request
#[derive(Debug, Clone)]
pub enum Actor {
    /// No bearer token was presented
    Anonymous,
    User(User),
}

impl Actor {
    pub fn user(&self) -> Option<&User> {
        match self {
            Actor::Anonymous => None,
            Actor::User(user) => Some(user),
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.user().map(|u| u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::User(_))
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    pub fn is_moderator(&self) -> bool {
        self.user().is_some_and(User::is_moderator)
    }

    /// The authenticated user, or `Unauthenticated`
    pub fn require_user(&self) -> AppResult<&User> {
        self.user().ok_or(AppError::Unauthenticated)
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Anonymous => write!(f, "anonymous"),
            Actor::User(user) => write!(f, "{}", user.username),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Action {
    /// Read-only actions
    pub fn is_safe(self) -> bool {
        matches!(self, Action::List | Action::Retrieve)
    }
}

/// What the action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Category,
    Genre,
    Title,
    /// `author_id` is `None` when acting on the collection (list/create)
    Review { author_id: Option<Uuid> },
    Comment { author_id: Option<Uuid> },
    /// The user directory as a whole (list/create)
    Users,
    /// One user account addressed by username
    UserAccount { user_id: Uuid },
    /// The actor's own profile
    OwnProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

// ============================================================================
// CAPABILITY PREDICATES
// ============================================================================

pub fn is_admin_or_read_only(actor: &Actor, action: Action) -> bool {
    action.is_safe() || actor.is_admin()
}

pub fn is_owner_or_admin(actor: &Actor, owner_id: Uuid) -> bool {
    actor.is_admin() || actor.id() == Some(owner_id)
}

pub fn is_author_or_read_only(actor: &Actor, action: Action, author_id: Option<Uuid>) -> bool {
    action.is_safe() || (author_id.is_some() && actor.id() == author_id)
}

pub fn is_moderator_or_read_only(actor: &Actor, action: Action) -> bool {
    action.is_safe() || actor.is_moderator()
}

// ============================================================================
// POLICY
// ============================================================================

pub fn authorize(actor: &Actor, action: Action, resource: Resource) -> Decision {
    let allowed = match resource {
        Resource::Category | Resource::Genre | Resource::Title => {
            is_admin_or_read_only(actor, action)
        }
        Resource::Review { author_id } | Resource::Comment { author_id } => match action {
            Action::List | Action::Retrieve => true,
            Action::Create => actor.is_authenticated(),
            // admins pass even when their role alone does not make them moderators
            Action::Update | Action::Delete => {
                is_author_or_read_only(actor, action, author_id)
                    || is_moderator_or_read_only(actor, action)
                    || actor.is_admin()
            }
        },
        Resource::Users => actor.is_admin(),
        Resource::UserAccount { user_id } => is_owner_or_admin(actor, user_id),
        Resource::OwnProfile => actor.is_authenticated(),
    };
    Decision::from(allowed)
}

/// Map a denial to `Unauthenticated` for anonymous actors and `Forbidden` otherwise
pub fn enforce(actor: &Actor, action: Action, resource: Resource) -> AppResult<()> {
    match authorize(actor, action, resource) {
        Decision::Allow => Ok(()),
        Decision::Deny if !actor.is_authenticated() => Err(AppError::Unauthenticated),
        Decision::Deny => {
            log::warn!("Denied {:?} on {:?} for {}", action, resource, actor);
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    const ALL_ACTIONS: [Action; 5] = [
        Action::List,
        Action::Retrieve,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];

    fn user_with(role: Role, is_staff: bool, is_superuser: bool) -> Actor {
        let mut user = User::new(format!("{role}-user"), format!("{role}@example.com"));
        user.role = role;
        user.is_staff = is_staff;
        user.is_superuser = is_superuser;
        Actor::User(user)
    }

    fn plain() -> Actor {
        user_with(Role::User, false, false)
    }

    #[test]
    fn test_catalog_reads_are_open_writes_need_admin() {
        let actors = [
            (Actor::Anonymous, false),
            (plain(), false),
            (user_with(Role::Moderator, false, false), false),
            (user_with(Role::Admin, false, false), true),
            (user_with(Role::User, true, false), true),
            (user_with(Role::User, false, true), true),
        ];
        for resource in [Resource::Category, Resource::Genre, Resource::Title] {
            for (actor, may_write) in &actors {
                for action in ALL_ACTIONS {
                    let expected = Decision::from(action.is_safe() || *may_write);
                    assert_eq!(
                        authorize(actor, action, resource),
                        expected,
                        "{actor} {action:?} {resource:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_review_mutation_by_author_moderator_or_admin() {
        let author = plain();
        let stranger = plain();
        let resource = Resource::Review { author_id: author.id() };

        for action in [Action::Update, Action::Delete] {
            assert_eq!(authorize(&author, action, resource), Decision::Allow);
            assert_eq!(authorize(&stranger, action, resource), Decision::Deny);
            assert_eq!(authorize(&Actor::Anonymous, action, resource), Decision::Deny);
            assert_eq!(
                authorize(&user_with(Role::Moderator, false, false), action, resource),
                Decision::Allow
            );
            assert_eq!(
                authorize(&user_with(Role::Admin, false, false), action, resource),
                Decision::Allow
            );
        }
    }

    #[test]
    fn test_comment_create_needs_authentication_only() {
        let resource = Resource::Comment { author_id: None };
        assert_eq!(authorize(&plain(), Action::Create, resource), Decision::Allow);
        assert_eq!(authorize(&Actor::Anonymous, Action::Create, resource), Decision::Deny);
        assert_eq!(authorize(&Actor::Anonymous, Action::List, resource), Decision::Allow);
    }

    #[test]
    fn test_user_accounts_owner_or_admin() {
        let owner = plain();
        let resource = Resource::UserAccount { user_id: owner.id().unwrap() };

        assert_eq!(authorize(&owner, Action::Retrieve, resource), Decision::Allow);
        assert_eq!(authorize(&plain(), Action::Retrieve, resource), Decision::Deny);
        assert_eq!(
            authorize(&user_with(Role::Moderator, false, false), Action::Delete, resource),
            Decision::Deny
        );
        assert_eq!(
            authorize(&user_with(Role::Admin, false, false), Action::Delete, resource),
            Decision::Allow
        );
    }

    #[test]
    fn test_user_directory_is_admin_only() {
        for action in ALL_ACTIONS {
            assert_eq!(authorize(&plain(), action, Resource::Users), Decision::Deny);
            assert_eq!(
                authorize(&user_with(Role::User, true, false), action, Resource::Users),
                Decision::Allow
            );
        }
    }

    #[test]
    fn test_own_profile_needs_authentication() {
        assert_eq!(authorize(&plain(), Action::Update, Resource::OwnProfile), Decision::Allow);
        assert_eq!(
            authorize(&Actor::Anonymous, Action::Retrieve, Resource::OwnProfile),
            Decision::Deny
        );
    }

    #[test]
    fn test_enforce_maps_denials() {
        assert!(matches!(
            enforce(&Actor::Anonymous, Action::Delete, Resource::Category),
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            enforce(&plain(), Action::Delete, Resource::Category),
            Err(AppError::Forbidden)
        ));
        assert!(enforce(&plain(), Action::List, Resource::Category).is_ok());
    }
}
