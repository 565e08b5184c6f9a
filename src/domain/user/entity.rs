use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// A registered account
///
/// Identity is (username, email); both are unique on their own, the email
/// case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Internal immutable identifier
    pub id: Uuid,

    pub username: String,

    pub email: String,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    pub bio: Option<String>,

    pub role: Role,

    /// Staff accounts get admin and moderator rights regardless of role
    pub is_staff: bool,

    /// Same as `is_staff` for authorization purposes
    pub is_superuser: bool,

    /// The single active confirmation code, overwritten on every signup request
    #[serde(skip_serializing)]
    pub confirmation_code: Option<String>,

    #[serde(skip_serializing)]
    pub confirmation_code_issued_at: Option<DateTime<Utc>>,

    pub date_joined: DateTime<Utc>,
}

/// Closed set of roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

/// Admin rights: admin role, or either override flag
pub fn is_admin(role: Role, is_staff: bool, is_superuser: bool) -> bool {
    role == Role::Admin || is_staff || is_superuser
}

/// Moderator rights: moderator role, or either override flag
pub fn is_moderator(role: Role, is_staff: bool, is_superuser: bool) -> bool {
    role == Role::Moderator || is_staff || is_superuser
}

/// Fresh opaque confirmation code: 8 lowercase hex characters
pub fn generate_confirmation_code() -> String {
    let mut code = Uuid::new_v4().simple().to_string();
    code.truncate(8);
    code
}

impl User {
    /// Create a plain user with no profile data and no active code
    pub fn new(username: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            first_name: None,
            last_name: None,
            bio: None,
            role: Role::User,
            is_staff: false,
            is_superuser: false,
            confirmation_code: None,
            confirmation_code_issued_at: None,
            date_joined: crate::domain::timestamp_now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        is_admin(self.role, self.is_staff, self.is_superuser)
    }

    pub fn is_moderator(&self) -> bool {
        is_moderator(self.role, self.is_staff, self.is_superuser)
    }

    /// Replace any previous code
    pub fn issue_confirmation_code(&mut self, code: String, now: DateTime<Utc>) {
        self.confirmation_code = Some(code);
        self.confirmation_code_issued_at = Some(now);
    }

    pub fn clear_confirmation_code(&mut self) {
        self.confirmation_code = None;
        self.confirmation_code_issued_at = None;
    }

    /// Exact match against the active code, which must not be older than `ttl`.
    /// Codes are compared in constant time.
    pub fn confirmation_code_matches(&self, candidate: &str, now: DateTime<Utc>, ttl: Duration) -> bool {
        let (Some(code), Some(issued_at)) = (&self.confirmation_code, self.confirmation_code_issued_at)
        else {
            return false;
        };
        let same: bool = code.as_bytes().ct_eq(candidate.as_bytes()).into();
        same && now - issued_at <= ttl
    }

    /// Apply a partial profile update. `None` leaves a field untouched.
    pub fn update_profile(
        &mut self,
        username: Option<String>,
        email: Option<String>,
        first_name: Option<Option<String>>,
        last_name: Option<Option<String>>,
        bio: Option<Option<String>>,
        role: Option<Role>,
    ) {
        if let Some(u) = username {
            self.username = u;
        }
        if let Some(e) = email {
            self.email = e;
        }
        if let Some(f) = first_name {
            self.first_name = f;
        }
        if let Some(l) = last_name {
            self.last_name = l;
        }
        if let Some(b) = bio {
            self.bio = b;
        }
        if let Some(r) = role {
            self.role = r;
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Moderator => write!(f, "moderator"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: [Role; 3] = [Role::User, Role::Moderator, Role::Admin];

    #[test]
    fn test_admin_predicate_all_combinations() {
        for role in ROLES {
            for is_staff in [false, true] {
                for is_superuser in [false, true] {
                    let expected = role == Role::Admin || is_staff || is_superuser;
                    assert_eq!(
                        is_admin(role, is_staff, is_superuser),
                        expected,
                        "role={role} staff={is_staff} superuser={is_superuser}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_moderator_predicate_all_combinations() {
        for role in ROLES {
            for is_staff in [false, true] {
                for is_superuser in [false, true] {
                    let expected = role == Role::Moderator || is_staff || is_superuser;
                    assert_eq!(
                        is_moderator(role, is_staff, is_superuser),
                        expected,
                        "role={role} staff={is_staff} superuser={is_superuser}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_admin_role_alone_is_not_moderator() {
        assert!(is_admin(Role::Admin, false, false));
        assert!(!is_moderator(Role::Admin, false, false));
    }

    #[test]
    fn test_role_round_trips_through_text() {
        for role in ROLES {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_generated_code_shape() {
        let code = generate_confirmation_code();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_code_match_is_exact_and_time_limited() {
        let mut user = User::new("alice".into(), "alice@example.com".into());
        let now = Utc::now();
        assert!(!user.confirmation_code_matches("", now, Duration::hours(1)));

        user.issue_confirmation_code("abcd1234".into(), now);
        assert!(user.confirmation_code_matches("abcd1234", now, Duration::hours(1)));
        assert!(!user.confirmation_code_matches("ABCD1234", now, Duration::hours(1)));
        assert!(!user.confirmation_code_matches("abcd123", now, Duration::hours(1)));
        assert!(!user.confirmation_code_matches("abcd12345", now, Duration::hours(1)));
        assert!(!user.confirmation_code_matches(
            "abcd1234",
            now + Duration::hours(2),
            Duration::hours(1)
        ));

        user.clear_confirmation_code();
        assert!(!user.confirmation_code_matches("abcd1234", now, Duration::hours(1)));
    }

    #[test]
    fn test_new_user_is_stamped_at_microsecond_precision() {
        use chrono::Timelike;

        let user = User::new("alice".into(), "alice@example.com".into());
        assert_eq!(user.date_joined.nanosecond() % 1_000, 0);
    }

    #[test]
    fn test_code_is_never_serialized() {
        let mut user = User::new("bob".into(), "bob@example.com".into());
        user.issue_confirmation_code("deadbeef".into(), Utc::now());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("deadbeef"));
    }
}
