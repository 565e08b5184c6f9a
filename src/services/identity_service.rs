// src/services/identity_service.rs
//
// Identity Service - Signup, Token Exchange, Authentication
//
// CRITICAL RULES:
// - Malformed input fails before any lookup
// - A user holds at most one active confirmation code
// - Mail delivery failures are logged, never returned to the caller
// - Tokens are HS256 JWTs naming the user id in `sub`

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::domain::fields::require_text;
use crate::domain::user::generate_confirmation_code;
use crate::domain::{timestamp_now, validate_email, validate_user, validate_username, User};
use crate::error::{AppError, AppResult};
use crate::integrations::{MailMessage, Mailer};
use crate::permissions::Actor;
use crate::repositories::UserRepository;

const CONFIRMATION_SUBJECT: &str = "Confirmation code";

/// Request a confirmation code for (username, email)
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
}

/// Echo of an accepted registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
}

/// Exchange a confirmation code for a bearer token
#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub username: String,
    pub confirmation_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BearerToken {
    pub token: String,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies bearer tokens
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::default(),
            ttl,
        }
    }

    pub fn issue(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Checks signature and expiry
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

pub struct IdentityService {
    user_repo: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
    tokens: TokenIssuer,
    code_ttl: Duration,
    single_use_codes: bool,
}

impl IdentityService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        settings: &AuthSettings,
    ) -> Self {
        Self {
            user_repo,
            mailer,
            tokens: TokenIssuer::new(
                settings.jwt_secret.as_bytes(),
                Duration::seconds(settings.token_ttl_secs),
            ),
            code_ttl: Duration::seconds(settings.code_ttl_secs),
            single_use_codes: settings.single_use_codes,
        }
    }

    /// Issue a fresh confirmation code, creating the user on first contact
    ///
    /// An existing (username, email) pair is reused; a pair that matches an
    /// existing user on only one side is a `Conflict`. The response echoes the
    /// submitted pair; the code goes to the stored address.
    pub fn request_registration(&self, request: RegistrationRequest) -> AppResult<Registration> {
        validate_username(&request.username)?;
        validate_email(&request.email)?;

        let code = generate_confirmation_code();

        let user = match self.find_registrant(&request.username, &request.email)? {
            Some(existing) => self.reissue_code(existing, &code)?,
            None => self.create_registrant(&request, &code)?,
        };

        self.dispatch_code(&user, &code);

        Ok(Registration {
            username: request.username,
            email: request.email,
        })
    }

    pub fn exchange_token(&self, request: TokenRequest) -> AppResult<BearerToken> {
        require_text("username", &request.username)?;
        require_text("confirmation_code", &request.confirmation_code)?;

        let mut user = self
            .user_repo
            .get_by_username(&request.username)?
            .ok_or_else(|| AppError::not_found("User"))?;

        if !user.confirmation_code_matches(&request.confirmation_code, Utc::now(), self.code_ttl) {
            log::warn!("Rejected confirmation code for {}", user.username);
            return Err(AppError::InvalidCredential);
        }

        if self.single_use_codes {
            user.clear_confirmation_code();
            self.user_repo.update(&user)?;
        }

        let token = self.tokens.issue(&user)?;
        log::info!("Issued token for {}", user.username);

        Ok(BearerToken { token })
    }

    /// Resolve a bearer token into an actor. No token means anonymous.
    pub fn authenticate(&self, token: Option<&str>) -> AppResult<Actor> {
        let Some(token) = token else {
            return Ok(Actor::Anonymous);
        };

        let claims = self.tokens.verify(token).map_err(|e| {
            log::debug!("Token rejected: {}", e);
            AppError::Unauthenticated
        })?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthenticated)?;

        self.user_repo
            .get_by_id(user_id)?
            .map(Actor::User)
            .ok_or(AppError::Unauthenticated)
    }

    // ------------------------------------------------------------------------

    /// `Ok(None)` when neither the username nor the email is taken
    fn find_registrant(&self, username: &str, email: &str) -> AppResult<Option<User>> {
        if let Some(user) = self.user_repo.get_by_username_and_email(username, email)? {
            return Ok(Some(user));
        }
        if self.user_repo.get_by_username(username)?.is_some() {
            return Err(AppError::Conflict(
                "A user with this username already exists".to_string(),
            ));
        }
        if self.user_repo.get_by_email(email)?.is_some() {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }
        Ok(None)
    }

    fn reissue_code(&self, mut user: User, code: &str) -> AppResult<User> {
        user.issue_confirmation_code(code.to_string(), timestamp_now());
        self.user_repo.update(&user)?;
        log::info!("Reissued confirmation code for {}", user.username);
        Ok(user)
    }

    fn create_registrant(&self, request: &RegistrationRequest, code: &str) -> AppResult<User> {
        let mut user = User::new(request.username.clone(), request.email.clone());
        user.issue_confirmation_code(code.to_string(), timestamp_now());
        validate_user(&user)?;

        match self.user_repo.insert(&user) {
            Ok(()) => {
                log::info!("Registered user {}", user.username);
                Ok(user)
            }
            // lost a race against a concurrent signup: look again once
            Err(e) if e.is_unique_violation() => {
                match self.find_registrant(&user.username, &user.email)? {
                    Some(existing) => self.reissue_code(existing, code),
                    None => Err(AppError::Conflict(
                        "A user with this username or email already exists".to_string(),
                    )),
                }
            }
            Err(e) => Err(e),
        }
    }

    fn dispatch_code(&self, user: &User, code: &str) {
        let message = MailMessage {
            to: user.email.clone(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            body: format!("Hello {}, your confirmation code: {}!", user.username, code),
        };
        if let Err(e) = self.mailer.send(&message) {
            log::warn!("Could not send confirmation code to {}: {}", user.email, e);
        }
    }
}
