//! Account service - sign-up, sign-in and token authentication.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::error::{DomainError, DomainResult, StorageError};
use crate::metrics::record_mutation;
use crate::models::{NewUser, User, new_token};
use crate::ports::Repositories;

/// Prefix of an `Authorization` value carrying a token.
const BEARER_PREFIX: &str = "Bearer ";

/// Sign-up fields.
#[derive(Debug, Clone)]
pub struct NewUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Outcome of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub token: String,
    pub user: User,
}

/// Extract the token from an `Authorization` header value.
///
/// Only `Bearer <token>` is recognised; anything else is anonymous.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[derive(Clone)]
pub struct AccountService {
    repositories: Arc<dyn Repositories>,
}

impl AccountService {
    pub fn new(repositories: Arc<dyn Repositories>) -> Self {
        Self { repositories }
    }

    /// Register a user with a freshly generated token.
    #[instrument(skip_all, fields(email = %input.email))]
    pub async fn create_user(&self, input: NewUserInput) -> DomainResult<User> {
        let email = input.email.clone();
        let result = self
            .repositories
            .users()
            .insert_user(NewUser {
                name: input.name,
                password: input.password,
                email: input.email,
                token: new_token(),
            })
            .await;

        match result {
            Ok(user) => {
                record_mutation("create_user", "ok");
                info!(user_id = user.id, "User created");
                Ok(user)
            }
            Err(StorageError::ConstraintViolation(_)) => {
                record_mutation("create_user", "rejected");
                warn!("Email already registered");
                Err(DomainError::DuplicateEmail(email))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Exchange an email and password for the user's token.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> DomainResult<SignIn> {
        let user = self
            .repositories
            .users()
            .get_user_by_email(email)
            .await?
            .filter(|user| user.password == password);

        let Some(user) = user else {
            record_mutation("signin_user", "rejected");
            debug!("Sign-in refused");
            return Err(DomainError::InvalidCredentials);
        };

        record_mutation("signin_user", "ok");
        Ok(SignIn {
            token: user.token.clone(),
            user,
        })
    }

    /// Resolve the viewer behind an optional token.
    ///
    /// No token means anonymous. A token that matches nobody is an error,
    /// not an anonymous request.
    pub async fn authenticate(&self, token: Option<&str>) -> DomainResult<Option<User>> {
        let Some(token) = token else {
            return Ok(None);
        };

        match self.repositories.users().get_user_by_token(token).await? {
            Some(user) => Ok(Some(user)),
            None => Err(DomainError::UnknownToken),
        }
    }
}
