pub mod password;
pub mod repo;

use crate::error::{WbError, WbResult};
use password::CleartextPassword;
use repo::User;

use entrait::entrait;
use uuid::Uuid;

/// Identifies a user. `UserId<Option<Uuid>>` is the "maybe logged in" variant
/// handed to every request handler.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UserId<T = Uuid>(pub T);

impl UserId {
    pub fn some(self) -> UserId<Option<Uuid>> {
        UserId(Some(self.0))
    }
}

impl UserId<Option<Uuid>> {
    pub fn none() -> Self {
        UserId(None)
    }

    pub fn require(self) -> WbResult<UserId> {
        self.0.map(UserId).ok_or(WbError::Unauthorized)
    }

    pub fn is(&self, user_id: UserId) -> bool {
        self.0 == Some(user_id.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(serde::Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: CleartextPassword,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewUser {
    fn validate(&self) -> WbResult<()> {
        if self.username.trim().is_empty() {
            return Err(WbError::Invalid("Username is required."));
        }
        if !self.email.contains('@') {
            return Err(WbError::Invalid("Invalid email address."));
        }
        if self.password.as_ref().chars().count() < MIN_PASSWORD_LENGTH {
            return Err(WbError::Invalid(
                "Password must be at least 6 characters long.",
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum SignupOutcome {
    Created(User),
    DuplicateUsername,
    DuplicateEmail,
}

/// A user together with the private part of their row.
#[derive(Clone, Debug)]
pub struct Account {
    pub user: User,
    pub email: String,
}

/// Form input for profile edits. Blank fields keep their current value.
#[derive(serde::Deserialize, Default)]
#[serde(default)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: String,
    pub location: String,
    pub password: String,
}

#[entrait(pub Signup)]
async fn signup(
    deps: &(impl password::HashPassword + repo::UserRepo),
    new_user: NewUser,
) -> WbResult<SignupOutcome> {
    new_user.validate()?;

    let password_hash = deps.hash_password(new_user.password).await?;
    let image_url = new_user.image_url.as_deref().and_then(non_blank);

    match deps
        .insert_user(&new_user.username, &new_user.email, password_hash, image_url)
        .await
    {
        Ok((user, _)) => {
            tracing::info!(username = %user.username, "user signed up");
            Ok(SignupOutcome::Created(user))
        }
        Err(WbError::UsernameTaken) => Ok(SignupOutcome::DuplicateUsername),
        Err(WbError::EmailTaken) => Ok(SignupOutcome::DuplicateEmail),
        Err(e) => Err(e),
    }
}

/// `None` for an unknown username or a wrong password.
#[entrait(pub Authenticate)]
async fn authenticate(
    deps: &(impl repo::UserRepo + password::VerifyPassword),
    username: &str,
    password: CleartextPassword,
) -> WbResult<Option<User>> {
    let Some((user, credentials)) = deps.find_user_credentials_by_username(username).await?
    else {
        return Ok(None);
    };

    match deps
        .verify_password(password, credentials.password_hash)
        .await
    {
        Ok(()) => Ok(Some(user)),
        Err(WbError::Unauthorized) => Ok(None),
        Err(e) => Err(e),
    }
}

#[entrait(pub FetchUser)]
async fn fetch_user(deps: &impl repo::UserRepo, user_id: UserId) -> WbResult<User> {
    deps.find_user_by_id(user_id)
        .await?
        .ok_or(WbError::UserNotFound)
}

#[entrait(pub FetchAccount)]
async fn fetch_account(deps: &impl repo::UserRepo, user_id: UserId) -> WbResult<Account> {
    let (user, credentials) = deps
        .find_user_credentials_by_id(user_id)
        .await?
        .ok_or(WbError::UserNotFound)?;

    Ok(Account {
        user,
        email: credentials.email,
    })
}

#[entrait(pub SearchUsers)]
async fn search_users(deps: &impl repo::UserRepo, query: Option<&str>) -> WbResult<Vec<User>> {
    deps.search_users(query.and_then(non_blank)).await
}

/// Applies the update only when `update.password` is the user's current password.
/// Returns `None` when it is not.
#[entrait(pub UpdateProfile)]
async fn update_profile(
    deps: &(impl repo::UserRepo + password::VerifyPassword),
    user_id: UserId,
    update: ProfileUpdate,
) -> WbResult<Option<User>> {
    let (_, credentials) = deps
        .find_user_credentials_by_id(user_id)
        .await?
        .ok_or(WbError::UserNotFound)?;

    match deps
        .verify_password(update.password.clone().into(), credentials.password_hash)
        .await
    {
        Ok(()) => {}
        Err(WbError::Unauthorized) => return Ok(None),
        Err(e) => return Err(e),
    }

    let (user, _) = deps
        .update_user(
            user_id,
            repo::UserUpdate {
                username: non_blank(&update.username),
                email: non_blank(&update.email),
                image_url: non_blank(&update.image_url),
                header_image_url: non_blank(&update.header_image_url),
                bio: non_blank(&update.bio),
                location: non_blank(&update.location),
            },
        )
        .await?;

    Ok(Some(user))
}

#[entrait(pub DeleteUser)]
async fn delete_user(deps: &impl repo::UserRepo, user_id: UserId) -> WbResult<()> {
    deps.delete_user(user_id).await?;
    tracing::info!(%user_id, "user deleted");
    Ok(())
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::*;

    fn new_user(username: &str, email: &str, password: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.into(),
            image_url: None,
        }
    }

    #[test]
    fn valid_new_user_should_pass_validation() {
        assert!(new_user("name", "name@email.com", "password")
            .validate()
            .is_ok());
    }

    #[test]
    fn new_user_validation_should_reject_bad_input() {
        assert_matches!(
            new_user(" ", "name@email.com", "password").validate(),
            Err(WbError::Invalid(_))
        );
        assert_matches!(
            new_user("name", "email.com", "password").validate(),
            Err(WbError::Invalid(_))
        );
        assert_matches!(
            new_user("name", "name@email.com", "12345").validate(),
            Err(WbError::Invalid(_))
        );
    }

    #[test]
    fn maybe_user_require() {
        let user_id = UserId(Uuid::new_v4());

        assert_eq!(user_id, user_id.some().require().unwrap());
        assert!(user_id.some().is(user_id));
        assert_matches!(
            UserId::<Option<Uuid>>::none().require(),
            Err(WbError::Unauthorized)
        );
    }

    #[test]
    fn non_blank_should_trim() {
        assert_eq!(None, non_blank("  "));
        assert_eq!(Some("x"), non_blank(" x "));
    }
}
