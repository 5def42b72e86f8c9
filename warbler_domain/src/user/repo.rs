use entrait::entrait;

use crate::error::WbResult;
use crate::UserId;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password_hash: crate::PasswordHash,
}

#[derive(Clone, Default)]
pub struct UserUpdate<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub header_image_url: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub location: Option<&'a str>,
}

#[entrait(UserRepoImpl, delegate_by = DelegateUserRepo)]
pub trait UserRepo {
    /// Fails with `UsernameTaken` or `EmailTaken` without committing anything.
    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: crate::PasswordHash,
        image_url: Option<&str>,
    ) -> WbResult<(User, Credentials)>;

    async fn find_user_by_id(&self, user_id: UserId) -> WbResult<Option<User>>;

    async fn find_user_credentials_by_id(
        &self,
        user_id: UserId,
    ) -> WbResult<Option<(User, Credentials)>>;

    async fn find_user_credentials_by_username(
        &self,
        username: &str,
    ) -> WbResult<Option<(User, Credentials)>>;

    /// Users whose username contains `query`, all users for `None`. Ordered by username.
    async fn search_users(&self, query: Option<&str>) -> WbResult<Vec<User>>;

    async fn update_user(
        &self,
        current_user_id: UserId,
        update: UserUpdate<'_>,
    ) -> WbResult<(User, Credentials)>;

    /// Messages and follow edges go with the user.
    async fn delete_user(&self, user_id: UserId) -> WbResult<()>;
}
