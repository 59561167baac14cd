//! Users and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::UserId;

/// What a user is allowed to do. Admins moderate reports and manage users.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  #[default]
  Employee,
  Admin,
}

/// A registered user as shown to other users. The password hash lives in
/// [`Credentials`] and never leaves the store through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:                  UserId,
  pub email:               String,
  pub name:                String,
  pub department:          String,
  pub role:                Role,
  pub joined_at:           DateTime<Utc>,
  pub profile_picture_url: Option<String>,
}

impl User {
  pub fn is_admin(&self) -> bool { self.role == Role::Admin }
}

/// A user together with their stored password hash; only used for login and
/// password changes.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub user:          User,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Input to [`crate::store::BoardStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub name:          String,
  pub department:    String,
  pub password_hash: String,
  pub role:          Role,
}

/// A partial self-service profile update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
  pub name:          Option<String>,
  pub email:         Option<String>,
  pub password_hash: Option<String>,
}

/// The short form of a user embedded in report listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
  pub id:   UserId,
  pub name: String,
}

impl From<&User> for UserRef {
  fn from(u: &User) -> Self {
    Self {
      id:   u.id,
      name: u.name.clone(),
    }
  }
}
