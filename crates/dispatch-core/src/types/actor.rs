//! Actor identity: the `(role, id)` key shared by tokens and realtime connections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Kinds of logical actors that can hold a session or a realtime connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// End customer.
    #[default]
    User,
    /// Merchant account.
    Merchant,
    /// A merchant's branch.
    Branch,
    /// Delivery driver.
    Driver,
    /// Fresh-goods branch.
    FreshBranch,
}

impl ActorRole {
    /// Every role, in a stable order.
    pub const ALL: [ActorRole; 5] = [
        Self::User,
        Self::Merchant,
        Self::Branch,
        Self::Driver,
        Self::FreshBranch,
    ];

    /// Return the stable wire encoding of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Merchant => "merchant",
            Self::Branch => "branch",
            Self::Driver => "driver",
            Self::FreshBranch => "fresh_branch",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorRole {
    type Err = AppError;

    /// Parses the wire encoding. Mobile clients connect with `customer`,
    /// which names the same actor kind as `user`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" | "customer" => Ok(Self::User),
            "merchant" => Ok(Self::Merchant),
            "branch" => Ok(Self::Branch),
            "driver" => Ok(Self::Driver),
            "fresh_branch" => Ok(Self::FreshBranch),
            _ => Err(AppError::validation("invalid role")),
        }
    }
}

/// Parses an actor id. Ids are positive numeric primary keys.
pub fn parse_actor_id(actor_id: &str) -> Option<i64> {
    actor_id.parse::<i64>().ok().filter(|id| *id > 0)
}

/// Composite key identifying one logical actor: `"<role>-<id>"`.
///
/// The same id under two different roles names two distinct actors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorKey {
    role: ActorRole,
    id: String,
}

impl ActorKey {
    /// Build a key from a role and an actor id.
    pub fn new(role: ActorRole, id: impl Into<String>) -> Self {
        Self {
            role,
            id: id.into(),
        }
    }

    /// The actor's role.
    pub fn role(&self) -> ActorRole {
        self.role
    }

    /// The actor's id within its role.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ActorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.role, self.id)
    }
}
