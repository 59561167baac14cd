//! Reactions and the per-(shout-out, user) toggle state machine.
//!
//! A user holds at most one reaction on a given shout-out. Sending the same
//! reaction again clears it; sending a different one switches it. Only the
//! first reaction is announced to the other participants, so flip-flopping
//! between types never spams anyone.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::user::User;

/// The reaction types a user can leave on a shout-out.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReactionKind {
  Like,
  Clap,
  Star,
}

// ─── State machine ───────────────────────────────────────────────────────────

/// What one user currently has on one shout-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionState {
  NoReaction,
  Reacted(ReactionKind),
}

impl From<Option<ReactionKind>> for ReactionState {
  fn from(kind: Option<ReactionKind>) -> Self {
    kind.map_or(Self::NoReaction, Self::Reacted)
  }
}

impl ReactionState {
  /// Apply a reaction request and report what changed.
  pub fn toggle(self, requested: ReactionKind) -> Transition {
    match self {
      Self::NoReaction => Transition {
        next:   Self::Reacted(requested),
        action: ToggleAction::Added,
      },
      Self::Reacted(current) if current == requested => Transition {
        next:   Self::NoReaction,
        action: ToggleAction::Removed,
      },
      Self::Reacted(_) => Transition {
        next:   Self::Reacted(requested),
        action: ToggleAction::Updated,
      },
    }
  }

  pub fn kind(self) -> Option<ReactionKind> {
    match self {
      Self::NoReaction => None,
      Self::Reacted(kind) => Some(kind),
    }
  }
}

/// The result of [`ReactionState::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
  pub next:   ReactionState,
  pub action: ToggleAction,
}

/// The action reported back to the caller of a toggle.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToggleAction {
  Added,
  Updated,
  Removed,
}

impl ToggleAction {
  /// Only a brand-new reaction triggers notifications.
  pub fn notifies(self) -> bool { matches!(self, Self::Added) }
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// What [`crate::store::BoardStore::toggle_reaction`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
  pub action:   ToggleAction,
  /// The caller's reaction after the toggle.
  pub reaction: Option<ReactionKind>,
}

/// How many reactions of one type a shout-out has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCount {
  #[serde(rename = "type")]
  pub kind:  ReactionKind,
  pub count: u64,
}

/// One user's reaction, as listed on a shout-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEntry {
  pub user: User,
  #[serde(rename = "type")]
  pub kind: ReactionKind,
}

/// Filter and paging for [`crate::store::BoardStore::list_reactions`].
#[derive(Debug, Clone, Copy)]
pub struct ReactionQuery {
  pub kind:  Option<ReactionKind>,
  /// 1-based page number.
  pub page:  u32,
  pub limit: u32,
}

impl Default for ReactionQuery {
  fn default() -> Self {
    Self {
      kind:  None,
      page:  1,
      limit: 10,
    }
  }
}

impl ReactionQuery {
  pub fn offset(&self) -> u64 {
    u64::from(self.page.max(1) - 1) * u64::from(self.limit)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn first_reaction_is_added_and_notifies() {
    let t = ReactionState::NoReaction.toggle(ReactionKind::Like);
    assert_eq!(t.next, ReactionState::Reacted(ReactionKind::Like));
    assert_eq!(t.action, ToggleAction::Added);
    assert!(t.action.notifies());
  }

  #[test]
  fn same_reaction_twice_clears_it() {
    let first = ReactionState::NoReaction.toggle(ReactionKind::Star);
    let second = first.next.toggle(ReactionKind::Star);
    assert_eq!(second.next, ReactionState::NoReaction);
    assert_eq!(second.action, ToggleAction::Removed);
    assert!(!second.action.notifies());
  }

  #[test]
  fn different_reaction_switches_silently() {
    let t = ReactionState::Reacted(ReactionKind::Like).toggle(ReactionKind::Clap);
    assert_eq!(t.next, ReactionState::Reacted(ReactionKind::Clap));
    assert_eq!(t.action, ToggleAction::Updated);
    assert!(!t.action.notifies());
  }

  #[test]
  fn state_from_option() {
    assert_eq!(ReactionState::from(None), ReactionState::NoReaction);
    assert_eq!(
      ReactionState::from(Some(ReactionKind::Clap)).kind(),
      Some(ReactionKind::Clap)
    );
  }

  #[test]
  fn query_offset_is_one_based() {
    let q = ReactionQuery { kind: None, page: 3, limit: 10 };
    assert_eq!(q.offset(), 20);
    let q = ReactionQuery { kind: None, page: 0, limit: 10 };
    assert_eq!(q.offset(), 0);
  }

  #[test]
  fn count_serialises_with_type_key() {
    let c = ReactionCount { kind: ReactionKind::Clap, count: 2 };
    assert_eq!(
      serde_json::to_value(c).unwrap(),
      serde_json::json!({ "type": "clap", "count": 2 })
    );
  }
}
