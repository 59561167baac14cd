//! The notification fan-out engine.
//!
//! Pure functions from "who did what to which shout-out" to the list of
//! notifications to insert. Storage backends call these inside the same
//! transaction as the triggering write, passing the shout-out's sender and
//! recipients explicitly.

use std::collections::BTreeSet;

use crate::{
  ShoutOutId, UserId,
  notification::{NewNotification, NotificationKind},
  report::ReportTarget,
  user::User,
};

/// Events that notify everyone involved in a shout-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engagement {
  Comment,
  Reaction,
}

impl Engagement {
  fn kind(self) -> NotificationKind {
    match self {
      Self::Comment => NotificationKind::Comment,
      Self::Reaction => NotificationKind::Reaction,
    }
  }

  fn verb(self) -> &'static str {
    match self {
      Self::Comment => "commented on",
      Self::Reaction => "reacted to",
    }
  }
}

/// The sender and every recipient, minus the actor. Recomputed per event.
pub fn interested_parties(
  sender_id: UserId,
  recipient_ids: &[UserId],
  actor_id: UserId,
) -> BTreeSet<UserId> {
  let mut parties: BTreeSet<UserId> = recipient_ids.iter().copied().collect();
  parties.insert(sender_id);
  parties.remove(&actor_id);
  parties
}

/// Notify the interested parties of a comment or a new reaction.
///
/// The sender hears about "your shout-out"; co-recipients hear about "a
/// shout-out you are part of".
pub fn engagement(
  shoutout_id: ShoutOutId,
  sender_id: UserId,
  recipient_ids: &[UserId],
  actor: &User,
  event: Engagement,
) -> Vec<NewNotification> {
  interested_parties(sender_id, recipient_ids, actor.id)
    .into_iter()
    .map(|user_id| {
      let object = if user_id == sender_id {
        "your shout-out"
      } else {
        "a shout-out you are part of"
      };
      NewNotification {
        user_id,
        kind: event.kind(),
        message: format!("{} {} {object}", actor.name, event.verb()),
        shoutout_id: Some(shoutout_id),
      }
    })
    .collect()
}

/// Tag each newly-added recipient of a fresh shout-out. The sender is never
/// told about their own shout-out, even when they list themselves.
pub fn tags(
  shoutout_id: ShoutOutId,
  sender: &User,
  new_recipient_ids: &[UserId],
) -> Vec<NewNotification> {
  new_recipient_ids
    .iter()
    .copied()
    .filter(|&id| id != sender.id)
    .map(|user_id| NewNotification {
      user_id,
      kind: NotificationKind::Tag,
      message: format!("{} recognised you in a shout-out", sender.name),
      shoutout_id: Some(shoutout_id),
    })
    .collect()
}

/// Tell every admin about a new report.
pub fn report(
  reporter: &User,
  admin_ids: &[UserId],
  target: ReportTarget,
) -> Vec<NewNotification> {
  let message = match target {
    ReportTarget::ShoutOut(id) => {
      format!("{} reported shout-out #{id}", reporter.name)
    }
    ReportTarget::Comment { shoutout_id, .. } => format!(
      "{} reported a comment on shout-out #{shoutout_id}",
      reporter.name
    ),
  };

  admin_ids
    .iter()
    .map(|&user_id| NewNotification {
      user_id,
      kind: NotificationKind::Report,
      message: message.clone(),
      shoutout_id: Some(target.shoutout_id()),
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::user::Role;

  fn user(id: UserId, name: &str) -> User {
    User {
      id,
      email: format!("{}@example.com", name.to_lowercase()),
      name: name.into(),
      department: "Engineering".into(),
      role: Role::Employee,
      joined_at: Utc::now(),
      profile_picture_url: None,
    }
  }

  fn for_user(ns: &[NewNotification], id: UserId) -> Vec<&NewNotification> {
    ns.iter().filter(|n| n.user_id == id).collect()
  }

  // ─── Interested parties ──────────────────────────────────────────────────

  #[test]
  fn parties_exclude_actor() {
    let parties = interested_parties(1, &[2, 3], 2);
    assert_eq!(parties.into_iter().collect::<Vec<_>>(), vec![1, 3]);
  }

  #[test]
  fn parties_deduplicate_sender_listed_as_recipient() {
    let parties = interested_parties(1, &[1, 2], 3);
    assert_eq!(parties.len(), 2);
  }

  #[test]
  fn sender_commenting_on_self_addressed_shoutout_notifies_nobody() {
    let alice = user(1, "Alice");
    let out = engagement(10, 1, &[1], &alice, Engagement::Comment);
    assert!(out.is_empty());
  }

  // ─── Tags ────────────────────────────────────────────────────────────────

  #[test]
  fn tags_skip_the_sender() {
    let alice = user(1, "Alice");
    let out = tags(7, &alice, &[1, 2, 3]);
    assert_eq!(out.len(), 2);
    assert!(for_user(&out, 1).is_empty());
    assert!(out.iter().all(|n| n.kind == NotificationKind::Tag));
    assert!(out.iter().all(|n| n.shoutout_id == Some(7)));
    assert_eq!(out[0].message, "Alice recognised you in a shout-out");
  }

  // ─── Engagement ──────────────────────────────────────────────────────────

  #[test]
  fn comment_message_differs_for_sender_and_co_recipient() {
    let bob = user(2, "Bob");
    let out = engagement(5, 1, &[2, 3], &bob, Engagement::Comment);

    assert_eq!(out.len(), 2);
    assert_eq!(for_user(&out, 1)[0].message, "Bob commented on your shout-out");
    assert_eq!(
      for_user(&out, 3)[0].message,
      "Bob commented on a shout-out you are part of"
    );
    assert!(for_user(&out, 2).is_empty());
  }

  #[test]
  fn reaction_uses_reaction_kind_and_verb() {
    let carol = user(3, "Carol");
    let out = engagement(5, 1, &[2, 3], &carol, Engagement::Reaction);

    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|n| n.kind == NotificationKind::Reaction));
    assert_eq!(for_user(&out, 1)[0].message, "Carol reacted to your shout-out");
    assert_eq!(
      for_user(&out, 2)[0].message,
      "Carol reacted to a shout-out you are part of"
    );
  }

  // ─── Reports ─────────────────────────────────────────────────────────────

  #[test]
  fn report_goes_to_every_admin() {
    let dave = user(4, "Dave");
    let out = report(&dave, &[8, 9], ReportTarget::ShoutOut(12));
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|n| n.message == "Dave reported shout-out #12"));
    assert!(out.iter().all(|n| n.kind == NotificationKind::Report));
  }

  #[test]
  fn comment_report_names_the_parent_shoutout() {
    let dave = user(4, "Dave");
    let target = ReportTarget::Comment { comment_id: 30, shoutout_id: 12 };
    let out = report(&dave, &[8], target);
    assert_eq!(out[0].message, "Dave reported a comment on shout-out #12");
    assert_eq!(out[0].shoutout_id, Some(12));
  }

  #[test]
  fn report_without_admins_is_silent() {
    let dave = user(4, "Dave");
    assert!(report(&dave, &[], ReportTarget::ShoutOut(1)).is_empty());
  }
}
