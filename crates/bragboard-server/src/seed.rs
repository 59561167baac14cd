//! Demo data for local development.
//!
//! Users are matched by email, so running the seeder twice never duplicates
//! them; activity is only generated while the board is still empty.
//! Everything goes through [`BoardStore`], so seeded shout-outs produce the
//! same notifications real ones do.

use bragboard_api::auth::hash_password;
use bragboard_core::{
  reaction::ReactionKind,
  shoutout::{NewShoutOut, ShoutOutQuery},
  store::BoardStore,
  user::{NewUser, Role, User},
};

pub const DEMO_PASSWORD: &str = "password123";

const USERS: [(&str, &str, &str, Role); 13] = [
  ("Alice Engineer", "alice@bragboard.com", "Engineering", Role::Employee),
  ("Bob Sales", "bob@bragboard.com", "Sales", Role::Employee),
  ("Charlie HR", "charlie@bragboard.com", "Human Resources", Role::Admin),
  ("David Product", "david@bragboard.com", "Product", Role::Employee),
  ("Eve Designer", "eve@bragboard.com", "Design", Role::Employee),
  ("Frank Finance", "frank@bragboard.com", "Finance", Role::Employee),
  ("Grace Marketing", "grace@bragboard.com", "Marketing", Role::Employee),
  ("Heidi Support", "heidi@bragboard.com", "Customer Support", Role::Employee),
  ("Ivan Intern", "ivan@bragboard.com", "Engineering", Role::Employee),
  ("Judy Legal", "judy@bragboard.com", "Legal", Role::Employee),
  ("Kevin DevOps", "kevin@bragboard.com", "Engineering", Role::Employee),
  ("Liam Sales", "liam@bragboard.com", "Sales", Role::Employee),
  ("Mia CEO", "mia@bragboard.com", "Executive", Role::Admin),
];

const PRAISE: [&str; 10] = [
  "helped me debug a nasty issue properly.",
  "closed the deal of the quarter! Amazing work.",
  "organized the best team building event ever.",
  "stayed late to ensure the deployment went smooth.",
  "designed the beautiful new landing page.",
  "always brings positive energy to the morning standup.",
  "wrote excellent documentation for the new API.",
  "handled a difficult customer with so much patience.",
  "optimized the database queries, site is 2x faster!",
  "mentored the new interns effectively.",
];

const REPLIES: [&str; 5] =
  ["Totally agree!", "Well done!", "Deserved!", "Awesome work!", "👏👏👏"];

const REACTIONS: [ReactionKind; 3] =
  [ReactionKind::Like, ReactionKind::Clap, ReactionKind::Star];

const SHOUTOUT_COUNT: usize = 15;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
  pub users_created:     usize,
  pub shoutouts_created: usize,
}

pub async fn run<S: BoardStore>(store: &S) -> anyhow::Result<SeedSummary> {
  let mut summary = SeedSummary::default();
  let password_hash = hash_password(DEMO_PASSWORD)?;

  let mut users: Vec<User> = Vec::with_capacity(USERS.len());
  for (name, email, department, role) in USERS {
    if let Some(existing) = store.get_credentials(email).await? {
      users.push(existing.user);
      continue;
    }
    let user = store
      .create_user(NewUser {
        email: email.into(),
        name: name.into(),
        department: department.into(),
        password_hash: password_hash.clone(),
        role,
      })
      .await?;
    users.push(user);
    summary.users_created += 1;
  }

  let existing = store
    .list_shoutouts(&ShoutOutQuery::default(), users[0].id)
    .await?;
  if !existing.is_empty() {
    tracing::info!("board already has activity; skipping shout-outs");
    return Ok(summary);
  }

  let n = users.len();
  for i in 0..SHOUTOUT_COUNT {
    let sender = &users[(i * 5) % n];
    // An offset in 1..n never lands back on the sender.
    let recipient = &users[((i * 5) + 1 + i % (n - 1)) % n];
    let first_name = recipient
      .name
      .split_whitespace()
      .next()
      .unwrap_or(&recipient.name);

    let shoutout = store
      .create_shoutout(sender, NewShoutOut {
        message:       format!(
          "Big thanks to {first_name}! They {}",
          PRAISE[i % PRAISE.len()]
        ),
        recipient_ids: vec![recipient.id],
      })
      .await?;
    summary.shoutouts_created += 1;

    for j in 0..i % 4 {
      let commenter = &users[(i + j * 3 + 2) % n];
      let reply = REPLIES[(i + j) % REPLIES.len()];
      store.add_comment(shoutout.id, commenter, reply.into()).await?;
    }

    for j in 0..i % 6 {
      let reactor = &users[(i * 2 + j) % n];
      let kind = REACTIONS[(i + j) % REACTIONS.len()];
      store.toggle_reaction(shoutout.id, reactor, kind).await?;
    }
  }

  Ok(summary)
}

#[cfg(test)]
mod tests {
  use bragboard_store_sqlite::SqliteStore;

  use super::*;

  #[tokio::test]
  async fn seeding_is_idempotent() {
    let store = SqliteStore::open_in_memory().await.unwrap();

    let first = run(&store).await.unwrap();
    assert_eq!(first, SeedSummary {
      users_created:     13,
      shoutouts_created: SHOUTOUT_COUNT,
    });

    let users = store.list_users(None).await.unwrap();
    assert_eq!(users.len(), 13);
    assert_eq!(users.iter().filter(|u| u.is_admin()).count(), 2);

    let second = run(&store).await.unwrap();
    assert_eq!(second, SeedSummary::default());
    assert_eq!(store.list_users(None).await.unwrap().len(), 13);

    let feed = store
      .list_shoutouts(&ShoutOutQuery::default(), users[0].id)
      .await
      .unwrap();
    assert_eq!(feed.len(), SHOUTOUT_COUNT);
    assert!(feed.iter().all(|s| s.recipients[0].id != s.sender_id));
  }
}
