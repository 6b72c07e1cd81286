// Demo content for a fresh database: a few authors, groups, posts and follows

use tracing::info;

use crate::{
    entities::{ent_post::PostFields, ent_user::NewUser, Comment, FlatPage, Follow, Group, Post, User},
    error::AppResult,
    infrastructure::database::Database,
};

pub const DEMO_PASSWORD: &str = "yatube-demo-password";

const DEMO_USERS: [(&str, &str, &str); 3] = [
    ("leo", "Leo", "Tolstoy"),
    ("anna", "Anna", "Akhmatova"),
    ("fyodor", "Fyodor", "Dostoevsky"),
];

const DEMO_GROUPS: [(&str, &str, &str); 2] = [
    ("Novels", "novels", "Long-form prose and everything around it."),
    ("Poetry", "poetry", "Verse, short and long."),
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub groups: usize,
    pub posts: usize,
    pub follows: usize,
    pub flatpages: u64,
}

/// Seed demo data. Users and groups that already exist are reused, and
/// posts are only written for authors that had none.
pub async fn seed_demo_data(db: &Database) -> AppResult<SeedSummary> {
    let mut summary = SeedSummary {
        flatpages: FlatPage::seed_defaults(db).await?,
        ..Default::default()
    };

    let mut users = Vec::new();
    for (username, first_name, last_name) in DEMO_USERS {
        let user = match User::gen_by_username(db, username).await? {
            Some(user) => user,
            None => {
                summary.users += 1;
                User::create(
                    db,
                    NewUser {
                        username,
                        password: DEMO_PASSWORD,
                        first_name,
                        last_name,
                        email: "",
                    },
                )
                .await?
            }
        };
        users.push(user);
    }

    let mut groups = Vec::new();
    for (title, slug, description) in DEMO_GROUPS {
        let group = match Group::gen_by_slug(db, slug).await? {
            Some(group) => group,
            None => {
                summary.groups += 1;
                Group::create(db, title, slug, description).await?
            }
        };
        groups.push(group);
    }

    for (i, user) in users.iter().enumerate() {
        if User::count_posts(db, user.id).await? > 0 {
            continue;
        }
        for n in 1..=3 {
            let group_id = groups.get((i + n) % (groups.len() + 1)).map(|g| g.id);
            let fields = PostFields {
                text: format!("Post number {} by {}", n, user.display_name()),
                group_id,
                image: None,
            };
            let post = Post::create(db, user.id, &fields).await?;
            summary.posts += 1;

            if let Some(reader) = users.get((i + 1) % users.len()) {
                Comment::create(db, post.id, reader.id, "Thanks for sharing").await?;
            }
        }
    }

    // Everyone follows the next author in the list.
    for (i, user) in users.iter().enumerate() {
        let author = &users[(i + 1) % users.len()];
        if Follow::get_or_create(db, user.id, author.id).await? {
            summary.follows += 1;
        }
    }

    info!(
        "Seeded {} users, {} groups, {} posts, {} follows, {} flat pages",
        summary.users, summary.groups, summary.posts, summary.follows, summary.flatpages
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Entity;

    #[tokio::test]
    async fn test_seed_is_repeatable() {
        let db = Database::new_in_memory().await.unwrap();

        let first = seed_demo_data(&db).await.unwrap();
        assert_eq!(first.users, 3);
        assert_eq!(first.groups, 2);
        assert_eq!(first.posts, 9);
        assert_eq!(first.follows, 3);
        assert_eq!(first.flatpages, 4);

        let second = seed_demo_data(&db).await.unwrap();
        assert_eq!(second, SeedSummary::default());
        assert_eq!(Post::count_all(&db).await.unwrap(), 9);

        let leo = User::authenticate(&db, "leo", DEMO_PASSWORD).await.unwrap();
        assert!(leo.is_some());
    }
}
