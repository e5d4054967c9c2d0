//! Demo data for a fresh board.
//!
//! Four users, one post and a five-level comment thread. Every demo account
//! signs in with the password `password123`.

use board_server::auth::PasswordHasher;
use board_store::{
    BoardStore, CommentId, NewComment, NewPost, NewUser, Role, StoreError, StoreStats, UserId,
};
use tracing::{debug, info};

pub const DEMO_PASSWORD: &str = "password123";

struct DemoUser {
    name: &'static str,
    email: &'static str,
    avatar: &'static str,
}

/// A demo comment; `parent` indexes an earlier entry of [`COMMENTS`].
struct DemoComment {
    parent: Option<usize>,
    author: usize,
    text: &'static str,
}

const USERS: &[DemoUser] = &[
    DemoUser {
        name: "Liam Joshi",
        email: "liam.joshi@example.com",
        avatar: "https://i.pravatar.cc/150?img=1",
    },
    DemoUser {
        name: "Liam Chakraborty",
        email: "liam.chakraborty@example.com",
        avatar: "https://i.pravatar.cc/150?img=2",
    },
    DemoUser {
        name: "Sarah Wilson",
        email: "sarah.wilson@example.com",
        avatar: "https://i.pravatar.cc/150?img=3",
    },
    DemoUser {
        name: "Alex Chen",
        email: "alex.chen@example.com",
        avatar: "https://i.pravatar.cc/150?img=4",
    },
];

const POST_TITLE: &str = "Understanding Nested Comment Systems: A Deep Dive";
const POST_AUTHOR: &str = "Tech Insights Team";
const POST_CONTENT: &str = "In this comprehensive guide, we'll explore how modern platforms like \
Reddit implement nested commenting systems. We'll cover the technical challenges, user experience \
considerations, and best practices for building scalable comment hierarchies that maintain \
readability and performance.";

/// Users (by index) who upvote the post.
const POST_VOTERS: &[usize] = &[0, 1];

/// (comment index, voters) pairs.
const COMMENT_VOTES: &[(usize, &[usize])] = &[(0, &[1, 2]), (1, &[0, 3])];

macro_rules! comment {
    ($author:expr, $text:expr) => {
        DemoComment { parent: None, author: $author, text: $text }
    };
    ($parent:expr => $author:expr, $text:expr) => {
        DemoComment { parent: Some($parent), author: $author, text: $text }
    };
}

const COMMENTS: &[DemoComment] = &[
    // 0..8: top level
    comment!(0, "Interesting, I hadn't thought about it this way before. This really opens up new possibilities for how we approach this problem."),
    comment!(1, "Great post! Really enjoyed reading this. The insights are valuable and well-presented."),
    comment!(2, "I completely agree! This perspective changes everything. Thanks for sharing your thoughts."),
    comment!(3, "Could you elaborate more on the third point? I'm curious about the implementation details."),
    comment!(0, "This is exactly what I needed to understand the concept better. The examples are very clear."),
    comment!(1, "Has anyone tried implementing this in production? I'd love to hear about real-world experiences."),
    comment!(2, "The performance implications mentioned here are crucial. This could make or break the user experience."),
    comment!(3, "I've been working on something similar but ran into scalability issues. Any tips?"),
    // 8..18: depth 1
    comment!(0 => 0, "Absolutely! I've been thinking about this for weeks and this finally clicked for me."),
    comment!(1 => 2, "The examples you provided really helped me understand the concept better. Great work!"),
    comment!(3 => 0, "I'd be happy to explain! The key is in the data structure we use for storing the relationships."),
    comment!(4 => 1, "Same here! The visual diagrams really made it click for me."),
    comment!(5 => 2, "We implemented this at our startup and it's been working great so far."),
    comment!(6 => 3, "The key is proper indexing and caching strategies."),
    comment!(7 => 0, "What specific issues did you encounter? Maybe we can help troubleshoot."),
    comment!(0 => 1, "I'm curious about the database design patterns used here."),
    comment!(1 => 2, "The UX considerations mentioned are spot on. Mobile experience is crucial."),
    comment!(3 => 3, "Could you share some code examples for the implementation?"),
    // 18..28: depth 2
    comment!(8 => 1, "I totally agree! The depth of explanation here is impressive."),
    comment!(9 => 3, "Thanks! I spent a lot of time making sure the examples were clear."),
    comment!(10 => 2, "Would you mind sharing the specific data structures you used?"),
    comment!(11 => 0, "The diagrams were definitely the highlight for me too!"),
    comment!(12 => 1, "That's awesome! How long did the implementation take?"),
    comment!(13 => 0, "Exactly! Redis caching made a huge difference for us."),
    comment!(14 => 2, "Mainly performance issues with deep nesting. Any suggestions?"),
    comment!(15 => 3, "I'd recommend using an aggregation pipeline for this."),
    comment!(16 => 0, "Absolutely! The responsive design patterns are crucial."),
    comment!(17 => 1, "I can share some sample code if that would help!"),
    // 28..35: depth 3
    comment!(19 => 2, "The attention to detail really shows in the quality of this post."),
    comment!(20 => 3, "I'd love to see those! Could you share them in a follow-up post?"),
    comment!(22 => 0, "About 3 months of development and testing."),
    comment!(23 => 1, "Redis is a game-changer for this type of application."),
    comment!(24 => 3, "Have you tried implementing pagination for deep threads?"),
    comment!(25 => 0, "That's a great suggestion! The aggregation pipeline is perfect for this."),
    comment!(27 => 2, "Yes! I'd be happy to share some code examples."),
    // 35..40: depth 4
    comment!(29 => 1, "That would be incredibly helpful! Looking forward to it."),
    comment!(30 => 2, "That's a reasonable timeline for such a complex feature."),
    comment!(31 => 3, "Absolutely! The performance improvement was night and day."),
    comment!(32 => 0, "I haven't tried that yet, but it sounds like a good approach."),
    comment!(33 => 1, "The flexibility of aggregation pipelines is amazing for complex queries."),
    // 40..44: depth 5
    comment!(35 => 0, "I'll work on putting together a comprehensive example."),
    comment!(36 => 3, "The key was breaking it down into smaller, manageable phases."),
    comment!(37 => 2, "It really is! The caching layer made everything so much faster."),
    comment!(38 => 1, "I'll definitely look into implementing pagination for deep threads."),
];

/// Seeds the demo data unless the store already has users.
///
/// Returns whether anything was inserted.
pub async fn seed_if_empty(store: &dyn BoardStore, passwords: PasswordHasher) -> Result<bool, StoreError> {
    let stats = store.stats().await;
    if stats.users > 0 {
        info!("🌱 Store already has {} users - skipping demo data", stats.users);
        return Ok(false);
    }

    let stats = seed_demo_data(store, passwords).await?;
    info!(
        "🌱 Seeded demo data: {} users, {} post, {} comments",
        stats.users, stats.posts, stats.comments
    );
    Ok(true)
}

/// Inserts the demo users, post, comments and votes.
pub async fn seed_demo_data(store: &dyn BoardStore, passwords: PasswordHasher) -> Result<StoreStats, StoreError> {
    let mut users: Vec<UserId> = Vec::with_capacity(USERS.len());
    for demo in USERS {
        let user = store
            .insert_user(NewUser {
                name: demo.name.to_string(),
                email: demo.email.to_string(),
                password_hash: passwords.hash(DEMO_PASSWORD),
                avatar: demo.avatar.to_string(),
                role: Role::User,
            })
            .await?;
        users.push(user.id);
    }

    let post = store
        .insert_post(NewPost {
            title: POST_TITLE.to_string(),
            content: POST_CONTENT.to_string(),
            author: POST_AUTHOR.to_string(),
        })
        .await?;
    for &voter in POST_VOTERS {
        store.toggle_post_upvote(post.id, users[voter]).await?;
    }

    let mut comments: Vec<CommentId> = Vec::with_capacity(COMMENTS.len());
    for demo in COMMENTS {
        let comment = store
            .insert_comment(NewComment {
                text: demo.text.to_string(),
                post_id: post.id,
                user_id: users[demo.author],
                parent_id: demo.parent.map(|parent| comments[parent]),
            })
            .await?;
        debug!("Seeded comment {} at depth {}", comment.id, comment.depth);
        comments.push(comment.id);
    }

    for &(comment, voters) in COMMENT_VOTES {
        for &voter in voters {
            store.toggle_comment_upvote(comments[comment], users[voter]).await?;
        }
    }

    store.recount_comments(post.id).await?;
    Ok(store.stats().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_store::{CommentQuery, ListPostsOptions, MemoryStore, MAX_COMMENT_DEPTH};

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(1)
    }

    #[test]
    fn test_parents_precede_children() {
        for (i, comment) in COMMENTS.iter().enumerate() {
            if let Some(parent) = comment.parent {
                assert!(parent < i, "comment {i} refers to later parent {parent}");
            }
            assert!(comment.author < USERS.len());
        }
    }

    #[tokio::test]
    async fn test_seed_demo_data() {
        let store = MemoryStore::new();
        let stats = seed_demo_data(&store, hasher()).await.unwrap();

        assert_eq!(stats.users, 4);
        assert_eq!(stats.posts, 1);
        assert_eq!(stats.comments, COMMENTS.len());

        let posts = store.list_posts(ListPostsOptions::default()).await.unwrap();
        let post = &posts[0];
        assert_eq!(post.title, POST_TITLE);
        assert_eq!(post.upvotes, 2);
        assert_eq!(post.comment_count, COMMENTS.len() as u64);

        let comments = store
            .comments_for_post(
                post.id,
                CommentQuery {
                    limit: 100,
                    max_depth: MAX_COMMENT_DEPTH,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let deepest = comments.iter().map(|c| c.depth).max().unwrap();
        assert_eq!(deepest, 5);

        let liam = store.find_user_by_email("liam.joshi@example.com").await.unwrap().unwrap();
        assert_eq!(liam.avatar, "https://i.pravatar.cc/150?img=1");
        assert!(hasher().verify(DEMO_PASSWORD, &liam.password_hash));
    }

    #[tokio::test]
    async fn test_seed_if_empty_runs_once() {
        let store = MemoryStore::new();
        assert!(seed_if_empty(&store, hasher()).await.unwrap());
        assert!(!seed_if_empty(&store, hasher()).await.unwrap());
        assert_eq!(store.stats().await.users, 4);
    }
}
