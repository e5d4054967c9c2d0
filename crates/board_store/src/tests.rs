use crate::*;

fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password_hash: "pbkdf2-sha256$1$c2FsdA$aGFzaA".to_string(),
        avatar: "https://i.pravatar.cc/150?img=1".to_string(),
        role: Role::User,
    }
}

fn new_post(title: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: "Body".to_string(),
        author: "Tech Insights Team".to_string(),
    }
}

async fn seeded() -> (MemoryStore, User, Post) {
    let store = MemoryStore::new();
    let user = store
        .insert_user(new_user("Liam Joshi", "liam.joshi@example.com"))
        .await
        .unwrap();
    let post = store.insert_post(new_post("Nested comments")).await.unwrap();
    (store, user, post)
}

async fn reply(store: &MemoryStore, post: &Post, user: &User, parent: Option<CommentId>) -> Result<Comment, StoreError> {
    store
        .insert_comment(NewComment {
            text: "reply".to_string(),
            post_id: post.id,
            user_id: user.id,
            parent_id: parent,
        })
        .await
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_case_insensitively() {
    let store = MemoryStore::new();
    store
        .insert_user(new_user("Alex Chen", "alex.chen@example.com"))
        .await
        .unwrap();

    let err = store
        .insert_user(new_user("Alex Again", "  Alex.Chen@Example.com "))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let found = store.find_user_by_email("ALEX.CHEN@example.com").await.unwrap();
    assert_eq!(found.unwrap().name, "Alex Chen");
}

#[tokio::test]
async fn test_reply_depth_and_counters() {
    let (store, user, post) = seeded().await;

    let root = reply(&store, &post, &user, None).await.unwrap();
    assert_eq!(root.depth, 0);

    let child = reply(&store, &post, &user, Some(root.id)).await.unwrap();
    let grandchild = reply(&store, &post, &user, Some(child.id)).await.unwrap();
    assert_eq!(child.depth, 1);
    assert_eq!(grandchild.depth, 2);

    let root = store.find_comment(root.id).await.unwrap().unwrap();
    let child = store.find_comment(child.id).await.unwrap().unwrap();
    assert_eq!(root.reply_count, 1);
    assert_eq!(child.reply_count, 1);

    let post = store.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(post.comment_count, 3);
}

#[tokio::test]
async fn test_depth_limit_is_enforced() {
    let (store, user, post) = seeded().await;

    let mut parent = reply(&store, &post, &user, None).await.unwrap();
    for _ in 0..MAX_COMMENT_DEPTH {
        parent = reply(&store, &post, &user, Some(parent.id)).await.unwrap();
    }
    assert_eq!(parent.depth, MAX_COMMENT_DEPTH);

    let err = reply(&store, &post, &user, Some(parent.id)).await.unwrap_err();
    assert!(matches!(err, StoreError::DepthExceeded(11)));

    // The rejected reply must not have been counted.
    let parent = store.find_comment(parent.id).await.unwrap().unwrap();
    assert_eq!(parent.reply_count, 0);
}

#[tokio::test]
async fn test_missing_post_and_parent() {
    let (store, user, post) = seeded().await;

    let err = store
        .insert_comment(NewComment {
            text: "orphan".to_string(),
            post_id: PostId::new(),
            user_id: user.id,
            parent_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { kind: "Post", .. }));

    let err = reply(&store, &post, &user, Some(CommentId::new())).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { kind: "Parent comment", .. }));
}

#[tokio::test]
async fn test_parent_must_share_post() {
    let (store, user, post) = seeded().await;
    let other = store.insert_post(new_post("Other")).await.unwrap();
    let foreign = reply(&store, &other, &user, None).await.unwrap();

    let err = reply(&store, &post, &user, Some(foreign.id)).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidParent(_)));
}

#[tokio::test]
async fn test_upvote_toggles_per_user() {
    let (store, user, post) = seeded().await;
    let other = store
        .insert_user(new_user("Sarah Wilson", "sarah.wilson@example.com"))
        .await
        .unwrap();

    let first = store.toggle_post_upvote(post.id, user.id).await.unwrap();
    let second = store.toggle_post_upvote(post.id, other.id).await.unwrap();
    assert_eq!(first, UpvoteOutcome { upvotes: 1, has_upvoted: true });
    assert_eq!(second, UpvoteOutcome { upvotes: 2, has_upvoted: true });

    let removed = store.toggle_post_upvote(post.id, user.id).await.unwrap();
    assert_eq!(removed, UpvoteOutcome { upvotes: 1, has_upvoted: false });

    let stored = store.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored.upvoted_by, vec![other.id]);

    let comment = reply(&store, &post, &user, None).await.unwrap();
    let outcome = store.toggle_comment_upvote(comment.id, other.id).await.unwrap();
    assert!(outcome.has_upvoted);

    let err = store.toggle_comment_upvote(CommentId::new(), user.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { kind: "Comment", .. }));
}

#[tokio::test]
async fn test_list_posts_sorts_and_pages() {
    let store = MemoryStore::new();
    let voter = store
        .insert_user(new_user("Liam Chakraborty", "liam.c@example.com"))
        .await
        .unwrap();

    let a = store.insert_post(new_post("Alpha")).await.unwrap();
    let b = store.insert_post(new_post("Bravo")).await.unwrap();
    let c = store.insert_post(new_post("Charlie")).await.unwrap();
    store.toggle_post_upvote(b.id, voter.id).await.unwrap();

    let by_title = store
        .list_posts(ListPostsOptions {
            sort_by: PostSort::Title,
            sort_order: SortOrder::Asc,
            limit: 2,
            skip: 1,
        })
        .await
        .unwrap();
    let titles: Vec<_> = by_title.iter().map(|post| post.title.as_str()).collect();
    assert_eq!(titles, vec!["Bravo", "Charlie"]);

    let by_votes = store
        .list_posts(ListPostsOptions {
            sort_by: PostSort::Upvotes,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_votes[0].id, b.id);
    assert_eq!(by_votes.len(), 3);
    assert!(by_votes.iter().any(|post| post.id == a.id));
    assert!(by_votes.iter().any(|post| post.id == c.id));
}

#[tokio::test]
async fn test_comments_for_post_filters_depth() {
    let (store, user, post) = seeded().await;
    let root = reply(&store, &post, &user, None).await.unwrap();
    let child = reply(&store, &post, &user, Some(root.id)).await.unwrap();
    reply(&store, &post, &user, Some(child.id)).await.unwrap();

    let shallow = store
        .comments_for_post(
            post.id,
            CommentQuery {
                max_depth: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(shallow.len(), 2);
    assert!(shallow.iter().all(|comment| comment.depth <= 1));

    let limited = store
        .comments_for_post(
            post.id,
            CommentQuery {
                limit: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn test_comments_for_post_skips_inactive() {
    let (store, user, post) = seeded().await;
    let kept = reply(&store, &post, &user, None).await.unwrap();
    let removed = reply(&store, &post, &user, None).await.unwrap();

    let mut snapshot = store.snapshot();
    for comment in &mut snapshot.comments {
        if comment.id == removed.id {
            comment.is_active = false;
        }
    }
    let store = MemoryStore::from_snapshot(snapshot);

    let comments = store.comments_for_post(post.id, CommentQuery::default()).await.unwrap();
    let ids: Vec<_> = comments.iter().map(|comment| comment.id).collect();
    assert_eq!(ids, vec![kept.id]);
    assert!(store.find_comment(removed.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_recount_comments() {
    let (store, user, post) = seeded().await;
    reply(&store, &post, &user, None).await.unwrap();
    reply(&store, &post, &user, None).await.unwrap();

    let post = store.recount_comments(post.id).await.unwrap();
    assert_eq!(post.comment_count, 2);

    assert!(store.recount_comments(PostId::new()).await.is_err());
}

#[tokio::test]
async fn test_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");

    let (store, user, post) = seeded().await;
    let root = reply(&store, &post, &user, None).await.unwrap();
    reply(&store, &post, &user, Some(root.id)).await.unwrap();
    store.save_snapshot(&path).await.unwrap();

    let restored = MemoryStore::load_snapshot(&path).await.unwrap();
    assert_eq!(restored.stats().await, StoreStats { users: 1, posts: 1, comments: 2 });

    // The email index is rebuilt, so duplicates are still rejected.
    let err = restored
        .insert_user(new_user("Liam Again", "liam.joshi@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let root = restored.find_comment(root.id).await.unwrap().unwrap();
    assert_eq!(root.reply_count, 1);
}

#[tokio::test]
async fn test_missing_snapshot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::load_snapshot(&dir.path().join("absent.json")).await.unwrap();
    assert!(store.is_empty());
}
