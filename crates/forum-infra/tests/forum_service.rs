mod common;

use std::time::Duration;

use forum_core::domain::{AuthorStats, Category, NewPost, PostPatch};
use forum_core::{DomainError, ForumRules};
use uuid::Uuid;

fn rpg_draft() -> NewPost {
    NewPost {
        title: "Best RPGs".to_string(),
        content: "Looking for recs on RPGs".to_string(),
        category: Category::PcGames,
    }
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let forum = common::forum();

    let created = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();
    let fetched = forum.get_post(created.id).await.unwrap();

    assert_eq!(fetched.title, "Best RPGs");
    assert_eq!(fetched.content, "Looking for recs on RPGs");
    assert_eq!(fetched.category, Category::PcGames);
    assert_eq!(fetched.author, "a@x.com");
    assert_eq!(fetched.likes, 0);
    assert!(fetched.liked_by.is_empty());
    assert!(fetched.comments.is_empty());
}

#[tokio::test]
async fn create_rejects_short_title() {
    let forum = common::forum();
    let mut draft = rpg_draft();
    draft.title = "Hi".to_string();

    let err = forum.create_post(draft, "a@x.com").await.unwrap_err();

    assert!(matches!(err, DomainError::Validation(msg) if msg.contains("title")));
    assert!(forum.list_posts(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn like_toggle_scenario() {
    let forum = common::forum();
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();

    let liked = forum.toggle_like(post.id, "b@x.com").await.unwrap();
    assert_eq!(liked.likes, 1);
    assert_eq!(liked.liked_by, vec!["b@x.com".to_string()]);

    let unliked = forum.toggle_like(post.id, "b@x.com").await.unwrap();
    assert_eq!(unliked.likes, 0);
    assert!(unliked.liked_by.is_empty());
}

#[tokio::test]
async fn author_may_like_own_post() {
    let forum = common::forum();
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();

    let liked = forum.toggle_like(post.id, "a@x.com").await.unwrap();

    assert_eq!(liked.likes, 1);
}

#[tokio::test]
async fn likes_always_match_likers() {
    let forum = common::forum();
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();

    for actor in ["b@x.com", "c@x.com", "b@x.com", "d@x.com", "c@x.com", "e@x.com"] {
        let post = forum.toggle_like(post.id, actor).await.unwrap();
        assert_eq!(post.likes as usize, post.liked_by.len());
    }
    let post = forum.get_post(post.id).await.unwrap();
    assert_eq!(post.liked_by, vec!["d@x.com".to_string(), "e@x.com".to_string()]);
}

#[tokio::test]
async fn like_missing_post_is_not_found() {
    let forum = common::forum();

    let err = forum.toggle_like(Uuid::new_v4(), "b@x.com").await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
}

#[tokio::test]
async fn non_author_cannot_update_or_delete() {
    let forum = common::forum();
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();

    let patch = PostPatch {
        title: Some("Hijacked title".to_string()),
        ..Default::default()
    };
    let update = forum.update_post(post.id, patch, "b@x.com").await.unwrap_err();
    let delete = forum.delete_post(post.id, "b@x.com").await.unwrap_err();

    assert!(matches!(update, DomainError::Forbidden(_)));
    assert!(matches!(delete, DomainError::Forbidden(_)));
    assert_eq!(forum.get_post(post.id).await.unwrap(), post);
}

#[tokio::test]
async fn partial_update_keeps_omitted_fields() {
    let forum = common::forum();
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();
    forum.toggle_like(post.id, "b@x.com").await.unwrap();

    let patch = PostPatch {
        content: Some("Looking for recs on JRPGs specifically".to_string()),
        category: Some(Category::ConsoleGames),
        ..Default::default()
    };
    let updated = forum.update_post(post.id, patch, "a@x.com").await.unwrap();

    assert_eq!(updated.title, "Best RPGs");
    assert_eq!(updated.content, "Looking for recs on JRPGs specifically");
    assert_eq!(updated.category, Category::ConsoleGames);
    assert_eq!(updated.likes, 1);
    assert!(updated.updated_at >= post.updated_at);
}

#[tokio::test]
async fn update_with_empty_string_is_rejected() {
    let forum = common::forum();
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();

    let patch = PostPatch {
        content: Some(String::new()),
        ..Default::default()
    };
    let err = forum.update_post(post.id, patch, "a@x.com").await.unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(forum.get_post(post.id).await.unwrap().content, post.content);
}

#[tokio::test]
async fn update_missing_post_is_not_found() {
    let forum = common::forum();

    let err = forum
        .update_post(Uuid::new_v4(), PostPatch::default(), "a@x.com")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn delete_cascades_to_comments() {
    let forum = common::forum();
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();
    let post = forum.add_comment(post.id, "c@x.com", "First!").await.unwrap();
    let post = forum.add_comment(post.id, "d@x.com", "Second!").await.unwrap();
    let comment_ids: Vec<Uuid> = post.comments.iter().map(|c| c.id).collect();

    forum.delete_post(post.id, "a@x.com").await.unwrap();

    assert!(matches!(
        forum.get_post(post.id).await,
        Err(DomainError::NotFound { .. })
    ));
    for comment_id in comment_ids {
        assert!(matches!(
            forum.get_comment(post.id, comment_id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
    assert!(matches!(
        forum.delete_post(post.id, "a@x.com").await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn list_is_newest_first_and_filterable() {
    let forum = common::forum();
    let mut ids = Vec::new();
    for (title, category) in [
        ("Oldest topic", Category::PcGames),
        ("Middle topic", Category::Guides),
        ("Newest topic", Category::PcGames),
    ] {
        let draft = NewPost {
            title: title.to_string(),
            category,
            ..rpg_draft()
        };
        ids.push(forum.create_post(draft, "a@x.com").await.unwrap().id);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let all: Vec<Uuid> = forum
        .list_posts(None)
        .await
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(all, vec![ids[2], ids[1], ids[0]]);

    let pc: Vec<Uuid> = forum
        .list_posts(Some(Category::PcGames))
        .await
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(pc, vec![ids[2], ids[0]]);
    assert!(forum.list_posts(Some(Category::Events)).await.unwrap().is_empty());
}

#[tokio::test]
async fn returned_list_is_a_snapshot() {
    let forum = common::forum();
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();

    let listed = forum.list_posts(None).await.unwrap();
    forum.toggle_like(post.id, "b@x.com").await.unwrap();
    forum.add_comment(post.id, "b@x.com", "Late reply").await.unwrap();

    assert_eq!(listed[0].likes, 0);
    assert!(listed[0].comments.is_empty());
}

#[tokio::test]
async fn comment_scenario() {
    let forum = common::forum();
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();

    let post = forum.add_comment(post.id, "c@x.com", "Nice list!").await.unwrap();
    assert_eq!(post.comments.len(), 1);
    let comment = post.comments[0].clone();
    assert_eq!(comment.text, "Nice list!");
    assert_eq!(comment.author, "c@x.com");
    assert_eq!(comment.post_id, post.id);

    let err = forum
        .delete_comment(post.id, comment.id, "a@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
    assert_eq!(forum.get_post(post.id).await.unwrap().comments.len(), 1);

    let post = forum
        .delete_comment(post.id, comment.id, "c@x.com")
        .await
        .unwrap();
    assert!(post.comments.is_empty());
}

#[tokio::test]
async fn comments_keep_insertion_order_with_unique_ids() {
    let forum = common::forum();
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();

    for text in ["one", "two", "three"] {
        forum.add_comment(post.id, "c@x.com", text).await.unwrap();
    }
    let post = forum.get_post(post.id).await.unwrap();

    let texts: Vec<&str> = post.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["one", "two", "three"]);
    assert_ne!(post.comments[0].id, post.comments[1].id);
}

#[tokio::test]
async fn comment_validation() {
    let forum = common::forum();
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();

    for text in [String::new(), "   ".to_string(), "x".repeat(501)] {
        let err = forum.add_comment(post.id, "c@x.com", &text).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
    assert!(forum.add_comment(post.id, "c@x.com", &"x".repeat(500)).await.is_ok());
}

#[tokio::test]
async fn configured_comment_minimum_applies() {
    let forum = common::forum_with(ForumRules {
        comment_min_chars: 2,
    });
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();

    assert!(matches!(
        forum.add_comment(post.id, "c@x.com", "k").await,
        Err(DomainError::Validation(_))
    ));
    assert!(forum.add_comment(post.id, "c@x.com", "ok").await.is_ok());
}

#[tokio::test]
async fn comment_on_missing_post_is_not_found() {
    let forum = common::forum();

    let err = forum
        .add_comment(Uuid::new_v4(), "c@x.com", "Hello?")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
}

#[tokio::test]
async fn delete_missing_comment_is_not_found() {
    let forum = common::forum();
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();

    let err = forum
        .delete_comment(post.id, Uuid::new_v4(), "a@x.com")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "Comment", .. }));
}

#[tokio::test]
async fn comment_author_edits_own_comment() {
    let forum = common::forum();
    let post = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();
    let post = forum.add_comment(post.id, "c@x.com", "Nice list!").await.unwrap();
    let comment_id = post.comments[0].id;

    let err = forum
        .update_comment(post.id, comment_id, "Edited by someone else", "a@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = forum
        .update_comment(post.id, comment_id, "", "c@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let post = forum
        .update_comment(post.id, comment_id, "Nice list, added two more", "c@x.com")
        .await
        .unwrap();
    let comment = &post.comments[0];
    assert_eq!(comment.text, "Nice list, added two more");
    assert!(comment.updated_at.is_some());
}

#[tokio::test]
async fn author_stats_follow_posts_and_comments() {
    let forum = common::forum();
    assert_eq!(forum.author_stats("a@x.com").await.unwrap(), AuthorStats::default());

    let own = forum.create_post(rpg_draft(), "a@x.com").await.unwrap();
    let other = forum.create_post(rpg_draft(), "b@x.com").await.unwrap();
    forum.add_comment(own.id, "a@x.com", "Bumping my own thread").await.unwrap();
    forum.add_comment(other.id, "a@x.com", "Great picks here").await.unwrap();
    forum.add_comment(other.id, "b@x.com", "Thanks!!").await.unwrap();

    let stats = forum.author_stats("a@x.com").await.unwrap();
    assert_eq!(stats, AuthorStats { posts: 1, comments: 2 });

    forum.delete_post(other.id, "b@x.com").await.unwrap();
    let stats = forum.author_stats("a@x.com").await.unwrap();
    assert_eq!(stats, AuthorStats { posts: 1, comments: 1 });
}
