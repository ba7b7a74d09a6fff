//! Integration tests for the entity services
//!
//! Exercises the validate-before-mutate ordering, entity-specific guards
//! (self-parenting, cross-post re-parenting), and the moderation state
//! machine through the public service APIs.

use canopy_core::db::MemoryStore;
use canopy_core::models::{CommentStatus, HierarchyKind};
use canopy_core::services::{
    CategoryService, CommentService, MenuService, ServiceError,
};
use canopy_core::tree::TreeError;
use std::sync::Arc;

fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

mod category_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_nest() {
        let store = store();
        let service = CategoryService::new(Arc::clone(&store));

        let root = service.create("Hardware", "hardware", None).await.unwrap();
        let child = service
            .create("GPUs", "gpus", Some(root.id()))
            .await
            .unwrap();

        assert_eq!(child.parent_id(), Some(root.id()));
        assert_eq!(child.depth(), 1);
        assert!(child.is_active());

        let children = service.children(Some(root.id())).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].slug(), "gpus");

        service.audit().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_slug_prevents_any_mutation() {
        let store = store();
        let service = CategoryService::new(Arc::clone(&store));

        let result = service.create("Hardware", "Bad Slug!", None).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(store.forest_len(HierarchyKind::Category).await, 0);

        let result = service.create("", "hardware", None).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(store.forest_len(HierarchyKind::Category).await, 0);
    }

    #[tokio::test]
    async fn test_rename_keeps_position() {
        let store = store();
        let service = CategoryService::new(Arc::clone(&store));

        let root = service.create("Hardware", "hardware", None).await.unwrap();
        let child = service
            .create("GPUs", "gpus", Some(root.id()))
            .await
            .unwrap();

        let before = (child.node().left, child.node().right);
        let renamed = service.rename(child.id(), "Graphics Cards").await.unwrap();

        assert_eq!(renamed.name(), "Graphics Cards");
        assert_eq!((renamed.node().left, renamed.node().right), before);
        assert_eq!(renamed.parent_id(), Some(root.id()));

        assert!(service.rename(child.id(), "").await.is_err());
        assert!(matches!(
            service.rename("missing", "Name").await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_slug_and_active() {
        let service = CategoryService::new(store());

        let root = service.create("Hardware", "hardware", None).await.unwrap();
        let updated = service.set_slug(root.id(), "gear").await.unwrap();
        assert_eq!(updated.slug(), "gear");

        assert!(service.set_slug(root.id(), "Bad Slug").await.is_err());

        let updated = service.set_active(root.id(), false).await.unwrap();
        assert!(!updated.is_active());
    }

    #[tokio::test]
    async fn test_self_parenting_rejected() {
        let service = CategoryService::new(store());
        let root = service.create("Hardware", "hardware", None).await.unwrap();

        let result = service.move_to(root.id(), Some(root.id())).await;
        assert!(matches!(
            result,
            Err(ServiceError::Tree(TreeError::CircularReference { .. }))
        ));
    }

    #[tokio::test]
    async fn test_move_and_breadcrumbs() {
        let service = CategoryService::new(store());

        let a = service.create("A", "a", None).await.unwrap();
        let b = service.create("B", "b", Some(a.id())).await.unwrap();
        let c = service.create("C", "c", Some(a.id())).await.unwrap();

        service.move_to(b.id(), Some(c.id())).await.unwrap();

        let trail = service.ancestors(b.id()).await.unwrap();
        assert_eq!(
            trail.iter().map(|cat| cat.slug()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );

        let siblings = service.siblings(c.id()).await.unwrap();
        assert!(siblings.is_empty());

        service.audit().await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_requires_cascade_for_subtree() {
        let service = CategoryService::new(store());

        let a = service.create("A", "a", None).await.unwrap();
        service.create("B", "b", Some(a.id())).await.unwrap();

        assert!(matches!(
            service.delete(a.id(), false).await,
            Err(ServiceError::Tree(TreeError::HasChildren { .. }))
        ));

        let outcome = service.delete(a.id(), true).await.unwrap();
        assert_eq!(outcome.deleted, 2);
        service.audit().await.unwrap();
    }
}

mod comment_tests {
    use super::*;

    #[tokio::test]
    async fn test_thread_structure() {
        let service = CommentService::new(store());

        let top = service.create("First!", "user-1", "post-1").await.unwrap();
        let reply = service
            .reply(top.id(), "Welcome", "user-2")
            .await
            .unwrap();
        let nested = service
            .reply(reply.id(), "Thanks", "user-1")
            .await
            .unwrap();

        assert_eq!(reply.post_id(), "post-1");
        assert_eq!(nested.depth(), 2);

        let thread = service.thread(top.id()).await.unwrap();
        assert_eq!(thread.len(), 3);
        assert_eq!(thread[0].id(), top.id());

        let replies = service.replies(top.id()).await.unwrap();
        assert_eq!(replies.len(), 1);

        service.audit().await.unwrap();
    }

    #[tokio::test]
    async fn test_for_post_filters_roots() {
        let service = CommentService::new(store());

        let one = service.create("On post 1", "u", "post-1").await.unwrap();
        service.create("On post 2", "u", "post-2").await.unwrap();
        service.reply(one.id(), "Reply", "u").await.unwrap();

        let roots = service.for_post("post-1").await.unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id(), one.id());
    }

    #[tokio::test]
    async fn test_moderation_state_machine() {
        let service = CommentService::new(store());
        let comment = service.create("Hmm", "user-1", "post-1").await.unwrap();
        assert_eq!(comment.status(), CommentStatus::Pending);

        let approved = service.approve(comment.id()).await.unwrap();
        assert_eq!(approved.status(), CommentStatus::Approved);

        // Approving an approved comment is not a legal transition
        assert!(matches!(
            service.approve(comment.id()).await,
            Err(ServiceError::Validation(_))
        ));

        let rejected = service.reject(comment.id()).await.unwrap();
        assert_eq!(rejected.status(), CommentStatus::Rejected);

        // Explicit re-approval of a rejected comment is allowed
        let reapproved = service.approve(comment.id()).await.unwrap();
        assert_eq!(reapproved.status(), CommentStatus::Approved);
    }

    #[tokio::test]
    async fn test_with_status_lists_pending_queue() {
        let service = CommentService::new(store());

        let a = service.create("A", "u", "post-1").await.unwrap();
        let b = service.create("B", "u", "post-1").await.unwrap();
        service.approve(a.id()).await.unwrap();

        let pending = service.with_status(CommentStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id(), b.id());
    }

    #[tokio::test]
    async fn test_reparent_within_post() {
        let service = CommentService::new(store());

        let top = service.create("Top", "u", "post-1").await.unwrap();
        let other = service.create("Other", "u", "post-1").await.unwrap();
        let reply = service.reply(top.id(), "Misplaced", "u").await.unwrap();

        let moved = service.move_to(reply.id(), Some(other.id())).await.unwrap();
        assert_eq!(moved.parent_id(), Some(other.id()));
        assert_eq!(moved.depth(), 1);

        // Promotion to a top-level thread root
        let promoted = service.move_to(reply.id(), None).await.unwrap();
        assert_eq!(promoted.parent_id(), None);
        assert_eq!(promoted.depth(), 0);

        service.audit().await.unwrap();
    }

    #[tokio::test]
    async fn test_reparent_across_posts_rejected() {
        let service = CommentService::new(store());

        let on_one = service.create("One", "u", "post-1").await.unwrap();
        let on_two = service.create("Two", "u", "post-2").await.unwrap();
        let reply = service.reply(on_one.id(), "Reply", "u").await.unwrap();

        let result = service.move_to(reply.id(), Some(on_two.id())).await;
        assert!(matches!(
            result,
            Err(ServiceError::Tree(TreeError::HierarchyViolation(_)))
        ));

        // Untouched
        let unchanged = service.get(reply.id()).await.unwrap();
        assert_eq!(unchanged.parent_id(), Some(on_one.id()));
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_replies() {
        let store = store();
        let service = CommentService::new(Arc::clone(&store));

        let top = service.create("Top", "u", "post-1").await.unwrap();
        service.reply(top.id(), "Reply", "u").await.unwrap();

        assert!(matches!(
            service.delete(top.id(), false).await,
            Err(ServiceError::Tree(TreeError::HasChildren { .. }))
        ));

        let outcome = service.delete(top.id(), true).await.unwrap();
        assert_eq!(outcome.deleted, 2);
        assert_eq!(store.forest_len(HierarchyKind::Comment).await, 0);
    }
}

mod menu_tests {
    use super::*;

    #[tokio::test]
    async fn test_build_navigation_tree() {
        let service = MenuService::new(store());

        let main = service.create("Main", None, None).await.unwrap();
        let docs = service
            .create("Docs", Some("/docs"), Some(main.id()))
            .await
            .unwrap();
        service
            .create("Guides", Some("/docs/guides"), Some(docs.id()))
            .await
            .unwrap();

        assert_eq!(main.url(), None);
        assert_eq!(docs.url(), Some("/docs"));

        let nested = service.descendants(main.id()).await.unwrap();
        assert_eq!(nested.len(), 2);

        let trail = service.ancestors(nested[1].id()).await.unwrap();
        assert_eq!(
            trail.iter().map(|item| item.label()).collect::<Vec<_>>(),
            vec!["Main", "Docs"]
        );

        service.audit().await.unwrap();
    }

    #[tokio::test]
    async fn test_label_and_url_validation() {
        let store = store();
        let service = MenuService::new(Arc::clone(&store));

        assert!(service.create("", None, None).await.is_err());
        assert!(service
            .create("Home", Some("bad url"), None)
            .await
            .is_err());
        assert_eq!(store.forest_len(HierarchyKind::Menu).await, 0);

        let item = service.create("Home", Some("/"), None).await.unwrap();
        assert!(service.set_url(item.id(), Some("")).await.is_err());

        let header = service.set_url(item.id(), None).await.unwrap();
        assert_eq!(header.url(), None);

        let relabeled = service.relabel(item.id(), "Start").await.unwrap();
        assert_eq!(relabeled.label(), "Start");
    }

    #[tokio::test]
    async fn test_deactivate_and_move() {
        let service = MenuService::new(store());

        let main = service.create("Main", None, None).await.unwrap();
        let a = service
            .create("A", Some("/a"), Some(main.id()))
            .await
            .unwrap();
        let b = service
            .create("B", Some("/b"), Some(main.id()))
            .await
            .unwrap();

        let hidden = service.set_active(a.id(), false).await.unwrap();
        assert!(!hidden.is_active());

        service.move_to(a.id(), Some(b.id())).await.unwrap();
        let children = service.children(Some(b.id())).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].label(), "A");

        assert!(matches!(
            service.move_to(b.id(), Some(b.id())).await,
            Err(ServiceError::Tree(TreeError::CircularReference { .. }))
        ));

        service.audit().await.unwrap();
    }
}
