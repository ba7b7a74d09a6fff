//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `CategoryService` / `CommentService` / `MenuService` - hierarchy
//!   entity wrappers over the interval tree
//! - `AssociationService` - polymorphic attachment bookkeeping
//! - `TagService` / `MediaService` - thin consumers of the association
//!   layer
//!
//! Services validate domain fields before delegating structural changes,
//! implementing the validate-before-mutate ordering: a field failure
//! never reaches the tree or the stores.

pub mod association_service;
pub mod category_service;
pub mod comment_service;
pub mod error;
pub mod media_service;
pub mod menu_service;
pub mod tag_service;

pub use association_service::AssociationService;
pub use category_service::CategoryService;
pub use comment_service::CommentService;
pub use error::ServiceError;
pub use media_service::MediaService;
pub use menu_service::MenuService;
pub use tag_service::TagService;
