//! # WikiVault
//!
//! A minimal wiki storage engine: named text pages whose every
//! mutation is recorded as a revision in a content-addressed object
//! store, plus a resolver that rewrites `[[Page|Label]]` references
//! in rendered HTML into live links or create-page placeholders.

/// Error taxonomy shared by the whole crate.
pub mod error;
/// Resolves inline `[[...]]` references against the current page set.
pub mod links;
/// Markdown to HTML rendering.
pub mod markup;
/// Hash-based binary object identifier.
pub mod object_id;
/// Content addressible store API using the [`ObjectId`](object_id::ObjectId).
pub mod object_store;
/// A named handle over one page in a [`Repository`](store::Repository).
pub mod page;
/// The flat page-name-to-content table captured by each revision.
pub mod page_tree;
/// One attributed, immutable snapshot of the whole page set.
pub mod revision;
/// The on-disk repository: current snapshot, commits, history.
pub mod store;
