//! Single-threaded publish/subscribe primitive.
//!
//! Every other subsystem (state machines, UI windows, game components) exposes
//! its notifications as an [`Event`]. Subscribers receive a [`Subscription`]
//! handle that revokes the callback when dropped.
//!
//! # Architecture
//!
//! - [`Event`]: shared subscriber table keyed by a monotonically increasing id
//! - [`Subscription`]: weak back-reference to the table plus the subscriber id
//!
//! # Design Principles
//!
//! - **Snapshot delivery**: `publish` copies the subscriber list before invoking
//!   callbacks, so re-entrant subscribe/unsubscribe only affects later passes
//! - **Order-independent teardown**: a subscription can be revoked before or
//!   after its event is dropped; revocation is idempotent
//! - **No threads**: handles are `Rc`-based and intentionally `!Send`

pub mod event;
pub mod subscription;

pub use event::{Event, SubscriberId};
pub use subscription::Subscription;
