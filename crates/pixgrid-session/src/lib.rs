//! pixgrid-session: In-memory store of uploaded source images.
//!
//! A client uploads an image once and converts it repeatedly with
//! different parameters. [`SessionStore`] keeps each decoded upload
//! under an unguessable [`SessionId`], hands it out to concurrent
//! conversions, and forgets it after a period of inactivity.
//!
//! Expiry is driven by [`Reaper`], a cancellable background task that
//! calls [`SessionStore::reap_expired`] on a fixed interval. Tests can
//! call `reap_expired` directly with a [`ManualClock`] instead of
//! waiting on wall-clock time.
//!
//! Nothing is persisted; dropping the store discards every session.

pub mod clock;
pub mod config;
pub mod error;
pub mod id;
pub mod reaper;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SessionConfig;
pub use error::SessionError;
pub use id::SessionId;
pub use reaper::Reaper;
pub use store::{SessionInfo, SessionStore};
