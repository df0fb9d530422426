mod collection;
mod config;
mod debounce;
mod session;
mod subscribe;
mod synchronizer;

pub use crate::collection::{
    ObjectCollection,
    Snapshot,
};
pub use crate::config::SyncSettings;
pub use crate::debounce::Debounce;
pub use crate::session::SyncSession;
pub use crate::subscribe::{
    Dispatch,
    InlineDispatch,
    Subscription,
    subscribe,
};
pub use crate::synchronizer::{
    ResourceSynchronizer,
    SnapshotReceiver,
};

#[cfg(test)]
mod tests;
