pub mod config;
pub mod error;
pub mod logging;

pub mod locator;
pub mod page;
pub mod poll;
pub mod reconcile;
pub mod row;
pub mod search;
pub mod session;
pub mod waiter;
pub mod watch;
