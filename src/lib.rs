//! Stream configuration for RTKLIB-based GNSS receivers.
//!
//! The core is the connection-string codec in [`proto`]: it turns a
//! [`ConnectionDescriptor`] into the single-line path the receiver stores and
//! back. [`config`] models the parameter snapshots exchanged with the backend
//! and the `.conf` files they come from, [`session`] owns the message channel.

pub mod channel;
pub mod config;
pub mod port;
pub mod proto;
pub mod session;

pub use proto::{ConnectionDescriptor, Field, StreamKind, decode, encode, fields_for};
