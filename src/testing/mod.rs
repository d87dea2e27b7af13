//! Testing utilities for the SweetDate SDK.
//!
//! Provides a scripted [`Connector`](crate::connector::Connector) so
//! applications can exercise the full signing and validation pipeline
//! without a server.

mod mock;

pub use mock::{MockConnector, MockReply};
