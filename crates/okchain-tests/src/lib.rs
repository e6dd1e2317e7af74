//! End-to-end test suite for the OKChain client.
//!
//! Integration tests under `tests/` drive the real `Client`, builder and
//! decoders against a [`helpers::ScriptedTransport`] that replays canned
//! node responses and records every request it receives.

pub mod helpers;
