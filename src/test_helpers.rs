#![cfg(any(test, feature = "test-helpers"))]
//! Test-only helpers shared by unit and integration tests.

pub mod scripted_adapter;

pub use scripted_adapter::{ScriptedAdapter, ScriptedFrame};
