//! End-to-end integration tests for plog.
//!
//! These tests exercise the full stack:
//! - Logger buffering and severity gating over both transports
//! - HTTP service startup and shutdown
//! - Direct and HTTP transport parity
//! - Error propagation across the wire
//! - Durable storage across service restarts

#![cfg(test)]
