// ABOUTME: HTTP middleware shared by every route of the log stream server
// ABOUTME: Currently holds the CORS layer configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cross-origin resource sharing layer
pub mod cors;

// CORS configuration
pub use cors::setup_cors;
