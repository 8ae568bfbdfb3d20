//! API client library for showdeck.
//!
//! Provides a client for the TMDB v3 API covering the TV listing,
//! search, details, season and genre endpoints.

/// TMDB API client.
pub mod tmdb;
