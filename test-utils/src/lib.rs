//! Discord History Test Utils
//!
//! Provides shared testing utilities for the discord-history crate: factories
//! producing the JSON payloads Discord's REST API returns for channels and
//! messages, so tests can script transports without hand-writing payloads.
//!
//! # Overview
//!
//! - **MessageFactory**: Fluent builder for message payloads
//! - **Channel factories**: Text, voice, category and DM channel listing entries
//! - **create_history**: Evenly spaced, newest-first message histories
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::factory::{create_history, create_text_channel, MessageFactory};
//!
//! let channel = create_text_channel(1, "general");
//! let message = MessageFactory::new().content("hi").author("9", "a").build();
//! let history = create_history(now, 240, chrono::Duration::hours(1));
//! ```

pub mod factory;
