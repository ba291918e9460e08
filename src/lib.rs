//! Wordcrawl - a parallel word-counting web crawler
//!
//! This library crawls the web from a set of starting URLs, counting the
//! words on every page it visits and ranking the most popular ones, subject
//! to a wall-clock time budget, a maximum link depth, and URL exclusion
//! patterns.

pub mod crawler;
