//! Integration tests with mock HTTP server

mod mock_server;

mod caching;
mod commons;
mod lookup;
mod wikidata;
