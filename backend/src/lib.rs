//! Backend for the pocket-money tracker: ledger computation, period keys,
//! JSON document persistence, and the HTTP API.

pub mod domain;
pub mod rest;
pub mod storage;
