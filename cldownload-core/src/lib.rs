#![doc = "cldownload-core: tree assembly, printing and materialization for Classeur content."]

//! This crate holds all logic for mirroring a Classeur hierarchy: the remote data
//! model, the [`contract::ClasseurApi`] collaborator trait, the in-memory tree,
//! console rendering and the recursive writer that materializes a tree on disk.
//! Transport (HTTP) and the command line live in the `cldownload` crate.
//!
//! # Usage
//! Seed a [`tree::Tree`] with [`download::seed_tree`], then either render it with
//! [`printer`] or hand it to a [`materialize::Materializer`].

pub mod config;
pub mod contract;
pub mod download;
pub mod error;
pub mod identity;
pub mod materialize;
pub mod node;
pub mod printer;
pub mod tree;
pub mod writer;
