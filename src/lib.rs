//! A positional list backed by an implicit-key B-tree.
//!
//! This crate provides [`BTreeList`], a sequence addressed by position like a `Vec`, where
//! every positional operation takes O(log n) time regardless of where in the list it lands:
//!
//! - [`get`](BTreeList::get) / [`set`](BTreeList::set) - Read or replace the value at a position
//! - [`insert`](BTreeList::insert) - Insert before any position, shifting later values up
//! - [`remove`](BTreeList::remove) - Remove from any position, shifting later values down
//! - [`append_all`](BTreeList::append_all) - Bulk append that packs values into full leaves
//!
//! # Example
//!
//! ```
//! use btree_list::BTreeList;
//!
//! let mut list: BTreeList<u32> = (0..10_000).collect();
//!
//! // Middle insertions and removals never shift more than one node.
//! list.insert(5_000, 42).unwrap();
//! assert_eq!(list.get(5_000), Ok(&42));
//! assert_eq!(list.remove(0), Ok(0));
//! assert_eq!(list.len(), 10_000);
//!
//! // Iteration visits values in position order.
//! assert!(list.iter().take(3).copied().eq([1, 2, 3]));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **No stored positions** - Every node caches its subtree size instead, so inserting at
//!   the front renumbers nothing
//! - **Configurable order** - [`BTreeList::with_order`] picks the node size, [`DEFAULT_ORDER`]
//!   otherwise
//! - **`tracing`** - Optional feature that logs splits, merges and root changes
//!
//! # Implementation
//!
//! Values live only in leaves and every leaf sits at the same depth. Internal nodes hold
//! child handles into a node arena together with the total number of values below them.
//! Every node except the root stays at least half full.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

#[macro_use]
mod tracing_helpers;

mod error;
mod raw;

pub mod btree_list;

pub use btree_list::{BTreeList, DEFAULT_ORDER};
pub use error::Error;
