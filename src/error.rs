use alloc::string::String;

use thiserror::Error;

/// Errors reported by [`BTreeList`](crate::BTreeList).
///
/// Every operation checks its preconditions before touching the tree, so a call that
/// returns an error leaves the list unchanged.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    /// An access or removal index was outside `[0, len)`.
    #[error("index {index} should be in the range [0, {len})")]
    OutOfRange {
        /// The rejected index.
        index: usize,
        /// The length of the list at the time of the call.
        len: usize,
    },

    /// An insertion index was outside `[0, len]`.
    #[error("index {index} should be in the range [0, {len}]")]
    InsertOutOfRange {
        /// The rejected index.
        index: usize,
        /// The length of the list at the time of the call.
        len: usize,
    },

    /// `first()` or `last()` was called on an empty list.
    #[error("cannot get an element of an empty list")]
    Empty,

    /// The list is too large to be materialized into a single `Vec`.
    #[error("too big ({len}) to be converted to a vector")]
    TooLarge {
        /// The number of elements that were requested.
        len: usize,
    },

    /// The requested tree order cannot hold a balanced tree.
    #[error("order {order} is too small; a tree needs an order of at least 2")]
    InvalidOrder {
        /// The rejected order.
        order: usize,
    },

    /// [`validate`](crate::BTreeList::validate) found a broken structural invariant.
    #[error("tree invariant violations:\n{0}")]
    InvariantViolation(String),
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_violated_range() {
        let access = Error::OutOfRange { index: 7, len: 5 };
        let insert = Error::InsertOutOfRange { index: 7, len: 5 };
        assert_eq!(access.to_string(), "index 7 should be in the range [0, 5)");
        assert_eq!(insert.to_string(), "index 7 should be in the range [0, 5]");
    }

    #[test]
    fn invalid_order_message() {
        assert_eq!(
            Error::InvalidOrder { order: 1 }.to_string(),
            "order 1 is too small; a tree needs an order of at least 2"
        );
    }
}
