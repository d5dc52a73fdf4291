use super::BTreeList;
use crate::Error;
use crate::raw::RawBTreeList;

impl<T> BTreeList<T> {
    /// Creates an empty list whose nodes hold at most `order` slots.
    ///
    /// Small orders make deep trees, which is mostly useful for exercising rebalancing.
    /// Larger orders trade longer in-node shifts for fewer levels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] if `order < 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::{BTreeList, Error};
    ///
    /// let list: BTreeList<u8> = BTreeList::with_order(4).unwrap();
    /// assert_eq!(list.order(), 4);
    /// assert_eq!(BTreeList::<u8>::with_order(1).unwrap_err(), Error::InvalidOrder { order: 1 });
    /// ```
    pub fn with_order(order: usize) -> Result<Self, Error> {
        if order < 2 {
            return Err(Error::InvalidOrder { order });
        }
        debug_log!(order, "creating list");
        Ok(BTreeList {
            raw: RawBTreeList::new(order),
        })
    }

    /// Returns the maximum number of slots in a node.
    #[must_use]
    pub fn order(&self) -> usize {
        self.raw.order()
    }

    /// Returns the fewest slots any node other than the root may hold, `ceil(order / 2)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// assert_eq!(BTreeList::<u8>::with_order(5).unwrap().min_occupancy(), 3);
    /// assert_eq!(BTreeList::<u8>::with_order(64).unwrap().min_occupancy(), 32);
    /// ```
    #[must_use]
    pub fn min_occupancy(&self) -> usize {
        self.raw.min_occupancy()
    }

    /// Returns the number of internal levels above the leaves; 0 while the root is a leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let mut list = BTreeList::with_order(2).unwrap();
    /// assert_eq!(list.height(), 0);
    /// list.append_all(0..8);
    /// assert!(list.height() >= 2);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Checks every structural invariant of the tree.
    ///
    /// A list built only through this API always passes. This walks the whole tree and is
    /// meant for tests and debugging.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`] listing every broken invariant found.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn validate(&self) -> Result<(), Error> {
        self.raw.validate()
    }
}
