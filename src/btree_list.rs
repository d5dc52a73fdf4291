use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::mem;
use core::ops::{Index, IndexMut};
use core::slice;

use crate::Error;
use crate::raw::{LeafCursor, RawBTreeList};

mod order;

/// Node order used by [`BTreeList::new`].
pub const DEFAULT_ORDER: usize = 64;

/// A positional list backed by an implicit-key [B-Tree].
///
/// Values are addressed by their position, from `0` to `len() - 1`, just like a [`Vec`].
/// Unlike a `Vec`, inserting or removing in the middle never shifts more than one node's
/// worth of values: every operation that addresses a position takes `O(log n)` time.
///
/// Positions are never stored. Each internal node remembers how many values live below it,
/// and a lookup walks down from the root subtracting subtree sizes, so an insertion at
/// position 0 renumbers every later value for free.
///
/// Iteration through [`BTreeList::iter`] or [`BTreeList::for_each`] visits values in
/// position order in `O(n)` total time. The list cannot be modified while an iterator
/// borrows it.
///
/// # Examples
///
/// ```
/// use btree_list::BTreeList;
///
/// let mut queue = BTreeList::new();
///
/// // pile up some work.
/// queue.push("write docs");
/// queue.push("fix bug");
/// queue.push("ship");
///
/// // something urgent came up.
/// queue.insert(0, "answer pager").unwrap();
/// assert_eq!(queue.get(1), Ok(&"write docs"));
///
/// // the bug turned out to be a feature.
/// assert_eq!(queue.remove(2), Ok("fix bug"));
///
/// for task in &queue {
///     println!("{task}");
/// }
/// assert_eq!(queue.len(), 3);
/// ```
///
/// A `BTreeList` with a known list of items can be initialized from an array:
///
/// ```
/// use btree_list::BTreeList;
///
/// let planets = BTreeList::from(["Mercury", "Venus", "Earth", "Mars"]);
/// assert_eq!(planets[2], "Earth");
/// ```
///
/// [B-Tree]: https://en.wikipedia.org/wiki/B-tree
pub struct BTreeList<T> {
    raw: RawBTreeList<T>,
}

/// An iterator over the values of a `BTreeList`.
///
/// This `struct` is created by the [`iter`] method on [`BTreeList`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use btree_list::BTreeList;
///
/// let list = BTreeList::from([1, 2, 3]);
/// let mut iter = list.iter();
/// assert_eq!(iter.len(), 3);
/// assert_eq!(iter.next(), Some(&1));
/// ```
///
/// [`iter`]: BTreeList::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    leaves: LeafCursor<'a, T>,
    values: slice::Iter<'a, T>,
    remaining: usize,
}

/// An owning iterator over the values of a `BTreeList`.
///
/// This `struct` is created by the [`into_iter`] method on [`BTreeList`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> BTreeList<T> {
    /// Makes a new, empty `BTreeList` with nodes of [`DEFAULT_ORDER`] slots.
    ///
    /// Allocates a single empty leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let mut list = BTreeList::new();
    ///
    /// // values can now be pushed onto the empty list
    /// list.push(1);
    /// ```
    #[must_use]
    pub fn new() -> BTreeList<T> {
        BTreeList {
            raw: RawBTreeList::new(DEFAULT_ORDER),
        }
    }

    /// Returns the number of values in the list.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let mut a = BTreeList::new();
    /// assert_eq!(a.len(), 0);
    /// a.push(1);
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the list contains no values.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let mut a = BTreeList::new();
    /// assert!(a.is_empty());
    /// a.push(1);
    /// assert!(!a.is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns a reference to the value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] unless `index < len()`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::{BTreeList, Error};
    ///
    /// let list = BTreeList::from(['a', 'b']);
    /// assert_eq!(list.get(1), Ok(&'b'));
    /// assert_eq!(list.get(2), Err(Error::OutOfRange { index: 2, len: 2 }));
    /// ```
    pub fn get(&self, index: usize) -> Result<&T, Error> {
        let len = self.len();
        self.raw.get(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Returns a mutable reference to the value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] unless `index < len()`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let mut list = BTreeList::from([1, 2, 3]);
    /// if let Ok(x) = list.get_mut(1) {
    ///     *x *= 10;
    /// }
    /// assert_eq!(list[1], 20);
    /// ```
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.len();
        self.raw.get_mut(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Returns the value at position 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if the list holds no values.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::{BTreeList, Error};
    ///
    /// let mut list = BTreeList::new();
    /// assert_eq!(list.first(), Err(Error::Empty));
    /// list.push(7);
    /// list.push(8);
    /// assert_eq!(list.first(), Ok(&7));
    /// ```
    pub fn first(&self) -> Result<&T, Error> {
        self.raw.first().ok_or(Error::Empty)
    }

    /// Returns the value at position `len() - 1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if the list holds no values.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let list = BTreeList::from([7, 8]);
    /// assert_eq!(list.last(), Ok(&8));
    /// ```
    pub fn last(&self) -> Result<&T, Error> {
        self.raw.last().ok_or(Error::Empty)
    }

    /// Replaces the value at `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] unless `index < len()`. The list is left unchanged.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let mut list = BTreeList::from(["a", "b"]);
    /// assert_eq!(list.set(0, "z"), Ok("a"));
    /// assert_eq!(list[0], "z");
    /// assert!(list.set(2, "nope").is_err());
    /// ```
    pub fn set(&mut self, index: usize, value: T) -> Result<T, Error> {
        self.get_mut(index).map(|slot| mem::replace(slot, value))
    }

    /// Inserts `value` at position `index`, shifting every later value one position up.
    ///
    /// `index == len()` appends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsertOutOfRange`] if `index > len()`. The list is left unchanged.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let mut list = BTreeList::from([1, 3]);
    /// list.insert(1, 2).unwrap();
    /// list.insert(3, 4).unwrap();
    /// assert!(list.insert(9, 9).is_err());
    /// assert!(list.iter().copied().eq(1..=4));
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), Error> {
        let len = self.len();
        if index > len {
            return Err(Error::InsertOutOfRange { index, len });
        }
        if index == len {
            self.raw.push(value);
        } else {
            self.raw.insert(index, value);
        }
        Ok(())
    }

    /// Appends `value` at position `len()`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let mut list = BTreeList::new();
    /// list.push('x');
    /// assert_eq!(list.last(), Ok(&'x'));
    /// ```
    pub fn push(&mut self, value: T) {
        self.raw.push(value);
    }

    /// Appends every value of `values` in order.
    ///
    /// Values are packed into full leaves and linked in along the right edge of the tree,
    /// which is cheaper than pushing them one by one.
    ///
    /// # Complexity
    ///
    /// O(k + log n) for `k` appended values.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let mut list = BTreeList::from([0]);
    /// list.append_all(1..1000);
    /// assert_eq!(list.len(), 1000);
    /// assert_eq!(list[999], 999);
    /// ```
    pub fn append_all<I: IntoIterator<Item = T>>(&mut self, values: I) {
        self.raw.append_all(values);
    }

    /// Removes and returns the value at `index`, shifting every later value one position
    /// down.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] unless `index < len()`. The list is left unchanged.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::{BTreeList, Error};
    ///
    /// let mut list = BTreeList::from([1, 2, 3]);
    /// assert_eq!(list.remove(0), Ok(1));
    /// assert_eq!(list.remove(2), Err(Error::OutOfRange { index: 2, len: 2 }));
    /// assert_eq!(list.first(), Ok(&2));
    /// ```
    pub fn remove(&mut self, index: usize) -> Result<T, Error> {
        let len = self.len();
        if index >= len {
            return Err(Error::OutOfRange { index, len });
        }
        Ok(self.raw.remove(index))
    }

    /// Clears the list, removing all values. The order is kept.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let mut a = BTreeList::from([1, 2]);
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Gets an iterator over the values of the list, in position order.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let list = BTreeList::from([3, 1, 2]);
    /// let seen: Vec<_> = list.iter().collect();
    /// assert_eq!(seen, [&3, &1, &2]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            leaves: LeafCursor::new(&self.raw),
            values: [].iter(),
            remaining: self.len(),
        }
    }

    /// Calls `f` on every value in position order.
    ///
    /// Walks the leaves one slice at a time, skipping the per-item bookkeeping of [`iter`].
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let list = BTreeList::from([1, 2, 3]);
    /// let mut sum = 0;
    /// list.for_each(|x| sum += x);
    /// assert_eq!(sum, 6);
    /// ```
    ///
    /// [`iter`]: BTreeList::iter
    pub fn for_each<F: FnMut(&T)>(&self, mut f: F) {
        self.raw.for_each_slice(|values| values.iter().for_each(&mut f));
    }

    /// Copies the values into a new [`Vec`] in position order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooLarge`] if the values cannot fit in a single allocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let list = BTreeList::from([1, 2, 3]);
    /// assert_eq!(list.to_vec(), Ok(vec![1, 2, 3]));
    /// ```
    pub fn to_vec(&self) -> Result<Vec<T>, Error>
    where
        T: Clone,
    {
        let len = self.len();
        let fits = mem::size_of::<T>().checked_mul(len).is_some_and(|bytes| isize::try_from(bytes).is_ok());
        if !fits {
            return Err(Error::TooLarge { len });
        }

        let mut out = Vec::new();
        out.try_reserve_exact(len).map_err(|_| Error::TooLarge { len })?;
        self.raw.for_each_slice(|values| out.extend_from_slice(values));
        Ok(out)
    }

    /// Moves the values into a [`Vec`] in position order, consuming the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let list = BTreeList::from([String::from("a"), String::from("b")]);
    /// assert_eq!(list.into_vec(), ["a", "b"]);
    /// ```
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.raw.into_vec()
    }
}

impl<T> Default for BTreeList<T> {
    fn default() -> Self {
        BTreeList::new()
    }
}

impl<T: Clone> Clone for BTreeList<T> {
    fn clone(&self) -> Self {
        BTreeList { raw: self.raw.clone() }
    }
}

impl<T> Index<usize> for BTreeList<T> {
    type Output = T;

    /// Returns a reference to the value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<usize> for BTreeList<T> {
    /// Returns a mutable reference to the value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.get_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: Hash> Hash for BTreeList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        self.for_each(|value| value.hash(state));
    }
}

impl<T: PartialEq> PartialEq for BTreeList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for BTreeList<T> {}

impl<T: PartialOrd> PartialOrd for BTreeList<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for BTreeList<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: fmt::Debug> fmt::Debug for BTreeList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for BTreeList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = BTreeList::new();
        list.append_all(iter);
        list
    }
}

impl<T> Extend<T> for BTreeList<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append_all(iter);
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for BTreeList<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.append_all(iter.into_iter().copied());
    }
}

impl<T, const N: usize> From<[T; N]> for BTreeList<T> {
    /// Converts a `[T; N]` into a `BTreeList<T>`, keeping the array order.
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let list1 = BTreeList::from([1, 2, 3, 4]);
    /// let list2: BTreeList<_> = [1, 2, 3, 4].into();
    /// assert_eq!(list1, list2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        BTreeList::from_iter(arr)
    }
}

impl<T> From<Vec<T>> for BTreeList<T> {
    fn from(values: Vec<T>) -> Self {
        BTreeList::from_iter(values)
    }
}

impl<'a, T> IntoIterator for &'a BTreeList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for BTreeList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an owning iterator over the values of the list, in position order.
    ///
    /// ```
    /// use btree_list::BTreeList;
    ///
    /// let list = BTreeList::from(['a', 'b']);
    /// let values: Vec<char> = list.into_iter().collect();
    /// assert_eq!(values, ['a', 'b']);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.into_vec().into_iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(value) = self.values.next() {
                self.remaining -= 1;
                return Some(value);
            }
            if self.remaining == 0 {
                return None;
            }
            self.values = self.leaves.next_leaf()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            leaves: self.leaves.clone(),
            values: self.values.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<T> Default for IntoIter<T> {
    /// Creates an empty `btree_list::IntoIter`.
    ///
    /// ```
    /// # use btree_list::btree_list;
    /// let iter: btree_list::IntoIter<u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter { inner: Vec::new().into_iter() }
    }
}
