mod arena;
mod cursor;
mod handle;
mod node;
mod raw_btree_list;

pub(crate) use cursor::LeafCursor;
pub(crate) use raw_btree_list::RawBTreeList;
