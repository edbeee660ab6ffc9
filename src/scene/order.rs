//! Scene ordering: The comparator behind draw order and hit-testing.
//!
//! Objects are drawn in ascending [`SortOrdered::sort_order`], so a higher
//! order draws on top. Hit-testing walks the same order backwards to find
//! the topmost object under the pointer.

use std::cmp::Ordering;

/// Anything that carries a sort order.
pub trait SortOrdered {
    /// Draw/hit-test precedence; higher draws later (on top).
    fn sort_order(&self) -> u32;
}

/// Total order over optional orderable objects.
///
/// - the same object, or two absent objects, compare equal
/// - an absent object sorts after a present one
/// - otherwise ascending by sort order, with ties equal
///
/// Ties are left to the caller: use a stable sort to keep insertion order.
pub fn compare<T: SortOrdered + ?Sized>(x: Option<&T>, y: Option<&T>) -> Ordering {
    match (x, y) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) if std::ptr::eq(a, b) => Ordering::Equal,
        (Some(a), Some(b)) => a.sort_order().cmp(&b.sort_order()),
    }
}

/// Stable sort of present objects by sort order.
pub fn sort_by_order<T: SortOrdered>(items: &mut [&T]) {
    items.sort_by(|a, b| compare(Some(*a), Some(*b)));
}
