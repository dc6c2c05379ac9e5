/// An entity that can live inside a [`CollectionStore`](crate::store::CollectionStore).
///
/// The store never looks at business fields directly: it only needs an identity it can assign,
/// a key that defines the iteration order, and a predicate telling whether the fields are valid.
pub trait Record {
    /// The comparison key. Records are kept in non-decreasing key order.
    type Key: Ord + ?Sized;

    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);

    fn key(&self) -> &Self::Key;

    fn validate(&self) -> bool;
}
