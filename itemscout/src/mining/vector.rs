use super::bitset::{support_of, Bitmask};

/// The unit manipulated by the search: which items form the itemset, which
/// transactions contain all of them, and how many such transactions exist.
///
/// `support` is derived from `transaction_mask` at construction and the fields
/// are private, so the two can never drift apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemsetVector {
    item_mask: Bitmask,
    transaction_mask: Bitmask,
    support: usize,
}

impl ItemsetVector {
    pub fn new(item_mask: Bitmask, transaction_mask: Bitmask) -> Self {
        let support = support_of(&transaction_mask);
        Self {
            item_mask,
            transaction_mask,
            support,
        }
    }

    /// Combines two vectors into the vector of their joint itemset.
    pub fn combine(&self, other: &ItemsetVector) -> Self {
        Self::new(
            self.item_mask.union(&other.item_mask),
            self.transaction_mask.intersect(&other.transaction_mask),
        )
    }

    #[inline]
    pub fn item_mask(&self) -> &Bitmask {
        &self.item_mask
    }

    #[inline]
    pub fn transaction_mask(&self) -> &Bitmask {
        &self.transaction_mask
    }

    #[inline]
    pub fn support(&self) -> usize {
        self.support
    }

    /// Number of items in the itemset.
    #[inline]
    pub fn len(&self) -> usize {
        self.item_mask.count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.item_mask.is_empty()
    }
}
