//! Weighted random selection.

use core::cell::Cell;

use rand::Rng;
use tracing::{trace, warn};

/// One weighted pool member.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedEntry<T> {
    pub item: T,
    pub weight: f64,
}

impl<T> WeightedEntry<T> {
    /// Creates an entry, clamping negative (and NaN) weights to 0.
    pub fn new(item: T, weight: f64) -> Self {
        Self {
            item,
            weight: sanitize_weight(weight),
        }
    }
}

/// A weighted pool of items (a gacha table).
///
/// Entries keep insertion order, which is also the walk order of a draw.
/// Equal items are merged by summing weights. Zero-weight entries stay
/// visible through [`entries`](Self::entries) and [`rates`](Self::rates) but
/// are never drawn while any positive weight remains. Once only zero weights
/// are left, a draw falls back to the last of them: an all-zero pool always
/// yields its last entry, and [`pick_many`](Self::pick_many) without
/// duplicates keeps returning zero-weight entries after the positive ones
/// are used up.
///
/// # Example
/// ```
/// # use tactics_core::{PcgRng, WeightedSelector};
/// let mut pool = WeightedSelector::new();
/// pool.add("potion", 3.0);
/// pool.add("sword", 1.0);
///
/// let mut rng = PcgRng::new(7);
/// let picks = pool.pick_many(5, false, &mut rng);
/// assert_eq!(picks.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct WeightedSelector<T> {
    entries: Vec<WeightedEntry<T>>,
    total: Cell<f64>,
    dirty: Cell<bool>,
}

impl<T: PartialEq> WeightedSelector<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            total: Cell::new(0.0),
            dirty: Cell::new(false),
        }
    }

    /// Adds `weight` to `item`, appending it if not yet present.
    pub fn add(&mut self, item: T, weight: f64) {
        let weight = sanitize_weight(weight);
        match self.entries.iter_mut().find(|entry| entry.item == item) {
            Some(entry) => entry.weight += weight,
            None => self.entries.push(WeightedEntry { item, weight }),
        }
        self.dirty.set(true);
    }

    /// Removes the first entry equal to `item`. Returns false if absent.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(index) = self.entries.iter().position(|entry| &entry.item == item) else {
            return false;
        };
        self.entries.remove(index);
        self.dirty.set(true);
        true
    }

    pub fn contains(&self, item: &T) -> bool {
        self.entries.iter().any(|entry| &entry.item == item)
    }

    /// Weight of `item`, if present.
    pub fn weight_of(&self, item: &T) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| &entry.item == item)
            .map(|entry| entry.weight)
    }
}

impl<T> WeightedSelector<T> {
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total.set(0.0);
        self.dirty.set(false);
    }

    /// Sum of all weights (cached until the pool changes). 0 when empty.
    pub fn total_weight(&self) -> f64 {
        if self.dirty.get() {
            self.total.set(self.entries.iter().map(|entry| entry.weight).sum());
            self.dirty.set(false);
        }
        self.total.get()
    }

    /// Draws one item.
    ///
    /// Returns `None` only for an empty pool. When every weight is 0 the last
    /// entry is returned.
    pub fn pick_one<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        let index = walk(&self.entries, self.total_weight(), rng)?;
        self.entries.get(index).map(|entry| &entry.item)
    }

    /// Item selection probabilities, in entry order.
    ///
    /// Empty when the total weight is 0.
    pub fn rates(&self) -> Vec<(&T, f64)> {
        let total = self.total_weight();
        if total <= 0.0 {
            return Vec::new();
        }
        self.entries
            .iter()
            .map(|entry| (&entry.item, entry.weight / total))
            .collect()
    }

    pub fn all_items(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.item)
    }

    pub fn entries(&self) -> &[WeightedEntry<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> WeightedSelector<T> {
    /// Draws up to `count` items.
    ///
    /// With `allow_duplicates`, performs `count` independent [`pick_one`]
    /// draws. Without, samples without replacement and stops once the pool
    /// is exhausted, so at most `len()` items are returned. Zero-weight
    /// entries fill the remaining slots, last first, after every positive
    /// entry has been drawn.
    ///
    /// [`pick_one`]: Self::pick_one
    pub fn pick_many<R: Rng + ?Sized>(
        &self,
        count: usize,
        allow_duplicates: bool,
        rng: &mut R,
    ) -> Vec<T> {
        if allow_duplicates {
            return (0..count)
                .filter_map(|_| self.pick_one(rng).cloned())
                .collect();
        }

        let mut working: Vec<&WeightedEntry<T>> = self.entries.iter().collect();
        let draws = count.min(working.len());
        let mut picks = Vec::with_capacity(draws);

        for _ in 0..draws {
            let total: f64 = working.iter().map(|entry| entry.weight).sum();
            let Some(index) = walk(working.iter().copied(), total, rng) else {
                break;
            };
            picks.push(working.remove(index).item.clone());
        }

        trace!(
            target: "tactics_core::gacha",
            requested = count,
            drawn = picks.len(),
            "drew without replacement"
        );
        picks
    }
}

impl<T: PartialEq> Default for WeightedSelector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> FromIterator<(T, f64)> for WeightedSelector<T> {
    fn from_iter<I: IntoIterator<Item = (T, f64)>>(iter: I) -> Self {
        let mut selector = Self::new();
        for (item, weight) in iter {
            selector.add(item, weight);
        }
        selector
    }
}

impl<T: PartialEq> Extend<(T, f64)> for WeightedSelector<T> {
    fn extend<I: IntoIterator<Item = (T, f64)>>(&mut self, iter: I) {
        for (item, weight) in iter {
            self.add(item, weight);
        }
    }
}

fn sanitize_weight(weight: f64) -> f64 {
    if weight > 0.0 { weight } else { 0.0 }
}

/// Index of the entry a uniform roll in `[0, total)` lands on.
///
/// Zero-weight entries are skipped. Falls back to the last entry when
/// `total` is 0 or rounding leaves a positive remainder.
fn walk<'a, T: 'a, I, R>(entries: I, total: f64, rng: &mut R) -> Option<usize>
where
    I: IntoIterator<Item = &'a WeightedEntry<T>>,
    R: Rng + ?Sized,
{
    let mut last = None;
    if total > 0.0 {
        let mut remainder = rng.gen_range(0.0..total);
        for (index, entry) in entries.into_iter().enumerate() {
            last = Some(index);
            if entry.weight <= 0.0 {
                continue;
            }
            remainder -= entry.weight;
            if remainder <= 0.0 {
                return Some(index);
            }
        }
    } else {
        last = entries.into_iter().enumerate().last().map(|(index, _)| index);
    }

    if last.is_some() {
        warn!(
            target: "tactics_core::gacha",
            total,
            "weighted walk fell through; returning last entry"
        );
    }
    last
}
