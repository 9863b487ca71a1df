//! Lazy enumeration of candidate phrases.
//!
//! A [`CandidateSet`] is an ordered list of slots, each either a known word or
//! a set of possible words. Iterating it walks the Cartesian product like an
//! odometer: the last slot turns fastest, so candidates come out in
//! lexicographic order of the per-slot choice positions. Only the current
//! combination is held in memory.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Fixed(String),
    Choice(Vec<String>)
}

impl Slot {
    fn options(&self) -> &[String] {
        match self {
            Slot::Fixed(w) => std::slice::from_ref(w),
            Slot::Choice(ws) => ws
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    slots: Vec<Slot>
}

impl CandidateSet {
    pub fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of candidates, None if the product overflows u64.
    pub fn len(&self) -> Option<u64> {
        self.slots
            .iter()
            .try_fold(1u64, |acc, s| acc.checked_mul(s.options().len() as u64))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Starts a fresh pass over the product. Each call replays from the first candidate.
    pub fn iter(&self) -> Candidates<'_> {
        let exhausted = self.slots.iter().any(|s| s.options().is_empty());
        Candidates {
            slots: &self.slots,
            positions: vec![0; self.slots.len()],
            done: exhausted,
            remaining: if exhausted { Some(0) } else { self.len() }
        }
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = Vec<String>;
    type IntoIter = Candidates<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pull-based iterator over a [`CandidateSet`].
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    slots: &'a [Slot],
    positions: Vec<usize>,
    done: bool,
    remaining: Option<u64>
}

impl<'a> Iterator for Candidates<'a> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None
        }

        let words: Vec<String> = self.slots
            .iter()
            .zip(self.positions.iter())
            .map(|(slot, &p)| slot.options()[p].clone())
            .collect();

        //Advance the odometer, carrying leftwards
        self.done = true;
        for i in (0..self.slots.len()).rev() {
            self.positions[i] += 1;
            if self.positions[i] < self.slots[i].options().len() {
                self.done = false;
                break;
            }
            self.positions[i] = 0;
        }
        if let Some(r) = self.remaining.as_mut() {
            *r = r.saturating_sub(1);
        }

        Some(words)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining.and_then(|r| usize::try_from(r).ok()) {
            Some(r) => (r, Some(r)),
            None => (usize::MAX, None)
        }
    }
}

impl<'a> std::iter::FusedIterator for Candidates<'a> {}
