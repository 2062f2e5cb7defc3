//! Approximate bucketed priority queue.
//!
//! Values live in an ordered list of buckets. Every value in bucket `i` is
//! less than or equal to every value in bucket `i + 1`, but buckets are not
//! sorted internally. Inserts are a short scan over bucket bounds; only bucket
//! 0 is ever searched for a minimum, and it is refilled from the next bucket
//! when it runs dry. This favours workloads with many more inserts than
//! extractions, such as an A* open set.

use std::cmp::Ordering;
use std::fmt;

use crate::error::SearchError;

/// Bucket capacities and split thresholds.
///
/// `sizes[i]` is how many values a refill moves into bucket `i`; the last
/// bucket is conventionally unbounded (`usize::MAX`). `split[i]` is the length
/// above which bucket `i` is split into bucket `i + 1`. Buckets without a
/// split entry never split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    sizes: Vec<usize>,
    split: Vec<usize>,
}

impl QueueConfig {
    /// Build a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if the configuration fails
    /// [`QueueConfig::validate`].
    pub fn new(sizes: Vec<usize>, split: Vec<usize>) -> Result<Self, SearchError> {
        let config = Self { sizes, split };
        config.validate()?;
        Ok(config)
    }

    /// Check that there is at least one bucket and that no capacity or split
    /// threshold is zero.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] naming the offending field.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.sizes.is_empty() {
            return Err(SearchError::InvalidPolicy {
                detail: "queue needs at least one bucket".into(),
            });
        }
        if let Some(i) = self.sizes.iter().position(|s| *s == 0) {
            return Err(SearchError::InvalidPolicy {
                detail: format!("queue bucket {i} has zero capacity"),
            });
        }
        if let Some(i) = self.split.iter().position(|s| *s == 0) {
            return Err(SearchError::InvalidPolicy {
                detail: format!("queue split threshold {i} is zero"),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    #[must_use]
    pub fn split(&self) -> &[usize] {
        &self.split
    }

    /// Number of buckets.
    #[must_use]
    pub fn buckets(&self) -> usize {
        self.sizes.len()
    }

    fn split_threshold(&self, bucket: usize) -> Option<usize> {
        if bucket + 1 >= self.sizes.len() {
            return None;
        }
        self.split.get(bucket).copied()
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            sizes: vec![5, 50, 500, usize::MAX],
            split: vec![16, 64, 4096],
        }
    }
}

/// Failure reported by [`ApproxPriorityQueue::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueInvariantError {
    /// The tracked length differs from the sum of bucket lengths.
    LengthMismatch { tracked: usize, actual: usize },
    /// A non-empty bucket's tracked maximum is not its true maximum.
    StaleBound { bucket: usize },
    /// A bucket's tracked maximum exceeds a later bucket's.
    BoundsNotMonotonic { bucket: usize },
}

impl fmt::Display for QueueInvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { tracked, actual } => {
                write!(f, "queue length mismatch: tracked {tracked}, buckets hold {actual}")
            }
            Self::StaleBound { bucket } => {
                write!(f, "bucket {bucket} maximum does not match its contents")
            }
            Self::BoundsNotMonotonic { bucket } => {
                write!(f, "bucket {bucket} maximum exceeds a later bucket maximum")
            }
        }
    }
}

impl std::error::Error for QueueInvariantError {}

/// Refill and split counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Bucket refills, including recursive ones.
    pub fills: u64,
    /// Bucket splits, including cascaded ones.
    pub splits: u64,
}

/// Comparator used by [`ApproxPriorityQueue::new`].
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Bucketed min-queue under a caller-supplied total order.
#[derive(Clone)]
pub struct ApproxPriorityQueue<T, F = Comparator<T>> {
    buckets: Vec<Vec<T>>,
    bounds: Vec<Option<T>>,
    len: usize,
    config: QueueConfig,
    stats: QueueStats,
    compare: F,
}

impl<T: Clone + Ord> ApproxPriorityQueue<T> {
    /// Empty queue with the default configuration and natural ordering.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default(), T::cmp)
    }
}

impl<T: Clone + Ord> Default for ApproxPriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F> ApproxPriorityQueue<T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    /// Empty queue with the default configuration.
    #[must_use]
    pub fn with_comparator(compare: F) -> Self {
        Self::with_config(QueueConfig::default(), compare)
    }

    /// Empty queue with an explicit configuration.
    #[must_use]
    pub fn with_config(config: QueueConfig, compare: F) -> Self {
        let n = config.buckets();
        Self {
            buckets: (0..n).map(|_| Vec::new()).collect(),
            bounds: vec![None; n],
            len: 0,
            config,
            stats: QueueStats::default(),
            compare,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn stats(&self) -> QueueStats {
        self.stats
    }

    #[must_use]
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Current length of every bucket.
    #[must_use]
    pub fn bucket_lens(&self) -> Vec<usize> {
        self.buckets.iter().map(Vec::len).collect()
    }

    /// Contents of bucket `i` in storage order, or `None` past the last bucket.
    #[must_use]
    pub fn bucket(&self, i: usize) -> Option<&[T]> {
        self.buckets.get(i).map(Vec::as_slice)
    }

    /// Tracked maximum of bucket `i`.
    #[must_use]
    pub fn bound(&self, i: usize) -> Option<&T> {
        self.bounds.get(i).and_then(Option::as_ref)
    }

    /// Add `value`.
    pub fn insert(&mut self, value: T) {
        let fits = self.bounds.iter().position(|bound| match bound {
            None => true,
            Some(bound) => (self.compare)(&value, bound) != Ordering::Greater,
        });
        let chosen = match fits {
            Some(i) => {
                // An empty bucket adopts the value as its maximum.
                if self.buckets[i].is_empty() {
                    self.bounds[i] = Some(value.clone());
                }
                i
            }
            None => {
                let last = self.buckets.len() - 1;
                self.bounds[last] = Some(value.clone());
                last
            }
        };
        self.buckets[chosen].push(value);
        self.len += 1;

        if let Some(threshold) = self.config.split_threshold(chosen) {
            if self.buckets[chosen].len() > threshold {
                self.split_bucket(chosen);
            }
        }
    }

    /// Remove and return the smallest value, or `None` when empty.
    ///
    /// Among equal minima the one stored last in bucket 0 wins.
    pub fn extract_min(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        if self.buckets[0].is_empty() && self.fill_bucket(0) == 0 {
            return None;
        }
        let bucket = &mut self.buckets[0];
        let mut best = bucket.len() - 1;
        for i in (0..best).rev() {
            if (self.compare)(&bucket[i], &bucket[best]) == Ordering::Less {
                best = i;
            }
        }
        self.len -= 1;
        Some(bucket.remove(best))
    }

    /// The `n` smallest values of `src`, ascending.
    ///
    /// `src` is left sorted in descending order without the taken values.
    pub fn take(&self, n: usize, src: &mut Vec<T>) -> Vec<T> {
        take_smallest(&self.compare, n, src)
    }

    /// Check the structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant; the bucket summary is logged at
    /// `error` level.
    pub fn validate(&self) -> Result<(), QueueInvariantError>
    where
        T: fmt::Debug,
    {
        let result = self.check();
        if let Err(err) = &result {
            tracing::error!(%err, summary = %self, "priority queue invariant violated");
        }
        result
    }

    fn check(&self) -> Result<(), QueueInvariantError> {
        let actual: usize = self.buckets.iter().map(Vec::len).sum();
        if actual != self.len {
            return Err(QueueInvariantError::LengthMismatch {
                tracked: self.len,
                actual,
            });
        }
        for (i, bucket) in self.buckets.iter().enumerate() {
            let Some(max) = bucket
                .iter()
                .reduce(|acc, v| if (self.compare)(v, acc) == Ordering::Greater { v } else { acc })
            else {
                continue;
            };
            match &self.bounds[i] {
                Some(bound) if (self.compare)(max, bound) == Ordering::Equal => {}
                _ => return Err(QueueInvariantError::StaleBound { bucket: i }),
            }
        }
        let mut previous: Option<&T> = None;
        for (i, bound) in self.bounds.iter().enumerate() {
            if let Some(bound) = bound {
                if let Some(prev) = previous {
                    if (self.compare)(prev, bound) == Ordering::Greater {
                        return Err(QueueInvariantError::BoundsNotMonotonic { bucket: i - 1 });
                    }
                }
                previous = Some(bound);
            }
        }
        Ok(())
    }

    /// Refill empty bucket `i` from bucket `i + 1`, recursing when that is
    /// empty too. Returns the number of values moved into bucket `i`.
    fn fill_bucket(&mut self, i: usize) -> usize {
        self.stats.fills += 1;
        if i + 1 >= self.buckets.len() {
            return 0;
        }
        if self.buckets[i + 1].is_empty() && self.fill_bucket(i + 1) == 0 {
            return 0;
        }
        let n = self.config.sizes[i];
        let taken = take_smallest(&self.compare, n, &mut self.buckets[i + 1]);
        if let Some(max) = taken.last() {
            self.bounds[i] = Some(max.clone());
        }
        let moved = taken.len();
        self.buckets[i] = taken;
        moved
    }

    fn split_bucket(&mut self, i: usize) {
        let Some(threshold) = self.config.split_threshold(i) else {
            return;
        };
        self.stats.splits += 1;

        let compare = &self.compare;
        self.buckets[i].sort_by(|a, b| compare(a, b));
        let len = self.buckets[i].len();
        let cut = len.min(threshold).div_ceil(2);
        let upper = self.buckets[i].split_off(cut);
        self.bounds[i] = self.buckets[i].last().cloned();

        let next_was_empty = self.buckets[i + 1].is_empty();
        if next_was_empty || self.bounds[i + 1].is_none() {
            self.bounds[i + 1] = upper.last().cloned();
        }
        self.buckets[i + 1].extend(upper);

        if let Some(next) = self.config.split_threshold(i + 1) {
            if self.buckets[i + 1].len() > next {
                self.split_bucket(i + 1);
            }
        }
    }
}

fn take_smallest<T, F>(compare: &F, n: usize, src: &mut Vec<T>) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    src.sort_by(|a, b| compare(b, a));
    let keep = src.len().saturating_sub(n);
    let mut taken = src.split_off(keep);
    taken.reverse();
    taken
}

impl<T: fmt::Debug, F> fmt::Display for ApproxPriorityQueue<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, bucket) in self.buckets.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "b[{i}] len={}", bucket.len())?;
            match &self.bounds[i] {
                Some(bound) => write!(f, " max={bound:?}")?,
                None => f.write_str(" max=-")?,
            }
            match self.config.sizes[i] {
                usize::MAX => f.write_str(" size=unbounded")?,
                size => write!(f, " size={size}")?,
            }
            let head: Vec<&T> = bucket.iter().take(10).collect();
            write!(f, " head={head:?}")?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug, F> fmt::Debug for ApproxPriorityQueue<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApproxPriorityQueue")
            .field("len", &self.len)
            .field("buckets", &self.buckets)
            .field("bounds", &self.bounds)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
