// batcher - lazy input grouping


/// Groups an input sequence into consecutive batches.
///
/// A `batch_size` of zero means "no subdivision": the whole input becomes one batch.
#[derive(Debug, Clone, Copy)]
pub struct Batcher {
    pub batch_size: usize,
}

impl Batcher {
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size }
    }

    /// Wrap an input sequence in a lazy batching adapter
    pub fn batches<I: IntoIterator>(&self, items: I) -> Batches<I::IntoIter> {
        Batches {
            iter: items.into_iter(),
            batch_size: self.batch_size,
            exhausted: false,
        }
    }
}

/// Iterator adapter yielding `Vec`s of at most `batch_size` items.
///
/// Pulls exactly as many items as the current batch needs. Once the input
/// runs dry the adapter stops pulling, so a non-fused input is never polled
/// past its first `None`.
pub struct Batches<I> {
    iter: I,
    batch_size: usize,
    exhausted: bool,
}

impl<I: Iterator> Iterator for Batches<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let batch: Vec<I::Item> = if self.batch_size == 0 {
            self.exhausted = true;
            self.iter.by_ref().collect()
        } else {
            let batch: Vec<I::Item> = self.iter.by_ref().take(self.batch_size).collect();
            if batch.len() < self.batch_size {
                self.exhausted = true;
            }
            batch
        };

        if batch.is_empty() {
            self.exhausted = true;
            return None;
        }

        Some(batch)
    }
}
