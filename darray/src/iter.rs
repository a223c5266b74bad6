use core::iter::Rev;
use core::slice::ChunksExact;

/// Iterator over the elements of an array, one byte slice per element
///
/// This iterator implements `Clone` and runs in both directions.
#[derive(Clone, Debug)]
pub struct Elements<'a> {
    chunks: ChunksExact<'a, u8>,
}

/// Reverse iterator over the elements of an array
pub type ElementsRev<'a> = Rev<Elements<'a>>;

impl<'a> Elements<'a> {
    /// Iterates `bytes` in steps of `element_size`; a trailing partial
    /// element is skipped.
    #[must_use]
    pub fn new(bytes: &'a [u8], element_size: usize) -> Self {
        // A zero element size yields nothing instead of panicking in `chunks_exact`
        let (bytes, element_size) = if element_size == 0 {
            (&bytes[..0], 1)
        } else {
            (bytes, element_size)
        };
        Self {
            chunks: bytes.chunks_exact(element_size),
        }
    }
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl DoubleEndedIterator for Elements<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.chunks.next_back()
    }
}

impl ExactSizeIterator for Elements<'_> {}
