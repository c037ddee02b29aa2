use crate::Result;

/// A trait for sources of cryptographically secure random bytes.
///
/// This abstraction allows you to plug in the operating system's CSPRNG, an
/// already opened device handle, or a mocked source in tests. Implementations
/// own whatever handle they need; dropping the source releases it.
///
/// A source reports how many bytes it actually wrote. Anything short of
/// `dest.len()` is treated by the pool as an unrecoverable
/// [`Error::ShortRead`] and is never retried.
///
/// # Example
/// ```
/// use poolid::{EntropySource, Result};
///
/// struct Zeroes;
/// impl EntropySource for Zeroes {
///     fn try_fill(&mut self, dest: &mut [u8]) -> Result<usize> {
///         dest.fill(0);
///         Ok(dest.len())
///     }
/// }
///
/// let mut buf = [0xff; 4];
/// assert_eq!(Zeroes.try_fill(&mut buf).unwrap(), 4);
/// assert_eq!(buf, [0; 4]);
/// ```
///
/// [`Error::ShortRead`]: crate::Error::ShortRead
pub trait EntropySource {
    /// Fills `dest` with secure random bytes in a single request and returns
    /// the number of bytes written.
    ///
    /// # Errors
    /// - [`Error::EntropyUnavailable`] if the underlying OS facility fails.
    ///
    /// [`Error::EntropyUnavailable`]: crate::Error::EntropyUnavailable
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<usize>;
}

impl<S: EntropySource + ?Sized> EntropySource for &mut S {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<usize> {
        (**self).try_fill(dest)
    }
}

impl<S: EntropySource + ?Sized> EntropySource for Box<S> {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<usize> {
        (**self).try_fill(dest)
    }
}
