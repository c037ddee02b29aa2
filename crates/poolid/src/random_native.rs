use crate::{EntropySource, Error, Result};
use rand::{TryRngCore, rngs::OsRng};

/// An [`EntropySource`] backed by the operating system's CSPRNG
/// (`getrandom(2)`, `getentropy`, `BCryptGenRandom`, ... via
/// [`rand::rngs::OsRng`]).
///
/// This type stores no handle; each fill is one request to the OS. It either
/// fills the whole destination or fails, so it never produces a short read.
#[derive(Default, Clone, Copy, Debug)]
pub struct OsRandom;

impl OsRandom {
    /// Creates a new OS-backed source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EntropySource for OsRandom {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<usize> {
        OsRng.try_fill_bytes(dest).map_err(Error::unavailable)?;
        Ok(dest.len())
    }
}

#[cfg(unix)]
pub use self::urandom::DevUrandom;

#[cfg(unix)]
mod urandom {
    use crate::{EntropySource, Error, Result};
    use std::{fs::File, io::Read, path::Path};

    const DEV_URANDOM: &str = "/dev/urandom";

    /// An [`EntropySource`] reading from an open `/dev/urandom` handle.
    ///
    /// Each fill is a single `read(2)`. The kernel normally satisfies reads of
    /// arena size in full; when it does not, the pool treats the result as a
    /// fatal short read instead of looping.
    ///
    /// The file descriptor is closed when this value is dropped.
    #[derive(Debug)]
    pub struct DevUrandom {
        file: File,
    }

    impl DevUrandom {
        /// Opens `/dev/urandom` read-only.
        ///
        /// # Errors
        /// - [`Error::EntropyUnavailable`] if the device cannot be opened.
        pub fn open() -> Result<Self> {
            Self::open_path(DEV_URANDOM)
        }

        /// Opens an arbitrary character device (or file) as the entropy
        /// handle.
        ///
        /// # Errors
        /// - [`Error::EntropyUnavailable`] if the path cannot be opened.
        pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref();
            let file = File::open(path)
                .map_err(|e| Error::unavailable(format_args!("{}: {e}", path.display())))?;
            Ok(Self::from_file(file))
        }

        /// Wraps an already opened handle.
        #[must_use]
        pub const fn from_file(file: File) -> Self {
            Self { file }
        }
    }

    impl EntropySource for DevUrandom {
        fn try_fill(&mut self, dest: &mut [u8]) -> Result<usize> {
            self.file.read(dest).map_err(Error::unavailable)
        }
    }
}
