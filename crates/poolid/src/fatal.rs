use core::fmt;

/// Terminates the process after a secure randomness failure. Never unwinds.
#[cold]
#[inline(never)]
pub(crate) fn abort_on_entropy_failure(err: &impl fmt::Display) -> ! {
    #[cfg(feature = "tracing")]
    tracing::error!(error = %err, "secure randomness unavailable, aborting");
    eprintln!("poolid: secure randomness unavailable: {err}");
    std::process::abort()
}
