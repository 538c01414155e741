//! Profiling utilities based on the `puffin` crate.
//!
//! With the `profiling` feature disabled the scope macros expand to nothing,
//! so call sites never need their own `cfg` guards.

#[cfg(feature = "profiling")]
pub use puffin::{profile_function, profile_scope};

#[cfg(not(feature = "profiling"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __csshook_profile_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "profiling"))]
pub use crate::__csshook_profile_noop as profile_function;
#[cfg(not(feature = "profiling"))]
pub use crate::__csshook_profile_noop as profile_scope;

/// Turn scope collection on or off.
///
/// # Example
/// ```no_run
/// use csshook_core::profiling::set_enabled;
///
/// set_enabled(true);
/// ```
pub fn set_enabled(enabled: bool) {
    #[cfg(feature = "profiling")]
    {
        puffin::set_scopes_on(enabled);
        tracing::info!("puffin scopes {}", if enabled { "on" } else { "off" });
    }
    #[cfg(not(feature = "profiling"))]
    let _ = enabled;
}

/// Whether scopes are currently being collected.
pub fn is_enabled() -> bool {
    #[cfg(feature = "profiling")]
    {
        puffin::are_scopes_on()
    }
    #[cfg(not(feature = "profiling"))]
    {
        false
    }
}

/// Mark the start of a new profiling frame.
#[inline]
pub fn new_frame() {
    #[cfg(feature = "profiling")]
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_scopes() {
        set_enabled(true);
        assert_eq!(is_enabled(), cfg!(feature = "profiling"));
        {
            profile_scope!("test_toggle_scopes");
            new_frame();
        }
        set_enabled(false);
        assert!(!is_enabled());
    }
}
