#[cfg(feature = "trace_bt")]
extern crate backtrace;

/* This is to work around a false positive for the clippy warning
 * `match_on_same_arms`.
 * See https://github.com/Manishearth/rust-clippy/issues/1390
 */
#[cfg(not(feature = "trace"))]
#[inline(always)]
pub fn nop() {}

#[cfg(feature = "trace_bt")]
#[macro_export]
#[doc(hidden)]
macro_rules! markup_trace {
    ($fmt:expr) => {
         let bt = ::backtrace::Backtrace::new();
         ::log::trace!( concat!($fmt, " at {:?}"), bt );
    };
    ($fmt:expr, $( $args:expr ),*) => {
         let bt = ::backtrace::Backtrace::new();
         ::log::trace!( concat!($fmt, " at {:?}"), $( $args ),* , bt );
    };
}

#[cfg(all(feature = "trace", not(feature = "trace_bt")))]
#[macro_export]
#[doc(hidden)]
macro_rules! markup_trace {
    ($fmt:expr) => {
         ::log::trace!( $fmt );
    };
    ($fmt:expr, $( $args:expr ),*) => {
         ::log::trace!( $fmt, $( $args ),* );
    };
}

#[cfg(not(feature = "trace"))]
#[macro_export]
#[doc(hidden)]
macro_rules! markup_trace {
    ($fmt:expr) => { $crate::macros::nop(); };
    ($fmt:expr, $( $args:expr ),*) => { $crate::macros::nop(); };
}
