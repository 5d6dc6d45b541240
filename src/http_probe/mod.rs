pub mod probe;
pub mod result;

use std::fmt::Write;

/// Flattens an error and its causes into one line, outermost first.
pub(crate) fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}
