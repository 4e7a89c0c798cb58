/// Checks that a numerical value is in the provided interval `[a,b]`, returning
/// [`Error::OutOfInterval`](crate::error::Error::OutOfInterval) from the enclosing function if not
///
/// ### Example
/// ```ignore
/// let alpha = 2.0;
/// ensure_interval!(alpha, 0.0, 1.0);
/// ```
/// This returns an error naming `alpha` and the interval \[0, 1\].
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::Error::OutOfInterval {
                name: stringify!($var),
                value: $var,
                low: $a,
                high: $b,
            });
        }
    };
}
