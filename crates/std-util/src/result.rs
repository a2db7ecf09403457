/// Unwraps the `Err` of a `Result`, panicking with the `Ok` value otherwise.
///
/// A predicate can be given to check the error:
///
/// ```
/// # use std_util::assert_err;
/// let res: Result<(), std::num::ParseIntError> = "x".parse::<i32>().map(|_| ());
/// assert_err!(res, |e: &std::num::ParseIntError| e.to_string().contains("invalid"));
/// ```
#[macro_export]
macro_rules! assert_err {
    ($e:expr) => {
        match $e {
            Err(e) => e,
            actual => panic!("expected `Err`; actual={:?}", actual),
        }
    };
    ($e:expr, $pred:expr) => {{
        let err = $crate::assert_err!($e);
        assert!(($pred)(&err), "unexpected error; err={:?}", err);
        err
    }};
}

/// Unwraps the `Ok` of a `Result`, panicking with the error otherwise.
#[macro_export]
macro_rules! assert_ok {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(e) => panic!("expected `Ok`; err={:?}", e),
        }
    };
}
