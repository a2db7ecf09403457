#[macro_export]
macro_rules! assert_empty {
    ($e:expr) => {{
        let items = &$e;
        assert!(items.is_empty(), "expected empty; actual={:?}", items);
    }};
}

/// Asserts the length of anything with `len()`, printing the items on failure.
#[macro_export]
macro_rules! assert_len {
    ($e:expr, $len:expr) => {{
        let items = &$e;
        assert_eq!(items.len(), $len, "items={:?}", items);
    }};
}
