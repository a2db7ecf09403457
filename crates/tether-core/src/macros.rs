/// Builds a [`ValueRecord`](crate::stmt::ValueRecord) from `column => value`
/// pairs.
///
/// ```
/// let attrs = tether_core::record! { "title" => "Ghostbusters", "year" => 1984 };
/// assert_eq!(attrs.len(), 2);
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::stmt::ValueRecord::new()
    };
    (
        $( $column:expr => $value:expr ),+ $(,)?
    ) => {{
        let mut record = $crate::stmt::ValueRecord::new();
        $( record.set($column, $value); )+
        record
    }};
}
