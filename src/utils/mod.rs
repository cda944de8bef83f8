mod format_int;

pub use format_int::with_delimiters;
