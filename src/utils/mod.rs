mod string;

pub use string::{clean_docstring, parse_string_literal};
