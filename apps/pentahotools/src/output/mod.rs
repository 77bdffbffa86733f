//! Terminal output helpers

mod printer;

pub use printer::{print_key_value, print_names, print_success, print_warning};
