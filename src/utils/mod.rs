//! Project-specific utilities live here.

/// Formats a shared log prefix for project logs.
pub fn log_prefix(module: &str) -> String {
    format!("shelf::{module}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_names_module() {
        assert_eq!(log_prefix("books"), "shelf::books");
    }
}
