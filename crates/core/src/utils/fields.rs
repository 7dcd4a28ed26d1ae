//! Field map construction helpers

use eventide_domain::{FieldValue, Fields};

/// Build a field map from `(name, value)` pairs.
pub fn fields<const N: usize>(pairs: [(&str, FieldValue); N]) -> Fields {
    pairs.into_iter().map(|(name, value)| (name.to_string(), value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_map_with_last_write_winning() {
        let map = fields([("a", FieldValue::from("x")), ("a", FieldValue::Bool(true))]);
        assert_eq!(map.len(), 1);
        assert_eq!(map["a"], FieldValue::Bool(true));
    }
}
