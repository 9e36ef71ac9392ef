//! Property tests for cell reference resolution.

use oims_model::{CellRef, LocationError};
use proptest::prelude::*;

proptest! {
    #[test]
    fn valid_tokens_round_trip(token in "[A-Z][1-9][0-9]{0,17}") {
        let cell = CellRef::parse(&token).unwrap();
        prop_assert_eq!(cell.to_string(), token);
    }

    #[test]
    fn valid_tokens_resolve_to_zero_based_coordinates(column in 0usize..26, row in 0usize..1_000_000) {
        let token = format!("{}{}", char::from(b'A' + column as u8), row + 1);
        let cell: CellRef = token.parse().unwrap();
        prop_assert_eq!(cell.position(), (row, column));
    }

    #[test]
    fn lowercase_columns_are_rejected(token in "[a-z][1-9][0-9]{0,5}") {
        prop_assert!(matches!(CellRef::parse(&token), Err(LocationError::Invalid { .. })), "{token} should be invalid");
    }

    #[test]
    fn multi_letter_columns_are_rejected(token in "[A-Z]{2,3}[1-9][0-9]{0,5}") {
        prop_assert!(matches!(CellRef::parse(&token), Err(LocationError::Invalid { .. })), "{token} should be invalid");
    }

    #[test]
    fn zero_led_rows_are_rejected(token in "[A-Z]0[0-9]{0,5}") {
        prop_assert!(matches!(CellRef::parse(&token), Err(LocationError::Invalid { .. })), "{token} should be invalid");
    }

    #[test]
    fn trailing_garbage_is_rejected(token in "[A-Z][1-9][0-9]{0,3}[^0-9]{1,3}") {
        prop_assert!(matches!(CellRef::parse(&token), Err(LocationError::Invalid { .. })), "{token} should be invalid");
    }
}

#[test]
fn missing_digits_are_rejected() {
    for token in ["A", "Z", ""] {
        assert!(CellRef::parse(token).is_err(), "{token} should be invalid");
    }
}
