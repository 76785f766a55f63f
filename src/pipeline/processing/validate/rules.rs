use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// 6-digit area code, 8-digit birth date with month/day ranges, 3-digit
/// sequence, then a check character.
static ID_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[1-9]\d{5}(18|19|20)\d{2}(0[1-9]|1[0-2])(0[1-9]|[12]\d|3[01])\d{3}[0-9Xx]$")
        .expect("national ID pattern is a valid regex")
});

/// 11-digit mobile number, second digit 3-9.
static MOBILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("mobile pattern is a valid regex"));

/// ISO 7064 MOD 11-2 weights for the first 17 characters
const CHECK_WEIGHTS: [u32; 17] = [7, 9, 10, 5, 8, 4, 2, 1, 6, 3, 7, 9, 10, 5, 8, 4, 2];
const CHECK_CHARS: [char; 11] = ['1', '0', 'X', '9', '8', '7', '6', '5', '4', '3', '2'];

pub fn is_valid_id_number_format(id: &str) -> bool {
    ID_NUMBER_PATTERN.is_match(id)
}

pub fn is_valid_mobile(phone: &str) -> bool {
    MOBILE_PATTERN.is_match(phone)
}

/// Expected check character for an 18-character ID, `None` if the first
/// 17 characters are not all digits.
pub fn id_check_char(id: &str) -> Option<char> {
    let digits = id
        .chars()
        .take(17)
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()?;
    if digits.len() != 17 {
        return None;
    }
    let sum: u32 = digits.iter().zip(CHECK_WEIGHTS.iter()).map(|(d, w)| d * w).sum();
    Some(CHECK_CHARS[(sum % 11) as usize])
}

/// Stricter than the pattern: the check character must match and the
/// embedded birth date must exist on the calendar.
pub fn passes_id_checksum(id: &str) -> bool {
    if !is_valid_id_number_format(id) {
        return false;
    }
    let birth = &id[6..14];
    if NaiveDate::parse_from_str(birth, "%Y%m%d").is_err() {
        return false;
    }
    match (id_check_char(id), id.chars().last()) {
        (Some(expected), Some(actual)) => expected == actual.to_ascii_uppercase(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_pattern() {
        assert!(is_valid_id_number_format("110101199003071234"));
        assert!(is_valid_id_number_format("44030419851231002X"));
        assert!(is_valid_id_number_format("44030419851231002x"));
        // too short
        assert!(!is_valid_id_number_format("11010119900307123"));
        // month 13
        assert!(!is_valid_id_number_format("110101199013071234"));
        // day 32
        assert!(!is_valid_id_number_format("110101199003321234"));
        // area code may not start with 0
        assert!(!is_valid_id_number_format("010101199003071234"));
        // bad check character
        assert!(!is_valid_id_number_format("11010119900307123Y"));
    }

    #[test]
    fn test_mobile_pattern() {
        assert!(is_valid_mobile("13800138000"));
        assert!(is_valid_mobile("19912345678"));
        assert!(!is_valid_mobile("12800138000"));
        assert!(!is_valid_mobile("1380013800"));
        assert!(!is_valid_mobile("138001380001"));
        assert!(!is_valid_mobile("23800138000"));
    }

    #[test]
    fn test_checksum() {
        assert!(passes_id_checksum("110101199003071233"));
        assert!(passes_id_checksum("44030419851231002X"));
        assert!(passes_id_checksum("44030419851231002x"));
        assert!(!passes_id_checksum("110101199003071234"));
        // right check char, but 30 February
        assert!(!passes_id_checksum("110101199002301236"));
    }
}
