/// Checks `number` against the Luhn mod-10 checksum.
///
/// Only non-empty strings made up entirely of ASCII digits can be valid. Starting from the rightmost (check) digit,
/// every second digit is doubled, and 9 is subtracted from any doubled value above 9. The number is valid when the sum
/// of the resulting digits is divisible by 10.
pub fn is_valid_luhn(number: &str) -> bool {
    if number.is_empty() {
        return false;
    }
    let mut sum = 0u32;
    for (i, c) in number.bytes().rev().enumerate() {
        if !c.is_ascii_digit() {
            return false;
        }
        let mut digit = u32::from(c - b'0');
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}
