/// Validate a Brazilian CPF using the standard mod-11 check digits.
/// Accepts digits with or without punctuation (XXX.XXX.XXX-XX).
///
/// The server rejects invalid CPFs anyway; validating here fails fast
/// on typos before a network round trip.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return false;
    }

    // CPFs with all digits equal (000..., 111..., ...) pass the check
    // digit math but are not valid documents
    if digits.windows(2).all(|w| w[0] == w[1]) {
        return false;
    }

    let check = |len: usize| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (len as u32 + 1 - i as u32))
            .sum();
        let rem = (sum * 10) % 11;
        if rem == 10 { 0 } else { rem }
    };

    check(9) == digits[9] && check(10) == digits[10]
}

/// Format a CPF for display, normalizing to XXX.XXX.XXX-XX.
/// Returns the input unchanged if it does not contain 11 digits.
pub fn format_cpf(cpf: &str) -> String {
    let digits: String = cpf.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 11 {
        format!(
            "{}.{}.{}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..11]
        )
    } else {
        cpf.to_string()
    }
}
