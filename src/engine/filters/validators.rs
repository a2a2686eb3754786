//! Structural validators shared by the ID-family filters
//!
//! These reject regex matches that have the right shape but the wrong
//! content (failed checksum, excluded SSN area, impossible octet), keeping
//! specificity high on the hard identifiers.

/// Luhn checksum over an already-extracted digit string.
pub fn luhn_ok(digits: &str) -> bool {
    let digits: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 12 {
        return false;
    }

    let mut sum = 0u32;
    let mut double = false;
    for &d in digits.iter().rev() {
        let mut v = d;
        if double {
            v *= 2;
            if v > 9 {
                v -= 9;
            }
        }
        sum += v;
        double = !double;
    }
    sum % 10 == 0
}

/// SSN area/group/serial exclusions. Tolerates masked forms ("XXX-XX-1234")
/// by validating only the visible digit groups.
pub fn is_valid_ssn(candidate: &str) -> bool {
    let cleaned: String = candidate
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x' || *c == '*')
        .collect();
    if cleaned.len() != 9 {
        return false;
    }

    let area = &cleaned[0..3];
    let group = &cleaned[3..5];
    let serial = &cleaned[5..9];

    if area.chars().all(|c| c.is_ascii_digit()) {
        let area_num: u32 = area.parse().unwrap_or(0);
        if area_num == 0 || area_num == 666 || area_num >= 900 {
            return false;
        }
    }
    if group.chars().all(|c| c.is_ascii_digit()) && group == "00" {
        return false;
    }
    if serial.chars().all(|c| c.is_ascii_digit()) && serial == "0000" {
        return false;
    }
    true
}

/// DEA registration: two letters (registrant type + initial) followed by
/// seven digits whose check digit satisfies the DEA formula.
pub fn is_valid_dea(candidate: &str) -> bool {
    let chars: Vec<char> = candidate.chars().collect();
    if chars.len() != 9 {
        return false;
    }
    if !chars[0].is_ascii_uppercase() || !(chars[1].is_ascii_uppercase() || chars[1] == '9') {
        return false;
    }
    let digits: Vec<u32> = chars[2..].iter().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 7 {
        return false;
    }

    let odd_sum = digits[0] + digits[2] + digits[4];
    let even_sum = digits[1] + digits[3] + digits[5];
    (odd_sum + 2 * even_sum) % 10 == digits[6]
}

/// VIN: 17 characters, never I, O, or Q.
pub fn is_valid_vin(candidate: &str) -> bool {
    candidate.len() == 17
        && candidate.chars().all(|c| {
            (c.is_ascii_uppercase() || c.is_ascii_digit()) && !matches!(c, 'I' | 'O' | 'Q')
        })
        && candidate.chars().any(|c| c.is_ascii_digit())
}

/// Dotted-quad with every octet in range.
pub fn is_valid_ipv4(candidate: &str) -> bool {
    let octets: Vec<&str> = candidate.split('.').collect();
    if octets.len() != 4 {
        return false;
    }
    octets.iter().all(|o| {
        !o.is_empty()
            && o.len() <= 3
            && o.chars().all(|c| c.is_ascii_digit())
            && o.parse::<u32>().map(|v| v <= 255).unwrap_or(false)
    })
}

/// Colon-separated hex groups; requires at least three groups so plain
/// clock times never qualify.
pub fn is_valid_ipv6(candidate: &str) -> bool {
    let segments: Vec<&str> = candidate.split(':').collect();
    if segments.len() < 3 || segments.len() > 8 {
        return false;
    }
    let empty = segments.iter().filter(|s| s.is_empty()).count();
    if empty > 2 {
        return false;
    }
    segments
        .iter()
        .filter(|s| !s.is_empty())
        .all(|s| s.len() <= 4 && s.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Map OCR letter/digit confusions back to digits before validating
/// digit-based identifiers in scanned text.
pub fn ocr_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'O' | 'o' => '0',
            'l' | 'I' | '|' => '1',
            'Z' | 'z' => '2',
            'S' | 's' => '5',
            'G' => '6',
            'B' => '8',
            'g' | 'q' => '9',
            other => other,
        })
        .collect()
}
