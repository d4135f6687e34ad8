//! Code inspection commands: checksum validation and extraction from text.

use pricelink_linkage::{check_digit, find_code, is_valid_jan, ExtractOptions};

pub(crate) fn run_check_code(code: &str) {
    println!("{}", check_code_report(code.trim()));
}

pub(crate) fn run_extract(verify_short_codes: bool, fields: &[String]) {
    let options = ExtractOptions { verify_short_codes };
    println!("{}", extract_report(fields, options));
}

fn check_code_report(code: &str) -> String {
    if is_valid_jan(code) {
        return format!("{code}: valid");
    }
    let chars: Vec<char> = code.chars().collect();
    let expected = (chars.len() == 13)
        .then(|| check_digit(&chars[..12].iter().collect::<String>()))
        .flatten();
    match expected {
        Some(digit) => format!("{code}: invalid (expected check digit {digit})"),
        None => format!("{code}: invalid (expected 13 digits)"),
    }
}

fn extract_report(fields: &[String], options: ExtractOptions) -> String {
    let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
    find_code(&fields, options).unwrap_or_else(|| "none".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_code_is_reported_valid() {
        assert_eq!(check_code_report("4902370550733"), "4902370550733: valid");
    }

    #[test]
    fn wrong_check_digit_reports_expected_digit() {
        assert_eq!(
            check_code_report("4902370550734"),
            "4902370550734: invalid (expected check digit 3)"
        );
    }

    #[test]
    fn full_width_codes_are_checked() {
        assert_eq!(
            check_code_report("４９０２３７０５５０７３３"),
            "４９０２３７０５５０７３３: valid"
        );
        assert_eq!(
            check_code_report("４９０２３７０５５０７３４"),
            "４９０２３７０５５０７３４: invalid (expected check digit 3)"
        );
    }

    #[test]
    fn wrong_length_is_reported() {
        assert_eq!(
            check_code_report("49023705507"),
            "49023705507: invalid (expected 13 digits)"
        );
        assert_eq!(
            check_code_report("49023705507330"),
            "49023705507330: invalid (expected 13 digits)"
        );
        assert_eq!(check_code_report("abc"), "abc: invalid (expected 13 digits)");
    }

    #[test]
    fn extract_reports_first_field_code() {
        let fields = vec![
            "緑茶 4902370550733".to_owned(),
            "4902370548501".to_owned(),
        ];
        assert_eq!(extract_report(&fields, ExtractOptions::default()), "4902370550733");
    }

    #[test]
    fn extract_reports_none_without_candidates() {
        let fields = vec!["123456789012345".to_owned()];
        assert_eq!(extract_report(&fields, ExtractOptions::default()), "none");
    }

    #[test]
    fn short_code_policy_is_honoured() {
        let fields = vec!["SKU 00000001".to_owned()];
        assert_eq!(extract_report(&fields, ExtractOptions::default()), "00000001");
        let strict = ExtractOptions {
            verify_short_codes: true,
        };
        assert_eq!(extract_report(&fields, strict), "none");
    }
}
