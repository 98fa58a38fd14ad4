//! Scalar text forms: scaled integers, dates, codes, opaque blocks and strings.

use txrep::render::{
    date_comment, first_token, render_code, render_opaque, render_string, scale_fmt, scan_code,
    scan_fixed_opaque, scan_opaque, scan_string, CodeError,
};
use txrep::stellar::Asset;

#[test]
fn test_scale_fmt() {
    assert_eq!(scale_fmt(123456789, 7), "12.3456789e7");
    assert_eq!(scale_fmt(-5000000, 7), "-0.5e7");
    assert_eq!(scale_fmt(0, 7), "0e7");
    assert_eq!(scale_fmt(10000000, 7), "1e7");
    assert_eq!(scale_fmt(10000001, 7), "1.0000001e7");
    assert_eq!(scale_fmt(12345678900000000, 7), "1,234,567,890e7");
    assert_eq!(scale_fmt(-1000000000000, 7), "-100,000e7");
    assert_eq!(scale_fmt(i64::MIN, 7), "-922,337,203,685.4775808e7");
    assert_eq!(scale_fmt(1234, 19), "0.0000000000000001234e19");
    assert_eq!(scale_fmt(-1234, 20), "-1,234e0");
    assert_eq!(scale_fmt(5, u32::MAX), "5e0");
}

#[test]
fn test_date_comment() {
    assert_eq!(date_comment(0), "");
    let c = date_comment(1_700_000_000);
    assert!(c.starts_with(" ("), "{}", c);
    assert!(c.ends_with(')'), "{}", c);
    assert!(c.contains("2023"), "{}", c);
}

#[test]
fn test_code_rendering() {
    assert_eq!(render_code(b"USD\0"), "USD");
    assert_eq!(render_code(&[0; 4]), "");
    assert_eq!(render_code(&[b'a', 0x01, 0, 0]), "a\\x01");
    assert_eq!(render_code(b"a\\b\0"), "a\\\\b");
    assert_eq!(render_code(&[b'a', 0, b'b', 0]), "a\\x00b");
    assert_eq!(render_code(b"AB?\0"), "AB\\x3f");
    assert_eq!(scan_code(&render_code(b"AB?\0"), 4), Ok(b"AB?\0".to_vec()));
}

#[test]
fn test_code_scanning() {
    assert_eq!(scan_code("USD", 4), Ok(b"USD\0".to_vec()));
    assert_eq!(scan_code("  USD (note)", 4), Ok(b"USD\0".to_vec()));
    assert_eq!(scan_code("ABCDE", 4), Err(CodeError::TooLong));
    assert_eq!(scan_code("\u{e9}", 4), Err(CodeError::InvalidCharacter));
    assert_eq!(scan_code("\\x4", 4), Err(CodeError::BadEscape));
    let raw = [b'\\', 0xff, b'A', 0];
    assert_eq!(scan_code(&render_code(&raw), 4), Ok(raw.to_vec()));
}

#[test]
fn test_opaque() {
    assert_eq!(render_opaque(&[]), "0 bytes");
    assert_eq!(render_opaque(&[0x0a, 0xff]), "0aff");
    assert_eq!(scan_opaque("0 bytes"), Ok(vec![]));
    assert_eq!(scan_opaque("0aff (comment)"), Ok(vec![0x0a, 0xff]));
    assert!(scan_opaque("zz").is_err());
    assert_eq!(scan_fixed_opaque("00010203", 4), Ok(vec![0, 1, 2, 3]));
    assert!(scan_fixed_opaque("000102", 4).is_err());
}

#[test]
fn test_strings() {
    let raw = b"a\"b\n\x01";
    let text = render_string(raw);
    assert_eq!(text, "\"a\\\"b\\n\\x01\"");
    assert_eq!(scan_string(&text), Ok(raw.to_vec()));
    assert_eq!(scan_string(" \"two words\" trailing"), Ok(b"two words".to_vec()));
    assert_eq!(scan_string("bare words"), Ok(b"bare".to_vec()));
    assert!(scan_string("\"open").is_err());
    assert!(scan_string("\"\\x4\"").is_err());
}

#[test]
fn test_first_token() {
    assert_eq!(first_token("  12 (comment)"), "12");
    assert_eq!(first_token("   "), "");
}

#[test]
fn test_short_alphanum12_code_reads_back_as_alphanum4() {
    let mut code = [0u8; 12];
    code[..2].copy_from_slice(b"AB");
    let long = Asset::AlphaNum12 {
        code,
        issuer: [0xab; 32],
    };
    let text = long.to_string();
    assert_eq!(
        text,
        "AB:GCV2XK5LVOV2XK5LVOV2XK5LVOV2XK5LVOV2XK5LVOV2XK5LVOV2WIHP"
    );
    let back: Asset = text.parse().expect("asset");
    assert_eq!(
        back,
        Asset::AlphaNum4 {
            code: *b"AB\0\0",
            issuer: [0xab; 32],
        }
    );
    assert_ne!(back, long);
}
