use chrono::NaiveDateTime;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

pub const ORDER_PREFIX: &str = "RR";
pub const SAMPLE_PREFIX: &str = "SAMPLE";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex pattern")
});

/// Loose shape check: something@something.tld with no whitespace.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// `PREFIX` + `YYMMDDHHmm` + two random digits, e.g. `RR250314093007`.
///
/// Not unique: two requests in the same minute collide one time in a hundred.
pub fn generate_reference<R: Rng + ?Sized>(prefix: &str, at: NaiveDateTime, rng: &mut R) -> String {
    let suffix: u8 = rng.gen_range(0..100);
    format!("{prefix}{}{suffix:02}", at.format("%y%m%d%H%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(9, 7, 45)
            .unwrap()
    }

    #[test]
    fn test_reference_layout() {
        let mut rng = StdRng::seed_from_u64(7);
        let r = generate_reference(ORDER_PREFIX, at(), &mut rng);
        assert_eq!(r.len(), 14);
        assert!(r.starts_with("RR2503040907"));
        assert!(r[12..].chars().all(|c| c.is_ascii_digit()));

        let s = generate_reference(SAMPLE_PREFIX, at(), &mut rng);
        assert_eq!(s.len(), 18);
        assert!(s.starts_with("SAMPLE2503040907"));
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("buyer@example.com"));
        assert!(is_valid_email("a.b+c@mail.co.kr"));
        assert!(!is_valid_email("buyer@example"));
        assert!(!is_valid_email("buyer example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }
}
