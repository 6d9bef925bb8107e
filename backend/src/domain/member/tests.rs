//! Tests for member value types.

use super::*;
use rstest::rstest;

#[rstest]
#[case("ada@example.com")]
#[case("  grace.hopper@navy.mil  ")]
#[case("a+b@sub.example.org")]
fn accepts_well_formed_emails(#[case] raw: &str) {
    let email = Email::new(raw).expect("email is valid");
    assert_eq!(email.as_ref(), raw.trim());
}

#[rstest]
#[case("", MemberValidationError::EmptyEmail)]
#[case("   ", MemberValidationError::EmptyEmail)]
#[case("no-at-sign", MemberValidationError::InvalidEmail)]
#[case("two@@example.com", MemberValidationError::InvalidEmail)]
#[case("missing@tld", MemberValidationError::InvalidEmail)]
#[case("spaced out@example.com", MemberValidationError::InvalidEmail)]
fn rejects_malformed_emails(#[case] raw: &str, #[case] expected: MemberValidationError) {
    let err = Email::new(raw).expect_err("email is invalid");
    assert_eq!(err, expected);
}

#[rstest]
fn rejects_overlong_email() {
    let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
    let err = Email::new(raw).expect_err("email too long");
    assert_eq!(err, MemberValidationError::EmailTooLong { max: EMAIL_MAX });
}

#[rstest]
#[case("al")]
#[case("  ada lovelace ")]
fn accepts_usernames_within_bounds(#[case] raw: &str) {
    let username = Username::new(raw).expect("username is valid");
    assert_eq!(username.as_ref(), raw.trim());
}

#[rstest]
#[case("a")]
#[case(" b ")]
fn rejects_short_usernames(#[case] raw: &str) {
    let err = Username::new(raw).expect_err("username too short");
    assert_eq!(
        err,
        MemberValidationError::UsernameLength {
            min: USERNAME_MIN,
            max: USERNAME_MAX
        }
    );
}

#[rstest]
fn rejects_blank_and_overlong_usernames() {
    assert_eq!(
        Username::new("  "),
        Err(MemberValidationError::EmptyUsername)
    );
    assert!(Username::new("x".repeat(USERNAME_MAX + 1)).is_err());
}

#[rstest]
fn email_deserialisation_validates() {
    let ok: Result<Email, _> = serde_json::from_str("\"ada@example.com\"");
    assert!(ok.is_ok());
    let bad: Result<Email, _> = serde_json::from_str("\"nope\"");
    assert!(bad.is_err());
}

#[rstest]
fn member_exposes_parts() {
    let member = Member::new(
        MemberId::new(7),
        Email::new("ada@example.com").expect("email"),
        Username::new("ada").expect("username"),
    );
    assert_eq!(member.id().get(), 7);
    assert_eq!(member.email().as_ref(), "ada@example.com");
    assert_eq!(member.username().to_string(), "ada");
}
