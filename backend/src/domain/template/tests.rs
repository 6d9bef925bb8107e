//! Tests for template value types.

use super::*;
use rstest::rstest;

#[rstest]
#[case("  Actix starter ", "Actix starter")]
#[case("x", "x")]
fn titles_are_trimmed(#[case] raw: &str, #[case] expected: &str) {
    let title = TemplateTitle::new(raw).expect("valid title");
    assert_eq!(title.as_ref(), expected);
}

#[rstest]
#[case("", TemplateValidationError::EmptyTitle)]
#[case("  ", TemplateValidationError::EmptyTitle)]
fn blank_titles_are_rejected(#[case] raw: &str, #[case] expected: TemplateValidationError) {
    assert_eq!(TemplateTitle::new(raw), Err(expected));
}

#[rstest]
fn overlong_title_and_filename_are_rejected() {
    assert_eq!(
        TemplateTitle::new("t".repeat(TITLE_MAX + 1)),
        Err(TemplateValidationError::TitleTooLong { max: TITLE_MAX })
    );
    assert_eq!(
        Filename::new("f".repeat(FILENAME_MAX + 1)),
        Err(TemplateValidationError::FilenameTooLong { max: FILENAME_MAX })
    );
}

#[rstest]
fn duplicate_ordinals_are_reported() {
    let ordinals = [Ordinal::new(0), Ordinal::new(2), Ordinal::new(0)];
    assert_eq!(
        ensure_unique_ordinals(ordinals),
        Err(TemplateValidationError::DuplicateOrdinal { ordinal: 0 })
    );
    assert!(ensure_unique_ordinals([Ordinal::new(1), Ordinal::new(5)]).is_ok());
}

#[rstest]
#[case(TemplateValidationError::EmptyTitle, "title")]
#[case(TemplateValidationError::EmptyFilename, "filename")]
#[case(TemplateValidationError::NoSnippets, "snippets")]
#[case(TemplateValidationError::UnknownThumbnailOrdinal { ordinal: 4 }, "thumbnailOrdinal")]
fn validation_errors_name_their_field(
    #[case] error: TemplateValidationError,
    #[case] field: &str,
) {
    assert_eq!(error.field(), field);
}
