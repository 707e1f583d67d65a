use annals_error::{
    AnnalsError, ChapterError, ChapterErrorKind, ConfigError, ErrorClass, ImageError,
    ImageErrorKind, ModelsError, ModelsErrorKind, StorageError, StorageErrorKind,
};
use std::collections::HashSet;
use strum::IntoEnumIterator;

#[test]
fn test_exit_codes_are_distinct_and_nonzero() {
    let codes: HashSet<u8> = ErrorClass::iter().map(ErrorClass::exit_code).collect();
    assert_eq!(codes.len(), ErrorClass::iter().count());
    assert!(!codes.contains(&0));
}

#[test]
fn test_chapter_errors_classify() {
    let unknown: AnnalsError = ChapterError::new(ChapterErrorKind::UnknownChapter(42)).into();
    assert_eq!(unknown.class(), ErrorClass::InvalidArgument);

    let done: AnnalsError = ChapterError::new(ChapterErrorKind::AllChaptersGenerated(3)).into();
    assert_eq!(done.class(), ErrorClass::NotFound);

    let gap: AnnalsError = ChapterError::new(ChapterErrorKind::OutOfSequence {
        expected: 4,
        missing: 2,
        location: "output directory",
    })
    .into();
    assert_eq!(gap.class(), ErrorClass::NotFound);

    let read: AnnalsError = ChapterError::new(ChapterErrorKind::FileRead {
        path: "chapters_plan.json".to_string(),
        message: "No such file".to_string(),
    })
    .into();
    assert_eq!(read.class(), ErrorClass::Io);
}

#[test]
fn test_models_errors_classify() {
    let cases = [
        (
            ModelsErrorKind::MissingApiKey("DEEPSEEK_API_KEY".to_string()),
            ErrorClass::Authentication,
        ),
        (
            ModelsErrorKind::Authentication {
                status: 401,
                message: "invalid key".to_string(),
            },
            ErrorClass::Authentication,
        ),
        (
            ModelsErrorKind::QuotaExceeded {
                status: 429,
                message: "slow down".to_string(),
            },
            ErrorClass::QuotaExceeded,
        ),
        (
            ModelsErrorKind::Network("connection refused".to_string()),
            ErrorClass::Network,
        ),
        (
            ModelsErrorKind::Timeout("deadline".to_string()),
            ErrorClass::Network,
        ),
        (
            ModelsErrorKind::Upstream {
                status: 500,
                message: "boom".to_string(),
            },
            ErrorClass::Upstream,
        ),
        (
            ModelsErrorKind::MalformedResponse("no choices".to_string()),
            ErrorClass::Upstream,
        ),
    ];

    for (kind, expected) in cases {
        let err: AnnalsError = ModelsError::new(kind.clone()).into();
        assert_eq!(err.class(), expected, "{kind}");
    }
}

#[test]
fn test_config_and_storage_classify() {
    let config: AnnalsError = ConfigError::new("top_p out of range").into();
    assert_eq!(config.class(), ErrorClass::InvalidArgument);

    let storage: AnnalsError =
        StorageError::new(StorageErrorKind::FileWrite("README.md".to_string())).into();
    assert_eq!(storage.class(), ErrorClass::Io);
}

#[test]
fn test_image_error_display_names_keyword() {
    let err = ImageError::new(ImageErrorKind::NoAcceptableImage("周天子东迁".to_string()));
    assert!(err.to_string().contains("周天子东迁"));
    assert!(err.to_string().contains("Image Error"));
}

#[test]
fn test_location_is_captured() {
    let err = ConfigError::new("bad");
    assert!(err.file.ends_with("error_class_test.rs"));
    assert!(err.line > 0);
}

#[test]
fn test_class_display_uses_taxonomy_names() {
    assert_eq!(ErrorClass::Authentication.to_string(), "AuthenticationError");
    assert_eq!(ErrorClass::Upstream.to_string(), "UpstreamError");
    assert_eq!(ErrorClass::NotFound.to_string(), "NotFound");
}
