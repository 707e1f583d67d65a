use annals_book::load_plan;
use annals_error::{AnnalsErrorKind, ChapterErrorKind, ErrorClass};

#[tokio::test]
async fn test_load_json_plan_with_ids() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("chapters_plan.json");
    std::fs::write(
        &path,
        r#"{
            "book_title": "趣说中国史",
            "book_description": "轻松读历史",
            "system_prompt": "你是历史作家",
            "chapters": [
                {"id": 1, "title": "烽火戏诸侯", "period": "西周末年", "keywords": ["周幽王", "褒姒"],
                 "description": "玩笑", "core_concept": "狼来了"},
                {"id": 2, "title": "平王东迁", "period": "公元前770年", "keywords": ["周平王"]}
            ]
        }"#,
    )?;

    let plan = load_plan(&path).await?;
    assert_eq!(plan.len(), 2);
    assert_eq!(plan.get(1).unwrap().keyword_list(), "周幽王, 褒姒");
    assert_eq!(plan.get(1).unwrap().core_concept().as_deref(), Some("狼来了"));
    assert!(plan.get(2).unwrap().content_guide().is_none());
    Ok(())
}

#[tokio::test]
async fn test_load_toml_plan() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("plan.toml");
    std::fs::write(
        &path,
        r#"
book_title = "趣说中国史"

[[chapters]]
number = 1
title = "烽火戏诸侯"
period = "西周末年"
keywords = ["周幽王"]
"#,
    )?;

    let plan = load_plan(&path).await?;
    assert_eq!(plan.book_title(), "趣说中国史");
    assert_eq!(plan.first_number(), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_load_errors() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    let err = load_plan(dir.path().join("missing.json")).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Io);

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json")?;
    let err = load_plan(&bad).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        AnnalsErrorKind::Chapter(e) if matches!(e.kind, ChapterErrorKind::Parse(_))
    ));

    let dup = dir.path().join("dup.json");
    std::fs::write(
        &dup,
        r#"{"chapters": [{"id": 1, "title": "a"}, {"id": 1, "title": "b"}]}"#,
    )?;
    let err = load_plan(&dup).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        AnnalsErrorKind::Chapter(e) if e.kind == ChapterErrorKind::DuplicateChapter(1)
    ));
    assert_eq!(err.class(), ErrorClass::InvalidArgument);

    let empty = dir.path().join("empty.json");
    std::fs::write(&empty, r#"{"book_title": "空"}"#)?;
    let err = load_plan(&empty).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        AnnalsErrorKind::Chapter(e) if e.kind == ChapterErrorKind::EmptyPlan
    ));
    Ok(())
}
