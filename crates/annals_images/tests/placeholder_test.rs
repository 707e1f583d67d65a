use annals_images::{FALLBACK_KEYWORD, extract_placeholders};

#[test]
fn test_placeholders_are_indexed_in_source_order() {
    let text = "__甲__ text __乙__\n__丙__";
    let found = extract_placeholders(text);

    let summary: Vec<(usize, &str)> = found
        .iter()
        .map(|p| (*p.index(), p.keyword().as_str()))
        .collect();
    assert_eq!(summary, vec![(1, "甲"), (2, "乙"), (3, "丙")]);
    for p in &found {
        assert_eq!(&text[p.span().clone()], p.raw());
    }
}

#[test]
fn test_placeholders_do_not_span_lines() {
    assert!(extract_placeholders("__第一行\n第二行__").is_empty());
}

#[test]
fn test_identifiers_with_single_underscores_are_ignored() {
    assert!(extract_placeholders("snake_case_name and _emphasis_").is_empty());
}

#[test]
fn test_fallback_keyword_without_chapter_keywords() {
    let found = extract_placeholders("__   __");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].keyword(), "");
    assert_eq!(found[0].search_keyword(&[]), FALLBACK_KEYWORD);
}
