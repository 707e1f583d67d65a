mod test_utils;

use annals_book::{IndexUpdater, OutputSnapshot};
use annals_core::{ChapterPlan, ChapterSpec};
use std::collections::BTreeMap;
use test_utils::{plan, touch_chapter};

fn updater(root: &std::path::Path) -> IndexUpdater {
    IndexUpdater::new(root.join("chapters"), "README.md", root.join("README.md"))
}

#[test]
fn test_render_layout() {
    let guide = "齐".repeat(160);
    let chapters = vec![
        ChapterSpec::builder()
            .number(1u32)
            .title("烽火戏诸侯")
            .period("西周末年")
            .keywords(vec!["周幽王".to_string()])
            .core_concept("一场玩笑断送了西周")
            .build()
            .unwrap(),
        ChapterSpec::builder()
            .number(2u32)
            .title("平王东迁")
            .period("公元前770年")
            .keywords(vec!["周平王".to_string()])
            .content_guide(guide.clone())
            .build()
            .unwrap(),
        ChapterSpec::builder()
            .number(3u32)
            .title("郑庄公")
            .period("春秋初年")
            .keywords(vec!["郑庄公".to_string()])
            .description("小霸王的崛起")
            .build()
            .unwrap(),
    ];
    let plan = ChapterPlan::new("趣说中国史", "轻松读历史", "你是历史作家", chapters);
    let updater = IndexUpdater::new("chapters", "README.md", "README.md");

    let page = updater.render(
        &plan,
        &OutputSnapshot::from_numbers([1, 2]),
        &BTreeMap::new(),
    );

    let expected_guide = format!("{}...", "齐".repeat(150));
    let expected = format!(
        "# 📚 趣说中国史\n\n\
         > 轻松读历史\n\n\
         ## 📑 目录\n\n\
         **进度：** 2/3 章已完成\n\n\
         ✅ **[烽火戏诸侯](./chapters/chapter_01/README.md)**  \n   *西周末年*\n   **核心梗：** 一场玩笑断送了西周\n\n\
         ✅ **[平王东迁](./chapters/chapter_02/README.md)**  \n   *公元前770年*\n   **内容导读：** {}\n\n\
         ## ⏳ 即将推出\n\n\
         ⏳ **郑庄公**  \n   *春秋初年*\n   小霸王的崛起\n\n\
         ---\n\n## 📝 系统提示词\n\n你是历史作家\n\n\
         ---\n\n## 📅 更新日志\n\n\
         - **已完成章节：** 2/3\n\
         - **下一章：** 郑庄公\n",
        expected_guide
    );
    assert_eq!(page, expected);
}

#[test]
fn test_render_complete_book_and_unplanned_chapters() {
    let plan = plan(2);
    let updater = IndexUpdater::new("chapters", "README.md", "README.md");
    let mut titles = BTreeMap::new();
    titles.insert(5, "第5章 番外".to_string());

    let page = updater.render(&plan, &OutputSnapshot::from_numbers([1, 2, 5, 7]), &titles);

    assert!(page.contains("**进度：** 2/2 章已完成"));
    assert!(page.contains("✅ **[第5章 番外](./chapters/chapter_05/README.md)**"));
    assert!(page.contains("✅ **[第7章](./chapters/chapter_07/README.md)**"));
    assert!(page.contains("- **下一章：** 已完成全部章节"));
    assert!(!page.contains("即将推出"));

    let first = page.find("chapter_02").unwrap();
    let fifth = page.find("chapter_05").unwrap();
    let seventh = page.find("chapter_07").unwrap();
    assert!(first < fifth && fifth < seventh);
}

#[tokio::test]
async fn test_update_is_idempotent() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    touch_chapter(dir.path(), 1, "第1回");
    touch_chapter(dir.path(), 2, "第2回");
    touch_chapter(dir.path(), 9, "第9章 彩蛋");
    let plan = plan(4);
    let updater = updater(dir.path());

    let first = updater.update(&plan).await?;
    let before = std::fs::read(dir.path().join("README.md"))?;
    let second = updater.update(&plan).await?;
    let after = std::fs::read(dir.path().join("README.md"))?;

    assert_eq!(before, after);
    assert!(*first.changed());
    assert!(!*second.changed());
    assert_eq!(*second.generated(), 2);
    assert_eq!(*second.total(), 4);
    assert_eq!(*second.unplanned(), 1);

    let page = String::from_utf8(after)?;
    assert!(page.contains("[第9章 彩蛋](./chapters/chapter_09/README.md)"));
    assert!(page.contains("- **下一章：** 第3回"));
    Ok(())
}

#[tokio::test]
async fn test_update_without_chapters() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let summary = updater(dir.path()).update(&plan(2)).await?;

    assert_eq!(*summary.generated(), 0);
    let page = std::fs::read_to_string(summary.path())?;
    assert!(page.contains("**进度：** 0/2 章已完成"));
    assert!(page.contains("⏳ **第1回**"));
    Ok(())
}

#[tokio::test]
async fn test_update_skips_non_canonical_directories() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let stray = dir.path().join("chapters/chapter_1");
    std::fs::create_dir_all(&stray)?;
    std::fs::write(stray.join("README.md"), "# 第1回\n")?;

    let summary = updater(dir.path()).update(&plan(2)).await?;

    assert_eq!(*summary.generated(), 0);
    let page = std::fs::read_to_string(summary.path())?;
    assert!(!page.contains("chapter_01"));
    assert!(!page.contains("chapter_1/"));
    assert!(page.contains("⏳ **第1回**"));
    Ok(())
}
