//! Top-level index page.

use crate::OutputSnapshot;
use crate::fs::write_atomic;
use annals_core::{ChapterPlan, ChapterSpec, OutputSettings, chapter_dir_name};
use annals_error::AnnalsResult;
use derive_getters::Getters;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Content guides longer than this are cut in the listing.
const GUIDE_PREVIEW_CHARS: usize = 150;

/// Outcome of an index refresh.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct IndexSummary {
    /// Index file path
    path: PathBuf,
    /// Planned chapters that exist
    generated: usize,
    /// Planned chapters
    total: usize,
    /// Listed chapters that are not in the plan
    unplanned: usize,
    /// Whether the file content changed
    changed: bool,
}

/// Rewrites the index page from the plan and the chapters on disk.
///
/// The output depends only on the plan and on which chapters exist, so
/// running it twice in a row yields byte-identical files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexUpdater {
    chapters_dir: PathBuf,
    readme_filename: String,
    index_file: PathBuf,
}

impl IndexUpdater {
    /// Creates an updater.
    pub fn new(
        chapters_dir: impl Into<PathBuf>,
        readme_filename: impl Into<String>,
        index_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            chapters_dir: chapters_dir.into(),
            readme_filename: readme_filename.into(),
            index_file: index_file.into(),
        }
    }

    /// Creates an updater from output settings.
    pub fn from_settings(output: &OutputSettings) -> Self {
        Self::new(
            output.chapters_dir().clone(),
            output.readme_filename().clone(),
            output.index_file().clone(),
        )
    }

    /// Index file path.
    pub fn index_file(&self) -> &Path {
        &self.index_file
    }

    /// Scans the chapters directory and rewrites the index file.
    ///
    /// The file is left untouched when its content would not change.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the chapters directory cannot be listed or
    /// the index cannot be written.
    #[instrument(skip(self, plan), fields(index = %self.index_file.display()))]
    pub async fn update(&self, plan: &ChapterPlan) -> AnnalsResult<IndexSummary> {
        let snapshot = OutputSnapshot::scan(&self.chapters_dir, &self.readme_filename).await?;

        let mut disk_titles = BTreeMap::new();
        for number in snapshot.numbers().iter().copied() {
            if plan.contains(number) {
                continue;
            }
            let path = self
                .chapters_dir
                .join(chapter_dir_name(number))
                .join(&self.readme_filename);
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    if let Some(title) = first_heading(&text) {
                        disk_titles.insert(number, title);
                    }
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Could not read chapter title"),
            }
        }

        let content = self.render(plan, &snapshot, &disk_titles);

        let changed = match tokio::fs::read_to_string(&self.index_file).await {
            Ok(existing) => existing != content,
            Err(_) => true,
        };
        if changed {
            write_atomic(&self.index_file, content.as_bytes()).await?;
        } else {
            debug!("Index already up to date");
        }

        let generated = plan
            .chapters()
            .iter()
            .filter(|c| snapshot.contains(*c.number()))
            .count();
        let summary = IndexSummary {
            path: self.index_file.clone(),
            generated,
            total: plan.len(),
            unplanned: snapshot.len() - generated,
            changed,
        };
        info!(
            generated = summary.generated,
            total = summary.total,
            changed,
            "Index updated"
        );
        Ok(summary)
    }

    /// Renders the index page.
    ///
    /// `disk_titles` supplies headings for chapters that exist on disk but
    /// are not in the plan; missing entries fall back to `第N章`.
    pub fn render(
        &self,
        plan: &ChapterPlan,
        snapshot: &OutputSnapshot,
        disk_titles: &BTreeMap<u32, String>,
    ) -> String {
        let chapters = plan.sorted();
        let (done, upcoming): (Vec<&ChapterSpec>, Vec<&ChapterSpec>) = chapters
            .iter()
            .copied()
            .partition(|c| snapshot.contains(*c.number()));

        let mut out = String::new();
        let _ = write!(out, "# 📚 {}\n\n", plan.book_title());
        if !plan.book_description().trim().is_empty() {
            let _ = write!(out, "> {}\n\n", plan.book_description().trim());
        }

        out.push_str("## 📑 目录\n\n");
        let _ = write!(
            out,
            "**进度：** {}/{} 章已完成\n\n",
            done.len(),
            chapters.len()
        );

        let mut listed: BTreeMap<u32, String> = BTreeMap::new();
        for chapter in &done {
            listed.insert(*chapter.number(), self.planned_entry(chapter, true));
        }
        for number in snapshot.numbers().iter().copied() {
            if plan.contains(number) {
                continue;
            }
            let title = disk_titles
                .get(&number)
                .cloned()
                .unwrap_or_else(|| format!("第{}章", number));
            listed.insert(
                number,
                format!("✅ **[{}]({})**  \n\n", title, self.link(number)),
            );
        }
        for entry in listed.values() {
            out.push_str(entry);
        }

        if !upcoming.is_empty() {
            out.push_str("## ⏳ 即将推出\n\n");
            for chapter in &upcoming {
                out.push_str(&self.planned_entry(chapter, false));
            }
        }

        if !plan.system_prompt().trim().is_empty() {
            out.push_str("---\n\n## 📝 系统提示词\n\n");
            out.push_str(plan.system_prompt().trim());
            out.push_str("\n\n");
        }

        out.push_str("---\n\n## 📅 更新日志\n\n");
        let _ = writeln!(
            out,
            "- **已完成章节：** {}/{}",
            done.len(),
            chapters.len()
        );
        let next = upcoming
            .first()
            .map(|c| c.title().clone())
            .unwrap_or_else(|| "已完成全部章节".to_string());
        let _ = writeln!(out, "- **下一章：** {}", next);
        out
    }

    fn planned_entry(&self, chapter: &ChapterSpec, generated: bool) -> String {
        let mut entry = if generated {
            format!(
                "✅ **[{}]({})**  \n",
                chapter.title(),
                self.link(*chapter.number())
            )
        } else {
            format!("⏳ **{}**  \n", chapter.title())
        };

        if !chapter.period().trim().is_empty() {
            let _ = writeln!(entry, "   *{}*", chapter.period().trim());
        }
        if let Some(concept) = chapter.core_concept().as_deref().map(str::trim)
            && !concept.is_empty()
        {
            let _ = writeln!(entry, "   **核心梗：** {}", concept);
        }
        match chapter.content_guide().as_deref().map(str::trim) {
            Some(guide) if !guide.is_empty() => {
                let _ = writeln!(entry, "   **内容导读：** {}", preview(guide));
            }
            _ => {
                if !chapter.description().trim().is_empty() {
                    let _ = writeln!(entry, "   {}", chapter.description().trim());
                }
            }
        }
        entry.push('\n');
        entry
    }

    /// Link from the index file to a chapter file.
    fn link(&self, number: u32) -> String {
        let base = self.index_file.parent().unwrap_or(Path::new(""));
        let relative = self
            .chapters_dir
            .strip_prefix(base)
            .unwrap_or(&self.chapters_dir);

        let mut parts: Vec<String> = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::ParentDir => parts.push("..".to_string()),
                _ => {}
            }
        }
        parts.push(chapter_dir_name(number));
        parts.push(self.readme_filename.clone());

        let joined = parts.join("/");
        if relative.is_absolute() || joined.starts_with("..") {
            joined
        } else {
            format!("./{}", joined)
        }
    }
}

fn preview(guide: &str) -> String {
    if guide.chars().count() > GUIDE_PREVIEW_CHARS {
        let cut: String = guide.chars().take(GUIDE_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        guide.to_string()
    }
}

/// First `# ` heading of a chapter file, skipping front matter.
fn first_heading(text: &str) -> Option<String> {
    let mut lines = text.lines();
    if text.starts_with("---") {
        lines.next();
        for line in lines.by_ref() {
            if line.trim() == "---" {
                break;
            }
        }
    }
    lines
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_skips_front_matter() {
        let text = "---\nchapter: 9\ntitle: x\n---\n\n# 第9章 商鞅变法\n\n## 一\n";
        assert_eq!(first_heading(text).as_deref(), Some("第9章 商鞅变法"));
        assert_eq!(first_heading("no heading here"), None);
    }

    #[test]
    fn preview_counts_characters() {
        let guide = "秦".repeat(151);
        let cut = preview(&guide);
        assert_eq!(cut.chars().count(), 153);
        assert!(cut.ends_with("..."));
        assert_eq!(preview("短"), "短");
    }

    #[test]
    fn link_is_relative_to_index() {
        let updater = IndexUpdater::new("book/chapters", "README.md", "book/README.md");
        assert_eq!(updater.link(3), "./chapters/chapter_03/README.md");

        let updater = IndexUpdater::new("chapters", "README.md", "README.md");
        assert_eq!(updater.link(12), "./chapters/chapter_12/README.md");
    }
}
