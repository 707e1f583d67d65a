//! Next-chapter selection.

use crate::OutputSnapshot;
use annals_core::{ChapterPlan, ChapterSpec};
use annals_error::{ChapterError, ChapterErrorKind};
use tracing::{debug, instrument};

/// Picks the chapter to generate.
///
/// Selection is a pure function of the plan and an [`OutputSnapshot`]; the
/// filesystem is never touched here.
///
/// Chapters are generated strictly in sequence. Without an explicit number,
/// the chapter chosen is the lowest planned chapter that does not exist yet,
/// and it must also be the one directly after the highest existing chapter.
/// Any disagreement between the two is a gap, which is reported rather than
/// silently filled or skipped.
///
/// Chapter directories that are not in the plan are ignored.
#[derive(Debug, Clone, Copy)]
pub struct ChapterSelector<'a> {
    plan: &'a ChapterPlan,
}

impl<'a> ChapterSelector<'a> {
    /// Creates a selector over a validated plan.
    pub fn new(plan: &'a ChapterPlan) -> Self {
        Self { plan }
    }

    /// Selects a chapter.
    ///
    /// An explicit number wins regardless of what exists on disk, which is how
    /// a chapter is regenerated.
    ///
    /// # Errors
    ///
    /// * `UnknownChapter` if `requested` is not in the plan
    /// * `AllChaptersGenerated` if every planned chapter exists
    /// * `OutOfSequence` if the plan or the output directory has a gap
    ///
    /// # Examples
    ///
    /// ```
    /// use annals_book::{ChapterSelector, OutputSnapshot};
    /// use annals_core::{ChapterPlan, ChapterSpec};
    ///
    /// let chapters = (1..=3u32)
    ///     .map(|n| ChapterSpec::builder().number(n).title(format!("第{n}章")).build().unwrap())
    ///     .collect();
    /// let plan = ChapterPlan::new("春秋", "", "", chapters);
    /// let selector = ChapterSelector::new(&plan);
    ///
    /// let next = selector.select(None, &OutputSnapshot::from_numbers([1])).unwrap();
    /// assert_eq!(*next.number(), 2);
    ///
    /// let explicit = selector.select(Some(1), &OutputSnapshot::from_numbers([1, 2])).unwrap();
    /// assert_eq!(*explicit.number(), 1);
    /// ```
    #[instrument(skip(self, snapshot), fields(generated = snapshot.len()))]
    pub fn select(
        &self,
        requested: Option<u32>,
        snapshot: &OutputSnapshot,
    ) -> Result<&'a ChapterSpec, ChapterError> {
        if let Some(number) = requested {
            debug!(number, "Explicit chapter requested");
            return self
                .plan
                .get(number)
                .ok_or_else(|| ChapterError::new(ChapterErrorKind::UnknownChapter(number)));
        }

        let planned = self.plan.numbers();
        let highest_generated = planned
            .iter()
            .copied()
            .filter(|n| snapshot.contains(*n))
            .max();

        let Some(next_missing) = planned.iter().copied().find(|n| !snapshot.contains(*n)) else {
            return Err(ChapterError::new(ChapterErrorKind::AllChaptersGenerated(
                planned.len(),
            )));
        };

        let expected = match highest_generated {
            Some(highest) => highest.saturating_add(1),
            None => self.plan.first_number().unwrap_or(1),
        };

        if next_missing < expected {
            // An earlier planned chapter was never written (or was deleted).
            return Err(ChapterError::new(ChapterErrorKind::OutOfSequence {
                expected,
                missing: next_missing,
                location: "output directory",
            }));
        }
        if next_missing > expected {
            return Err(ChapterError::new(ChapterErrorKind::OutOfSequence {
                expected,
                missing: expected,
                location: "plan",
            }));
        }

        debug!(number = next_missing, "Selected next chapter");
        self.plan
            .get(next_missing)
            .ok_or_else(|| ChapterError::new(ChapterErrorKind::UnknownChapter(next_missing)))
    }
}
