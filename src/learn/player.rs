use crate::{
    learn::{LearnError, LearnResult, LectureSequence},
    model::entity::{CompletionOutcome, Course, CourseWithProgress, Lecture},
};

/// Identifies one load of the player. Answers carrying an older epoch are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Epoch(u64);

/// What a completion answer did to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The answer belongs to an earlier load.
    Stale,
    /// The lecture is not in the loaded sequence.
    Ignored,
    /// Marked complete with nothing further to open.
    Completed { index: usize },
    /// Marked complete and the pointer moved to the opened lecture.
    Advanced { from: usize, to: usize },
}

/// Learning-view state for one course: the ordered lectures plus a current pointer.
#[derive(Debug, Default)]
pub struct Player {
    course: Option<Course>,
    sequence: LectureSequence,
    current: Option<usize>,
    progress_percentage: f64,
    epoch: Epoch,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the state with a fresh course payload.
    ///
    /// The pointer goes to the server's current lecture when it is known, otherwise to the
    /// first open lecture not yet completed, then the first open one, then the first one.
    pub fn load(&mut self, data: CourseWithProgress) -> Epoch {
        let current_id = data.current_lecture_id().map(str::to_string);
        let sequence = LectureSequence::new(data.modules, data.lectures);

        let lectures = sequence.lectures();
        let current = current_id
            .as_deref()
            .and_then(|id| sequence.position(id))
            .or_else(|| lectures.iter().position(|l| !l.locked() && !l.completed()))
            .or_else(|| lectures.iter().position(|l| !l.locked()))
            .or((!lectures.is_empty()).then_some(0));

        self.progress_percentage = data
            .progress
            .map(|p| p.progress_percentage)
            .unwrap_or_else(|| percentage(sequence.completed_count(), sequence.len()));
        self.course = Some(data.course);
        self.sequence = sequence;
        self.current = None;
        self.epoch = Epoch(self.epoch.0 + 1);
        if let Some(index) = current {
            self.point_at(index);
        }

        tracing::debug!(
            lectures = self.sequence.len(),
            current = ?self.current,
            "course loaded into player"
        );
        self.epoch
    }

    /// Drops every loaded course. Pending answers become stale.
    pub fn clear(&mut self) {
        self.course = None;
        self.sequence = LectureSequence::default();
        self.current = None;
        self.progress_percentage = 0.0;
        self.epoch = Epoch(self.epoch.0 + 1);
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn is_loaded(&self) -> bool {
        self.course.is_some()
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn sequence(&self) -> &LectureSequence {
        &self.sequence
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Lecture> {
        self.current.and_then(|i| self.sequence.get(i))
    }

    pub fn progress_percentage(&self) -> f64 {
        self.progress_percentage
    }

    /// Moves the pointer to `lecture_id`. A locked lecture leaves the pointer where it was.
    pub fn select(&mut self, lecture_id: &str) -> LearnResult<&Lecture> {
        let index = self
            .sequence
            .position(lecture_id)
            .ok_or_else(|| LearnError::unknown(lecture_id))?;

        let lecture = &self.sequence.lectures()[index];
        if lecture.locked() {
            return Err(LearnError::locked(lecture_id, lecture.lock_reason.as_deref()));
        }

        self.point_at(index);
        Ok(&self.sequence.lectures()[index])
    }

    /// Folds a completion answer into the state.
    ///
    /// Only the server's named next lecture is opened; nothing is recomputed here.
    pub fn apply_completion(
        &mut self,
        epoch: Epoch,
        lecture_id: &str,
        outcome: &CompletionOutcome,
    ) -> Applied {
        if epoch != self.epoch {
            tracing::debug!(?epoch, current = ?self.epoch, "dropping stale completion");
            return Applied::Stale;
        }
        let Some(index) = self.sequence.position(lecture_id) else {
            return Applied::Ignored;
        };

        if let Some(lecture) = self.sequence.get_mut(index) {
            lecture.is_completed = Some(true);
        }
        let reported = outcome.progress.as_ref().and_then(|p| p.progress_percentage);
        self.progress_percentage = match reported {
            Some(pct) => pct,
            None => percentage(self.sequence.completed_count(), self.sequence.len()),
        };

        let next = outcome
            .next_lecture_id()
            .and_then(|id| self.sequence.position(id));
        match next {
            Some(to) => {
                self.sequence.unlock(to);
                if self.current == Some(index) {
                    self.point_at(to);
                }
                Applied::Advanced { from: index, to }
            }
            None => Applied::Completed { index },
        }
    }

    /// Steps back one lecture, unless it is locked.
    pub fn previous(&mut self) -> Option<&Lecture> {
        let index = self.current?.checked_sub(1)?;
        if self.sequence.get(index)?.locked() {
            return None;
        }
        self.point_at(index);
        self.sequence.get(index)
    }

    /// Steps forward one lecture, unless it is still locked.
    pub fn next(&mut self) -> Option<&Lecture> {
        let index = self.current? + 1;
        if self.sequence.get(index)?.locked() {
            return None;
        }
        self.point_at(index);
        self.sequence.get(index)
    }

    pub fn is_first(&self) -> bool {
        self.current == Some(0)
    }

    pub fn is_last(&self) -> bool {
        self.current
            .is_some_and(|i| i + 1 == self.sequence.len())
    }

    fn point_at(&mut self, index: usize) {
        if let Some(old) = self.current.and_then(|i| self.sequence.get_mut(i)) {
            old.is_current = Some(false);
        }
        if let Some(new) = self.sequence.get_mut(index) {
            new.is_current = Some(true);
        }
        self.current = Some(index);
    }
}

fn percentage(completed: usize, total: usize) -> f64 {
    f64::from(crate::utils::calculate_progress(completed, total))
}
