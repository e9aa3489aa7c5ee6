use crate::model::entity::{Lecture, Module};

/// A course's lectures as one ordered walk: module number first, then lecture order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LectureSequence {
    modules: Vec<Module>,
    lectures: Vec<Lecture>,
}

/// Lectures of one module, in sequence order. `module` is `None` for lectures whose module is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleGroup<'a> {
    pub module: Option<&'a Module>,
    pub lectures: Vec<&'a Lecture>,
}

impl LectureSequence {
    /// Orders the lectures and normalizes their flags.
    ///
    /// Server flags are kept as sent. When any lecture arrives without a lock flag the
    /// whole sequence is re-derived from completion state instead.
    pub fn new(mut modules: Vec<Module>, mut lectures: Vec<Lecture>) -> Self {
        modules.sort_by_key(|m| m.module_number);

        let rank = |lecture: &Lecture| -> (u8, i32, i32) {
            match modules.iter().find(|m| m.id == lecture.module_id.id()) {
                Some(m) => (0, m.module_number, lecture.order),
                None => (1, 0, lecture.order),
            }
        };
        lectures.sort_by_key(|l| rank(l));

        let needs_derive = lectures.iter().any(|l| l.is_locked.is_none());
        for lecture in &mut lectures {
            lecture.is_completed.get_or_insert(false);
        }

        let mut sequence = Self { modules, lectures };
        if needs_derive {
            sequence.derive_locks();
        }
        sequence
    }

    /// Applies the unlock rule: the first lecture is open, every other is open once its predecessor is done.
    pub fn derive_locks(&mut self) {
        let mut previous_completed = true;
        for lecture in &mut self.lectures {
            lecture.is_locked = Some(!previous_completed);
            previous_completed = lecture.completed();
        }
    }

    /// Marks `index` completed and opens the one after it. Nothing is ever relocked.
    ///
    /// Returns the index of the following lecture, if there is one.
    pub fn complete(&mut self, index: usize) -> Option<usize> {
        let lecture = self.lectures.get_mut(index)?;
        lecture.is_completed = Some(true);

        let next = index + 1;
        self.unlock(next).then_some(next)
    }

    pub fn unlock(&mut self, index: usize) -> bool {
        match self.lectures.get_mut(index) {
            Some(lecture) => {
                lecture.is_locked = Some(false);
                true
            }
            None => false,
        }
    }

    pub fn position(&self, lecture_id: &str) -> Option<usize> {
        self.lectures.iter().position(|l| l.id == lecture_id)
    }

    pub fn get(&self, index: usize) -> Option<&Lecture> {
        self.lectures.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Lecture> {
        self.lectures.get_mut(index)
    }

    pub fn lectures(&self) -> &[Lecture] {
        &self.lectures
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.lectures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lectures.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.lectures.iter().filter(|l| l.completed()).count()
    }

    /// Case-insensitive title search across all modules, in sequence order.
    pub fn filter_by_title(&self, query: &str) -> Vec<&Lecture> {
        let needle = query.to_lowercase();
        self.lectures
            .iter()
            .filter(|l| l.title.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn group_by_module(&self) -> Vec<ModuleGroup<'_>> {
        let mut groups: Vec<ModuleGroup<'_>> = self
            .modules
            .iter()
            .map(|m| ModuleGroup {
                module: Some(m),
                lectures: self
                    .lectures
                    .iter()
                    .filter(|l| l.module_id.id() == m.id)
                    .collect(),
            })
            .collect();

        let orphans: Vec<&Lecture> = self
            .lectures
            .iter()
            .filter(|l| !self.modules.iter().any(|m| m.id == l.module_id.id()))
            .collect();
        if !orphans.is_empty() {
            groups.push(ModuleGroup {
                module: None,
                lectures: orphans,
            });
        }

        groups
    }
}
