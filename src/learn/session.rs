use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    learn::{Applied, LearnError, LearnResult, LearningBackend, Player},
    model::entity::Lecture,
};

/// Drives a [`Player`] against the server.
///
/// Server failures come back as errors and leave the player as it was. The one exception
/// is [`LearningSession::open`] of a different course, which clears the player.
pub struct LearningSession<B: LearningBackend> {
    backend: Arc<B>,
    player: Player,
}

impl<B: LearningBackend> LearningSession<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            player: Player::new(),
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// A course with at least one lecture is loaded.
    pub fn is_available(&self) -> bool {
        self.player.is_loaded() && self.player.current().is_some()
    }

    #[tracing::instrument(skip(self))]
    pub async fn open(&mut self, course_id: &str) -> LearnResult<()> {
        let reopening = self
            .player
            .course()
            .is_some_and(|c| c.id == course_id || c.slug == course_id);

        match self.backend.course_with_progress(course_id).await {
            Ok(data) => {
                self.player.load(data);
                Ok(())
            }
            Err(e) => {
                if !reopening {
                    self.player.clear();
                }
                Err(e.into())
            }
        }
    }

    /// Re-fetches the loaded course.
    pub async fn refresh(&mut self) -> LearnResult<()> {
        let course_id = self.course_id()?;
        let data = self.backend.course_with_progress(&course_id).await?;
        self.player.load(data);
        Ok(())
    }

    /// Moves to `lecture_id` and records it as the current lecture in the background.
    ///
    /// A locked lecture is refused before anything is sent.
    pub fn select(&mut self, lecture_id: &str) -> LearnResult<JoinHandle<()>> {
        let course_id = self.course_id()?;
        let lecture_id = self.player.select(lecture_id)?.id.clone();
        Ok(self.persist_current(course_id, lecture_id))
    }

    pub async fn mark_current_complete(&mut self) -> LearnResult<Applied> {
        let course_id = self.course_id()?;
        let lecture_id = self
            .player
            .current()
            .map(|l| l.id.clone())
            .ok_or(LearnError::NoCurrentLecture)?;
        let epoch = self.player.epoch();

        let outcome = self
            .backend
            .mark_lecture_complete(&course_id, &lecture_id)
            .await?;
        let applied = self.player.apply_completion(epoch, &lecture_id, &outcome);
        tracing::info!(%lecture_id, ?applied, "lecture completed");
        Ok(applied)
    }

    pub fn previous(&mut self) -> LearnResult<Option<JoinHandle<()>>> {
        let course_id = self.course_id()?;
        let moved = self.player.previous().map(|l| l.id.clone());
        Ok(moved.map(|lecture_id| self.persist_current(course_id, lecture_id)))
    }

    pub fn next(&mut self) -> LearnResult<Option<JoinHandle<()>>> {
        let course_id = self.course_id()?;
        let moved = self.player.next().map(|l| l.id.clone());
        Ok(moved.map(|lecture_id| self.persist_current(course_id, lecture_id)))
    }

    pub fn search(&self, query: &str) -> Vec<&Lecture> {
        self.player.sequence().filter_by_title(query)
    }

    fn course_id(&self) -> LearnResult<String> {
        self.player
            .course()
            .map(|c| c.id.clone())
            .ok_or(LearnError::NotLoaded)
    }

    fn persist_current(&self, course_id: String, lecture_id: String) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if let Err(e) = backend.update_current_lecture(&course_id, &lecture_id).await {
                tracing::warn!(%course_id, %lecture_id, "failed to record current lecture: {e}");
            }
        })
    }
}
