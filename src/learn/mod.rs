//! Sequential unlocking of a course's lectures and the learning player built on it.

mod backend;
pub use backend::LearningBackend;

mod error;
pub use error::{DEFAULT_LOCK_REASON, LearnError, LearnResult};

mod player;
pub use player::{Applied, Epoch, Player};

mod sequence;
pub use sequence::{LectureSequence, ModuleGroup};

mod session;
pub use session::LearningSession;
