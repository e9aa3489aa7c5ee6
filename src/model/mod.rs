mod attachment;
pub use attachment::Attachment;

pub mod entity;

mod envelope;
pub use envelope::{Envelope, ErrorEnvelope, Meta};

mod repo;
pub use repo::{LectureFilter, Page, PaginationParams, ResourceType, ResourceTyped, SortOrder};
