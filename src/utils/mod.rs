mod text;
pub use text::{
    calculate_progress, format_price, generate_slug, initials, is_valid_url, note_file_name,
    truncate_text,
};

mod youtube;
pub use youtube::{youtube_embed_url, youtube_video_id};
