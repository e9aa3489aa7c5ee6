use std::sync::LazyLock;

use regex::Regex;

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
        .expect("youtube id pattern is valid")
});

/// Extracts the 11-character video id from the usual YouTube URL shapes.
pub fn youtube_video_id(url: &str) -> Option<&str> {
    let caps = VIDEO_ID.captures(url)?;
    let id = caps.get(2)?.as_str();
    (id.len() == 11).then_some(id)
}

/// Embeddable player URL, or the input unchanged when it is not a YouTube link.
pub fn youtube_embed_url(url: &str) -> String {
    match youtube_video_id(url) {
        Some(id) => format!("https://www.youtube.com/embed/{id}"),
        None => url.to_string(),
    }
}
