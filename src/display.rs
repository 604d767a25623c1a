//! Best-effort display notification
//!
//! Pushes the current track's display lines to a separate character-display
//! service (a 16x4 HD44780 behind its own little HTTP daemon). The service
//! takes lines as numbered query parameters: `GET /?0=first&1=second`.
//!
//! Display failures must never affect playback: every error on this path is
//! caught here and logged at debug severity only.

use std::path::Path;
use std::time::Duration;

use tracing::debug;

/// Width of one display line.
const LINE_WIDTH: usize = 16;
/// Number of display lines.
const MAX_LINES: usize = 4;

/// Client for the external display service. A `None` URL disables pushes.
#[derive(Debug)]
pub struct DisplayNotifier {
    client: reqwest::Client,
    url: Option<String>,
}

impl DisplayNotifier {
    pub fn new(url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap_or_default();
        Self { client, url }
    }

    /// Format `track` into display lines and push them. Never fails.
    pub async fn notify_track(&self, track: &str) {
        self.push(&display_lines(track)).await;
    }

    async fn push(&self, lines: &[String]) {
        let Some(url) = &self.url else {
            return;
        };

        let query: Vec<(String, &str)> = lines
            .iter()
            .take(MAX_LINES)
            .enumerate()
            .map(|(i, line)| (i.to_string(), line.as_str()))
            .collect();

        match self.client.get(url).query(&query).send().await {
            Ok(resp) => debug!(status = %resp.status(), "display updated"),
            Err(e) => debug!("display push failed (ignored): {}", e),
        }
    }
}

/// Turn a track identifier into up to four 16-column display lines.
///
/// The parent directory (usually the artist/album) becomes the first line;
/// the cleaned title fills the rest, wrapped at word boundaries where
/// possible.
pub fn display_lines(track: &str) -> Vec<String> {
    let path = Path::new(track);

    let mut lines = Vec::new();
    if let Some(dir) = path
        .parent()
        .and_then(Path::file_name)
        .map(|s| s.to_string_lossy())
    {
        if !dir.is_empty() {
            lines.push(clip(&clean_title(&dir)));
        }
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| track.to_string());
    let title = clean_title(&stem);

    for line in wrap(&title) {
        if lines.len() == MAX_LINES {
            break;
        }
        lines.push(line);
    }

    lines
}

/// Strip numeric track prefixes ("07 - ", "07. ", "07_") and leading
/// bracketed tags ("[live] ") from a file-name component.
fn clean_title(name: &str) -> String {
    let mut s = name.trim();

    loop {
        let before = s;
        if let Some(rest) = s.strip_prefix('[').and_then(|r| r.split_once(']')) {
            s = rest.1.trim_start();
        }
        let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0 && digits <= 3 {
            s = s[digits..].trim_start_matches(['.', '-', '_', ' ']).trim_start();
        }
        if s == before || s.is_empty() {
            break;
        }
    }

    let cleaned = s.replace('_', " ");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        name.trim().to_string()
    } else {
        cleaned.to_string()
    }
}

/// Wrap text into LINE_WIDTH-column lines, breaking at spaces when one is
/// in reach, otherwise mid-word.
fn wrap(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= LINE_WIDTH {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(clip(&current));
            current = word.to_string();
        }
        while current.len() > LINE_WIDTH {
            let head: String = current.chars().take(LINE_WIDTH).collect();
            lines.push(head);
            current = current.chars().skip(LINE_WIDTH).collect();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn clip(s: &str) -> String {
    s.chars().take(LINE_WIDTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_track_number_and_extension() {
        let lines = display_lines("Some Artist/07 - A Song.mp3");
        assert_eq!(lines[0], "Some Artist");
        assert_eq!(lines[1], "A Song");
    }

    #[test]
    fn strips_bracket_prefix() {
        assert_eq!(clean_title("[live] 03. Encore"), "Encore");
    }

    #[test]
    fn underscores_become_spaces() {
        assert_eq!(clean_title("02_Blue_Train"), "Blue Train");
    }

    #[test]
    fn lines_are_clipped_to_display_width() {
        let lines = display_lines("x/An Exceedingly Long Track Title Indeed.ogg");
        assert!(lines.iter().all(|l| l.chars().count() <= 16));
        assert!(lines.len() <= 4);
    }

    #[test]
    fn bare_filename_still_produces_a_line() {
        let lines = display_lines("track.mp3");
        assert_eq!(lines, vec!["track"]);
    }

    #[test]
    fn all_numeric_name_is_kept() {
        // Nothing left after stripping; fall back to the raw name.
        assert_eq!(clean_title("1999"), "1999");
    }

    #[tokio::test]
    async fn notify_without_url_is_a_no_op() {
        let notifier = DisplayNotifier::new(None);
        notifier.notify_track("a/b.mp3").await;
    }

    #[tokio::test]
    async fn notify_with_unreachable_service_is_swallowed() {
        let notifier = DisplayNotifier::new(Some("http://127.0.0.1:1/".to_string()));
        notifier.notify_track("a/b.mp3").await;
    }
}
