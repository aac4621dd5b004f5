// src/utils/html.rs

/// Strips unsafe markup from user-supplied notification text.
///
/// Whitelist-based: harmless tags such as <b> survive, while <script> (with its
/// content), <iframe> and event-handler attributes are removed.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
