/// Convert a page title or URL into a sanitized directory/file name
pub fn sanitize_filename(name: &str) -> String {
    // Remove protocol and replace invalid filename characters
    let mut out = name.replace("http://", "").replace("https://", "");
    out = out.replace(
        ['/', '\\', ':', '?', '&', '=', '#', '%', '"', '<', '>', '|', '*'],
        "_",
    );
    let out = out.trim().to_string();

    if out.is_empty() {
        return "untitled".to_string();
    }

    // Limit filename length
    if out.chars().count() > 100 {
        out.chars().take(100).collect()
    } else {
        out
    }
}
