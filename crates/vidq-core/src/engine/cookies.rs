//! Cookie-jar sanity check.

/// True if `content` looks like a Netscape cookie file: the standard header,
/// or at least one tab-separated entry with the seven expected fields.
pub fn is_netscape_cookie_file(content: &str) -> bool {
    if content.starts_with("# Netscape HTTP Cookie File") || content.starts_with("# HTTP Cookie File")
    {
        return true;
    }
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && (!l.starts_with('#') || l.starts_with("#HttpOnly_")))
        .any(|l| l.split('\t').count() >= 7)
}
