//! Username inference from cookie filenames

/// Filename suffixes that mark a cookie file as carrying a username prefix.
/// Longest first so `_cookies` is not shadowed by `_cookie`.
const COOKIE_SUFFIXES: &[&str] = &["_cookies.txt", "_cookie.txt"];

/// Infer the username embedded in a cookie filename.
///
/// `alice_cookie.txt` yields `alice`; a filename outside the convention
/// yields an empty string. Suffix matching is case-insensitive, the
/// returned prefix keeps its original casing. Pure and stable: no I/O,
/// the same input always gives the same output.
pub fn infer_username(filename: &str) -> String {
    let lower = filename.to_ascii_lowercase();

    for suffix in COOKIE_SUFFIXES {
        if lower.ends_with(suffix) {
            let prefix = &filename[..filename.len() - suffix.len()];
            if !prefix.is_empty() {
                return prefix.to_string();
            }
        }
    }

    String::new()
}
