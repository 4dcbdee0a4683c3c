//! Result naming conventions.
//!
//! The simulated revision strategy and the version-chain lookup both derive
//! the name of "version N of asset X" from the asset's original name:
//!
//! - version 0 is the bare name (`hero.png`)
//! - version N appends `_N` to the stem (`hero_2.png`)
//!
//! The lookup key used to match results ignores case and extension, so a
//! `hero_2.mp4` result matches version 2 of `Hero.png`.

/// Split a file name or path into `(stem, extension)`.
///
/// The extension includes its leading dot and is empty when the final path
/// segment has no dot (or only a leading one, as in `.env`).
///
/// # Examples
///
/// ```
/// use atelier_core::naming::split_stem;
///
/// assert_eq!(split_stem("hero.png"), ("hero", ".png"));
/// assert_eq!(split_stem("/img/v1.2/hero"), ("/img/v1.2/hero", ""));
/// assert_eq!(split_stem("archive.tar.gz"), ("archive.tar", ".gz"));
/// ```
pub fn split_stem(name: &str) -> (&str, &str) {
    let segment_start = name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    match name[segment_start..].rfind('.') {
        Some(0) | None => (name, ""),
        Some(dot) => name.split_at(segment_start + dot),
    }
}

/// Name of `version` of an asset whose version-0 name is `original`.
///
/// # Examples
///
/// ```
/// use atelier_core::naming::versioned_name;
///
/// assert_eq!(versioned_name("hero.png", 0), "hero.png");
/// assert_eq!(versioned_name("hero.png", 1), "hero_1.png");
/// assert_eq!(versioned_name("/img/A", 3), "/img/A_3");
/// ```
pub fn versioned_name(original: &str, version: u32) -> String {
    if version == 0 {
        return original.to_string();
    }
    let (stem, ext) = split_stem(original);
    format!("{stem}_{version}{ext}")
}

/// Case-insensitive, extension-free lookup key for `version` of `name`.
///
/// Only the final path segment participates.
pub fn chain_key(name: &str, version: u32) -> String {
    let (stem, _) = split_stem(file_name(name));
    let base = stem.to_lowercase();
    if version == 0 {
        base
    } else {
        format!("{base}_{version}")
    }
}

/// Lookup key of an arbitrary result file name (version already baked in).
pub fn result_key(result_name: &str) -> String {
    chain_key(result_name, 0)
}

/// Final path segment of a name or locator.
pub fn file_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_simple() {
        assert_eq!(split_stem("A.jpg"), ("A", ".jpg"));
    }

    #[test]
    fn split_without_extension() {
        assert_eq!(split_stem("A"), ("A", ""));
    }

    #[test]
    fn split_ignores_dots_in_directories() {
        assert_eq!(split_stem("/cdn/v2.1/A"), ("/cdn/v2.1/A", ""));
        assert_eq!(split_stem("/cdn/v2.1/A.webp"), ("/cdn/v2.1/A", ".webp"));
    }

    #[test]
    fn split_hidden_file_has_no_extension() {
        assert_eq!(split_stem(".env"), (".env", ""));
    }

    #[test]
    fn versioned_name_zero_is_identity() {
        assert_eq!(versioned_name("A.png", 0), "A.png");
    }

    #[test]
    fn versioned_name_appends_index() {
        assert_eq!(versioned_name("A", 1), "A_1");
        assert_eq!(versioned_name("A.png", 12), "A_12.png");
        assert_eq!(versioned_name("/img/A.png", 2), "/img/A_2.png");
    }

    #[test]
    fn chain_key_lowercases_and_drops_extension() {
        assert_eq!(chain_key("Shoe.PNG", 0), "shoe");
        assert_eq!(chain_key("Shoe.PNG", 2), "shoe_2");
        assert_eq!(chain_key("/public/Image/Shoe.png", 1), "shoe_1");
    }

    #[test]
    fn result_key_matches_chain_key() {
        assert_eq!(result_key("shoe_2.mp4"), chain_key("Shoe.png", 2));
        assert_ne!(result_key("shoe_3.mp4"), chain_key("Shoe.png", 2));
    }

    #[test]
    fn file_name_takes_last_segment() {
        assert_eq!(file_name("/a/b/c.png"), "c.png");
        assert_eq!(file_name(r"C:\x\y.png"), "y.png");
        assert_eq!(file_name("plain"), "plain");
    }
}
