use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn file_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("file name pattern is valid")
    })
}

/// True when `name` is a single, plain path component that can be joined onto
/// an output directory without escaping it.
pub fn is_safe_file_name(name: &str) -> bool {
    name.len() <= 255 && file_name_pattern().is_match(name)
}

/// Stem shared by every artifact of one segment, whatever its extension
pub fn segment_stem(part_id: &str, segment_id: &str) -> String {
    format!("{}_{}", part_id, segment_id)
}

/// Name the normalization pass gives its copy of `file_name`.
pub fn normalized_file_name(file_name: &str) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{}_normalized.{}", stem, ext.to_string_lossy()),
        None => format!("{}_normalized", stem),
    }
}
