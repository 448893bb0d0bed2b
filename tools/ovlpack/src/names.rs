use std::path::Path;

/// One game name per line, trimmed, blank lines dropped. Order and duplicates are kept.
pub fn parse_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_names(path: &Path) -> std::io::Result<Vec<String>> {
    Ok(parse_names(&std::fs::read_to_string(path)?))
}
