//! Textual cleaning of registry lines and attribute scraping.
//!
//! None of this understands XML. A line is reduced to a compact,
//! comma-separated run of `attr="value"` pairs and attributes are then found
//! again with plain substring searches.

/// Attributes that carry no information for the extension lists.
pub const STRIPPED_ATTRIBUTES: &[&str] = &[
    "author",
    "contact",
    "number",
    "specialuse",
    "ratified",
    "comment",
];

const WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0c', '\x0b'];

/// Runs the full cleaning pipeline on one candidate line.
pub fn clean_line(line: &str) -> String {
    let mut out: String = line
        .trim_matches(WHITESPACE)
        .chars()
        .filter(|&c| c != '<' && c != '>' && c != ' ')
        .collect();

    remove_all(&mut out, "extension");
    for attribute in STRIPPED_ATTRIBUTES {
        remove_attribute(&mut out, attribute);
    }
    separate_attributes(&mut out);

    out.chars()
        .filter(|&c| c != '(' && c != ')')
        .map(|c| if c == '+' { ',' } else { c })
        .collect()
}

/// Removes every occurrence of `sub`, scanning left to right.
pub fn remove_all(s: &mut String, sub: &str) {
    if sub.is_empty() {
        return;
    }
    let mut pos = 0;
    while let Some(found) = s[pos..].find(sub) {
        let start = pos + found;
        s.replace_range(start..start + sub.len(), "");
        pos = start;
    }
}

/// Deletes `name="value"` for every occurrence of `name`. An unterminated
/// value is deleted up to the end of the line.
pub fn remove_attribute(s: &mut String, name: &str) {
    let key = format!("{}=\"", name);
    let mut pos = 0;
    while let Some(found) = s[pos..].find(&key) {
        let start = pos + found;
        let value_start = start + key.len();
        match s[value_start..].find('"') {
            Some(end) => {
                s.replace_range(start..value_start + end + 1, "");
                pos = start;
            }
            None => {
                s.truncate(start);
                return;
            }
        }
    }
}

/// Inserts `, ` after every closing quote that is not the last character.
pub fn separate_attributes(s: &mut String) {
    let mut out = String::with_capacity(s.len() + s.len() / 4);
    let mut opening = false;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '"' {
            opening = !opening;
            if !opening && chars.peek().is_some() {
                out.push_str(", ");
            }
        }
    }
    *s = out;
}

/// Value of the first `key="…"` in `line`, or an empty string.
pub fn extract_attribute<'a>(line: &'a str, key: &str) -> &'a str {
    let pattern = format!("{}=\"", key);
    let start = match line.find(&pattern) {
        Some(pos) => pos + pattern.len(),
        None => return "",
    };
    match line[start..].find('"') {
        Some(len) => &line[start..start + len],
        None => "",
    }
}

/// Comma separated tokens of the first `depends="…"`, without empty tokens.
pub fn parse_depends(line: &str) -> Vec<String> {
    const KEY: &str = "depends=\"";
    let start = match line.find(KEY) {
        Some(pos) => pos + KEY.len(),
        None => return Vec::new(),
    };
    let content = match line[start..].find('"') {
        Some(len) => &line[start..start + len],
        None => return Vec::new(),
    };
    content
        .split(',')
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}
