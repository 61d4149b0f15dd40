//! Contact-field heuristics
//!
//! One FID column mixes a person's name, role and phone number in free text.
//! Two ordered patterns disambiguate which side of the string carries the
//! phone number:
//! - `Name (Role) -phone` — identity first, parenthesized role
//! - `phone (Name-Role)` / `phone (Name, Role)` / `phone (Name)` — phone
//!   first, identity inside the parenthetical
//!
//! Matching is purely syntactic: no phone-format or role-vocabulary checks.
//! A parenthetical with no alphabetic character at all (a bare extension
//! number) rejects the whole field. A parenthetical like `ext. 10` does
//! contain letters and therefore parses as a "name"; that known false
//! positive is kept as-is so output stays comparable across ingesters.

use regex::Regex;

/// Person details recovered from one contact field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInfo {
    pub name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
}

/// Compiled contact-field patterns. Build once, apply per row.
#[derive(Debug)]
pub struct ContactPatterns {
    name_first: Regex,
    phone_first: Regex,
}

impl ContactPatterns {
    pub fn new() -> Self {
        ContactPatterns {
            // "Name (Role) -phone"; the name segment never contains parentheses.
            name_first: Regex::new(r"^([A-Za-z][^()]*?)\s*\(([^)]+)\)\s*-?\s*(.*)").unwrap(),
            // "phone (Inside)"; the phone segment starts with `+` or a digit.
            phone_first: Regex::new(r"^([+\d][^()]*?)\s*\(([^)]+)\)").unwrap(),
        }
    }
}

impl Default for ContactPatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract (name, role, phone) from a raw contact field, or `None` when
/// neither pattern applies. The first matching pattern wins; there is no
/// backtracking across patterns.
pub fn parse_contact(patterns: &ContactPatterns, raw: &str) -> Option<ContactInfo> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(caps) = patterns.name_first.captures(value) {
        return Some(ContactInfo {
            name: caps[1].trim().to_string(),
            role: non_empty(&caps[2]),
            phone: non_empty(&caps[3]),
        });
    }

    if let Some(caps) = patterns.phone_first.captures(value) {
        let inside = caps[2].trim();
        if inside.chars().any(|c| c.is_alphabetic()) {
            let (name, role) = split_name_role(inside);
            return Some(ContactInfo {
                name,
                role,
                phone: non_empty(&caps[1]),
            });
        }
    }

    None
}

/// Split text like `Oleg Leonov-CEO-designate` into name and role: the first
/// hyphen wins, else the first comma, else the whole text is the name.
fn split_name_role(text: &str) -> (String, Option<String>) {
    let (name, role) = if let Some((name, role)) = text.split_once('-') {
        (name, Some(role))
    } else if let Some((name, role)) = text.split_once(',') {
        (name, Some(role))
    } else {
        (text, None)
    };
    (name.trim().to_string(), role.and_then(non_empty))
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
