//! Fuzzy file locator: pure subsequence matching and scoring over
//! workspace-relative paths.

/// Maximum number of ranked results handed to the quick-open list.
pub const MAX_RESULTS: usize = 50;

/// Directory names the workspace walk never descends into.
pub const SKIP_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "dist",
    "build",
    ".git",
    "__pycache__",
    "vendor",
];

/// Whether the workspace walk should skip an entry with this name.
/// Dot-prefixed entries are skipped wholesale.
pub fn should_skip(name: &str) -> bool {
    name.starts_with('.') || SKIP_DIRS.contains(&name)
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Case-insensitive subsequence match: every query character must appear in
/// the candidate, in order. The empty query matches everything.
pub fn fuzzy_match(candidate: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let mut pattern = query.chars().map(fold);
    let mut needle = match pattern.next() {
        Some(c) => c,
        None => return true,
    };

    for c in candidate.chars().map(fold) {
        if c == needle {
            match pattern.next() {
                Some(next) => needle = next,
                None => return true,
            }
        }
    }

    false
}

/// Score a candidate against a query. Each matched character is worth one
/// point plus a bonus that grows across consecutive matches; a match at the
/// very start of the candidate adds 3, a match right after a path or dot
/// separator adds 2. Longer candidates pay 0.01 per character so shorter
/// paths win ties.
pub fn fuzzy_score(candidate: &str, query: &str) -> f32 {
    if query.is_empty() {
        return 0.0;
    }

    let mut score = 0.0f32;
    let mut consecutive = 0u32;
    let mut pattern = query.chars().map(fold).peekable();
    let mut prev: Option<char> = None;
    let mut len = 0usize;

    for (i, raw) in candidate.chars().enumerate() {
        len += 1;
        let c = fold(raw);
        match pattern.peek() {
            Some(&needle) if c == needle => {
                score += 1.0 + consecutive as f32;
                consecutive += 1;
                pattern.next();

                if i == 0 {
                    score += 3.0;
                }
                if matches!(prev, Some('/') | Some('\\') | Some('.')) {
                    score += 2.0;
                }
            }
            Some(_) => consecutive = 0,
            None => {}
        }
        prev = Some(c);
    }

    score - len as f32 * 0.01
}

/// Filter and rank candidates, best first, truncated to [`MAX_RESULTS`].
/// An empty query returns the first [`MAX_RESULTS`] candidates unscored.
pub fn rank<'a>(candidates: &'a [String], query: &str) -> Vec<&'a str> {
    if query.is_empty() {
        return candidates
            .iter()
            .take(MAX_RESULTS)
            .map(String::as_str)
            .collect();
    }

    let mut scored: Vec<(&str, f32)> = candidates
        .iter()
        .filter(|c| fuzzy_match(c, query))
        .map(|c| (c.as_str(), fuzzy_score(c, query)))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(MAX_RESULTS);
    scored.into_iter().map(|(c, _)| c).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/locator.rs"]
mod tests;
