//! "Did you mean" suggestions for unknown options and commands.

use std::collections::BTreeSet;

/// Candidates further than this are never suggested.
const MAX_DISTANCE: usize = 3;
const MIN_SIMILARITY: f64 = 0.4;

/// Returns a suffix like `\n(Did you mean --verbose?)`, or an empty string.
///
/// Options are compared without their leading `--`. Candidates of one
/// character are skipped. Among sufficiently similar candidates only those
/// at the best edit distance are kept.
pub(crate) fn suggest_similar(word: &str, candidates: &[String]) -> String {
    if candidates.is_empty() {
        return String::new();
    }

    let searching_options = word.starts_with("--");
    let strip = |s: &str| -> String {
        if searching_options {
            s.strip_prefix("--").unwrap_or(s).to_string()
        } else {
            s.to_string()
        }
    };
    let word = strip(word);
    let unique: BTreeSet<String> = candidates.iter().map(|c| strip(c)).collect();

    let mut similar: Vec<String> = Vec::new();
    let mut best_distance = MAX_DISTANCE;
    for candidate in unique {
        if candidate.chars().count() <= 1 {
            continue;
        }
        let distance = strsim::osa_distance(&word, &candidate);
        let length = word.chars().count().max(candidate.chars().count());
        let similarity = (length as f64 - distance as f64) / length as f64;
        if similarity > MIN_SIMILARITY {
            if distance < best_distance {
                best_distance = distance;
                similar = vec![candidate];
            } else if distance == best_distance {
                similar.push(candidate);
            }
        }
    }

    similar.sort();
    if searching_options {
        similar = similar.into_iter().map(|c| format!("--{c}")).collect();
    }

    match similar.len() {
        0 => String::new(),
        1 => format!("\n(Did you mean {}?)", similar[0]),
        _ => format!("\n(Did you mean one of {}?)", similar.join(", ")),
    }
}
