//! Swap Detection
//!
//! Classifies a batch of program log lines as DEX swap activity by looking for
//! any known swap-program id inside the log text. Pure, no I/O.

use std::collections::BTreeSet;

/// Program ids whose presence in a log batch marks it as a swap
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapProgramSet {
    ids: BTreeSet<String>,
}

impl SwapProgramSet {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = ids
            .into_iter()
            .map(Into::<String>::into)
            .filter(|id| !id.is_empty())
            .collect();
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SwapProgramSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Returns true iff some line contains some program id as a substring
pub fn is_swap<S: AsRef<str>>(program_ids: &SwapProgramSet, lines: &[S]) -> bool {
    matching_program(program_ids, lines).is_some()
}

/// First program id (in set order) found in the log lines
pub fn matching_program<'a, S: AsRef<str>>(
    program_ids: &'a SwapProgramSet,
    lines: &[S],
) -> Option<&'a str> {
    program_ids
        .iter()
        .find(|id| lines.iter().any(|line| line.as_ref().contains(id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAYDIUM: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";
    const ORCA: &str = "whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc";

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detects_program_invoke_line() {
        let set = SwapProgramSet::new([RAYDIUM]);
        let logs = lines(&[
            "Program ComputeBudget111111111111111111111111111111 invoke [1]",
            &format!("Program {} invoke [1]", RAYDIUM),
            "Program log: ray_log: A0BCD",
        ]);
        assert!(is_swap(&set, &logs));
        assert_eq!(matching_program(&set, &logs), Some(RAYDIUM));
    }

    #[test]
    fn test_no_known_program() {
        let set = SwapProgramSet::new([RAYDIUM, ORCA]);
        let logs = lines(&[
            "Program 11111111111111111111111111111111 invoke [1]",
            "Program 11111111111111111111111111111111 success",
        ]);
        assert!(!is_swap(&set, &logs));
        assert!(matching_program(&set, &logs).is_none());
    }

    #[test]
    fn test_substring_match_anywhere_in_line() {
        let set = SwapProgramSet::new(["abc"]);
        assert!(is_swap(&set, &lines(&["xxabcxx"])));
        assert!(!is_swap(&set, &lines(&["ab c"])));
    }

    #[test]
    fn test_empty_program_set_never_matches() {
        let set = SwapProgramSet::default();
        assert!(!is_swap(&set, &lines(&["Program anything invoke [1]"])));
    }

    #[test]
    fn test_empty_lines_never_match() {
        let set = SwapProgramSet::new([RAYDIUM]);
        let logs: Vec<String> = Vec::new();
        assert!(!is_swap(&set, &logs));
    }

    #[test]
    fn test_empty_ids_are_dropped() {
        // An empty id would otherwise match every line
        let set = SwapProgramSet::new(["", RAYDIUM]);
        assert_eq!(set.len(), 1);
        assert!(!is_swap(&set, &lines(&["unrelated"])));
    }

    #[test]
    fn test_matches_second_program() {
        let set: SwapProgramSet = [RAYDIUM, ORCA].into_iter().collect();
        let logs = lines(&[&format!("Program {} invoke [2]", ORCA)]);
        assert!(is_swap(&set, &logs));
        assert_eq!(matching_program(&set, &logs), Some(ORCA));
    }

    #[test]
    fn test_agrees_with_naive_definition() {
        let ids = ["aa", "bcd", "zz"];
        let set = SwapProgramSet::new(ids);
        let batches: Vec<Vec<String>> = vec![
            lines(&[]),
            lines(&["a", "b"]),
            lines(&["xaay"]),
            lines(&["bc", "cd", "qbcdq"]),
            lines(&["z", "z z"]),
        ];
        for batch in &batches {
            let naive = ids
                .iter()
                .any(|id| batch.iter().any(|line| line.contains(id)));
            assert_eq!(is_swap(&set, batch), naive, "batch {:?}", batch);
        }
    }
}
