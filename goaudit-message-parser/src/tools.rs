/// Cut the token that follows `pattern` out of `haystack`, up to the next
/// space. The haystack is searched with one leading space added, so patterns
/// anchored on a space (` key=`) can match at the very start of the input.
/// Returns the empty string when the pattern is absent or nothing follows it.
pub fn cutout(haystack: &str, pattern: &str) -> String {
    let padded = format!(" {haystack}");
    match padded.find(pattern) {
        Some(at) => padded[at + pattern.len()..]
            .split(' ')
            .next()
            .unwrap_or("")
            .to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutout_table() {
        let cases = [
            ("hi there. findwaldo in this", "find", "waldo"),
            ("hi there. find empty string in this", "find", ""),
            ("findwaldo in this", "find", "waldo"),
            ("hi there. findwaldo", "find", "waldo"),
            ("findwaldo", "find", "waldo"),
            ("hi there. do not find waldo in this", "findnothing", ""),
            ("hi there. this should give an empty string. find", "find", ""),
            ("hi there. findgeorge and not findwaldo here", "find", "george"),
        ];
        for (haystack, pattern, expected) in cases {
            assert_eq!(
                cutout(haystack, pattern),
                expected,
                "for {pattern:?} in {haystack:?}"
            );
        }
    }

    #[test]
    fn cutout_matches_space_anchored_pattern_at_start() {
        assert_eq!(cutout("syscall=test hi", " syscall="), "test");
    }
}
