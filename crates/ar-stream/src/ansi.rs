// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ANSI escape stripping used before test-result/error pattern matching:
//! color prefixes are stripped before matching.

use regex::Regex;
use std::sync::OnceLock;

fn ansi_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("\x1b\\[[0-9;]*[a-zA-Z]").expect("valid ansi regex"))
}

pub fn strip_ansi(s: &str) -> String {
    ansi_re().replace_all(s, "").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_codes() {
        let colored = "\x1b[32mPASS\x1b[0m src/x.spec.ts";
        assert_eq!(strip_ansi(colored), "PASS src/x.spec.ts");
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(strip_ansi("plain line"), "plain line");
    }

    proptest::proptest! {
        #[test]
        fn stripping_is_idempotent(s in ".*") {
            let once = strip_ansi(&s);
            let twice = strip_ansi(&once);
            proptest::prop_assert_eq!(once, twice);
        }
    }
}
