// Hiveway - A Mastodon client
// Copyright (C) 2025 Hiveway Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Locale-aware integer formatting for row counters

/// Thousands grouping for one locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    separator: char,
}

impl NumberFormat {
    /// Pick the grouping separator for a BCP 47 tag such as `de-DE` or
    /// `fr_CA`. Unknown languages group with a comma.
    pub fn for_locale(tag: &str) -> Self {
        let normalized = tag.replace('_', "-").to_ascii_lowercase();
        let mut parts = normalized.split('-');
        let language = parts.next().unwrap_or("");
        let region = parts.next().unwrap_or("");

        let separator = match (language, region) {
            ("de", "ch") | ("it", "ch") => '\u{2019}',
            ("fr", _) => '\u{202f}',
            ("de" | "es" | "it" | "nl" | "pt" | "id" | "tr" | "da" | "el" | "ro", _) => '.',
            ("ru" | "pl" | "cs" | "sk" | "sv" | "fi" | "nb" | "no" | "uk" | "hu" | "bg", _) => {
                '\u{a0}'
            }
            _ => ',',
        };

        Self { separator }
    }

    pub fn format(&self, value: u64) -> String {
        let digits = value.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);

        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.separator);
            }
            out.push(c);
        }

        out
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::for_locale("en-US")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers_are_not_grouped() {
        let format = NumberFormat::default();
        assert_eq!(format.format(0), "0");
        assert_eq!(format.format(999), "999");
    }

    #[test]
    fn english_groups_with_commas() {
        let format = NumberFormat::for_locale("en-US");
        assert_eq!(format.format(1_000), "1,000");
        assert_eq!(format.format(1_234_567), "1,234,567");
    }

    #[test]
    fn german_groups_with_dots() {
        assert_eq!(NumberFormat::for_locale("de_DE").format(1_234_567), "1.234.567");
    }

    #[test]
    fn swiss_and_french_use_their_own_separators() {
        assert_eq!(NumberFormat::for_locale("de-CH").format(12_345), "12\u{2019}345");
        assert_eq!(NumberFormat::for_locale("fr").format(12_345), "12\u{202f}345");
    }

    #[test]
    fn unknown_locale_falls_back_to_comma() {
        assert_eq!(NumberFormat::for_locale("").format(45_000), "45,000");
    }
}
