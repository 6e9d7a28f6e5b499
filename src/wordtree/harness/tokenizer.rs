use crate::wordtree::error::Result;
use std::path::Path;

/// Characters that separate words.
pub const DELIMITERS: &[char] = &[
    ' ', '\t', '\n', '\r', '.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '\'', '"',
];

/// Splits `text` into lowercase words. Only ASCII letters are folded, anything
/// else in a word is kept as is.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(DELIMITERS)
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

pub fn tokenize_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);

    let tokens = tokenize(&text);
    tracing::debug!(path = %path.display(), bytes = bytes.len(), tokens = tokens.len(), "tokenized input");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_splits_on_whitespace_and_punctuation() {
        let tokens = tokenize("Era uma vez, (num reino) \"distante\": o Rei!\r\nFim.");

        assert_eq!(
            tokens,
            vec!["era", "uma", "vez", "num", "reino", "distante", "o", "rei", "fim"]
        );
    }

    #[test]
    fn test_keeps_non_ascii_and_inner_hyphens() {
        let tokens = tokenize("Ação guarda-chuva ÁGUA");

        assert_eq!(tokens, vec!["ação", "guarda-chuva", "Água"]);
    }

    #[test]
    fn test_empty_and_delimiter_only_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" .,;:!? \t\n()[]{}'\"").is_empty());
    }

    #[test]
    fn test_tokenize_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "The quick brown fox.\nThe lazy dog!").unwrap();

        let tokens = tokenize_file(file.path()).unwrap();

        assert_eq!(tokens, vec!["the", "quick", "brown", "fox", "the", "lazy", "dog"]);
    }

    #[test]
    fn test_tokenize_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        assert!(tokenize_file(dir.path().join("missing.txt")).is_err());
    }
}
