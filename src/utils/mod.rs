//! Project-specific utilities live here.

/// Title-case a text value for the record save path.
///
/// A new word starts at the beginning of the string and after whitespace,
/// a hyphen, or a period; the first alphabetic character of a word is
/// uppercased and the rest lowercased. Apostrophes do not start a new word,
/// so "don't" becomes "Don't" while "j.r.r. tolkien" becomes
/// "J.R.R. Tolkien" and "jean-paul" becomes "Jean-Paul".
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut new_word = true;

    for ch in input.chars() {
        if ch.is_alphabetic() {
            if new_word {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            new_word = false;
        } else {
            new_word = ch.is_whitespace() || ch == '-' || ch == '.';
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(title_case("the hobbit"), "The Hobbit");
        assert_eq!(title_case("to kill a mockingbird"), "To Kill A Mockingbird");
    }

    #[test]
    fn periods_and_hyphens_start_words() {
        assert_eq!(title_case("j.r.r. tolkien"), "J.R.R. Tolkien");
        assert_eq!(title_case("jean-paul sartre"), "Jean-Paul Sartre");
    }

    #[test]
    fn apostrophes_stay_inside_words() {
        assert_eq!(title_case("don't panic"), "Don't Panic");
        assert_eq!(title_case("o'brien"), "O'brien");
    }

    #[test]
    fn lowercases_shouting_input() {
        assert_eq!(title_case("DUNE MESSIAH"), "Dune Messiah");
    }

    #[test]
    fn leaves_digits_and_empty_input_alone() {
        assert_eq!(title_case("1984"), "1984");
        assert_eq!(title_case(""), "");
    }
}
