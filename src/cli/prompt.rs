//! Interactive search result prompt

use std::io::{self, BufRead, Write};

/// Prompt shown while browsing search results
pub const SEARCH_PROMPT: &str = "vid search > ";

/// One line of user input at the search prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    /// Leave the prompt
    Quit,
    /// Print the hit list again
    List,
    /// Zero-based index of the chosen hit
    Select(usize),
    /// Anything else, kept for the error message
    Unrecognized(String),
}

/// Interpret one input line against a list of `hit_count` hits
pub fn parse_search_input(line: &str, hit_count: usize) -> SearchInput {
    let input = line.trim_end_matches(['\r', '\n']);
    if input.is_empty() || input.eq_ignore_ascii_case("q") {
        return SearchInput::Quit;
    }
    if input.eq_ignore_ascii_case("l") {
        return SearchInput::List;
    }

    match input.parse::<usize>() {
        Ok(n) if (1..=hit_count).contains(&n) && input.bytes().all(|b| b.is_ascii_digit()) => {
            SearchInput::Select(n - 1)
        }
        _ => SearchInput::Unrecognized(input.to_string()),
    }
}

/// Print the prompt and read one line; end of input counts as quitting
pub fn read_search_input<R: BufRead>(reader: &mut R, hit_count: usize) -> io::Result<SearchInput> {
    print!("{}", SEARCH_PROMPT);
    io::stdout().flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(SearchInput::Quit);
    }
    Ok(parse_search_input(&line, hit_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_quit_inputs() {
        assert_eq!(parse_search_input("", 3), SearchInput::Quit);
        assert_eq!(parse_search_input("\n", 3), SearchInput::Quit);
        assert_eq!(parse_search_input("q", 3), SearchInput::Quit);
        assert_eq!(parse_search_input("Q\n", 3), SearchInput::Quit);
    }

    #[test]
    fn test_list_input() {
        assert_eq!(parse_search_input("l", 3), SearchInput::List);
        assert_eq!(parse_search_input("L\r\n", 3), SearchInput::List);
    }

    #[test]
    fn test_selection_is_one_based() {
        assert_eq!(parse_search_input("1", 3), SearchInput::Select(0));
        assert_eq!(parse_search_input("3\n", 3), SearchInput::Select(2));
    }

    #[test]
    fn test_unrecognized_inputs() {
        for input in ["0", "4", "-1", "+2", "two", " 1", "1.5"] {
            assert_eq!(
                parse_search_input(input, 3),
                SearchInput::Unrecognized(input.to_string()),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_read_search_input() {
        let mut input = Cursor::new("2\nq\n");
        assert_eq!(read_search_input(&mut input, 5).unwrap(), SearchInput::Select(1));
        assert_eq!(read_search_input(&mut input, 5).unwrap(), SearchInput::Quit);
        assert_eq!(read_search_input(&mut input, 5).unwrap(), SearchInput::Quit);
    }
}
