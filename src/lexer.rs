/// A whitespace-delimited run of characters with its position in the source.
///
/// `-` counts as whitespace, so `t-y-u` yields three tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub line: usize,
    pub column: usize,
}

/// Unicode whitespace, the ASCII information separators U+001C..=U+001F, and `-`.
fn is_separator(c: char) -> bool {
    c == '-' || c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Lexer for splitting a virtual piano sheet into tokens
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let (offset, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some((offset, c))
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if !is_separator(c) {
                break;
            }
            self.advance();
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();

        loop {
            self.skip_separators();
            let line = self.line;
            let column = self.column;

            let Some((start, _)) = self.advance() else {
                break;
            };
            let mut end = self.input.len();
            while let Some(&(offset, c)) = self.chars.peek() {
                if is_separator(c) {
                    end = offset;
                    break;
                }
                self.advance();
            }

            tokens.push(Token {
                text: &self.input[start..end],
                line,
                column,
            });
        }

        tokens
    }
}

/// Split `text` into tokens.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    Lexer::new(text).tokenize()
}
