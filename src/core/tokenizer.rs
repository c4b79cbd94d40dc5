//! Markup Tokenizer - lenient pull tokenizer with source spans
//!
//! Extracts tokens from HTML-flavoured markup:
//! - Element start/end tags
//! - Text content
//! - Comments
//! - DOCTYPE and other `<!...>` / `<?...>` declarations
//!
//! Every token carries its exact byte span so the tree built on top of
//! it can report node locations in the original text. Nothing here ever
//! fails: malformed markup degrades into text, matching how browsers
//! tokenize the same input.

use super::attributes::{parse_attributes, Attribute};
use super::scanner::{is_name_start_char, Scanner};

/// Elements whose content is raw text up to the matching end tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Current tokenizer state
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseState {
    /// Between tags
    InsideText,
    /// Inside `<script>`/`<style>`, waiting for the named end tag
    RawText(String),
    /// End of input reached
    Done,
}

/// Type of markup token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<name ...>` or `<name .../>`
    StartTag,
    /// `</name>`
    EndTag,
    /// Text content
    Text,
    /// `<!-- ... -->`, or a bogus `<? ... >` declaration
    Comment,
    /// `<!DOCTYPE ...>` and other `<! ... >` declarations
    DocType,
    /// End of input
    Eof,
}

/// A markup token
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// For tags: the lowercased element name
    pub name: Option<String>,
    /// For start tags: parsed attributes
    pub attributes: Vec<Attribute>,
    /// For start tags: written as `<name/>`
    pub self_closing: bool,
}

impl Token {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    fn with_name(mut self, name: &[u8]) -> Self {
        self.name = Some(String::from_utf8_lossy(name).to_ascii_lowercase());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Markup tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    input: &'a [u8],
    scanner: Scanner<'a>,
    state: ParseState,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            input,
            scanner: Scanner::new(input),
            state: ParseState::InsideText,
        }
    }

    /// Get the next token, or None once `Eof` has been returned
    pub fn next_token(&mut self) -> Option<Token> {
        match &self.state {
            ParseState::Done => return None,
            ParseState::RawText(name) => {
                let name = name.clone();
                self.state = ParseState::InsideText;
                if let Some(token) = self.parse_raw_text(&name) {
                    return Some(token);
                }
            }
            ParseState::InsideText => {}
        }

        if self.scanner.is_eof() {
            self.state = ParseState::Done;
            let pos = self.scanner.position();
            return Some(Token::new(TokenKind::Eof, (pos, pos)));
        }

        if self.markup_starts_at(self.scanner.position()) {
            self.parse_markup()
        } else {
            Some(self.parse_text())
        }
    }

    /// Whether the '<' at `pos` opens markup rather than being literal text
    fn markup_starts_at(&self, pos: usize) -> bool {
        if self.input.get(pos) != Some(&b'<') {
            return false;
        }
        match self.input.get(pos + 1) {
            Some(b'!') | Some(b'?') => true,
            Some(b'/') => self.input.get(pos + 2).is_some_and(|&b| is_name_start_char(b)),
            Some(&b) => is_name_start_char(b),
            None => false,
        }
    }

    /// Text runs until the next '<' that opens markup
    fn parse_text(&mut self) -> Token {
        let start = self.scanner.position();
        let mut search = start + 1;
        let end = loop {
            match self.scanner.find_tag_start_from(search) {
                Some(lt) if self.markup_starts_at(lt) => break lt,
                Some(lt) => search = lt + 1,
                None => break self.input.len(),
            }
        };
        self.scanner.set_position(end);
        Token::new(TokenKind::Text, (start, end))
    }

    /// Content of a raw text element, up to (not including) its end tag
    fn parse_raw_text(&mut self, name: &str) -> Option<Token> {
        let start = self.scanner.position();
        let mut end = self.input.len();
        let mut search = start;
        while let Some(lt) = self.scanner.find_tag_start_from(search) {
            let after = lt + 2;
            let closes = self.input.get(lt + 1) == Some(&b'/')
                && self
                    .input
                    .get(after..after + name.len())
                    .is_some_and(|s| s.eq_ignore_ascii_case(name.as_bytes()));
            if closes {
                end = lt;
                break;
            }
            search = lt + 1;
        }
        self.scanner.set_position(end);
        (end > start).then(|| Token::new(TokenKind::Text, (start, end)))
    }

    /// Parse markup starting with '<'
    fn parse_markup(&mut self) -> Option<Token> {
        let start = self.scanner.position();
        match self.scanner.peek_at(1) {
            Some(b'!') => Some(self.parse_bang_markup(start)),
            Some(b'?') => Some(self.parse_declaration(start, TokenKind::Comment)),
            Some(b'/') => Some(self.parse_end_tag(start)),
            _ => Some(self.parse_start_tag(start)),
        }
    }

    /// `<!-- comment -->` or `<!DOCTYPE ...>`
    fn parse_bang_markup(&mut self, start: usize) -> Token {
        self.scanner.advance(2);
        if self.scanner.starts_with_ignore_case(b"--") {
            self.scanner.advance(2);
            let end = match self.scanner.find(b"-->") {
                Some(pos) => pos + 3,
                None => self.input.len(),
            };
            self.scanner.set_position(end);
            return Token::new(TokenKind::Comment, (start, end));
        }
        self.parse_declaration(start, TokenKind::DocType)
    }

    /// Anything of the form `<! ... >` or `<? ... >`, closed by the first '>'
    fn parse_declaration(&mut self, start: usize, kind: TokenKind) -> Token {
        let end = match self.scanner.find_tag_end() {
            Some(pos) => pos + 1,
            None => self.input.len(),
        };
        self.scanner.set_position(end);
        Token::new(kind, (start, end))
    }

    fn parse_end_tag(&mut self, start: usize) -> Token {
        self.scanner.advance(2);
        let name = self.scanner.read_name().unwrap_or_default();
        let end = match self.scanner.find_tag_end() {
            Some(pos) => pos + 1,
            None => self.input.len(),
        };
        self.scanner.set_position(end);
        Token::new(TokenKind::EndTag, (start, end)).with_name(name)
    }

    fn parse_start_tag(&mut self, start: usize) -> Token {
        self.scanner.advance(1);
        let name = self.scanner.read_name().unwrap_or_default();
        let name_end = self.scanner.position();

        let Some(gt) = self.scanner.find_tag_end_quoted() else {
            // Unterminated tag: the rest of the input is text
            self.scanner.set_position(self.input.len());
            return Token::new(TokenKind::Text, (start, self.input.len()));
        };

        let self_closing = gt > name_end && self.input[gt - 1] == b'/';
        let mut token = Token::new(TokenKind::StartTag, (start, gt + 1)).with_name(name);
        token.attributes = parse_attributes(&self.input[name_end..gt]);
        token.self_closing = self_closing;
        self.scanner.set_position(gt + 1);

        if let Some(tag) = token.name() {
            if !self_closing && RAW_TEXT_ELEMENTS.contains(&tag) {
                self.state = ParseState::RawText(tag.to_string());
            }
        }
        token
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token()?;
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(TokenKind, String)> {
        Tokenizer::new(input.as_bytes())
            .map(|t| (t.kind, input[t.span.0..t.span.1].to_string()))
            .collect()
    }

    #[test]
    fn test_simple_element() {
        let tokens = kinds("<h1>Static Semantics: Foo</h1>");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::StartTag, "<h1>".to_string()),
                (TokenKind::Text, "Static Semantics: Foo".to_string()),
                (TokenKind::EndTag, "</h1>".to_string()),
            ]
        );
    }

    #[test]
    fn test_names_lowercased_and_attributes() {
        let mut tok = Tokenizer::new(b"<EMU-Grammar type=\"example\">");
        let token = tok.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::StartTag);
        assert_eq!(token.name(), Some("emu-grammar"));
        assert_eq!(token.attributes, vec![Attribute::new("type", "example")]);
        assert_eq!(tok.next_token().unwrap().kind, TokenKind::Eof);
        assert!(tok.next_token().is_none());
    }

    #[test]
    fn test_less_than_in_text() {
        let tokens = kinds("<p>a < b and a <= c</p>");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], (TokenKind::Text, "a < b and a <= c".to_string()));
    }

    #[test]
    fn test_comment_and_doctype() {
        let tokens = kinds("<!DOCTYPE html>\n<!-- insert sdos here -->\n");
        assert_eq!(tokens[0], (TokenKind::DocType, "<!DOCTYPE html>".to_string()));
        assert_eq!(tokens[1].0, TokenKind::Text);
        assert_eq!(
            tokens[2],
            (TokenKind::Comment, "<!-- insert sdos here -->".to_string())
        );
    }

    #[test]
    fn test_self_closing() {
        let mut tok = Tokenizer::new(b"<br/>");
        let token = tok.next_token().unwrap();
        assert!(token.self_closing);
        assert_eq!(token.name(), Some("br"));
    }

    #[test]
    fn test_script_is_raw_text() {
        let tokens = kinds("<script>if (a <b) {}</script>");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::StartTag, "<script>".to_string()),
                (TokenKind::Text, "if (a <b) {}".to_string()),
                (TokenKind::EndTag, "</script>".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_tag_is_text() {
        let tokens = kinds("text <emu-alg");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1], (TokenKind::Text, "<emu-alg".to_string()));
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let tokens = kinds("<a title=\"x > y\">z</a>");
        assert_eq!(tokens[0], (TokenKind::StartTag, "<a title=\"x > y\">".to_string()));
    }
}
