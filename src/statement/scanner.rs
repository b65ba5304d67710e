//! Hand-written scanner splitting a template into text, markers and block delimiters.

use alloc::string::String;
use alloc::vec::Vec;

use crate::placeholder::Index;

/// Type codes accepted after a `:` marker.
const COLON_CODES: &[u8] = b"abdfiknqsuvzABCDIKLNQSUV";
/// Type codes accepted after a `?` marker.
const QUESTION_CODES: &[u8] = b"abdinsuzABCDILNSU";

/// One piece of a scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    /// Literal SQL, already unescaped.
    Text(&'a str),
    /// A placeholder marker.
    Marker(Marker),
    /// An optional-block open marker.
    Open(&'a str),
    /// An optional-block close marker.
    Close(&'a str),
}

/// A placeholder occurrence as written in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Marker {
    /// The explicit index, if the author wrote one.
    pub name: Option<Index>,
    /// The declared type, or `None` for a reference.
    pub code: Option<Code>,
}

impl Marker {
    /// Whether the marker declares a type, as opposed to referencing one.
    pub fn is_typed(&self) -> bool {
        self.code.is_some()
    }
}

/// A marker character and its optional type letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Code {
    sigil: u8,
    letter: Option<u8>,
}

impl Code {
    /// The code as written, e.g. `":i"`.
    pub fn as_string(self) -> String {
        let mut code = String::with_capacity(2);
        code.push(char::from(self.sigil));
        if let Some(letter) = self.letter {
            code.push(char::from(letter));
        }
        code
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Reads the type letter following a marker character, if it is one.
fn letter(sigil: u8, byte: Option<&u8>) -> Option<u8> {
    let codes = if sigil == b':' {
        COLON_CODES
    } else {
        QUESTION_CODES
    };
    byte.copied().filter(|b| codes.contains(b))
}

/// Scanner over one template.
pub(crate) struct Scanner<'a> {
    input: &'a str,
    open: &'a str,
    close: &'a str,
    pos: usize,
    /// End of the last marker or block delimiter; names never reach past it.
    boundary: usize,
    /// Start of the pending literal text.
    text_start: usize,
    pieces: Vec<Piece<'a>>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner using the given optional-block markers.
    pub fn new(input: &'a str, open: &'a str, close: &'a str) -> Self {
        Self {
            input,
            open,
            close,
            pos: 0,
            boundary: 0,
            text_start: 0,
            pieces: Vec::new(),
        }
    }

    /// Splits the whole input into pieces.
    pub fn scan(mut self) -> Vec<Piece<'a>> {
        let input = self.input;
        let bytes = input.as_bytes();
        while self.pos < bytes.len() {
            let rest = &input[self.pos..];
            if rest.starts_with(self.open) {
                self.emit(self.pos, self.pos + self.open.len(), Piece::Open(self.open));
            } else if rest.starts_with(self.close) {
                self.emit(self.pos, self.pos + self.close.len(), Piece::Close(self.close));
            } else {
                match bytes[self.pos] {
                    b'{' => self.scan_brace(),
                    sigil @ (b':' | b'?') => self.scan_sigil(sigil),
                    _ => self.advance_char(),
                }
            }
        }
        self.flush_text(input.len());
        self.pieces
    }

    fn advance_char(&mut self) {
        self.pos += self.input[self.pos..].chars().next().map_or(1, char::len_utf8);
    }

    /// Pushes the pending text ending at `end`, if any.
    fn flush_text(&mut self, end: usize) {
        let input = self.input;
        if end > self.text_start {
            self.pieces.push(Piece::Text(&input[self.text_start..end]));
        }
    }

    /// Emits a piece spanning `start..end` and moves past it.
    fn emit(&mut self, start: usize, end: usize, piece: Piece<'a>) {
        self.flush_text(start);
        self.pieces.push(piece);
        self.pos = end;
        self.boundary = end;
        self.text_start = end;
    }

    fn marker(&mut self, start: usize, end: usize, name: Option<Index>, code: Option<Code>) {
        self.emit(start, end, Piece::Marker(Marker { name, code }));
    }

    /// Start of the word run ending at `end`, bounded by the last piece.
    fn word_start(&self, end: usize) -> usize {
        let mut start = end;
        for (i, c) in self.input[self.boundary..end].char_indices().rev() {
            if !is_word(c) {
                break;
            }
            start = self.boundary + i;
        }
        start
    }

    /// End of the word run starting at `start`.
    fn word_end(&self, start: usize) -> usize {
        self.input[start..]
            .char_indices()
            .find(|&(_, c)| !is_word(c))
            .map_or(self.input.len(), |(i, _)| start + i)
    }

    /// `{name}`, `{name:t}` and `{:t}`; anything else is a literal brace.
    fn scan_brace(&mut self) {
        let start = self.pos;
        let name_start = start + 1;
        let name_end = self.word_end(name_start);
        let bytes = self.input.as_bytes();
        let name =
            (name_end > name_start).then(|| Index::parse(&self.input[name_start..name_end]));

        match bytes.get(name_end) {
            Some(b'}') if name.is_some() => {
                self.marker(start, name_end + 1, name, None);
                return;
            }
            Some(&sigil @ (b':' | b'?')) => {
                let letter = letter(sigil, bytes.get(name_end + 1));
                let code_end = name_end + 1 + usize::from(letter.is_some());
                if bytes.get(code_end) == Some(&b'}') {
                    self.marker(start, code_end + 1, name, Some(Code { sigil, letter }));
                    return;
                }
            }
            _ => {}
        }
        self.pos += 1;
    }

    fn scan_sigil(&mut self, sigil: u8) {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let next = bytes.get(start + 1);

        if next == Some(&sigil) {
            // A doubled marker stands for one literal character.
            self.flush_text(start + 1);
            self.pos = start + 2;
            self.text_start = self.pos;
            return;
        }
        let previous = start.checked_sub(1).map(|i| bytes[i]);
        if previous == Some(sigil) || previous == Some(b'}') || next == Some(&b'{') {
            self.pos += 1;
            return;
        }

        let word_start = self.word_start(start);
        if word_start < start {
            let letter = letter(sigil, next);
            let end = start + 1 + usize::from(letter.is_some());
            let name = Index::parse(&self.input[word_start..start]);
            self.marker(word_start, end, Some(name), Some(Code { sigil, letter }));
            return;
        }

        let digits = bytes[start + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits > 0 {
            let digits_end = start + 1 + digits;
            let name = Some(Index::parse(&self.input[start + 1..digits_end]));
            match letter(sigil, bytes.get(digits_end)) {
                Some(letter) => self.marker(
                    start,
                    digits_end + 1,
                    name,
                    Some(Code {
                        sigil,
                        letter: Some(letter),
                    }),
                ),
                None => self.marker(start, digits_end, name, None),
            }
            return;
        }

        let letter = letter(sigil, next);
        let end = start + 1 + usize::from(letter.is_some());
        self.marker(start, end, None, Some(Code { sigil, letter }));
    }
}

/// Scans `input` with the given optional-block markers.
pub(crate) fn scan<'a>(input: &'a str, open: &'a str, close: &'a str) -> Vec<Piece<'a>> {
    Scanner::new(input, open, close).scan()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(input: &str) -> Vec<Piece<'_>> {
        scan(input, "[", "]")
    }

    fn typed(name: Option<Index>, sigil: u8, letter: Option<u8>) -> Piece<'static> {
        Piece::Marker(Marker {
            name,
            code: Some(Code { sigil, letter }),
        })
    }

    fn reference(name: Index) -> Piece<'static> {
        Piece::Marker(Marker {
            name: Some(name),
            code: None,
        })
    }

    #[test]
    fn test_anonymous_markers() {
        assert_eq!(
            pieces("a = :i AND b = ?"),
            [
                Piece::Text("a = "),
                typed(None, b':', Some(b'i')),
                Piece::Text(" AND b = "),
                typed(None, b'?', None),
            ]
        );
    }

    #[test]
    fn test_named_markers() {
        assert_eq!(
            pieces("id = id:i, x = 3?s"),
            [
                Piece::Text("id = "),
                typed(Some(Index::Name("id".into())), b':', Some(b'i')),
                Piece::Text(", x = "),
                typed(Some(Index::Ordinal(3)), b'?', Some(b's')),
            ]
        );
    }

    #[test]
    fn test_positional_shorthand() {
        assert_eq!(
            pieces(":0i :0"),
            [
                typed(Some(Index::Ordinal(0)), b':', Some(b'i')),
                Piece::Text(" "),
                reference(Index::Ordinal(0)),
            ]
        );
    }

    #[test]
    fn test_brace_forms() {
        assert_eq!(
            pieces("{id:s}{:i}{id}{ no }"),
            [
                typed(Some(Index::Name("id".into())), b':', Some(b's')),
                typed(None, b':', Some(b'i')),
                reference(Index::Name("id".into())),
                Piece::Text("{ no }"),
            ]
        );
    }

    #[test]
    fn test_escapes_and_literal_markers() {
        assert_eq!(pieces("a::int"), [Piece::Text("a:"), Piece::Text("int")]);
        assert_eq!(pieces("x ?? y"), [Piece::Text("x ?"), Piece::Text(" y")]);
        assert_eq!(pieces(":{"), [Piece::Text(":{")]);
    }

    #[test]
    fn test_blocks() {
        assert_eq!(
            pieces("a [AND b = :i]"),
            [
                Piece::Text("a "),
                Piece::Open("["),
                Piece::Text("AND b = "),
                typed(None, b':', Some(b'i')),
                Piece::Close("]"),
            ]
        );
    }

    #[test]
    fn test_names_stop_at_previous_piece() {
        assert_eq!(
            pieces(":iabc:s"),
            [
                typed(None, b':', Some(b'i')),
                typed(Some(Index::Name("abc".into())), b':', Some(b's')),
            ]
        );
    }

    #[test]
    fn test_unicode_text_is_kept() {
        assert_eq!(
            pieces("имя = :s"),
            [Piece::Text("имя = "), typed(None, b':', Some(b's'))]
        );
    }

    #[test]
    fn test_references_are_untyped() {
        let scanned = pieces("id:i {id} :0 ?");
        let typed: Vec<bool> = scanned
            .iter()
            .filter_map(|piece| match piece {
                Piece::Marker(marker) => Some(marker.is_typed()),
                _ => None,
            })
            .collect();
        assert_eq!(typed, [true, false, false, true]);
    }

    #[test]
    fn test_code_as_string() {
        assert_eq!(
            Code {
                sigil: b'?',
                letter: Some(b'S')
            }
            .as_string(),
            "?S"
        );
        assert_eq!(
            Code {
                sigil: b':',
                letter: None
            }
            .as_string(),
            ":"
        );
    }
}
