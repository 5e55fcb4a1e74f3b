//! Hand-rolled, position-tracked tokenizer.
//!
//! This is deliberately a character-cursor state machine (`read_ch`/
//! `peek_ch`, with a dot-counting number reader) rather than a
//! macro-generated regex/longest-match table: the whole point of this
//! component is the hand-rolled cursor.

use crate::token::{lookup_ident, Literal, Token, TokenKind};

pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    read_pos: usize,
    line: usize,
    current_ch: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut lexer = Self {
            input: input.chars().collect(),
            pos: 0,
            read_pos: 0,
            line: 1,
            current_ch: None,
        };
        lexer.read_ch();
        lexer
    }

    fn read_ch(&mut self) {
        self.current_ch = self.input.get(self.read_pos).copied();
        self.pos = self.read_pos;
        self.read_pos += 1;
    }

    fn peek_ch(&self) -> Option<char> {
        self.input.get(self.read_pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current_ch, Some(' ') | Some('\t') | Some('\n') | Some('\r')) {
            if self.current_ch == Some('\n') {
                self.line += 1;
            }
            self.read_ch();
        }
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_digit(ch: char) -> bool {
        ch.is_ascii_digit()
    }

    fn read_identifier(&mut self) -> String {
        let start = self.pos;
        while matches!(self.current_ch, Some(ch) if Self::is_letter(ch) || Self::is_digit(ch)) {
            self.read_ch();
        }
        self.input[start..self.pos].iter().collect()
    }

    /// Reads a maximal run of digits and dots, tracking dot count. Returns
    /// the raw lexeme and whether a second (or later) dot was encountered.
    fn read_number(&mut self) -> (String, bool) {
        let start = self.pos;
        let mut dot_count = 0;
        let mut too_many_dots = false;
        loop {
            match self.current_ch {
                Some(ch) if Self::is_digit(ch) => self.read_ch(),
                Some('.') => {
                    dot_count += 1;
                    if dot_count > 1 {
                        too_many_dots = true;
                        log::debug!("Too many dots in number");
                    }
                    self.read_ch();
                }
                _ => break,
            }
        }
        (self.input[start..self.pos].iter().collect(), too_many_dots)
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let line = self.line;
        let col = self.pos + 1;

        let tok = match self.current_ch {
            Some('+') => {
                if self.peek_ch() == Some('+') {
                    self.read_ch();
                    Token::new(TokenKind::PlusPlus, Literal::Str("++".into()), line, col)
                } else {
                    Token::new(TokenKind::Sum, Literal::Str("+".into()), line, col)
                }
            }
            Some('-') => {
                if self.peek_ch() == Some('-') {
                    self.read_ch();
                    Token::new(TokenKind::MinusMinus, Literal::Str("--".into()), line, col)
                } else {
                    Token::new(TokenKind::Sub, Literal::Str("-".into()), line, col)
                }
            }
            Some('*') => Token::new(TokenKind::Mul, Literal::Str("*".into()), line, col),
            Some('/') => Token::new(TokenKind::Div, Literal::Str("/".into()), line, col),
            Some(',') => Token::new(TokenKind::Comma, Literal::Str(",".into()), line, col),
            Some('(') => Token::new(TokenKind::LParen, Literal::Str("(".into()), line, col),
            Some(')') => Token::new(TokenKind::RParen, Literal::Str(")".into()), line, col),
            Some('{') => Token::new(TokenKind::LBrace, Literal::Str("{".into()), line, col),
            Some('}') => Token::new(TokenKind::RBrace, Literal::Str("}".into()), line, col),
            Some(':') => Token::new(TokenKind::Colon, Literal::Str(":".into()), line, col),
            Some(';') => Token::new(TokenKind::Semicolon, Literal::Str(";".into()), line, col),
            Some('@') => Token::new(TokenKind::At, Literal::Str("@".into()), line, col),
            Some('<') => {
                if self.peek_ch() == Some('=') {
                    self.read_ch();
                    Token::new(TokenKind::LtEq, Literal::Str("<=".into()), line, col)
                } else {
                    Token::new(TokenKind::Lt, Literal::Str("<".into()), line, col)
                }
            }
            Some('>') => {
                if self.peek_ch() == Some('=') {
                    self.read_ch();
                    Token::new(TokenKind::GtEq, Literal::Str(">=".into()), line, col)
                } else {
                    Token::new(TokenKind::Gt, Literal::Str(">".into()), line, col)
                }
            }
            Some('=') => {
                if self.peek_ch() == Some('=') {
                    self.read_ch();
                    Token::new(TokenKind::EqEq, Literal::Str("==".into()), line, col)
                } else {
                    Token::new(TokenKind::Eq, Literal::Str("=".into()), line, col)
                }
            }
            Some('!') => {
                if self.peek_ch() == Some('=') {
                    self.read_ch();
                    Token::new(TokenKind::NotEq, Literal::Str("!=".into()), line, col)
                } else {
                    Token::new(TokenKind::Illegal, Literal::Str("!".into()), line, col)
                }
            }
            None => Token::new(TokenKind::Eof, Literal::None, line, col),
            Some(ch) if Self::is_letter(ch) => {
                let ident = self.read_identifier();
                let kind = lookup_ident(&ident);
                let tok = Token::new(kind, Literal::Str(ident), line, col);
                log::trace!("lexed {:?} at {}:{}", tok.kind, tok.line, tok.col);
                return tok;
            }
            Some(ch) if Self::is_digit(ch) => {
                let (lexeme, too_many_dots) = self.read_number();
                let tok = if too_many_dots {
                    Token::new(TokenKind::Illegal, Literal::Str(lexeme), line, col)
                } else if lexeme.contains('.') {
                    match lexeme.parse::<f64>() {
                        Ok(v) => Token::new(TokenKind::Float, Literal::Float(v), line, col),
                        Err(_) => Token::new(TokenKind::Illegal, Literal::Str(lexeme), line, col),
                    }
                } else {
                    match lexeme.parse::<i64>() {
                        Ok(v) => Token::new(TokenKind::Int, Literal::Int(v), line, col),
                        Err(_) => Token::new(TokenKind::Illegal, Literal::Str(lexeme), line, col),
                    }
                };
                log::trace!("lexed {:?} at {}:{}", tok.kind, tok.line, tok.col);
                return tok;
            }
            Some(ch) => Token::new(TokenKind::Illegal, Literal::Str(ch.to_string()), line, col),
        };

        self.read_ch();
        log::trace!("lexed {:?} at {}:{}", tok.kind, tok.line, tok.col);
        tok
    }

    pub fn is_eof(&self) -> bool {
        self.current_ch.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn lexes_simple_var_statement() {
        let got = kinds("var x : int = 5;");
        assert_eq!(
            got,
            vec![
                TokenKind::Var,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Type,
                TokenKind::Eq,
                TokenKind::Int,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn disambiguates_two_char_operators() {
        let got = kinds("== != <= >= ++ --");
        assert_eq!(
            got,
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn bang_not_followed_by_eq_is_illegal() {
        let got = kinds("!x");
        assert_eq!(got, vec![TokenKind::Illegal, TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn second_dot_in_number_is_illegal() {
        let mut lexer = Lexer::new("1.2.3");
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Illegal);
    }

    #[test]
    fn leading_and_trailing_dot_are_accepted() {
        let mut lexer = Lexer::new(".5");
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Float);

        let mut lexer = Lexer::new("5.");
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Float);
    }

    #[test]
    fn tracks_line_and_column() {
        let mut lexer = Lexer::new("var\nx");
        let var_tok = lexer.next_token();
        assert_eq!(var_tok.line, 1);
        let ident_tok = lexer.next_token();
        assert_eq!(ident_tok.line, 2);
    }

    #[test]
    fn keywords_and_type_words_and_identifiers() {
        let got = kinds("func ret if while for else true false bool foo");
        assert_eq!(
            got,
            vec![
                TokenKind::Fn,
                TokenKind::Return,
                TokenKind::If,
                TokenKind::While,
                TokenKind::For,
                TokenKind::Else,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Type,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }
}
