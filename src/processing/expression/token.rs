use crate::error::ExpressionError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
    Eof,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::Ident(name) => format!("'{name}'"),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Caret => "'^'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::Comma => "','".into(),
            Token::Eof => "end of input".into(),
        }
    }
}

/// A token plus its character offset in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

/// Split `source` into tokens, ending with `Token::Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, ExpressionError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            c if c.is_ascii_digit() || c == '.' => {
                let (value, end) = read_number(source, &chars, pos)?;
                pos = end;
                tokens.push(Spanned {
                    token: Token::Number(value),
                    pos: start,
                });
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                    pos += 1;
                }
                tokens.push(Spanned {
                    token: Token::Ident(chars[start..pos].iter().collect()),
                    pos: start,
                });
                continue;
            }
            other => {
                return Err(ExpressionError::Syntax {
                    expr: source.to_string(),
                    position: pos,
                    message: format!("unexpected character '{other}'"),
                })
            }
        };
        tokens.push(Spanned { token, pos: start });
        pos += 1;
    }

    tokens.push(Spanned {
        token: Token::Eof,
        pos: chars.len(),
    });
    Ok(tokens)
}

fn read_number(source: &str, chars: &[char], start: usize) -> Result<(f64, usize), ExpressionError> {
    let mut pos = start;
    while pos < chars.len() && chars[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos < chars.len() && chars[pos] == '.' {
        pos += 1;
        while pos < chars.len() && chars[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    // Exponent only when digits follow, so `2e` stays a number and an ident.
    if pos < chars.len() && (chars[pos] == 'e' || chars[pos] == 'E') {
        let mut j = pos + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            pos = j;
        }
    }

    let text: String = chars[start..pos].iter().collect();
    text.parse::<f64>()
        .map(|v| (v, pos))
        .map_err(|_| ExpressionError::Syntax {
            expr: source.to_string(),
            position: start,
            message: format!("invalid number '{text}'"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        tokenize(src).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn operators_and_numbers() {
        assert_eq!(
            kinds("2*x^2 - 1.5e-1"),
            vec![
                Token::Number(2.0),
                Token::Star,
                Token::Ident("x".into()),
                Token::Caret,
                Token::Number(2.0),
                Token::Minus,
                Token::Number(0.15),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn dangling_exponent_splits_into_ident() {
        assert_eq!(
            kinds("2e"),
            vec![Token::Number(2.0), Token::Ident("e".into()), Token::Eof]
        );
    }

    #[test]
    fn lone_dot_is_rejected() {
        assert!(matches!(
            tokenize("x + ."),
            Err(ExpressionError::Syntax { position: 4, .. })
        ));
    }

    #[test]
    fn unknown_character_reports_position() {
        let err = tokenize("x $ 2").unwrap_err();
        assert!(matches!(err, ExpressionError::Syntax { position: 2, .. }));
    }
}
