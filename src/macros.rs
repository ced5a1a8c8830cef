/// Unwraps a `Result<Option<T>, E>` inside a function returning
/// `Option<Result<_, E>>`, bailing out with `Some(Err(..))` on error.
#[macro_export]
macro_rules! try_some {
    ($expr:expr) => {
        match $expr {
            Ok(Some(v)) => Some(v),
            Ok(None) => None,
            Err(e) => return Some(Err(From::from(e))),
        }
    };
}

/// Consumes the next token if it is of kind `$toktype`.
///
/// Evaluates to `Ok(Some(..))` if the token matched, `Ok(None)` if the next
/// token is of another kind (or the input ended) and `Err(..)` if the lexer
/// reported an error, which is consumed as well. The second form moves the
/// token's payload out into `$tokdata`.
#[macro_export]
macro_rules! accept {
    ($self:expr, $toktype:ident) => {
        match $self.lexer.peek() {
            Some(Ok(Token {
                kind: TokenKind::$toktype,
                ..
            })) => {
                $self.lexer.next();
                Ok(Some(TokenKind::$toktype))
            }
            Some(&Err(_)) => {
                if let Some(Err(e)) = $self.lexer.next() {
                    Err(e)
                } else {
                    unreachable!()
                }
            }
            _ => Ok(None),
        }
    };

    ($self:expr, $toktype:ident, $tokdata:ident) => {
        match $self.lexer.peek() {
            Some(Ok(Token {
                kind: TokenKind::$toktype(_),
                ..
            })) => {
                if let Some(Ok(Token {
                    kind: TokenKind::$toktype($tokdata),
                    ..
                })) = $self.lexer.next()
                {
                    Ok(Some($tokdata))
                } else {
                    unreachable!()
                }
            }
            Some(&Err(_)) => {
                if let Some(Err(e)) = $self.lexer.next() {
                    Err(e)
                } else {
                    unreachable!()
                }
            }
            _ => Ok(None),
        }
    };
}
