use logos::Logos;

use crate::error::{CodecError, Malformed, Span};
use crate::token::Token;

/// A token paired with its source span.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
    pub text: String,
}

/// Tokenizes document text into a sequence of spanned tokens.
///
/// # Errors
///
/// Returns `MalformedInput` with `Malformed::InvalidToken` at the first run
/// of bytes the lexer cannot match to a token rule.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, CodecError> {
    let mut tokens = Vec::new();

    let lexer = Token::lexer(source);
    for (result, range) in lexer.spanned() {
        let span = Span::new(range.start, range.end);
        match result {
            Ok(token) => tokens.push(SpannedToken {
                token,
                span,
                text: source[range].to_string(),
            }),
            Err(()) => return Err(CodecError::malformed(Malformed::InvalidToken, span)),
        }
    }

    Ok(tokens)
}
