//! Command text parsing
//!
//! Turns one raw input line into an [`Operation`]. The grammar is:
//!
//! ```text
//! CHECK <account>
//! TRANS <account> <amount> [<account> <amount> ...]
//! ```
//!
//! Tokens are separated by spaces; runs of spaces collapse. Each token is cut
//! to its first [`MAX_TOKEN_LEN`] characters before it is interpreted, which
//! mirrors the fixed-width token slots of the legacy protocol. Keywords are
//! case-sensitive.
//!
//! Every worker owns its own [`CommandParser`], so tokenizing never contends
//! with other workers and needs no lock.

use crate::types::{AccountId, Balance, InvalidRequest, Operation, TransferLeg};
use std::str::FromStr;

/// Longest token the parser keeps; extra characters are dropped
pub const MAX_TOKEN_LEN: usize = 20;

const CHECK: &str = "CHECK";
const TRANS: &str = "TRANS";

/// Per-worker command parser
///
/// Keeps its token buffer between calls so steady-state parsing reuses the
/// same allocations.
#[derive(Debug, Default)]
pub struct CommandParser {
    /// Token slots; only the first `len` hold the current command
    tokens: Vec<String>,
    len: usize,
}

impl CommandParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one command line
    ///
    /// Never fails: anything that does not match the grammar becomes
    /// `Operation::Invalid` carrying the reason.
    pub fn parse(&mut self, raw: &str) -> Operation {
        self.tokenize(raw);
        self.classify()
    }

    /// Split `raw` into the token buffer
    fn tokenize(&mut self, raw: &str) {
        self.len = 0;

        for token in raw.split(' ').filter(|token| !token.is_empty()) {
            if self.len == self.tokens.len() {
                self.tokens.push(String::with_capacity(MAX_TOKEN_LEN));
            }
            let slot = &mut self.tokens[self.len];
            slot.clear();
            slot.extend(token.chars().take(MAX_TOKEN_LEN));
            self.len += 1;
        }
    }

    fn tokens(&self) -> &[String] {
        &self.tokens[..self.len]
    }

    fn classify(&self) -> Operation {
        let tokens = self.tokens();

        let result = match tokens {
            [] => Err(InvalidRequest::Empty),
            [keyword, args @ ..] if keyword == CHECK => parse_check(args),
            [keyword, args @ ..] if keyword == TRANS => parse_transfer(args),
            [keyword, ..] => Err(InvalidRequest::UnknownCommand {
                keyword: keyword.clone(),
            }),
        };

        result.unwrap_or_else(Operation::Invalid)
    }
}

fn parse_check(args: &[String]) -> Result<Operation, InvalidRequest> {
    match args {
        [account] => Ok(Operation::Check {
            account: parse_number(account, "account")?,
        }),
        _ => Err(InvalidRequest::WrongArity {
            keyword: CHECK,
            tokens: args.len() + 1,
        }),
    }
}

fn parse_transfer(args: &[String]) -> Result<Operation, InvalidRequest> {
    if args.is_empty() || args.len() % 2 != 0 {
        return Err(InvalidRequest::WrongArity {
            keyword: TRANS,
            tokens: args.len() + 1,
        });
    }

    let legs = args
        .chunks_exact(2)
        .map(|pair| {
            Ok(TransferLeg::new(
                parse_number::<AccountId>(&pair[0], "account")?,
                parse_number::<Balance>(&pair[1], "amount")?,
            ))
        })
        .collect::<Result<Vec<_>, InvalidRequest>>()?;

    Ok(Operation::Transfer { legs })
}

fn parse_number<T: FromStr>(token: &str, field: &'static str) -> Result<T, InvalidRequest> {
    token.parse().map_err(|_| InvalidRequest::MalformedNumber {
        token: token.to_string(),
        field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(raw: &str) -> Operation {
        CommandParser::new().parse(raw)
    }

    #[rstest]
    #[case::check("CHECK 4", Operation::Check { account: 4 })]
    #[case::check_extra_spaces("  CHECK   4 ", Operation::Check { account: 4 })]
    #[case::single_leg("TRANS 1 100", Operation::Transfer { legs: vec![TransferLeg::new(1, 100)] })]
    #[case::multi_leg(
        "TRANS 2 10 1 -20",
        Operation::Transfer { legs: vec![TransferLeg::new(2, 10), TransferLeg::new(1, -20)] }
    )]
    #[case::explicit_plus("TRANS 1 +5", Operation::Transfer { legs: vec![TransferLeg::new(1, 5)] })]
    fn test_parse_valid(#[case] raw: &str, #[case] expected: Operation) {
        assert_eq!(parse(raw), expected);
    }

    #[rstest]
    #[case::empty("", InvalidRequest::Empty)]
    #[case::blank("   ", InvalidRequest::Empty)]
    #[case::unknown("DEPOSIT 1 5", InvalidRequest::UnknownCommand { keyword: "DEPOSIT".to_string() })]
    #[case::lowercase("check 1", InvalidRequest::UnknownCommand { keyword: "check".to_string() })]
    #[case::check_no_account("CHECK", InvalidRequest::WrongArity { keyword: "CHECK", tokens: 1 })]
    #[case::check_two_accounts("CHECK 1 2", InvalidRequest::WrongArity { keyword: "CHECK", tokens: 3 })]
    #[case::trans_alone("TRANS", InvalidRequest::WrongArity { keyword: "TRANS", tokens: 1 })]
    #[case::trans_dangling("TRANS 1 5 2", InvalidRequest::WrongArity { keyword: "TRANS", tokens: 4 })]
    #[case::bad_account(
        "CHECK one",
        InvalidRequest::MalformedNumber { token: "one".to_string(), field: "account" }
    )]
    #[case::negative_account(
        "CHECK -1",
        InvalidRequest::MalformedNumber { token: "-1".to_string(), field: "account" }
    )]
    #[case::bad_amount(
        "TRANS 1 5x",
        InvalidRequest::MalformedNumber { token: "5x".to_string(), field: "amount" }
    )]
    fn test_parse_invalid(#[case] raw: &str, #[case] expected: InvalidRequest) {
        assert_eq!(parse(raw), Operation::Invalid(expected));
    }

    #[test]
    fn test_long_tokens_are_truncated() {
        // 23 characters; only "00000000000000000123" survives
        let operation = parse("TRANS 1 00000000000000000123456");

        assert_eq!(
            operation,
            Operation::Transfer {
                legs: vec![TransferLeg::new(1, 123)]
            }
        );
    }

    #[test]
    fn test_truncated_keyword_is_reported_truncated() {
        let operation = parse("CHECKCHECKCHECKCHECKCHECK 1");

        assert_eq!(
            operation,
            Operation::Invalid(InvalidRequest::UnknownCommand {
                keyword: "CHECKCHECKCHECKCHECK".to_string()
            })
        );
    }

    #[test]
    fn test_parser_buffer_is_reused_between_commands() {
        let mut parser = CommandParser::new();

        assert!(matches!(parser.parse("TRANS 1 1 2 2 3 3"), Operation::Transfer { .. }));
        assert_eq!(parser.parse("CHECK 9"), Operation::Check { account: 9 });
        assert_eq!(parser.tokens().len(), 2);
        assert_eq!(parser.tokens.len(), 7);
    }
}
