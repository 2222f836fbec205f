/*
 * tokens.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `arcl tokens`: print one token per line.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use arcl::{Scanner, Token};

use crate::source::LoadedSource;

/// Execute the tokens command
pub fn execute(file: &Path, all: bool) -> Result<ExitCode> {
    let source = LoadedSource::read(file)?;
    for token in scan(&source.text, all) {
        let token = token.map_err(|err| source.fail(err))?;
        println!("{}", token);
    }
    Ok(ExitCode::SUCCESS)
}

fn scan(text: &str, all: bool) -> Box<dyn Iterator<Item = arcl::ArclResult<Token>> + '_> {
    if all {
        Box::new(Scanner::new(text))
    } else {
        Box::new(Scanner::new(text).significant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcl::TokenKind;

    #[test]
    fn test_whitespace_only_with_all() {
        let count = |all| {
            scan("[a] b\n", all)
                .filter(|t| t.as_ref().is_ok_and(|t| t.is(TokenKind::Whitespace)))
                .count()
        };
        assert_eq!(count(false), 0);
        assert_eq!(count(true), 1);
    }
}
