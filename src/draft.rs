use crate::catalog::file_pattern_for;

/// What the next appended token means, derived from the shape of the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation<'a> {
    Subcommand,
    Flag { subcommand: &'a str },
    Value {
        subcommand: &'a str,
        flag: &'a str,
        pattern: &'static str,
    },
}

/// The command being built. Token 0 is always the binary name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDraft {
    tokens: Vec<String>,
}

impl CommandDraft {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            tokens: vec![binary.into()],
        }
    }

    #[cfg(test)]
    pub fn from_tokens<I, S>(binary: impl Into<String>, rest: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut draft = Self::new(binary);
        draft.tokens.extend(rest.into_iter().map(Into::into));
        draft
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn binary(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    pub fn subcommand(&self) -> Option<&str> {
        self.tokens.get(1).map(String::as_str)
    }

    pub fn last(&self) -> &str {
        // Never empty: the binary is never popped.
        &self.tokens[self.tokens.len() - 1]
    }

    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// Removes the last token unless only the binary is left.
    pub fn pop(&mut self) -> Option<String> {
        if self.tokens.len() > 1 {
            self.tokens.pop()
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.tokens.truncate(1);
    }

    /// True once a subcommand has been chosen.
    pub fn is_runnable(&self) -> bool {
        self.tokens.len() >= 2
    }

    pub fn expecting(&self) -> Expectation<'_> {
        let Some(subcommand) = self.subcommand() else {
            return Expectation::Subcommand;
        };
        if self.tokens.len() == 2 {
            return Expectation::Flag { subcommand };
        }

        let flag = self.last();
        match file_pattern_for(flag) {
            Some(pattern) => Expectation::Value {
                subcommand,
                flag,
                pattern,
            },
            None => Expectation::Flag { subcommand },
        }
    }

    pub fn display(&self) -> String {
        self.tokens.join(" ")
    }
}
