use super::ast::Command;
use super::lexer::{Lexer, Token, TokenKind};
use crate::engine::filter::{Assignment, Filter};
use crate::storage::table::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at position {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEof(String),
    #[error("{0}")]
    LexerError(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().map_err(ParseError::LexerError)?;
        Ok(Self { tokens, position: 0 })
    }

    /// Parses one command line. A blank line yields `None`.
    pub fn parse(&mut self) -> Result<Option<Command>, ParseError> {
        let keyword = match self.peek_kind() {
            None | Some(TokenKind::Eof) => return Ok(None),
            Some(TokenKind::Word(w)) => w.to_lowercase(),
            Some(_) => return Err(self.unexpected_token("command")),
        };
        self.advance();

        let command = match keyword.as_str() {
            "create_table" => self.parse_create_table()?,
            "drop_table" => Command::DropTable {
                table: self.parse_name("table name")?,
            },
            "list_tables" => Command::ListTables,
            "insert" => self.parse_insert()?,
            "select" => self.parse_select()?,
            "update" => self.parse_update()?,
            "delete" => self.parse_delete()?,
            "info" => Command::Info {
                table: self.parse_name("table name")?,
            },
            "help" => Command::Help,
            "exit" => Command::Exit,
            _ => return Err(ParseError::UnknownCommand(keyword)),
        };

        self.expect(TokenKind::Eof)?;
        Ok(Some(command))
    }

    fn parse_create_table(&mut self) -> Result<Command, ParseError> {
        let table = self.parse_name("table name")?;

        let mut columns = Vec::new();
        while !self.check(&TokenKind::Eof) {
            columns.push(self.parse_name("column definition")?);
        }

        Ok(Command::CreateTable { table, columns })
    }

    fn parse_insert(&mut self) -> Result<Command, ParseError> {
        self.expect_keyword("into")?;
        let table = self.parse_name("table name")?;
        self.expect_keyword("values")?;

        let mut values = Vec::new();
        if self.check(&TokenKind::LParen) {
            self.advance();
            if !self.check(&TokenKind::RParen) {
                loop {
                    values.push(self.parse_raw_value()?);
                    if self.check(&TokenKind::Comma) {
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen)?;
        } else {
            // Bare list: `values 1, x` or `values 1 x`
            while !self.check(&TokenKind::Eof) {
                values.push(self.parse_raw_value()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                }
            }
        }

        Ok(Command::Insert { table, values })
    }

    fn parse_select(&mut self) -> Result<Command, ParseError> {
        self.expect_keyword("from")?;
        let table = self.parse_name("table name")?;

        let filter = if self.peek_is_keyword("where") {
            Some(self.parse_where()?)
        } else {
            None
        };

        Ok(Command::Select { table, filter })
    }

    fn parse_update(&mut self) -> Result<Command, ParseError> {
        let table = self.parse_name("table name")?;
        self.expect_keyword("set")?;

        let mut set = Vec::new();
        loop {
            let (column, value) = self.parse_pair()?;
            set.push(Assignment::new(column, value));
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }

        let filter = self.parse_where()?;
        Ok(Command::Update { table, set, filter })
    }

    fn parse_delete(&mut self) -> Result<Command, ParseError> {
        self.expect_keyword("from")?;
        let table = self.parse_name("table name")?;
        let filter = self.parse_where()?;
        Ok(Command::Delete { table, filter })
    }

    fn parse_where(&mut self) -> Result<Filter, ParseError> {
        self.expect_keyword("where")?;
        let (column, value) = self.parse_pair()?;
        Ok(Filter::new(column, value))
    }

    /// `column = literal`
    fn parse_pair(&mut self) -> Result<(String, Value), ParseError> {
        let column = self.parse_name("column name")?;
        self.expect(TokenKind::Eq)?;
        let value = self.parse_literal()?;
        Ok((column, value))
    }

    fn parse_literal(&mut self) -> Result<Value, ParseError> {
        match self.peek_kind().cloned() {
            Some(TokenKind::Word(w)) => {
                self.advance();
                Ok(Value::from_literal(&w))
            }
            Some(TokenKind::Quoted(s)) => {
                self.advance();
                Ok(Value::Str(s))
            }
            _ => Err(self.unexpected_token("value")),
        }
    }

    fn parse_raw_value(&mut self) -> Result<String, ParseError> {
        match self.peek_kind().cloned() {
            Some(TokenKind::Word(s)) | Some(TokenKind::Quoted(s)) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.unexpected_token("value")),
        }
    }

    fn parse_name(&mut self, expected: &str) -> Result<String, ParseError> {
        match self.peek_kind().cloned() {
            Some(TokenKind::Word(name)) | Some(TokenKind::Quoted(name)) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected_token(expected)),
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.peek_is_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected_token(&format!("'{}'", keyword)))
        }
    }

    fn peek_is_keyword(&self, keyword: &str) -> bool {
        self.peek_kind().map_or(false, |k| k.is_word(keyword))
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.position).map(|t| &t.kind)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn advance(&mut self) -> Option<&Token> {
        if self.position < self.tokens.len() {
            let token = &self.tokens[self.position];
            self.position += 1;
            Some(token)
        } else {
            None
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<(), ParseError> {
        if self.check(&expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected_token(describe(&expected)))
        }
    }

    fn unexpected_token(&self, expected: &str) -> ParseError {
        match self.tokens.get(self.position) {
            Some(token) if token.kind != TokenKind::Eof => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: describe(&token.kind).to_string(),
                position: token.position,
            },
            _ => ParseError::UnexpectedEof(expected.to_string()),
        }
    }
}

fn describe(kind: &TokenKind) -> &str {
    match kind {
        TokenKind::Word(w) | TokenKind::Quoted(w) => w,
        TokenKind::Comma => "','",
        TokenKind::Eq => "'='",
        TokenKind::LParen => "'('",
        TokenKind::RParen => "')'",
        TokenKind::Eof => "end of input",
    }
}

/// Parses a single command line.
pub fn parse_command(input: &str) -> Result<Option<Command>, ParseError> {
    Parser::new(input)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Command {
        parse_command(input).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_create_table() {
        assert_eq!(
            parse("create_table users name:str age:int"),
            Command::CreateTable {
                table: "users".to_string(),
                columns: vec!["name:str".to_string(), "age:int".to_string()],
            }
        );
    }

    #[test]
    fn test_create_table_requires_name() {
        assert_eq!(
            parse_command("create_table"),
            Err(ParseError::UnexpectedEof("table name".to_string()))
        );
    }

    #[test]
    fn test_drop_table_takes_one_name() {
        assert_eq!(
            parse("drop_table users"),
            Command::DropTable {
                table: "users".to_string()
            }
        );
        assert!(matches!(
            parse_command("drop_table a b"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_insert() {
        assert_eq!(
            parse(r#"insert into t values (5, "x y", true)"#),
            Command::Insert {
                table: "t".to_string(),
                values: vec!["5".to_string(), "x y".to_string(), "true".to_string()],
            }
        );
    }

    #[test]
    fn test_insert_bare_values() {
        assert_eq!(
            parse("INSERT INTO t VALUES 1, 2"),
            Command::Insert {
                table: "t".to_string(),
                values: vec!["1".to_string(), "2".to_string()],
            }
        );
    }

    #[test]
    fn test_insert_missing_into() {
        assert!(matches!(
            parse_command("insert t values (1)"),
            Err(ParseError::UnexpectedToken { ref expected, .. }) if expected == "'into'"
        ));
    }

    #[test]
    fn test_insert_unclosed_paren() {
        assert_eq!(
            parse_command("insert into t values (1, 2"),
            Err(ParseError::UnexpectedEof("')'".to_string()))
        );
    }

    #[test]
    fn test_select() {
        assert_eq!(
            parse("select from t"),
            Command::Select {
                table: "t".to_string(),
                filter: None
            }
        );
        assert_eq!(
            parse("select from t where a=5"),
            Command::Select {
                table: "t".to_string(),
                filter: Some(Filter::new("a", 5i64)),
            }
        );
    }

    #[test]
    fn test_quoted_literal_stays_string() {
        assert_eq!(
            parse(r#"select from t where a = "5""#),
            Command::Select {
                table: "t".to_string(),
                filter: Some(Filter::new("a", "5")),
            }
        );
        assert_eq!(
            parse("select from t where active=true"),
            Command::Select {
                table: "t".to_string(),
                filter: Some(Filter::new("active", true)),
            }
        );
    }

    #[test]
    fn test_update() {
        assert_eq!(
            parse(r#"update users set name="Bo b", age=3 where ID=1"#),
            Command::Update {
                table: "users".to_string(),
                set: vec![
                    Assignment::new("name", "Bo b"),
                    Assignment::new("age", 3i64)
                ],
                filter: Filter::new("ID", 1i64),
            }
        );
    }

    #[test]
    fn test_update_requires_where() {
        assert_eq!(
            parse_command("update users set a=1"),
            Err(ParseError::UnexpectedEof("'where'".to_string()))
        );
    }

    #[test]
    fn test_delete() {
        assert_eq!(
            parse("delete from users where name=bob"),
            Command::Delete {
                table: "users".to_string(),
                filter: Filter::new("name", "bob"),
            }
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_command("frobnicate"),
            Err(ParseError::UnknownCommand("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_unbalanced_quotes() {
        assert!(matches!(
            parse_command("insert into t values (\"x)"),
            Err(ParseError::LexerError(_))
        ));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("help"), Command::Help);
        assert_eq!(parse("exit"), Command::Exit);
        assert_eq!(parse("list_tables"), Command::ListTables);
        assert_eq!(
            parse("info t"),
            Command::Info {
                table: "t".to_string()
            }
        );
    }
}
