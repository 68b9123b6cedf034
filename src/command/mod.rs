pub mod ast;
pub mod interpreter;
pub mod lexer;
pub mod parser;

pub use ast::Command;
pub use interpreter::{run, run_once, AlwaysConfirm, Confirm, Interpreter, PromptConfirm, Response, Settings};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse_command, ParseError, Parser};
