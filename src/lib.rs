pub mod block;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod world;
