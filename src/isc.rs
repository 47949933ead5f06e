//! Main module for ISC configuration handling

pub mod ast;
pub mod building;
pub mod classify;
pub mod config;
pub mod dhcpd;
pub mod dialect;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod loader;
pub mod named;
pub mod sorting;
pub mod testing;
pub mod token;
pub mod transforms;
pub mod zone;

pub use ast::{Child, Node, PropertyNode, RootNode};
pub use building::build;
pub use dialect::Dialect;
pub use error::{ConstructionError, IscError, LexError, StructureError, UnknownStatementError};
pub use formats::serializer::{serialize, SerializeOptions};
pub use lexing::tokenize;
pub use sorting::sort_tree;
pub use token::{Token, TokenKind};
