//! # xmlbind
//!
//! A single-pass, streaming XML to object binder.
//! Tags are lexed straight out of the input and applied to a tree of target objects as they arrive;
//! no document tree is ever built.
//!
//! Target types describe themselves through [`Bind`], and are resolved by an [`Introspector`] such as [`Registry`].
//! The parser is deliberately forgiving: unknown tags and their subtrees are skipped, anything before the
//! root tag is ignored, and a truncated document still yields every value read so far.
//!
//! ```rust
//! use xmlbind::{Bind, BindError, BindResult, FieldType, Flow, Parser, Registry, TypeBinding, Value};
//!
//! #[derive(Debug, Default)]
//! struct Library {
//!     name: String,
//!     books: Vec<Book>,
//! }
//! impl Bind for Library {
//!     fn binding() -> TypeBinding {
//!         TypeBinding::new::<Self>("Library")
//!             .field("name", FieldType::Text)
//!             .field("books", FieldType::list("Book"))
//!     }
//!
//!     fn set(&mut self, field: &str, value: Value) -> BindResult<()> {
//!         match field {
//!             "name" => self.name = value.into_text()?,
//!             "books" => self.books = value.into_list()?,
//!             _ => return Err(BindError::UnknownField(field.to_string())),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Debug, Default)]
//! struct Book {
//!     title: String,
//!     pages: i32,
//! }
//! impl Bind for Book {
//!     fn binding() -> TypeBinding {
//!         TypeBinding::new::<Self>("Book")
//!             .field("title", FieldType::Text)
//!             .field("pages", FieldType::Int)
//!     }
//!
//!     fn set(&mut self, field: &str, value: Value) -> BindResult<()> {
//!         match field {
//!             "title" => self.title = value.into_text()?,
//!             "pages" => self.pages = value.into_i32()?,
//!             _ => return Err(BindError::UnknownField(field.to_string())),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let registry = Registry::new().with::<Library>().with::<Book>();
//! let mut parser = Parser::<Library>::new(&registry).unwrap();
//!
//! let mut titles = 0;
//! parser.register("title", |_, _| {
//!     titles += 1;
//!     Flow::Continue
//! });
//!
//! let library = parser
//!     .parse_str(
//!         r#"<?xml version="1.0"?>
//!         <Library name="City">
//!             <books>
//!                 <Book pages="120"><title>Dune</title></Book>
//!                 <Book pages="96"><title><![CDATA[Tom & Jerry]]></title></Book>
//!             </books>
//!         </Library>"#,
//!     )
//!     .unwrap();
//! drop(parser);
//!
//! assert_eq!(library.name, "City");
//! assert_eq!(library.books[1].title, "Tom & Jerry");
//! assert_eq!(library.books[0].pages, 120);
//! assert_eq!(titles, 2);
//! ```
#![warn(missing_docs)]

mod span;
pub use span::Span;

mod token;
pub use token::{Attribute, Tag, TagKind, TagName};

mod scanner;
pub use scanner::{Scanner, next_tag};

mod binding;
pub use binding::{AsAny, Bind, BindError, BindResult, FieldType, TypeBinding};

mod value;
pub use value::Value;

mod introspect;
pub use introspect::{Introspector, Registry};

mod convert;
pub use convert::{ConversionError, convert};

mod listener;
pub use listener::Flow;

mod options;
pub use options::ParseOptions;

mod error;
pub use error::{ErrorContext, XmlError, XmlErrorKind, XmlResult};

mod context;
mod ignore;

mod parser;
pub use parser::{Parser, from_slice, from_str};
