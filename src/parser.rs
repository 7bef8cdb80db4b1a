//! The object builder
//!
//! One pass over the tags of a document. Each surviving tag either opens a context (object, list
//! or scalar), closes one and assigns its value to the context beneath, or is assigned on the spot
//! if self-closed. Whatever is still open when the input ends is folded into its parents.
use crate::{
    Bind, FieldType, Flow, Introspector, ParseOptions, Scanner, Span, Tag, TagKind, Value,
    context::{Context, ContextStack, Slot, SlotMut},
    convert::{convert, strip_cdata},
    error::{XmlError, XmlErrorKind, XmlResult},
    ignore::IgnoreTracker,
    listener::Listeners,
};
use std::any::TypeId;
use std::io::Read;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Binds XML documents to instances of `T`.
///
/// The root tag is the introspector's simple name for `T`. Anything before the first tag with
/// that name is skipped, and parsing ends at the root's close tag.
///
/// ```rust
/// use xmlbind::{Bind, BindError, BindResult, FieldType, Parser, Registry, TypeBinding, Value};
///
/// #[derive(Debug, Default)]
/// struct Note {
///     to: String,
///     body: String,
/// }
/// impl Bind for Note {
///     fn binding() -> TypeBinding {
///         TypeBinding::new::<Self>("Note")
///             .field("to", FieldType::Text)
///             .field("body", FieldType::Text)
///     }
///
///     fn set(&mut self, field: &str, value: Value) -> BindResult<()> {
///         match field {
///             "to" => self.to = value.into_text()?,
///             "body" => self.body = value.into_text()?,
///             _ => return Err(BindError::UnknownField(field.to_string())),
///         }
///         Ok(())
///     }
/// }
///
/// let registry = Registry::new().with::<Note>();
/// let mut parser = Parser::<Note>::new(&registry).unwrap();
/// let note = parser.parse_str("<Note to=\"Tove\"><body> Hi! </body></Note>").unwrap();
///
/// assert_eq!(note.to, "Tove");
/// assert_eq!(note.body, "Hi!");
/// ```
pub struct Parser<'p, T> {
    introspector: &'p dyn Introspector,
    listeners: Listeners<'p>,
    options: ParseOptions,
    root_type: TypeId,
    root_name: String,
    primed: Option<Box<dyn Bind>>,
    _target: PhantomData<fn() -> T>,
}
impl<'p, T: Bind> Parser<'p, T> {
    /// Create a parser for `T`. The root object is created right away.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::InvalidFormat`] if the introspector does not know `T`.
    pub fn new(introspector: &'p dyn Introspector) -> XmlResult<Self> {
        let root_type = TypeId::of::<T>();
        let root_name = introspector
            .type_name(root_type)
            .ok_or_else(|| {
                XmlErrorKind::InvalidFormat(format!(
                    "No binding for the root type `{}`",
                    std::any::type_name::<T>()
                ))
            })?
            .to_string();

        let root = instantiate_root::<T>(introspector)?;
        Ok(Self {
            introspector,
            listeners: Listeners::default(),
            options: ParseOptions::default(),
            root_type,
            root_name,
            primed: Some(root),
            _target: PhantomData,
        })
    }

    /// Replace the parser options.
    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// The tag name the document root must have.
    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Call `listener` every time an element named `tag` completes, with the value just built.
    ///
    /// Returning [`Flow::Stop`] ends the parse once that value has been assigned.
    /// Registering a second listener for the same tag replaces the first.
    pub fn register<F>(&mut self, tag: impl Into<String>, listener: F)
    where
        F: FnMut(&str, &Value) -> Flow + 'p,
    {
        self.listeners.register(tag, listener);
    }

    /// Parse a document held in memory.
    ///
    /// Malformed or truncated input does not fail; the result is populated as far as the input allows.
    ///
    /// # Errors
    /// Fails if a numeric or boolean field's text does not parse (unless
    /// [`ParseOptions::lenient_numbers`] is set), or if a nested object cannot be created.
    pub fn parse(&mut self, input: impl AsRef<[u8]>) -> XmlResult<T> {
        let root = match self.primed.take() {
            Some(root) => root,
            None => instantiate_root::<T>(self.introspector)?,
        };

        let mut builder = Builder {
            src: input.as_ref(),
            introspector: self.introspector,
            listeners: &mut self.listeners,
            options: self.options,
            root_name: &self.root_name,
            root_type: self.root_type,
            root,
            stack: ContextStack::new(),
            ignore: IgnoreTracker::new(),
        };

        builder.run()?;
        let root = builder.finish();

        root.downcast::<T>().map(|root| *root).ok_or_else(|| {
            XmlErrorKind::InvalidFormat("Root object changed type during the parse".to_string())
                .into()
        })
    }

    /// Parse a document from a string.
    ///
    /// # Errors
    /// See [`Parser::parse`].
    pub fn parse_str(&mut self, input: &str) -> XmlResult<T> {
        self.parse(input.as_bytes())
    }

    /// Parse a document that may be absent.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::NullInput`] for `None`, before any scanning.
    /// Otherwise see [`Parser::parse`].
    pub fn parse_opt<B: AsRef<[u8]>>(&mut self, input: Option<B>) -> XmlResult<T> {
        let Some(input) = input else {
            return Err(XmlErrorKind::NullInput.into());
        };
        self.parse(input)
    }

    /// Read a whole document from `reader`, then parse it.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::Io`] if reading fails. Otherwise see [`Parser::parse`].
    pub fn parse_reader<R: Read>(&mut self, mut reader: R) -> XmlResult<T> {
        let mut buffer = vec![];
        reader.read_to_end(&mut buffer)?;
        self.parse(buffer)
    }
}
impl<T> std::fmt::Debug for Parser<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("root_name", &self.root_name)
            .field("options", &self.options)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

/// Parse `input` into a new `T` with default options and no listeners.
///
/// # Errors
/// See [`Parser::new`] and [`Parser::parse`].
pub fn from_slice<T: Bind>(introspector: &dyn Introspector, input: &[u8]) -> XmlResult<T> {
    Parser::<T>::new(introspector)?.parse(input)
}

/// Parse `input` into a new `T` with default options and no listeners.
///
/// # Errors
/// See [`Parser::new`] and [`Parser::parse`].
pub fn from_str<T: Bind>(introspector: &dyn Introspector, input: &str) -> XmlResult<T> {
    from_slice(introspector, input.as_bytes())
}

fn instantiate_root<T: Bind>(introspector: &dyn Introspector) -> XmlResult<Box<dyn Bind>> {
    let root = introspector.instance(TypeId::of::<T>()).map_err(|err| {
        XmlErrorKind::InvalidFormat(format!("Cannot create the root object: {err}"))
    })?;

    if !root.is::<T>() {
        return Err(XmlErrorKind::InvalidFormat(format!(
            "Introspector created the wrong type for `{}`",
            std::any::type_name::<T>()
        ))
        .into());
    }

    Ok(root)
}

/// State of one parse.
struct Builder<'b, 'p, 'src> {
    src: &'src [u8],
    introspector: &'p dyn Introspector,
    listeners: &'b mut Listeners<'p>,
    options: ParseOptions,
    root_name: &'b str,
    root_type: TypeId,
    root: Box<dyn Bind>,
    stack: ContextStack<'src>,
    ignore: IgnoreTracker<'src>,
}
impl<'src> Builder<'_, '_, 'src> {
    fn run(&mut self) -> XmlResult<()> {
        for tag in Scanner::new(self.src) {
            if self.ignore.should_skip(&tag, self.root_name) {
                trace!(tag = %tag.tag_name(), kind = %tag.kind(), "skipped");
                continue;
            }

            trace!(
                tag = %tag.tag_name(),
                kind = %tag.kind(),
                depth = self.stack.depth(),
                "dispatch"
            );

            // The root is never pushed: its open tag only carries attributes, its close tag ends the parse
            if tag.name() == self.root_name {
                if tag.kind().is_opening() {
                    apply_attributes(
                        self.introspector,
                        self.options,
                        self.src,
                        &mut *self.root,
                        &tag,
                    )?;
                    continue;
                }

                debug!(depth = self.stack.depth(), "root closed");
                break;
            }

            let flow = match tag.kind() {
                TagKind::Open => {
                    self.on_open(tag)?;
                    Flow::Continue
                }
                TagKind::Close => self.on_close(&tag)?,
                TagKind::SelfClosed => self.on_self_closed(&tag)?,
            };

            if flow.is_stop() {
                debug!(depth = self.stack.depth(), "listener requested stop");
                break;
            }
        }

        if !self.ignore.found_root() {
            debug!(root = self.root_name, "root tag not found; nothing was bound");
        }
        Ok(())
    }

    /// Fold any still-open contexts into their parents and hand back the root.
    fn finish(mut self) -> Box<dyn Bind> {
        self.flush_incomplete();
        self.root
    }

    fn on_open(&mut self, tag: Tag<'src>) -> XmlResult<()> {
        match self.stack.slot(self.root_type) {
            Slot::List(element) => match self.introspector.instance_named(element) {
                Ok(mut object) => {
                    apply_attributes(self.introspector, self.options, self.src, &mut *object, &tag)?;
                    self.stack.push(Context::Object { tag, object });
                }
                Err(err) => {
                    debug!(element, %err, "cannot create list element; skipping it");
                    self.ignore.ignore(&tag);
                }
            },

            Slot::Object(owner) => {
                let name = tag.name();
                let Some(field) = self.introspector.field(owner, &name) else {
                    trace!(tag = %name, "unmapped tag; skipping its subtree");
                    self.ignore.ignore(&tag);
                    return Ok(());
                };

                match field {
                    FieldType::List(element) => self.stack.push(Context::List {
                        tag,
                        element,
                        items: vec![],
                    }),

                    FieldType::Object(ty) => {
                        let mut object = self.instantiate(ty, &tag)?;
                        apply_attributes(self.introspector, self.options, self.src, &mut *object, &tag)?;
                        self.stack.push(Context::Object { tag, object });
                    }

                    ty => self.stack.push(Context::Scalar { tag, ty }),
                }
            }
        }

        Ok(())
    }

    fn on_close(&mut self, tag: &Tag<'src>) -> XmlResult<Flow> {
        let Some(context) = self.stack.pop() else {
            debug!(tag = %tag.tag_name(), "close tag with nothing open");
            return Ok(Flow::Continue);
        };

        let (name, value) = match context {
            Context::Scalar { tag: open, ty } => {
                let field = open.name();
                let text = self.element_text(open.end(), tag);
                let Some(value) = convert_text(self.options, self.src, &open, ty, &field, &text)?
                else {
                    return Ok(Flow::Continue);
                };
                (field, value)
            }

            context => {
                let name = context.name();
                let Some(value) = context.into_value() else {
                    return Ok(Flow::Continue);
                };
                (name, value)
            }
        };

        let flow = self.listeners.notify(&tag.name(), &value);
        self.assign(&name, value);
        Ok(flow)
    }

    fn on_self_closed(&mut self, tag: &Tag<'src>) -> XmlResult<Flow> {
        let name = tag.name();

        let value = match self.stack.slot(self.root_type) {
            Slot::List(element) => match self.introspector.instance_named(element) {
                Ok(mut object) => {
                    apply_attributes(self.introspector, self.options, self.src, &mut *object, tag)?;
                    Value::Object(object)
                }
                Err(err) => {
                    debug!(element, %err, "cannot create list element; skipping it");
                    self.ignore.ignore(tag);
                    return Ok(Flow::Continue);
                }
            },

            Slot::Object(owner) => match self.introspector.field(owner, &name) {
                None => {
                    trace!(tag = %name, "unmapped tag; skipping it");
                    self.ignore.ignore(tag);
                    return Ok(Flow::Continue);
                }

                Some(FieldType::List(_)) => Value::List(vec![]),

                Some(FieldType::Object(ty)) => {
                    let mut object = self.instantiate(ty, tag)?;
                    apply_attributes(self.introspector, self.options, self.src, &mut *object, tag)?;
                    Value::Object(object)
                }

                Some(FieldType::Text | FieldType::Raw) => Value::Text(String::new()),

                Some(_) => {
                    trace!(tag = %name, "empty element for a numeric field; nothing to assign");
                    return Ok(self.listeners.notify(&name, &Value::Text(String::new())));
                }
            },
        };

        let flow = self.listeners.notify(&name, &value);
        self.assign(&name, value);
        Ok(flow)
    }

    /// Assign `value` to the innermost open object under `name`, or append it to the innermost list.
    /// Failures are dropped.
    fn assign(&mut self, name: &str, value: Value) {
        match self.stack.slot_mut(&mut self.root) {
            SlotMut::List(items) => match value {
                Value::Object(object) => items.push(object),
                other => debug!(kind = other.kind(), "list elements must be objects; dropped"),
            },

            SlotMut::Object(object) => {
                if let Err(err) = object.set(name, value) {
                    debug!(field = name, %err, "assignment rejected; dropped");
                }
            }
        }
    }

    /// Contexts still open at the end of input are assigned to their parents, innermost first.
    /// Unfinished scalars have no value yet and are discarded.
    fn flush_incomplete(&mut self) {
        if !self.stack.is_empty() {
            debug!(depth = self.stack.depth(), "folding unclosed tags into their parents");
        }

        while let Some(context) = self.stack.pop() {
            let name = context.name();
            match context.into_value() {
                Some(value) => self.assign(&name, value),
                None => debug!(field = %name, "discarding unfinished scalar"),
            }
        }
    }

    fn instantiate(&self, ty: TypeId, tag: &Tag<'_>) -> XmlResult<Box<dyn Bind>> {
        self.introspector.instance(ty).map_err(|err| {
            XmlError::at_tag(
                XmlErrorKind::InvalidFormat(format!("Cannot create `{}`: {err}", tag.name())),
                self.src,
                tag,
            )
        })
    }

    /// Text between the opening tag and `close`, with any CDATA wrapper removed.
    fn element_text(&self, content_start: usize, close: &Tag<'_>) -> String {
        let trim = self.options.trim_text;

        let mut span = Span::new(content_start, close.start());
        if trim {
            span = span.trim(self.src);
        }
        let text = span.text(self.src);

        if close.has_cdata() {
            let inner = strip_cdata(text.trim());
            let inner = if trim { inner.trim() } else { inner };
            return inner.to_string();
        }

        text.into_owned()
    }
}

/// Assign each attribute of `tag` whose name matches a scalar field of `object`.
fn apply_attributes(
    introspector: &dyn Introspector,
    options: ParseOptions,
    src: &[u8],
    object: &mut dyn Bind,
    tag: &Tag<'_>,
) -> XmlResult<()> {
    let ty = object.type_key();
    for attribute in tag.attributes() {
        let name = attribute.name();
        let Some(field) = introspector.field(ty, &name) else {
            trace!(attribute = %name, tag = %tag.tag_name(), "unmapped attribute");
            continue;
        };

        if !field.is_scalar() {
            debug!(attribute = %name, "attribute names an object or list field; dropped");
            continue;
        }

        let Some(value) = convert_text(options, src, tag, field, &name, &attribute.value())? else {
            continue;
        };

        if let Err(err) = object.set(&name, value) {
            debug!(attribute = %name, %err, "assignment rejected; dropped");
        }
    }

    Ok(())
}

/// Convert text for `field`. A failed conversion aborts, or is dropped when lenient.
fn convert_text(
    options: ParseOptions,
    src: &[u8],
    tag: &Tag<'_>,
    ty: FieldType,
    field: &str,
    text: &str,
) -> XmlResult<Option<Value>> {
    match convert(ty, text) {
        Ok(value) => Ok(Some(value)),

        Err(err) if options.lenient_numbers => {
            debug!(field, text, %err, "conversion failed; dropped");
            Ok(None)
        }

        Err(source) => Err(XmlError::at_tag(
            XmlErrorKind::NumericConversion {
                field: field.to_string(),
                text: text.to_string(),
                source,
            },
            src,
            tag,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BindError, BindResult, ConversionError, Registry, TypeBinding};

    #[derive(Debug, Default)]
    struct Root {
        name: Option<String>,
        count: Option<i32>,
        child: Option<Child>,
        items: Vec<Child>,
    }
    impl Bind for Root {
        fn binding() -> TypeBinding {
            TypeBinding::new::<Self>("Root")
                .field("name", FieldType::Text)
                .field("count", FieldType::Int)
                .field("child", FieldType::object::<Child>())
                .field("items", FieldType::list("Child"))
        }

        fn set(&mut self, field: &str, value: Value) -> BindResult<()> {
            match field {
                "name" => self.name = Some(value.into_text()?),
                "count" => self.count = Some(value.into_i32()?),
                "child" => self.child = Some(value.into_object()?),
                "items" => self.items = value.into_list()?,
                _ => return Err(BindError::UnknownField(field.to_string())),
            }
            Ok(())
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Child {
        id: String,
    }
    impl Bind for Child {
        fn binding() -> TypeBinding {
            TypeBinding::new::<Self>("Child").field("id", FieldType::Text)
        }

        fn set(&mut self, field: &str, value: Value) -> BindResult<()> {
            match field {
                "id" => self.id = value.into_text()?,
                _ => return Err(BindError::UnknownField(field.to_string())),
            }
            Ok(())
        }
    }

    fn registry() -> Registry {
        Registry::new().with::<Root>().with::<Child>()
    }

    #[test]
    fn test_unregistered_root() {
        let registry = Registry::new().with::<Child>();
        let err = Parser::<Root>::new(&registry).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::InvalidFormat(_)));
    }

    #[test]
    fn test_root_name() {
        let registry = registry();
        let parser = Parser::<Root>::new(&registry).unwrap();
        assert_eq!(parser.root_name(), "Root");
        assert_eq!(parser.options(), &ParseOptions::default());
    }

    #[test]
    fn test_parser_is_reusable() {
        let registry = registry();
        let mut parser = Parser::<Root>::new(&registry).unwrap();

        let first = parser.parse_str("<Root><name>a</name></Root>").unwrap();
        let second = parser.parse_str("<Root><count>2</count></Root>").unwrap();

        assert_eq!(first.name.as_deref(), Some("a"));
        assert_eq!(first.count, None);
        assert_eq!(second.name, None);
        assert_eq!(second.count, Some(2));
    }

    #[test]
    fn test_null_input() {
        let registry = registry();
        let mut parser = Parser::<Root>::new(&registry).unwrap();
        let err = parser.parse_opt(None::<&str>).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::NullInput));

        let root = parser.parse_opt(Some("<Root><name>x</name></Root>")).unwrap();
        assert_eq!(root.name.as_deref(), Some("x"));
    }

    #[test]
    fn test_empty_input() {
        let registry = registry();
        let root: Root = from_str(&registry, "").unwrap();
        assert!(root.name.is_none());
        assert!(root.child.is_none());
    }

    #[test]
    fn test_self_closed_numeric_is_not_assigned() {
        let registry = registry();
        let root: Root = from_str(&registry, "<Root><count/><name/></Root>").unwrap();
        assert_eq!(root.count, None);
        assert_eq!(root.name.as_deref(), Some(""));
    }

    #[test]
    fn test_self_closed_numeric_notifies_listener() {
        let registry = registry();
        let mut fired = vec![];
        let root = {
            let mut parser = Parser::<Root>::new(&registry).unwrap();
            parser.register("count", |tag: &str, value: &Value| {
                fired.push((tag.to_string(), value.as_text().map(str::to_string)));
                Flow::Stop
            });
            parser.parse_str("<Root><count/><name>x</name></Root>").unwrap()
        };

        assert_eq!(fired, [("count".to_string(), Some(String::new()))]);
        assert_eq!(root.count, None);
        assert_eq!(root.name, None);
    }

    #[test]
    fn test_stray_close_tag() {
        let registry = registry();
        let root: Root = from_str(&registry, "<Root></name><name>n</name></Root>").unwrap();
        assert_eq!(root.name.as_deref(), Some("n"));
    }

    #[test]
    fn test_untrimmed_text() {
        let registry = registry();
        let mut parser = Parser::<Root>::new(&registry)
            .unwrap()
            .with_options(ParseOptions::default().with_trim_text(false));

        let root = parser.parse_str("<Root><name>  a b </name></Root>").unwrap();
        assert_eq!(root.name.as_deref(), Some("  a b "));
    }

    #[test]
    fn test_conversion_error_location() {
        let registry = registry();
        let err = from_str::<Root>(&registry, "<Root>\n<count>x1</count></Root>").unwrap_err();

        let XmlErrorKind::NumericConversion { field, text, source } = &err.kind else {
            panic!("expected a conversion error, got {err}");
        };
        assert_eq!(field, "count");
        assert_eq!(text, "x1");
        assert!(matches!(source, ConversionError::Int(_)));

        assert_eq!(err.context.tag.as_deref(), Some("count"));
        assert_eq!(err.context.position, Some((2, 1)));
        assert!(err.to_string().contains("= At 2:1 in <count>"));
    }

    #[test]
    fn test_list_of_self_closed_elements() {
        let registry = registry();
        let src = "<Root><items><Child id=\"1\"/><Child id=\"2\"></Child></items></Root>";
        let root: Root = from_str(&registry, src).unwrap();

        let ids: Vec<_> = root.items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn test_unknown_list_element_is_skipped() {
        #[derive(Debug, Default)]
        struct Bag {
            things: usize,
        }
        impl Bind for Bag {
            fn binding() -> TypeBinding {
                TypeBinding::new::<Self>("Bag").field("things", FieldType::list("Thing"))
            }

            fn set(&mut self, _: &str, value: Value) -> BindResult<()> {
                self.things = value.as_list().map_or(0, <[_]>::len);
                Ok(())
            }
        }

        let registry = Registry::new().with::<Bag>();
        let bag: Bag = from_str(&registry, "<Bag><things><Thing><a/></Thing></things></Bag>").unwrap();
        assert_eq!(bag.things, 0);
    }

    #[test]
    fn test_unknown_nested_type_fails() {
        let registry = Registry::new().with::<Root>();
        let err = from_str::<Root>(&registry, "<Root><child id=\"1\"/></Root>").unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::InvalidFormat(_)));
    }

    #[test]
    fn test_parse_reader() {
        let registry = registry();
        let mut parser = Parser::<Root>::new(&registry).unwrap();
        let root = parser
            .parse_reader("<Root><name>r</name></Root>".as_bytes())
            .unwrap();
        assert_eq!(root.name.as_deref(), Some("r"));
    }
}
