//! The builder's record of currently open tags.
use crate::{Bind, FieldType, Tag, Value};
use std::any::TypeId;
use std::borrow::Cow;

/// One open ancestor tag and its in-progress target.
#[derive(Debug)]
pub(crate) enum Context<'src> {
    /// A scalar field. The value is captured from the element text when the tag closes.
    /// Element text starts at the end of `tag`.
    Scalar { tag: Tag<'src>, ty: FieldType },

    /// A nested object, attributes already applied.
    Object {
        tag: Tag<'src>,
        object: Box<dyn Bind>,
    },

    /// A list, filled one element at a time.
    List {
        tag: Tag<'src>,
        element: &'static str,
        items: Vec<Box<dyn Bind>>,
    },
}
impl<'src> Context<'src> {
    /// Name of the tag that opened this context.
    pub fn name(&self) -> Cow<'src, str> {
        match self {
            Self::Scalar { tag, .. } | Self::Object { tag, .. } | Self::List { tag, .. } => {
                tag.name()
            }
        }
    }

    /// The materialized object or list, if this context holds one.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Scalar { .. } => None,
            Self::Object { object, .. } => Some(Value::Object(object)),
            Self::List { items, .. } => Some(Value::List(items)),
        }
    }
}

/// Where a tag lands, as seen from the top of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Fields of an object of this type
    Object(TypeId),

    /// An element of a list of this type name
    List(&'static str),
}

/// Mutable access to the innermost target.
pub(crate) enum SlotMut<'a> {
    Object(&'a mut Box<dyn Bind>),
    List(&'a mut Vec<Box<dyn Bind>>),
}

/// Open contexts, innermost last. The root object lives below the stack and is never pushed.
///
/// Scalar contexts do not own a target: their owner is the nearest object or list beneath them,
/// so lookups and assignments skip over them.
#[derive(Debug, Default)]
pub(crate) struct ContextStack<'src> {
    frames: Vec<Context<'src>>,
}
impl<'src> ContextStack<'src> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, context: Context<'src>) {
        self.frames.push(context);
    }

    pub fn pop(&mut self) -> Option<Context<'src>> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Resolve the innermost target for field lookups.
    pub fn slot(&self, root: TypeId) -> Slot {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| match frame {
                Context::Scalar { .. } => None,
                Context::Object { object, .. } => Some(Slot::Object(object.type_key())),
                Context::List { element, .. } => Some(Slot::List(*element)),
            })
            .unwrap_or(Slot::Object(root))
    }

    /// Resolve the innermost target for assignment.
    pub fn slot_mut<'a>(&'a mut self, root: &'a mut Box<dyn Bind>) -> SlotMut<'a> {
        for frame in self.frames.iter_mut().rev() {
            match frame {
                Context::Scalar { .. } => {}
                Context::Object { object, .. } => return SlotMut::Object(object),
                Context::List { items, .. } => return SlotMut::List(items),
            }
        }

        SlotMut::Object(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BindError, BindResult, TypeBinding, scanner::next_tag};

    #[derive(Debug, Default)]
    struct Node {
        hits: Vec<String>,
    }
    impl Bind for Node {
        fn binding() -> TypeBinding {
            TypeBinding::new::<Self>("Node")
        }

        fn set(&mut self, field: &str, _: Value) -> BindResult<()> {
            self.hits.push(field.to_string());
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct Root;
    impl Bind for Root {
        fn binding() -> TypeBinding {
            TypeBinding::new::<Self>("Root")
        }

        fn set(&mut self, field: &str, _: Value) -> BindResult<()> {
            Err(BindError::UnknownField(field.to_string()))
        }
    }

    fn scalar(src: &[u8]) -> Context<'_> {
        Context::Scalar {
            tag: next_tag(src, 0).unwrap(),
            ty: FieldType::Text,
        }
    }

    #[test]
    fn test_empty_stack_targets_root() {
        let stack = ContextStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.slot(TypeId::of::<Root>()), Slot::Object(TypeId::of::<Root>()));
    }

    #[test]
    fn test_scalar_frames_are_skipped() {
        let src = b"<node>";
        let tag = next_tag(src, 0).unwrap();

        let mut stack = ContextStack::new();
        stack.push(Context::Object {
            tag,
            object: Box::new(Node::default()),
        });
        stack.push(scalar(b"<title>"));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.slot(TypeId::of::<Root>()), Slot::Object(TypeId::of::<Node>()));

        let mut root: Box<dyn Bind> = Box::new(Root);
        match stack.slot_mut(&mut root) {
            SlotMut::Object(object) => object.set("x", Value::Bool(true)).unwrap(),
            SlotMut::List(_) => panic!("expected the node object"),
        }

        let _ = stack.pop();
        let node = stack.pop().unwrap();
        assert_eq!(node.name(), "node");
        let Some(Value::Object(object)) = node.into_value() else {
            panic!("expected an object");
        };
        assert_eq!(object.downcast_ref::<Node>().unwrap().hits, ["x"]);
    }

    #[test]
    fn test_list_slot() {
        let src = b"<items>";
        let tag = next_tag(src, 0).unwrap();

        let mut stack = ContextStack::new();
        stack.push(Context::List {
            tag,
            element: "Node",
            items: vec![],
        });
        assert_eq!(stack.slot(TypeId::of::<Root>()), Slot::List("Node"));

        let mut root: Box<dyn Bind> = Box::new(Root);
        let SlotMut::List(items) = stack.slot_mut(&mut root) else {
            panic!("expected the list");
        };
        items.push(Box::new(Node::default()));

        let list = stack.pop().unwrap();
        assert!(matches!(list.into_value(), Some(Value::List(items)) if items.len() == 1));
    }

    #[test]
    fn test_scalar_has_no_value() {
        assert!(scalar(b"<title>").into_value().is_none());
        assert_eq!(scalar(b"<ns:title>").name(), "title");
    }
}
