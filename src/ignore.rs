//! Decides which tags never reach the builder.
use crate::{Tag, TagKind};
use std::borrow::Cow;

/// Skips the preamble before the root tag, and unmapped subtrees.
///
/// An ignore window opened by an unmapped tag ends at the first close tag with the same name.
/// Nesting depth is not tracked: a same-named tag nested inside the unmapped subtree ends the
/// window early.
#[derive(Debug, Default)]
pub(crate) struct IgnoreTracker<'src> {
    found_root: bool,
    ignored: Option<IgnoredTag<'src>>,
}

#[derive(Debug)]
struct IgnoredTag<'src> {
    name: Cow<'src, str>,
    self_closed: bool,
}

impl<'src> IgnoreTracker<'src> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `tag` must be skipped. Updates the window as a side effect.
    pub fn should_skip(&mut self, tag: &Tag<'src>, root_name: &str) -> bool {
        if !self.found_root {
            if tag.name() == root_name {
                self.found_root = true;
                return false;
            }
            return true;
        }

        let Some(ignored) = &self.ignored else {
            return false;
        };

        // The matching close tag ends the window, and is itself skipped
        if tag.kind() == TagKind::Close && ignored.name == tag.name() {
            self.ignored = None;
            return true;
        }

        // A self-closed tag has no subtree; the window is already over
        if ignored.self_closed {
            self.ignored = None;
            return false;
        }

        true
    }

    /// Open an ignore window at `tag`.
    pub fn ignore(&mut self, tag: &Tag<'src>) {
        self.ignored = Some(IgnoredTag {
            name: tag.name(),
            self_closed: tag.kind() == TagKind::SelfClosed,
        });
    }

    #[cfg(test)]
    pub fn is_ignoring(&self) -> bool {
        self.ignored.is_some()
    }

    pub fn found_root(&self) -> bool {
        self.found_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scanner;

    /// Names of the tags that survive filtering; `unmapped` tags open an ignore window.
    fn surviving(src: &str, root: &str, unmapped: &[&str]) -> Vec<String> {
        let mut tracker = IgnoreTracker::new();
        let mut out = vec![];
        for tag in Scanner::new(src.as_bytes()) {
            if tracker.should_skip(&tag, root) {
                continue;
            }
            if tag.kind().is_opening() && unmapped.contains(&tag.name().as_ref()) {
                tracker.ignore(&tag);
                continue;
            }
            out.push(format!("{}{}", if tag.kind() == TagKind::Close { "/" } else { "" }, tag.name()));
        }
        out
    }

    #[test]
    fn test_preamble_skipped() {
        let tags = surviving("<?xml version=\"1.0\"?><Envelope><Root><a/></Root>", "Root", &[]);
        assert_eq!(tags, ["Root", "a", "/Root"]);
    }

    #[test]
    fn test_root_never_found() {
        let mut tracker = IgnoreTracker::new();
        for tag in Scanner::new(b"<a><b/></a>") {
            assert!(tracker.should_skip(&tag, "Root"));
        }
        assert!(!tracker.found_root());
    }

    #[test]
    fn test_unmapped_subtree_skipped() {
        let tags = surviving("<Root><x><y>1</y><z/></x><a>2</a></Root>", "Root", &["x"]);
        assert_eq!(tags, ["Root", "a", "/a", "/Root"]);
    }

    #[test]
    fn test_same_named_child_ends_window_early() {
        let tags = surviving("<Root><x><x>1</x><y/></x></Root>", "Root", &["x"]);
        assert_eq!(tags, ["Root", "y", "/x", "/Root"]);
    }

    #[test]
    fn test_self_closed_window_closes_on_next_tag() {
        let mut tracker = IgnoreTracker::new();
        let mut scanner = Scanner::new(b"<Root><x/><a>");

        let root = scanner.next().unwrap();
        assert!(!tracker.should_skip(&root, "Root"));

        let x = scanner.next().unwrap();
        assert!(!tracker.should_skip(&x, "Root"));
        tracker.ignore(&x);
        assert!(tracker.is_ignoring());

        let a = scanner.next().unwrap();
        assert!(!tracker.should_skip(&a, "Root"));
        assert!(!tracker.is_ignoring());
    }
}
