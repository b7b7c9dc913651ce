/// Line-span types shared by the classifier, analyzer and code generator

use std::ops::Range;

/// Which option of the component object a block holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    State,
    Computed,
    Methods,
    Watch,
    Props,
    Mixins,
    Hook(Hook),
    /// Anything the rewriter carries into the registration block untouched
    /// (`name`, `components`, `emits`, ...)
    Passthrough,
}

impl SectionKind {
    pub fn from_key(key: &str) -> Self {
        match key {
            "data" => SectionKind::State,
            "computed" => SectionKind::Computed,
            "methods" => SectionKind::Methods,
            "watch" => SectionKind::Watch,
            "props" => SectionKind::Props,
            "mixins" => SectionKind::Mixins,
            other => match Hook::from_key(other) {
                Some(hook) => SectionKind::Hook(hook),
                None => SectionKind::Passthrough,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    BeforeCreate,
    Created,
    BeforeMount,
    Mounted,
    BeforeUpdate,
    Updated,
    Activated,
    Deactivated,
    BeforeUnmount,
    Unmounted,
    ErrorCaptured,
}

impl Hook {
    pub fn from_key(key: &str) -> Option<Self> {
        let hook = match key {
            "beforeCreate" => Hook::BeforeCreate,
            "created" => Hook::Created,
            "beforeMount" => Hook::BeforeMount,
            "mounted" => Hook::Mounted,
            "beforeUpdate" => Hook::BeforeUpdate,
            "updated" => Hook::Updated,
            "activated" => Hook::Activated,
            "deactivated" => Hook::Deactivated,
            "beforeDestroy" | "beforeUnmount" => Hook::BeforeUnmount,
            "destroyed" | "unmounted" => Hook::Unmounted,
            "errorCaptured" => Hook::ErrorCaptured,
            _ => return None,
        };
        Some(hook)
    }

    /// Registration function for this hook, or `None` when the body runs
    /// inline in the composable (the creation hooks)
    pub fn registration(&self) -> Option<&'static str> {
        match self {
            Hook::BeforeCreate | Hook::Created => None,
            Hook::BeforeMount => Some("onBeforeMount"),
            Hook::Mounted => Some("onMounted"),
            Hook::BeforeUpdate => Some("onBeforeUpdate"),
            Hook::Updated => Some("onUpdated"),
            Hook::Activated => Some("onActivated"),
            Hook::Deactivated => Some("onDeactivated"),
            Hook::BeforeUnmount => Some("onBeforeUnmount"),
            Hook::Unmounted => Some("onUnmounted"),
            Hook::ErrorCaptured => Some("onErrorCaptured"),
        }
    }
}

/// One member of an object literal, located by indentation.
///
/// `header` is the member's first line and `header_end` its last header
/// line (they differ when a parameter list is split across lines). `body`
/// is the exclusive range of lines after the header up to (not including)
/// its closing line. Single-line members have an empty body and no closing
/// line.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub header: usize,
    pub header_end: usize,
    pub body: Range<usize>,
    pub close: Option<usize>,
    pub depth: usize,
}

impl Entry {
    pub fn is_single_line(&self) -> bool {
        self.body.is_empty() && self.close.is_none()
    }

    /// Index of the first line after this entry
    pub fn next_line(&self) -> usize {
        match self.close {
            Some(close) => close + 1,
            None => self.body.end.max(self.header_end + 1),
        }
    }
}

/// A section of the options object (`data`, `computed`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: SectionKind,
    pub key: String,
    pub span: Entry,
}

impl Block {
    pub fn header(&self) -> usize {
        self.span.header
    }

    pub fn depth(&self) -> usize {
        self.span.depth
    }
}

/// The component options object and its sections
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsObject {
    /// First line of the header, e.g. `export default mixins(`
    pub head: usize,
    /// Line holding the object's opening brace, e.g. `).extend({`
    pub start: usize,
    /// Line holding the object's closing brace, if one was found
    pub close: Option<usize>,
    pub blocks: Vec<Block>,
    /// Members without a key (`...mapState([...])`)
    pub stray: Vec<Entry>,
}

impl OptionsObject {
    pub fn blocks_of(&self, kind: SectionKind) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(move |block| block.kind == kind)
    }

    pub fn block_at(&self, line: usize) -> Option<&Block> {
        self.blocks.iter().find(|block| block.header() == line)
    }

    pub fn stray_at(&self, line: usize) -> Option<&Entry> {
        self.stray.iter().find(|entry| entry.header == line)
    }
}
