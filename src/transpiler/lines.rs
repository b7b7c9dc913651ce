/// Line classifier: groups source lines into indentation-delimited blocks
///
/// There is no grammar here. A block is a header line that ends with an
/// opening bracket, and it ends at the first later line that is indented
/// at or below the header and starts with a closing bracket. A body that
/// contains another header at the same depth is mis-split; that is accepted.

use std::ops::Range;

use crate::transpiler::ast::{Block, Entry, OptionsObject, SectionKind};
use crate::transpiler::lexer;

const CLOSERS: [char; 3] = ['}', ')', ']'];

/// Leading whitespace width (a tab counts as one column)
pub fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

pub fn is_closing(line: &str) -> bool {
    line.trim_start().starts_with(CLOSERS)
}

/// True when the line's code (comments aside) ends with an opening bracket
pub fn opens_block(line: &str) -> bool {
    let code = lexer::strip_comments(line);
    code.ends_with('{') || code.ends_with('(') || code.ends_with('[')
}

/// Exclusive body range of the block whose header sits at `header` with
/// indentation `depth`. The range ends at the closing line, or at end of
/// input when no closing line exists.
pub fn block_range(lines: &[&str], header: usize, depth: usize) -> Range<usize> {
    let start = header + 1;
    for (i, line) in lines.iter().enumerate().skip(start) {
        if is_blank(line) {
            continue;
        }
        if indent_of(line) <= depth && is_closing(line) {
            return start..i;
        }
    }
    start..lines.len()
}

/// Indentation of the first code line in `range`
pub fn depth_of(lines: &[&str], range: Range<usize>) -> Option<usize> {
    lines[range]
        .iter()
        .find(|line| !is_blank(line) && !lexer::is_comment_only(line))
        .map(|line| indent_of(line))
}

/// Split an object-literal body into its members.
///
/// The entry depth is taken from the first code line; lines deeper than
/// that belong to the preceding entry, comment lines are skipped.
pub fn entries(lines: &[&str], range: Range<usize>) -> Vec<Entry> {
    let Some(depth) = depth_of(lines, range.clone()) else {
        return Vec::new();
    };

    let mut result = Vec::new();
    let mut i = range.start;
    while i < range.end {
        let line = lines[i];
        if is_blank(line)
            || lexer::is_comment_only(line)
            || indent_of(line) != depth
            || is_closing(line)
        {
            i += 1;
            continue;
        }

        let entry = if opens_block(line) {
            let header_end = header_end(lines, i, depth, range.end);
            let body = block_range(lines, header_end, depth);
            let end = body.end.min(range.end);
            let close = if end < range.end { Some(end) } else { None };
            Entry {
                header: i,
                header_end,
                body: body.start..end,
                close,
                depth,
            }
        } else {
            Entry {
                header: i,
                header_end: i,
                body: i + 1..i + 1,
                close: None,
                depth,
            }
        };

        i = entry.next_line().max(i + 1);
        result.push(entry);
    }

    result
}

/// Last line of a header whose parameter list is split across lines:
/// `genItem (` ... `) {` ends at the `) {` line. Any other header ends
/// where it starts.
fn header_end(lines: &[&str], header: usize, depth: usize, limit: usize) -> usize {
    if !lexer::strip_comments(lines[header]).ends_with('(') {
        return header;
    }
    let params = block_range(lines, header, depth);
    if params.end < limit && lexer::strip_comments(lines[params.end]).ends_with('{') {
        params.end
    } else {
        header
    }
}

/// The header of an entry as one line, comments removed:
/// `genItem (` / `item,` / `) {` becomes `genItem (item,) {`
pub fn header_text(lines: &[&str], entry: &Entry) -> String {
    let mut text = String::new();
    for line in &lines[entry.header..=entry.header_end] {
        let code = lexer::strip_comments(line);
        let code = code.trim();
        if !text.is_empty() && !text.ends_with('(') && !code.starts_with(')') {
            text.push(' ');
        }
        text.push_str(code);
    }
    text
}

/// Key of an object member: `foo: ...`, `foo(...) {`, `async foo(...)`,
/// `'a.b'(...)`, or shorthand `foo,`. Spreads and bare expressions have no key.
pub fn entry_key(line: &str) -> Option<String> {
    let mut rest = line.trim();
    if let Some(stripped) = rest.strip_prefix("async ") {
        rest = stripped.trim_start();
    }
    if let Some(stripped) = rest.strip_prefix('*') {
        rest = stripped.trim_start();
    }

    let (key, after) = match rest.chars().next()? {
        quote @ ('\'' | '"') => {
            let close = rest[1..].find(quote)? + 1;
            (&rest[1..close], &rest[close + 1..])
        }
        _ => {
            let end = rest
                .find(|c: char| !is_ident_char(c))
                .unwrap_or(rest.len());
            (&rest[..end], &rest[end..])
        }
    };

    if key.is_empty() {
        return None;
    }

    let after = after.trim_start();
    if after.is_empty() || after.starts_with([':', '(', ',', '<']) {
        Some(key.to_string())
    } else {
        None
    }
}

pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Locate the component options object: the first unindented default
/// export or component factory call that opens an object. Returns the
/// header's first line and the line holding the opening brace, which
/// differ for `export default mixins(` ... `).extend({`.
pub fn locate_options(lines: &[&str]) -> Option<(usize, usize)> {
    for (i, line) in lines.iter().enumerate() {
        if indent_of(line) != 0 {
            continue;
        }
        let code = lexer::strip_comments(line);
        if !is_options_header(&code) {
            continue;
        }
        if code.ends_with('{') {
            return Some((i, i));
        }
        if code.ends_with('(') {
            let args = block_range(lines, i, 0);
            let opens = lines
                .get(args.end)
                .is_some_and(|close| lexer::strip_comments(close).ends_with('{'));
            if opens {
                return Some((i, args.end));
            }
        }
    }
    None
}

fn is_options_header(code: &str) -> bool {
    code.starts_with("export default")
        || code.contains("defineComponent(")
        || code.contains("Vue.extend(")
        || code.contains("Vue.component(")
}

/// Find the options object and classify each of its members
pub fn find_sections(lines: &[&str]) -> Option<OptionsObject> {
    let (head, start) = locate_options(lines)?;
    let body = block_range(lines, start, 0);
    let close = if body.end < lines.len() {
        Some(body.end)
    } else {
        None
    };

    let mut blocks = Vec::new();
    let mut stray = Vec::new();
    for span in entries(lines, body) {
        match entry_key(lines[span.header]) {
            Some(key) => blocks.push(Block {
                kind: SectionKind::from_key(&key),
                key,
                span,
            }),
            None => stray.push(span),
        }
    }

    Some(OptionsObject {
        head,
        start,
        close,
        blocks,
        stray,
    })
}

/// Range holding the state entries of a `data` block, and the range of
/// statements preceding them.
///
/// Handles the factory form (`data() { ...; return { ... } }`), the arrow
/// form (`data: () => ({ ... })`) and the bare object (`data: { ... }`).
pub fn state_ranges(lines: &[&str], block: &Block) -> (Range<usize>, Range<usize>) {
    let body = block.span.body.clone();
    let Some(depth) = depth_of(lines, body.clone()) else {
        return (body.start..body.start, body);
    };

    let opener = (body.start..body.end).find(|&i| {
        let line = lines[i];
        indent_of(line) == depth && line.trim_start().starts_with("return") && opens_block(line)
    });

    match opener {
        Some(i) => {
            let inner = block_range(lines, i, depth);
            let end = inner.end.min(body.end);
            (body.start..i, inner.start..end)
        }
        None => (body.start..body.start, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(source: &str) -> Vec<&str> {
        source.lines().collect()
    }

    #[test]
    fn test_block_range_stops_at_closing_line() {
        let lines = split("methods: {\n  a() {\n    x()\n  },\n},\nnext: 1");
        assert_eq!(block_range(&lines, 0, 0), 1..4);
        assert_eq!(block_range(&lines, 1, 2), 2..3);
    }

    #[test]
    fn test_block_range_without_close_runs_to_end() {
        let lines = split("a: {\n  b: 1");
        assert_eq!(block_range(&lines, 0, 0), 1..2);
    }

    #[test]
    fn test_opens_block_ignores_trailing_comment() {
        assert!(opens_block("  mounted() { // start"));
        assert!(opens_block("  items: ["));
        assert!(!opens_block("  count: 0,"));
        assert!(!opens_block("  label: '{',"));
    }

    #[test]
    fn test_entries_single_and_multi_line() {
        let lines = split(
            "  count: 0,\n  items: [\n    1,\n  ],\n  // note\n  open: false,",
        );
        let found = entries(&lines, 0..lines.len());
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].header, 0);
        assert!(found[0].is_single_line());
        assert_eq!(found[1].header, 1);
        assert_eq!(found[1].body, 2..3);
        assert_eq!(found[1].close, Some(3));
        assert_eq!(found[2].header, 5);
    }

    #[test]
    fn test_get_set_followed_by_declaration() {
        let lines = split(
            "    value: {\n      get() {\n        return 1\n      },\n      set(v) {\n      },\n    },\n    other() {\n      return 2\n    },",
        );
        let found = entries(&lines, 0..lines.len());
        let keys: Vec<_> = found
            .iter()
            .map(|e| entry_key(lines[e.header]).unwrap())
            .collect();
        assert_eq!(keys, vec!["value", "other"]);
        assert_eq!(found[0].close, Some(6));
    }

    #[test]
    fn test_entry_key_forms() {
        assert_eq!(entry_key("count: 0,"), Some("count".to_string()));
        assert_eq!(entry_key("double(): number {"), Some("double".to_string()));
        assert_eq!(entry_key("async load(id) {"), Some("load".to_string()));
        assert_eq!(entry_key("'a.b'(val) {"), Some("a.b".to_string()));
        assert_eq!(entry_key("$route: {"), Some("$route".to_string()));
        assert_eq!(entry_key("open,"), Some("open".to_string()));
        assert_eq!(entry_key("...mapGetters(['a']),"), None);
        assert_eq!(entry_key("return {"), None);
    }

    #[test]
    fn test_find_sections() {
        let lines = split(
            "import Vue from 'vue'\n\nexport default Vue.extend({\n  name: 'Counter',\n  data() {\n    return {\n      count: 0,\n    }\n  },\n  mounted() {\n    this.count = 1\n  },\n})",
        );
        let options = find_sections(&lines).unwrap();
        assert_eq!(options.head, 2);
        assert_eq!(options.start, 2);
        assert_eq!(options.close, Some(12));
        let kinds: Vec<_> = options.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Passthrough,
                SectionKind::State,
                SectionKind::Hook(crate::transpiler::ast::Hook::Mounted),
            ]
        );
    }

    #[test]
    fn test_state_ranges_factory_form() {
        let lines = split(
            "  data() {\n    const start = 1\n    return {\n      count: start,\n    }\n  },",
        );
        let block = Block {
            kind: SectionKind::State,
            key: "data".to_string(),
            span: Entry {
                header: 0,
                header_end: 0,
                body: 1..5,
                close: Some(5),
                depth: 2,
            },
        };
        let (prelude, state) = state_ranges(&lines, &block);
        assert_eq!(prelude, 1..2);
        assert_eq!(state, 3..4);
    }

    #[test]
    fn test_state_ranges_arrow_form() {
        let lines = split("  data: () => ({\n    count: 0,\n  }),");
        let block = Block {
            kind: SectionKind::State,
            key: "data".to_string(),
            span: Entry {
                header: 0,
                header_end: 0,
                body: 1..2,
                close: Some(2),
                depth: 2,
            },
        };
        let (prelude, state) = state_ranges(&lines, &block);
        assert!(prelude.is_empty());
        assert_eq!(state, 1..2);
    }

    #[test]
    fn test_split_parameter_list_is_part_of_header() {
        let lines = split(
            "    genItem (\n      item,\n      index,\n    ) {\n      return this.render(item)\n    },\n    next() {\n    },",
        );
        let found = entries(&lines, 0..lines.len());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].header, 0);
        assert_eq!(found[0].header_end, 3);
        assert_eq!(found[0].body, 4..5);
        assert_eq!(found[0].close, Some(5));
        assert_eq!(header_text(&lines, &found[0]), "genItem (item, index,) {");
        assert_eq!(found[1].header, 6);
    }

    #[test]
    fn test_arrow_state_header_is_not_split() {
        let lines = split("  data: () => ({\n    count: 0,\n  }),");
        let found = entries(&lines, 0..lines.len());
        assert_eq!(found[0].header_end, 0);
        assert_eq!(found[0].body, 1..2);
    }

    #[test]
    fn test_locate_multi_line_mixins_header() {
        let lines = split(
            "import mixins from 'util/mixins'\n\nexport default mixins(\n  Colorable,\n  Toggleable,\n).extend({\n  name: 'v-chip',\n})",
        );
        assert_eq!(locate_options(&lines), Some((2, 5)));
        let options = find_sections(&lines).unwrap();
        assert_eq!(options.close, Some(7));
        assert_eq!(options.blocks.len(), 1);
    }

    #[test]
    fn test_unkeyed_members_are_stray() {
        let lines = split(
            "export default {\n  ...mapState([\n    'user',\n  ]),\n  name: 'Profile',\n}",
        );
        let options = find_sections(&lines).unwrap();
        assert_eq!(options.stray.len(), 1);
        assert_eq!(options.stray[0].header, 1);
        assert_eq!(options.stray[0].close, Some(3));
        assert!(options.stray_at(1).is_some());
        assert_eq!(options.blocks[0].key, "name");
    }
}
