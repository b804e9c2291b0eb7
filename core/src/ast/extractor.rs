use crate::ast::flavor::ScriptFlavor;
use crate::ast::parser::SourceParser;
use crate::ast::position::{LineIndex, Range};
use crate::config::ExtractorConfig;
use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

const JSX_ELEMENT: &str = "jsx_element";
const JSX_SELF_CLOSING_ELEMENT: &str = "jsx_self_closing_element";
const JSX_OPENING_ELEMENT: &str = "jsx_opening_element";
const JSX_ATTRIBUTE: &str = "jsx_attribute";
const JSX_EXPRESSION: &str = "jsx_expression";
const JSX_TEXT: &str = "jsx_text";
const HTML_CHARACTER_REFERENCE: &str = "html_character_reference";
const STRING: &str = "string";
const TEMPLATE_STRING: &str = "template_string";
const TEMPLATE_SUBSTITUTION: &str = "template_substitution";

lazy_static! {
    /// First `<` followed by a run that is not `/`, whitespace or `>`.
    static ref TAG_PATTERN: Regex = Regex::new(r"<([^/\s>]+)").unwrap();

    /// One or more `{'..'}`, `{".."}` or {`..`} back to back, nothing else.
    static ref LITERAL_WRAPPER: Regex = Regex::new(
        r#"^(?:\{(?:'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*"|`(?:[^`\\]|\\.)*`)\})+$"#
    )
    .unwrap();
}

/// A text fragment that sits in a UI tree without a text component around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NakedText {
    pub text: String,
    pub range: Range,
}

/// Parses `content` as `flavor` and returns every naked text fragment in
/// document order.
///
/// Syntax errors never fail the call; the malformed region just contributes
/// nothing. The only error is a flavor without a grammar.
pub fn extract_all_naked_texts(
    content: &str,
    flavor: ScriptFlavor,
    config: &ExtractorConfig,
) -> Result<Vec<NakedText>> {
    let mut parser = SourceParser::new(flavor)?;
    let tree = parser.parse(content)?;

    let extractor = Extractor {
        source: content,
        config,
        lines: LineIndex::new(content),
    };
    Ok(extractor.collect(tree.root_node()))
}

/// A text-bearing span under test: either one string literal or a run of
/// adjacent JSX text pieces, anchored at its first node.
#[derive(Clone, Copy)]
struct Candidate<'t> {
    node: Node<'t>,
    start: usize,
    end: usize,
}

impl<'t> Candidate<'t> {
    fn new(node: Node<'t>) -> Self {
        Self {
            node,
            start: node.start_byte(),
            end: node.end_byte(),
        }
    }
}

enum Visit<'t> {
    Node(Node<'t>),
    Run(Candidate<'t>),
}

struct Extractor<'a> {
    source: &'a str,
    config: &'a ExtractorConfig,
    lines: LineIndex<'a>,
}

impl<'a> Extractor<'a> {
    /// Pre-order walk with an explicit stack; siblings stay left to right.
    fn collect(&self, root: Node) -> Vec<NakedText> {
        let mut found = Vec::new();
        let mut stack = vec![Visit::Node(root)];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Run(run) => self.check(run, &mut found),
                Visit::Node(node) => {
                    if is_string_like(node) {
                        self.check(Candidate::new(node), &mut found);
                    }
                    let children = child_visits(node);
                    stack.extend(children.into_iter().rev());
                }
            }
        }

        found
    }

    fn check(&self, candidate: Candidate, found: &mut Vec<NakedText>) {
        if !self.is_naked_text(candidate) {
            return;
        }

        // Unreachable after the whitespace rule; skip rather than emit a bad range.
        let Some((start, end)) = trimmed_span(self.source, candidate.start, candidate.end) else {
            return;
        };

        found.push(NakedText {
            text: self.source[start..end].to_string(),
            range: Range::new(self.lines.position(start), self.lines.position(end)),
        });
    }

    fn is_naked_text(&self, candidate: Candidate) -> bool {
        if !has_ui_tree_ancestor(candidate.node) {
            return false;
        }

        if is_inside_attribute(candidate.node) {
            return false;
        }

        if self.is_within_exempt_tag(candidate) {
            return false;
        }

        let text = self.text(candidate).trim();
        if text.is_empty() {
            return false;
        }

        let wrapper = self.wrapper_text(candidate).trim();
        if wrapper.starts_with('{') && wrapper.ends_with('}') && is_literal_wrapper(wrapper) {
            return false;
        }

        true
    }

    fn is_within_exempt_tag(&self, candidate: Candidate) -> bool {
        let exempt = |name: Option<&str>| name.map_or(false, |n| self.config.is_exempt(n));

        if exempt(sniff_tag(self.text(candidate))) {
            return true;
        }

        let Some(parent) = candidate.node.parent() else {
            return false;
        };

        if exempt(tag_name(parent, self.source)) {
            return true;
        }

        // A literal one level down inside `{...}` belongs to the grandparent's tag.
        if is_literal_wrapper(node_text(parent, self.source).trim()) {
            if let Some(grandparent) = parent.parent() {
                if exempt(tag_name(grandparent, self.source)) {
                    return true;
                }
            }
        }

        nearest_element(parent).map_or(false, |element| exempt(element_name(element, self.source)))
    }

    fn text(&self, candidate: Candidate) -> &'a str {
        &self.source[candidate.start..candidate.end]
    }

    /// The `{...}` container a string literal sits in directly, if any.
    fn wrapper_text(&self, candidate: Candidate) -> &'a str {
        if is_string_like(candidate.node) {
            if let Some(parent) = candidate.node.parent() {
                if parent.kind() == JSX_EXPRESSION {
                    return node_text(parent, self.source);
                }
            }
        }
        self.text(candidate)
    }
}

/// Children of `node` to visit, with adjacent JSX text pieces merged into
/// one run. The grammar splits text at line breaks and entities.
fn child_visits<'t>(node: Node<'t>) -> Vec<Visit<'t>> {
    let mut visits: Vec<Visit<'t>> = Vec::new();
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        if !is_text_piece(child) {
            visits.push(Visit::Node(child));
            continue;
        }
        if let Some(Visit::Run(run)) = visits.last_mut() {
            run.end = child.end_byte();
            continue;
        }
        visits.push(Visit::Run(Candidate::new(child)));
    }

    visits
}

fn is_text_piece(node: Node) -> bool {
    node.is_named() && matches!(node.kind(), JSX_TEXT | HTML_CHARACTER_REFERENCE)
}

/// String literals and template literals without substitutions.
fn is_string_like(node: Node) -> bool {
    if !node.is_named() {
        return false;
    }
    match node.kind() {
        STRING => true,
        TEMPLATE_STRING => {
            let mut cursor = node.walk();
            let has_substitution = node
                .named_children(&mut cursor)
                .any(|child| child.kind() == TEMPLATE_SUBSTITUTION);
            !has_substitution
        }
        _ => false,
    }
}

/// Named elements and self-closing elements. A fragment is a `jsx_element`
/// whose opening tag has no name, and does not count.
fn is_ui_element(node: Node) -> bool {
    match node.kind() {
        JSX_SELF_CLOSING_ELEMENT => true,
        JSX_ELEMENT => opening_element(node)
            .and_then(|opening| opening.child_by_field_name("name"))
            .is_some(),
        _ => false,
    }
}

fn is_element_or_fragment(node: Node) -> bool {
    matches!(node.kind(), JSX_ELEMENT | JSX_SELF_CLOSING_ELEMENT)
}

fn opening_element(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let opening = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == JSX_OPENING_ELEMENT);
    opening
}

fn has_ui_tree_ancestor(node: Node) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if is_ui_element(n) {
            return true;
        }
        current = n.parent();
    }
    false
}

/// Attribute values, spread attributes and tag names all live inside an
/// opening or self-closing tag.
fn is_inside_attribute(node: Node) -> bool {
    if node.kind() == JSX_ATTRIBUTE {
        return true;
    }
    let mut current = node.parent();
    while let Some(n) = current {
        if matches!(
            n.kind(),
            JSX_ATTRIBUTE | JSX_OPENING_ELEMENT | JSX_SELF_CLOSING_ELEMENT
        ) {
            return true;
        }
        current = n.parent();
    }
    false
}

fn nearest_element(node: Node) -> Option<Node> {
    let mut current = Some(node);
    while let Some(n) = current {
        if is_ui_element(n) {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

/// Structural tag name of an element; `None` for fragments.
fn element_name<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    let tag = match node.kind() {
        JSX_SELF_CLOSING_ELEMENT => node,
        JSX_ELEMENT => opening_element(node)?,
        _ => return None,
    };
    tag.child_by_field_name("name")
        .map(|name| node_text(name, source))
}

/// Elements report their parsed name; anything else falls back to sniffing
/// its source text.
fn tag_name<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    if is_element_or_fragment(node) {
        element_name(node, source)
    } else {
        sniff_tag(node_text(node, source))
    }
}

fn sniff_tag(text: &str) -> Option<&str> {
    TAG_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn is_literal_wrapper(text: &str) -> bool {
    LITERAL_WRAPPER.is_match(text)
}

fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// Narrows `[start, end)` to its first and last non-whitespace characters.
/// The returned end is exclusive.
fn trimmed_span(source: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let slice = &source[start..end];
    let (first, _) = slice.char_indices().find(|(_, c)| !c.is_whitespace())?;
    let (last, ch) = slice.char_indices().rev().find(|(_, c)| !c.is_whitespace())?;
    Some((start + first, start + last + ch.len_utf8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::position::Position;
    use crate::error::CoreError;

    fn extract(content: &str) -> Vec<NakedText> {
        extract_all_naked_texts(content, ScriptFlavor::Jsx, &ExtractorConfig::default()).unwrap()
    }

    fn texts(content: &str) -> Vec<String> {
        extract(content).into_iter().map(|n| n.text).collect()
    }

    #[test]
    fn trims_surrounding_whitespace_from_range() {
        let found = extract("const a = <View>  hello world  </View>;");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "hello world");
        assert_eq!(found[0].range.start, Position::new(0, 18));
        assert_eq!(found[0].range.end, Position::new(0, 29));
    }

    #[test]
    fn exempts_quoted_literal_wrapper() {
        assert!(extract("const a = <View>{'ok'}</View>;").is_empty());
        assert!(extract("const a = <View>{\"ok\"}</View>;").is_empty());
        assert!(extract("const a = <View>{`ok`}</View>;").is_empty());
        assert!(extract("const a = <View>{'a'}{\"b\"}</View>;").is_empty());
    }

    #[test]
    fn reports_only_text_outside_text_component() {
        let found = texts("const a = <Row><Text>Hello</Text><View>World</View></Row>;");
        assert_eq!(found, vec!["World"]);
    }

    #[test]
    fn fragment_alone_is_not_a_ui_tree() {
        assert!(extract("const a = <>loose</>;").is_empty());
        assert!(extract("const a = <><Text>Hello</Text>loose</>;").is_empty());
        assert!(extract("const a = <>{'x' + 'y'}</>;").is_empty());
    }

    #[test]
    fn fragment_inside_element_is_reported_through_element() {
        assert_eq!(texts("const a = <View><>x</></View>;"), vec!["x"]);
        assert_eq!(
            texts("const a = <><View>inner</View>outer</>;"),
            vec!["inner"]
        );
    }

    #[test]
    fn whitespace_only_text_is_never_reported() {
        assert!(extract("const a = <View>   \n\t  </View>;").is_empty());
        assert!(extract("const a = (\n  <View>\n\n  </View>\n);\n").is_empty());
        assert!(extract("const a = <View>{'   '}</View>;").is_empty());
    }

    #[test]
    fn attribute_values_are_never_reported() {
        let content = r#"
const a = (
  <View title="Hello" label={'World'} style={{ name: 'x' }}>
    <Image {...{ alt: 'Logo' }} source={cond ? 'a.png' : "b.png"} />
    <Button icon={<Label>Go</Label>} />
  </View>
);
"#;
        assert!(extract(content).is_empty());
    }

    #[test]
    fn literals_nested_in_text_component_are_exempt() {
        assert!(extract("const a = <Text>{\"hi\"}</Text>;").is_empty());
        assert!(extract("const a = <Text>{cond ? 'yes' : 'no'}</Text>;").is_empty());
        assert!(extract("const a = <TextComponent>Plain</TextComponent>;").is_empty());
    }

    #[test]
    fn literals_in_expressions_outside_text_are_reported() {
        let found = texts("const a = <View>{cond ? 'yes' : 'no'}</View>;");
        assert_eq!(found, vec!["'yes'", "'no'"]);
    }

    #[test]
    fn nearest_element_decides_exemption() {
        assert_eq!(
            texts("const a = <Text><View>inner</View></Text>;"),
            vec!["inner"]
        );
    }

    #[test]
    fn strings_outside_ui_trees_are_ignored() {
        let content = "import x from 'y';\nconst s = 'hello';\nfunction f() { return `x`; }\n";
        assert!(extract(content).is_empty());
    }

    #[test]
    fn multiline_text_is_one_finding() {
        let content = "const a = (\n  <View>\n    Hello\n    world\n  </View>\n);\n";
        let found = extract(content);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Hello\n    world");
        assert_eq!(found[0].range.start, Position::new(2, 4));
        assert_eq!(found[0].range.end, Position::new(3, 9));
    }

    #[test]
    fn entities_stay_inside_the_text_run() {
        assert_eq!(
            texts("const a = <View>Tom &amp; Jerry</View>;"),
            vec!["Tom &amp; Jerry"]
        );
    }

    #[test]
    fn spacer_literal_does_not_hide_neighbouring_text() {
        assert_eq!(texts("const a = <View>{' '}text</View>;"), vec!["text"]);
    }

    #[test]
    fn template_with_substitution_is_not_a_literal() {
        assert!(extract("const a = <View>{`Hi ${name}`}</View>;").is_empty());
    }

    #[test]
    fn findings_are_in_document_order() {
        let content = r#"
const a = (
  <View>
    First
    <Row>{'x' + 'y'}</Row>
    <Text>skip</Text>
    Last
  </View>
);
"#;
        let found = extract(content);
        let found_texts: Vec<&str> = found.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(found_texts, vec!["First", "'x'", "'y'", "Last"]);
        for pair in found.windows(2) {
            assert!(pair[0].range.start <= pair[1].range.start);
        }
    }

    #[test]
    fn extraction_is_idempotent() {
        let content = "const a = <View>One<Row>Two</Row></View>;";
        assert_eq!(extract(content), extract(content));
    }

    #[test]
    fn malformed_region_does_not_hide_other_findings() {
        let content = "const ok = <View>Visible</View>;\nconst broken = ;\n";
        assert!(texts(content).contains(&"Visible".to_string()));
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let found = extract("const é = <View>日本</View>;");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range.start, Position::new(0, 16));
        assert_eq!(found[0].range.end, Position::new(0, 18));
    }

    #[test]
    fn exempt_tags_come_from_config() {
        let content = "const a = <Heading>Title</Heading>;";
        assert_eq!(texts(content), vec!["Title"]);

        let config = ExtractorConfig::with_exempt_tags(["Heading"]);
        let found = extract_all_naked_texts(content, ScriptFlavor::Jsx, &config).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn parses_tsx() {
        let content = "const App = (): JSX.Element => <View>Typed</View>;\nlet s: string = 'x';\n";
        let found =
            extract_all_naked_texts(content, ScriptFlavor::Tsx, &ExtractorConfig::default())
                .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Typed");
    }

    #[test]
    fn unsupported_flavor_fails() {
        let result =
            extract_all_naked_texts("{}", ScriptFlavor::Json, &ExtractorConfig::default());
        assert!(matches!(result, Err(CoreError::UnsupportedFlavor(_))));
    }

    #[test]
    fn trimmed_span_handles_whitespace_only() {
        assert_eq!(trimmed_span("  \n\t ", 0, 5), None);
        assert_eq!(trimmed_span("a  bc  d", 2, 7), Some((3, 5)));
    }

    #[test]
    fn literal_wrapper_shape() {
        assert!(is_literal_wrapper("{'ok'}"));
        assert!(is_literal_wrapper("{'a'}{\"b\"}{`c`}"));
        assert!(is_literal_wrapper(r"{'it\'s'}"));
        assert!(!is_literal_wrapper("{'a' + 'b'}"));
        assert!(!is_literal_wrapper("{name}"));
        assert!(!is_literal_wrapper("x{'a'}"));
    }

    #[test]
    fn sniffs_first_tag_name() {
        assert_eq!(sniff_tag("<Text>hi</Text>"), Some("Text"));
        assert_eq!(sniff_tag("</Close><Open a=1>"), Some("Open"));
        assert_eq!(sniff_tag("no tags"), None);
    }
}
