//! Selector evaluation over the fixture arena.
//!
//! CSS: tag, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`, descendant and
//! child combinators, comma lists.
//!
//! XPath: `/`, `//`, a leading `.`, `|` unions, name tests (`tag`, `*`) and
//! predicates `[n]`, `[last()]`, `[@a]`, `[@a='v']`, `[text()='v']`,
//! `[.='v']`, `contains(src, 'v')`, `starts-with(src, 'v')` joined by `and`.

use super::{Node, NodeId};

pub(crate) fn document_order(nodes: &[Node], root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        out.push(id);
        for child in nodes[id.0].children.iter().rev() {
            stack.push(*child);
        }
    }
    out
}

fn descendants(nodes: &[Node], scope: NodeId) -> Vec<NodeId> {
    let mut all = document_order(nodes, scope);
    all.remove(0);
    all
}

/// Own text followed by the text of every descendant.
pub(crate) fn text_content(nodes: &[Node], id: NodeId) -> String {
    document_order(nodes, id)
        .into_iter()
        .map(|node| nodes[node.0].text.as_str())
        .collect()
}

pub(crate) fn select_text(nodes: &[Node], scope: NodeId, needle: &str) -> Vec<NodeId> {
    let needle = needle.trim().to_lowercase();
    descendants(nodes, scope)
        .into_iter()
        .filter(|id| {
            let own = nodes[id.0].text.trim().to_lowercase();
            !own.is_empty() && own.contains(&needle)
        })
        .collect()
}

/// Split on `sep` wherever it is outside quotes and brackets.
fn split_outside<'a>(input: &'a str, sep: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut skip_until = 0;

    for (i, ch) in input.char_indices() {
        if i < skip_until {
            continue;
        }
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                '[' | '(' => depth += 1,
                ']' | ')' => depth -= 1,
                _ if depth == 0 && input[i..].starts_with(sep) => {
                    parts.push(&input[start..i]);
                    start = i + sep.len();
                    skip_until = start;
                }
                _ => {}
            },
        }
    }
    parts.push(&input[start..]);
    parts
}

fn unquote(value: &str) -> Option<&str> {
    let value = value.trim();
    for q in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            return Some(&value[1..value.len() - 1]);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// CSS
// ---------------------------------------------------------------------------

pub(crate) fn select_css(
    nodes: &[Node],
    scope: NodeId,
    selector: &str,
) -> Result<Vec<NodeId>, String> {
    let list = split_outside(selector, ",")
        .into_iter()
        .map(parse_complex)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(descendants(nodes, scope)
        .into_iter()
        .filter(|id| list.iter().any(|complex| complex.matches(nodes, *id)))
        .collect())
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
    }

    fn matches(&self, node: &Node) -> bool {
        if node.is_document() {
            return false;
        }
        if let Some(tag) = &self.tag {
            if tag != "*" && !tag.eq_ignore_ascii_case(&node.tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.attrs.get("id") != Some(id) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_attr = node.attrs.get("class").map(String::as_str).unwrap_or("");
            let present: Vec<&str> = class_attr.split_whitespace().collect();
            if !self.classes.iter().all(|c| present.contains(&c.as_str())) {
                return false;
            }
        }
        self.attributes.iter().all(|(name, expected)| {
            match (node.attrs.get(name), expected) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

impl Complex {
    fn matches(&self, nodes: &[Node], id: NodeId) -> bool {
        match self.parts.last() {
            Some((_, compound)) if compound.matches(&nodes[id.0]) => {
                self.matches_from(nodes, id, self.parts.len() - 1)
            }
            _ => false,
        }
    }

    /// `parts[idx]` already matched `id`; check the parts left of it.
    fn matches_from(&self, nodes: &[Node], id: NodeId, idx: usize) -> bool {
        if idx == 0 {
            return true;
        }
        let (combinator, _) = &self.parts[idx];
        let (_, previous) = &self.parts[idx - 1];
        let mut parent = nodes[id.0].parent;

        match combinator {
            Combinator::Child => match parent {
                Some(p) => previous.matches(&nodes[p.0]) && self.matches_from(nodes, p, idx - 1),
                None => false,
            },
            Combinator::Descendant => {
                while let Some(p) = parent {
                    if previous.matches(&nodes[p.0]) && self.matches_from(nodes, p, idx - 1) {
                        return true;
                    }
                    parent = nodes[p.0].parent;
                }
                false
            }
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

fn read_ident(chars: &[char], mut pos: usize) -> (String, usize) {
    let start = pos;
    while pos < chars.len() && is_ident_char(chars[pos]) {
        pos += 1;
    }
    (chars[start..pos].iter().collect(), pos)
}

fn parse_complex(input: &str) -> Result<Complex, String> {
    let chars: Vec<char> = input.trim().chars().collect();
    if chars.is_empty() {
        return Err("empty selector".to_string());
    }

    let mut parts = Vec::new();
    let mut pos = 0;
    while pos < chars.len() {
        let mut combinator = Combinator::Descendant;
        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
        }
        if chars.get(pos) == Some(&'>') {
            if parts.is_empty() {
                return Err(format!("'{}' starts with a combinator", input.trim()));
            }
            combinator = Combinator::Child;
            pos += 1;
            while pos < chars.len() && chars[pos].is_whitespace() {
                pos += 1;
            }
            if pos >= chars.len() {
                return Err(format!("'{}' ends with a combinator", input.trim()));
            }
        }
        let (compound, next) = parse_compound(&chars, pos)?;
        parts.push((combinator, compound));
        pos = next;
    }

    Ok(Complex { parts })
}

fn parse_compound(chars: &[char], mut pos: usize) -> Result<(Compound, usize), String> {
    let mut compound = Compound::default();

    if chars.get(pos) == Some(&'*') {
        compound.tag = Some("*".to_string());
        pos += 1;
    } else {
        let (tag, next) = read_ident(chars, pos);
        if !tag.is_empty() {
            compound.tag = Some(tag);
            pos = next;
        }
    }

    loop {
        match chars.get(pos) {
            Some('#') => {
                let (id, next) = read_ident(chars, pos + 1);
                if id.is_empty() {
                    return Err(format!("empty id at offset {}", pos));
                }
                compound.id = Some(id);
                pos = next;
            }
            Some('.') => {
                let (class, next) = read_ident(chars, pos + 1);
                if class.is_empty() {
                    return Err(format!("empty class at offset {}", pos));
                }
                compound.classes.push(class);
                pos = next;
            }
            Some('[') => {
                pos += 1;
                let start = pos;
                let mut quote: Option<char> = None;
                while pos < chars.len() {
                    let ch = chars[pos];
                    match quote {
                        Some(q) if ch == q => quote = None,
                        Some(_) => {}
                        None if ch == '\'' || ch == '"' => quote = Some(ch),
                        None if ch == ']' => break,
                        None => {}
                    }
                    pos += 1;
                }
                if pos >= chars.len() {
                    return Err("unterminated attribute selector".to_string());
                }
                let body: String = chars[start..pos].iter().collect();
                pos += 1;
                let (name, value) = match body.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim();
                        let value = unquote(value).unwrap_or(value);
                        (name.trim().to_string(), Some(value.to_string()))
                    }
                    None => (body.trim().to_string(), None),
                };
                if name.is_empty() {
                    return Err("attribute selector without a name".to_string());
                }
                compound.attributes.push((name, value));
            }
            _ => break,
        }
    }

    if compound.is_empty() {
        return Err(format!("unexpected character at offset {}", pos));
    }
    match chars.get(pos) {
        None | Some('>') => Ok((compound, pos)),
        Some(ch) if ch.is_whitespace() => Ok((compound, pos)),
        Some(ch) => Err(format!("unexpected '{}' at offset {}", ch, pos)),
    }
}

// ---------------------------------------------------------------------------
// XPath
// ---------------------------------------------------------------------------

/// Absolute paths start from `root` regardless of `context`.
pub(crate) fn select_xpath(
    nodes: &[Node],
    root: NodeId,
    context: NodeId,
    expr: &str,
) -> Result<Vec<NodeId>, String> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err("empty xpath".to_string());
    }

    let mut result = Vec::new();
    for branch in split_outside(expr, "|") {
        result.extend(evaluate_path(nodes, root, context, branch.trim())?);
    }
    sort_in_document_order(nodes, root, &mut result);
    Ok(result)
}

fn sort_in_document_order(nodes: &[Node], root: NodeId, ids: &mut Vec<NodeId>) {
    let order = document_order(nodes, root);
    ids.sort_by_key(|id| order.iter().position(|o| o == id).unwrap_or(usize::MAX));
    ids.dedup();
}

fn evaluate_path(
    nodes: &[Node],
    root: NodeId,
    context: NodeId,
    path: &str,
) -> Result<Vec<NodeId>, String> {
    let (start, rest) = if path.starts_with('/') {
        (root, path.to_string())
    } else if let Some(rest) = path.strip_prefix('.') {
        (context, rest.to_string())
    } else {
        (context, format!("/{}", path))
    };

    let steps = parse_steps(&rest)?;
    let mut current = vec![start];
    for step in &steps {
        let mut next = Vec::new();
        for node in &current {
            for group in step.candidate_groups(nodes, *node) {
                next.extend(step.apply_predicates(nodes, group));
            }
        }
        sort_in_document_order(nodes, root, &mut next);
        current = next;
    }
    Ok(current)
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug)]
struct Step {
    axis: Axis,
    name: String,
    predicates: Vec<Predicate>,
}

#[derive(Debug)]
enum Predicate {
    Position(usize),
    Last,
    Conditions(Vec<Condition>),
}

#[derive(Debug)]
enum Condition {
    Exists(Source),
    Equals(Source, String),
    Contains(Source, String),
    StartsWith(Source, String),
}

#[derive(Debug)]
enum Source {
    Attribute(String),
    Text,
    StringValue,
}

impl Step {
    fn name_matches(&self, node: &Node) -> bool {
        self.name == "*" || self.name.eq_ignore_ascii_case(&node.tag)
    }

    /// Candidates grouped by parent, so positional predicates count siblings.
    fn candidate_groups(&self, nodes: &[Node], node: NodeId) -> Vec<Vec<NodeId>> {
        let parents = match self.axis {
            Axis::Child => vec![node],
            Axis::Descendant => document_order(nodes, node),
        };
        parents
            .into_iter()
            .map(|parent| {
                nodes[parent.0]
                    .children
                    .iter()
                    .copied()
                    .filter(|child| self.name_matches(&nodes[child.0]))
                    .collect()
            })
            .collect()
    }

    fn apply_predicates(&self, nodes: &[Node], mut group: Vec<NodeId>) -> Vec<NodeId> {
        for predicate in &self.predicates {
            group = match predicate {
                Predicate::Position(n) => group.get(n - 1).copied().into_iter().collect(),
                Predicate::Last => group.last().copied().into_iter().collect(),
                Predicate::Conditions(conditions) => group
                    .into_iter()
                    .filter(|id| conditions.iter().all(|c| c.holds(nodes, *id)))
                    .collect(),
            };
        }
        group
    }
}

impl Source {
    fn value(&self, nodes: &[Node], id: NodeId) -> Option<String> {
        let node = &nodes[id.0];
        match self {
            Source::Attribute(name) => node.attrs.get(name).cloned(),
            Source::Text if node.text.is_empty() => None,
            Source::Text => Some(node.text.clone()),
            Source::StringValue => Some(text_content(nodes, id)),
        }
    }
}

impl Condition {
    fn holds(&self, nodes: &[Node], id: NodeId) -> bool {
        match self {
            Condition::Exists(source) => source.value(nodes, id).is_some(),
            Condition::Equals(source, literal) => {
                source.value(nodes, id).as_deref() == Some(literal.as_str())
            }
            Condition::Contains(source, literal) => source
                .value(nodes, id)
                .map_or(false, |value| value.contains(literal.as_str())),
            Condition::StartsWith(source, literal) => source
                .value(nodes, id)
                .map_or(false, |value| value.starts_with(literal.as_str())),
        }
    }
}

/// Index of the next `/` outside brackets and quotes.
fn step_end(input: &str) -> usize {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for (i, ch) in input.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                '[' | '(' => depth += 1,
                ']' | ')' => depth -= 1,
                '/' if depth == 0 => return i,
                _ => {}
            },
        }
    }
    input.len()
}

fn parse_steps(path: &str) -> Result<Vec<Step>, String> {
    let mut steps = Vec::new();
    let mut remaining = path;

    while !remaining.is_empty() {
        let (axis, after) = if let Some(after) = remaining.strip_prefix("//") {
            (Axis::Descendant, after)
        } else if let Some(after) = remaining.strip_prefix('/') {
            (Axis::Child, after)
        } else {
            return Err(format!("unexpected '{}'", remaining));
        };
        let end = step_end(after);
        steps.push(parse_step(axis, &after[..end])?);
        remaining = &after[end..];
    }

    Ok(steps)
}

fn parse_step(axis: Axis, text: &str) -> Result<Step, String> {
    let text = text.trim();
    let name_end = text.find('[').unwrap_or(text.len());
    let name = text[..name_end].trim();
    if name != "*" && (name.is_empty() || !name.chars().all(|c| is_ident_char(c) || c == ':')) {
        return Err(format!("unsupported node test '{}'", name));
    }

    let mut predicates = Vec::new();
    let mut rest = &text[name_end..];
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return Err(format!("unexpected '{}' after node test", rest));
        }
        let close = predicate_end(rest).ok_or_else(|| format!("unterminated predicate '{}'", rest))?;
        predicates.push(parse_predicate(&rest[1..close])?);
        rest = rest[close + 1..].trim_start();
    }

    Ok(Step {
        axis,
        name: name.to_string(),
        predicates,
    })
}

/// Offset of the `]` closing the predicate that opens at offset 0.
fn predicate_end(input: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for (i, ch) in input.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

fn parse_predicate(body: &str) -> Result<Predicate, String> {
    let body = body.trim();
    if let Ok(position) = body.parse::<usize>() {
        if position == 0 {
            return Err("xpath positions start at 1".to_string());
        }
        return Ok(Predicate::Position(position));
    }
    if body == "last()" {
        return Ok(Predicate::Last);
    }
    split_outside(body, " and ")
        .into_iter()
        .map(parse_condition)
        .collect::<Result<Vec<_>, _>>()
        .map(Predicate::Conditions)
}

fn parse_condition(text: &str) -> Result<Condition, String> {
    let text = text.trim();

    if let Some(inner) = function_args(text, "contains") {
        let (source, literal) = two_arguments(text, inner)?;
        return Ok(Condition::Contains(source, literal));
    }
    if let Some(inner) = function_args(text, "starts-with") {
        let (source, literal) = two_arguments(text, inner)?;
        return Ok(Condition::StartsWith(source, literal));
    }

    let sides = split_outside(text, "=");
    match sides.as_slice() {
        [source] => Ok(Condition::Exists(parse_source(source)?)),
        [source, literal] => Ok(Condition::Equals(
            parse_source(source)?,
            parse_literal(literal)?,
        )),
        _ => Err(format!("unsupported predicate '{}'", text)),
    }
}

fn function_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn two_arguments(text: &str, inner: &str) -> Result<(Source, String), String> {
    match split_outside(inner, ",").as_slice() {
        [source, literal] => Ok((parse_source(source)?, parse_literal(literal)?)),
        _ => Err(format!("'{}' expects two arguments", text)),
    }
}

fn parse_source(text: &str) -> Result<Source, String> {
    let text = text.trim();
    match text {
        "text()" => Ok(Source::Text),
        "." => Ok(Source::StringValue),
        _ => match text.strip_prefix('@') {
            Some(name) if !name.is_empty() => Ok(Source::Attribute(name.to_string())),
            _ => Err(format!("unsupported value '{}'", text)),
        },
    }
}

fn parse_literal(text: &str) -> Result<String, String> {
    unquote(text)
        .map(str::to_string)
        .ok_or_else(|| format!("expected a quoted literal, got '{}'", text.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(nodes: &mut Vec<Node>, parent: usize, tag: &str, attrs: &[(&str, &str)], text: &str) -> usize {
        let id = nodes.len();
        let mut node = Node::new(tag);
        node.parent = Some(NodeId(parent));
        node.text = text.to_string();
        for (k, v) in attrs {
            node.attrs.insert(k.to_string(), v.to_string());
        }
        nodes.push(node);
        nodes[parent].children.push(NodeId(id));
        id
    }

    /// ```text
    /// #document
    ///   html > body
    ///     table#results.grid
    ///       tr[data-row=1] > td "alpha", td "1"
    ///       tr[data-row=2] > td "beta",  td "2"
    ///     div.footer > span "Run query"
    /// ```
    fn tree() -> Vec<Node> {
        let mut nodes = vec![Node::new("#document")];
        let html = push(&mut nodes, 0, "html", &[], "");
        let body = push(&mut nodes, html, "body", &[], "");
        let table = push(&mut nodes, body, "table", &[("id", "results"), ("class", "grid wide")], "");
        let r1 = push(&mut nodes, table, "tr", &[("data-row", "1")], "");
        push(&mut nodes, r1, "td", &[], "alpha");
        push(&mut nodes, r1, "td", &[], "1");
        let r2 = push(&mut nodes, table, "tr", &[("data-row", "2")], "");
        push(&mut nodes, r2, "td", &[], "beta");
        push(&mut nodes, r2, "td", &[], "2");
        let footer = push(&mut nodes, body, "div", &[("class", "footer")], "");
        push(&mut nodes, footer, "span", &[("aria-label", "Run")], "Run query");
        nodes
    }

    fn ids(list: &[usize]) -> Vec<NodeId> {
        list.iter().map(|i| NodeId(*i)).collect()
    }

    const ROOT: NodeId = NodeId(0);

    #[test]
    fn css_compounds_and_combinators() {
        let nodes = tree();
        assert_eq!(select_css(&nodes, ROOT, "table#results.grid").unwrap(), ids(&[3]));
        assert_eq!(select_css(&nodes, ROOT, "tr[data-row='2'] td").unwrap(), ids(&[8, 9]));
        assert_eq!(select_css(&nodes, ROOT, "body > div > span").unwrap(), ids(&[11]));
        assert!(select_css(&nodes, ROOT, "body > span").unwrap().is_empty());
        assert_eq!(select_css(&nodes, ROOT, "span, table").unwrap(), ids(&[3, 11]));
        assert_eq!(select_css(&nodes, ROOT, "[aria-label]").unwrap(), ids(&[11]));
    }

    #[test]
    fn css_scope_excludes_the_scope_element() {
        let nodes = tree();
        assert_eq!(select_css(&nodes, NodeId(4), "td").unwrap(), ids(&[5, 6]));
        assert!(select_css(&nodes, NodeId(4), "tr").unwrap().is_empty());
    }

    #[test]
    fn css_rejects_malformed_selectors() {
        let nodes = tree();
        assert!(select_css(&nodes, ROOT, "").is_err());
        assert!(select_css(&nodes, ROOT, "> td").is_err());
        assert!(select_css(&nodes, ROOT, "td >").is_err());
        assert!(select_css(&nodes, ROOT, "td[").is_err());
        assert!(select_css(&nodes, ROOT, "#").is_err());
    }

    #[test]
    fn xpath_absolute_and_descendant_paths() {
        let nodes = tree();
        assert_eq!(select_xpath(&nodes, ROOT, ROOT, "/html/body/table").unwrap(), ids(&[3]));
        assert_eq!(select_xpath(&nodes, ROOT, ROOT, "//td").unwrap(), ids(&[5, 6, 8, 9]));
        assert_eq!(
            select_xpath(&nodes, ROOT, ROOT, "//tr[@data-row='2']/td[1]").unwrap(),
            ids(&[8])
        );
        assert_eq!(select_xpath(&nodes, ROOT, ROOT, "//td[1]").unwrap(), ids(&[5, 8]));
        assert_eq!(select_xpath(&nodes, ROOT, ROOT, "//tr[last()]").unwrap(), ids(&[7]));
    }

    #[test]
    fn xpath_relative_paths_use_the_context_node() {
        let nodes = tree();
        let row = NodeId(7);
        assert_eq!(select_xpath(&nodes, ROOT, row, "./td").unwrap(), ids(&[8, 9]));
        assert_eq!(select_xpath(&nodes, ROOT, row, "td[2]").unwrap(), ids(&[9]));
        assert_eq!(select_xpath(&nodes, ROOT, row, ".//td").unwrap(), ids(&[8, 9]));
        // absolute paths ignore the context
        assert_eq!(select_xpath(&nodes, ROOT, row, "//td").unwrap().len(), 4);
    }

    #[test]
    fn xpath_text_and_function_predicates() {
        let nodes = tree();
        assert_eq!(select_xpath(&nodes, ROOT, ROOT, "//td[text()='beta']").unwrap(), ids(&[8]));
        assert_eq!(
            select_xpath(&nodes, ROOT, ROOT, "//span[contains(text(), 'Run')]").unwrap(),
            ids(&[11])
        );
        assert_eq!(
            select_xpath(&nodes, ROOT, ROOT, "//tr[contains(., 'alpha')]").unwrap(),
            ids(&[4])
        );
        assert_eq!(
            select_xpath(&nodes, ROOT, ROOT, "//*[@class and starts-with(@class, 'grid')]").unwrap(),
            ids(&[3])
        );
        assert_eq!(
            select_xpath(&nodes, ROOT, ROOT, "//span | //table").unwrap(),
            ids(&[3, 11])
        );
    }

    #[test]
    fn xpath_rejects_unsupported_syntax() {
        let nodes = tree();
        assert!(select_xpath(&nodes, ROOT, ROOT, "").is_err());
        assert!(select_xpath(&nodes, ROOT, ROOT, "//td[0]").is_err());
        assert!(select_xpath(&nodes, ROOT, ROOT, "//td[@a=b]").is_err());
        assert!(select_xpath(&nodes, ROOT, ROOT, "//td[").is_err());
    }

    #[test]
    fn text_selector_matches_own_text_case_insensitively() {
        let nodes = tree();
        assert_eq!(select_text(&nodes, ROOT, "run QUERY"), ids(&[11]));
        assert!(select_text(&nodes, ROOT, "nothing").is_empty());
        assert_eq!(text_content(&nodes, NodeId(4)), "alpha1");
    }
}
