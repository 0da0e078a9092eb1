//! Splicing generated code into files that already exist.
//!
//! Two strategies:
//!
//! - [`ClassDocument`] parses a PHP class file into sections (head with
//!   imports, declaration, keyed members, tail) and merges by key. Used for
//!   controllers, which users edit.
//! - [`find_route_group`] and [`splice_into_group`] locate the
//!   `Route::prefix(...)->group(function () { ... });` block of one version
//!   in the routes file and add a line just before its closing `});`.
//!
//! Neither ever writes; callers get the new text back and decide.

use std::ops::Range;

use regex::Regex;

/// A member of a class body, keyed by its method, property or constant name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub key: String,
    pub text: String,
}

/// A PHP class file split into named sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDocument {
    /// Everything before the class declaration: `<?php`, namespace, imports.
    head: String,
    /// `class Name extends Parent ... {`
    declaration: String,
    /// Text between the opening brace and the closing brace.
    body: String,
    /// The closing brace and whatever follows it.
    tail: String,
}

impl ClassDocument {
    /// Split `source` around the declaration of `class_name`.
    ///
    /// Returns `None` if the declaration or its closing brace is missing.
    pub fn parse(source: &str, class_name: &str) -> Option<ClassDocument> {
        let pattern = format!(
            r"(?m)^[ \t]*(?:(?:final|abstract|readonly)[ \t]+)*class[ \t]+{}\b[^{{]*\{{",
            regex::escape(class_name)
        );
        let re = Regex::new(&pattern).ok()?;
        let found = re.find(source)?;
        let rest = &source[found.end()..];
        let close = rest.rfind('}')?;
        Some(ClassDocument {
            head: source[..found.start()].to_string(),
            declaration: found.as_str().to_string(),
            body: rest[..close].to_string(),
            tail: rest[close..].to_string(),
        })
    }

    /// Top-level `use` statements in the head, trimmed.
    pub fn imports(&self) -> Vec<&str> {
        self.head
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("use ") && line.ends_with(';'))
            .collect()
    }

    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    pub fn members(&self) -> Vec<Member> {
        split_members(&self.body)
    }

    /// Merge `generated` into `self`. Returns `true` if anything changed.
    ///
    /// Existing members win over generated ones with the same key; the
    /// declaration is only replaced when it does not already extend the
    /// generated parent class.
    pub fn merge(&mut self, generated: &ClassDocument) -> bool {
        let mut changed = false;

        let existing: Vec<String> = self.imports().into_iter().map(str::to_string).collect();
        let missing: Vec<&str> = generated
            .imports()
            .into_iter()
            .filter(|import| !existing.iter().any(|e| e == import))
            .collect();
        if !missing.is_empty() {
            self.head = insert_imports(&self.head, &missing);
            changed = true;
        }

        if let Some(parent) = parent_class(&generated.declaration) {
            if parent_class(&self.declaration) != Some(parent) {
                let indent: String = self
                    .declaration
                    .chars()
                    .take_while(|c| *c == ' ' || *c == '\t')
                    .collect();
                self.declaration = format!("{indent}{}", generated.declaration.trim_start());
                changed = true;
            }
        }

        if is_placeholder_body(&self.body) {
            if self.body != generated.body {
                self.body = generated.body.clone();
                changed = true;
            }
            return changed;
        }

        let present: Vec<String> = split_members(&self.body).into_iter().map(|m| m.key).collect();
        let additions: Vec<Member> = generated
            .members()
            .into_iter()
            .filter(|m| !present.contains(&m.key))
            .collect();
        if !additions.is_empty() {
            let mut body = self.body.trim_end().to_string();
            for member in &additions {
                body.push_str("\n\n    ");
                body.push_str(member.text.trim());
            }
            body.push('\n');
            self.body = body;
            changed = true;
        }

        changed
    }

    pub fn render(&self) -> String {
        format!("{}{}{}{}", self.head, self.declaration, self.body, self.tail)
    }
}

fn parent_class(declaration: &str) -> Option<&str> {
    let mut words = declaration.split_whitespace();
    words.find(|w| *w == "extends")?;
    words.next().map(|w| w.trim_end_matches('{'))
}

/// Empty, or only the `//` placeholder framework stubs ship with.
fn is_placeholder_body(body: &str) -> bool {
    body.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line == "//")
}

/// Add `imports` after the last existing import, or after the namespace
/// statement if there is none.
fn insert_imports(head: &str, imports: &[&str]) -> String {
    let lines: Vec<&str> = head.lines().collect();
    let block = imports.join("\n");

    let last_use = lines
        .iter()
        .rposition(|l| l.trim_start().starts_with("use ") && l.trim_end().ends_with(';'));
    let namespace = lines
        .iter()
        .position(|l| l.trim_start().starts_with("namespace "));
    let opening = lines.iter().position(|l| l.trim_start().starts_with("<?php"));

    let mut out: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    match (last_use, namespace.or(opening)) {
        (Some(idx), _) => out.insert(idx + 1, block),
        (None, Some(idx)) => {
            out.insert(idx + 1, String::new());
            out.insert(idx + 2, block);
        }
        (None, None) => out.insert(0, block),
    }

    let mut joined = out.join("\n");
    if head.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

/// Split a class body into top-level members by brace depth.
///
/// A member ends at a `;` or a closing `}` at depth zero. String literals and
/// comments are skipped so braces inside them do not count.
pub fn split_members(body: &str) -> Vec<Member> {
    let mut members = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut chars = body.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\'' | '"' => {
                let mut escaped = false;
                for (_, n) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if n == '\\' {
                        escaped = true;
                    } else if n == c {
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                for (_, n) in chars.by_ref() {
                    if n == '\n' {
                        break;
                    }
                }
            }
            '#' => {
                for (_, n) in chars.by_ref() {
                    if n == '\n' {
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut prev = '\0';
                for (_, n) in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    push_member(&mut members, &body[start..=i]);
                    start = i + 1;
                }
            }
            ';' if depth == 0 => {
                push_member(&mut members, &body[start..=i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    members
}

fn push_member(members: &mut Vec<Member>, text: &str) {
    let text = strip_leading_comments(text);
    if text.is_empty() {
        return;
    }
    members.push(Member {
        key: member_key(&text),
        text,
    });
}

/// Drop blank lines and `//` comment lines ahead of a member, keeping
/// docblocks attached to it.
fn strip_leading_comments(text: &str) -> String {
    let mut lines = text.lines().peekable();
    while let Some(line) = lines.peek() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with('#') {
            lines.next();
        } else {
            break;
        }
    }
    lines.collect::<Vec<_>>().join("\n").trim().to_string()
}

fn member_key(text: &str) -> String {
    let words: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == '(' || c == '=' || c == ';')
        .filter(|w| !w.is_empty())
        .collect();

    if let Some(pos) = words.iter().position(|w| *w == "function") {
        if let Some(name) = words.get(pos + 1) {
            return format!("function:{}", name.trim_start_matches('&'));
        }
    }
    if let Some(pos) = words.iter().position(|w| *w == "const") {
        if let Some(name) = words.get(pos + 1) {
            return format!("const:{name}");
        }
    }
    if words.first() == Some(&"use") {
        return format!("use:{}", words[1..].join(" "));
    }
    if let Some(prop) = words.iter().find(|w| w.starts_with('$')) {
        return format!("property:{}", prop.trim_start_matches('$'));
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A route group located in a routes file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGroup {
    /// From just after the opening `{` up to the closing `}`.
    pub body: Range<usize>,
}

/// Outcome of [`find_route_group`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupLookup {
    Found(RouteGroup),
    /// `opener` does not occur.
    Missing,
    /// `opener` occurs but its closing brace was not found.
    Unclosed,
}

/// Find the group whose opening line (ending in `{`) is the first match of
/// `opener`, and its matching closing brace.
pub fn find_route_group(source: &str, opener: &Regex) -> GroupLookup {
    let Some(found) = opener.find(source) else {
        return GroupLookup::Missing;
    };
    match closing_brace(source, found.end()) {
        Some(close) => GroupLookup::Found(RouteGroup {
            body: found.end()..close,
        }),
        None => GroupLookup::Unclosed,
    }
}

/// Insert `line`, indented by four spaces, as the last statement of `group`.
pub fn splice_into_group(source: &str, group: &RouteGroup, line: &str) -> String {
    let close = group.body.end;
    let line_start = source[..close].rfind('\n').map_or(0, |i| i + 1);
    let mut out = String::with_capacity(source.len() + line.len() + 6);
    if line_start >= group.body.start && source[line_start..close].trim().is_empty() {
        out.push_str(&source[..line_start]);
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
        out.push_str(&source[line_start..]);
    } else {
        out.push_str(&source[..close]);
        out.push_str("\n    ");
        out.push_str(line);
        out.push('\n');
        out.push_str(&source[close..]);
    }
    out
}

/// Index of the `}` closing a block whose `{` ends just before `from`.
/// Braces inside strings and comments do not count.
fn closing_brace(source: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut chars = source[from..].char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\'' | '"' => {
                let mut escaped = false;
                for (_, n) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if n == '\\' {
                        escaped = true;
                    } else if n == c {
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                for (_, n) in chars.by_ref() {
                    if n == '\n' {
                        break;
                    }
                }
            }
            '#' => {
                for (_, n) in chars.by_ref() {
                    if n == '\n' {
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut prev = '\0';
                for (_, n) in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUB: &str = "<?php\n\nnamespace App\\Http\\Controllers\\Api\\V1;\n\nuse App\\Http\\Controllers\\Controller;\nuse Illuminate\\Http\\Request;\n\nclass OrderControllerV1 extends Controller\n{\n    //\n}\n";

    const GENERATED: &str = "<?php\n\nnamespace App\\Http\\Controllers\\Api\\V1;\n\nuse App\\Models\\Order;\nuse App\\Services\\Api\\V1\\OrderServiceV1;\n\nclass OrderControllerV1 extends ApiControllerV1\n{\n    public function __construct(private OrderServiceV1 $orderService) {}\n\n    public function index()\n    {\n        if (true) {\n            return 'a}';\n        }\n    }\n\n    public function destroy(Order $order)\n    {\n        return null;\n    }\n}\n";

    #[test]
    fn parse_sections() {
        let doc = ClassDocument::parse(STUB, "OrderControllerV1").unwrap();
        assert_eq!(
            doc.imports(),
            vec!["use App\\Http\\Controllers\\Controller;", "use Illuminate\\Http\\Request;"]
        );
        assert_eq!(doc.declaration(), "class OrderControllerV1 extends Controller\n{");
        assert_eq!(doc.render(), STUB);
    }

    #[test]
    fn parse_requires_declaration() {
        assert!(ClassDocument::parse(STUB, "CustomerControllerV1").is_none());
        assert!(ClassDocument::parse("<?php\n// class OrderControllerV1Extra {}\n", "OrderControllerV1").is_none());
    }

    #[test]
    fn members_split_by_depth() {
        let doc = ClassDocument::parse(GENERATED, "OrderControllerV1").unwrap();
        let keys: Vec<String> = doc.members().into_iter().map(|m| m.key).collect();
        assert_eq!(keys, vec!["function:__construct", "function:index", "function:destroy"]);
    }

    #[test]
    fn member_keys() {
        let members = split_members(
            "\n    use ApiResponses;\n    const RELATIONS = [];\n    protected array $sortable = ['a' => 'b'];\n    // note\n    public function show() {}\n",
        );
        let keys: Vec<&str> = members.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["use:ApiResponses", "const:RELATIONS", "property:sortable", "function:show"]
        );
    }

    #[test]
    fn merge_into_placeholder_stub() {
        let mut doc = ClassDocument::parse(STUB, "OrderControllerV1").unwrap();
        let generated = ClassDocument::parse(GENERATED, "OrderControllerV1").unwrap();

        assert!(doc.merge(&generated));
        let out = doc.render();
        assert!(out.contains("use Illuminate\\Http\\Request;\nuse App\\Models\\Order;\nuse App\\Services\\Api\\V1\\OrderServiceV1;\n"));
        assert!(out.contains("class OrderControllerV1 extends ApiControllerV1\n{"));
        assert!(out.contains("public function index()"));
        assert!(!out.contains("    //\n"));

        let mut again = ClassDocument::parse(&out, "OrderControllerV1").unwrap();
        assert!(!again.merge(&generated));
        assert_eq!(again.render(), out);
    }

    #[test]
    fn merge_keeps_user_members() {
        let edited = GENERATED.replace(
            "    public function destroy(Order $order)\n    {\n        return null;\n    }\n",
            "    public function export()\n    {\n        return 'csv';\n    }\n",
        );
        let mut doc = ClassDocument::parse(&edited, "OrderControllerV1").unwrap();
        let generated = ClassDocument::parse(GENERATED, "OrderControllerV1").unwrap();

        assert!(doc.merge(&generated));
        let out = doc.render();
        assert!(out.contains("public function export()"));
        assert!(out.contains("public function destroy(Order $order)"));
        assert_eq!(out.matches("public function index()").count(), 1);
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn imports_added_after_namespace_when_none() {
        let head = "<?php\n\nnamespace App;\n\n";
        let out = insert_imports(head, &["use A\\B;"]);
        assert_eq!(out, "<?php\n\nnamespace App;\n\nuse A\\B;\n\n");
    }

    fn group_opener(prefix: &str) -> Regex {
        Regex::new(&format!(
            r"Route::prefix\(\s*'{}'\s*\)\s*->\s*group\(\s*function\s*\(\s*\)\s*\{{",
            regex::escape(prefix)
        ))
        .unwrap()
    }

    const TWO_GROUPS: &str = "<?php\n\nRoute::prefix('v1')->group(function () {\n    Route::apiResource('orders', A::class);\n});\n\nRoute::prefix('v2')->group(function () {\n    Route::get('/ping', fn () => '}');\n});\n";

    #[test]
    fn splice_into_matching_group_only() {
        let GroupLookup::Found(group) = find_route_group(TWO_GROUPS, &group_opener("v2")) else {
            panic!("v2 group not found");
        };
        assert!(!TWO_GROUPS[group.body.clone()].contains("'orders'"));

        let out = splice_into_group(TWO_GROUPS, &group, "Route::apiResource('orders', B::class);");
        assert_eq!(
            out,
            "<?php\n\nRoute::prefix('v1')->group(function () {\n    Route::apiResource('orders', A::class);\n});\n\nRoute::prefix('v2')->group(function () {\n    Route::get('/ping', fn () => '}');\n    Route::apiResource('orders', B::class);\n});\n"
        );
    }

    #[test]
    fn splice_into_one_line_group() {
        let src = "Route::prefix('v1')->group(function () {});\n";
        let GroupLookup::Found(group) = find_route_group(src, &group_opener("v1")) else {
            panic!("group not found");
        };
        assert_eq!(
            splice_into_group(src, &group, "Route::get('/a');"),
            "Route::prefix('v1')->group(function () {\n    Route::get('/a');\n});\n"
        );
    }

    #[test]
    fn group_lookup_failures() {
        assert_eq!(find_route_group(TWO_GROUPS, &group_opener("v3")), GroupLookup::Missing);
        assert_eq!(
            find_route_group("Route::prefix('v1')->group(function () {\n", &group_opener("v1")),
            GroupLookup::Unclosed
        );
    }
}
