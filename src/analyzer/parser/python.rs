use tree_sitter::Node;

use super::{Parser, create_ts_parser, first_syntax_error, get_node_lines, get_node_text};
use crate::constants::scan::SOURCE_SUFFIX;
use crate::types::{FunctionDescriptor, ProflogError, Result};

pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Result<Self> {
        // Validate that the language is available
        let _ = create_ts_parser(tree_sitter_python::LANGUAGE, "Python")?;
        Ok(Self)
    }
}

impl Parser for PythonParser {
    fn parse(&self, path: &str, content: &str) -> Result<Vec<FunctionDescriptor>> {
        let mut parser =
            create_ts_parser(tree_sitter_python::LANGUAGE, "Python").map_err(|mut e| {
                if let ProflogError::Parse {
                    path: ref mut p, ..
                } = e
                {
                    *p = path.to_string();
                }
                e
            })?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| ProflogError::parse(path, "Failed to parse Python file"))?;
        let root = tree.root_node();

        if let Some(node) = first_syntax_error(root) {
            let pos = node.start_position();
            return Err(ProflogError::parse(
                path,
                format!("syntax error at line {}, column {}", pos.row + 1, pos.column + 1),
            ));
        }

        if let Some((node, construct)) = first_rejected_construct(root, content.as_bytes()) {
            let pos = node.start_position();
            return Err(ProflogError::parse(
                path,
                format!(
                    "syntax error at line {}, column {}: {}",
                    pos.row + 1,
                    pos.column + 1,
                    construct
                ),
            ));
        }

        Ok(FunctionCollector::new(content.as_bytes()).collect(root))
    }

    fn file_suffix(&self) -> &'static str {
        SOURCE_SUFFIX
    }
}

/// Node kinds the collector dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyntaxKind {
    ClassDefinition,
    FunctionDefinition,
    DecoratedDefinition,
    Other,
}

impl SyntaxKind {
    fn of(node: Node) -> Self {
        match node.kind() {
            "class_definition" => Self::ClassDefinition,
            "function_definition" => Self::FunctionDefinition,
            "decorated_definition" => Self::DecoratedDefinition,
            _ => Self::Other,
        }
    }
}

/// Immediate syntactic parent of a pending node, as far as methods are concerned.
///
/// A decorated definition is transparent: the definition it wraps inherits
/// the decorator's parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    ClassBody,
    Other,
}

struct FunctionCollector<'s> {
    source: &'s [u8],
    functions: Vec<FunctionDescriptor>,
}

impl<'s> FunctionCollector<'s> {
    fn new(source: &'s [u8]) -> Self {
        Self {
            source,
            functions: Vec::new(),
        }
    }

    /// Pre-order walk with an explicit stack.
    ///
    /// A class emits its direct methods when visited; free functions are
    /// emitted when their own node is visited. Methods reached later through
    /// the class body are skipped, so each definition is emitted once.
    fn collect(mut self, root: Node) -> Vec<FunctionDescriptor> {
        let mut pending = vec![(root, Parent::Other)];

        while let Some((node, parent)) = pending.pop() {
            let mut next = Vec::new();

            match SyntaxKind::of(node) {
                SyntaxKind::ClassDefinition => {
                    let class_name = node
                        .child_by_field_name("name")
                        .map(|n| self.text(n))
                        .unwrap_or_default();
                    let body = node.child_by_field_name("body");

                    if let Some(body) = body {
                        for stmt in named_children(body) {
                            if let Some(func) = function_of(stmt) {
                                self.push(func, Some(class_name.as_str()));
                            }
                        }
                    }

                    for child in named_children(node) {
                        if Some(child) == body {
                            next.extend(
                                named_children(child)
                                    .into_iter()
                                    .map(|stmt| (stmt, Parent::ClassBody)),
                            );
                        } else {
                            next.push((child, Parent::Other));
                        }
                    }
                }
                SyntaxKind::FunctionDefinition => {
                    if parent != Parent::ClassBody {
                        self.push(node, None);
                    }
                    next.extend(
                        named_children(node)
                            .into_iter()
                            .map(|child| (child, Parent::Other)),
                    );
                }
                SyntaxKind::DecoratedDefinition => {
                    let definition = node.child_by_field_name("definition");
                    for child in named_children(node) {
                        let inherited = if Some(child) == definition {
                            parent
                        } else {
                            Parent::Other
                        };
                        next.push((child, inherited));
                    }
                }
                SyntaxKind::Other => {
                    next.extend(
                        named_children(node)
                            .into_iter()
                            .map(|child| (child, Parent::Other)),
                    );
                }
            }

            pending.extend(next.into_iter().rev());
        }

        self.functions
    }

    fn push(&mut self, func: Node, class_name: Option<&str>) {
        let name = func
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_default();
        if name.is_empty() {
            return;
        }

        let (start_line, end_line) = get_node_lines(func);
        let mut cursor = func.walk();
        let is_async = func
            .children(&mut cursor)
            .next()
            .is_some_and(|first| first.kind() == "async");

        let descriptor = FunctionDescriptor {
            name: match class_name {
                Some(class_name) => format!("{}.{}", class_name, name),
                None => name,
            },
            start_line,
            end_line,
            is_method: class_name.is_some(),
            is_async,
            decorators: self.decorators(func),
            args: self.positional_args(func),
            returns: func
                .child_by_field_name("return_type")
                .map(|n| self.text(n)),
        };
        self.functions.push(descriptor);
    }

    /// Bare `@name` decorators; calls and attribute access are dropped.
    fn decorators(&self, func: Node) -> Vec<String> {
        let Some(decorated) = func
            .parent()
            .filter(|p| SyntaxKind::of(*p) == SyntaxKind::DecoratedDefinition)
        else {
            return Vec::new();
        };

        named_children(decorated)
            .into_iter()
            .filter(|n| n.kind() == "decorator")
            .filter_map(|decorator| named_children(decorator).into_iter().next())
            .filter(|expr| expr.kind() == "identifier")
            .map(|expr| self.text(expr))
            .collect()
    }

    /// Positional-or-keyword parameter names.
    ///
    /// Names before `/` are positional-only and dropped; collection stops at
    /// `*`, `*args` or `**kwargs`.
    fn positional_args(&self, func: Node) -> Vec<String> {
        let Some(params) = func.child_by_field_name("parameters") else {
            return Vec::new();
        };

        let mut args = Vec::new();
        for param in named_children(params) {
            match param.kind() {
                "identifier" => args.push(self.text(param)),
                "default_parameter" | "typed_default_parameter" => {
                    if let Some(name) = param
                        .child_by_field_name("name")
                        .filter(|n| n.kind() == "identifier")
                    {
                        args.push(self.text(name));
                    }
                }
                "typed_parameter" => match named_children(param).into_iter().next() {
                    Some(inner) if inner.kind() == "identifier" => args.push(self.text(inner)),
                    _ => break,
                },
                "positional_separator" => args.clear(),
                "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
                _ => {}
            }
        }
        args
    }

    fn text(&self, node: Node) -> String {
        get_node_text(node, self.source).to_string()
    }
}

/// First node the grammar accepts but Python 3 rejects, in pre-order.
///
/// tree-sitter-python still parses Python 2 statements and operators, and its
/// scanner tolerates a dedent that matches no enclosing indentation level.
fn first_rejected_construct<'t>(
    root: Node<'t>,
    source: &[u8],
) -> Option<(Node<'t>, &'static str)> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(found) = rejected_construct(node, source) {
            return Some(found);
        }
        stack.extend(children(node).into_iter().rev());
    }
    None
}

fn rejected_construct<'t>(node: Node<'t>, source: &[u8]) -> Option<(Node<'t>, &'static str)> {
    let construct = match node.kind() {
        "print_statement" => "Python 2 print statement",
        "exec_statement" => "Python 2 exec statement",
        "<>" if !node.is_named() => "Python 2 `<>` operator",
        "except_clause" if children(node).iter().any(|c| c.kind() == ",") => {
            "Python 2 `except X, name` clause"
        }
        "module" | "block" => {
            return misaligned_statement(node, source)
                .map(|stmt| (stmt, "unindent does not match any outer indentation level"));
        }
        _ => return None,
    };
    Some((node, construct))
}

/// A statement that starts its own line at a column other than its siblings'.
///
/// Module statements must start at column 0. Statements sharing a line with a
/// previous one (after `;` or a block header) and comments are not checked.
fn misaligned_statement<'t>(container: Node<'t>, source: &[u8]) -> Option<Node<'t>> {
    let mut indent = (container.kind() == "module").then_some(0);

    for stmt in named_children(container) {
        if stmt.is_extra() || !starts_line(stmt, source) {
            continue;
        }
        let column = stmt.start_position().column;
        match indent {
            Some(expected) if expected != column => return Some(stmt),
            Some(_) => {}
            None => indent = Some(column),
        }
    }
    None
}

/// Whether only whitespace precedes `node` on its first line.
fn starts_line(node: Node, source: &[u8]) -> bool {
    let start = node.start_byte();
    let line_start = start.saturating_sub(node.start_position().column);
    source
        .get(line_start..start)
        .is_some_and(|prefix| prefix.iter().all(|&b| matches!(b, b' ' | b'\t' | b'\x0c')))
}

/// The function definition a statement introduces, looking through decorators.
fn function_of<'t>(stmt: Node<'t>) -> Option<Node<'t>> {
    match SyntaxKind::of(stmt) {
        SyntaxKind::FunctionDefinition => Some(stmt),
        SyntaxKind::DecoratedDefinition => stmt
            .child_by_field_name("definition")
            .filter(|d| SyntaxKind::of(*d) == SyntaxKind::FunctionDefinition),
        SyntaxKind::ClassDefinition | SyntaxKind::Other => None,
    }
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<FunctionDescriptor> {
        PythonParser::new().unwrap().parse("test.py", source).unwrap()
    }

    fn names(functions: &[FunctionDescriptor]) -> Vec<&str> {
        functions.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_free_function_and_method() {
        let source = r#"def hello():
    print("Hello, world!")

class TestClass:
    def test_method(self):
        pass"#;
        let functions = parse(source);

        assert_eq!(names(&functions), vec!["hello", "TestClass.test_method"]);

        let hello = &functions[0];
        assert!(!hello.is_method);
        assert_eq!((hello.start_line, hello.end_line), (1, 2));
        assert!(hello.args.is_empty());
        assert_eq!(hello.returns, None);

        let method = &functions[1];
        assert!(method.is_method);
        assert_eq!((method.start_line, method.end_line), (5, 6));
        assert_eq!(method.args, vec!["self"]);
    }

    #[test]
    fn test_only_bare_decorators_are_kept() {
        let source = r#"@staticmethod
@cache(maxsize=3)
@functools.wraps(f)
@traced
def f(a, b=2, *args, c, **kwargs) -> Dict[str, int]:
    return {}
"#;
        let functions = parse(source);

        assert_eq!(functions.len(), 1);
        let f = &functions[0];
        assert_eq!(f.decorators, vec!["staticmethod", "traced"]);
        assert_eq!(f.args, vec!["a", "b"]);
        assert_eq!(f.returns.as_deref(), Some("Dict[str, int]"));
        // Decorator lines are not part of the span
        assert_eq!((f.start_line, f.end_line), (5, 6));
    }

    #[test]
    fn test_positional_only_and_keyword_only_are_dropped() {
        let functions = parse("def g(a, /, b: int, c: str = \"x\", *, d, e=1):\n    pass\n");
        assert_eq!(functions[0].args, vec!["b", "c"]);
    }

    #[test]
    fn test_typed_splat_stops_collection() {
        let functions = parse("def h(x, *rest: int, y):\n    pass\n");
        assert_eq!(functions[0].args, vec!["x"]);
    }

    #[test]
    fn test_nested_function_is_free() {
        let source = r#"def outer(x):
    def inner(y):
        return y
    return inner(x)
"#;
        let functions = parse(source);

        assert_eq!(names(&functions), vec!["outer", "inner"]);
        assert!(functions.iter().all(|f| !f.is_method));
        assert_eq!(functions[1].args, vec!["y"]);
    }

    #[test]
    fn test_class_methods_emitted_before_nested_functions() {
        let source = r#"class A:
    def first(self):
        def helper():
            pass
        return helper

    def second(self):
        pass
"#;
        let functions = parse(source);

        assert_eq!(names(&functions), vec!["A.first", "A.second", "helper"]);
        assert!(!functions[2].is_method);
    }

    #[test]
    fn test_decorated_and_async_methods() {
        let source = r#"class Service:
    @property
    def name(self) -> str:
        return self._name

    async def fetch(self, url):
        return await get(url)
"#;
        let functions = parse(source);

        assert_eq!(names(&functions), vec!["Service.name", "Service.fetch"]);
        assert_eq!(functions[0].decorators, vec!["property"]);
        assert_eq!(functions[0].returns.as_deref(), Some("str"));
        assert_eq!(functions[0].start_line, 3);
        assert!(!functions[0].is_async);
        assert!(functions[1].is_async);
        assert!(functions[1].is_method);
        assert_eq!(functions[1].args, vec!["self", "url"]);
    }

    #[test]
    fn test_conditional_definition_in_class_is_free() {
        let source = r#"class Compat:
    if PY2:
        def method(self):
            pass
    else:
        def method(self):
            pass
"#;
        let functions = parse(source);

        assert_eq!(names(&functions), vec!["method", "method"]);
        assert!(functions.iter().all(|f| !f.is_method));
    }

    #[test]
    fn test_nested_class_uses_immediate_class_name() {
        let source = r#"class Outer:
    class Inner:
        def m(self):
            pass

    def n(self):
        pass
"#;
        let functions = parse(source);

        assert_eq!(names(&functions), vec!["Outer.n", "Inner.m"]);
        assert!(functions.iter().all(|f| f.is_method));
    }

    #[test]
    fn test_decorated_class_methods() {
        let source = r#"@dataclass
class Point:
    x: int
    y: int

    def norm(self) -> float:
        return (self.x ** 2 + self.y ** 2) ** 0.5
"#;
        let functions = parse(source);

        assert_eq!(names(&functions), vec!["Point.norm"]);
        assert!(functions[0].decorators.is_empty());
    }

    #[test]
    fn test_single_line_definition() {
        let functions = parse("def noop(): pass\n");
        assert_eq!((functions[0].start_line, functions[0].end_line), (1, 1));
    }

    #[test]
    fn test_module_without_functions() {
        assert!(parse("x = 1\nprint(x)\n").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let parser = PythonParser::new().unwrap();

        let err = parser
            .parse("broken.py", "def broken(:\n    pass\n")
            .unwrap_err();
        match err {
            ProflogError::Parse { path, message } => {
                assert_eq!(path, "broken.py");
                assert!(message.starts_with("syntax error"));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(
            parser
                .parse("missing.py", "class X\n    def f(self):\n        pass\n")
                .is_err()
        );
    }

    fn rejection(source: &str) -> String {
        match PythonParser::new().unwrap().parse("legacy.py", source) {
            Err(ProflogError::Parse { message, .. }) => message,
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_python2_print_statement_is_rejected() {
        let message = rejection("def f():\n    print \"hi\"\n");
        assert!(message.starts_with("syntax error at line 2"));
        assert!(message.contains("print statement"));
    }

    #[test]
    fn test_python2_exec_statement_is_rejected() {
        let message = rejection("def g():\n    exec \"x=1\"\n");
        assert!(message.contains("exec statement"));
    }

    #[test]
    fn test_python2_except_comma_is_rejected() {
        let source = "def h():\n    try:\n        pass\n    except Exception, e:\n        pass\n";
        let message = rejection(source);
        assert!(message.starts_with("syntax error at line 4"));
        assert!(message.contains("except"));
    }

    #[test]
    fn test_python2_not_equal_operator_is_rejected() {
        let message = rejection("class C:\n    def m(self):\n        return 1 <> 2\n");
        assert!(message.contains("<>"));
    }

    #[test]
    fn test_unmatched_dedent_is_rejected() {
        let message = rejection("def k():\n        x = 1\n    y = 2\n");
        assert!(message.starts_with("syntax error at line 3"));
        assert!(message.contains("indentation"));
    }

    #[test]
    fn test_python3_forms_are_accepted() {
        let source = r#"def f(a):
    print("hi", a)
    try:
        x = 1; y = 2
    except (ValueError, TypeError) as e:
        pass
# flush-left comment inside the body
    return a != 2

def g(): return 1
"#;
        assert_eq!(names(&parse(source)), vec!["f", "g"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let source = "class C:\n    def m(self):\n        pass\n\ndef f(a):\n    pass\n";
        assert_eq!(parse(source), parse(source));
    }

    #[test]
    fn test_file_suffix() {
        assert_eq!(PythonParser::new().unwrap().file_suffix(), ".py");
    }
}
