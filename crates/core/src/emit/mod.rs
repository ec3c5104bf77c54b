//! Output tree for generated sketch code.
//!
//! Commands and payloads describe their code as a tree of [`CodeNode`]s
//! where a [`CodeNode::Block`] nests its children one level deeper. The tree
//! carries no whitespace; [`render`] turns it into text using the spaces-per
//! level from [`RenderConfig`].

/// Payload definitions and dependency resolver.
pub mod payload;
/// Output assembler and final document layout.
pub mod sketch;

// ── Configuration ───────────────────────────────────────────────────────

/// Configuration for rendering a code tree.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Spaces per block level.
    pub indent: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

// ── Code tree ───────────────────────────────────────────────────────────

/// One node of generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeNode {
    /// A single statement or source line. An empty string renders as a
    /// blank line.
    Line(String),
    /// Child nodes indented one level below the surrounding code.
    Block(Vec<CodeNode>),
}

impl CodeNode {
    /// Shorthand for [`CodeNode::Line`].
    pub fn line(text: impl Into<String>) -> Self {
        CodeNode::Line(text.into())
    }

    /// Shorthand for a blank line.
    pub fn blank() -> Self {
        CodeNode::Line(String::new())
    }

    /// Shorthand for [`CodeNode::Block`].
    pub fn block(children: Vec<CodeNode>) -> Self {
        CodeNode::Block(children)
    }
}

/// Static counterpart of [`CodeNode`] for code known at compile time.
#[derive(Debug, PartialEq, Eq)]
pub enum Snippet {
    /// A single line.
    Line(&'static str),
    /// Child snippets indented one level deeper.
    Block(&'static [Snippet]),
}

impl From<&Snippet> for CodeNode {
    fn from(snippet: &Snippet) -> Self {
        match snippet {
            Snippet::Line(text) => CodeNode::line(*text),
            Snippet::Block(children) => {
                CodeNode::Block(children.iter().map(CodeNode::from).collect())
            }
        }
    }
}

// ── Rendering ───────────────────────────────────────────────────────────

/// Render `nodes` to text, one line per [`CodeNode::Line`], each terminated
/// by `\n`.
pub fn render(nodes: &[CodeNode], config: &RenderConfig) -> String {
    let mut out = String::new();
    render_into(&mut out, nodes, config, 0);
    out
}

fn render_into(out: &mut String, nodes: &[CodeNode], config: &RenderConfig, depth: usize) {
    for node in nodes {
        match node {
            CodeNode::Line(text) => {
                // Blank lines carry no indentation.
                if !text.is_empty() {
                    push_indent(out, config, depth);
                    out.push_str(text);
                }
                out.push('\n');
            }
            CodeNode::Block(children) => render_into(out, children, config, depth + 1),
        }
    }
}

fn push_indent(out: &mut String, config: &RenderConfig, depth: usize) {
    for _ in 0..depth * config.indent {
        out.push(' ');
    }
}
