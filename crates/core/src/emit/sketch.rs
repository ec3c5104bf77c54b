//! Output assembler.
//!
//! Collects generated statements in line order together with the payloads
//! they use, then lays out the final sketch:
//!
//! 1. payload declarations
//! 2. program prologue
//! 3. payload definitions
//! 4. `setup()` opening with keyboard initialization
//! 5. the generated statements
//! 6. epilogue (`Keyboard.end()`, the empty `loop()`)

use super::payload::{self, Payload};
use super::{CodeNode, RenderConfig, render};

const BANNER: &str = "// Generated by ducky-toolchain. Do not edit by hand.";

/// Accumulates generated code for one run.
#[derive(Debug, Default)]
pub struct SketchBuilder {
    code: Vec<CodeNode>,
    used: Vec<&'static Payload>,
}

impl SketchBuilder {
    /// Empty sketch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append statements and record the payloads they call.
    pub fn add(&mut self, code: Vec<CodeNode>, payloads: &[&'static Payload]) {
        self.code.extend(code);
        for p in payloads {
            if !self.used.contains(p) {
                self.used.push(*p);
            }
        }
    }

    /// Statements collected so far.
    pub fn code(&self) -> &[CodeNode] {
        &self.code
    }

    /// Payloads to emit: every used payload and its dependencies, each once,
    /// dependencies first.
    pub fn payloads(&self) -> Vec<&'static Payload> {
        payload::resolve(&self.used)
    }

    /// Complete document as a tree.
    pub fn to_nodes(&self) -> Vec<CodeNode> {
        let payloads = self.payloads();
        let mut nodes = Vec::new();

        let headers: Vec<CodeNode> = payloads
            .iter()
            .flat_map(|p| p.header.iter().map(|h| CodeNode::line(*h)))
            .collect();
        if !headers.is_empty() {
            nodes.extend(headers);
            nodes.push(CodeNode::blank());
        }

        nodes.push(CodeNode::line(BANNER));
        nodes.push(CodeNode::line("#include <Keyboard.h>"));
        nodes.push(CodeNode::blank());

        for p in &payloads {
            nodes.extend(p.body_nodes());
            nodes.push(CodeNode::blank());
        }

        let mut setup = vec![CodeNode::line("Keyboard.begin();"), CodeNode::blank()];
        if !self.code.is_empty() {
            setup.extend(self.code.iter().cloned());
            setup.push(CodeNode::blank());
        }
        setup.push(CodeNode::line("Keyboard.end();"));

        nodes.push(CodeNode::line("void setup() {"));
        nodes.push(CodeNode::block(setup));
        nodes.push(CodeNode::line("}"));
        nodes.push(CodeNode::blank());
        nodes.push(CodeNode::line("void loop() {}"));
        nodes
    }

    /// Render the document to text.
    pub fn render(&self, config: &RenderConfig) -> String {
        render(&self.to_nodes(), config)
    }
}
