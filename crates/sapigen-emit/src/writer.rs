/// Output buffer with two-space indentation for C++ source.
#[derive(Debug, Default)]
pub struct SourceWriter {
    output: String,
    indent_level: usize,
}

const INDENT: &str = "  ";

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a given nesting depth.
    pub fn with_indent(indent_level: usize) -> Self {
        Self {
            output: String::new(),
            indent_level,
        }
    }

    /// Append raw text (no newline, no indent).
    pub fn raw(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Append an indented line with trailing newline. Empty lines carry no
    /// indentation.
    pub fn line(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.indent_level {
                self.output.push_str(INDENT);
            }
        }
        self.output.push_str(line);
        self.output.push('\n');
    }

    pub fn blank_line(&mut self) {
        self.output.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Consume and return the generated output.
    pub fn finish(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indentation_is_two_spaces() {
        let mut w = SourceWriter::new();
        w.line("class A {");
        w.indent();
        w.line("int x;");
        w.indent();
        w.line("y();");
        w.dedent();
        w.dedent();
        w.line("};");
        assert_eq!(w.finish(), "class A {\n  int x;\n    y();\n};\n");
    }

    #[test]
    fn empty_lines_have_no_trailing_whitespace() {
        let mut w = SourceWriter::with_indent(2);
        w.line("a;");
        w.line("");
        w.blank_line();
        w.raw(" private:\n");
        assert_eq!(w.finish(), "    a;\n\n\n private:\n");
    }

    #[test]
    fn dedent_saturates() {
        let mut w = SourceWriter::new();
        w.dedent();
        w.line("x");
        assert_eq!(w.finish(), "x\n");
    }
}
