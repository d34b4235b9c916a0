//! Line-oriented sink for generated C++.

/// Accumulates generated text, indenting two spaces per open brace.
#[derive(Debug, Default)]
pub(crate) struct Writer {
    dst: String,
    indent: usize,

    /// False right after an opening brace or a blank line
    blank_ok: bool,
}

impl Writer {
    pub(crate) fn new() -> Writer {
        Writer::default()
    }

    /// Writes one line at the current indentation. Embedded newlines start
    /// further lines at the same indentation.
    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        for line in text.as_ref().split('\n') {
            if !line.is_empty() {
                for _ in 0..self.indent {
                    self.dst.push_str("  ");
                }
                self.dst.push_str(line);
            }
            self.dst.push('\n');
        }
        self.blank_ok = true;
    }

    /// Separates two declarations. Never doubles up and never follows an
    /// opening brace.
    pub(crate) fn blank(&mut self) {
        if self.blank_ok {
            self.dst.push('\n');
            self.blank_ok = false;
        }
    }

    pub(crate) fn open(&mut self) {
        self.line("{");
        self.indent += 1;
        self.blank_ok = false;
    }

    /// Closes the innermost brace, followed by `trailer` (`;` for types).
    pub(crate) fn close(&mut self, trailer: &str) {
        if self.dst.ends_with("\n\n") {
            self.dst.pop();
        }
        self.indent = self.indent.saturating_sub(1);
        self.line(format!("}}{trailer}"));
    }

    /// An access specifier, at member indentation.
    pub(crate) fn label(&mut self, label: &str) {
        self.line(label);
        self.blank_ok = false;
    }

    /// The `// name` banner preceding a declaration.
    pub(crate) fn comment(&mut self, name: &str) {
        self.line(format!("// {name}"));
        self.line("//");
    }

    /// Writes `f`'s output one level deeper, without braces.
    pub(crate) fn indented(&mut self, f: impl FnOnce(&mut Writer)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    pub(crate) fn finish(self) -> String {
        self.dst
    }
}

/// Splits `text` into C++ string literals, one per line of text, so that
/// adjacent literals concatenate back to `text`.
pub(crate) fn literal(text: &str) -> Vec<String> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let last = lines.pop().unwrap_or_default();

    lines
        .into_iter()
        .map(|line| format!("\"{}\\n\"", escape(line)))
        .chain(std::iter::once(format!("\"{}\"", escape(last))))
        .collect()
}

fn escape(text: &str) -> String {
    let mut ret = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => ret.push_str("\\\\"),
            '"' => ret.push_str("\\\""),
            '\t' => ret.push_str("\\t"),
            c => ret.push(c),
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braces_indent_and_blank_lines_collapse() {
        let mut w = Writer::new();
        w.line("struct image_type");
        w.open();
        w.blank();
        w.line("bool id_null;");
        w.blank();
        w.blank();
        w.line("std::size_t version;");
        w.blank();
        w.close(";");

        assert_eq!(
            w.finish(),
            "struct image_type\n{\n  bool id_null;\n\n  std::size_t version;\n};\n"
        );
    }

    #[test]
    fn labels_sit_with_members() {
        let mut w = Writer::new();
        w.line("class C");
        w.open();
        w.label("public:");
        w.line("typedef int id_type;");
        w.close(";");

        assert_eq!(w.finish(), "class C\n{\n  public:\n  typedef int id_type;\n};\n");
    }

    #[test]
    fn literals_keep_newlines_and_escape_quotes() {
        assert_eq!(
            literal("CREATE TABLE \"t\" (\n  \"id\" INTEGER)"),
            ["\"CREATE TABLE \\\"t\\\" (\\n\"", "\"  \\\"id\\\" INTEGER)\""]
        );
        assert_eq!(literal("a\\b"), ["\"a\\\\b\""]);
    }
}
